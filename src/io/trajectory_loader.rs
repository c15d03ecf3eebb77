use brownian::Trajectory;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

/// Read the `t x y vx vy` tables written by an external simulator.
pub fn load_trajectories(paths: &[String]) -> Result<Vec<Trajectory>> {
    paths
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("Unable to read trajectory file: {}", path))?;
            let traj = Trajectory::parse_table(&text)
                .wrap_err_with(|| format!("Malformed trajectory file: {}", path))?;
            info!(
                "Loaded {}: {} samples, dt = {}",
                path,
                traj.len(),
                traj.time_step()
            );
            Ok(traj)
        })
        .collect()
}
