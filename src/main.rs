//! Brownian motion command-line interface
//!
//! Runs Langevin ensembles described by a YAML configuration and compares
//! them with the Einstein relation and equipartition.

use color_eyre::eyre::Result;

mod app;
mod config;
mod io;

use app::BrownianApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    BrownianApplication::from_cli()?.run()
}
