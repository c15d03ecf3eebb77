//! Input/Output operations
//!
//! Logging setup, external trajectory loading and the YAML report.

mod output;
mod trajectory_loader;

pub use output::{setup_output, write_report};
pub use trajectory_loader::load_trajectories;
