//! CLI command implementations.

mod config;
mod doctor;
mod research;
mod save;
mod tools;

pub use config::run_config;
pub use doctor::run_doctor;
pub use research::{run_research, ResearchOptions};
pub use save::run_save;
pub use tools::run_tools;
