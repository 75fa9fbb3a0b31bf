//! Command-line surface: argument parsing and logging setup.

mod args;
mod output;

pub use args::Args;
pub use output::setup_output;
