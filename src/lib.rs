pub mod cli;

pub use cli::{failure_annotation, run, Cli};
