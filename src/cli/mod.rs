pub mod commands;
pub mod compile;
pub mod display;

pub use commands::CliArgs;
