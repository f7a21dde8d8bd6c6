// CLI command definitions

use super::compile::{CompileCommand, DescribeCommand, ValidateCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "machinespec",
    version,
    about = "Compiles node deployments into machine deployments",
    long_about = "A standalone CLI tool that turns cloud-agnostic node deployments into provider-specific machine deployments for the machine controller"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Compile a node deployment and print the machine deployment
    Compile(CompileCommand),

    /// Validate a node deployment and print the resolved kubelet version
    Validate(ValidateCommand),

    /// Compile a node deployment and print a summary table
    Describe(DescribeCommand),
}
