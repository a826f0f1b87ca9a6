//! Command-line entry points

pub mod serve;

use clap::{Parser, Subcommand};

/// Learnify generator - quizzes, assignments and summaries from course material
#[derive(Parser)]
#[command(name = "learnify-generator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve(serve::ServeArgs),
}
