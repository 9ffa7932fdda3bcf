use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "washloop", about = "Fixed-interval washout loop runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the loop against a simulated motion feed and report positions.
    Run(cli::run::RunArgs),
}
