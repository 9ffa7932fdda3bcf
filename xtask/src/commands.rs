use anyhow::Result;
use clap::Subcommand;
use xshell::Shell;

pub mod build;
pub mod ci;
pub mod common;
pub mod fmt;
pub mod precommit;

#[derive(Subcommand)]
pub enum Command {
    /// Build the workspace
    Build(build::Build),
    /// Run CI checks (fmt, clippy, doc, test). Runs all if no subcommand specified.
    Ci(ci::Ci),
    /// Apply rustfmt to all files
    Fmt(fmt::Fmt),
    /// Run precommit checks (checks rustfmt and runs clippy)
    Precommit(precommit::Precommit),
    /// Run tests
    Test(test::Test),
}

impl Command {
    pub fn run(self, sh: &Shell) -> Result<()> {
        match self {
            Command::Build(cmd) => cmd.run(sh),
            Command::Ci(cmd) => cmd.run(sh),
            Command::Fmt(cmd) => cmd.run(sh),
            Command::Precommit(cmd) => cmd.run(sh),
            Command::Test(cmd) => cmd.run(sh),
        }
    }
}
