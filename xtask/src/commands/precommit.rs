use anyhow::Result;
use clap::Args;
use xshell::{Shell, cmd};

use super::common;

#[derive(Args)]
pub struct Precommit {
    /// Skip the core unit tests
    #[arg(long)]
    no_test: bool,
}

impl Precommit {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        common::run_fmt_check(sh)?;
        common::run_clippy(sh)?;

        // unit tests only; the timing-heavy integration tests run in CI
        if !self.no_test {
            eprintln!("Running washloop-core unit tests...");
            cmd!(sh, "cargo test --package washloop-core --lib").run()?;
        }

        eprintln!("Precommit checks passed!");
        Ok(())
    }
}
