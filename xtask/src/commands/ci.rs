use anyhow::Result;
use clap::{Args, Subcommand};
use xshell::{Shell, cmd};

use super::common;

#[derive(Args)]
pub struct Ci {
    #[command(subcommand)]
    command: Option<CiCommand>,
}

#[derive(Subcommand)]
pub enum CiCommand {
    /// Run cargo fmt check
    Fmt,
    /// Run cargo clippy
    Clippy,
    /// Build documentation
    Doc,
    /// Run cargo test
    Test(TestArgs),
}

#[derive(Args, Default)]
pub struct TestArgs {
    /// Additional arguments to pass to cargo test
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Ci {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        match &self.command {
            Some(cmd) => cmd.run(sh),
            None => {
                CiCommand::Fmt.run(sh)?;
                CiCommand::Clippy.run(sh)?;
                CiCommand::Doc.run(sh)?;
                CiCommand::Test(TestArgs::default()).run(sh)?;
                Ok(())
            }
        }
    }
}

impl CiCommand {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        match self {
            CiCommand::Fmt => common::run_fmt_check(sh),
            CiCommand::Clippy => common::run_clippy(sh),
            CiCommand::Doc => common::run_doc(sh),
            CiCommand::Test(test_args) => {
                eprintln!("Running cargo test...");
                let args = &test_args.args;
                // timing tests share the host; keep them from starving each other
                cmd!(sh, "cargo test --workspace --all-features {args...} -- --test-threads=4").run()?;
                Ok(())
            }
        }
    }
}
