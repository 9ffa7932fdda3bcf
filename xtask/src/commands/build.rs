use anyhow::Result;
use clap::Args;
use xshell::{Shell, cmd};

#[derive(Args)]
pub struct Build {
    #[arg(long, default_value = "dev")]
    profile: String,
}

impl Build {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        let profile = &self.profile;
        cmd!(sh, "cargo build --workspace --all-targets --profile {profile}").run()?;
        Ok(())
    }
}
