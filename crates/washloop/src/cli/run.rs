use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use washloop::{config::Config, runner};

#[derive(Args)]
pub struct RunArgs {
    /// Path to the configuration file (TOML or JSON). Defaults are used if omitted.
    pub config: Option<PathBuf>,

    /// Override the loop interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Override how long to run, in milliseconds
    #[arg(long)]
    pub run_ms: Option<u64>,
}

impl RunArgs {
    pub fn run(&self) -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading config from {}", path.display());
                Config::from_file(path)?
            }
            None => Config::default(),
        };
        if let Some(interval_ms) = self.interval_ms {
            config.washloop.interval_ms = interval_ms;
        }
        if let Some(run_ms) = self.run_ms {
            config.run_ms = run_ms;
        }
        config.validate()?;

        let summary = runner::run(&config)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);

        Ok(())
    }
}
