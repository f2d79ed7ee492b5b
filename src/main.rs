use action_man::cli::{Command, RootArgs};
use action_man::error::ConfigError;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "AMAN_LOG";

fn main() -> Result<()> {
    init_tracing();
    let args = RootArgs::parse();
    match args.command {
        Command::Github(args) => action_man::github::run(&args),
        Command::Other(words) => {
            let provider = words.first().cloned().unwrap_or_default();
            Err(ConfigError::UnsupportedProvider(provider).into())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
