use std::path::PathBuf;

use clap::Parser;

/// querychat: ask questions about your data in plain language.
#[derive(Parser, Debug)]
#[command(name = "querychat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. debug, querychat_client=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Query endpoint override.
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Directory for the saved conversation.
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,
}

pub fn parse() -> Args {
    Args::parse()
}
