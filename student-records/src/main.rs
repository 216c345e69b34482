use anyhow::Result;
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;

use student_records::backend::{AppConfig, Backend};
use student_records::shell::Shell;

/// Manage student enrollment records from an interactive menu
#[derive(Parser, Debug)]
#[command(name = "student-records", version, about)]
struct Cli {
    /// YAML config file (defaults to ./student-records.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the student tables; overrides the config file
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so they stay out of the menus
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_directory = data_dir;
    }

    let backend = Backend::new(config)?;
    info!("Starting student records shell");

    let stdin = io::stdin();
    let mut shell = Shell::new(&backend.account_service, stdin.lock(), io::stdout());
    shell.run()
}
