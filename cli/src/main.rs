mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Feed overlay engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan an HTML snapshot once and report what got overlaid
    Scan {
        /// Feed snapshot to process
        #[arg(short, long)]
        input: PathBuf,

        /// Write the annotated document here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (platform default location otherwise)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Page path the snapshot was captured from
        #[arg(short, long, default_value = "/")]
        path: String,

        /// Skip overlay image preloading
        #[arg(long)]
        offline: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-run the scan whenever the snapshot file is rewritten
    Watch {
        /// Feed snapshot to process
        #[arg(short, long)]
        input: PathBuf,

        /// Write the annotated document here after each run
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (platform default location otherwise)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Page path the snapshot was captured from
        #[arg(short, long, default_value = "/")]
        path: String,

        /// Skip overlay image preloading
        #[arg(long)]
        offline: bool,
    },

    /// Print the effective configuration
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the post matcher on a piece of text
    Check { text: String },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan {
            input,
            output,
            config,
            path,
            offline,
            json,
        } => commands::scan(&input, output.as_deref(), config.as_deref(), &path, offline, json).await,
        Commands::Watch {
            input,
            output,
            config,
            path,
            offline,
        } => commands::watch(&input, output.as_deref(), config.as_deref(), &path, offline).await,
        Commands::Config { config } => commands::show_config(config.as_deref()),
        Commands::Check { text } => {
            commands::check(&text);
            Ok(())
        }
    }
}
