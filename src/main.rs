mod commands;
mod render;

use std::sync::Arc;

use anyhow::Result;
use calgrid_core::app::CalendarApp;
use calgrid_core::config::CalGridConfig;
use calgrid_core::storage::FileStorage;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::EventArgs;

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "A month-grid calendar with per-day events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid
    Show {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Step back one month
        #[arg(long, conflicts_with = "next")]
        previous: bool,

        /// Step forward one month
        #[arg(long)]
        next: bool,
    },
    /// List every event on a day
    Day {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// Add an event, prompting for anything missing
    Add {
        /// Day of the event (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        #[command(flatten)]
        fields: EventArgs,
    },
    /// Change an existing event
    Edit {
        /// Event id (see `calgrid day`)
        id: String,

        #[command(flatten)]
        fields: EventArgs,
    },
    /// Delete an event
    Delete {
        /// Event id (see `calgrid day`)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

fn init_logging(default_filter: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(default_filter),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CalGridConfig::load()?;
    init_logging(&config.log_level);

    let data_dir = config.data_path();
    tracing::debug!(path = %data_dir.display(), "Using data directory");

    let storage = Arc::new(FileStorage::new(data_dir));
    let today = Local::now().date_naive();
    let mut app = CalendarApp::open(storage, config.save_timings(), today);

    match cli.command {
        Commands::Show {
            month,
            previous,
            next,
        } => commands::show::run(&mut app, month.as_deref(), previous, next, today),
        Commands::Day { date } => commands::day::run(&app, &date),
        Commands::Add { date, fields } => {
            commands::add::run(&mut app, date.as_deref(), fields, today)
        }
        Commands::Edit { id, fields } => commands::edit::run(&mut app, &id, fields),
        Commands::Delete { id, force } => commands::delete::run(&mut app, &id, force),
    }
}
