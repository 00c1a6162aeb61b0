//! `yonsei-ics` command line tool.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "yonsei-ics")]
#[command(about = "Convert a Yonsei course-schedule export into an ICS calendar")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a tab-separated schedule export to an ICS file
    Generate {
        /// Tab-separated schedule export
        input: PathBuf,

        /// Output file path (defaults to the input path with an .ics extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Academic year, e.g. 2019 (defaults to the current term). The built-in
        /// semester table only covers 2019 and 2020; pass --semesters for other years
        #[arg(short, long)]
        year: Option<i32>,

        /// Term: 1 = spring, 2 = fall (defaults to the current term)
        #[arg(short, long)]
        term: Option<u32>,

        /// JSON building table; without it locations are kept as exported
        #[arg(long)]
        locations: Option<PathBuf>,

        /// JSON semester table replacing the built-in one
        #[arg(long)]
        semesters: Option<PathBuf>,

        /// Calendar name
        #[arg(long)]
        calendar_name: Option<String>,

        /// Add a reminder this many minutes before each class
        #[arg(long)]
        reminder_minutes: Option<u32>,
    },

    /// Building table commands
    Location {
        #[command(subcommand)]
        action: LocationCommands,

        /// JSON building table
        #[arg(long, global = true)]
        locations: Option<PathBuf>,
    },

    /// List known semester windows
    Semesters {
        /// JSON semester table replacing the built-in one
        #[arg(long)]
        semesters: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum LocationCommands {
    /// List all buildings
    List,

    /// Show how a raw location is rendered
    Resolve {
        /// Raw location, e.g. ENG412
        location: String,
    },

    /// Write the building table to a JSON file
    Export {
        /// Output file path
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("yonsei_ics_cli={0},yonsei_ics_core={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            input,
            output,
            year,
            term,
            locations,
            semesters,
            calendar_name,
            reminder_minutes,
        } => commands::generate_command(commands::GenerateParams {
            input,
            output,
            year,
            term,
            locations,
            semesters,
            calendar_name,
            reminder_minutes,
        }),

        Commands::Location { action, locations } => match action {
            LocationCommands::List => commands::location_list_command(locations),
            LocationCommands::Resolve { location } => {
                commands::location_resolve_command(locations, location)
            }
            LocationCommands::Export { file } => commands::location_export_command(locations, file),
        },

        Commands::Semesters { semesters } => commands::semesters_command(semesters),
    }
}
