//! # Beach Conditions Command-Line Front End
//!
//! Lists tracked beaches, searches for new ones and prints current
//! conditions and the multi-day forecast. The location list lives only in
//! memory, so `add` shows conditions for the new beach straight away.

use anyhow::Context;
use beach_conditions::config::Config;
use beach_conditions::renderer::{render_bundle, render_locations, render_search};
use beach_conditions::service::BeachService;
use beach_conditions::{LocationDraft, WeatherBundle};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;


#[derive(Parser, Debug)]
#[command(name = "beach-conditions")]
#[command(author, version, about = "Weather, sea and tide conditions for your beaches", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "BEACH_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// List tracked beaches
    List,

    /// Show conditions for a beach (the first tracked beach by default)
    Weather {
        /// Location id
        id: Option<String>,

        /// Include the multi-day forecast
        #[arg(short, long)]
        forecast: bool,
    },

    /// Search for places by name
    Search {
        /// Free-text query (at least two characters)
        query: String,
    },

    /// Track a beach by coordinates and show its conditions
    Add {
        /// Display name
        name: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long)]
        country: String,

        /// State or region
        #[arg(long)]
        region: Option<String>,

        /// Webcam page; derived from the coordinates when omitted
        #[arg(long)]
        webcam: Option<String>,

        #[arg(long)]
        favorite: bool,

        /// Include the multi-day forecast
        #[arg(short, long)]
        forecast: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("beach_conditions={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_bundle(bundle: &WeatherBundle, json: bool, forecast: bool) -> anyhow::Result<()> {
    if json {
        return print_json(bundle);
    }
    print!("{}", render_bundle(bundle, forecast));
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let json = cli.json || config.display.json;

    let mut service = BeachService::new(&config).context("failed to initialize HTTP client")?;

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::List => {
            let locations = service.locations();
            if json {
                print_json(&locations)?;
            } else {
                print!("{}", render_locations(&locations));
            }
        }
        Commands::Weather { id, forecast } => {
            let id = match id {
                Some(id) => id,
                None => service
                    .locations()
                    .first()
                    .map(|l| l.id.clone())
                    .context("no locations tracked")?,
            };
            let bundle = rt.block_on(service.weather(&id))?;
            print_bundle(&bundle, json, forecast || config.display.show_forecast)?;
        }
        Commands::Search { query } => {
            let results = rt.block_on(service.search(&query));
            if json {
                print_json(&results)?;
            } else {
                print!("{}", render_search(&results));
            }
        }
        Commands::Add {
            name,
            lat,
            lon,
            country,
            region,
            webcam,
            favorite,
            forecast,
        } => {
            let location = service.add_location(LocationDraft {
                name,
                latitude: lat,
                longitude: lon,
                country,
                region,
                is_favorite: favorite,
                webcam_url: webcam,
            });
            let bundle = rt.block_on(service.weather(&location.id))?;
            print_bundle(&bundle, json, forecast || config.display.show_forecast)?;
        }
    }

    Ok(())
}
