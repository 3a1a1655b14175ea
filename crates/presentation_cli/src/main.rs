//! Wayfinder CLI
//!
//! Searches places, plans routes and locates the user through the map
//! workflow, backed by OpenStreetMap services.

#![allow(clippy::print_stdout)]

mod commands;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use domain::GeoLocation;
use infrastructure::{AppConfig, init_tracing};

/// Wayfinder CLI
#[derive(Debug, Parser)]
#[command(name = "wayfinder")]
#[command(author, version, about = "Search places and plan routes on OpenStreetMap", long_about = None)]
struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: wayfinder.toml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Search for places around the map center
    ///
    /// Example: wayfinder search coffee --near 22.5726,88.3639
    Search {
        /// Free-text query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Map center as LAT,LON (default: configured center)
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        near: Option<GeoLocation>,
    },

    /// Search, pick a result and plan a driving route to it
    ///
    /// Example: wayfinder directions coffee --pick 2
    Directions {
        /// Free-text query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Which search result to route to (1 = first)
        #[arg(short, long, default_value = "1")]
        pick: NonZeroUsize,

        /// Map center as LAT,LON (default: configured center)
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        near: Option<GeoLocation>,

        /// Route origin as LAT,LON (default: your location)
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Option<GeoLocation>,
    },

    /// Center the map on your location
    Locate,

    /// Show the effective configuration
    Config {
        /// Only report whether the configuration is valid
        #[arg(long)]
        check: bool,
    },
}

/// Log filter for the `-v` count; `None` keeps the configured filter
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Parse `LAT,LON` in decimal degrees
fn parse_coordinate(value: &str) -> Result<GeoLocation, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {value:?}"))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude {lat:?}"))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude {lon:?}"))?;
    GeoLocation::new(latitude, longitude).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.logging.filter = filter.to_string();
    }

    init_tracing(&config.logging)?;
    config.validate()?;

    commands::run(cli.command, &config, cli.json).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn log_filter_levels() {
        assert_eq!(log_filter_from_verbosity(0), None);
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(3), Some("trace"));
        assert_eq!(log_filter_from_verbosity(10), Some("trace"));
    }

    #[test]
    fn coordinate_parsing() {
        let kolkata = parse_coordinate("22.5726, 88.3639").unwrap();
        assert!((kolkata.latitude() - 22.5726).abs() < 1e-9);
        assert!((kolkata.longitude() - 88.3639).abs() < 1e-9);

        let sydney = parse_coordinate("-33.8688,151.2093").unwrap();
        assert!(sydney.latitude() < 0.0);

        assert!(parse_coordinate("22.5726").is_err());
        assert!(parse_coordinate("north,88.3").is_err());
        assert!(parse_coordinate("95.0,88.3").is_err());
    }

    #[test]
    fn search_joins_query_words() {
        let cli = parse(&["wayfinder", "search", "indian", "coffee", "house"]).unwrap();
        let Commands::Search { query, near } = cli.command else {
            unreachable!("expected search");
        };
        assert_eq!(query.join(" "), "indian coffee house");
        assert!(near.is_none());
    }

    #[test]
    fn search_requires_query() {
        assert!(parse(&["wayfinder", "search"]).is_err());
    }

    #[test]
    fn directions_options() {
        let cli = parse(&[
            "wayfinder",
            "-vv",
            "--json",
            "directions",
            "coffee",
            "--pick",
            "2",
            "--from",
            "-33.8688,151.2093",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        let Commands::Directions {
            query, pick, from, ..
        } = cli.command
        else {
            unreachable!("expected directions");
        };
        assert_eq!(query, vec!["coffee".to_string()]);
        assert_eq!(pick.get(), 2);
        assert!(from.is_some());
    }

    #[test]
    fn directions_rejects_pick_zero() {
        assert!(parse(&["wayfinder", "directions", "coffee", "--pick", "0"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["wayfinder", "locate", "--config", "/tmp/w.toml", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::Locate));
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/w.toml")));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn config_check_flag() {
        let cli = parse(&["wayfinder", "config", "--check"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { check: true }));
    }
}
