//! Subcommand handlers

use std::sync::Arc;

use anyhow::{Context, bail};
use application::services::map_links::{
    coordinate_link, directions_link, format_place_with_link, search_link,
};
use application::services::{MapWorkflow, Outcome};
use domain::{GeoLocation, Place, Viewport};
use infrastructure::{
    AppConfig, LocationPublisher, OsmMappingAdapter, WatchLocationProvider,
    forward_location_updates,
};
use tracing::debug;

use crate::Commands;

/// Workflow wired to the configured services
///
/// Location fixes are forwarded for as long as the publisher is alive.
fn wire(config: &AppConfig) -> anyhow::Result<(Arc<MapWorkflow>, LocationPublisher)> {
    let mapping = OsmMappingAdapter::from_config(&config.search, &config.routing)?
        .with_retry(config.retry.clone())
        .with_circuit_breaker_config(config.circuit_breaker.clone());
    let (publisher, location) = WatchLocationProvider::from_config(&config.location)?;
    let updates = location.updates();

    let workflow = Arc::new(MapWorkflow::new(
        Arc::new(mapping),
        Arc::new(location),
        config.workflow.to_workflow_config()?,
    ));
    forward_location_updates(updates, Arc::clone(&workflow));

    Ok((workflow, publisher))
}

fn viewport_near(workflow: &MapWorkflow, near: Option<GeoLocation>) -> Viewport {
    let viewport = workflow.viewport();
    near.map_or(viewport, |center| viewport.recentered(center))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_places(query: &str, places: &[Place]) {
    if places.is_empty() {
        println!("No places found for \"{query}\".");
        return;
    }
    for (index, place) in places.iter().enumerate() {
        let text = format_place_with_link(place).replace('\n', "\n   ");
        println!("{:>2}. {text}", index + 1);
    }
    println!("\n🔎 {}", search_link(query));
}

/// Run one subcommand
pub(crate) async fn run(command: Commands, config: &AppConfig, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Search { query, near } => {
            let query = query.join(" ");
            let (workflow, _publisher) = wire(config)?;

            let places = workflow
                .search(&query, viewport_near(&workflow, near))
                .await?
                .applied()
                .unwrap_or_default();

            if json {
                print_json(&places)?;
            } else {
                print_places(&query, &places);
            }
        },

        Commands::Directions {
            query,
            pick,
            near,
            from,
        } => {
            let query = query.join(" ");
            let (workflow, _publisher) = wire(config)?;

            let places = workflow
                .search(&query, viewport_near(&workflow, near))
                .await?
                .applied()
                .unwrap_or_default();
            if places.is_empty() {
                bail!("no places found for {query:?}");
            }

            let index = pick.get() - 1;
            if let Err(e) = workflow.select_result(index).await {
                // The selection itself sticks; only the detail lookup failed
                debug!(error = %e, "Place detail unavailable");
            }
            let destination = workflow
                .snapshot()
                .selection
                .with_context(|| format!("only {} places found", places.len()))?;

            let fitted = match workflow.request_directions(from, destination).await? {
                Outcome::Applied(fitted) => fitted,
                Outcome::Discarded => bail!("route request was superseded"),
            };

            if json {
                print_json(&serde_json::json!({
                    "route": fitted.route,
                    "bounds": fitted.bounds,
                    "viewport": fitted.viewport,
                }))?;
            } else {
                let route = &fitted.route;
                println!("🧭 {} → {}", route.origin, route.destination.name);
                println!("   {}", route.summary());
                println!(
                    "🗺️ {}",
                    directions_link(&route.origin, &route.destination.coordinate)
                );
            }
        },

        Commands::Locate => {
            let (workflow, _publisher) = wire(config)?;

            match workflow.center_on_user().await? {
                Outcome::Applied(viewport) if json => print_json(&viewport)?,
                Outcome::Applied(viewport) => {
                    println!("📍 {}", viewport.center);
                    println!("🗺️ {}", coordinate_link(&viewport.center));
                },
                Outcome::Discarded => println!("The map moved before a location fix arrived."),
            }
        },

        Commands::Config { check } => {
            if check {
                println!("✅ Configuration is valid");
            } else if json {
                print_json(config)?;
            } else {
                print!("{}", toml::to_string_pretty(config)?);
            }
        },
    }

    Ok(())
}
