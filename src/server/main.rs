//! TimeReach server.
//!
//! Exposes an HTTP API that finds points of interest reachable within a
//! travel-time budget: origin → isochrone polygon → search radius → nearby
//! venues.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use timereach::config::Config;
use timereach::geocode::NominatimGeocoder;
use timereach::isochrone::OrsClient;
use timereach::places::GooglePlacesClient;

mod routes;
use routes::{health_handler, places_handler, root_handler, AppState};

#[derive(Parser, Debug)]
#[command(name = "timereach-server")]
#[command(about = "Find places within travel time using isochrones")]
struct Args {
    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "timereach.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config))?;
    let listen = args.listen.unwrap_or_else(|| config.listen.clone());

    info!("TimeReach server");
    info!("Isochrone provider at {}", config.isochrone.base_url);
    info!("Places provider at {}", config.places.base_url);

    let state = Arc::new(AppState {
        geocoder: NominatimGeocoder::new(&config.geocoder)?,
        isochrones: OrsClient::new(&config.isochrone)?,
        places: GooglePlacesClient::new(&config.places)?,
    });

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/places", get(places_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
