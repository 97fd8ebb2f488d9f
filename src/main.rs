#[macro_use]
extern crate rocket;

mod config;
mod error;
mod state;
mod store;

// Web app
use rocket::serde::json::{self, Json};
use rocket::{Build, Rocket, State};

// JSON documents
use serde_json::Value;

// Logger
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::BadRequest;
use crate::state::LightState;
use crate::store::LightStore;

// Log level used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info";

// Return the current light state.
#[get("/")]
fn light_state(store: &State<LightStore>) -> Json<LightState> {
    let state = store.get();
    info!("Response: {}", serde_json::to_string(&state).unwrap_or_default());
    Json(state)
}

// Replace the light state with the one contained in the request body.
#[put("/", data = "<body>")]
fn update_light_state(
    store: &State<LightStore>,
    body: Result<Json<Value>, json::Error<'_>>,
) -> Result<Json<LightState>, BadRequest> {
    let body = body.map_err(|e| {
        warn!("Malformed request body: {}", e);
        BadRequest::text(e)
    })?;
    info!("Request: {}", body.0);

    let state = store.set(&body).map_err(|e| {
        warn!("Rejected light state: {}", e);
        BadRequest::from(e)
    })?;

    info!("Response: {}", serde_json::to_string(&state).unwrap_or_default());
    Ok(Json(state))
}

// Build the web server around a light store.
fn server(store: LightStore) -> Rocket<Build> {
    rocket::custom(config::figment())
        .mount("/", routes![light_state, update_light_state])
        .manage(store)
        .register("/", error::catchers())
}

#[launch]
fn rocket() -> _ {
    // Enable tracing subscriber
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    server(LightStore::new())
}
