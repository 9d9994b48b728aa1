#[macro_use]
extern crate rocket;

mod api;
mod app_state;
mod config;
mod engine;
mod error;
mod prompt;
mod types;

use std::sync::Arc;

use rocket::{Build, Rocket};

use api::{generate, health};
use app_state::AppState;
use config::ServiceConfig;
use engine::CandleEngine;

fn build_rocket(state: Arc<AppState>) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/", routes![health, generate])
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env();
    let engine = CandleEngine::new(&config)?;
    let state = AppState::new(&config.model_name, engine);

    build_rocket(state).launch().await?;
    Ok(())
}
