mod api_key;
mod config;
mod error;
mod model;
mod relay;
mod web;

use actix_files as fs;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use config::Config;
use error::RelayError;
use relay::RelayService;
use web::{recover, routes};

// App state structure
pub struct AppState {
    relay: RelayService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        Ok(Self {
            relay: RelayService::new(config)?,
        })
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Dual LLM Chat API");

    let config = Config::from_env()?;
    if config.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; queries will fail until a key is provided");
    }

    let app_state = Data::new(AppState::new(&config)?);
    let static_dir = config.static_dir.clone();

    info!("Listening on {}:{}", config.host, config.port);

    // Start web server
    HttpServer::new(move || {
        let mut app = App::new()
            .wrap_fn(|req, srv| recover::catch_panic(req, srv))
            .wrap(Logger::default())
            .app_data(app_state.clone());
        if let Some(dir) = &static_dir {
            app = app.service(fs::Files::new("/static", dir).index_file("index.html"));
        }
        app.configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}
