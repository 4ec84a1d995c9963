use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use blocklist::BlockedPatterns;
use redirector::Redirector;
use std::sync::Arc;

mod anonymize;
mod blocklist;
mod config;
mod redirector;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = config::Config::from_env().context("Failed to load configuration")?;

    env_logger::Builder::new()
        .filter_level(config.log_level.into())
        .init();

    let blocked = BlockedPatterns::for_config(&config);
    let redirector = Arc::new(Redirector::new(&config, blocked));
    redirector.log_startup(&config);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(redirector.clone()))
            .default_service(web::to(routes::handle))
    })
    .bind(("0.0.0.0", config.port))
    .with_context(|| format!("Failed to bind port {}", config.port))?
    .run()
    .await?)
}
