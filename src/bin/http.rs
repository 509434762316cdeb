#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use calendar_backend::{AppConfig, CalendarService, http_api, logging, open_store};

    let config = AppConfig::from_env()?;
    logging::init_with_level(&config.log_level);

    let store = open_store(&config.store)?;
    let service = CalendarService::new(store, config.clock());
    tracing::info!(store = service.store_name(), "opened event store");
    http_api::serve(config.http_addr, service).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
