use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use mini_tracker::{routes, AppState, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Reads `.env` first so RUST_LOG from it applies to the logger.
    let config = Config::from_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config.map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let state = AppState::from_config(&config).await.map_err(|e| {
        log::error!("Failed to start server: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    log::info!(
        "Task cache {}",
        if state.tasks.cache().is_available() {
            "enabled"
        } else {
            "unavailable"
        }
    );

    let data = web::Data::new(state);
    log::info!("Starting mini-tracker at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
            .default_service(web::to(routes::not_found))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
