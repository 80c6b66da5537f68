mod web;

use actix_files::Files;
use actix_web::web::Data;
use actix_web::{middleware::Logger, App, HttpServer};
use tracing_subscriber::EnvFilter;

use pressx_front::config::AppConfig;

use crate::web::middleware::SecurityHeaders;
use crate::web::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("pressx_front=info,actix_web=info")
            }),
        )
        .init();

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    if config.cms_url.is_none() {
        log::warn!(
            "WORDPRESS_URL is not set; every CMS-backed route will render not found"
        );
    }

    let bind_addr = config.bind_addr.clone();
    let csp_origin = config.cms_url.clone();
    let state = AppState::new(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let state = Data::new(state);

    log::info!("Listening on {bind_addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(SecurityHeaders::new(csp_origin.as_deref()))
            .wrap(Logger::default())
            .service(Files::new("/static", "./static").prefer_utf8(true))
            .configure(web::handlers::configure)
            .configure(web::handlers::configure_catch_all)
    })
    .bind(bind_addr)?
    .run()
    .await
}
