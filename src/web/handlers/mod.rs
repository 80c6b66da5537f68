pub mod api;
pub mod chat;
pub mod preview;
pub mod public;

use actix_web::web;

/// Configure all routes EXCEPT the catch-all slug route.
/// The catch-all must be registered last so specific routes match first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    api::configure(cfg);
    preview::configure(cfg);
    chat::configure(cfg);
    public::configure(cfg);
}

/// Configure the catch-all slug route. This MUST be called last.
pub fn configure_catch_all(cfg: &mut web::ServiceConfig) {
    cfg.service(public::by_slug);
}
