use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};

use pressx_front::config::AppConfig;

use crate::web::AppState;

pub const FRESH_TOKEN: &str = "fresh-token";
pub const BOT_USERNAME: &str = "preview-bot";
pub const PREVIEW_SECRET: &str = "s3cret";

pub fn state(vars: &[(&str, &str)]) -> web::Data<AppState> {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = AppConfig::from_lookup(|key| {
        vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    })
    .expect("valid config");
    web::Data::new(AppState::new(config).expect("http client"))
}

/// State wired to a fake CMS, with preview enabled and bot credentials.
pub fn cms_state(base: &str, username: &str) -> web::Data<AppState> {
    state(&[
        ("WORDPRESS_URL", base),
        ("PREVIEW_MODE", "true"),
        ("WORDPRESS_PREVIEW_SECRET", PREVIEW_SECRET),
        ("WORDPRESS_PREVIEW_USERNAME", username),
        ("WORDPRESS_PREVIEW_PASSWORD", "hunter2"),
        ("COOKIE_SECURE", "false"),
    ])
}

async fn graphql(req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    let query = body["query"].as_str().unwrap_or_default();
    let variables = &body["variables"];

    if query.contains("mutation Login") {
        if variables["username"] != BOT_USERNAME {
            return HttpResponse::Ok().json(json!({
                "data": { "login": null },
                "errors": [{ "message": "invalid_username" }]
            }));
        }
        return HttpResponse::Ok().json(json!({
            "data": { "login": {
                "authToken": FRESH_TOKEN,
                "user": { "databaseId": 7, "name": "Preview Bot" }
            } }
        }));
    }

    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if bearer != format!("Bearer {FRESH_TOKEN}") {
        return HttpResponse::Forbidden()
            .json(json!({ "message": "Expired token" }));
    }

    let data = if query.contains("query Landing") && variables["id"] == "123" {
        json!({ "landing": {
            "databaseId": 123,
            "title": "Spring launch",
            "slug": "spring",
            "uri": "/landing/spring/",
            "sections": [{ "type": "hero", "heading": "Draft hero" }]
        } })
    } else if query.contains("query Post") {
        json!({ "post": null })
    } else if query.contains("query Page") {
        json!({ "page": null })
    } else {
        json!({ "landing": null })
    };

    HttpResponse::Ok().json(json!({ "data": data }))
}

/// Starts a stand-in CMS on an ephemeral port and returns its base URL.
pub fn spawn_cms() -> String {
    let server = HttpServer::new(|| {
        App::new().route("/graphql", web::post().to(graphql))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind fake cms");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}
