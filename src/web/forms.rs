use serde::Deserialize;

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub secret: Option<String>,
    pub id: Option<String>,
}

/// htmx chat widget submission.
#[derive(Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}
