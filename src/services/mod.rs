pub mod auth;
pub mod chat;
pub mod graphql;
pub mod image;
pub mod pages;
pub mod queries;

pub use auth::{Authorized, TokenManager};
pub use chat::ChatProxy;
pub use graphql::{ContentSource, GraphqlClient};
pub use image::{ImageProxy, ImageRequest};
pub use pages::{classify_segment, Assembled, PageAssembler};
