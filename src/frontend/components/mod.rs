pub mod cards;
pub mod media;

pub use cards::{render_card, render_feature, PostCardView};
pub use media::{image_url, ImageView, LinkView, IMAGE_ENDPOINT};
