pub use auth::*;
pub use chat::*;
pub use content::*;
pub use content_kind::*;
pub use media::*;
pub use menu::*;
pub use section::*;

mod auth;
mod chat;
mod content;
mod content_kind;
mod media;
mod menu;
mod section;

use serde::{Deserialize, Deserializer};

/// GraphQL sends `null` for empty lists and strings; treat it as the type's
/// default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
