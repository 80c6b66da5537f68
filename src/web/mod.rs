pub mod forms;
pub mod handlers;
pub mod helpers;
pub mod middleware;
pub mod security;
pub mod state;
pub mod templates;

#[cfg(test)]
pub mod test_support;

pub use state::AppState;
