pub mod common;
pub mod config;
pub mod frontend;
pub mod models;
pub mod services;
