#![doc = "The `mini_tracker` library crate."]
#![doc = ""]
#![doc = "A small task tracker API: signup and login with bearer tokens, and per-user"]
#![doc = "task CRUD whose list endpoint is served through a cache-aside task cache."]
#![doc = "The binary (`main.rs`) reads `Config`, builds an `AppState` and serves `routes::config`."]

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
