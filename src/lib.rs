pub mod clients;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use error::{AppError, Result};
pub use state::Services;
