//! Backend for a restaurant table-reservation platform. Diners browse
//! restaurants and submit booking requests; restaurant staff manage
//! floor tables and drive each booking through its lifecycle
//! (pending, confirmed, cancelled, plus arrival tracking).

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
}
