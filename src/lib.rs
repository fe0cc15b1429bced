pub mod config;
pub mod constants;
pub mod db;
pub mod handlers;
pub mod mason;
pub mod models;
pub mod routes;
pub mod utils;

use sqlx::SqlitePool;

/// Shared handler state. The pool is the only thing requests share; every
/// handler opens its own transaction from it.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}
