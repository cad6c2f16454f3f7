pub mod args;
pub mod auth;
pub mod classify;
pub mod db;
pub mod domain;
pub mod export;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod summary;

use sqlx::SqlitePool;

pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_secret: String,
    pub classifier_url: String,
    pub classifier_api_key: Option<String>,
    pub classifier_timeout: u64,
}
