//! # CareDesk DB
//!
//! Database pool initialization for the CareDesk API, backed by SQLx and
//! PostgreSQL.

use std::env;

use sqlx::postgres::PgPoolOptions;

/// Initializes a PostgreSQL connection pool.
///
/// Reads the connection string from `DATABASE_URL` and an optional pool size
/// from `DATABASE_MAX_CONNECTIONS` (default 10). The returned pool is cheaply
/// cloneable and should be stored in the application state.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database cannot be reached.
/// This is called once at startup, before the server accepts traffic.
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
