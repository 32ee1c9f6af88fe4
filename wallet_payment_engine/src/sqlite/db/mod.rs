//! # SQLite database methods
//!
//! This module contains the low-level SQLite interactions.
//!
//! All interactions are maintained as simple functions (rather than stateful structs) that accept
//! a `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an
//! atomic transaction as the need arises, and call through to these functions without any other
//! changes.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod clients;
pub mod wallets;

const SQLITE_DB_URL: &str = "sqlite://data/wallet_store.db";

pub fn db_url() -> String {
    let result = env::var("PWG_DATABASE_URL").unwrap_or_else(|_| {
        info!("PWG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
