//! Storage and network side of the Loto Más toolkit.
//!
//! Persists drawings and the played-combinations ledger in SQLite, imports
//! history from a CSV file or the results site, and wires both into the
//! generation and match-detection passes of `loto-combora`.

use std::path::PathBuf;
use std::sync::LazyLock;

pub mod config;
pub mod db;
pub mod models;
pub mod service;
pub mod source;

pub use config::LotoConfig;
pub use db::{DbConnection, DbPool, create_pool};

/// Result of loading `.env`, resolved once per process.
pub static ENV_GUARD: LazyLock<dotenvy::Result<PathBuf>> = LazyLock::new(dotenvy::dotenv);

/// Load `.env` and initialise logging. `RUST_LOG`, when set, wins over `level`.
pub fn setup(level: Option<log::LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        if let Some(level) = level {
            builder.filter_level(level);
        }
    }
    if builder.try_init().is_err() {
        log::debug!("Logger already initialised");
    }

    match ENV_GUARD.as_ref() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) => log::debug!("No .env file loaded: {e}"),
    }
}
