//! Database layer for T&C Guard
//!
//! Provides:
//! - MongoDB client wrapper with explicit lifecycle
//! - Generic repository pattern for data access
//! - Persisted entity models

pub mod models;
mod repository;

pub use repository::{BaseRepository, Page, PageQuery};

use bson::doc;
use mongodb::{Client, Database};
use tracing::info;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// MongoDB handle created once at startup and shared across requests.
/// The driver pools connections internally; this wrapper only owns the
/// lifecycle (connect + ping at startup, shutdown at exit).
#[derive(Clone)]
pub struct MongoDb {
    client: Client,
    database: Database,
}

impl MongoDb {
    /// Connect and verify the connection with a ping
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let uri = config.mongo_uri()?;
        info!(
            uri = %config.database.redacted_uri(&uri),
            "Connecting to MongoDB"
        );

        // Bound server selection so an unreachable MongoDB fails fast
        let timeout_uri = if uri.contains('?') {
            format!("{uri}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        } else {
            format!("{uri}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect to MongoDB: {e}"),
            })?;

        let database = client.database(&config.database.name);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("MongoDB ping failed: {e}"),
            })?;

        info!(database = %config.database.name, "Connected to MongoDB");

        Ok(Self { client, database })
    }

    /// The database handle repositories are built from
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("MongoDB ping failed: {e}"),
            })?;
        Ok(())
    }

    /// Gracefully shut the client down at process exit
    pub async fn close(self) {
        info!("Closing MongoDB client");
        self.client.shutdown().await;
    }
}
