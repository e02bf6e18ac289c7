use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::{MemoryStore, PgStore, Store, StoreError};
use crate::config::{AppConfig, DatabaseConfig, Environment};

/// Schema for the Postgres backend. Statements are idempotent.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS movies (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        genre_name TEXT NOT NULL,
        genre_description TEXT NOT NULL,
        director_name TEXT NOT NULL,
        director_bio TEXT NOT NULL,
        director_birth DATE,
        director_death DATE,
        image_url TEXT,
        release TEXT,
        featured BOOLEAN NOT NULL DEFAULT FALSE,
        actors TEXT[] NOT NULL DEFAULT '{}'
    )",
    "CREATE INDEX IF NOT EXISTS movies_title_idx ON movies (title)",
    "CREATE INDEX IF NOT EXISTS movies_genre_name_idx ON movies (genre_name)",
    "CREATE INDEX IF NOT EXISTS movies_director_name_idx ON movies (director_name)",
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL CONSTRAINT users_username_key UNIQUE,
        password TEXT NOT NULL,
        email TEXT NOT NULL CONSTRAINT users_email_key UNIQUE,
        birthday DATE,
        favorite_movies UUID[] NOT NULL DEFAULT '{}',
        to_watch UUID[] NOT NULL DEFAULT '{}'
    )",
    "CREATE TABLE IF NOT EXISTS beers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        style TEXT,
        abv DOUBLE PRECISION,
        categories TEXT[] NOT NULL DEFAULT '{}',
        malts TEXT[] NOT NULL DEFAULT '{}',
        hops TEXT[] NOT NULL DEFAULT '{}',
        flavor_notes TEXT[] NOT NULL DEFAULT '{}'
    )",
    "CREATE TABLE IF NOT EXISTS breweries (
        id UUID PRIMARY KEY,
        company_name TEXT NOT NULL,
        owner TEXT,
        admins UUID[] NOT NULL DEFAULT '{}',
        staff UUID[] NOT NULL DEFAULT '{}',
        beers UUID[] NOT NULL DEFAULT '{}',
        categories TEXT[] NOT NULL DEFAULT '{}'
    )",
];

/// Owns the Postgres pool and the schema.
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Connect using `DATABASE_URL` and the pool settings from config.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!(max_connections = config.max_connections, "Connected to database");
        Ok(Self { pool })
    }

    /// Create tables and indexes that do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!(statements = SCHEMA.len(), "Database schema is up to date");
        Ok(())
    }

    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }

    pub async fn close(self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Pick the backend for `config`: Postgres when a URL is configured, the
    /// in-memory store otherwise (development only).
    pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn Store>, StoreError> {
        if config.database.url.is_none() {
            if config.environment != Environment::Development {
                return Err(StoreError::ConfigMissing("DATABASE_URL"));
            }
            warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            return Ok(Arc::new(MemoryStore::new()));
        }

        let manager = Self::connect(&config.database).await?;
        if config.database.auto_migrate {
            manager.migrate().await?;
        }
        Ok(Arc::new(manager.store()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_constraints_are_named_for_conflict_mapping() {
        let users = SCHEMA.iter().find(|s| s.contains("TABLE IF NOT EXISTS users")).unwrap();
        assert!(users.contains("CONSTRAINT users_username_key UNIQUE"));
        assert!(users.contains("CONSTRAINT users_email_key UNIQUE"));
    }

    #[tokio::test]
    async fn missing_url_outside_development_is_an_error() {
        let config = AppConfig::production();
        let result = DatabaseManager::open_store(&config).await;
        assert!(matches!(result, Err(StoreError::ConfigMissing("DATABASE_URL"))));
    }

    #[tokio::test]
    async fn missing_url_in_development_falls_back_to_memory() {
        let config = AppConfig::development();
        let store = DatabaseManager::open_store(&config).await.unwrap();
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn connect_without_url_reports_missing_config() {
        let config = AppConfig::development().database;
        assert!(matches!(
            DatabaseManager::connect(&config).await,
            Err(StoreError::ConfigMissing("DATABASE_URL"))
        ));
    }
}
