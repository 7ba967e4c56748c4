use async_trait::async_trait;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::Row;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::MoodStore;
use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::MoodEntry;

const MOOD_COLUMNS: &str = "id, score, note, tags, date, owner_id";

/// PostgreSQL-backed mood store.
/// Holds a deadpool `Pool`; each operation borrows one connection for a single statement.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Build the connection pool and verify connectivity before serving traffic.
    ///
    /// # Arguments
    /// * `config` - The database configuration
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!("Creating PostgreSQL connection pool for host: {}:{}", config.host, config.port);

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.test_connection().await?;

        Ok(db)
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);
        pg_config.connect_timeout = Some(config.connection_timeout);

        pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
            "disable" => deadpool_postgres::SslMode::Disable,
            "allow" | "prefer" => deadpool_postgres::SslMode::Prefer,
            "require" | "verify-ca" | "verify-full" => deadpool_postgres::SslMode::Require,
            other => {
                warn!("Unknown SSL mode '{}', defaulting to 'require'", other);
                deadpool_postgres::SslMode::Require
            }
        });

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let mut pool_config = deadpool_postgres::PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::Database(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::Database(format!("Connection pool creation failed: {}", e))
        })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database connection test failed: {}", e);
            ApiError::Database(format!("Connection test failed: {}", e))
        })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// Create the `moods` table and its owner/date index if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let moods_table = r#"
            CREATE TABLE IF NOT EXISTS moods (
                id UUID PRIMARY KEY,
                score INTEGER NOT NULL CHECK (score BETWEEN 1 AND 10),
                note TEXT,
                tags TEXT[] NOT NULL DEFAULT '{}',
                date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                owner_id TEXT NOT NULL CHECK (owner_id <> '')
            )
        "#;

        client.execute(moods_table, &[]).await.map_err(|e| {
            error!("Failed to create moods table: {}", e);
            ApiError::Database(format!("Moods table creation failed: {}", e))
        })?;

        let owner_date_index =
            "CREATE INDEX IF NOT EXISTS idx_moods_owner_date ON moods(owner_id, date DESC)";
        client.execute(owner_date_index, &[]).await.map_err(|e| {
            error!("Failed to create moods owner/date index: {}", e);
            ApiError::Database(format!("Moods owner/date index creation failed: {}", e))
        })?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

fn row_to_entry(row: &Row) -> MoodEntry {
    MoodEntry {
        id: row.get(0),
        score: row.get(1),
        note: row.get(2),
        tags: row.get(3),
        date: row.get(4),
        owner_id: row.get(5),
    }
}

#[async_trait]
impl MoodStore for Database {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<MoodEntry>, ApiError> {
        let client = self.get_connection().await?;
        let query = format!(
            "SELECT {} FROM moods WHERE owner_id = $1 ORDER BY date DESC",
            MOOD_COLUMNS
        );

        let rows = client.query(query.as_str(), &[&owner_id]).await.map_err(ApiError::from)?;

        Ok(rows.iter().map(row_to_entry).collect())
    }

    async fn insert(&self, entry: MoodEntry) -> Result<MoodEntry, ApiError> {
        entry.validate().map_err(ApiError::Validation)?;

        let client = self.get_connection().await?;
        let query = format!(
            "INSERT INTO moods ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            cols = MOOD_COLUMNS
        );

        let row = client
            .query_one(
                query.as_str(),
                &[&entry.id, &entry.score, &entry.note, &entry.tags, &entry.date, &entry.owner_id],
            )
            .await
            .map_err(ApiError::from)?;

        let created = row_to_entry(&row);
        info!("Created mood entry with id: {}", created.id);
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MoodEntry>, ApiError> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {} FROM moods WHERE id = $1", MOOD_COLUMNS);

        let row = client.query_opt(query.as_str(), &[&id]).await.map_err(ApiError::from)?;

        Ok(row.as_ref().map(row_to_entry))
    }

    async fn update(&self, entry: &MoodEntry) -> Result<MoodEntry, ApiError> {
        entry.validate().map_err(ApiError::Validation)?;

        let client = self.get_connection().await?;
        let query = format!(
            "UPDATE moods SET score = $1, note = $2, tags = $3 WHERE id = $4 RETURNING {}",
            MOOD_COLUMNS
        );

        let row = client
            .query_opt(query.as_str(), &[&entry.score, &entry.note, &entry.tags, &entry.id])
            .await
            .map_err(ApiError::from)?;

        match row {
            Some(row) => {
                let updated = row_to_entry(&row);
                info!("Updated mood entry with id: {}", updated.id);
                Ok(updated)
            }
            None => Err(ApiError::not_found("Mood")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let client = self.get_connection().await?;

        let rows_affected = client
            .execute("DELETE FROM moods WHERE id = $1", &[&id])
            .await
            .map_err(ApiError::from)?;

        Ok(rows_affected > 0)
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database health check failed: {}", e);
            ApiError::Database(format!("Health check failed: {}", e))
        })?;

        Ok(())
    }

    async fn close(&self) {
        info!("Closing PostgreSQL connection pool");
        self.pool.close();
    }
}
