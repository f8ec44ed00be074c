use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Pool sizing and the bound on how long any store access may wait
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub max_connections: u32,
    pub timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            timeout: Duration::from_secs(5),
        }
    }
}

/// DbConnection manages the SQLite pool backing the record store
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str, settings: &StoreSettings) -> Result<Self> {
        let in_memory = Self::is_in_memory(url);

        let mut options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .busy_timeout(settings.timeout);

        // WAL lets listings proceed while an intake is writing
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.timeout);

        // A shared-cache memory database disappears with its last connection,
        // and concurrent writers on it fail with SQLITE_LOCKED instead of
        // waiting, so keep exactly one long-lived connection.
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", url))?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database with a unique name
    pub async fn init_in_memory() -> Result<Self> {
        let db_id = uuid::Uuid::new_v4().simple().to_string();
        let db_url = format!("sqlite:file:memdb_{}?mode=memory&cache=shared", db_id);

        Self::new(&db_url, &StoreSettings::default()).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every connection; later queries fail as if the store were unreachable
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn is_in_memory(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS children (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                child_name TEXT NOT NULL CHECK (length(child_name) > 0),
                parent_id TEXT NOT NULL CHECK (length(parent_id) > 0),
                parent_email TEXT NOT NULL CHECK (length(parent_email) > 0),
                gender TEXT NOT NULL DEFAULT '',
                dob TEXT NOT NULL CHECK (length(dob) = 10),
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create children table")?;

        Ok(())
    }
}
