use async_trait::async_trait;
use linkcut_core::{BaseUrl, Result, Storage, StorageError, UserUrl};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{info, warn};

const SCHEMA: &str = "public";
const TABLE: &str = "storage";
const TABLE_USERS: &str = "users";
const SEQUENCE: &str = "id_serial";

/// First id issued by a freshly created sequence.
const FIRST_ID: i64 = 1001;

const MAX_CONNECTIONS: u32 = 5;

#[derive(Debug)]
enum Conn {
    Connected(PgPool),
    /// The pool never came up; the stored error is reported by `ping` and
    /// returned by every operation.
    Degraded(StorageError),
}

/// Postgres implementation of the storage contract.
///
/// Id allocation and URL uniqueness are enforced by the database itself: the
/// `id_serial` sequence backs the id column and a unique index on `full_url`
/// resolves concurrent duplicate submissions, so no application-level
/// locking is needed.
#[derive(Debug)]
pub struct PostgresStorage {
    base_url: BaseUrl,
    conn: Conn,
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

impl PostgresStorage {
    /// Creates a storage from an existing connection pool.
    pub fn new(base_url: BaseUrl, pool: PgPool) -> Self {
        Self {
            base_url,
            conn: Conn::Connected(pool),
        }
    }

    /// Opens a new connection pool for `dsn`.
    ///
    /// A connection failure does not abort the process: the storage starts
    /// in a degraded state where `ping` reports the stored error and every
    /// read or write fails explicitly.
    pub async fn connect(base_url: BaseUrl, dsn: &str) -> Self {
        match PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(dsn)
            .await
        {
            Ok(pool) => Self::new(base_url, pool),
            Err(err) => {
                warn!(error = %err, "postgres connection failed, starting degraded");
                Self {
                    base_url,
                    conn: Conn::Degraded(map_sqlx_error(err)),
                }
            }
        }
    }

    fn pool(&self) -> Result<&PgPool> {
        match &self.conn {
            Conn::Connected(pool) => Ok(pool),
            Conn::Degraded(err) => Err(err.clone()),
        }
    }

    /// Ensures the tables and the id sequence exist. Idempotent; run once
    /// at startup, before the storage serves any request.
    ///
    /// Skipped when the pool never connected (the degraded store cannot
    /// verify anything). An actual DDL failure is returned and must abort
    /// startup: serving traffic against an unverified schema is not an
    /// option.
    pub async fn bootstrap(&self) -> Result<()> {
        let pool = match &self.conn {
            Conn::Connected(pool) => pool,
            Conn::Degraded(_) => {
                warn!("skipping schema bootstrap, no database connection");
                return Ok(());
            }
        };

        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {SCHEMA}.{TABLE_USERS} (user_id TEXT PRIMARY KEY)"
        ))
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;

        let table_exists = catalog_entry_exists(pool, "pg_tables", "tablename", TABLE).await?;
        let seq_exists =
            catalog_entry_exists(pool, "pg_sequences", "sequencename", SEQUENCE).await?;

        if !table_exists {
            // A sequence without its table is a leftover; recreate it so the
            // fresh table starts at the reserved offset.
            if seq_exists {
                sqlx::query(&format!("DROP SEQUENCE {SCHEMA}.{SEQUENCE}"))
                    .execute(pool)
                    .await
                    .map_err(map_sqlx_error)?;
            }
            sqlx::query(&format!(
                "CREATE SEQUENCE {SCHEMA}.{SEQUENCE} START WITH {FIRST_ID}"
            ))
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
            sqlx::query(&format!(
                "CREATE TABLE {SCHEMA}.{TABLE} (
                    id BIGINT PRIMARY KEY DEFAULT nextval('{SCHEMA}.{SEQUENCE}'),
                    full_url TEXT NOT NULL,
                    user_id TEXT
                )"
            ))
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
            sqlx::query(&format!(
                "CREATE UNIQUE INDEX {TABLE}_full_url_idx ON {SCHEMA}.{TABLE} (full_url)"
            ))
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
        } else if !seq_exists {
            // The table pre-exists from an older deployment: seed the
            // sequence past every already-issued id.
            let row = sqlx::query(&format!("SELECT max(id) AS max_id FROM {SCHEMA}.{TABLE}"))
                .fetch_one(pool)
                .await
                .map_err(map_sqlx_error)?;
            let max_id: Option<i64> = row.try_get("max_id").map_err(map_sqlx_error)?;
            let start = max_id.map_or(FIRST_ID, |id| id + 1);

            sqlx::query(&format!(
                "CREATE SEQUENCE {SCHEMA}.{SEQUENCE} START WITH {start}"
            ))
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
            sqlx::query(&format!(
                "ALTER TABLE {SCHEMA}.{TABLE} \
                 ALTER COLUMN id SET DEFAULT nextval('{SCHEMA}.{SEQUENCE}')"
            ))
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
        }

        info!("database schema is ready");
        Ok(())
    }
}

async fn catalog_entry_exists(
    pool: &PgPool,
    catalog: &str,
    name_column: &str,
    name: &str,
) -> Result<bool> {
    let row = sqlx::query(&format!(
        "SELECT true FROM pg_catalog.{catalog} WHERE schemaname = $1 AND {name_column} = $2"
    ))
    .bind(SCHEMA)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(map_sqlx_error)?;

    Ok(row.is_some())
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn add_url(&self, url: &str, user: &str) -> Result<String> {
        let pool = self.pool()?;

        if !user.is_empty() {
            sqlx::query(&format!(
                "INSERT INTO {SCHEMA}.{TABLE_USERS} (user_id) VALUES ($1) \
                 ON CONFLICT (user_id) DO NOTHING"
            ))
            .bind(user)
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
        }

        let inserted = sqlx::query(&format!(
            "INSERT INTO {SCHEMA}.{TABLE} (full_url, user_id) VALUES ($1, $2) \
             ON CONFLICT (full_url) DO NOTHING \
             RETURNING id"
        ))
        .bind(url)
        .bind(user)
        .fetch_optional(pool)
        .await
        .map_err(map_sqlx_error)?;

        let id: i64 = match inserted {
            Some(row) => row.try_get("id").map_err(map_sqlx_error)?,
            // The URL is already stored, possibly by a concurrent caller
            // that won the insert race; the existing id is the answer.
            None => sqlx::query(&format!(
                "SELECT id FROM {SCHEMA}.{TABLE} WHERE full_url = $1"
            ))
            .bind(url)
            .fetch_one(pool)
            .await
            .map_err(map_sqlx_error)?
            .try_get("id")
            .map_err(map_sqlx_error)?,
        };

        Ok(self.base_url.join(id))
    }

    async fn search_url(&self, id: i64) -> Result<String> {
        let pool = self.pool()?;

        let row = sqlx::query(&format!("SELECT full_url FROM {SCHEMA}.{TABLE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StorageError::NotFound(id));
        };

        row.try_get("full_url").map_err(map_sqlx_error)
    }

    async fn urls_for_user(&self, user: &str) -> Result<Vec<UserUrl>> {
        let pool = self.pool()?;

        let rows = sqlx::query(&format!(
            "SELECT id, full_url FROM {SCHEMA}.{TABLE} WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user)
        .fetch_all(pool)
        .await
        .map_err(map_sqlx_error)?;

        if rows.is_empty() {
            return Err(StorageError::NoContent(user.to_owned()));
        }

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
            let original_url: String = row.try_get("full_url").map_err(map_sqlx_error)?;
            entries.push(UserUrl {
                short_url: self.base_url.join(id),
                original_url,
            });
        }
        Ok(entries)
    }

    async fn ping(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
