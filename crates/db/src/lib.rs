//! PostgreSQL persistence for the events and comments services.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod event_store;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Postgres SQLSTATE `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

/// Parse `database_url` and make the server cancel any statement that runs
/// longer than `statement_timeout`.
///
/// The caller-side timeout only stops waiting. The server-side limit makes
/// a statement that outlives it roll back instead of committing later.
pub fn connect_options(
    database_url: &str,
    statement_timeout: Duration,
) -> Result<PgConnectOptions, sqlx::Error> {
    let options: PgConnectOptions = database_url.parse()?;
    Ok(options.options([(
        "statement_timeout",
        format!("{}", statement_timeout.as_millis()),
    )]))
}

/// Create a connection pool from a database URL.
pub async fn create_pool(
    database_url: &str,
    statement_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect_with(connect_options(database_url, statement_timeout)?)
        .await
}

/// Create a pool that connects on first use.
///
/// Used when events live in memory: the comments routes still need a pool,
/// but startup must not block on the database.
pub fn create_lazy_pool(
    database_url: &str,
    statement_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    Ok(PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(connect_options(database_url, statement_timeout)?))
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// `true` for errors that mean the database could not be reached, as opposed
/// to a query it rejected.
pub fn is_connectivity_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// `true` when the server cancelled a statement at `statement_timeout`.
pub fn is_statement_timeout(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(QUERY_CANCELED),
        _ => false,
    }
}
