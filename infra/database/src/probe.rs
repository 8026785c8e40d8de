//! Connectivity probes behind `GET /db-test` and `GET /db-test-session`.

use crate::error::DatabaseError;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sqlx::{Connection, MySqlConnection};
use std::time::Duration;
use tracing::{debug, instrument};

const PROBE_SQL: &str = "SELECT 1 AS value";

/// Opens a fresh driver connection (no pool, no ORM), runs `SELECT 1` and closes it.
#[instrument(skip_all)]
pub async fn probe_direct(url: &str, timeout: Duration) -> Result<(), DatabaseError> {
    let connect = MySqlConnection::connect(url);
    let mut conn = tokio::time::timeout(timeout, connect)
        .await
        .map_err(|_| DatabaseError::Connection {
            message: format!("timed out after {}s", timeout.as_secs()).into(),
            context: None,
        })?
        .map_err(|e| connection_failed(&e))?;

    let value = sqlx::query_scalar::<_, i64>(PROBE_SQL)
        .fetch_one(&mut conn)
        .await
        .map_err(|e| connection_failed(&e))?;

    if let Err(e) = conn.close().await {
        debug!(error = %e, "Probe connection did not close cleanly");
    }

    expect_one(Some(value))
}

/// Runs `SELECT 1` through a pooled ORM session.
#[instrument(skip_all)]
pub async fn probe_session(conn: &DatabaseConnection) -> Result<(), DatabaseError> {
    let backend = conn.get_database_backend();
    let row = conn
        .query_one(Statement::from_string(backend, PROBE_SQL))
        .await
        .map_err(|e| connection_failed(&e))?;

    let value = match row {
        Some(row) => Some(row.try_get::<i64>("", "value").map_err(|e| connection_failed(&e))?),
        None => None,
    };

    expect_one(value)
}

fn expect_one(value: Option<i64>) -> Result<(), DatabaseError> {
    if value == Some(1) { Ok(()) } else { Err(DatabaseError::UnexpectedResult { value }) }
}

fn connection_failed(err: &impl std::fmt::Display) -> DatabaseError {
    DatabaseError::Connection { message: err.to_string().into(), context: None }
}
