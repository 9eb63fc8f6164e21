//! Embedded schema migrations.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps compiled into the binary.
//! - Bring a connection from its recorded version up to `latest_version()`.
//!
//! # Invariants
//! - Step versions are strictly increasing, starting at 1.
//! - All pending steps run inside one transaction; a failure leaves the
//!   schema untouched.
//! - The applied version is recorded in `PRAGMA user_version`.
//!
//! # See also
//! - `0001_accounts.sql`, `0002_notes.sql`, `0003_news.sql`

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "accounts",
        sql: include_str!("0001_accounts.sql"),
    },
    SchemaStep {
        version: 2,
        name: "notes",
        sql: include_str!("0002_notes.sql"),
    },
    SchemaStep {
        version: 3,
        name: "news",
        sql: include_str!("0003_news.sql"),
    },
];

/// Returns the newest schema version this build knows how to produce.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Applies every step newer than the connection's recorded version.
///
/// Returns how many steps were applied (0 when already current).
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the database was written by a
///   newer build.
/// - `DbError::Sqlite` when a step fails; the transaction is rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let recorded = recorded_version(conn)?;
    let latest = latest_version();

    if recorded > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: recorded,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > recorded)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    Ok(pending.len())
}

fn recorded_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}
