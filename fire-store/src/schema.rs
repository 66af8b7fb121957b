//! Register schema initialisation.

#![forbid(unsafe_code)]

use fire_core::{GeometryColumn, GeometryKind};
use rusqlite::{Connection, Error as SqliteError, OptionalExtension};
use thiserror::Error;

/// Version of the register schema this crate writes and expects.
pub const SCHEMA_VERSION: i64 = 1;

/// Column spec for `geometriobjekt.geometri`.
///
/// Point locations are two-dimensional WGS84 positions; the spec is declared
/// once here and shared by DDL generation and the read/write paths.
pub const fn punkt_geometry_column() -> GeometryColumn {
    GeometryColumn::new(GeometryKind::Point, Some(2), 4326)
}

/// Initialise the register schema inside an existing SQLite database.
///
/// Enables foreign keys, creates the tables and indexes inside one
/// transaction, and records the schema version. Existing databases must
/// already match the expected version; mismatches are rejected so upgrades
/// stay explicit.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use fire_store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create register schema");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM fire_schema_version LIMIT 1", [], |row| {
///         row.get(0)
///     })
///     .expect("read schema version");
/// assert_eq!(version, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_register_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_register_tables(transaction: &rusqlite::Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create sag",
        "CREATE TABLE IF NOT EXISTS sag (
            id INTEGER PRIMARY KEY,
            behandler TEXT NOT NULL CHECK (length(trim(behandler)) > 0)
        )",
    )?;
    run_migration_step(
        transaction,
        "create sagsevent",
        "CREATE TABLE IF NOT EXISTS sagsevent (
            id INTEGER PRIMARY KEY,
            sag INTEGER NOT NULL REFERENCES sag(id) ON DELETE CASCADE,
            eventtype INTEGER NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create punkt",
        "CREATE TABLE IF NOT EXISTS punkt (
            id INTEGER PRIMARY KEY,
            sagsevent INTEGER NOT NULL REFERENCES sagsevent(id)
        )",
    )?;
    // The geometry column's declared type comes from the column spec, so the
    // DDL names the precise spatial subtype rather than a generic GEOMETRY.
    let geometriobjekt = format!(
        "CREATE TABLE IF NOT EXISTS geometriobjekt (
            punkt INTEGER PRIMARY KEY REFERENCES punkt(id) ON DELETE CASCADE,
            geometri {}
        )",
        punkt_geometry_column().col_spec(),
    );
    run_migration_step(transaction, "create geometriobjekt", &geometriobjekt)
}

fn create_indexes(transaction: &rusqlite::Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index sagsevent",
        "CREATE INDEX IF NOT EXISTS idx_sagsevent_sag ON sagsevent(sag)",
    )?;
    run_migration_step(
        transaction,
        "index punkt",
        "CREATE INDEX IF NOT EXISTS idx_punkt_sagsevent ON punkt(sagsevent)",
    )
}

fn ensure_schema_version(transaction: &rusqlite::Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS fire_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row("SELECT version FROM fire_schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO fire_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &rusqlite::Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the register schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Enabling SQLite foreign keys failed.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A migration step failed to execute.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// The step that failed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was written by a different schema version.
    #[error("expected register schema version {expected} but found {found}")]
    VersionMismatch {
        /// Version this crate expects.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}
