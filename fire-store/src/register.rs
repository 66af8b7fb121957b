//! The register database handle.

#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::{debug, info};
use rusqlite::{Connection, Error as SqliteError, OpenFlags, OptionalExtension, params};
use thiserror::Error;

use fire_core::{CompareOp, EventType, Geometry, IntegerEnumColumn, IntegerEnumError, SpatialValue};

use crate::schema::{SchemaError, initialise_schema, punkt_geometry_column};

/// Errors raised by [`FireDb`] operations.
#[derive(Debug, Error)]
pub enum FireDbError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory {path}")]
    CreateDirectory {
        /// Path of the directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open register database at {path}")]
    Open {
        /// Location of the database file.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Initialising or validating the register schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// An enum-backed column could not map a value or stored code.
    #[error(transparent)]
    EnumColumn(#[from] IntegerEnumError),
    /// The requested sagsevent does not exist.
    #[error("no sagsevent with id {id}")]
    MissingSagsevent {
        /// Identifier that matched no row.
        id: i64,
    },
    /// A SQL statement failed.
    #[error("failed to {operation}")]
    Statement {
        /// The operation being executed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Handle to a register database.
///
/// All geometry traffic is composed through the register's spatial column
/// spec: writes embed the geometry constructor around the bound WKT text,
/// reads embed the to-WKT conversion around the column reference. Event
/// types round through their integer codes the same way.
///
/// The handle owns a single connection; connection pooling and transaction
/// scoping beyond single statements belong to the caller's deployment, not
/// this layer.
pub struct FireDb {
    pub(crate) connection: Connection,
    eventtype_column: IntegerEnumColumn<EventType>,
}

impl std::fmt::Debug for FireDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FireDb").finish_non_exhaustive()
    }
}

impl FireDb {
    /// Create a register database at `path`, initialising the schema.
    ///
    /// Parent directories are created as needed. Opening an existing file is
    /// allowed as long as its schema version matches.
    pub fn create(path: &Utf8Path) -> Result<Self, FireDbError> {
        ensure_parent_dir(path)?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| FireDbError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        info!("created register database at {path}");
        Self::from_connection(connection)
    }

    /// Open an existing register database at `path`.
    ///
    /// Fails when the file does not exist or was written by a different
    /// schema version.
    pub fn open(path: &Utf8Path) -> Result<Self, FireDbError> {
        let connection = Connection::open_with_flags(
            path.as_std_path(),
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| FireDbError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(connection)
    }

    /// Open an in-memory register database, initialising the schema.
    pub fn open_in_memory() -> Result<Self, FireDbError> {
        let connection = Connection::open_in_memory().map_err(|source| FireDbError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self, FireDbError> {
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection,
            eventtype_column: IntegerEnumColumn::new()?,
        })
    }

    /// Insert a case and return its identifier.
    pub fn insert_sag(&mut self, behandler: &str) -> Result<i64, FireDbError> {
        self.connection
            .prepare_cached("INSERT INTO sag (behandler) VALUES (?1)")
            .and_then(|mut statement| statement.execute([behandler]))
            .map_err(|source| FireDbError::Statement {
                operation: "insert sag",
                source,
            })?;
        let id = self.connection.last_insert_rowid();
        debug!("inserted sag {id}");
        Ok(id)
    }

    /// Insert a case event and return its identifier.
    ///
    /// The event type is stored as its integer code.
    pub fn insert_sagsevent(&mut self, sag: i64, eventtype: EventType) -> Result<i64, FireDbError> {
        let code = self.eventtype_column.bind(eventtype)?;
        self.connection
            .prepare_cached("INSERT INTO sagsevent (sag, eventtype) VALUES (?1, ?2)")
            .and_then(|mut statement| statement.execute(params![sag, code]))
            .map_err(|source| FireDbError::Statement {
                operation: "insert sagsevent",
                source,
            })?;
        let id = self.connection.last_insert_rowid();
        debug!("inserted sagsevent {id} for sag {sag}");
        Ok(id)
    }

    /// Insert a point created by the given case event.
    pub fn insert_punkt(&mut self, sagsevent: i64) -> Result<i64, FireDbError> {
        self.connection
            .prepare_cached("INSERT INTO punkt (sagsevent) VALUES (?1)")
            .and_then(|mut statement| statement.execute([sagsevent]))
            .map_err(|source| FireDbError::Statement {
                operation: "insert punkt",
                source,
            })?;
        let id = self.connection.last_insert_rowid();
        debug!("inserted punkt {id}");
        Ok(id)
    }

    /// Set or replace a point's geometry.
    ///
    /// The write statement passes the bound WKT text through the database's
    /// geometry constructor, tagged with the column's dimension and srid, so
    /// the stored value is a structurally valid native geometry. A
    /// [`SpatialValue::Null`] clears the geometry.
    pub fn set_geometri(&mut self, punkt: i64, value: SpatialValue) -> Result<(), FireDbError> {
        let column = punkt_geometry_column();
        let bound = column.bind(value);
        let sql = format!(
            "INSERT OR REPLACE INTO geometriobjekt (punkt, geometri) VALUES (?1, {})",
            column.bind_expression("?2"),
        );
        self.connection
            .prepare_cached(&sql)
            .and_then(|mut statement| statement.execute(params![punkt, bound]))
            .map_err(|source| FireDbError::Statement {
                operation: "persist geometri",
                source,
            })?;
        debug!("persisted geometri for punkt {punkt}");
        Ok(())
    }

    /// Fetch a point's geometry.
    ///
    /// The read statement wraps the column reference in the to-WKT
    /// conversion, and the fetched text is reconstructed under the column's
    /// srid. Returns `None` when the point has no geometry row or the stored
    /// geometry is NULL.
    pub fn fetch_geometri(&self, punkt: i64) -> Result<Option<Geometry>, FireDbError> {
        let column = punkt_geometry_column();
        let sql = format!(
            "SELECT {} FROM geometriobjekt WHERE punkt = ?1",
            column.column_expression("geometri"),
        );
        let wkt: Option<Option<String>> = self
            .connection
            .prepare_cached(&sql)
            .and_then(|mut statement| {
                statement
                    .query_row([punkt], |row| row.get::<_, Option<String>>(0))
                    .optional()
            })
            .map_err(|source| FireDbError::Statement {
                operation: "fetch geometri",
                source,
            })?;
        Ok(column.result(wkt.flatten().as_deref()))
    }

    /// Fetch the event type recorded for a case event.
    ///
    /// A stored code no member of [`EventType`] declares is a
    /// domain/storage mismatch and fails with
    /// [`IntegerEnumError::UnknownCode`] wrapped in
    /// [`FireDbError::EnumColumn`].
    pub fn fetch_eventtype(&self, sagsevent: i64) -> Result<EventType, FireDbError> {
        let code: i64 = self
            .connection
            .prepare_cached("SELECT eventtype FROM sagsevent WHERE id = ?1")
            .and_then(|mut statement| {
                statement.query_row([sagsevent], |row| row.get(0)).optional()
            })
            .map_err(|source| FireDbError::Statement {
                operation: "fetch sagsevent",
                source,
            })?
            .ok_or(FireDbError::MissingSagsevent { id: sagsevent })?;
        Ok(self.eventtype_column.result(code)?)
    }

    /// Find the points whose geometry equals the given value.
    ///
    /// The right-hand operand is coerced to the geometry column's spec
    /// whatever its native form, so a raw WKT string compares the same way a
    /// domain geometry does.
    pub fn find_punkt_by_geometri(&self, value: SpatialValue) -> Result<Vec<i64>, FireDbError> {
        let column = punkt_geometry_column();
        let operand = column.compare_coerce(CompareOp::Eq, value);
        let sql = format!(
            "SELECT punkt FROM geometriobjekt WHERE geometri = {} ORDER BY punkt",
            operand.expression("?1"),
        );
        let map_statement_error = |source| FireDbError::Statement {
            operation: "find punkt by geometri",
            source,
        };
        let mut statement = self
            .connection
            .prepare_cached(&sql)
            .map_err(map_statement_error)?;
        let rows = statement
            .query_map([operand.param()], |row| row.get(0))
            .map_err(map_statement_error)?;
        rows.collect::<Result<Vec<i64>, SqliteError>>()
            .map_err(map_statement_error)
    }
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), FireDbError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = if parent.is_absolute() {
        ("/", parent.strip_prefix("/").unwrap_or(parent))
    } else {
        (".", parent)
    };
    let base_dir = fs_utf8::Dir::open_ambient_dir(base, ambient_authority()).map_err(|source| {
        FireDbError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        }
    })?;
    base_dir
        .create_dir_all(relative)
        .map_err(|source| FireDbError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::open_emulated_in_memory;
    use fire_core::geometry_factory;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn db() -> FireDb {
        open_emulated_in_memory().expect("open emulated register")
    }

    /// A sag, a punkt-oprettet sagsevent, and a punkt.
    #[fixture]
    fn seeded(mut db: FireDb) -> (FireDb, i64) {
        let sag = db.insert_sag("grf").expect("insert sag");
        let sagsevent = db
            .insert_sagsevent(sag, EventType::PunktOprettet)
            .expect("insert sagsevent");
        let punkt = db.insert_punkt(sagsevent).expect("insert punkt");
        (db, punkt)
    }

    #[rstest]
    fn geometry_round_trips_through_the_column_spec(seeded: (FireDb, i64)) {
        let (mut db, punkt) = seeded;
        let geometry = Geometry::new("POINT (10.1 56.2)", 4326);

        db.set_geometri(punkt, SpatialValue::Domain(geometry.clone()))
            .expect("persist geometry");
        let fetched = db.fetch_geometri(punkt).expect("fetch geometry");

        assert_eq!(fetched, Some(geometry));
    }

    #[rstest]
    fn raw_wkt_text_is_stored_like_a_domain_geometry(seeded: (FireDb, i64)) {
        let (mut db, punkt) = seeded;

        db.set_geometri(punkt, SpatialValue::from("POINT (10.1 56.2)"))
            .expect("persist raw WKT");
        let fetched = db.fetch_geometri(punkt).expect("fetch geometry");

        assert_eq!(fetched, Some(geometry_factory("POINT (10.1 56.2)", 4326)));
    }

    #[rstest]
    fn null_geometry_round_trips(seeded: (FireDb, i64)) {
        let (mut db, punkt) = seeded;

        db.set_geometri(punkt, SpatialValue::Null)
            .expect("persist null geometry");

        assert_eq!(db.fetch_geometri(punkt).expect("fetch geometry"), None);
    }

    #[rstest]
    fn missing_geometry_row_reads_as_none(seeded: (FireDb, i64)) {
        let (db, punkt) = seeded;
        assert_eq!(db.fetch_geometri(punkt).expect("fetch geometry"), None);
    }

    #[rstest]
    fn comparison_operands_are_coerced_to_the_column_spec(seeded: (FireDb, i64)) {
        let (mut db, punkt) = seeded;
        let geometry = Geometry::new("POINT (10.1 56.2)", 4326);
        db.set_geometri(punkt, SpatialValue::Domain(geometry.clone()))
            .expect("persist geometry");

        let by_domain = db
            .find_punkt_by_geometri(SpatialValue::Domain(geometry))
            .expect("find by domain geometry");
        let by_raw = db
            .find_punkt_by_geometri(SpatialValue::from("POINT (10.1 56.2)"))
            .expect("find by raw WKT");

        assert_eq!(by_domain, vec![punkt]);
        assert_eq!(by_raw, vec![punkt]);
    }

    #[rstest]
    fn eventtype_round_trips_through_its_code(mut db: FireDb) {
        let sag = db.insert_sag("grf").expect("insert sag");
        let sagsevent = db
            .insert_sagsevent(sag, EventType::KoordinatBeregnet)
            .expect("insert sagsevent");

        assert_eq!(
            db.fetch_eventtype(sagsevent).expect("fetch eventtype"),
            EventType::KoordinatBeregnet,
        );
    }

    #[rstest]
    fn drifted_eventtype_code_is_a_loud_mismatch(mut db: FireDb) {
        let sag = db.insert_sag("grf").expect("insert sag");
        let sagsevent = db
            .insert_sagsevent(sag, EventType::Kommentar)
            .expect("insert sagsevent");
        db.connection
            .execute("UPDATE sagsevent SET eventtype = 99 WHERE id = ?1", [sagsevent])
            .expect("corrupt stored code");

        let error = db
            .fetch_eventtype(sagsevent)
            .expect_err("unknown code should fail");
        assert!(matches!(
            error,
            FireDbError::EnumColumn(IntegerEnumError::UnknownCode { code: 99 }),
        ));
    }

    #[rstest]
    fn fetch_eventtype_reports_missing_rows(db: FireDb) {
        let error = db.fetch_eventtype(999).expect_err("missing row should fail");
        assert!(matches!(error, FireDbError::MissingSagsevent { id: 999 }));
    }

    #[rstest]
    fn punkt_requires_an_existing_sagsevent(mut db: FireDb) {
        let error = db.insert_punkt(12345).expect_err("foreign key should fail");
        assert!(matches!(error, FireDbError::Statement { .. }));
    }

    #[rstest]
    fn create_builds_parent_directories() {
        let dir = TempDir::new().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("nested/register.db"))
            .expect("utf-8 path");

        FireDb::create(&path).expect("create register database");

        assert!(path.exists(), "database should exist at nested path");
    }

    #[rstest]
    fn open_rejects_a_missing_database() {
        let dir = TempDir::new().expect("create temp dir");
        let path =
            Utf8PathBuf::from_path_buf(dir.path().join("absent.db")).expect("utf-8 path");

        let error = FireDb::open(&path).expect_err("missing file should fail");
        assert!(matches!(error, FireDbError::Open { .. }));
    }
}
