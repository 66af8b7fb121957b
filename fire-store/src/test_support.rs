//! Test-only emulation of the spatial SQL functions.
//!
//! Production deployments load SpatiaLite, which provides `GeomFromText`,
//! `AsText` and the dimension casts natively. The emulations here keep the
//! suite runnable on the bundled SQLite: a "native" geometry is stored as
//! `SRID=<srid>;<wkt>` text, converted back by stripping the prefix, and the
//! casts are identity functions. NULL propagates through every function,
//! matching the native behaviour.

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::{Connection, Error as SqliteError};

use crate::register::{FireDb, FireDbError};

fn flags() -> FunctionFlags {
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC
}

/// Register emulated spatial functions on a connection.
pub fn register_spatial_functions(connection: &Connection) -> Result<(), SqliteError> {
    connection.create_scalar_function("GeomFromText", 2, flags(), |ctx| {
        let wkt: Option<String> = ctx.get(0)?;
        let srid: i64 = ctx.get(1)?;
        Ok(wkt.map(|text| format!("SRID={srid};{text}")))
    })?;
    connection.create_scalar_function("GeomFromText", 1, flags(), |ctx| {
        let wkt: Option<String> = ctx.get(0)?;
        Ok(wkt.map(|text| format!("SRID=-1;{text}")))
    })?;
    connection.create_scalar_function("AsText", 1, flags(), |ctx| {
        let geometry: Option<String> = ctx.get(0)?;
        Ok(geometry.map(|value| {
            let stripped = value.split_once(';').map(|(_, wkt)| wkt.to_owned());
            stripped.unwrap_or(value)
        }))
    })?;
    connection.create_scalar_function("CastToXY", 1, flags(), passthrough)?;
    connection.create_scalar_function("CastToXYZ", 1, flags(), passthrough)?;
    Ok(())
}

fn passthrough(ctx: &Context<'_>) -> Result<Option<String>, SqliteError> {
    ctx.get(0)
}

/// Open an in-memory register with the emulated spatial functions installed.
pub fn open_emulated_in_memory() -> Result<FireDb, FireDbError> {
    let db = FireDb::open_in_memory()?;
    register_spatial_functions(&db.connection).map_err(|source| FireDbError::Statement {
        operation: "register emulated spatial functions",
        source,
    })?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn constructor_and_conversion_are_inverse() {
        let db = open_emulated_in_memory().expect("open emulated register");
        let wkt: String = db
            .connection
            .query_row(
                "SELECT AsText(CastToXY(GeomFromText('POINT (1 2)', 4326)))",
                [],
                |row| row.get(0),
            )
            .expect("round trip through emulated functions");
        assert_eq!(wkt, "POINT (1 2)");
    }

    #[rstest]
    fn null_propagates_through_every_function() {
        let db = open_emulated_in_memory().expect("open emulated register");
        let value: Option<String> = db
            .connection
            .query_row(
                "SELECT AsText(CastToXYZ(GeomFromText(NULL, 4326)))",
                [],
                |row| row.get(0),
            )
            .expect("null round trip");
        assert_eq!(value, None);
    }
}
