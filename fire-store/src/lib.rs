//! SQLite-backed persistence for the FIRE reference-point register.
//!
//! The store composes its read and write statements through the column specs
//! in `fire-core`: geometry writes pass the bound WKT text through the
//! database's geometry constructor, geometry reads wrap the column reference
//! in the native to-WKT conversion, and event types round through their
//! integer codes. Production deployments are expected to load SpatiaLite for
//! the spatial SQL functions; the test-support module provides deterministic
//! emulations so the suite runs on the bundled SQLite.

#![forbid(unsafe_code)]

mod register;
mod schema;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use register::{FireDb, FireDbError};
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema, punkt_geometry_column};
