//! Facade crate for the FIRE reference-point register.
//!
//! This crate re-exports the core domain types and column specs and exposes
//! the optional SQLite-backed register store behind a feature flag.

#![forbid(unsafe_code)]

pub use fire_core::{
    CoercedOperand, CompareOp, EventType, Geometry, GeometryColumn, GeometryKind,
    IntegerEnumColumn, IntegerEnumError, SRID_UNSPECIFIED, SpatialValue, StoredEnum, WktGeometry,
    geometry_factory,
};

#[cfg(feature = "store")]
pub use fire_store::{FireDb, FireDbError, SchemaError, initialise_schema};
