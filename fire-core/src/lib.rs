//! Core domain types for the FIRE reference-point register.
//!
//! The register persists cases, points and their geometries in a relational
//! database with native spatial columns. This crate holds the in-memory side
//! of that boundary: the opaque [`Geometry`] value, the register's event
//! enumeration, and the column specs that translate both to and from their
//! storage encoding.

#![forbid(unsafe_code)]

pub mod columns;
pub mod event;
pub mod geometry;

pub use columns::{
    CoercedOperand, CompareOp, GeometryColumn, GeometryKind, IntegerEnumColumn, IntegerEnumError,
    SpatialValue, StoredEnum,
};
pub use event::EventType;
pub use geometry::{Geometry, SRID_UNSPECIFIED, WktGeometry, geometry_factory};
