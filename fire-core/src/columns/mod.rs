//! Column specs bridging domain values and their storage encoding.
//!
//! The relational engine stores geometries in its native spatial type and
//! enumerations as plain integers. The specs in this module own both
//! directions of that translation: binding in-memory values for writes,
//! rewriting SQL expressions so reads and writes pass through the engine's
//! conversion functions, and reconstructing domain values from fetched rows.
//!
//! Specs are constructed once at schema-definition time, hold no per-row
//! state, and every coercion is pure given its inputs, so they are safe to
//! share across concurrent reads and writes.

mod integer_enum;
mod spatial;

pub use integer_enum::{IntegerEnumColumn, IntegerEnumError, StoredEnum};
pub use spatial::{CoercedOperand, CompareOp, GeometryColumn, GeometryKind, SpatialValue};
