//! Spatial column specs.
//!
//! A [`GeometryColumn`] describes one spatial column: the subtype it was
//! declared as, an optional dimensionality, and the srid its values live in.
//! The spec owns the column's whole codec surface. Writes pass the bound WKT
//! text through the database's geometry constructor via
//! [`GeometryColumn::bind_expression`]; reads wrap the column reference in
//! the native to-WKT conversion via [`GeometryColumn::column_expression`] so
//! fetched values always surface as text, which
//! [`GeometryColumn::result`] turns back into a domain [`Geometry`].
//!
//! The spec validates nothing: malformed WKT or an srid unknown to the
//! database surface as statement errors at execution time.

use crate::geometry::{Geometry, SRID_UNSPECIFIED, WktGeometry, geometry_factory};

/// Name tags for the supported spatial column subtypes.
///
/// The subtypes form a shallow hierarchy for naming only (a line string is a
/// curve is a geometry). Each variant declares its own SQL token; none falls
/// back to a parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Generic geometry column.
    Geometry,
    /// Point column.
    Point,
    /// Curve column.
    Curve,
    /// Line-string column.
    LineString,
}

impl GeometryKind {
    /// SQL type name token for this subtype.
    ///
    /// # Examples
    /// ```
    /// use fire_core::GeometryKind;
    ///
    /// assert_eq!(GeometryKind::LineString.name(), "LINESTRING");
    /// ```
    pub const fn name(self) -> &'static str {
        match self {
            Self::Geometry => "GEOMETRY",
            Self::Point => "POINT",
            Self::Curve => "CURVE",
            Self::LineString => "LINESTRING",
        }
    }
}

/// A value bound to, or compared against, a spatial column.
///
/// Domain geometries bind as their WKT text; raw values and NULL pass through
/// unchanged. The discriminator is the WKT capability, not the concrete type:
/// anything carrying a [`WktGeometry`] rendering converts via
/// [`SpatialValue::from_wkt_geometry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpatialValue {
    /// A domain geometry, bound as its WKT text.
    Domain(Geometry),
    /// A value already in raw textual form, passed through unchanged.
    Raw(String),
    /// SQL NULL.
    Null,
}

impl SpatialValue {
    /// Capture any WKT-capable value as a bindable domain geometry.
    pub fn from_wkt_geometry<G: WktGeometry>(value: &G, srid: i32) -> Self {
        Self::Domain(Geometry::new(value.wkt(), srid))
    }
}

impl From<Geometry> for SpatialValue {
    fn from(value: Geometry) -> Self {
        Self::Domain(value)
    }
}

impl From<Option<Geometry>> for SpatialValue {
    fn from(value: Option<Geometry>) -> Self {
        value.map_or(Self::Null, Self::Domain)
    }
}

impl From<&str> for SpatialValue {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

/// Comparison operators a spatial operand may appear under.
///
/// The column spec coerces the right-hand operand identically for every
/// operator; the variant exists so call sites state their intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equality.
    Eq,
    /// Inequality.
    NotEq,
    /// Spatial intersection predicate.
    Intersects,
    /// Spatial containment predicate.
    Within,
}

/// Spatial column type spec.
///
/// Constructed once when the schema is declared and never mutated: the srid
/// and dimension are fixed for the lifetime of the spec, and [`adapt`]ing to
/// a more specific subtype copies both into the new instance.
///
/// [`adapt`]: GeometryColumn::adapt
///
/// # Examples
/// ```
/// use fire_core::{Geometry, GeometryColumn, GeometryKind, SpatialValue};
///
/// let column = GeometryColumn::new(GeometryKind::Point, Some(2), 4326);
/// let bound = column.bind(SpatialValue::Domain(Geometry::new("POINT (10 56)", 4326)));
/// assert_eq!(bound.as_deref(), Some("POINT (10 56)"));
/// assert_eq!(
///     column.bind_expression("?1"),
///     "CastToXY(GeomFromText(?1, 4326))",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryColumn {
    kind: GeometryKind,
    dimension: Option<u8>,
    srid: i32,
}

impl GeometryColumn {
    /// Declare a spatial column of the given subtype, dimension and srid.
    pub const fn new(kind: GeometryKind, dimension: Option<u8>, srid: i32) -> Self {
        Self {
            kind,
            dimension,
            srid,
        }
    }

    /// Declare a generic geometry column with no dimension and no srid.
    pub const fn generic() -> Self {
        Self::new(GeometryKind::Geometry, None, SRID_UNSPECIFIED)
    }

    /// Subtype tag of this column.
    pub const fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Declared dimensionality, if any.
    pub const fn dimension(&self) -> Option<u8> {
        self.dimension
    }

    /// Declared srid, or [`SRID_UNSPECIFIED`].
    pub const fn srid(&self) -> i32 {
        self.srid
    }

    /// Write-direction value conversion.
    ///
    /// Domain geometries surface their WKT text through the [`WktGeometry`]
    /// capability; raw text passes through unchanged and NULL binds as NULL.
    /// Never fails.
    pub fn bind(&self, value: SpatialValue) -> Option<String> {
        match value {
            SpatialValue::Domain(geometry) => Some(WktGeometry::wkt(&geometry).to_owned()),
            SpatialValue::Raw(text) => Some(text),
            SpatialValue::Null => None,
        }
    }

    /// Wrap a bound placeholder in the database's geometry constructor.
    ///
    /// The produced expression carries the full column spec: the constructor
    /// receives the srid unless it is unspecified, and a declared dimension
    /// pins the result through the matching cast, so the database stores a
    /// structurally valid geometry rather than opaque text.
    pub fn bind_expression(&self, placeholder: &str) -> String {
        let constructor = if self.srid == SRID_UNSPECIFIED {
            format!("GeomFromText({placeholder})")
        } else {
            format!("GeomFromText({placeholder}, {})", self.srid)
        };
        match self.dimension {
            Some(2) => format!("CastToXY({constructor})"),
            Some(3) => format!("CastToXYZ({constructor})"),
            _ => constructor,
        }
    }

    /// Wrap a SELECT column reference in the native to-WKT conversion.
    ///
    /// Raw fetches then always surface WKT text at the SQL level, deferring
    /// domain reconstruction to [`GeometryColumn::result`].
    pub fn column_expression(&self, column: &str) -> String {
        format!("AsText({column})")
    }

    /// Read-direction value conversion.
    ///
    /// Non-null WKT text becomes a domain [`Geometry`] carrying this column's
    /// srid; NULL passes through.
    pub fn result(&self, value: Option<&str>) -> Option<Geometry> {
        value.map(|wkt| geometry_factory(wkt, self.srid))
    }

    /// Coerce a comparison operand to this column spec.
    ///
    /// The operator is deliberately ignored: every comparison against this
    /// column treats its right-hand side as a value of this same spec,
    /// whatever the operand's native form.
    pub fn compare_coerce(&self, _op: CompareOp, value: SpatialValue) -> CoercedOperand {
        CoercedOperand {
            spec: self.clone(),
            value: self.bind(value),
        }
    }

    /// Re-declare this column as a more specific subtype.
    ///
    /// The dimension and srid carry over unchanged.
    pub fn adapt(&self, kind: GeometryKind) -> Self {
        Self::new(kind, self.dimension, self.srid)
    }

    /// SQL column type name token for DDL generation.
    ///
    /// Always the subtype's own tag, never a generic fallback.
    pub const fn col_spec(&self) -> &'static str {
        self.kind.name()
    }
}

/// A comparison operand carrying the column spec it was coerced to.
///
/// Produced by [`GeometryColumn::compare_coerce`]; the query layer renders
/// the operand through [`CoercedOperand::expression`] and binds
/// [`CoercedOperand::param`], so the comparison is well-typed at the
/// SQL-generation layer regardless of what the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercedOperand {
    spec: GeometryColumn,
    value: Option<String>,
}

impl CoercedOperand {
    /// The column spec the operand was coerced to.
    pub const fn spec(&self) -> &GeometryColumn {
        &self.spec
    }

    /// SQL expression for the operand's placeholder.
    pub fn expression(&self, placeholder: &str) -> String {
        self.spec.bind_expression(placeholder)
    }

    /// The bound parameter value, NULL for a null operand.
    pub fn param(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
