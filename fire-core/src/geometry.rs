//! Domain geometry values exchanged with the register's spatial columns.
//!
//! The database stores geometries in its native spatial encoding; in memory
//! they are opaque values carrying a well-known-text (WKT) rendering and the
//! spatial reference system identifier (srid) they were read under. Nothing
//! here parses or validates WKT: a malformed text surfaces as a statement
//! error when the database evaluates it.

use serde::{Deserialize, Serialize};

/// Sentinel srid meaning "no spatial reference system specified".
pub const SRID_UNSPECIFIED: i32 = -1;

/// Capability trait for values that expose a WKT rendering.
///
/// Spatial column specs treat any implementor as a domain geometry when
/// binding values; everything else passes through to the database unchanged.
pub trait WktGeometry {
    /// Well-known-text rendering of the geometry.
    fn wkt(&self) -> &str;
}

/// An opaque geometry value: WKT text plus the srid it belongs to.
///
/// Equality is by WKT text and srid. Two geometries describing the same shape
/// in different renderings (e.g. differing whitespace) compare unequal; the
/// register never normalises WKT on the way in or out.
///
/// # Examples
/// ```
/// use fire_core::Geometry;
///
/// let g = Geometry::new("POINT (10.1 56.2)", 4326);
/// assert_eq!(g.wkt(), "POINT (10.1 56.2)");
/// assert_eq!(g.srid(), 4326);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    wkt: String,
    srid: i32,
}

impl Geometry {
    /// Construct a geometry from WKT text and an srid.
    pub fn new(wkt: impl Into<String>, srid: i32) -> Self {
        Self {
            wkt: wkt.into(),
            srid,
        }
    }

    /// WKT rendering of the geometry.
    pub fn wkt(&self) -> &str {
        &self.wkt
    }

    /// Spatial reference system identifier, or [`SRID_UNSPECIFIED`].
    pub const fn srid(&self) -> i32 {
        self.srid
    }
}

impl WktGeometry for Geometry {
    fn wkt(&self) -> &str {
        &self.wkt
    }
}

/// Construct a domain geometry from a WKT value fetched from storage.
///
/// This is the pure constructor spatial column specs invoke on the read path:
/// the database surfaces WKT text, the column spec supplies the srid it was
/// declared with.
///
/// # Examples
/// ```
/// use fire_core::geometry_factory;
///
/// let g = geometry_factory("LINESTRING (0 0, 1 1)", 25832);
/// assert_eq!(g.wkt(), "LINESTRING (0 0, 1 1)");
/// assert_eq!(g.srid(), 25832);
/// ```
pub fn geometry_factory(wkt: &str, srid: i32) -> Geometry {
    Geometry::new(wkt, srid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn factory_preserves_wkt_and_srid() {
        let g = geometry_factory("POINT (1 2)", 4326);
        assert_eq!(g, Geometry::new("POINT (1 2)", 4326));
    }

    #[rstest]
    fn equality_is_textual() {
        let compact = Geometry::new("POINT(1 2)", 4326);
        let spaced = Geometry::new("POINT (1 2)", 4326);
        assert_ne!(compact, spaced);
    }

    #[rstest]
    fn srid_distinguishes_geometries() {
        let local = Geometry::new("POINT (1 2)", 25832);
        let global = Geometry::new("POINT (1 2)", 4326);
        assert_ne!(local, global);
    }

    #[rstest]
    fn serializes_wkt_and_srid() {
        let g = Geometry::new("POINT (1 2)", 4326);
        let json = serde_json::to_value(&g).expect("serialize geometry");
        assert_eq!(json["wkt"], "POINT (1 2)");
        assert_eq!(json["srid"], 4326);
    }

    #[rstest]
    fn wkt_capability_matches_accessor() {
        let g = Geometry::new("POINT (1 2)", SRID_UNSPECIFIED);
        let capability: &dyn WktGeometry = &g;
        assert_eq!(capability.wkt(), g.wkt());
    }
}
