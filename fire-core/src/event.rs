//! Register event types.
//!
//! Every change to the register happens through a case event, and the event
//! type is persisted as its integer code. The codes below are part of the
//! stored contract: new variants are only ever appended with fresh codes,
//! because renumbering silently corrupts rows written under the old mapping.

use serde::{Deserialize, Serialize};

use crate::columns::StoredEnum;

/// The kinds of events a case can record against the register.
///
/// # Examples
/// ```
/// use fire_core::EventType;
///
/// assert_eq!(EventType::KoordinatBeregnet.code(), 1);
/// assert_eq!(EventType::Kommentar.code(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// A coordinate was calculated for a point.
    KoordinatBeregnet,
    /// A coordinate was retired.
    KoordinatNedlagt,
    /// Information was attached to a point.
    PunktinfoTilfoejet,
    /// Information was removed from a point.
    PunktinfoFjernet,
    /// An observation was inserted.
    ObservationIndsat,
    /// An observation was retired.
    ObservationNedlagt,
    /// A point was created.
    PunktOprettet,
    /// A point was retired.
    PunktNedlagt,
    /// A free-form comment on the case.
    Kommentar,
}

impl EventType {
    /// Stable integer code stored in the `eventtype` column.
    pub const fn code(self) -> i64 {
        match self {
            Self::KoordinatBeregnet => 1,
            Self::KoordinatNedlagt => 2,
            Self::PunktinfoTilfoejet => 3,
            Self::PunktinfoFjernet => 4,
            Self::ObservationIndsat => 5,
            Self::ObservationNedlagt => 6,
            Self::PunktOprettet => 7,
            Self::PunktNedlagt => 8,
            Self::Kommentar => 9,
        }
    }
}

impl StoredEnum for EventType {
    fn code(&self) -> i64 {
        Self::code(*self)
    }

    fn members() -> &'static [Self] {
        &[
            Self::KoordinatBeregnet,
            Self::KoordinatNedlagt,
            Self::PunktinfoTilfoejet,
            Self::PunktinfoFjernet,
            Self::ObservationIndsat,
            Self::ObservationNedlagt,
            Self::PunktOprettet,
            Self::PunktNedlagt,
            Self::Kommentar,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::IntegerEnumColumn;
    use rstest::rstest;

    #[rstest]
    fn codes_are_unique_and_stable() {
        let column = IntegerEnumColumn::<EventType>::new().unwrap();
        for member in EventType::members() {
            assert_eq!(column.bind(*member), Ok(member.code()));
        }
    }

    #[rstest]
    #[case(EventType::KoordinatBeregnet)]
    #[case(EventType::ObservationIndsat)]
    #[case(EventType::PunktOprettet)]
    #[case(EventType::Kommentar)]
    fn every_member_round_trips(#[case] member: EventType) {
        let column = IntegerEnumColumn::<EventType>::new().unwrap();
        let code = column.bind(member).unwrap();
        assert_eq!(column.result(code), Ok(member));
    }

    #[rstest]
    fn codes_outside_the_mapping_are_rejected() {
        let column = IntegerEnumColumn::<EventType>::new().unwrap();
        assert!(column.result(0).is_err());
        assert!(column.result(10).is_err());
    }
}
