//! Enum-backed integer column specs.
//!
//! Enumerations are persisted as their integer codes. The codes are part of
//! the stored contract: the mapping is fixed by the enumeration definition,
//! and a code the definition no longer (or never did) cover is treated as a
//! domain/storage mismatch, not silently coerced.

use thiserror::Error;

/// An enumeration persisted by integer code.
///
/// Implementors fix the code of every member at definition time and list the
/// members so an [`IntegerEnumColumn`] can build its lookup table. Codes must
/// stay stable across schema versions: renumbering silently corrupts rows
/// written under the old numbering, which no layer can detect afterwards.
pub trait StoredEnum: Copy + Eq + 'static {
    /// Integer code stored in the database for this member.
    fn code(&self) -> i64;

    /// Every member of the enumeration, in declaration order.
    fn members() -> &'static [Self];
}

/// Errors from constructing or invoking an [`IntegerEnumColumn`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegerEnumError {
    /// The enumeration declares no members to map.
    #[error("enumeration has no members to map")]
    EmptyEnumeration,
    /// Two members share a code, so the stored integer is ambiguous.
    #[error("enumeration code {code} is declared by more than one member")]
    DuplicateCode {
        /// The code declared twice.
        code: i64,
    },
    /// A bound value is missing from the enumeration's member list.
    ///
    /// Only reachable when a [`StoredEnum`] implementation's `members()` and
    /// `code()` disagree; a programming error surfaced instead of silently
    /// storing a code the read path could never map back.
    #[error("value with code {code} is not a listed member of the enumeration")]
    UnregisteredMember {
        /// Code of the unlisted value.
        code: i64,
    },
    /// A stored integer matches no member of the enumeration.
    ///
    /// Signals corrupted data or an enumeration definition that has drifted
    /// from previously stored rows.
    #[error("unrecognized enumeration code {code} in stored data")]
    UnknownCode {
        /// The unmapped stored code.
        code: i64,
    },
}

/// Column spec persisting an enumeration as its integer codes.
///
/// The code↔member table is built once at construction and never changes;
/// both conversion directions are pure lookups.
///
/// # Examples
/// ```
/// use fire_core::{EventType, IntegerEnumColumn};
///
/// let column = IntegerEnumColumn::<EventType>::new()?;
/// let code = column.bind(EventType::PunktOprettet)?;
/// assert_eq!(column.result(code)?, EventType::PunktOprettet);
/// # Ok::<(), fire_core::IntegerEnumError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IntegerEnumColumn<E: StoredEnum> {
    members: Vec<(i64, E)>,
}

impl<E: StoredEnum> IntegerEnumColumn<E> {
    /// Build the column spec from the enumeration's member list.
    ///
    /// Fails on an empty enumeration and on duplicate codes, both of which
    /// would make the stored integer meaningless.
    pub fn new() -> Result<Self, IntegerEnumError> {
        let mut members: Vec<(i64, E)> = E::members()
            .iter()
            .map(|member| (member.code(), *member))
            .collect();
        if members.is_empty() {
            return Err(IntegerEnumError::EmptyEnumeration);
        }
        members.sort_by_key(|(code, _)| *code);
        if let Some(duplicate) = members
            .windows(2)
            .find(|pair| pair.first().map(|(code, _)| *code) == pair.last().map(|(c, _)| *c))
        {
            let code = duplicate.first().map_or(0, |(c, _)| *c);
            return Err(IntegerEnumError::DuplicateCode { code });
        }
        Ok(Self { members })
    }

    /// Write-direction conversion: the member's integer code.
    ///
    /// Fails loudly when the value is not in the member table; see
    /// [`IntegerEnumError::UnregisteredMember`].
    pub fn bind(&self, member: E) -> Result<i64, IntegerEnumError> {
        let code = member.code();
        match self.lookup(code) {
            Some(listed) if listed == member => Ok(code),
            _ => Err(IntegerEnumError::UnregisteredMember { code }),
        }
    }

    /// Read-direction conversion: the member whose code was stored.
    ///
    /// Fails with [`IntegerEnumError::UnknownCode`] when no member matches.
    pub fn result(&self, code: i64) -> Result<E, IntegerEnumError> {
        self.lookup(code)
            .ok_or(IntegerEnumError::UnknownCode { code })
    }

    fn lookup(&self, code: i64) -> Option<E> {
        self.members
            .binary_search_by_key(&code, |(c, _)| *c)
            .ok()
            .and_then(|index| self.members.get(index))
            .map(|(_, member)| *member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Anvendelse {
        Flag,
        Tal,
        Tekst,
    }

    impl StoredEnum for Anvendelse {
        fn code(&self) -> i64 {
            match self {
                Self::Flag => 1,
                Self::Tal => 2,
                Self::Tekst => 3,
            }
        }

        fn members() -> &'static [Self] {
            &[Self::Flag, Self::Tal, Self::Tekst]
        }
    }

    /// `members()` omits `Tekst`, violating the [`StoredEnum`] contract.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Partial {
        Flag,
        Tekst,
    }

    impl StoredEnum for Partial {
        fn code(&self) -> i64 {
            match self {
                Self::Flag => 1,
                Self::Tekst => 3,
            }
        }

        fn members() -> &'static [Self] {
            &[Self::Flag]
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Clashing {
        A,
        B,
    }

    impl StoredEnum for Clashing {
        fn code(&self) -> i64 {
            match self {
                Self::A | Self::B => 7,
            }
        }

        fn members() -> &'static [Self] {
            &[Self::A, Self::B]
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Empty {}

    impl StoredEnum for Empty {
        fn code(&self) -> i64 {
            match *self {}
        }

        fn members() -> &'static [Self] {
            &[]
        }
    }

    fn column() -> IntegerEnumColumn<Anvendelse> {
        IntegerEnumColumn::new().unwrap()
    }

    #[rstest]
    #[case(Anvendelse::Flag)]
    #[case(Anvendelse::Tal)]
    #[case(Anvendelse::Tekst)]
    fn bind_then_result_round_trips(#[case] member: Anvendelse) {
        let spec = column();
        let code = spec.bind(member).unwrap();
        assert_eq!(spec.result(code), Ok(member));
    }

    #[rstest]
    fn bind_returns_the_declared_code() {
        assert_eq!(column().bind(Anvendelse::Tal), Ok(2));
    }

    #[rstest]
    fn result_rejects_unknown_code() {
        assert_eq!(
            column().result(42),
            Err(IntegerEnumError::UnknownCode { code: 42 }),
        );
    }

    #[rstest]
    fn bind_rejects_unlisted_member() {
        let spec = IntegerEnumColumn::<Partial>::new().unwrap();
        assert_eq!(
            spec.bind(Partial::Tekst),
            Err(IntegerEnumError::UnregisteredMember { code: 3 }),
        );
    }

    #[rstest]
    fn construction_rejects_empty_enumeration() {
        assert_eq!(
            IntegerEnumColumn::<Empty>::new().err(),
            Some(IntegerEnumError::EmptyEnumeration),
        );
    }

    #[rstest]
    fn construction_rejects_duplicate_codes() {
        assert_eq!(
            IntegerEnumColumn::<Clashing>::new().err(),
            Some(IntegerEnumError::DuplicateCode { code: 7 }),
        );
    }

    #[rstest]
    fn error_kinds_are_distinguishable() {
        let read_error = column().result(99).unwrap_err();
        let write_error = IntegerEnumColumn::<Partial>::new()
            .unwrap()
            .bind(Partial::Tekst)
            .unwrap_err();
        assert!(matches!(read_error, IntegerEnumError::UnknownCode { .. }));
        assert!(matches!(
            write_error,
            IntegerEnumError::UnregisteredMember { .. }
        ));
    }
}
