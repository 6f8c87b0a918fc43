//! Error type for namespace and credential construction.
//!
//! Only construction can fail. An identifier without a mapping is an ordinary
//! `None` from the translation functions, never an `AuthError`.

use alloc::string::String;
use core::fmt;

use crate::ns::idmap::IdRangePair;

/// Errors raised while building capability sets, identity maps, namespaces
/// or credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A capability name is not in the capability table.
    UnknownCapability(String),
    /// A mapping has a length of zero.
    EmptyRange,
    /// A mapping would include the invalid id `u32::MAX`.
    RangeOverflow(IdRangePair),
    /// Two mappings overlap on the local or the parent side.
    OverlappingRange {
        first: IdRangePair,
        second: IdRangePair,
    },
    /// More mappings than a single map may hold.
    TooManyRanges(usize),
    /// A parent-side range is not fully mapped in the parent namespace.
    UnmappedParentRange(IdRangePair),
    /// Creating the namespace would exceed the nesting limit.
    NamespaceTooDeep(usize),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCapability(name) => write!(f, "unknown capability {:?}", name),
            Self::EmptyRange => write!(f, "id mapping has zero length"),
            Self::RangeOverflow(pair) => write!(f, "id mapping {} overflows the id space", pair),
            Self::OverlappingRange { first, second } => {
                write!(f, "id mapping {} overlaps {}", second, first)
            }
            Self::TooManyRanges(n) => write!(f, "too many id mappings ({})", n),
            Self::UnmappedParentRange(pair) => {
                write!(f, "id mapping {} is not mapped in the parent namespace", pair)
            }
            Self::NamespaceTooDeep(depth) => {
                write!(f, "user namespace nesting limit reached (depth {})", depth)
            }
        }
    }
}

impl core::error::Error for AuthError {}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, AuthError>;
