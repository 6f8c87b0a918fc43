//! Numeric User and Group Identifiers
//!
//! Type-safe wrappers that keep namespace-relative ids apart from canonical
//! (root namespace) ids at compile time.
//!
//! | type   | meaning                                  |
//! |--------|------------------------------------------|
//! | `Uid`  | user id as seen inside some namespace    |
//! | `Gid`  | group id as seen inside some namespace   |
//! | `Kuid` | user id in the root namespace            |
//! | `Kgid` | group id in the root namespace           |
//!
//! Converting between the two forms always goes through a
//! [`UserNamespace`](super::UserNamespace).

use core::fmt;

use serde::{Deserialize, Serialize};

/// The invalid id. It can never be mapped by any namespace.
pub const NO_ID: u32 = u32::MAX;

/// Default overflow user id (`nobody`).
pub const DEFAULT_OVERFLOW_UID: u32 = 65534;

/// Default overflow group id (`nogroup`).
pub const DEFAULT_OVERFLOW_GID: u32 = 65534;

/// Which of a namespace's two identity maps a lookup goes through.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IdKind {
    User,
    Group,
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Id 0.
            pub const ROOT: Self = Self(0);

            /// The invalid id.
            pub const INVALID: Self = Self(NO_ID);

            /// Get the raw id value.
            #[inline]
            pub const fn as_u32(self) -> u32 {
                self.0
            }

            /// Whether this is id 0.
            #[inline]
            pub const fn is_root(self) -> bool {
                self.0 == 0
            }

            /// Whether this is anything other than the invalid id.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != NO_ID
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// A user id relative to some user namespace.
    Uid
);
numeric_id!(
    /// A group id relative to some user namespace.
    Gid
);
numeric_id!(
    /// A user id in the root user namespace.
    Kuid
);
numeric_id!(
    /// A group id in the root user namespace.
    Kgid
);
