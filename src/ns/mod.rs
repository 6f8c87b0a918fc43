//! User Namespaces and Identity Translation
//!
//! Maps numeric user and group ids between nested user namespaces.
//!
//! # Design
//! - Each namespace owns two immutable `IdentityMap`s (users, groups)
//! - Translation to the root walks the parent chain, one map per hop
//! - A missing mapping is an ordinary `None`, not an error
//!
//! # Security Properties
//! - Maps are validated once (no overlaps, no invalid id) and never change
//! - The invalid id `u32::MAX` never translates
//! - Nesting depth is bounded by configuration

pub mod id;
pub mod idmap;
pub mod userns;

pub use id::{Gid, IdKind, Kgid, Kuid, Uid, NO_ID};
pub use idmap::{IdRange, IdRangePair, IdentityMap, MAX_EXTENTS};
pub use userns::{NamespaceId, UserNamespace};
