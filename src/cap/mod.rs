//! Linux Capability Model
//!
//! Implements the POSIX/Linux capability model used by every privilege
//! check in the kernel.
//!
//! # Design
//! - `Capability` is a closed enumeration backed by a static name table
//! - `CapabilitySet` is an immutable 64-bit mask over capability ordinals
//! - `TaskCapabilities` groups the bounding, effective, permitted and
//!   inheritable sets of one task
//!
//! # Security Properties
//! - Name parsing is exact and fails closed (see `spec::capabilities`)
//! - No set ever carries a bit outside the capability table

pub mod capability;
pub mod set;
pub mod task;

pub use capability::{Capability, CAP_COUNT, CAP_LAST_CAP};
pub use set::CapabilitySet;
pub use task::TaskCapabilities;
