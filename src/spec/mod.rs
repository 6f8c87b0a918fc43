//! Container Specification Input
//!
//! Shapes of the security-relevant parts of a container specification and
//! their conversion into capability sets and user namespaces.
//!
//! Reading and parsing the specification file itself happens elsewhere; this
//! module receives already-deserialized blocks.
//!
//! # Security Principles
//! - Validate every field before any state is created
//! - Fail closed: an unknown or malformed entry aborts creation
//! - Absent blocks grant nothing

pub mod capabilities;
pub mod userns;

pub use capabilities::{parse_capabilities, task_capabilities, LinuxCapabilities};
pub use userns::{build_identity_map, LinuxIdMapping, UserNamespaceSpec};
