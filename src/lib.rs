//! sandbox-auth - Identity and Privilege Core
//!
//! The part of a sandboxed user-space kernel that answers "which numeric
//! owner does this object have" and "is this caller allowed to do X".
//!
//! # Components
//! - Linux capability table and capability sets (`cap`)
//! - User namespaces and uid/gid identity maps (`ns`)
//! - Task credentials and the swappable per-task credential slot (`cred`)
//! - Container specification blocks: capability names, id mappings (`spec`)
//! - Exec/ps glue for the control server (`control`)
//!
//! # Security Features
//! - Capability names are parsed exactly and fail closed
//! - Identity maps are validated once and immutable afterwards
//! - Credentials are values: a privilege change publishes a new value and
//!   never alters one that someone else may be reading
//! - Missing id mappings are ordinary results, so callers can present the
//!   overflow id instead of failing
//!
//! # Concurrency
//! Nothing here blocks or performs I/O. Namespaces, maps and credentials are
//! immutable and `Send + Sync`; the only lock is the short write section of
//! `TaskCredentials`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod cap;
pub mod config;
pub mod control;
pub mod cred;
pub mod error;
pub mod ns;
pub mod spec;

pub use cap::{Capability, CapabilitySet, TaskCapabilities};
pub use config::{config, configure, AuthConfig};
pub use cred::{new_credentials, Credentials, TaskCredentials};
pub use error::{AuthError, Result};
pub use ns::{Gid, IdKind, IdRangePair, IdentityMap, Kgid, Kuid, Uid, UserNamespace};
pub use spec::{build_identity_map, parse_capabilities, task_capabilities};
