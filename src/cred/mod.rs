//! Credentials
//!
//! The security identity of an execution context and the slot through which
//! a task publishes it.
//!
//! # Design
//! - `Credentials` is a value: transitions return new values
//! - `TaskCredentials` swaps whole `Arc<Credentials>` values, so readers
//!   never observe a partially updated identity

pub mod credentials;
pub mod task;

pub use credentials::{new_credentials, Credentials};
pub use task::TaskCredentials;
