//! The credential slot of an execution context.
//!
//! A task refers to its current credentials through a `TaskCredentials`.
//! Readers take a snapshot (`Arc` clone); a privilege change builds a new
//! `Credentials` value and swaps it in. Readers therefore see either the old
//! or the new credentials in full, and a snapshot taken before a swap keeps
//! showing the old values.

use alloc::sync::Arc;

use spin::RwLock;

use super::credentials::Credentials;
use crate::error::Result;

/// Swappable reference to a task's current credentials.
#[derive(Debug)]
pub struct TaskCredentials {
    current: RwLock<Arc<Credentials>>,
}

impl TaskCredentials {
    /// Create the slot with its initial credentials.
    pub fn new(creds: Credentials) -> Self {
        Self {
            current: RwLock::new(Arc::new(creds)),
        }
    }

    /// The credentials in force right now.
    #[inline]
    pub fn snapshot(&self) -> Arc<Credentials> {
        self.current.read().clone()
    }

    /// Publish `creds`, returning the previous credentials.
    pub fn replace(&self, creds: Credentials) -> Arc<Credentials> {
        core::mem::replace(&mut *self.current.write(), Arc::new(creds))
    }

    /// Derive new credentials from the current ones and publish them.
    ///
    /// `f` runs under the write lock, so concurrent updates do not lose each
    /// other's changes. If `f` fails nothing is published.
    pub fn update<F>(&self, f: F) -> Result<Arc<Credentials>>
    where
        F: FnOnce(&Credentials) -> Result<Credentials>,
    {
        let mut current = self.current.write();
        let next = Arc::new(f(&**current)?);
        *current = Arc::clone(&next);
        Ok(next)
    }
}
