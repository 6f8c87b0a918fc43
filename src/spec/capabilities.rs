//! Capability-Name Adapter
//!
//! Turns the capability block of a container specification into
//! [`TaskCapabilities`].
//!
//! # Security Principles
//! - Fail closed: one unknown name rejects the whole block
//! - No partial result is ever returned
//! - An absent block grants nothing
//! - Ambient capabilities are not modelled: the list is checked for unknown
//!   names and otherwise ignored

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::cap::{Capability, CapabilitySet, TaskCapabilities};
use crate::error::{AuthError, Result};

/// The `process.capabilities` block of an OCI runtime specification.
///
/// Missing lists deserialize as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinuxCapabilities {
    pub bounding: Vec<String>,
    pub effective: Vec<String>,
    pub inheritable: Vec<String>,
    pub permitted: Vec<String>,
    pub ambient: Vec<String>,
}

/// Parse a list of canonical capability names.
///
/// # Errors
/// `UnknownCapability(name)` for the first name not in the capability table.
pub fn parse_capabilities<S: AsRef<str>>(names: &[S]) -> Result<CapabilitySet> {
    names.iter().try_fold(CapabilitySet::empty(), |set, name| {
        let name = name.as_ref();
        match Capability::from_name(name) {
            Some(cap) => Ok(set.with(cap)),
            None => {
                warn!("rejecting unknown capability {:?}", name);
                Err(AuthError::UnknownCapability(name.to_string()))
            }
        }
    })
}

/// Build the task capability sets for a capability block.
///
/// `None` yields four empty sets.
///
/// A non-empty `ambient` list is validated, then ignored with a warning.
///
/// # Errors
/// `UnknownCapability` from any of the five lists.
pub fn task_capabilities(block: Option<&LinuxCapabilities>) -> Result<TaskCapabilities> {
    let block = match block {
        Some(block) => block,
        None => return Ok(TaskCapabilities::empty()),
    };

    let caps = TaskCapabilities {
        bounding: parse_capabilities(&block.bounding)?,
        effective: parse_capabilities(&block.effective)?,
        inheritable: parse_capabilities(&block.inheritable)?,
        permitted: parse_capabilities(&block.permitted)?,
    };

    if !block.ambient.is_empty() {
        parse_capabilities(&block.ambient)?;
        warn!("ignoring unsupported ambient capabilities {:?}", block.ambient);
    }

    Ok(caps)
}
