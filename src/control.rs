//! Control-plane glue for process creation and process listing.
//!
//! The control server builds a new task's identity from an exec request and
//! reports the identity of running tasks. Spawning, waiting and output
//! formatting live with the control server; this module only deals with ids
//! and capabilities.

use alloc::sync::Arc;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::cred::{new_credentials, Credentials};
use crate::error::Result;
use crate::ns::{Gid, Kgid, Kuid, Uid, UserNamespace};
use crate::spec::{task_capabilities, LinuxCapabilities};

/// Identity part of an exec request.
///
/// Ids are in the root user namespace. Missing ids default to root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecArgs {
    #[serde(rename = "KUID")]
    pub kuid: Kuid,
    #[serde(rename = "KGID")]
    pub kgid: Kgid,
    #[serde(rename = "ExtraKGIDs")]
    pub extra_kgids: Vec<Kgid>,
    /// Capabilities to give the new task. `None` gives none.
    #[serde(rename = "Capabilities")]
    pub capabilities: Option<LinuxCapabilities>,
}

impl ExecArgs {
    /// Build the credentials of the task this request creates, in `ns`.
    ///
    /// # Errors
    /// Any capability parsing error; the task must then not be created.
    pub fn credentials(&self, ns: &Arc<UserNamespace>) -> Result<Credentials> {
        let caps = task_capabilities(self.capabilities.as_ref())?;
        Ok(new_credentials(
            self.kuid,
            self.kgid,
            &self.extra_kgids,
            Some(&caps),
            ns,
        ))
    }
}

/// The ids of a task as one observer namespace sees them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessIdentity {
    pub uid: Uid,
    pub gid: Gid,
}

impl ProcessIdentity {
    /// Effective ids of `creds` seen from `observer`; ids without a mapping
    /// there are shown as the overflow ids.
    pub fn observe(creds: &Credentials, observer: &UserNamespace) -> Self {
        Self {
            uid: observer.map_from_kuid_or_overflow(creds.effective_kuid()),
            gid: observer.map_from_kgid_or_overflow(creds.effective_kgid()),
        }
    }
}
