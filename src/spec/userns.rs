//! User-namespace mapping block of a container specification.

use alloc::sync::Arc;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::cred::Credentials;
use crate::error::Result;
use crate::ns::{IdRangePair, IdentityMap};

/// One `(containerID, hostID, size)` triple.
///
/// `container_id` is the id inside the new namespace, `host_id` the id in the
/// namespace that creates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinuxIdMapping {
    #[serde(rename = "containerID")]
    pub container_id: u32,
    #[serde(rename = "hostID")]
    pub host_id: u32,
    pub size: u32,
}

impl From<&LinuxIdMapping> for IdRangePair {
    fn from(m: &LinuxIdMapping) -> Self {
        IdRangePair::new(m.container_id, m.host_id, m.size)
    }
}

/// The uid and gid mappings requested for a new user namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNamespaceSpec {
    #[serde(rename = "uidMappings", default)]
    pub uid_mappings: Vec<LinuxIdMapping>,
    #[serde(rename = "gidMappings", default)]
    pub gid_mappings: Vec<LinuxIdMapping>,
}

fn to_ranges(mappings: &[LinuxIdMapping]) -> Vec<IdRangePair> {
    mappings.iter().map(IdRangePair::from).collect()
}

/// Build one identity map from a list of mapping triples.
pub fn build_identity_map(mappings: &[LinuxIdMapping]) -> Result<IdentityMap> {
    IdentityMap::build(&to_ranges(mappings))
}

impl UserNamespaceSpec {
    /// The uid mappings as range pairs (local = container id).
    pub fn uid_ranges(&self) -> Vec<IdRangePair> {
        to_ranges(&self.uid_mappings)
    }

    /// The gid mappings as range pairs (local = container id).
    pub fn gid_ranges(&self) -> Vec<IdRangePair> {
        to_ranges(&self.gid_mappings)
    }

    /// Create the requested namespace as a child of `creds`' namespace and
    /// return the credentials of its first task.
    ///
    /// Nothing is created if any mapping is invalid.
    pub fn enter(&self, creds: &Credentials) -> Result<Credentials> {
        creds.new_child_user_namespace(&self.uid_ranges(), &self.gid_ranges())
    }

    /// Like [`enter`](Self::enter) for a shared credentials value.
    pub fn enter_shared(&self, creds: &Arc<Credentials>) -> Result<Arc<Credentials>> {
        self.enter(creds).map(Arc::new)
    }
}
