//! User Namespaces
//!
//! User namespaces form a tree. Every non-root namespace holds a strong
//! reference to its parent, so a parent always outlives its children and the
//! parent chain is finite and acyclic by construction.
//!
//! ```text
//!   root  (identity maps)
//!    └── A   uid [0, 10000) -> [100000, 110000)
//!         └── B   uid [0, 1000) -> [5000, 6000)
//! ```
//!
//! Uid 7 in B is uid 5007 in A and uid 105007 in the root namespace.
//!
//! A namespace is immutable once created; it is destroyed when the last
//! `Arc` held by a child namespace or by a `Credentials` value goes away.

use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use spin::Once;

use super::id::{Gid, IdKind, Kgid, Kuid, Uid};
use super::idmap::{IdRangePair, IdentityMap};
use crate::config::config;
use crate::error::{AuthError, Result};

/// Opaque namespace handle, unique for the lifetime of the process.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct NamespaceId(u64);

impl NamespaceId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw handle value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// A user namespace.
pub struct UserNamespace {
    id: NamespaceId,
    parent: Option<Arc<UserNamespace>>,
    /// Effective user of the creator.
    owner: Kuid,
    /// Effective group of the creator.
    group: Kgid,
    uid_map: IdentityMap,
    gid_map: IdentityMap,
    /// Number of ancestors; 0 for a root namespace.
    depth: usize,
}

impl UserNamespace {
    /// Create a fresh root namespace with identity maps.
    ///
    /// Each emulated kernel owns one root namespace. Most callers want the
    /// shared [`UserNamespace::root`] instead.
    pub fn new_root() -> Arc<Self> {
        let ns = Arc::new(Self {
            id: NamespaceId::next(),
            parent: None,
            owner: Kuid::ROOT,
            group: Kgid::ROOT,
            uid_map: IdentityMap::identity(),
            gid_map: IdentityMap::identity(),
            depth: 0,
        });
        debug!("created root user namespace {:?}", ns.id);
        ns
    }

    /// The process-wide root namespace.
    pub fn root() -> &'static Arc<Self> {
        static ROOT: Once<Arc<UserNamespace>> = Once::new();
        ROOT.call_once(Self::new_root)
    }

    /// Create a child namespace.
    ///
    /// `uid_ranges` and `gid_ranges` map ids of the new namespace (local side)
    /// to ids of `self` (parent side). Every parent-side interval must already
    /// be mapped in `self`.
    ///
    /// # Errors
    /// - `NamespaceTooDeep` if the nesting limit would be exceeded
    /// - any error from [`IdentityMap::build`]
    /// - `UnmappedParentRange` if a parent-side interval is not mapped in `self`
    pub fn new_child(
        self: &Arc<Self>,
        owner: Kuid,
        group: Kgid,
        uid_ranges: &[IdRangePair],
        gid_ranges: &[IdRangePair],
    ) -> Result<Arc<Self>> {
        let depth = self.depth + 1;
        if depth > config().max_userns_depth {
            warn!("user namespace under {:?} rejected: depth {}", self.id, depth);
            return Err(AuthError::NamespaceTooDeep(depth));
        }

        let uid_map = IdentityMap::build(uid_ranges)?;
        let gid_map = IdentityMap::build(gid_ranges)?;
        Self::check_mapped_in(&self.uid_map, &uid_map)?;
        Self::check_mapped_in(&self.gid_map, &gid_map)?;

        let ns = Arc::new(Self {
            id: NamespaceId::next(),
            parent: Some(Arc::clone(self)),
            owner,
            group,
            uid_map,
            gid_map,
            depth,
        });
        debug!(
            "created user namespace {:?} (parent {:?}, owner {}, {} uid / {} gid range(s))",
            ns.id,
            self.id,
            owner,
            ns.uid_map.len(),
            ns.gid_map.len()
        );
        Ok(ns)
    }

    /// Every parent-side interval of `child` must be mapped by `parent_map`.
    fn check_mapped_in(parent_map: &IdentityMap, child: &IdentityMap) -> Result<()> {
        match child
            .ranges()
            .iter()
            .find(|pair| !parent_map.covers(pair.parent, pair.len))
        {
            Some(pair) => Err(AuthError::UnmappedParentRange(*pair)),
            None => Ok(()),
        }
    }

    /// Process-unique handle of this namespace.
    #[inline]
    pub fn id(&self) -> NamespaceId {
        self.id
    }

    /// The namespace this one was created in; `None` for a root namespace.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<UserNamespace>> {
        self.parent.as_ref()
    }

    /// Whether this namespace has no parent.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Effective user id of the namespace's creator.
    #[inline]
    pub fn owner(&self) -> Kuid {
        self.owner
    }

    /// Effective group id of the namespace's creator.
    #[inline]
    pub fn group(&self) -> Kgid {
        self.group
    }

    /// Number of ancestors; 0 for a root namespace.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Map from user ids of this namespace to user ids of the parent.
    #[inline]
    pub fn uid_map(&self) -> &IdentityMap {
        &self.uid_map
    }

    /// Map from group ids of this namespace to group ids of the parent.
    #[inline]
    pub fn gid_map(&self) -> &IdentityMap {
        &self.gid_map
    }

    #[inline]
    fn map(&self, kind: IdKind) -> &IdentityMap {
        match kind {
            IdKind::User => &self.uid_map,
            IdKind::Group => &self.gid_map,
        }
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn is_same_or_ancestor_of(&self, other: &UserNamespace) -> bool {
        let mut ns = other;
        loop {
            if ns.id == self.id {
                return true;
            }
            match &ns.parent {
                Some(parent) => ns = parent,
                None => return false,
            }
        }
    }

    /// Translate an id of this namespace into the root namespace.
    ///
    /// Walks up the parent chain translating at every hop. Returns `None` if
    /// any hop has no covering range. The result is never substituted with an
    /// overflow id; callers decide what an unmapped id means.
    pub fn translate_to_root(&self, kind: IdKind, id: u32) -> Option<u32> {
        let mut ns = self;
        let mut id = id;
        loop {
            id = ns.map(kind).translate(id)?;
            match &ns.parent {
                Some(parent) => ns = parent,
                None => return Some(id),
            }
        }
    }

    /// Translate a root namespace id into this namespace.
    ///
    /// Reverse-translates at every hop from the root down to `self`. Returns
    /// `None` if any hop has no covering range.
    pub fn translate_from_root(&self, kind: IdKind, root_id: u32) -> Option<u32> {
        let parent_id = match &self.parent {
            Some(parent) => parent.translate_from_root(kind, root_id)?,
            None => root_id,
        };
        self.map(kind).reverse_translate(parent_id)
    }

    /// The canonical form of a user id of this namespace.
    #[inline]
    pub fn map_to_kuid(&self, uid: Uid) -> Option<Kuid> {
        self.translate_to_root(IdKind::User, uid.0).map(Kuid)
    }

    /// The canonical form of a group id of this namespace.
    #[inline]
    pub fn map_to_kgid(&self, gid: Gid) -> Option<Kgid> {
        self.translate_to_root(IdKind::Group, gid.0).map(Kgid)
    }

    /// How `kuid` appears inside this namespace.
    #[inline]
    pub fn map_from_kuid(&self, kuid: Kuid) -> Option<Uid> {
        self.translate_from_root(IdKind::User, kuid.0).map(Uid)
    }

    /// How `kgid` appears inside this namespace.
    #[inline]
    pub fn map_from_kgid(&self, kgid: Kgid) -> Option<Gid> {
        self.translate_from_root(IdKind::Group, kgid.0).map(Gid)
    }

    /// Like [`map_from_kuid`](Self::map_from_kuid), reporting the overflow
    /// user id when `kuid` has no mapping here.
    pub fn map_from_kuid_or_overflow(&self, kuid: Kuid) -> Uid {
        self.map_from_kuid(kuid)
            .unwrap_or(Uid(config().overflow_uid))
    }

    /// Like [`map_from_kgid`](Self::map_from_kgid), reporting the overflow
    /// group id when `kgid` has no mapping here.
    pub fn map_from_kgid_or_overflow(&self, kgid: Kgid) -> Gid {
        self.map_from_kgid(kgid)
            .unwrap_or(Gid(config().overflow_gid))
    }
}

impl PartialEq for UserNamespace {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UserNamespace {}

impl fmt::Debug for UserNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserNamespace")
            .field("id", &self.id)
            .field("parent", &self.parent.as_ref().map(|p| p.id))
            .field("owner", &self.owner)
            .field("depth", &self.depth)
            .field("uid_ranges", &self.uid_map.ranges())
            .field("gid_ranges", &self.gid_map.ranges())
            .finish()
    }
}
