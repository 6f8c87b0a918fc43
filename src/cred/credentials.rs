//! Task Credentials
//!
//! `Credentials` is the security identity of one execution context.
//!
//! # Structure
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       Credentials                         │
//! ├───────────────────────────────────────────────────────────┤
//! │  real / effective / saved   Kuid                          │
//! │  real / effective / saved   Kgid                          │
//! │  extra_kgids                supplementary groups          │
//! │  caps                       bounding/effective/permitted/ │
//! │                             inheritable                   │
//! │  user_namespace             Arc<UserNamespace>            │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Value Semantics
//! Credentials are never changed in place. Every transition (`with_*`,
//! `drop_*`, `new_child_user_namespace`) borrows `self` and returns a new
//! value; the old value stays valid for whoever still holds it. Publishing
//! the new value to a task is the job of
//! [`TaskCredentials`](super::TaskCredentials).

use alloc::sync::Arc;
use alloc::vec::Vec;

use log::debug;

use crate::cap::{Capability, CapabilitySet, TaskCapabilities};
use crate::config::config;
use crate::error::Result;
use crate::ns::{Gid, IdRangePair, Kgid, Kuid, Uid, UserNamespace};

/// The identity of an execution context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    real_kuid: Kuid,
    effective_kuid: Kuid,
    saved_kuid: Kuid,
    real_kgid: Kgid,
    effective_kgid: Kgid,
    saved_kgid: Kgid,
    /// Sorted, without duplicates.
    extra_kgids: Vec<Kgid>,
    caps: TaskCapabilities,
    user_namespace: Arc<UserNamespace>,
}

/// Build the credentials of a new execution context.
///
/// Real, effective and saved ids are all set to `kuid`/`kgid`. With
/// `requested_caps == None` all four capability sets are empty: no privilege
/// is ever implied. The credentials keep `namespace` alive for as long as
/// they exist.
pub fn new_credentials(
    kuid: Kuid,
    kgid: Kgid,
    extra_kgids: &[Kgid],
    requested_caps: Option<&TaskCapabilities>,
    namespace: &Arc<UserNamespace>,
) -> Credentials {
    let caps = requested_caps.copied().unwrap_or_default();
    debug!(
        "new credentials: kuid={} kgid={} groups={:?} effective=[{}] ns={:?}",
        kuid,
        kgid,
        extra_kgids,
        caps.effective,
        namespace.id()
    );
    Credentials {
        real_kuid: kuid,
        effective_kuid: kuid,
        saved_kuid: kuid,
        real_kgid: kgid,
        effective_kgid: kgid,
        saved_kgid: kgid,
        extra_kgids: normalize_groups(extra_kgids),
        caps,
        user_namespace: Arc::clone(namespace),
    }
}

fn normalize_groups(groups: &[Kgid]) -> Vec<Kgid> {
    let mut groups = groups.to_vec();
    groups.sort_unstable();
    groups.dedup();
    groups
}

impl Credentials {
    /// Credentials of the initial task: uid and gid 0 with every capability.
    pub fn new_root(namespace: &Arc<UserNamespace>) -> Self {
        new_credentials(
            Kuid::ROOT,
            Kgid::ROOT,
            &[],
            Some(&TaskCapabilities::full()),
            namespace,
        )
    }

    /// Credentials with the overflow ids and no capabilities.
    pub fn new_anonymous(namespace: &Arc<UserNamespace>) -> Self {
        let cfg = config();
        new_credentials(
            Kuid(cfg.overflow_uid),
            Kgid(cfg.overflow_gid),
            &[],
            None,
            namespace,
        )
    }

    /// Real user id.
    #[inline]
    pub fn real_kuid(&self) -> Kuid {
        self.real_kuid
    }

    /// Effective user id, used for permission checks.
    #[inline]
    pub fn effective_kuid(&self) -> Kuid {
        self.effective_kuid
    }

    /// Saved set-user-id.
    #[inline]
    pub fn saved_kuid(&self) -> Kuid {
        self.saved_kuid
    }

    /// Real group id.
    #[inline]
    pub fn real_kgid(&self) -> Kgid {
        self.real_kgid
    }

    /// Effective group id, used for permission checks.
    #[inline]
    pub fn effective_kgid(&self) -> Kgid {
        self.effective_kgid
    }

    /// Saved set-group-id.
    #[inline]
    pub fn saved_kgid(&self) -> Kgid {
        self.saved_kgid
    }

    /// Supplementary groups, sorted.
    #[inline]
    pub fn extra_kgids(&self) -> &[Kgid] {
        &self.extra_kgids
    }

    /// The four capability sets.
    #[inline]
    pub fn capabilities(&self) -> &TaskCapabilities {
        &self.caps
    }

    /// The user namespace these credentials belong to.
    #[inline]
    pub fn user_namespace(&self) -> &Arc<UserNamespace> {
        &self.user_namespace
    }

    /// Whether `cap` is effective in the credentials' own namespace.
    #[inline]
    pub fn has_capability(&self, cap: Capability) -> bool {
        self.caps.effective.has(cap)
    }

    /// Whether these credentials hold `cap` in namespace `ns`.
    ///
    /// Follows user_namespaces(7):
    /// - a member of `ns` has the capabilities of its effective set;
    /// - a process in the parent of `ns` whose effective uid owns `ns` has
    ///   every capability in `ns`;
    /// - a capability held in a namespace is held in all its descendants.
    ///
    /// Returns `false` when `ns` is not the credentials' namespace or one of
    /// its descendants.
    pub fn has_capability_in(&self, cap: Capability, ns: &UserNamespace) -> bool {
        let own = &*self.user_namespace;
        let mut ns = ns;
        loop {
            if ns == own {
                return self.caps.effective.has(cap);
            }
            let parent = match ns.parent() {
                Some(parent) => parent,
                None => return false,
            };
            if **parent == *own && ns.owner() == self.effective_kuid {
                return true;
            }
            ns = parent;
        }
    }

    /// Whether `kgid` is the effective group or a supplementary group.
    pub fn in_group(&self, kgid: Kgid) -> bool {
        self.effective_kgid == kgid || self.extra_kgids.binary_search(&kgid).is_ok()
    }

    /// Resolve a user id given in the credentials' namespace to canonical
    /// form. Returns `None` if it has no mapping.
    #[inline]
    pub fn use_uid(&self, uid: Uid) -> Option<Kuid> {
        self.user_namespace.map_to_kuid(uid)
    }

    /// Resolve a group id given in the credentials' namespace to canonical
    /// form. Returns `None` if it has no mapping.
    #[inline]
    pub fn use_gid(&self, gid: Gid) -> Option<Kgid> {
        self.user_namespace.map_to_kgid(gid)
    }

    /// Copy with different capability sets.
    pub fn with_capabilities(&self, caps: TaskCapabilities) -> Self {
        Self {
            caps,
            ..self.clone()
        }
    }

    /// Copy with `caps` removed from the effective and permitted sets.
    pub fn drop_capabilities(&self, caps: CapabilitySet) -> Self {
        self.with_capabilities(self.caps.without(caps))
    }

    /// Copy with `caps` removed from the bounding set.
    pub fn drop_bounding(&self, caps: CapabilitySet) -> Self {
        self.with_capabilities(self.caps.without_bounding(caps))
    }

    /// Copy with new real, effective and saved user ids.
    pub fn with_uids(&self, real: Kuid, effective: Kuid, saved: Kuid) -> Self {
        Self {
            real_kuid: real,
            effective_kuid: effective,
            saved_kuid: saved,
            ..self.clone()
        }
    }

    /// Copy with new real, effective and saved group ids.
    pub fn with_gids(&self, real: Kgid, effective: Kgid, saved: Kgid) -> Self {
        Self {
            real_kgid: real,
            effective_kgid: effective,
            saved_kgid: saved,
            ..self.clone()
        }
    }

    /// Copy with a new supplementary group list.
    pub fn with_extra_groups(&self, extra_kgids: &[Kgid]) -> Self {
        Self {
            extra_kgids: normalize_groups(extra_kgids),
            ..self.clone()
        }
    }

    /// Create a child of the credentials' namespace, owned by the effective
    /// user and group, and return credentials that live in it.
    ///
    /// As with Linux, the creator gets the full bounding, effective and
    /// permitted sets inside the new namespace and an empty inheritable set.
    /// Ids are unchanged.
    pub fn new_child_user_namespace(
        &self,
        uid_ranges: &[IdRangePair],
        gid_ranges: &[IdRangePair],
    ) -> Result<Self> {
        let ns = self.user_namespace.new_child(
            self.effective_kuid,
            self.effective_kgid,
            uid_ranges,
            gid_ranges,
        )?;
        Ok(Self {
            caps: TaskCapabilities::full(),
            user_namespace: ns,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(effective: CapabilitySet) -> TaskCapabilities {
        TaskCapabilities {
            bounding: CapabilitySet::all(),
            effective,
            permitted: effective,
            inheritable: CapabilitySet::empty(),
        }
    }

    #[test]
    fn test_new_credentials_sets_all_three_ids() {
        let root = UserNamespace::new_root();
        let c = new_credentials(Kuid(1000), Kgid(100), &[Kgid(5), Kgid(3), Kgid(5)], None, &root);

        assert_eq!(c.real_kuid(), Kuid(1000));
        assert_eq!(c.effective_kuid(), Kuid(1000));
        assert_eq!(c.saved_kuid(), Kuid(1000));
        assert_eq!(c.real_kgid(), Kgid(100));
        assert_eq!(c.effective_kgid(), Kgid(100));
        assert_eq!(c.saved_kgid(), Kgid(100));
        assert_eq!(c.extra_kgids(), &[Kgid(3), Kgid(5)]);
    }

    #[test]
    fn test_absent_caps_grant_nothing() {
        let root = UserNamespace::new_root();
        let c = new_credentials(Kuid::ROOT, Kgid::ROOT, &[], None, &root);
        assert_eq!(*c.capabilities(), TaskCapabilities::empty());
        assert!(!c.has_capability(Capability::SysAdmin));
    }

    #[test]
    fn test_root_and_anonymous() {
        let root = UserNamespace::new_root();
        let r = Credentials::new_root(&root);
        assert!(r.has_capability(Capability::SysAdmin));
        assert!(r.effective_kuid().is_root());

        let anon = Credentials::new_anonymous(&root);
        assert_eq!(anon.effective_kuid(), Kuid(65534));
        assert_eq!(*anon.capabilities(), TaskCapabilities::empty());
    }

    #[test]
    fn test_transitions_leave_original_untouched() {
        let root = UserNamespace::new_root();
        let all = caps(CapabilitySet::all());
        let before = new_credentials(Kuid(1), Kgid(1), &[], Some(&all), &root);
        let snapshot = before.clone();

        let after = before
            .drop_capabilities(CapabilitySet::NET_ADMIN)
            .with_uids(Kuid(2), Kuid(3), Kuid(4))
            .with_extra_groups(&[Kgid(9)]);

        assert_eq!(before, snapshot);
        assert!(before.has_capability(Capability::NetAdmin));
        assert!(!after.has_capability(Capability::NetAdmin));
        assert_eq!(after.effective_kuid(), Kuid(3));
        assert_eq!(after.saved_kuid(), Kuid(4));
        assert!(after.in_group(Kgid(9)));
        assert!(!before.in_group(Kgid(9)));
    }

    #[test]
    fn test_in_group() {
        let root = UserNamespace::new_root();
        let c = new_credentials(Kuid(1), Kgid(10), &[Kgid(20), Kgid(30)], None, &root);
        assert!(c.in_group(Kgid(10)));
        assert!(c.in_group(Kgid(30)));
        assert!(!c.in_group(Kgid(40)));
    }

    #[test]
    fn test_use_uid_goes_through_namespace() {
        let root = UserNamespace::new_root();
        let parent = new_credentials(Kuid(1000), Kgid(1000), &[], None, &root);
        let r = [IdRangePair::new(0, 100000, 1000)];
        let inner = parent.new_child_user_namespace(&r, &r).unwrap();

        assert_eq!(inner.use_uid(Uid(5)), Some(Kuid(100005)));
        assert_eq!(inner.use_gid(Gid(1000)), None);
        assert_eq!(parent.use_uid(Uid(5)), Some(Kuid(5)));
    }

    #[test]
    fn test_child_namespace_creator_gets_full_caps() {
        let root = UserNamespace::new_root();
        let parent = new_credentials(Kuid(1000), Kgid(1000), &[], None, &root);
        let r = [IdRangePair::new(0, 1000, 1)];
        let inner = parent.new_child_user_namespace(&r, &r).unwrap();

        assert_eq!(*inner.capabilities(), TaskCapabilities::full());
        assert_eq!(inner.user_namespace().owner(), Kuid(1000));
        assert_eq!(inner.effective_kuid(), Kuid(1000));
        assert_eq!(inner.user_namespace().map_from_kuid(Kuid(1000)), Some(Uid(0)));
        // The parent credentials are unchanged.
        assert!(parent.user_namespace().is_root());
    }

    #[test]
    fn test_capability_in_descendant_namespaces() {
        let root = UserNamespace::new_root();
        let r = [IdRangePair::new(0, 100000, 1000)];

        // Unprivileged owner of a child namespace.
        let owner = new_credentials(Kuid(100000), Kgid(100000), &[], None, &root);
        let child = root.new_child(Kuid(100000), Kgid(100000), &r, &r).unwrap();
        assert!(!owner.has_capability(Capability::SysAdmin));
        assert!(owner.has_capability_in(Capability::SysAdmin, &child));

        // A different user in the parent is not the owner.
        let stranger = new_credentials(Kuid(7), Kgid(7), &[], None, &root);
        assert!(!stranger.has_capability_in(Capability::SysAdmin, &child));

        // Privileged in the root: privileged in every descendant.
        let admin = Credentials::new_root(&root);
        let inner = [IdRangePair::new(0, 0, 10)];
        let grandchild = child.new_child(Kuid(100000), Kgid(100000), &inner, &inner).unwrap();
        assert!(admin.has_capability_in(Capability::Kill, &grandchild));

        // Never in an ancestor or an unrelated namespace.
        let inside = owner.new_child_user_namespace(&r, &r).unwrap();
        assert!(!inside.has_capability_in(Capability::Kill, &root));
        assert!(!admin.has_capability_in(Capability::Kill, &UserNamespace::new_root()));
    }

    #[test]
    fn test_drop_bounding() {
        let root = UserNamespace::new_root();
        let c = Credentials::new_root(&root).drop_bounding(CapabilitySet::SYS_MODULE);
        assert!(!c.capabilities().bounding.has(Capability::SysModule));
        assert!(c.has_capability(Capability::SysModule));
        assert!(!c.capabilities().is_consistent());
    }
}
