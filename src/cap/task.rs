//! Per-task capability sets.

use super::set::CapabilitySet;

/// The four capability sets of a task, as described in capabilities(7).
///
/// No relation between the sets is enforced here. Exec-transition policy
/// decides what to do with an inconsistent combination; see
/// [`TaskCapabilities::is_consistent`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TaskCapabilities {
    /// Ceiling of capabilities the task can ever gain.
    pub bounding: CapabilitySet,
    /// Capabilities currently in force for permission checks.
    pub effective: CapabilitySet,
    /// Capabilities the task may make effective.
    pub permitted: CapabilitySet,
    /// Capabilities preserved across exec.
    pub inheritable: CapabilitySet,
}

impl TaskCapabilities {
    /// All four sets empty.
    pub const fn empty() -> Self {
        Self {
            bounding: CapabilitySet::empty(),
            effective: CapabilitySet::empty(),
            permitted: CapabilitySet::empty(),
            inheritable: CapabilitySet::empty(),
        }
    }

    /// Every capability in bounding, effective and permitted; nothing
    /// inheritable. These are the sets of the initial root task.
    pub const fn full() -> Self {
        Self {
            bounding: CapabilitySet::all(),
            effective: CapabilitySet::all(),
            permitted: CapabilitySet::all(),
            inheritable: CapabilitySet::empty(),
        }
    }

    /// Whether effective ⊆ permitted ⊆ bounding.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.permitted.contains(self.effective) && self.bounding.contains(self.permitted)
    }

    /// Remove `caps` from the effective and permitted sets.
    #[inline]
    pub fn without(self, caps: CapabilitySet) -> Self {
        Self {
            effective: self.effective.difference(caps),
            permitted: self.permitted.difference(caps),
            ..self
        }
    }

    /// Remove `caps` from the bounding set.
    #[inline]
    pub fn without_bounding(self, caps: CapabilitySet) -> Self {
        Self {
            bounding: self.bounding.difference(caps),
            ..self
        }
    }
}
