//! Capability Sets
//!
//! A `CapabilitySet` is a 64-bit mask indexed by [`Capability`] ordinal.
//! Bits above [`CAP_LAST_CAP`] are never set: the mask itself is private,
//! and raw masks coming from outside go through [`CapabilitySet::from_raw`]
//! (reject) or [`CapabilitySet::from_bits_truncate`] (drop).
//!
//! Sets are `Copy` values. Every operation returns a new set.

use core::fmt;
use core::ops::{BitAnd, BitOr, Sub};

use bitflags::bitflags;

use super::capability::{Capability, CAP_LAST_CAP};

/// Declares the private bit type and one public constant per capability, so
/// the two lists cannot drift apart.
macro_rules! capability_flags {
    ($($flag:ident = $cap:ident),* $(,)?) => {
        bitflags! {
            #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
            struct Bits: u64 {
                $(const $flag = 1 << (Capability::$cap as u64);)*
            }
        }

        impl CapabilitySet {
            $(
                #[doc = concat!("The set containing only `", stringify!($cap), "`.")]
                pub const $flag: Self = Self(Bits::$flag);
            )*
        }
    };
}

/// A set of Linux capabilities.
///
/// The bit mask is private: every constructor either truncates or rejects
/// bits outside the capability table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CapabilitySet(Bits);

capability_flags! {
    CHOWN = Chown,
    DAC_OVERRIDE = DacOverride,
    DAC_READ_SEARCH = DacReadSearch,
    FOWNER = Fowner,
    FSETID = Fsetid,
    KILL = Kill,
    SETGID = Setgid,
    SETUID = Setuid,
    SETPCAP = Setpcap,
    LINUX_IMMUTABLE = LinuxImmutable,
    NET_BIND_SERVICE = NetBindService,
    NET_BROADCAST = NetBroadcast,
    NET_ADMIN = NetAdmin,
    NET_RAW = NetRaw,
    IPC_LOCK = IpcLock,
    IPC_OWNER = IpcOwner,
    SYS_MODULE = SysModule,
    SYS_RAWIO = SysRawio,
    SYS_CHROOT = SysChroot,
    SYS_PTRACE = SysPtrace,
    SYS_PACCT = SysPacct,
    SYS_ADMIN = SysAdmin,
    SYS_BOOT = SysBoot,
    SYS_NICE = SysNice,
    SYS_RESOURCE = SysResource,
    SYS_TIME = SysTime,
    SYS_TTY_CONFIG = SysTtyConfig,
    MKNOD = Mknod,
    LEASE = Lease,
    AUDIT_WRITE = AuditWrite,
    AUDIT_CONTROL = AuditControl,
    SETFCAP = Setfcap,
    MAC_OVERRIDE = MacOverride,
    MAC_ADMIN = MacAdmin,
    SYSLOG = Syslog,
    WAKE_ALARM = WakeAlarm,
    BLOCK_SUSPEND = BlockSuspend,
    AUDIT_READ = AuditRead,
    PERFMON = Perfmon,
    BPF = Bpf,
    CHECKPOINT_RESTORE = CheckpointRestore,
}

impl CapabilitySet {
    /// Mask of every valid capability bit.
    pub const VALID_MASK: u64 = (1u64 << (CAP_LAST_CAP as u64 + 1)) - 1;

    /// The empty set.
    #[inline]
    pub const fn empty() -> Self {
        Self(Bits::empty())
    }

    /// Every capability in the table.
    #[inline]
    pub const fn all() -> Self {
        Self(Bits::all())
    }

    /// Get the raw bits.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0.bits()
    }

    /// The set containing exactly `cap`.
    #[inline]
    pub const fn of(cap: Capability) -> Self {
        Self(Bits::from_bits_truncate(1u64 << (cap as u64)))
    }

    /// Create a set from a raw mask.
    ///
    /// Returns `None` if any bit outside the capability table is set.
    #[inline]
    pub const fn from_raw(bits: u64) -> Option<Self> {
        match Bits::from_bits(bits) {
            Some(bits) => Some(Self(bits)),
            None => None,
        }
    }

    /// Create a set from a raw mask, dropping bits outside the table.
    #[inline]
    pub const fn from_bits_truncate(bits: u64) -> Self {
        Self(Bits::from_bits_truncate(bits))
    }

    /// Whether the set has no members.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// Whether every capability is a member.
    #[inline]
    pub const fn is_all(self) -> bool {
        self.0.is_all()
    }

    /// Whether every member of `other` is also a member of `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0.contains(other.0)
    }

    /// Whether the two sets share a member.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0.intersects(other.0)
    }

    /// Members of either set.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0.union(other.0))
    }

    /// Members of both sets.
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0.intersection(other.0))
    }

    /// Members of `self` that are not in `other`.
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0.difference(other.0))
    }

    /// Every capability not in `self`.
    #[inline]
    pub const fn complement(self) -> Self {
        Self(self.0.complement())
    }

    /// Check whether `cap` is a member of this set.
    #[inline]
    pub const fn has(self, cap: Capability) -> bool {
        self.contains(Self::of(cap))
    }

    /// Return a copy of this set with `cap` added.
    #[inline]
    pub const fn with(self, cap: Capability) -> Self {
        self.union(Self::of(cap))
    }

    /// Return a copy of this set with `cap` removed.
    #[inline]
    pub const fn without(self, cap: Capability) -> Self {
        self.difference(Self::of(cap))
    }

    /// Iterate over the member capabilities in ordinal order.
    pub fn capabilities(self) -> impl Iterator<Item = Capability> {
        Capability::iter().filter(move |cap| self.has(*cap))
    }

    /// Canonical names of the member capabilities, in ordinal order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        self.capabilities().map(Capability::name)
    }
}

impl BitOr for CapabilitySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitAnd for CapabilitySet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl Sub for CapabilitySet {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Capability> for CapabilitySet {
    fn from(cap: Capability) -> Self {
        Self::of(cap)
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, cap| set.with(cap))
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.capabilities()).finish()
    }
}

/// Formats as a comma-separated list of canonical names.
impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
