//! Linux Capability Table
//!
//! The fixed enumeration of Linux capabilities and their canonical names.
//!
//! # Table Layout
//! ```text
//! ┌─────────┬──────────────────────────┐
//! │ ordinal │ name                     │
//! ├─────────┼──────────────────────────┤
//! │    0    │ CAP_CHOWN                │
//! │    1    │ CAP_DAC_OVERRIDE         │
//! │   ...   │ ...                      │
//! │   40    │ CAP_CHECKPOINT_RESTORE   │
//! └─────────┴──────────────────────────┘
//! ```
//!
//! The table is `const` data: it is never registered or mutated at runtime.

use core::fmt;

/// A single Linux capability.
///
/// The discriminant is the capability's ordinal, which is also its bit
/// position in a [`CapabilitySet`](super::CapabilitySet).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Capability {
    Chown = 0,
    DacOverride = 1,
    DacReadSearch = 2,
    Fowner = 3,
    Fsetid = 4,
    Kill = 5,
    Setgid = 6,
    Setuid = 7,
    Setpcap = 8,
    LinuxImmutable = 9,
    NetBindService = 10,
    NetBroadcast = 11,
    NetAdmin = 12,
    NetRaw = 13,
    IpcLock = 14,
    IpcOwner = 15,
    SysModule = 16,
    SysRawio = 17,
    SysChroot = 18,
    SysPtrace = 19,
    SysPacct = 20,
    SysAdmin = 21,
    SysBoot = 22,
    SysNice = 23,
    SysResource = 24,
    SysTime = 25,
    SysTtyConfig = 26,
    Mknod = 27,
    Lease = 28,
    AuditWrite = 29,
    AuditControl = 30,
    Setfcap = 31,
    MacOverride = 32,
    MacAdmin = 33,
    Syslog = 34,
    WakeAlarm = 35,
    BlockSuspend = 36,
    AuditRead = 37,
    Perfmon = 38,
    Bpf = 39,
    CheckpointRestore = 40,
}

/// The highest valid capability.
pub const CAP_LAST_CAP: Capability = Capability::CheckpointRestore;

/// Number of capabilities in the table.
pub const CAP_COUNT: usize = CAP_LAST_CAP as usize + 1;

/// Every capability paired with its canonical name, in ordinal order.
///
/// The position of each entry equals the capability's ordinal.
static CAPABILITY_TABLE: [(Capability, &str); CAP_COUNT] = [
    (Capability::Chown, "CAP_CHOWN"),
    (Capability::DacOverride, "CAP_DAC_OVERRIDE"),
    (Capability::DacReadSearch, "CAP_DAC_READ_SEARCH"),
    (Capability::Fowner, "CAP_FOWNER"),
    (Capability::Fsetid, "CAP_FSETID"),
    (Capability::Kill, "CAP_KILL"),
    (Capability::Setgid, "CAP_SETGID"),
    (Capability::Setuid, "CAP_SETUID"),
    (Capability::Setpcap, "CAP_SETPCAP"),
    (Capability::LinuxImmutable, "CAP_LINUX_IMMUTABLE"),
    (Capability::NetBindService, "CAP_NET_BIND_SERVICE"),
    (Capability::NetBroadcast, "CAP_NET_BROADCAST"),
    (Capability::NetAdmin, "CAP_NET_ADMIN"),
    (Capability::NetRaw, "CAP_NET_RAW"),
    (Capability::IpcLock, "CAP_IPC_LOCK"),
    (Capability::IpcOwner, "CAP_IPC_OWNER"),
    (Capability::SysModule, "CAP_SYS_MODULE"),
    (Capability::SysRawio, "CAP_SYS_RAWIO"),
    (Capability::SysChroot, "CAP_SYS_CHROOT"),
    (Capability::SysPtrace, "CAP_SYS_PTRACE"),
    (Capability::SysPacct, "CAP_SYS_PACCT"),
    (Capability::SysAdmin, "CAP_SYS_ADMIN"),
    (Capability::SysBoot, "CAP_SYS_BOOT"),
    (Capability::SysNice, "CAP_SYS_NICE"),
    (Capability::SysResource, "CAP_SYS_RESOURCE"),
    (Capability::SysTime, "CAP_SYS_TIME"),
    (Capability::SysTtyConfig, "CAP_SYS_TTY_CONFIG"),
    (Capability::Mknod, "CAP_MKNOD"),
    (Capability::Lease, "CAP_LEASE"),
    (Capability::AuditWrite, "CAP_AUDIT_WRITE"),
    (Capability::AuditControl, "CAP_AUDIT_CONTROL"),
    (Capability::Setfcap, "CAP_SETFCAP"),
    (Capability::MacOverride, "CAP_MAC_OVERRIDE"),
    (Capability::MacAdmin, "CAP_MAC_ADMIN"),
    (Capability::Syslog, "CAP_SYSLOG"),
    (Capability::WakeAlarm, "CAP_WAKE_ALARM"),
    (Capability::BlockSuspend, "CAP_BLOCK_SUSPEND"),
    (Capability::AuditRead, "CAP_AUDIT_READ"),
    (Capability::Perfmon, "CAP_PERFMON"),
    (Capability::Bpf, "CAP_BPF"),
    (Capability::CheckpointRestore, "CAP_CHECKPOINT_RESTORE"),
];

impl Capability {
    /// Look up a capability by its canonical name.
    ///
    /// Matching is exact and case-sensitive: `"CAP_NET_ADMIN"` is accepted,
    /// `"cap_net_admin"` and `"NET_ADMIN"` are not.
    pub fn from_name(name: &str) -> Option<Self> {
        CAPABILITY_TABLE
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(cap, _)| *cap)
    }

    /// Look up a capability by ordinal.
    #[inline]
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        CAPABILITY_TABLE.get(ordinal as usize).map(|(cap, _)| *cap)
    }

    /// The canonical external name, e.g. `CAP_NET_ADMIN`.
    #[inline]
    pub fn name(self) -> &'static str {
        CAPABILITY_TABLE[self as usize].1
    }

    /// The ordinal (bit position) of this capability.
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Iterate over every capability in ordinal order.
    pub fn iter() -> impl Iterator<Item = Capability> {
        CAPABILITY_TABLE.iter().map(|(cap, _)| *cap)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
