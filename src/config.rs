//! Process-wide configuration.
//!
//! Installed at most once, before the first namespace is created. Readers that
//! run before `configure` see [`AuthConfig::default`].

use spin::Once;

use crate::ns::id::{DEFAULT_OVERFLOW_GID, DEFAULT_OVERFLOW_UID};

/// Maximum nesting of user namespaces below the root (Linux uses 32).
pub const DEFAULT_MAX_USERNS_DEPTH: usize = 32;

/// Upper bound for [`AuthConfig::max_userns_depth`].
///
/// Walking from the root and dropping a namespace chain both recurse once
/// per level, so the depth must stay small.
pub const MAX_USERNS_DEPTH: usize = 32;

/// Identity subsystem configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthConfig {
    /// User id reported for users with no mapping in the observer's namespace.
    pub overflow_uid: u32,
    /// Group id reported for groups with no mapping in the observer's namespace.
    pub overflow_gid: u32,
    /// How many user namespaces may be nested below the root. Values above
    /// [`MAX_USERNS_DEPTH`] are lowered to it when installed.
    pub max_userns_depth: usize,
}

impl AuthConfig {
    /// The built-in defaults.
    pub const fn new() -> Self {
        Self {
            overflow_uid: DEFAULT_OVERFLOW_UID,
            overflow_gid: DEFAULT_OVERFLOW_GID,
            max_userns_depth: DEFAULT_MAX_USERNS_DEPTH,
        }
    }

    /// This configuration with `max_userns_depth` capped at
    /// [`MAX_USERNS_DEPTH`].
    pub const fn clamped(self) -> Self {
        if self.max_userns_depth > MAX_USERNS_DEPTH {
            Self {
                max_userns_depth: MAX_USERNS_DEPTH,
                ..self
            }
        } else {
            self
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig::new()
    }
}

static AUTH_CONFIG: Once<AuthConfig> = Once::new();

/// Install the configuration. Later calls are ignored.
///
/// Returns `true` if this call installed `config`.
pub fn configure(config: AuthConfig) -> bool {
    let requested = config.max_userns_depth;
    let config = config.clamped();
    if config.max_userns_depth != requested {
        log::warn!(
            "user namespace depth {} capped at {}",
            requested,
            config.max_userns_depth
        );
    }

    let mut installed = false;
    AUTH_CONFIG.call_once(|| {
        installed = true;
        config
    });
    if installed {
        log::debug!("auth config installed: {:?}", config);
    } else {
        log::warn!("auth config already installed, ignoring {:?}", config);
    }
    installed
}

/// The active configuration.
pub fn config() -> &'static AuthConfig {
    static DEFAULT_CONFIG: AuthConfig = AuthConfig::new();
    AUTH_CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}
