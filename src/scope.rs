//! Protocol revision parameters for the status blob.
//!
//! The game obfuscates the status message with XOR masks and reshuffles the
//! meaning of the flag bits every so often. A [`ProtocolScope`] pins one such
//! revision as data, so supporting a new revision means constructing a new
//! scope rather than writing a new decoder.
//!
//! # Example
//!
//! ```
//! use ponytown_client::scope::{ProtocolScope, ServerFieldOrder};
//!
//! let scope = ProtocolScope::new(80, 213, 50071)
//!     .with_server_layout(ServerFieldOrder::NotificationFirst)
//!     .with_default_api_version("abc123");
//! assert_eq!(scope.status_mask(), 80);
//! assert_eq!(scope.default_api_version(), Some("abc123"));
//! ```

use serde::{Deserialize, Serialize};

/// Returns `true` if every bit of `mask` is set in `value`.
///
/// Absent and zero masks never match.
pub(crate) fn bit_set(value: u16, mask: Option<u16>) -> bool {
    matches!(mask, Some(m) if m != 0 && value & m == m)
}

// ── Bit maps ────────────────────────────────────────────────────────

/// Bit positions of the fields carried by the status flags word.
///
/// Each entry is a mask tested against the unmasked flags word. `None` means
/// the revision does not have the field at all: booleans read as `false` and
/// optional values as `None`, and nothing is consumed from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBits {
    /// A restart notice (raw JSON text) follows the server list.
    pub restart_notification: Option<u16>,
    /// An event name follows.
    pub event: Option<u16>,
    /// An info message follows.
    pub info_message: Option<u16>,
    /// An in-app rollout boolean byte follows.
    pub in_app_rollout: Option<u16>,
    /// A dismissible info message and its timestamp follow.
    pub dismissible_info: Option<u16>,
    /// Servers are in maintenance.
    pub maintenance_mode: Option<u16>,
    /// The account has a linked Twitter profile.
    pub twitter_linked: Option<u16>,
    /// A client update is being rolled out.
    pub update_mode: Option<u16>,
    /// Show the "visit us" prompt.
    pub visit_prompt: Option<u16>,
    /// Boosty supporter perks are enabled.
    pub boosty_support: Option<u16>,
    /// Show the critical Twitter warning banner.
    pub critical_twitter_warning: Option<u16>,
}

impl StatusBits {
    /// Bit map of the oldest recovered revision.
    pub const LEGACY: Self = Self {
        restart_notification: None,
        event: Some(8),
        info_message: Some(32),
        in_app_rollout: Some(64),
        dismissible_info: Some(128),
        maintenance_mode: Some(2),
        twitter_linked: Some(4),
        update_mode: Some(1),
        visit_prompt: Some(16),
        boosty_support: Some(256),
        critical_twitter_warning: Some(512),
    };

    /// Bit map of the most recent recovered revision.
    ///
    /// Maintenance and update mode were dropped from the word; bit 1 now
    /// announces a restart notice.
    pub const CURRENT: Self = Self {
        restart_notification: Some(1),
        event: Some(4),
        info_message: Some(16),
        in_app_rollout: Some(32),
        dismissible_info: Some(64),
        maintenance_mode: None,
        twitter_linked: Some(2),
        update_mode: None,
        visit_prompt: Some(8),
        boosty_support: Some(128),
        critical_twitter_warning: Some(256),
    };
}

/// Bit positions inside a server's flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFlagBits {
    /// The server is offline.
    pub offline: u8,
    /// Joining the server is restricted.
    pub restrict: u8,
    /// A persistent notification string is present in the entry.
    pub notification: u8,
}

impl ServerFlagBits {
    /// The mapping used by every recovered revision.
    pub const STANDARD: Self = Self {
        offline: 1,
        restrict: 2,
        notification: 4,
    };

    pub(crate) fn test(value: u8, mask: u8) -> bool {
        bit_set(u16::from(value), Some(u16::from(mask)))
    }
}

impl Default for ServerFlagBits {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Order of the two fields following a server's flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerFieldOrder {
    /// Online count, then the optional persistent notification.
    #[default]
    OnlineCountFirst,
    /// Optional persistent notification, then the online count.
    NotificationFirst,
}

// ── ProtocolScope ───────────────────────────────────────────────────

/// Obfuscation masks and bit layout of one status-blob revision.
///
/// Immutable once built: the `with_*` methods consume the scope and return a
/// modified copy. A scope is cheap to clone and safe to share between threads.
///
/// A buffer decoded with the wrong scope does not fail; it yields
/// plausible-looking garbage. Pin the scope matching the server you talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolScope {
    status_mask: u16,
    server_flags_mask: u8,
    online_count_mask: u16,
    #[serde(default)]
    default_api_version: Option<String>,
    #[serde(default = "default_status_bits")]
    status_bits: StatusBits,
    #[serde(default)]
    server_bits: ServerFlagBits,
    #[serde(default)]
    server_layout: ServerFieldOrder,
}

fn default_status_bits() -> StatusBits {
    StatusBits::CURRENT
}

impl ProtocolScope {
    /// Create a scope with the given masks and the current revision's bit layout.
    pub fn new(status_mask: u16, server_flags_mask: u8, online_count_mask: u16) -> Self {
        Self {
            status_mask,
            server_flags_mask,
            online_count_mask,
            default_api_version: None,
            status_bits: StatusBits::CURRENT,
            server_bits: ServerFlagBits::STANDARD,
            server_layout: ServerFieldOrder::OnlineCountFirst,
        }
    }

    /// The most recent recovered revision. Same as [`ProtocolScope::default`].
    pub fn current() -> Self {
        Self::new(80, 213, 50071)
    }

    /// The oldest recovered revision, which still carried maintenance and
    /// update mode in the flags word.
    pub fn legacy() -> Self {
        Self::new(244, 113, 34867).with_status_bits(StatusBits::LEGACY)
    }

    /// Preset the API version header the client sends.
    #[must_use]
    pub fn with_default_api_version(mut self, version: impl Into<String>) -> Self {
        self.default_api_version = Some(version.into());
        self
    }

    /// Replace the flags-word bit map.
    #[must_use]
    pub fn with_status_bits(mut self, bits: StatusBits) -> Self {
        self.status_bits = bits;
        self
    }

    /// Replace the server flags-byte bit map.
    #[must_use]
    pub fn with_server_bits(mut self, bits: ServerFlagBits) -> Self {
        self.server_bits = bits;
        self
    }

    /// Set the order of the online count and notification in a server entry.
    #[must_use]
    pub fn with_server_layout(mut self, layout: ServerFieldOrder) -> Self {
        self.server_layout = layout;
        self
    }

    /// XOR mask of the status flags word.
    pub fn status_mask(&self) -> u16 {
        self.status_mask
    }

    /// XOR mask of each server's flags byte.
    pub fn server_flags_mask(&self) -> u8 {
        self.server_flags_mask
    }

    /// XOR mask of each server's online count.
    pub fn online_count_mask(&self) -> u16 {
        self.online_count_mask
    }

    /// API version token preset for this revision, if any.
    pub fn default_api_version(&self) -> Option<&str> {
        self.default_api_version.as_deref()
    }

    /// Bit map of the status flags word.
    pub fn status_bits(&self) -> &StatusBits {
        &self.status_bits
    }

    /// Bit map of a server's flags byte.
    pub fn server_bits(&self) -> &ServerFlagBits {
        &self.server_bits
    }

    /// Order of the fields after a server's flags byte.
    pub fn server_layout(&self) -> ServerFieldOrder {
        self.server_layout
    }
}

impl Default for ProtocolScope {
    fn default() -> Self {
        Self::current()
    }
}
