//! Decoded game status records.
//!
//! These are plain values produced by [`crate::decoder`]. They serialize with
//! camelCase keys so they can be handed straight to JSON-speaking presentation
//! code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decoder;
use crate::error::DecodeError;
use crate::scope::ProtocolScope;

/// Status of a single game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    /// Short server identifier such as `main` or `safe`.
    pub id: String,
    /// Number of players currently online, already unmasked.
    pub online_count: u16,
    /// The server is down.
    pub offline: bool,
    /// Only some accounts may join.
    pub restrict: bool,
    /// Notification pinned to the server, present only when its flag bit is set.
    pub persistent_notification: Option<String>,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} players", self.id, self.online_count)
    }
}

/// An info message the player may dismiss, with the time it was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissibleInfo {
    /// Message text.
    pub message: String,
    /// Seconds since the Unix epoch.
    pub time_epoch_seconds: u32,
}

/// The game-wide status: server list, messages and feature toggles.
///
/// Optional fields are `None` exactly when the guarding bit of the flags word
/// was unset. Booleans the decoding revision does not define are `false`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    /// Servers in wire order.
    pub servers: Vec<ServerStatus>,
    /// Name of the running event, if any.
    pub event: Option<String>,
    /// Info banner text.
    pub info_message: Option<String>,
    /// Info banner the player can close.
    pub info_message_dismissible: Option<DismissibleInfo>,
    /// Raw JSON text of a scheduled restart notice.
    pub restart_notification: Option<String>,
    /// Servers are in maintenance.
    pub maintenance_mode: bool,
    /// The account has a linked Twitter profile.
    pub twitter_linked: bool,
    /// A client update is being rolled out.
    pub update_mode: bool,
    /// Show the "visit us" prompt.
    pub visit_prompt_enabled: bool,
    /// Boosty supporter perks are enabled.
    pub boosty_support_enabled: bool,
    /// In-app purchases are rolled out to this client.
    pub in_app_rollout_enabled: bool,
    /// Show the critical Twitter warning banner.
    pub critical_twitter_warning: bool,
}

impl GameStatus {
    /// Decode a raw (already base64-decoded) status blob.
    ///
    /// Shorthand for [`decoder::decode_status`].
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the buffer ends before the message does.
    pub fn decode(bytes: &[u8], scope: &ProtocolScope) -> Result<Self, DecodeError> {
        decoder::decode_status(bytes, scope)
    }

    /// Total players across every server.
    pub fn total_online(&self) -> u32 {
        self.servers.iter().map(|s| u32::from(s.online_count)).sum()
    }

    /// Look up a server by its identifier.
    pub fn server(&self, id: &str) -> Option<&ServerStatus> {
        self.servers.iter().find(|s| s.id == id)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for server in &self.servers {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{server}")?;
        }
        if let Some(event) = &self.event {
            if !first {
                writeln!(f)?;
            }
            write!(f, "event: {event}")?;
        }
        Ok(())
    }
}
