#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing,
    dead_code
)]
//! Shared test utilities for Pony Town client integration tests.
//!
//! Provides a reference [`encode_status`] writer matching the server's wire
//! layout, plus a scripted [`MockTransport`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use ponytown_client::{
    GameStatus, HttpRequest, HttpResponse, PonyTownError, ProtocolScope, ServerFieldOrder,
    ServerStatus, Transport,
};

// ── Test encoder ────────────────────────────────────────────────────

/// Write a 7-bit encoded length followed by the UTF-8 bytes.
pub fn write_string(out: &mut Vec<u8>, s: &str) {
    let mut len = s.len() as u32;
    while len >= 0x80 {
        out.push((len as u8 & 0x7F) | 0x80);
        len >>= 7;
    }
    out.push(len as u8);
    out.extend_from_slice(s.as_bytes());
}

/// Plain (unmasked) flags word `status` would be sent with under `scope`.
///
/// Fields the scope has no bit for are silently dropped.
pub fn status_flags(status: &GameStatus, scope: &ProtocolScope) -> u16 {
    let bits = scope.status_bits();
    let mut flags = 0u16;
    let mut set = |on: bool, mask: Option<u16>| {
        if on {
            flags |= mask.unwrap_or(0);
        }
    };
    set(status.restart_notification.is_some(), bits.restart_notification);
    set(status.event.is_some(), bits.event);
    set(status.info_message.is_some(), bits.info_message);
    set(status.in_app_rollout_enabled, bits.in_app_rollout);
    set(status.info_message_dismissible.is_some(), bits.dismissible_info);
    set(status.maintenance_mode, bits.maintenance_mode);
    set(status.twitter_linked, bits.twitter_linked);
    set(status.update_mode, bits.update_mode);
    set(status.visit_prompt_enabled, bits.visit_prompt);
    set(status.boosty_support_enabled, bits.boosty_support);
    set(status.critical_twitter_warning, bits.critical_twitter_warning);
    flags
}

fn write_server(out: &mut Vec<u8>, server: &ServerStatus, scope: &ProtocolScope) {
    let bits = scope.server_bits();
    let mut flags = 0u8;
    if server.offline {
        flags |= bits.offline;
    }
    if server.restrict {
        flags |= bits.restrict;
    }
    if server.persistent_notification.is_some() {
        flags |= bits.notification;
    }

    write_string(out, &server.id);
    out.push(flags ^ scope.server_flags_mask());
    let online = (server.online_count ^ scope.online_count_mask()).to_le_bytes();
    match scope.server_layout() {
        ServerFieldOrder::OnlineCountFirst => {
            out.extend_from_slice(&online);
            if let Some(n) = &server.persistent_notification {
                write_string(out, n);
            }
        }
        ServerFieldOrder::NotificationFirst => {
            if let Some(n) = &server.persistent_notification {
                write_string(out, n);
            }
            out.extend_from_slice(&online);
        }
    }
}

/// Encode `status` the way the game server does for `scope`.
pub fn encode_status(status: &GameStatus, scope: &ProtocolScope) -> Vec<u8> {
    let bits = scope.status_bits();
    let flags = status_flags(status, scope);
    let mut out = Vec::new();

    out.extend_from_slice(&(flags ^ scope.status_mask()).to_le_bytes());
    out.push(u8::try_from(status.servers.len()).expect("at most 255 servers"));
    for server in &status.servers {
        write_server(&mut out, server, scope);
    }

    if bits.restart_notification.is_some() {
        if let Some(s) = &status.restart_notification {
            write_string(&mut out, s);
        }
    }
    if bits.event.is_some() {
        if let Some(s) = &status.event {
            write_string(&mut out, s);
        }
    }
    if bits.info_message.is_some() {
        if let Some(s) = &status.info_message {
            write_string(&mut out, s);
        }
    }
    if bits.in_app_rollout.is_some() && status.in_app_rollout_enabled {
        out.push(1);
    }
    if bits.dismissible_info.is_some() {
        if let Some(info) = &status.info_message_dismissible {
            write_string(&mut out, &info.message);
            out.extend_from_slice(&info.time_epoch_seconds.to_le_bytes());
        }
    }
    out
}

/// A server entry with no flags set.
pub fn server(id: &str, online_count: u16) -> ServerStatus {
    ServerStatus {
        id: id.into(),
        online_count,
        offline: false,
        restrict: false,
        persistent_notification: None,
    }
}

// ── MockTransport ───────────────────────────────────────────────────

/// A scripted transport for integration testing.
///
/// Responses are consumed in order by `get()`; once the script runs out every
/// call fails with a transport error. All requests are recorded in `sent`.
pub struct MockTransport {
    responses: StdMutex<VecDeque<Result<HttpResponse, PonyTownError>>>,
    /// Recorded outgoing requests.
    pub sent: Arc<StdMutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Create a mock transport with scripted responses.
    ///
    /// Returns the transport plus a shared handle for inspecting requests.
    pub fn new(
        responses: Vec<Result<HttpResponse, PonyTownError>>,
    ) -> (Self, Arc<StdMutex<Vec<HttpRequest>>>) {
        let sent = Arc::new(StdMutex::new(Vec::new()));
        let transport = Self {
            responses: StdMutex::new(VecDeque::from(responses)),
            sent: Arc::clone(&sent),
        };
        (transport, sent)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, PonyTownError> {
        self.sent.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PonyTownError::Transport("script exhausted".into())))
    }
}

/// A transport that never answers.
pub struct HangingTransport;

#[async_trait]
impl Transport for HangingTransport {
    async fn get(&self, _request: HttpRequest) -> Result<HttpResponse, PonyTownError> {
        std::future::pending().await
    }
}
