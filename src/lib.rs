//! # Pony Town Client
//!
//! Unofficial Rust client for the Pony Town game-status API.
//!
//! The status endpoint answers with a base64-encoded binary blob whose fields
//! are XOR-masked and whose layout has changed across server revisions. This
//! crate decodes it with a single parameterized decoder: each revision is a
//! [`ProtocolScope`] value, not a separate code path.
//!
//! ## Features
//!
//! - **Revision-agnostic decoding** — masks and bit layout live in [`ProtocolScope`]
//! - **Pure decoder** — [`decode_status`] does no I/O and is safe to call from any thread
//! - **Transport-agnostic** — implement the [`Transport`] trait over any HTTP stack
//!
//! ## Quick Start
//!
//! ```
//! use ponytown_client::{decode_status, ProtocolScope};
//!
//! // flags word 0x0050 ^ 80 = 0, zero servers
//! let status = decode_status(&[0x50, 0x00, 0x00], &ProtocolScope::current())?;
//! assert!(status.servers.is_empty());
//! assert_eq!(status.event, None);
//! # Ok::<(), ponytown_client::DecodeError>(())
//! ```

pub mod client;
pub mod decoder;
pub mod error;
pub mod scope;
pub mod status;
pub mod transport;

// Re-export primary types for ergonomic imports.
pub use client::{ClientConfig, PonyTownClient};
pub use decoder::{decode_status, decode_status_base64, StatusDecoder};
pub use error::{DecodeError, PonyTownError};
pub use scope::{ProtocolScope, ServerFieldOrder, ServerFlagBits, StatusBits};
pub use status::{DismissibleInfo, GameStatus, ServerStatus};
pub use transport::{HttpRequest, HttpResponse, Transport};
