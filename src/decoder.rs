//! Status-blob decoder.
//!
//! The status endpoint returns a flat binary stream with no framing beyond
//! its flag bits:
//!
//! ```text
//! u16  flags word            (LE, XOR status_mask)
//! u8   server count N
//! N x  server entry
//!        str  id
//!        u8   server flags   (XOR server_flags_mask)
//!        u16  online count   (LE, XOR online_count_mask)  \ order set by
//!        str  notification   (if notification bit)        / server_layout
//! str  restart notice        (if restart bit)
//! str  event                 (if event bit)
//! str  info message          (if info bit)
//! u8   in-app rollout        (if in-app bit, non-zero = true)
//! str  dismissible message   \ (if dismissible bit)
//! u32  dismissible time (LE) /
//! ```
//!
//! `str` is a 7-bit encoded length (at most five bytes) followed by that many
//! UTF-8 bytes. Parsing rules:
//! - Never index the buffer; check `remaining()` before every `Buf` read.
//! - No partial results: the first short read fails the whole decode.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Buf;

use crate::error::{DecodeError, PonyTownError};
use crate::scope::{bit_set, ProtocolScope, ServerFieldOrder, ServerFlagBits};
use crate::status::{DismissibleInfo, GameStatus, ServerStatus};

/// Longest accepted 7-bit length prefix, in bytes.
const MAX_LENGTH_PREFIX: usize = 5;

// ── Reader ──────────────────────────────────────────────────────────

/// Sequential little-endian reader over a borrowed buffer.
struct StatusReader<'a> {
    buf: &'a [u8],
}

impl<'a> StatusReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn ensure(&self, needed: usize) -> Result<(), DecodeError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(DecodeError::UnexpectedEndOfData { needed, remaining });
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.ensure(2)?;
        Ok(self.buf.get_u16_le())
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a 7-bit encoded length: low groups first, high bit = continue.
    fn read_length(&mut self) -> Result<u64, DecodeError> {
        let mut value: u64 = 0;
        for index in 0..MAX_LENGTH_PREFIX {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::MalformedLength {
            declared: u64::MAX,
            remaining: self.buf.remaining(),
        })
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let declared = self.read_length()?;
        let remaining = self.buf.remaining();
        let len = usize::try_from(declared)
            .ok()
            .filter(|len| *len <= remaining)
            .ok_or(DecodeError::MalformedLength {
                declared,
                remaining,
            })?;

        let mut raw = vec![0u8; len];
        self.buf.copy_to_slice(&mut raw);
        Ok(String::from_utf8(raw)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }

    fn read_string_if(&mut self, present: bool) -> Result<Option<String>, DecodeError> {
        if present {
            self.read_string().map(Some)
        } else {
            Ok(None)
        }
    }
}

// ── Decoder ─────────────────────────────────────────────────────────

/// Decoder bound to one [`ProtocolScope`].
///
/// Holds nothing but the scope reference, so one decoder can serve any number
/// of buffers, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct StatusDecoder<'s> {
    scope: &'s ProtocolScope,
}

impl<'s> StatusDecoder<'s> {
    /// Create a decoder for `scope`.
    pub fn new(scope: &'s ProtocolScope) -> Self {
        Self { scope }
    }

    /// The scope this decoder reads with.
    pub fn scope(&self) -> &'s ProtocolScope {
        self.scope
    }

    /// Decode one status blob.
    ///
    /// Trailing bytes after the last field are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEndOfData`] when the buffer ends
    /// inside a field and [`DecodeError::MalformedLength`] when a string
    /// length prefix is over-long or points past the end.
    pub fn decode(&self, bytes: &[u8]) -> Result<GameStatus, DecodeError> {
        let scope = self.scope;
        let bits = scope.status_bits();
        let mut reader = StatusReader::new(bytes);

        let flags = reader.read_u16()? ^ scope.status_mask();
        let count = reader.read_u8()?;

        let mut servers = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            servers.push(self.read_server(&mut reader)?);
        }

        let restart_notification =
            reader.read_string_if(bit_set(flags, bits.restart_notification))?;
        let event = reader.read_string_if(bit_set(flags, bits.event))?;
        let info_message = reader.read_string_if(bit_set(flags, bits.info_message))?;
        let in_app_rollout_enabled = if bit_set(flags, bits.in_app_rollout) {
            reader.read_bool()?
        } else {
            false
        };
        let info_message_dismissible = if bit_set(flags, bits.dismissible_info) {
            let message = reader.read_string()?;
            let time_epoch_seconds = reader.read_u32()?;
            Some(DismissibleInfo {
                message,
                time_epoch_seconds,
            })
        } else {
            None
        };

        Ok(GameStatus {
            servers,
            event,
            info_message,
            info_message_dismissible,
            restart_notification,
            maintenance_mode: bit_set(flags, bits.maintenance_mode),
            twitter_linked: bit_set(flags, bits.twitter_linked),
            update_mode: bit_set(flags, bits.update_mode),
            visit_prompt_enabled: bit_set(flags, bits.visit_prompt),
            boosty_support_enabled: bit_set(flags, bits.boosty_support),
            in_app_rollout_enabled,
            critical_twitter_warning: bit_set(flags, bits.critical_twitter_warning),
        })
    }

    fn read_server(&self, reader: &mut StatusReader<'_>) -> Result<ServerStatus, DecodeError> {
        let scope = self.scope;
        let bits = scope.server_bits();

        let id = reader.read_string()?;
        let flags = reader.read_u8()? ^ scope.server_flags_mask();
        let has_notification = ServerFlagBits::test(flags, bits.notification);

        let (online_count, persistent_notification) = match scope.server_layout() {
            ServerFieldOrder::OnlineCountFirst => {
                let online = reader.read_u16()? ^ scope.online_count_mask();
                (online, reader.read_string_if(has_notification)?)
            }
            ServerFieldOrder::NotificationFirst => {
                let notification = reader.read_string_if(has_notification)?;
                (reader.read_u16()? ^ scope.online_count_mask(), notification)
            }
        };

        Ok(ServerStatus {
            id,
            online_count,
            offline: ServerFlagBits::test(flags, bits.offline),
            restrict: ServerFlagBits::test(flags, bits.restrict),
            persistent_notification,
        })
    }
}

/// Decode a raw status blob with the given scope.
///
/// # Errors
///
/// See [`StatusDecoder::decode`].
pub fn decode_status(bytes: &[u8], scope: &ProtocolScope) -> Result<GameStatus, DecodeError> {
    StatusDecoder::new(scope).decode(bytes)
}

/// Decode the base64 text body returned by the status endpoint.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`PonyTownError::Base64`] for invalid base64 and
/// [`PonyTownError::Decode`] if the decoded bytes are not a complete message.
pub fn decode_status_base64(
    body: &str,
    scope: &ProtocolScope,
) -> Result<GameStatus, PonyTownError> {
    let bytes = STANDARD.decode(body.trim())?;
    Ok(decode_status(&bytes, scope)?)
}
