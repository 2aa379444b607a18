//! Error types for the Pony Town client.

use thiserror::Error;

/// Errors produced while decoding a status blob.
///
/// Any error aborts the whole decode: the stream has no resynchronization
/// points, so a misaligned read invalidates everything after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The stream ended before a fixed-width field or a length prefix was fully read.
    #[error("unexpected end of data: needed {needed} byte(s), {remaining} remaining")]
    UnexpectedEndOfData {
        /// Bytes required by the field being read.
        needed: usize,
        /// Bytes left in the stream.
        remaining: usize,
    },

    /// A string length prefix is over-long or points past the end of the stream.
    #[error("malformed string length: declared {declared}, {remaining} byte(s) remaining")]
    MalformedLength {
        /// Declared payload length (saturated to `u64::MAX` for over-long prefixes).
        declared: u64,
        /// Bytes left in the stream after the prefix.
        remaining: usize,
    },
}

impl DecodeError {
    /// Returns `true` if the error means the input ran out of bytes.
    ///
    /// [`MalformedLength`](DecodeError::MalformedLength) counts as truncation
    /// unless the prefix itself was over-long.
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::UnexpectedEndOfData { .. } => true,
            Self::MalformedLength { declared, .. } => *declared != u64::MAX,
        }
    }
}

/// Errors that can occur when using the Pony Town client.
#[derive(Debug, Error)]
pub enum PonyTownError {
    /// The status blob could not be decoded.
    #[error("status decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The response body was not valid base64.
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The transport failed to perform the request.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server refused the request (HTTP 403).
    #[error("request forbidden by server")]
    Forbidden,

    /// The server answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message taken from the JSON error envelope, if any.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,
}

/// A specialized [`Result`] type for Pony Town client operations.
pub type Result<T> = std::result::Result<T, PonyTownError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_classification() {
        let eod = DecodeError::UnexpectedEndOfData {
            needed: 2,
            remaining: 1,
        };
        let short = DecodeError::MalformedLength {
            declared: 5,
            remaining: 3,
        };
        let overlong = DecodeError::MalformedLength {
            declared: u64::MAX,
            remaining: 10,
        };
        assert!(eod.is_truncation());
        assert!(short.is_truncation());
        assert!(!overlong.is_truncation());
    }

    #[test]
    fn decode_error_converts_into_client_error() {
        let err: PonyTownError = DecodeError::UnexpectedEndOfData {
            needed: 1,
            remaining: 0,
        }
        .into();
        assert!(matches!(err, PonyTownError::Decode(_)));
        assert_eq!(
            err.to_string(),
            "status decode error: unexpected end of data: needed 1 byte(s), 0 remaining"
        );
    }
}
