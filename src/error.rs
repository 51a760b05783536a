use std::io;

use crate::hcioctl::Operation;

/// Errors raised while building requests or talking to the board.
#[derive(Debug, thiserror::Error)]
pub enum HcError {
    #[error("invalid chip select mask {mask:#06x}: {reason}")]
    InvalidChipMask { mask: u16, reason: &'static str },

    #[error("payload of {len} {unit} exceeds the limit of {max} {unit}")]
    PayloadTooLarge {
        len: usize,
        max: usize,
        unit: &'static str,
    },

    #[error("control call {op} failed: {source}")]
    TransportFailure {
        op: Operation,
        #[source]
        source: io::Error,
    },

    #[error("malformed {what} record: expected {expected} bytes, got {actual}")]
    Malformed {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("short response to {op}: expected {expected} bytes, got {actual}")]
    ShortResponse {
        op: Operation,
        expected: usize,
        actual: usize,
    },

    #[error("an IO error occured: {0}")]
    Io(#[from] io::Error),
}

impl HcError {
    pub(crate) fn transport(op: Operation, source: impl Into<io::Error>) -> Self {
        HcError::TransportFailure {
            op,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HcError>;
