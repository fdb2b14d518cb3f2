use thiserror::Error;

/// Errors from the record codec.
///
/// Only `EndOfStream` marks a clean stop; everything else means the stream
/// is corrupt or still being appended at the reported offset. Replay treats
/// all of these as stop conditions, never as fatal failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The cursor sits exactly on a record boundary with no bytes left.
    #[error("end of stream")]
    EndOfStream,

    #[error("truncated record at offset {offset}: need {needed} bytes, {have} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        have: usize,
    },

    #[error("unknown record tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("{what} length {got} exceeds cap {cap} at offset {offset}")]
    LimitExceeded {
        what: &'static str,
        got: usize,
        cap: usize,
        offset: usize,
    },

    #[error("unencodable record: {reason}")]
    Unencodable { reason: &'static str },
}
