use thiserror::Error;

/// Configuration-level errors shared across the moor crates.
///
/// Everything here is startup-fatal: the process must not run with a
/// malformed authority table. Subsystem crates carry their own error enums
/// for their runtime conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoorError {
    #[error("invalid authority set: {reason}")]
    InvalidAuthority { reason: String },
}
