use thiserror::Error;

/// Errors from chain-state registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state registry full: capacity {capacity}")]
    RegistryFull { capacity: usize },

    #[error("registry capacity {capacity} below required {required}")]
    CapacityTooSmall { capacity: usize, required: usize },

    #[error("chain state lock poisoned: {reason}")]
    LockPoisoned { reason: String },
}
