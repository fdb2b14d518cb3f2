use moor_state::error::StateError;
use thiserror::Error;

/// Errors from cross-chain proof operations.
///
/// `NoNotarizationFound` and `ChainUnlinked` are recoverable: the caller
/// falls back to notary-approval counting instead of rejecting outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    #[error("no notarization found for category {category} below height {bound}")]
    NoNotarizationFound { category: u16, bound: u32 },

    #[error("no notarization links the chains within the scan window")]
    ChainUnlinked,

    #[error("proof does not land on the notarized MoM")]
    ProofMismatch,

    #[error("state error: {0}")]
    State(#[from] StateError),
}
