//! Cross-chain MoMoM proof engine and notary authority model for the Moor
//! consensus-state layer.
//!
//! Computes Merkle-of-Merkle-of-Merkle roots over per-chain MoM values,
//! verifies and re-roots transaction proofs across chains, and falls back
//! to authority-weighted notary approval when MoMoM linkage is unavailable.

pub mod authority;
pub mod engine;
pub mod error;
