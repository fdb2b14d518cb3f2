//! Hashing and Merkle primitives for the Moor consensus-state layer.
//!
//! BLAKE3 wrappers and the binary Merkle tree used for MoM/MoMoM roots,
//! branch proofs, and cross-tree proof splicing.

pub mod hash;
pub mod merkle;
