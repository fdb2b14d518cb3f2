//! Per-chain folded state and the bounded chain registry for the Moor
//! consensus-state layer.
//!
//! Chain state is built by folding a replayed event log and extended
//! incrementally from the block-connect path; the registry hands out
//! shared, reader-writer-locked handles per chain symbol.

pub mod chain;
pub mod error;
pub mod registry;
