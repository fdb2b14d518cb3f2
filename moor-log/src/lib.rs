//! Event-log record codec and replay for the Moor consensus-state layer.
//!
//! Implements the permanently binary-stable per-chain log format: a
//! bounds-checked cursor, the wire-tag record codec, and sequential plus
//! incremental replay with safe handling of corrupt or still-growing tails.

pub mod codec;
pub mod cursor;
pub mod error;
pub mod replay;
