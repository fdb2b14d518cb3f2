//! Shared type definitions for the Moor consensus-state layer.
//!
//! Primitives, the event sum type decoded from per-chain logs, authority
//! sets for cross-chain verification, and the shared configuration errors.

pub mod authority;
pub mod constants;
pub mod error;
pub mod event;
pub mod primitives;
