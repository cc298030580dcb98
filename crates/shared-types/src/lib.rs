//! # Shared Types Crate
//!
//! Primitive ledger types used by every Capacity-Chain subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers, heights and amounts are defined
//!   once here so the account store and the transaction engine agree on them.
//! - **Opaque identifiers**: `AccountId` and `TransactionId` are 64-bit values
//!   derived from SHA-256 digests; they are never parsed for structure.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
