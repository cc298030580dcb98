//! # Inbound Port - TransactionEngineApi
//!
//! Primary driving port used by the pool and by block processing.
//!
//! ## Call Sequence per Block
//!
//! | Step | Method | Caller |
//! |------|--------|--------|
//! | 1 | `start_new_block` | Block processing, once before admissions |
//! | 2 | `validate`, `apply_unconfirmed` | Pool admission |
//! | 3 | `apply` | Block processing, for each included transaction |
//! | 3' | `undo_unconfirmed` | Pool eviction or block abandonment |

use crate::domain::{EngineError, Transaction, ValidationError};

/// Transaction engine API.
///
/// Mutating methods take `&mut self`; one engine instance serves a single
/// writer at a time.
pub trait TransactionEngineApi: Send + Sync {
    /// Check the sender may sign with the transaction's key, binding the key
    /// to an account that has none.
    ///
    /// Returns `false` if the sender account is missing or the transaction
    /// carries no signature.
    fn verify_public_key(&self, tx: &Transaction) -> bool;

    /// Run every appendage check, then the fee floor.
    ///
    /// # Errors
    /// - `FeeTooLow`: fee below the minimum at the current height (transient)
    /// - `InvalidAppendage`: malformed appendage content (permanent)
    /// - `UnknownTransactionType`: kind not registered (permanent)
    fn validate(&self, tx: &Transaction) -> Result<(), ValidationError>;

    /// Reset per-block state.
    fn start_new_block(&mut self);

    /// Reserve the transaction's cost against the sender's unconfirmed
    /// balance. Call at most once per transaction.
    fn apply_unconfirmed(&mut self, tx: &Transaction) -> bool;

    /// Commit the transaction's effect to confirmed balances.
    ///
    /// # Errors
    /// - `SenderNotFound`: fatal, the ledger is inconsistent
    /// - `Account`: a balance or key check failed part way; the caller must
    ///   discard the block
    fn apply(&mut self, tx: &Transaction) -> Result<(), EngineError>;

    /// Release a reservation made by `apply_unconfirmed`.
    fn undo_unconfirmed(&mut self, tx: &Transaction) -> Result<(), EngineError>;
}
