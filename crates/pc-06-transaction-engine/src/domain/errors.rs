//! Transaction engine error types.
//!
//! Validation failures come in two classes. Transient failures may succeed
//! later (the fee floor moves with the chain height, a referenced account
//! may change); the pool can keep such a transaction and retry. Permanent
//! failures are properties of the transaction itself and it can be dropped.

use pc_04_account_store::AccountError;
use shared_types::{AccountId, Amount, Height, TransactionId};
use thiserror::Error;

use super::entities::TransactionKind;

/// Validation error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Fee below the schedule minimum at the current height.
    #[error("Transaction fee {fee} less than minimum fee {minimum} at height {height}")]
    FeeTooLow {
        fee: Amount,
        minimum: Amount,
        height: Height,
    },

    /// Not valid now, may become valid later.
    #[error("Transaction not currently valid: {0}")]
    NotCurrentlyValid(String),

    /// Appendage content is malformed.
    #[error("Invalid {appendage}: {reason}")]
    InvalidAppendage {
        appendage: &'static str,
        reason: String,
    },

    /// No behavior registered for the transaction kind.
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(TransactionKind),
}

impl ValidationError {
    /// True if the transaction may become valid at a later height.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::FeeTooLow { .. } | Self::NotCurrentlyValid(_))
    }

    /// Label used for metrics.
    pub fn class(&self) -> &'static str {
        if self.is_transient() {
            "transient"
        } else {
            "permanent"
        }
    }
}

/// Engine error type for confirmed-state operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The sender of a pooled or committed transaction has no account.
    #[error("Sender account {sender} of transaction {transaction} does not exist")]
    SenderNotFound {
        transaction: TransactionId,
        sender: AccountId,
    },

    #[error("Account state error: {0}")]
    Account(#[from] AccountError),

    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(TransactionKind),
}

impl EngineError {
    /// True for ledger invariant violations the node must not continue past.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SenderNotFound { .. } | Self::UnknownTransactionType(_)
        )
    }

    /// Label used for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::SenderNotFound { .. } => "sender_not_found",
            Self::Account(AccountError::DoubleSpending { .. }) => "double_spending",
            Self::Account(AccountError::PublicKeyMismatch { .. }) => "public_key_mismatch",
            Self::Account(_) => "account",
            Self::UnknownTransactionType(_) => "unknown_type",
        }
    }
}
