//! # Transaction Types
//!
//! Per-kind behavior: minimum fee and the unconfirmed balance reservation a
//! pooled transaction holds against its sender.
//!
//! ## Reservation
//!
//! ```text
//! total = reserved_amount(tx) + fee
//! unconfirmed < total            → reject, nothing changed
//! unconfirmed -= total
//! attachment check fails         → unconfirmed += total, reject
//! ```
//!
//! `undo_unconfirmed` credits `total` back, so reserve followed by undo
//! leaves the sender exactly as before.

use pc_04_account_store::{Account, AccountError, AccountStore};
use shared_types::{Amount, Height};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use super::entities::{Transaction, TransactionKind};
use crate::config::FeeSchedule;

/// Polymorphic per-kind transaction behavior.
pub trait TransactionType: Send + Sync {
    fn kind(&self) -> TransactionKind;

    /// Lowest acceptable fee for `tx` at chain height `height`.
    fn minimum_fee(&self, height: Height, tx: &Transaction) -> Amount;

    /// Amount reserved on top of the fee.
    fn reserved_amount(&self, tx: &Transaction) -> Amount;

    /// Kind-specific admission check, run after the balance is reserved.
    fn check_attachment_unconfirmed(&self, _tx: &Transaction, _sender: &Account) -> bool {
        true
    }

    /// Reserve the transaction's cost against the sender's unconfirmed balance.
    fn apply_unconfirmed(
        &self,
        tx: &Transaction,
        sender: &Account,
        store: &dyn AccountStore,
    ) -> bool {
        let Some(total) = self.reserved_amount(tx).checked_add(tx.fee()) else {
            return false;
        };
        if sender.unconfirmed_balance() < total {
            debug!(
                tx_id = %tx.id(),
                sender = %sender.id(),
                required = total,
                available = sender.unconfirmed_balance(),
                "Insufficient unconfirmed balance"
            );
            return false;
        }
        if store.add_to_unconfirmed_balance(sender.id(), -total).is_err() {
            return false;
        }
        if !self.check_attachment_unconfirmed(tx, sender) {
            if let Err(e) = store.add_to_unconfirmed_balance(sender.id(), total) {
                error!(tx_id = %tx.id(), sender = %sender.id(), error = %e, "Failed to refund reservation");
            }
            return false;
        }
        true
    }

    /// Release a reservation made by `apply_unconfirmed`.
    fn undo_unconfirmed(
        &self,
        tx: &Transaction,
        sender: &Account,
        store: &dyn AccountStore,
    ) -> Result<(), AccountError> {
        let total = self
            .reserved_amount(tx)
            .checked_add(tx.fee())
            .ok_or(AccountError::Overflow { account: sender.id() })?;
        store.add_to_unconfirmed_balance(sender.id(), total)
    }
}

/// Transfer of funds between accounts.
#[derive(Clone, Debug)]
pub struct OrdinaryPaymentType {
    fees: FeeSchedule,
}

impl OrdinaryPaymentType {
    pub fn new(fees: FeeSchedule) -> Self {
        Self { fees }
    }
}

impl TransactionType for OrdinaryPaymentType {
    fn kind(&self) -> TransactionKind {
        TransactionKind::OrdinaryPayment
    }

    fn minimum_fee(&self, height: Height, tx: &Transaction) -> Amount {
        self.fees.minimum_fee(height, tx.payload_len())
    }

    fn reserved_amount(&self, tx: &Transaction) -> Amount {
        tx.amount()
    }
}

/// Data-only transaction.
#[derive(Clone, Debug)]
pub struct ArbitraryMessageType {
    fees: FeeSchedule,
}

impl ArbitraryMessageType {
    pub fn new(fees: FeeSchedule) -> Self {
        Self { fees }
    }
}

impl TransactionType for ArbitraryMessageType {
    fn kind(&self) -> TransactionKind {
        TransactionKind::ArbitraryMessage
    }

    fn minimum_fee(&self, height: Height, tx: &Transaction) -> Amount {
        self.fees.minimum_fee(height, tx.payload_len())
    }

    fn reserved_amount(&self, _tx: &Transaction) -> Amount {
        0
    }
}

/// Lock balance as capacity commitment.
#[derive(Clone, Debug)]
pub struct AddCommitmentType {
    fees: FeeSchedule,
}

impl AddCommitmentType {
    pub fn new(fees: FeeSchedule) -> Self {
        Self { fees }
    }
}

impl TransactionType for AddCommitmentType {
    fn kind(&self) -> TransactionKind {
        TransactionKind::AddCommitment
    }

    fn minimum_fee(&self, height: Height, tx: &Transaction) -> Amount {
        self.fees.minimum_fee(height, tx.payload_len())
    }

    fn reserved_amount(&self, tx: &Transaction) -> Amount {
        tx.amount()
    }
}

/// Unlock committed balance.
///
/// Only the fee is reserved; the committed balance must cover the amount.
/// The engine additionally admits at most one removal per sender per block.
#[derive(Clone, Debug)]
pub struct RemoveCommitmentType {
    fees: FeeSchedule,
}

impl RemoveCommitmentType {
    pub fn new(fees: FeeSchedule) -> Self {
        Self { fees }
    }
}

impl TransactionType for RemoveCommitmentType {
    fn kind(&self) -> TransactionKind {
        TransactionKind::RemoveCommitment
    }

    fn minimum_fee(&self, height: Height, tx: &Transaction) -> Amount {
        self.fees.minimum_fee(height, tx.payload_len())
    }

    fn reserved_amount(&self, _tx: &Transaction) -> Amount {
        0
    }

    fn check_attachment_unconfirmed(&self, tx: &Transaction, sender: &Account) -> bool {
        sender.committed_balance() >= tx.amount()
    }
}

/// Lookup table from kind to behavior.
#[derive(Clone, Default)]
pub struct TransactionTypeRegistry {
    types: HashMap<TransactionKind, Arc<dyn TransactionType>>,
}

impl TransactionTypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four built-in kinds.
    pub fn standard(fees: FeeSchedule) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(OrdinaryPaymentType::new(fees)));
        registry.register(Arc::new(ArbitraryMessageType::new(fees)));
        registry.register(Arc::new(AddCommitmentType::new(fees)));
        registry.register(Arc::new(RemoveCommitmentType::new(fees)));
        registry
    }

    /// Add or replace the behavior for `ty.kind()`, returning the old one.
    pub fn register(&mut self, ty: Arc<dyn TransactionType>) -> Option<Arc<dyn TransactionType>> {
        self.types.insert(ty.kind(), ty)
    }

    pub fn get(&self, kind: TransactionKind) -> Option<&Arc<dyn TransactionType>> {
        self.types.get(&kind)
    }

    pub fn contains(&self, kind: TransactionKind) -> bool {
        self.types.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
