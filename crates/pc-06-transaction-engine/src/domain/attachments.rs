//! Kind-specific attachments.
//!
//! | Attachment | Confirmed effect on sender | On recipient |
//! |------------|----------------------------|--------------|
//! | `OrdinaryPayment` | balance -(amount + fee) | balance, unconfirmed +amount |
//! | `ArbitraryMessage` | balance -fee | - |
//! | `AddCommitment` | balance -(amount + fee), committed +amount | - |
//! | `RemoveCommitment` | committed -amount, balance -fee, balance and unconfirmed +amount | - |

use pc_04_account_store::{Account, AccountError, AccountStore};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Amount, MAX_BALANCE};

use super::appendages::{Appendage, ValidationContext};
use super::entities::{Transaction, TransactionKind};
use super::errors::ValidationError;

/// The first appendage of every transaction; determines its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    OrdinaryPayment { amount: Amount },
    ArbitraryMessage,
    AddCommitment { amount: Amount },
    RemoveCommitment { amount: Amount },
}

impl Attachment {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::OrdinaryPayment { .. } => TransactionKind::OrdinaryPayment,
            Self::ArbitraryMessage => TransactionKind::ArbitraryMessage,
            Self::AddCommitment { .. } => TransactionKind::AddCommitment,
            Self::RemoveCommitment { .. } => TransactionKind::RemoveCommitment,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Self::OrdinaryPayment { amount }
            | Self::AddCommitment { amount }
            | Self::RemoveCommitment { amount } => *amount,
            Self::ArbitraryMessage => 0,
        }
    }

    fn invalid(&self, reason: String) -> ValidationError {
        ValidationError::InvalidAppendage {
            appendage: self.name(),
            reason,
        }
    }
}

/// `amount + fee`, or `Overflow` for the sender.
fn amount_plus_fee(sender: AccountId, amount: Amount, fee: Amount) -> Result<Amount, AccountError> {
    amount
        .checked_add(fee)
        .ok_or(AccountError::Overflow { account: sender })
}

impl Appendage for Attachment {
    fn name(&self) -> &'static str {
        match self {
            Self::OrdinaryPayment { .. } => "OrdinaryPayment",
            Self::ArbitraryMessage => "ArbitraryMessage",
            Self::AddCommitment { .. } => "AddCommitment",
            Self::RemoveCommitment { .. } => "RemoveCommitment",
        }
    }

    fn payload_len(&self) -> usize {
        match self {
            Self::ArbitraryMessage => 0,
            _ => 8,
        }
    }

    fn write_bytes(&self, buf: &mut Vec<u8>) {
        if !matches!(self, Self::ArbitraryMessage) {
            buf.extend_from_slice(&self.amount().to_le_bytes());
        }
    }

    fn validate(
        &self,
        tx: &Transaction,
        _ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationError> {
        if tx.fee() < 0 || tx.fee() > MAX_BALANCE {
            return Err(self.invalid(format!("fee {} out of range", tx.fee())));
        }
        if matches!(self, Self::ArbitraryMessage) {
            return Ok(());
        }
        let amount = self.amount();
        if amount <= 0 || amount > MAX_BALANCE {
            return Err(self.invalid(format!("amount {} out of range", amount)));
        }
        Ok(())
    }

    fn apply(
        &self,
        tx: &Transaction,
        sender: &Account,
        recipient: &Account,
        store: &dyn AccountStore,
    ) -> Result<(), AccountError> {
        let sender_id = sender.id();
        match *self {
            Self::OrdinaryPayment { amount } => {
                store.add_to_balance(sender_id, -amount_plus_fee(sender_id, amount, tx.fee())?)?;
                store.add_to_balance_and_unconfirmed(recipient.id(), amount)
            }
            Self::ArbitraryMessage => store.add_to_balance(sender_id, -tx.fee()),
            Self::AddCommitment { amount } => {
                store.add_to_balance(sender_id, -amount_plus_fee(sender_id, amount, tx.fee())?)?;
                store.add_to_committed_balance(sender_id, amount)
            }
            Self::RemoveCommitment { amount } => {
                store.add_to_committed_balance(sender_id, -amount)?;
                store.add_to_balance(sender_id, -tx.fee())?;
                store.add_to_balance_and_unconfirmed(sender_id, amount)
            }
        }
    }
}
