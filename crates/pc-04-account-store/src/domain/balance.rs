//! Balance consistency rules.
//!
//! Every mutation computes the new balances first, checks them here, and
//! only then stores them. A failed check leaves the account untouched.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Amount};
use std::fmt;

use super::errors::AccountError;

/// Which quantity a failed check refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceField {
    Balance,
    Commitment,
}

impl fmt::Display for BalanceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balance => write!(f, "balance"),
            Self::Commitment => write!(f, "commitment"),
        }
    }
}

/// Reject negative balances and unconfirmed funds exceeding confirmed ones.
pub fn check_balance(
    account: AccountId,
    confirmed: Amount,
    unconfirmed: Amount,
) -> Result<(), AccountError> {
    if confirmed < 0 || unconfirmed < 0 || unconfirmed > confirmed {
        return Err(AccountError::DoubleSpending {
            account,
            field: BalanceField::Balance,
            confirmed,
            unconfirmed,
        });
    }
    Ok(())
}

pub fn check_committed(account: AccountId, committed: Amount) -> Result<(), AccountError> {
    if committed < 0 {
        return Err(AccountError::DoubleSpending {
            account,
            field: BalanceField::Commitment,
            confirmed: committed,
            unconfirmed: committed,
        });
    }
    Ok(())
}

/// `current + delta`, or `Overflow`.
pub fn add_checked(account: AccountId, current: Amount, delta: Amount) -> Result<Amount, AccountError> {
    current
        .checked_add(delta)
        .ok_or(AccountError::Overflow { account })
}
