use shared_types::{AccountId, Amount};
use thiserror::Error;

use super::balance::BalanceField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Account not found: {account}")]
    NotFound { account: AccountId },

    #[error("Public key mismatch for account {account}")]
    PublicKeyMismatch { account: AccountId },

    #[error("Public key has not been set for account {account}")]
    PublicKeyNotSet { account: AccountId },

    #[error(
        "Double spending on {field} of account {account}: confirmed {confirmed}, unconfirmed {unconfirmed}"
    )]
    DoubleSpending {
        account: AccountId,
        field: BalanceField,
        confirmed: Amount,
        unconfirmed: Amount,
    },

    #[error("Balance overflow for account {account}")]
    Overflow { account: AccountId },
}
