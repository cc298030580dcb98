use crate::domain::{Account, AccountError};
use shared_types::{AccountId, Amount, Height, PublicKey};

/// Account State port.
///
/// Implementations use interior mutability: every mutation is visible to
/// subsequent calls, including calls on snapshots taken later. Mutations are
/// addressed by id so that a sender paying itself never needs two handles
/// to the same record.
pub trait AccountStore: Send + Sync {
    // === Lookup ===

    fn get(&self, id: AccountId) -> Option<Account>;

    /// Return the account, creating an empty one at `height` if absent.
    fn get_or_create(&self, id: AccountId, height: Height) -> Account;

    // === Key Binding ===

    /// Bind `key` speculatively if the account has none; otherwise succeed
    /// only if it matches the bound key. Returns `false` for a missing
    /// account.
    fn set_or_verify_key(&self, id: AccountId, key: &PublicKey, height: Height) -> bool;

    /// Finalize the key binding at `height`.
    ///
    /// With `key` present it is set-or-verified first; with `key` absent the
    /// account must already have a bound key.
    fn apply_key(
        &self,
        id: AccountId,
        key: Option<&PublicKey>,
        height: Height,
    ) -> Result<(), AccountError>;

    // === Balance Mutation ===

    fn add_to_balance(&self, id: AccountId, delta: Amount) -> Result<(), AccountError>;

    fn add_to_unconfirmed_balance(&self, id: AccountId, delta: Amount)
        -> Result<(), AccountError>;

    fn add_to_balance_and_unconfirmed(
        &self,
        id: AccountId,
        delta: Amount,
    ) -> Result<(), AccountError>;

    fn add_to_committed_balance(&self, id: AccountId, delta: Amount) -> Result<(), AccountError>;

    fn add_to_forged_balance(&self, id: AccountId, delta: Amount) -> Result<(), AccountError>;
}
