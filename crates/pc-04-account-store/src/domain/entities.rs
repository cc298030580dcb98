//! # Domain Entities for Account State
//!
//! ## Key Binding
//!
//! An account learns its public key from the first transaction it signs.
//! The binding happens in two steps:
//!
//! ```text
//! [no key] ──set_or_verify──→ [speculative key] ──apply_key──→ [finalized key]
//! ```
//!
//! A speculative key is already authoritative for verification (a different
//! key is rejected) but `public_key()` only reports it once a block carrying
//! one of the account's transactions has been applied and `key_height` set.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Amount, Height, PublicKey};

/// Account record.
///
/// Values of this type are snapshots handed out by an `AccountStore`;
/// changing a snapshot has no effect on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    creation_height: Height,
    public_key: Option<PublicKey>,
    /// Height at which the key was first seen by the verifier.
    key_seen_height: Option<Height>,
    /// Height of the first applied transaction carrying the key.
    key_height: Option<Height>,
    balance: Amount,
    unconfirmed_balance: Amount,
    committed_balance: Amount,
    forged_balance: Amount,
}

impl Account {
    /// Create an empty account first referenced at `creation_height`.
    pub fn new(id: AccountId, creation_height: Height) -> Self {
        Self {
            id,
            creation_height,
            public_key: None,
            key_seen_height: None,
            key_height: None,
            balance: 0,
            unconfirmed_balance: 0,
            committed_balance: 0,
            forged_balance: 0,
        }
    }

    /// Builder method: confirmed and unconfirmed balance both set to `amount`.
    pub fn with_balance(mut self, amount: Amount) -> Self {
        self.balance = amount;
        self.unconfirmed_balance = amount;
        self
    }

    /// Builder method: set the committed balance.
    pub fn with_committed_balance(mut self, amount: Amount) -> Self {
        self.committed_balance = amount;
        self
    }

    /// Builder method: an already finalized key.
    pub fn with_public_key(mut self, key: PublicKey, key_height: Height) -> Self {
        self.public_key = Some(key);
        self.key_seen_height = Some(key_height);
        self.key_height = Some(key_height);
        self
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn creation_height(&self) -> Height {
        self.creation_height
    }

    /// The finalized public key, if any.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.key_height.and(self.public_key.as_ref())
    }

    /// The bound public key, speculative or finalized.
    pub fn bound_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    pub fn key_height(&self) -> Option<Height> {
        self.key_height
    }

    pub fn key_seen_height(&self) -> Option<Height> {
        self.key_seen_height
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn unconfirmed_balance(&self) -> Amount {
        self.unconfirmed_balance
    }

    pub fn committed_balance(&self) -> Amount {
        self.committed_balance
    }

    pub fn forged_balance(&self) -> Amount {
        self.forged_balance
    }

    /// True if `key` may sign for this account.
    ///
    /// Accounts without a bound key accept any key.
    pub fn accepts_key(&self, key: &PublicKey) -> bool {
        self.public_key.as_ref().map_or(true, |bound| bound == key)
    }

    pub(crate) fn bind_key(&mut self, key: PublicKey, height: Height) {
        self.public_key = Some(key);
        self.key_seen_height = Some(height);
    }

    /// Record `height` as key height unless an earlier one is known.
    pub(crate) fn finalize_key(&mut self, height: Height) {
        if self.key_height.map_or(true, |current| current > height) {
            self.key_height = Some(height);
        }
    }

    pub(crate) fn set_balances(&mut self, balance: Amount, unconfirmed: Amount) {
        self.balance = balance;
        self.unconfirmed_balance = unconfirmed;
    }

    pub(crate) fn set_committed_balance(&mut self, amount: Amount) {
        self.committed_balance = amount;
    }

    pub(crate) fn set_forged_balance(&mut self, amount: Amount) {
        self.forged_balance = amount;
    }
}
