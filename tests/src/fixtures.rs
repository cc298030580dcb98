//! # Test Fixtures
//!
//! A small in-memory ledger wiring the account store, a chain height and
//! the transaction engine together.

use pc_04_account_store::{Account, AccountStore, InMemoryAccountStore};
use pc_06_transaction_engine::{
    Attachment, ChainHeight, EngineConfig, Transaction, TransactionBuilder, TransactionEngine,
};
use shared_types::{AccountId, Amount, Height, PublicKey, FEE_QUANT};
use std::sync::Arc;

/// Height past the fee reduction, so the minimum fee is `FEE_QUANT`.
pub const TEST_HEIGHT: Height = 600_000;

/// Deterministic public key number `n`.
pub fn key(n: u8) -> PublicKey {
    let mut key = [0u8; 32];
    key[0] = n;
    key[31] = 0xA5;
    key
}

pub fn account_of(n: u8) -> AccountId {
    AccountId::from_public_key(&key(n))
}

/// In-memory ledger under test.
pub struct Ledger {
    pub store: Arc<InMemoryAccountStore>,
    pub chain: Arc<ChainHeight>,
    pub engine: TransactionEngine,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let store = Arc::new(InMemoryAccountStore::new());
        let chain = Arc::new(ChainHeight::new(TEST_HEIGHT));
        let engine = TransactionEngine::with_config(store.clone(), chain.clone(), config);
        Self {
            store,
            chain,
            engine,
        }
    }

    /// Create account `n` with `balance` confirmed and unconfirmed.
    pub fn fund(&self, n: u8, balance: Amount) -> AccountId {
        let id = account_of(n);
        self.store
            .fund(id, balance, 0)
            .expect("funding a fresh account");
        id
    }

    /// Add `amount` to the committed balance of account `n`.
    pub fn commit(&self, n: u8, amount: Amount) {
        self.store
            .add_to_committed_balance(account_of(n), amount)
            .expect("commitment");
    }

    pub fn account(&self, n: u8) -> Account {
        self.store
            .get(account_of(n))
            .expect("account should exist")
    }

    pub fn unconfirmed(&self, n: u8) -> Amount {
        self.account(n).unconfirmed_balance()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed builder from account `from` at `TEST_HEIGHT` paying `FEE_QUANT`.
pub fn builder(from: u8, attachment: Attachment) -> TransactionBuilder {
    TransactionBuilder::new(attachment)
        .sender_public_key(key(from))
        .fee(FEE_QUANT)
        .height(TEST_HEIGHT)
        .signature([0x5Au8; 64])
}

pub fn payment(from: u8, to: u8, amount: Amount) -> Transaction {
    builder(from, Attachment::OrdinaryPayment { amount })
        .recipient(account_of(to))
        .build()
}

/// Commitment removal; `nonce` distinguishes otherwise identical ones.
pub fn removal(from: u8, amount: Amount, nonce: u32) -> Transaction {
    builder(from, Attachment::RemoveCommitment { amount })
        .timestamp(nonce)
        .build()
}
