//! Transaction Engine Service
//!
//! Main service implementing TransactionEngineApi.

use pc_04_account_store::Account;
use pc_telemetry::{
    ENGINE_APPLIED, ENGINE_BLOCKS_STARTED, ENGINE_ERRORS, ENGINE_RELEASED, ENGINE_RESERVATIONS,
    ENGINE_VALIDATIONS,
};
use shared_types::{AccountId, TransactionId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::EngineConfig;
use crate::domain::{
    EngineError, Transaction, TransactionKind, TransactionType, TransactionTypeRegistry,
    ValidationContext, ValidationError,
};
use crate::ports::{AccountStore, BlockchainContext, TransactionEngineApi};

/// Transaction Engine
///
/// Orchestrates a transaction through the ledger:
/// 1. Verify the sender key
/// 2. Validate appendages and fee
/// 3. Reserve unconfirmed balance (pool admission)
/// 4. Commit to confirmed balances, or release the reservation
///
/// Owns the per-block record of accepted commitment removals.
pub struct TransactionEngine {
    config: EngineConfig,
    accounts: Arc<dyn AccountStore>,
    chain: Arc<dyn BlockchainContext>,
    types: TransactionTypeRegistry,
    /// Sender to the single commitment removal admitted in this block.
    commitment_removals: HashMap<AccountId, TransactionId>,
}

impl TransactionEngine {
    /// Create an engine with default config and the built-in types
    pub fn new(accounts: Arc<dyn AccountStore>, chain: Arc<dyn BlockchainContext>) -> Self {
        Self::with_config(accounts, chain, EngineConfig::default())
    }

    /// Create an engine with custom config and the built-in types
    pub fn with_config(
        accounts: Arc<dyn AccountStore>,
        chain: Arc<dyn BlockchainContext>,
        config: EngineConfig,
    ) -> Self {
        let types = TransactionTypeRegistry::standard(config.fees);
        Self {
            config,
            accounts,
            chain,
            types,
            commitment_removals: HashMap::new(),
        }
    }

    /// Replace the transaction type registry.
    pub fn with_registry(mut self, types: TransactionTypeRegistry) -> Self {
        self.types = types;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TransactionTypeRegistry {
        &self.types
    }

    pub fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.accounts
    }

    /// Commitment removal admitted for `sender` in the current block.
    pub fn pending_commitment_removal(&self, sender: AccountId) -> Option<TransactionId> {
        self.commitment_removals.get(&sender).copied()
    }

    fn transaction_type(&self, kind: TransactionKind) -> Option<&Arc<dyn TransactionType>> {
        self.types.get(kind)
    }

    fn sender(&self, tx: &Transaction) -> Result<Account, EngineError> {
        self.accounts
            .get(tx.sender_id())
            .ok_or(EngineError::SenderNotFound {
                transaction: tx.id(),
                sender: tx.sender_id(),
            })
    }

    fn check(&self, tx: &Transaction) -> Result<(), ValidationError> {
        let ctx = ValidationContext {
            height: self.chain.height(),
            max_message_len: self.config.max_message_len,
            accounts: self.accounts.as_ref(),
        };

        for appendage in tx.appendages() {
            appendage.validate(tx, &ctx)?;
        }

        let ty = self
            .transaction_type(tx.kind())
            .ok_or(ValidationError::UnknownTransactionType(tx.kind()))?;

        let minimum = ty.minimum_fee(ctx.height, tx);
        if tx.fee() < minimum {
            return Err(ValidationError::FeeTooLow {
                fee: tx.fee(),
                minimum,
                height: ctx.height,
            });
        }
        Ok(())
    }

    fn commit(&self, tx: &Transaction) -> Result<(), EngineError> {
        let sender_id = self.sender(tx)?.id();
        self.accounts
            .apply_key(sender_id, tx.sender_public_key(), tx.height())?;

        // Appendages see the finalized key, and the recipient after the
        // sender so a self-payment gets two identical snapshots.
        let sender = self.sender(tx)?;
        let recipient = self.accounts.get_or_create(tx.recipient_id(), tx.height());
        for appendage in tx.appendages() {
            appendage.apply(tx, &sender, &recipient, self.accounts.as_ref())?;
        }
        Ok(())
    }

    fn release(&self, tx: &Transaction) -> Result<(), EngineError> {
        let sender = self.sender(tx)?;
        let ty = self
            .transaction_type(tx.kind())
            .ok_or(EngineError::UnknownTransactionType(tx.kind()))?;
        ty.undo_unconfirmed(tx, &sender, self.accounts.as_ref())?;
        Ok(())
    }

    fn record_failure(&self, tx: &Transaction, operation: &'static str, err: &EngineError) {
        ENGINE_ERRORS.with_label_values(&[err.error_type()]).inc();
        if err.is_fatal() {
            error!(tx_id = %tx.id(), sender = %tx.sender_id(), operation, error = %err, "Ledger invariant violated");
        } else {
            warn!(tx_id = %tx.id(), sender = %tx.sender_id(), operation, error = %err, "Engine operation failed");
        }
    }
}

impl TransactionEngineApi for TransactionEngine {
    #[instrument(skip(self, tx), fields(tx_id = %tx.id(), sender = %tx.sender_id()))]
    fn verify_public_key(&self, tx: &Transaction) -> bool {
        if tx.signature().is_none() {
            debug!("Transaction is unsigned");
            return false;
        }
        if self.accounts.get(tx.sender_id()).is_none() {
            debug!("Sender account does not exist");
            return false;
        }
        let Some(key) = tx.sender_public_key() else {
            debug!("Transaction carries no sender key");
            return false;
        };

        let verified = self
            .accounts
            .set_or_verify_key(tx.sender_id(), key, tx.height());
        if !verified {
            warn!("Sender key does not match bound key");
        }
        verified
    }

    #[instrument(skip(self, tx), fields(tx_id = %tx.id(), kind = %tx.kind()))]
    fn validate(&self, tx: &Transaction) -> Result<(), ValidationError> {
        let result = self.check(tx);
        match &result {
            Ok(()) => ENGINE_VALIDATIONS.with_label_values(&["valid"]).inc(),
            Err(e) => {
                ENGINE_VALIDATIONS.with_label_values(&[e.class()]).inc();
                debug!(error = %e, transient = e.is_transient(), "Validation failed");
            }
        }
        result
    }

    fn start_new_block(&mut self) {
        if !self.commitment_removals.is_empty() {
            debug!(
                removals = self.commitment_removals.len(),
                "Clearing commitment removals for new block"
            );
        }
        self.commitment_removals.clear();
        ENGINE_BLOCKS_STARTED.inc();
    }

    #[instrument(skip(self, tx), fields(tx_id = %tx.id(), sender = %tx.sender_id(), kind = %tx.kind()))]
    fn apply_unconfirmed(&mut self, tx: &Transaction) -> bool {
        let kind = tx.kind();

        if kind == TransactionKind::RemoveCommitment {
            // One removal per account per block. The slot is taken before
            // the account is consulted and stays taken for the whole block.
            if let Some(existing) = self.commitment_removals.get(&tx.sender_id()) {
                debug!(existing = %existing, "Commitment removal already admitted in this block");
                ENGINE_RESERVATIONS
                    .with_label_values(&[kind.as_str(), "duplicate_removal"])
                    .inc();
                return false;
            }
            self.commitment_removals.insert(tx.sender_id(), tx.id());
        }

        let Some(sender) = self.accounts.get(tx.sender_id()) else {
            debug!("Sender account does not exist");
            ENGINE_RESERVATIONS
                .with_label_values(&[kind.as_str(), "rejected"])
                .inc();
            return false;
        };

        let Some(ty) = self.transaction_type(kind) else {
            warn!("No transaction type registered");
            ENGINE_RESERVATIONS
                .with_label_values(&[kind.as_str(), "rejected"])
                .inc();
            return false;
        };

        let reserved = ty.apply_unconfirmed(tx, &sender, self.accounts.as_ref());
        let outcome = if reserved { "reserved" } else { "rejected" };
        ENGINE_RESERVATIONS
            .with_label_values(&[kind.as_str(), outcome])
            .inc();
        debug!(reserved, "Unconfirmed reservation");
        reserved
    }

    #[instrument(skip(self, tx), fields(tx_id = %tx.id(), sender = %tx.sender_id(), kind = %tx.kind(), height = tx.height()))]
    fn apply(&mut self, tx: &Transaction) -> Result<(), EngineError> {
        match self.commit(tx) {
            Ok(()) => {
                ENGINE_APPLIED.with_label_values(&[tx.kind().as_str()]).inc();
                info!(fee = tx.fee(), amount = tx.amount(), "Transaction applied");
                Ok(())
            }
            Err(e) => {
                self.record_failure(tx, "apply", &e);
                Err(e)
            }
        }
    }

    #[instrument(skip(self, tx), fields(tx_id = %tx.id(), sender = %tx.sender_id(), kind = %tx.kind()))]
    fn undo_unconfirmed(&mut self, tx: &Transaction) -> Result<(), EngineError> {
        match self.release(tx) {
            Ok(()) => {
                ENGINE_RELEASED.inc();
                debug!("Reservation released");
                Ok(())
            }
            Err(e) => {
                self.record_failure(tx, "undo_unconfirmed", &e);
                Err(e)
            }
        }
    }
}
