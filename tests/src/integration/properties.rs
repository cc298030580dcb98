//! # Engine Laws
//!
//! Property tests for the transaction engine:
//!
//! - one commitment removal per sender per block
//! - release is the inverse of reservation
//! - the fee floor is exact
//! - a bound key never changes
//! - appendages validate and apply in declared order

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use parking_lot::Mutex;
    use pc_04_account_store::{Account, AccountError, AccountStore, BalanceField};
    use pc_06_transaction_engine::{
        Appendage, Attachment, EngineError, FeeSchedule, Message, Transaction, TransactionBuilder,
        TransactionEngineApi, ValidationContext, ValidationError,
    };
    use proptest::prelude::*;
    use shared_types::{AccountId, Amount, PublicKey, FEE_QUANT, ONE_COIN};
    use std::sync::Arc;

    // =========================================================================
    // TEST APPENDAGES
    // =========================================================================

    /// Records its tag when validated and applied.
    #[derive(Debug)]
    struct Recorder {
        tag: u8,
        fail_validation: bool,
        validated: Arc<Mutex<Vec<u8>>>,
        applied: Arc<Mutex<Vec<u8>>>,
    }

    impl Appendage for Recorder {
        fn name(&self) -> &'static str {
            "Recorder"
        }

        fn payload_len(&self) -> usize {
            1
        }

        fn write_bytes(&self, buf: &mut Vec<u8>) {
            buf.push(self.tag);
        }

        fn validate(
            &self,
            _tx: &Transaction,
            _ctx: &ValidationContext<'_>,
        ) -> Result<(), ValidationError> {
            self.validated.lock().push(self.tag);
            if self.fail_validation {
                return Err(ValidationError::InvalidAppendage {
                    appendage: self.name(),
                    reason: format!("tag {}", self.tag),
                });
            }
            Ok(())
        }

        fn apply(
            &self,
            _tx: &Transaction,
            _sender: &Account,
            _recipient: &Account,
            _store: &dyn AccountStore,
        ) -> Result<(), AccountError> {
            self.applied.lock().push(self.tag);
            Ok(())
        }
    }

    /// Debits the sender's confirmed and unconfirmed balance.
    #[derive(Debug)]
    struct Spend(Amount);

    impl Appendage for Spend {
        fn name(&self) -> &'static str {
            "Spend"
        }

        fn payload_len(&self) -> usize {
            8
        }

        fn write_bytes(&self, buf: &mut Vec<u8>) {
            buf.extend_from_slice(&self.0.to_le_bytes());
        }

        fn validate(
            &self,
            _tx: &Transaction,
            _ctx: &ValidationContext<'_>,
        ) -> Result<(), ValidationError> {
            Ok(())
        }

        fn apply(
            &self,
            _tx: &Transaction,
            sender: &Account,
            _recipient: &Account,
            store: &dyn AccountStore,
        ) -> Result<(), AccountError> {
            store.add_to_balance_and_unconfirmed(sender.id(), -self.0)
        }
    }

    /// Fails unless the sender's current balance is at least the threshold.
    #[derive(Debug)]
    struct RequireBalance(Amount);

    impl Appendage for RequireBalance {
        fn name(&self) -> &'static str {
            "RequireBalance"
        }

        fn payload_len(&self) -> usize {
            8
        }

        fn write_bytes(&self, buf: &mut Vec<u8>) {
            buf.extend_from_slice(&self.0.to_le_bytes());
        }

        fn validate(
            &self,
            _tx: &Transaction,
            _ctx: &ValidationContext<'_>,
        ) -> Result<(), ValidationError> {
            Ok(())
        }

        fn apply(
            &self,
            _tx: &Transaction,
            sender: &Account,
            _recipient: &Account,
            store: &dyn AccountStore,
        ) -> Result<(), AccountError> {
            let current = store
                .get(sender.id())
                .ok_or(AccountError::NotFound { account: sender.id() })?;
            if current.balance() < self.0 {
                return Err(AccountError::DoubleSpending {
                    account: sender.id(),
                    field: BalanceField::Balance,
                    confirmed: current.balance(),
                    unconfirmed: current.unconfirmed_balance(),
                });
            }
            Ok(())
        }
    }

    /// Fails unless the sender snapshot carries a finalized key, and for a
    /// self-payment unless both snapshots agree.
    #[derive(Debug)]
    struct RequireFinalizedKey;

    impl Appendage for RequireFinalizedKey {
        fn name(&self) -> &'static str {
            "RequireFinalizedKey"
        }

        fn payload_len(&self) -> usize {
            0
        }

        fn write_bytes(&self, _buf: &mut Vec<u8>) {}

        fn validate(
            &self,
            _tx: &Transaction,
            _ctx: &ValidationContext<'_>,
        ) -> Result<(), ValidationError> {
            Ok(())
        }

        fn apply(
            &self,
            tx: &Transaction,
            sender: &Account,
            recipient: &Account,
            _store: &dyn AccountStore,
        ) -> Result<(), AccountError> {
            if sender.public_key().is_none() || sender.key_height().is_none() {
                return Err(AccountError::PublicKeyNotSet { account: sender.id() });
            }
            if tx.recipient_id() == sender.id() && recipient != sender {
                return Err(AccountError::PublicKeyMismatch { account: sender.id() });
            }
            Ok(())
        }
    }

    /// Signed message from the account owning `public_key`.
    fn signed_by(public_key: PublicKey) -> Transaction {
        TransactionBuilder::new(Attachment::ArbitraryMessage)
            .sender_public_key(public_key)
            .recipient(account_of(2))
            .fee(FEE_QUANT)
            .height(TEST_HEIGHT)
            .signature([0x5Au8; 64])
            .build()
    }

    // =========================================================================
    // APPENDAGE ORDER
    // =========================================================================

    #[test]
    fn test_appendages_see_finalized_sender_key() {
        let mut ledger = Ledger::new();
        ledger.fund(1, 10 * ONE_COIN);

        let tx = builder(1, Attachment::ArbitraryMessage)
            .recipient(account_of(2))
            .appendage(Arc::new(RequireFinalizedKey))
            .build();
        assert!(ledger.engine.verify_public_key(&tx));
        assert!(ledger.engine.apply_unconfirmed(&tx));
        ledger.engine.apply(&tx).unwrap();

        assert_eq!(ledger.account(1).key_height(), Some(TEST_HEIGHT));
    }

    #[test]
    fn test_self_payment_snapshots_agree() {
        let mut ledger = Ledger::new();
        ledger.fund(1, 10 * ONE_COIN);

        let tx = builder(1, Attachment::OrdinaryPayment { amount: ONE_COIN })
            .recipient(account_of(1))
            .appendage(Arc::new(RequireFinalizedKey))
            .build();
        assert!(ledger.engine.apply_unconfirmed(&tx));
        ledger.engine.apply(&tx).unwrap();

        let account = ledger.account(1);
        assert_eq!(account.public_key(), Some(&key(1)));
        assert_eq!(account.balance(), 10 * ONE_COIN - FEE_QUANT);
        assert_eq!(account.unconfirmed_balance(), account.balance());
    }

    #[test]
    fn test_reordering_check_and_spend_changes_outcome() {
        let run = |check_first: bool| {
            let mut ledger = Ledger::new();
            ledger.fund(1, 10 * ONE_COIN);

            let check: Arc<dyn Appendage> = Arc::new(RequireBalance(8 * ONE_COIN));
            let spend: Arc<dyn Appendage> = Arc::new(Spend(5 * ONE_COIN));
            let (a, b) = if check_first { (check, spend) } else { (spend, check) };

            let tx = builder(1, Attachment::ArbitraryMessage)
                .recipient(account_of(2))
                .appendage(a)
                .appendage(b)
                .build();
            assert!(ledger.engine.apply_unconfirmed(&tx));
            ledger.engine.apply(&tx)
        };

        assert!(run(true).is_ok());
        assert!(matches!(
            run(false),
            Err(EngineError::Account(AccountError::DoubleSpending { .. }))
        ));
    }

    #[test]
    fn test_validation_stops_at_first_failure() {
        let ledger = Ledger::new();
        let validated = Arc::new(Mutex::new(Vec::new()));
        let applied = Arc::new(Mutex::new(Vec::new()));

        let mut tx = builder(1, Attachment::ArbitraryMessage).recipient(account_of(2));
        for tag in 0..4u8 {
            tx = tx.appendage(Arc::new(Recorder {
                tag,
                fail_validation: tag == 1,
                validated: validated.clone(),
                applied: applied.clone(),
            }));
        }

        let err = ledger.engine.validate(&tx.build()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidAppendage { appendage: "Recorder", .. }
        ));
        assert_eq!(*validated.lock(), vec![0, 1]);
        assert!(applied.lock().is_empty());
    }

    proptest! {
        #[test]
        fn prop_appendages_apply_in_declared_order(tags in prop::collection::vec(any::<u8>(), 0..12)) {
            let mut ledger = Ledger::new();
            ledger.fund(1, 10 * ONE_COIN);
            let validated = Arc::new(Mutex::new(Vec::new()));
            let applied = Arc::new(Mutex::new(Vec::new()));

            let mut builder = builder(1, Attachment::ArbitraryMessage).recipient(account_of(2));
            for &tag in &tags {
                builder = builder.appendage(Arc::new(Recorder {
                    tag,
                    fail_validation: false,
                    validated: validated.clone(),
                    applied: applied.clone(),
                }));
            }
            let tx = builder.build();

            prop_assert!(ledger.engine.validate(&tx).is_ok());
            prop_assert!(ledger.engine.apply_unconfirmed(&tx));
            prop_assert!(ledger.engine.apply(&tx).is_ok());
            prop_assert_eq!(&*validated.lock(), &tags);
            prop_assert_eq!(&*applied.lock(), &tags);
        }

        // =====================================================================
        // COMMITMENT REMOVAL DEDUP
        // =====================================================================

        #[test]
        fn prop_at_most_one_removal_per_sender_per_block(
            balances in prop::collection::vec((0i64..20, 0i64..10), 3),
            attempts in prop::collection::vec((0usize..3, 1i64..5), 1..24),
        ) {
            let mut ledger = Ledger::new();
            for (n, (balance, committed)) in balances.iter().enumerate() {
                ledger.fund(n as u8 + 1, balance * ONE_COIN);
                ledger.commit(n as u8 + 1, committed * ONE_COIN);
            }
            ledger.engine.start_new_block();

            let mut seen = [false; 3];
            for (nonce, (sender, amount)) in attempts.iter().enumerate() {
                let tx = removal(*sender as u8 + 1, amount * ONE_COIN, nonce as u32);
                let accepted = ledger.engine.apply_unconfirmed(&tx);
                if seen[*sender] {
                    prop_assert!(!accepted);
                }
                seen[*sender] = true;
            }

            ledger.engine.start_new_block();
            for n in 0..3u8 {
                prop_assert!(ledger.engine.pending_commitment_removal(account_of(n + 1)).is_none());
            }
        }

        // =====================================================================
        // RESERVATION / RELEASE
        // =====================================================================

        #[test]
        fn prop_release_restores_unconfirmed_balance(
            balance in 0i64..1_000_000,
            amount in 1i64..1_000_000,
            fee in 0i64..100_000,
            kind in 0usize..3,
        ) {
            let mut ledger = Ledger::new();
            ledger.fund(1, balance);
            ledger.commit(1, 500_000);
            let before = ledger.unconfirmed(1);

            let attachment = match kind {
                0 => Attachment::OrdinaryPayment { amount },
                1 => Attachment::AddCommitment { amount },
                _ => Attachment::ArbitraryMessage,
            };
            let tx = builder(1, attachment).recipient(account_of(2)).fee(fee).build();

            if ledger.engine.apply_unconfirmed(&tx) {
                prop_assert_eq!(ledger.unconfirmed(1), before - tx.amount() - fee);
                ledger.engine.undo_unconfirmed(&tx).unwrap();
            }
            prop_assert_eq!(ledger.unconfirmed(1), before);
            prop_assert_eq!(ledger.account(1).balance(), balance);
        }

        // =====================================================================
        // FEE FLOOR
        // =====================================================================

        #[test]
        fn prop_fee_too_low_iff_below_minimum(
            height in 0u32..1_000_000,
            fee in 0i64..(4 * ONE_COIN),
            message_len in 0usize..1000,
        ) {
            let ledger = Ledger::new();
            ledger.chain.set(height);

            let tx = builder(1, Attachment::ArbitraryMessage)
                .recipient(account_of(2))
                .message(Message::binary(vec![0u8; message_len]))
                .fee(fee)
                .build();
            let minimum = FeeSchedule::default().minimum_fee(height, tx.payload_len());

            let result = ledger.engine.validate(&tx);
            let too_low = matches!(result, Err(ValidationError::FeeTooLow { .. }));
            prop_assert_eq!(too_low, fee < minimum);
            prop_assert_eq!(result.is_ok(), fee >= minimum);
        }

        // =====================================================================
        // KEY BINDING
        // =====================================================================

        #[test]
        fn prop_bound_key_never_changes(
            first in any::<[u8; 32]>(),
            other in any::<[u8; 32]>(),
            checks in 1usize..8,
        ) {
            let owner = AccountId::from_public_key(&first);
            let claimed = AccountId::from_public_key(&other);
            prop_assume!(owner != claimed);

            let ledger = Ledger::new();
            ledger.store.fund(owner, ONE_COIN, 0).unwrap();
            ledger.store.fund(claimed, ONE_COIN, 0).unwrap();
            // `claimed` already holds a key that is not its own.
            prop_assert!(ledger.store.set_or_verify_key(claimed, &first, 0));

            let by_first = signed_by(first);
            let by_other = signed_by(other);
            for _ in 0..checks {
                prop_assert!(ledger.engine.verify_public_key(&by_first));
                prop_assert!(!ledger.engine.verify_public_key(&by_other));
            }

            let owner_account = ledger.store.get(owner).unwrap();
            let claimed_account = ledger.store.get(claimed).unwrap();
            prop_assert_eq!(owner_account.bound_key(), Some(&first));
            prop_assert_eq!(claimed_account.bound_key(), Some(&first));
        }
    }

    #[test]
    fn test_engine_verification_follows_bound_key() {
        let ledger = Ledger::new();
        let id = ledger.fund(1, ONE_COIN);
        let tx = payment(1, 2, ONE_COIN);

        for _ in 0..3 {
            assert!(ledger.engine.verify_public_key(&tx));
        }

        let other = Ledger::new();
        other.fund(1, ONE_COIN);
        other.store.set_or_verify_key(id, &key(7), 0);
        for _ in 0..3 {
            assert!(!other.engine.verify_public_key(&tx));
        }
    }
}
