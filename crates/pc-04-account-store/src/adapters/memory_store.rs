use crate::domain::{add_checked, check_balance, check_committed, Account, AccountError};
use crate::ports::AccountStore;
use parking_lot::RwLock;
use shared_types::{AccountId, Amount, Height, PublicKey};
use std::collections::HashMap;
use tracing::{debug, warn};

/// In-memory implementation of AccountStore.
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Builder method: seed an account record.
    pub fn with_account(self, account: Account) -> Self {
        self.accounts.write().insert(account.id(), account);
        self
    }

    /// Credit `amount` to both balances, creating the account if needed.
    pub fn fund(&self, id: AccountId, amount: Amount, height: Height) -> Result<(), AccountError> {
        self.get_or_create(id, height);
        self.add_to_balance_and_unconfirmed(id, amount)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Snapshot of every account, ordered by id.
    pub fn accounts(&self) -> Vec<Account> {
        let mut all: Vec<Account> = self.accounts.read().values().cloned().collect();
        all.sort_by_key(|a| a.id());
        all
    }

    /// Sum of confirmed balances across all accounts.
    pub fn total_balance(&self) -> Amount {
        self.accounts.read().values().map(Account::balance).sum()
    }

    /// Run `f` against the stored record, keeping its changes only on success.
    fn mutate<F>(&self, id: AccountId, f: F) -> Result<(), AccountError>
    where
        F: FnOnce(&mut Account) -> Result<(), AccountError>,
    {
        let mut accounts = self.accounts.write();
        let stored = accounts
            .get_mut(&id)
            .ok_or(AccountError::NotFound { account: id })?;

        let mut updated = stored.clone();
        match f(&mut updated) {
            Ok(()) => {
                *stored = updated;
                Ok(())
            }
            Err(e) => {
                warn!(account = %id, error = %e, "Rejected account mutation");
                Err(e)
            }
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, id: AccountId) -> Option<Account> {
        self.accounts.read().get(&id).cloned()
    }

    fn get_or_create(&self, id: AccountId, height: Height) -> Account {
        self.accounts
            .write()
            .entry(id)
            .or_insert_with(|| {
                debug!(account = %id, height, "Creating account");
                Account::new(id, height)
            })
            .clone()
    }

    fn set_or_verify_key(&self, id: AccountId, key: &PublicKey, height: Height) -> bool {
        let mut accounts = self.accounts.write();
        let Some(account) = accounts.get_mut(&id) else {
            return false;
        };

        if account.bound_key().is_none() {
            debug!(account = %id, height, "Binding public key");
            account.bind_key(*key, height);
            return true;
        }
        account.accepts_key(key)
    }

    fn apply_key(
        &self,
        id: AccountId,
        key: Option<&PublicKey>,
        height: Height,
    ) -> Result<(), AccountError> {
        self.mutate(id, |account| {
            match key {
                Some(key) if account.bound_key().is_none() => account.bind_key(*key, height),
                Some(key) if !account.accepts_key(key) => {
                    return Err(AccountError::PublicKeyMismatch { account: id });
                }
                Some(_) => {}
                None if account.bound_key().is_none() => {
                    return Err(AccountError::PublicKeyNotSet { account: id });
                }
                None => {}
            }
            account.finalize_key(height);
            Ok(())
        })
    }

    fn add_to_balance(&self, id: AccountId, delta: Amount) -> Result<(), AccountError> {
        self.mutate(id, |account| {
            let balance = add_checked(id, account.balance(), delta)?;
            check_balance(id, balance, account.unconfirmed_balance())?;
            account.set_balances(balance, account.unconfirmed_balance());
            Ok(())
        })
    }

    fn add_to_unconfirmed_balance(
        &self,
        id: AccountId,
        delta: Amount,
    ) -> Result<(), AccountError> {
        self.mutate(id, |account| {
            let unconfirmed = add_checked(id, account.unconfirmed_balance(), delta)?;
            check_balance(id, account.balance(), unconfirmed)?;
            account.set_balances(account.balance(), unconfirmed);
            Ok(())
        })
    }

    fn add_to_balance_and_unconfirmed(
        &self,
        id: AccountId,
        delta: Amount,
    ) -> Result<(), AccountError> {
        self.mutate(id, |account| {
            let balance = add_checked(id, account.balance(), delta)?;
            let unconfirmed = add_checked(id, account.unconfirmed_balance(), delta)?;
            check_balance(id, balance, unconfirmed)?;
            account.set_balances(balance, unconfirmed);
            Ok(())
        })
    }

    fn add_to_committed_balance(&self, id: AccountId, delta: Amount) -> Result<(), AccountError> {
        self.mutate(id, |account| {
            let committed = add_checked(id, account.committed_balance(), delta)?;
            check_committed(id, committed)?;
            account.set_committed_balance(committed);
            Ok(())
        })
    }

    fn add_to_forged_balance(&self, id: AccountId, delta: Amount) -> Result<(), AccountError> {
        self.mutate(id, |account| {
            let forged = add_checked(id, account.forged_balance(), delta)?;
            account.set_forged_balance(forged);
            Ok(())
        })
    }
}
