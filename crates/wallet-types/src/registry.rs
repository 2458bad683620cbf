//! # Account Registry Port
//!
//! The durable account store is an external collaborator; this module owns its
//! contract and a reference in-memory implementation used for wiring and
//! tests.
//!
//! ## Invariants
//!
//! - At most one account is active at any time.
//! - The first account added to an empty registry becomes active.
//! - Deleting the active account promotes one remaining account (the first in
//!   insertion order) to active; deleting the last account leaves no active
//!   account.

use crate::account::{Account, AccountId, AccountSpec};
use crate::errors::RegistryError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Contract of the durable account store.
///
/// All operations are asynchronous and may fail with a storage error; the
/// wallet core applies no timeout of its own and propagates failures with
/// their cause preserved.
#[async_trait]
pub trait AccountRegistry: Send + Sync {
    /// All accounts, in insertion order.
    async fn get_all_accounts(&self) -> Result<Vec<Account>, RegistryError>;

    /// The active account, if any exists.
    async fn get_active_account(&self) -> Result<Option<Account>, RegistryError>;

    /// Create an account from a spec; returns the stored account.
    async fn add_account(&self, spec: AccountSpec) -> Result<Account, RegistryError>;

    /// Make the given account the only active one.
    async fn set_active_account(&self, id: &AccountId) -> Result<(), RegistryError>;

    /// Remove an account, reassigning active status if needed.
    async fn delete_account(&self, id: &AccountId) -> Result<(), RegistryError>;
}

/// In-memory registry implementation.
///
/// Suitable for tests and single-context wiring; a production deployment
/// would back this with capability-scoped encrypted storage.
#[derive(Default)]
pub struct MemoryRegistry {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[async_trait]
impl AccountRegistry for MemoryRegistry {
    async fn get_all_accounts(&self) -> Result<Vec<Account>, RegistryError> {
        Ok(self.accounts.lock().clone())
    }

    async fn get_active_account(&self) -> Result<Option<Account>, RegistryError> {
        Ok(self.accounts.lock().iter().find(|a| a.active).cloned())
    }

    async fn add_account(&self, spec: AccountSpec) -> Result<Account, RegistryError> {
        let mut accounts = self.accounts.lock();
        let account = Account {
            id: AccountId::generate(),
            label: spec.label,
            address: spec.address,
            public_key: spec.public_key,
            features: spec.features,
            // First account in an empty registry becomes active.
            active: accounts.is_empty(),
            created_at: Self::now_ms(),
        };
        debug!(account = %account.id, active = account.active, "Account added");
        accounts.push(account.clone());
        Ok(account)
    }

    async fn set_active_account(&self, id: &AccountId) -> Result<(), RegistryError> {
        let mut accounts = self.accounts.lock();
        if !accounts.iter().any(|a| &a.id == id) {
            return Err(RegistryError::AccountNotFound(id.to_string()));
        }
        for account in accounts.iter_mut() {
            account.active = &account.id == id;
        }
        debug!(account = %id, "Active account changed");
        Ok(())
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), RegistryError> {
        let mut accounts = self.accounts.lock();
        let position = accounts
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| RegistryError::AccountNotFound(id.to_string()))?;

        let removed = accounts.remove(position);
        if removed.active {
            if let Some(first) = accounts.first_mut() {
                first.active = true;
                debug!(promoted = %first.id, "Active account deleted, promoted successor");
            }
        }
        debug!(account = %id, remaining = accounts.len(), "Account deleted");
        Ok(())
    }
}
