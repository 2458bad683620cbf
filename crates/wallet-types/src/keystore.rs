//! # Keystore Port
//!
//! The private-key-holding collaborator. The wallet core never touches key
//! material itself; it asks this port to sign on behalf of an account.
//!
//! [`MemoryKeystore`] is the reference implementation: ed25519 keys held in
//! process memory, suitable for tests and development wiring.

use crate::account::AccountId;
use crate::errors::KeystoreError;
use async_trait::async_trait;
use ed25519_dalek::{Signer as _, SigningKey};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Contract of the signing collaborator.
#[async_trait]
pub trait Keystore: Send + Sync {
    /// Sign `message` with the key belonging to `account`.
    ///
    /// Returns the raw signature bytes; encoding for the external surface is
    /// the caller's concern.
    async fn sign(&self, account: &AccountId, message: &[u8]) -> Result<Vec<u8>, KeystoreError>;
}

/// In-memory ed25519 keystore.
pub struct MemoryKeystore {
    keys: Mutex<HashMap<AccountId, SigningKey>>,
}

impl MemoryKeystore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
        }
    }

    /// Generate a fresh keypair for `account`; returns the public key bytes.
    pub fn generate(&self, account: &AccountId) -> Vec<u8> {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        let public_key = signing_key.verifying_key().to_bytes().to_vec();
        self.keys.lock().insert(account.clone(), signing_key);
        public_key
    }

    /// Move key material under a new account id.
    ///
    /// The registry assigns ids at insert, so a key generated ahead of the
    /// insert is re-keyed to the stored account afterwards.
    pub fn rekey(&self, from: &AccountId, to: &AccountId) -> bool {
        let mut keys = self.keys.lock();
        match keys.remove(from) {
            Some(key) => {
                keys.insert(to.clone(), key);
                true
            }
            None => false,
        }
    }

    /// Remove key material for a deleted account.
    pub fn remove(&self, account: &AccountId) -> bool {
        self.keys.lock().remove(account).is_some()
    }
}

impl Default for MemoryKeystore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Keystore for MemoryKeystore {
    async fn sign(&self, account: &AccountId, message: &[u8]) -> Result<Vec<u8>, KeystoreError> {
        let keys = self.keys.lock();
        let key = keys
            .get(account)
            .ok_or_else(|| KeystoreError::UnknownKey(account.to_string()))?;
        Ok(key.sign(message).to_bytes().to_vec())
    }
}
