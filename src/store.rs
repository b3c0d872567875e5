//! Secret Storage Seam
//!
//! The core never persists key material itself. Embedders supply a
//! `SecretStore`; the core hands each derived `WalletIdentity` over
//! exactly once and treats the store as read-only during bridge
//! operations.

use std::sync::Mutex;

use zeroize::Zeroize;

use crate::types::WalletIdentity;

/// Opaque secure key-value storage for the wallet identity.
///
/// Implementations own persistence format and zeroing of anything
/// they copy out.
pub trait SecretStore: Send + Sync {
    /// The currently stored identity, if any
    fn get(&self) -> Option<WalletIdentity>;

    /// Store an identity, replacing any previous one
    fn put(&self, identity: WalletIdentity);

    /// Remove the stored identity, scrubbing key material
    fn clear(&self);
}

/// In-memory store for tests and short-lived embeddings.
///
/// Key material is zeroized when replaced or cleared.
#[derive(Default)]
pub struct MemorySecretStore {
    inner: Mutex<Option<WalletIdentity>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn scrub(identity: &mut WalletIdentity) {
    identity.eth_private_key.zeroize();
    identity.strk_private_key.zeroize();
}

impl SecretStore for MemorySecretStore {
    fn get(&self) -> Option<WalletIdentity> {
        self.inner.lock().ok().and_then(|guard| guard.clone())
    }

    fn put(&self, identity: WalletIdentity) {
        if let Ok(mut guard) = self.inner.lock() {
            if let Some(ref mut old) = *guard {
                scrub(old);
            }
            *guard = Some(identity);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            if let Some(ref mut old) = *guard {
                scrub(old);
            }
            *guard = None;
        }
    }
}
