//! Name Resolution Seam
//!
//! Human-readable names are resolved to chain addresses BEFORE the
//! bridge is invoked; the core only ever sees resolved addresses.
//! Registration and lookup backends live with the embedder.

use crate::types::ChainId;

/// Maps a human-readable name to an address on a given chain.
pub trait NameResolver: Send + Sync {
    /// Resolve `name` on `chain`; `None` when unregistered
    fn resolve(&self, name: &str, chain: ChainId) -> Option<String>;
}

/// Resolver that knows no names. Useful as a default collaborator.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl NameResolver for NullResolver {
    fn resolve(&self, _name: &str, _chain: ChainId) -> Option<String> {
        None
    }
}
