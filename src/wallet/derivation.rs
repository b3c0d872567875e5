//! Identity Derivation
//!
//! Derives the full dual-chain identity from a BIP-39 seed. The pipeline
//! is strictly ordered: seed -> Ethereum keys -> Starknet keys, because
//! the Starknet scalar is reduced from the Ethereum private key.
//!
//! SECURITY: All private key material is zeroized when no longer needed.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::curve::{derive_ethereum, derive_starknet, StarknetAccountConfig};
use crate::error::{FluidError, FluidResult};
use crate::types::WalletIdentity;

/// Normalize a mnemonic phrase: trim, lowercase, collapse whitespace.
///
/// Two phrases that differ only in spacing or case must produce the
/// same fingerprint and the same keys.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First 4 bytes of SHA-256 over the normalized phrase, hex encoded.
///
/// Identifies a stored identity without retaining the phrase itself.
pub fn mnemonic_fingerprint(phrase: &str) -> String {
    let normalized = normalize_phrase(phrase);
    let digest = Sha256::digest(normalized.as_bytes());
    hex::encode(&digest[..4])
}

/// Derive both chains' keys from a BIP-39 seed
///
/// SECURITY: The seed should be wrapped in Zeroizing by the caller.
pub fn derive_identity(
    seed: &[u8],
    fingerprint: String,
    config: &StarknetAccountConfig,
) -> FluidResult<WalletIdentity> {
    let eth = derive_ethereum(seed)?;

    // The Ethereum scalar doubles as Starknet entropy; keep the raw
    // bytes wrapped so they clear on drop.
    let raw = Zeroizing::new(
        <[u8; 32]>::try_from(hex::decode(&eth.private_hex)?.as_slice())
            .map_err(|_| FluidError::derivation("Ethereum private key is not 32 bytes"))?,
    );
    let strk = derive_starknet(&raw, config)?;

    Ok(WalletIdentity {
        mnemonic_fingerprint: fingerprint,
        eth_address: eth.address,
        eth_private_key: format!("0x{}", eth.private_hex),
        strk_address: strk.address,
        strk_public_key: strk.public_key,
        strk_private_key: strk.private_key,
    })
}
