//! Key Generation
//!
//! Creates wallets from entropy or mnemonic phrases.
//!
//! SECURITY: All sensitive data (entropy, seeds) is zeroized on drop.

use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::curve::StarknetAccountConfig;
use crate::error::FluidResult;
use crate::log_info;
use crate::types::WalletIdentity;

use super::derivation;

/// Generate a fresh 12-word mnemonic without deriving any keys
///
/// SECURITY: Entropy is securely zeroized after mnemonic generation
pub fn generate_mnemonic() -> FluidResult<String> {
    let mut entropy = Zeroizing::new([0u8; 16]); // 128 bits = 12 words
    OsRng.fill_bytes(entropy.as_mut());

    let mnemonic = Mnemonic::from_entropy(entropy.as_ref())?;
    Ok(mnemonic.to_string())
}

/// Create a new wallet from random entropy (12-word phrase)
///
/// SECURITY: Entropy is securely zeroized after mnemonic generation
pub fn create_wallet_from_entropy() -> FluidResult<(String, WalletIdentity)> {
    let mut entropy = Zeroizing::new([0u8; 16]); // 128 bits = 12 words
    OsRng.fill_bytes(entropy.as_mut());

    let mnemonic = Mnemonic::from_entropy(entropy.as_ref())?;
    let phrase = mnemonic.to_string();

    let seed = Zeroizing::new(mnemonic.to_seed(""));
    let fingerprint = derivation::mnemonic_fingerprint(&phrase);
    let identity = derivation::derive_identity(
        seed.as_ref(),
        fingerprint,
        &StarknetAccountConfig::default(),
    )?;

    log_info!(
        "wallet",
        "Wallet created",
        fingerprint = identity.mnemonic_fingerprint,
        eth_address = identity.eth_address,
    );

    Ok((phrase, identity))
}

/// Restore a wallet from a mnemonic phrase
pub fn restore_wallet(mnemonic_phrase: &str) -> FluidResult<WalletIdentity> {
    restore_wallet_with_passphrase(mnemonic_phrase, "")
}

/// Restore a wallet from a mnemonic phrase with an optional BIP-39 passphrase
///
/// SECURITY: Seed is securely zeroized after key derivation
pub fn restore_wallet_with_passphrase(
    mnemonic_phrase: &str,
    passphrase: &str,
) -> FluidResult<WalletIdentity> {
    let normalized = Zeroizing::new(derivation::normalize_phrase(mnemonic_phrase));
    let mnemonic = Mnemonic::parse(normalized.as_str())?;

    let seed = Zeroizing::new(mnemonic.to_seed(passphrase));
    let fingerprint = derivation::mnemonic_fingerprint(&normalized);
    let identity = derivation::derive_identity(
        seed.as_ref(),
        fingerprint,
        &StarknetAccountConfig::default(),
    )?;

    log_info!(
        "wallet",
        "Wallet restored",
        fingerprint = identity.mnemonic_fingerprint,
        eth_address = identity.eth_address,
    );

    Ok(identity)
}

/// Validate a mnemonic phrase (word count, wordlist, checksum)
/// without deriving any keys.
pub fn validate_mnemonic(mnemonic_phrase: &str) -> FluidResult<()> {
    let normalized = Zeroizing::new(derivation::normalize_phrase(mnemonic_phrase));
    Mnemonic::parse(normalized.as_str())?;
    Ok(())
}
