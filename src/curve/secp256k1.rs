//! Ethereum Key Derivation
//!
//! Standard BIP-44 derivation at m/44'/60'/0'/0/0 over secp256k1,
//! Keccak-256 address with EIP-55 checksum.

use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::Secp256k1;
use bitcoin::Network;
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

use crate::error::FluidResult;
use crate::types::EthereumKeys;

/// BIP-44 path for the first Ethereum account
const ETHEREUM_PATH: &str = "m/44'/60'/0'/0/0";

/// Derive Ethereum keys from a BIP-39 seed
///
/// SECURITY: The seed should be wrapped in Zeroizing by the caller.
pub fn derive_ethereum(seed: &[u8]) -> FluidResult<EthereumKeys> {
    let secp = Secp256k1::new();
    let master = Xpriv::new_master(Network::Bitcoin, seed)?;

    let path = DerivationPath::from_str(ETHEREUM_PATH)?;
    let child = master.derive_priv(&secp, &path)?;
    let secret_key = child.private_key;

    let private_hex = hex::encode(secret_key.secret_bytes());
    let secp_public_key = secret_key.public_key(&secp);
    let uncompressed = secp_public_key.serialize_uncompressed();
    let public_key_bytes = &uncompressed[1..];

    let public_uncompressed_hex = hex::encode(public_key_bytes);
    let address_bytes = keccak256(public_key_bytes);
    let address = to_checksum_address(&address_bytes[12..]);

    Ok(EthereumKeys {
        private_hex,
        public_uncompressed_hex,
        address,
    })
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// EIP-55 mixed-case checksum encoding of a 20-byte address
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() {
            result.push(ch);
        } else if nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}
