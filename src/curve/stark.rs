//! Starknet Key Derivation
//!
//! Turns the Ethereum private key scalar into a valid Stark curve keypair
//! and precomputes the account-contract address the ArgentX proxy pattern
//! would deploy to. The address is valid before the account contract
//! exists on-chain.

use ethers_core::types::U256;
use starknet_core::types::Felt;
use starknet_core::utils::{get_contract_address, get_selector_from_name};
use starknet_crypto::get_public_key;

use crate::error::{FluidError, FluidResult};
use crate::types::StarknetKeys;

/// Order of the Stark curve subgroup.
///
/// Decimal: 3618502788666131213697322783095070105526743751716087489154079457884512865583
pub const STARK_ORDER: U256 = U256([
    0x1e66a241adc64d2f,
    0xb781126dcae7b232,
    0xffffffffffffffff,
    0x0800000000000010,
]);

/// Class hashes for the account proxy deployment.
///
/// Defaults are the ArgentX proxy + account implementation the original
/// deployment targets; embedders can override both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarknetAccountConfig {
    pub proxy_class_hash: Felt,
    pub account_class_hash: Felt,
}

impl Default for StarknetAccountConfig {
    fn default() -> Self {
        Self {
            proxy_class_hash: Felt::from_hex_unchecked(
                "0x25ec026985a3bf9d0cc1fe17326b245dfdc3ff89b8fde106542a3ea56c5a918",
            ),
            account_class_hash: Felt::from_hex_unchecked(
                "0x033434ad846cdd5f23eb73ff09fe6fddd568284a0fb7d1be20ee482f044dabe2",
            ),
        }
    }
}

/// Derive Starknet keys from the raw Ethereum private key bytes
///
/// The secp256k1 scalar is treated as entropy: reduced modulo the Stark
/// curve order, with a zero result remapped to one (zero is not a valid
/// signing scalar). Do not replace this with an independent BIP-44
/// derivation; every existing wallet's Starknet address depends on it.
pub fn derive_starknet(
    eth_private_key: &[u8; 32],
    config: &StarknetAccountConfig,
) -> FluidResult<StarknetKeys> {
    let scalar = reduce_to_stark_scalar(eth_private_key);

    let mut scalar_bytes = [0u8; 32];
    scalar.to_big_endian(&mut scalar_bytes);
    let private_felt = Felt::from_bytes_be(&scalar_bytes);

    let public_felt = get_public_key(&private_felt);
    let address_felt = precompute_account_address(&public_felt, config)?;

    Ok(StarknetKeys {
        private_key: format!("0x{}", hex::encode(scalar_bytes)),
        public_key: format!("{:#x}", public_felt),
        address: format!("{:#x}", address_felt),
    })
}

/// Reduce a 32-byte big-endian scalar into [1, STARK_ORDER - 1]
fn reduce_to_stark_scalar(bytes: &[u8; 32]) -> U256 {
    let reduced = U256::from_big_endian(bytes) % STARK_ORDER;
    if reduced.is_zero() {
        U256::one()
    } else {
        reduced
    }
}

/// Precompute the account-contract address for a Stark public key
///
/// Pure function of (public key, proxy class hash, account class hash):
/// salt is the public key, deployer is zero, and the proxy constructor
/// calldata initializes the account with `signer = pubkey, guardian = 0`.
pub fn precompute_account_address(
    public_key: &Felt,
    config: &StarknetAccountConfig,
) -> FluidResult<Felt> {
    let initialize_selector = get_selector_from_name("initialize")
        .map_err(|e| FluidError::internal(format!("Selector encoding failed: {}", e)))?;

    let constructor_calldata = [
        config.account_class_hash,
        initialize_selector,
        Felt::TWO, // inner calldata length
        *public_key,
        Felt::ZERO, // guardian
    ];

    Ok(get_contract_address(
        *public_key,
        config.proxy_class_hash,
        &constructor_calldata,
        Felt::ZERO,
    ))
}
