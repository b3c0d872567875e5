//! Per-Chain Curve Adapters
//!
//! Key and address derivation rules for the two chains this wallet spans:
//!
//! - `secp256k1`: Ethereum BIP-44 derivation and EIP-55 addresses
//! - `stark`: Stark curve scalar reduction, public keys, and deterministic
//!   account-contract address precomputation
//!
//! The Starknet key is derived FROM the Ethereum private key scalar, not
//! independently from the seed. That coupling is load-bearing: changing it
//! changes every produced Starknet address for existing wallets.

pub mod secp256k1;
pub mod stark;

pub use secp256k1::{derive_ethereum, keccak256, to_checksum_address};
pub use stark::{derive_starknet, precompute_account_address, StarknetAccountConfig, STARK_ORDER};
