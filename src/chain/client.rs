//! Chain Client Trait
//!
//! One implementation per chain. Calldata is carried as decimal strings
//! so the same request shape expresses both ABI-encoded Ethereum words
//! and Starknet felts; the client owns the final encoding.

use std::time::Duration;

use async_trait::async_trait;
use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

use crate::error::FluidResult;
use crate::types::ChainId;

/// A state-changing contract invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub contract: String,
    pub entrypoint: String,
    /// Arguments as decimal strings, in ABI order
    pub calldata: Vec<String>,
    /// Native value attached to the call (Ethereum payable locks)
    pub value: Option<U256>,
}

/// A read-only contract query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub contract: String,
    pub entrypoint: String,
    pub calldata: Vec<String>,
}

/// Estimated cost of a call, in the chain's native base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub max_fee: U256,
}

/// A broadcast transaction, observable before finality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle {
    pub hash: String,
    pub chain: ChainId,
}

/// Outcome of a finalized transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub success: bool,
    /// Revert text when `success` is false, verbatim from the chain
    pub revert_reason: Option<String>,
}

/// Async access to one chain.
///
/// Every method is a suspension point; implementations must be safe to
/// call concurrently. `wait_for_finality` returns a `Timeout`-coded error
/// when the bound is exceeded, never blocks past it.
#[async_trait]
pub trait ChainClient: Send + Sync {
    fn chain(&self) -> ChainId;

    async fn estimate_fee(&self, request: &CallRequest) -> FluidResult<Fee>;

    /// Broadcast; returns as soon as the tx hash is known
    async fn submit(&self, request: &CallRequest) -> FluidResult<TxHandle>;

    async fn wait_for_finality(&self, tx: &TxHandle, timeout: Duration) -> FluidResult<Receipt>;

    /// Read-only view query returning a single word
    async fn call(&self, request: &ViewRequest) -> FluidResult<U256>;

    /// Native (or bridged-token) balance of an account
    async fn balance_of(&self, address: &str) -> FluidResult<U256>;
}
