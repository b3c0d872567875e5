//! Bridge types and data structures

use chrono::{DateTime, Utc};
use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

use crate::error::FluidError;
use crate::types::ChainId;

/// Direction of a transfer; never inferred from address shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BridgeDirection {
    EthereumToStarknet,
    StarknetToEthereum,
}

impl BridgeDirection {
    pub fn source(&self) -> ChainId {
        match self {
            Self::EthereumToStarknet => ChainId::Ethereum,
            Self::StarknetToEthereum => ChainId::Starknet,
        }
    }

    pub fn target(&self) -> ChainId {
        self.source().counterpart()
    }
}

/// Lifecycle of one bridge operation.
///
/// Confirmed and Failed are terminal; records never leave them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeStatus {
    /// Created, not yet submitted; the only cancellable state
    Idle,
    /// ERC-20 approval in flight (Starknet-sourced only)
    Approving,
    /// Vault lock call in flight
    Locking,
    /// Lock broadcast; waiting for source-chain finality
    AwaitingRelay,
    /// Source finality reached; relayer owns the rest
    Confirmed,
    Failed,
}

impl BridgeStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    /// Whether a transition to `next` is legal
    pub fn can_transition(&self, next: BridgeStatus) -> bool {
        use BridgeStatus::*;
        matches!(
            (self, next),
            (Idle, Approving)
                | (Idle, Locking)
                | (Approving, Locking)
                | (Approving, Failed)
                | (Locking, AwaitingRelay)
                | (Locking, Failed)
                | (AwaitingRelay, Confirmed)
                | (AwaitingRelay, Failed)
        )
    }
}

impl std::fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Approving => "approving",
            Self::Locking => "locking",
            Self::AwaitingRelay => "awaiting_relay",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// What the caller asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub direction: BridgeDirection,
    /// Amount in base units (18 decimals)
    pub amount: U256,
    /// Already-resolved address on the TARGET chain
    pub recipient: String,
}

/// One bridge operation's full record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeTransaction {
    pub id: String,
    pub direction: BridgeDirection,
    pub amount: U256,
    pub recipient: String,
    /// Vault pairing nonce; fresh per attempt, 0 until Locking
    pub nonce: u128,
    pub status: BridgeStatus,
    pub approve_tx_hash: Option<String>,
    pub lock_tx_hash: Option<String>,
    /// Populated only in Failed; carries the typed reason verbatim
    pub error: Option<FluidError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BridgeTransaction {
    pub fn new(id: String, request: &BridgeRequest) -> Self {
        let now = Utc::now();
        Self {
            id,
            direction: request.direction,
            amount: request.amount,
            recipient: request.recipient.clone(),
            nonce: 0,
            status: BridgeStatus::Idle,
            approve_tx_hash: None,
            lock_tx_hash: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}
