//! Unified error types for Fluid Core
//!
//! All errors flow through this module for consistent handling.
//! Bridge failures keep the underlying chain message verbatim so the
//! caller can tell a retriable timeout from a permanent rejection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all Fluid operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FluidError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl FluidError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    pub fn derivation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DerivationError, msg)
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAmount, msg)
    }

    pub fn insufficient_liquidity(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientLiquidity, msg)
    }

    pub fn insufficient_balance(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientBalance, msg)
    }

    pub fn approval_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApprovalRejected, msg)
    }

    pub fn lock_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::LockRejected, msg)
    }

    pub fn approval_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApprovalTimeout, msg)
    }

    pub fn relay_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RelayTimeout, msg)
    }

    pub fn cross_chain_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CrossChainMismatch, msg)
    }

    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for FluidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for FluidError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Derivation errors
    InvalidMnemonic,
    DerivationError,

    // Pre-flight bridge errors (no chain state touched)
    InvalidAmount,
    InsufficientLiquidity,
    InsufficientBalance,
    CrossChainMismatch,

    // Chain-reported rejections (surfaced verbatim, never auto-retried)
    ApprovalRejected,
    LockRejected,

    // Bounded-wait expirations (safe to retry, caller decides)
    ApprovalTimeout,
    RelayTimeout,

    // Ambient
    NetworkError,
    Timeout,
    ParseError,
    Internal,
}

impl ErrorCode {
    /// Whether retrying the operation can succeed without any external change.
    ///
    /// Timeouts mean no state changed on-chain; rejections and pre-flight
    /// failures will repeat until balances, liquidity, or inputs change.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::ApprovalTimeout | Self::RelayTimeout | Self::Timeout | Self::NetworkError
        )
    }
}

/// Result type alias for Fluid operations
pub type FluidResult<T> = Result<T, FluidError>;

// Conversions from common error types

impl From<serde_json::Error> for FluidError {
    fn from(e: serde_json::Error) -> Self {
        FluidError::new(ErrorCode::ParseError, e.to_string())
    }
}

impl From<hex::FromHexError> for FluidError {
    fn from(e: hex::FromHexError) -> Self {
        FluidError::new(ErrorCode::ParseError, e.to_string())
    }
}

impl From<bitcoin::bip32::Error> for FluidError {
    fn from(e: bitcoin::bip32::Error) -> Self {
        FluidError::new(ErrorCode::DerivationError, format!("BIP32 error: {}", e))
    }
}

impl From<bitcoin::secp256k1::Error> for FluidError {
    fn from(e: bitcoin::secp256k1::Error) -> Self {
        FluidError::new(ErrorCode::DerivationError, format!("Secp256k1 error: {}", e))
    }
}

impl From<bip39::Error> for FluidError {
    fn from(e: bip39::Error) -> Self {
        FluidError::new(ErrorCode::InvalidMnemonic, format!("BIP39 error: {}", e))
    }
}
