//! Chain Access Seam
//!
//! The bridge never talks to a node directly. Each orchestrator instance
//! is handed one `ChainClient` per chain; network transport, signing, and
//! RPC details stay with the embedder. No global provider state.

pub mod client;

pub use client::{CallRequest, ChainClient, Fee, Receipt, TxHandle, ViewRequest};
