//! Bridge orchestration against mock chain clients

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ethers_core::types::U256;

use fluid_core::{
    BridgeConfig, BridgeDirection, BridgeOrchestrator, BridgeRequest, BridgeStatus,
    BridgeTransaction, CallRequest, ChainClient, ChainId, ErrorCode, Fee, FluidError, FluidResult,
    MemorySecretStore, Receipt, SecretStore, TxHandle, ViewRequest, WalletIdentity,
};

const ETH_RECIPIENT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const STRK_RECIPIENT: &str =
    "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d";

// =============================================================================
// Mock chain
// =============================================================================

#[derive(Clone, Copy)]
enum Finality {
    Confirm,
    Revert(&'static str),
    Never,
}

struct MockChain {
    chain: ChainId,
    liquidity: U256,
    balance: U256,
    finality: Finality,
    submit_delay: Duration,
    calls: Mutex<Vec<CallRequest>>,
    views: Mutex<Vec<ViewRequest>>,
    tx_counter: AtomicUsize,
    in_flight: AtomicI64,
    max_in_flight: AtomicI64,
}

impl MockChain {
    fn new(chain: ChainId) -> Self {
        Self {
            chain,
            liquidity: U256::from(1_000_000u64),
            balance: U256::from(1_000_000u64),
            finality: Finality::Confirm,
            submit_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            views: Mutex::new(Vec::new()),
            tx_counter: AtomicUsize::new(0),
            in_flight: AtomicI64::new(0),
            max_in_flight: AtomicI64::new(0),
        }
    }

    fn with_liquidity(mut self, liquidity: u64) -> Self {
        self.liquidity = U256::from(liquidity);
        self
    }

    fn with_balance(mut self, balance: u64) -> Self {
        self.balance = U256::from(balance);
        self
    }

    fn with_finality(mut self, finality: Finality) -> Self {
        self.finality = finality;
        self
    }

    fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    fn submitted(&self) -> Vec<CallRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn view_count(&self) -> usize {
        self.views.lock().unwrap().len()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn chain(&self) -> ChainId {
        self.chain
    }

    async fn estimate_fee(&self, _request: &CallRequest) -> FluidResult<Fee> {
        Ok(Fee {
            max_fee: U256::from(21_000u64),
        })
    }

    async fn submit(&self, request: &CallRequest) -> FluidResult<TxHandle> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        self.calls.lock().unwrap().push(request.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TxHandle {
            hash: format!("0x{:064x}", n),
            chain: self.chain,
        })
    }

    async fn wait_for_finality(&self, tx: &TxHandle, timeout: Duration) -> FluidResult<Receipt> {
        match self.finality {
            Finality::Confirm => Ok(Receipt {
                tx_hash: tx.hash.clone(),
                block_number: 1,
                success: true,
                revert_reason: None,
            }),
            Finality::Revert(reason) => Ok(Receipt {
                tx_hash: tx.hash.clone(),
                block_number: 1,
                success: false,
                revert_reason: Some(reason.to_string()),
            }),
            Finality::Never => {
                tokio::time::sleep(timeout).await;
                Err(FluidError::new(
                    ErrorCode::Timeout,
                    "finality wait exceeded bound",
                ))
            }
        }
    }

    async fn call(&self, request: &ViewRequest) -> FluidResult<U256> {
        self.views.lock().unwrap().push(request.clone());
        Ok(self.liquidity)
    }

    async fn balance_of(&self, _address: &str) -> FluidResult<U256> {
        Ok(self.balance)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn identity() -> WalletIdentity {
    WalletIdentity {
        mnemonic_fingerprint: "aabbccdd".into(),
        eth_address: ETH_RECIPIENT.into(),
        eth_private_key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
            .into(),
        strk_address: STRK_RECIPIENT.into(),
        strk_public_key: "0x1234".into(),
        strk_private_key: "0x5678".into(),
    }
}

fn orchestrator(
    eth: Arc<MockChain>,
    strk: Arc<MockChain>,
    config: BridgeConfig,
) -> BridgeOrchestrator {
    let store = Arc::new(MemorySecretStore::new());
    store.put(identity());
    BridgeOrchestrator::new(eth, strk, store, config).unwrap()
}

fn eth_to_strk(amount: u64) -> BridgeRequest {
    BridgeRequest {
        direction: BridgeDirection::EthereumToStarknet,
        amount: U256::from(amount),
        recipient: STRK_RECIPIENT.into(),
    }
}

fn strk_to_eth(amount: u64) -> BridgeRequest {
    BridgeRequest {
        direction: BridgeDirection::StarknetToEthereum,
        amount: U256::from(amount),
        recipient: ETH_RECIPIENT.into(),
    }
}

async fn wait_for_status(
    orch: &BridgeOrchestrator,
    id: &str,
    status: BridgeStatus,
) -> BridgeTransaction {
    let mut rx = orch.watch();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Some(tx) = orch.get(id) {
                if tx.status == status {
                    return tx;
                }
            }
            if rx.changed().await.is_err() {
                panic!("watch channel closed before reaching {}", status);
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {}", status))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn ethereum_to_starknet_happy_path() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let record = orch.bridge(eth_to_strk(1_000)).await.unwrap();
    assert_eq!(record.status, BridgeStatus::AwaitingRelay);
    assert!(record.lock_tx_hash.is_some());
    assert!(record.approve_tx_hash.is_none());

    let confirmed = wait_for_status(&orch, &record.id, BridgeStatus::Confirmed).await;
    assert!(confirmed.error.is_none());

    // Exactly one submission, on the Ethereum side, carrying native value
    let calls = eth.submitted();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].entrypoint, "lockTokens");
    assert_eq!(calls[0].value, Some(U256::from(1_000u64)));
    assert!(strk.submitted().is_empty());

    // Liquidity was checked on the target chain before submission
    assert_eq!(strk.view_count(), 1);
}

#[tokio::test]
async fn starknet_to_ethereum_approves_then_locks() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let record = orch.bridge(strk_to_eth(500)).await.unwrap();
    assert_eq!(record.status, BridgeStatus::AwaitingRelay);
    assert!(record.approve_tx_hash.is_some());
    assert!(record.lock_tx_hash.is_some());
    assert_ne!(record.approve_tx_hash, record.lock_tx_hash);

    wait_for_status(&orch, &record.id, BridgeStatus::Confirmed).await;

    let calls = strk.submitted();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].entrypoint, "approve");
    assert_eq!(calls[1].entrypoint, "lock_tokens");
    // Token lock never carries native value
    assert_eq!(calls[1].value, None);
    assert!(eth.submitted().is_empty());
}

#[tokio::test]
async fn zero_amount_rejected_before_submission() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let err = orch.bridge(eth_to_strk(0)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidAmount);

    // The liquidity view runs first (it decides precedence) but it is
    // read-only; nothing state-changing ever goes out
    assert_eq!(strk.view_count(), 1);
    assert!(eth.submitted().is_empty());
    assert!(strk.submitted().is_empty());
    assert!(orch.transactions().is_empty());
}

#[tokio::test]
async fn liquidity_failure_takes_precedence_over_amount() {
    // Vault is drained AND the amount is invalid; liquidity wins
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet).with_liquidity(0));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let err = orch.bridge(eth_to_strk(0)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientLiquidity);
    assert!(eth.submitted().is_empty());
}

#[tokio::test]
async fn insufficient_balance_rejected_before_submission() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum).with_balance(10));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let err = orch.bridge(eth_to_strk(1_000)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientBalance);
    assert!(eth.submitted().is_empty());
}

#[tokio::test]
async fn mismatched_recipient_rejected() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    // Ethereum-shaped recipient on a transfer bound for Starknet
    let request = BridgeRequest {
        direction: BridgeDirection::EthereumToStarknet,
        amount: U256::from(100u64),
        recipient: ETH_RECIPIENT.into(),
    };
    let err = orch.bridge(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CrossChainMismatch);
    assert!(eth.submitted().is_empty());
}

#[tokio::test]
async fn approval_revert_fails_before_lock() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(
        MockChain::new(ChainId::Starknet).with_finality(Finality::Revert("u256_overflow")),
    );
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let err = orch.bridge(strk_to_eth(500)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ApprovalRejected);
    // Revert text preserved verbatim
    assert!(err.message.contains("u256_overflow"));

    // Approval went out, lock never did
    let calls = strk.submitted();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].entrypoint, "approve");

    let records = orch.transactions();
    let record = &records[0];
    assert_eq!(record.status, BridgeStatus::Failed);
    assert_eq!(
        record.error.as_ref().unwrap().code,
        ErrorCode::ApprovalRejected
    );
}

#[tokio::test]
async fn unreachable_finality_times_out_instead_of_hanging() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum).with_finality(Finality::Never));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let config = BridgeConfig {
        relay_timeout: Duration::from_millis(50),
        ..BridgeConfig::default()
    };
    let orch = orchestrator(eth.clone(), strk.clone(), config);

    // Broadcast still succeeds; only the finality wait expires
    let record = orch.bridge(eth_to_strk(100)).await.unwrap();
    assert_eq!(record.status, BridgeStatus::AwaitingRelay);

    let failed = wait_for_status(&orch, &record.id, BridgeStatus::Failed).await;
    assert_eq!(failed.error.as_ref().unwrap().code, ErrorCode::RelayTimeout);
}

#[tokio::test]
async fn stalled_approval_times_out_distinctly() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet).with_finality(Finality::Never));
    let config = BridgeConfig {
        approval_timeout: Duration::from_millis(50),
        ..BridgeConfig::default()
    };
    let orch = orchestrator(eth.clone(), strk.clone(), config);

    // Fails within the configured bound, not the 2s harness bound
    let err = tokio::time::timeout(Duration::from_secs(2), orch.bridge(strk_to_eth(500)))
        .await
        .expect("approval wait must respect its bound")
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ApprovalTimeout);

    // Approval went out, lock never did
    let calls = strk.submitted();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].entrypoint, "approve");

    let records = orch.transactions();
    assert_eq!(records[0].status, BridgeStatus::Failed);
    assert_eq!(
        records[0].error.as_ref().unwrap().code,
        ErrorCode::ApprovalTimeout
    );
}

#[tokio::test]
async fn terminal_records_cannot_be_cancelled() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let record = orch.bridge(eth_to_strk(100)).await.unwrap();
    wait_for_status(&orch, &record.id, BridgeStatus::Confirmed).await;

    assert!(orch.cancel(&record.id).is_err());
    assert_eq!(
        orch.get(&record.id).unwrap().status,
        BridgeStatus::Confirmed
    );

    assert!(orch.cancel("no-such-operation").is_err());
}

#[tokio::test]
async fn each_attempt_gets_a_fresh_nonce() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let first = orch.bridge(eth_to_strk(100)).await.unwrap();
    let second = orch.bridge(eth_to_strk(100)).await.unwrap();

    assert_ne!(first.nonce, 0);
    assert_ne!(second.nonce, 0);
    assert_ne!(first.nonce, second.nonce);

    // The nonce travels in calldata position 1 of lockTokens
    let calls = eth.submitted();
    assert_eq!(calls.len(), 2);
    assert_ne!(calls[0].calldata[1], calls[1].calldata[1]);
    assert_eq!(calls[0].calldata[1], first.nonce.to_string());
}

#[tokio::test]
async fn same_source_submissions_are_serialized() {
    let eth = Arc::new(
        MockChain::new(ChainId::Ethereum).with_submit_delay(Duration::from_millis(50)),
    );
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let (a, b) = tokio::join!(orch.bridge(eth_to_strk(100)), orch.bridge(eth_to_strk(200)));
    a.unwrap();
    b.unwrap();

    assert_eq!(eth.submitted().len(), 2);
    assert_eq!(eth.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn opposite_sources_run_concurrently() {
    let eth = Arc::new(
        MockChain::new(ChainId::Ethereum).with_submit_delay(Duration::from_millis(100)),
    );
    let strk = Arc::new(
        MockChain::new(ChainId::Starknet).with_submit_delay(Duration::from_millis(100)),
    );
    let orch = orchestrator(eth.clone(), strk.clone(), BridgeConfig::default());

    let started = std::time::Instant::now();
    let (a, b) = tokio::join!(orch.bridge(eth_to_strk(100)), orch.bridge(strk_to_eth(100)));
    a.unwrap();
    b.unwrap();

    // Starknet side does approve + lock (200ms serial); if the Ethereum
    // lock also serialized behind it we would exceed 300ms
    assert!(started.elapsed() < Duration::from_millis(300));
}

#[tokio::test]
async fn missing_identity_blocks_bridging() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let strk = Arc::new(MockChain::new(ChainId::Starknet));
    let store = Arc::new(MemorySecretStore::new());
    let orch = BridgeOrchestrator::new(eth.clone(), strk, store, BridgeConfig::default()).unwrap();

    assert!(orch.bridge(eth_to_strk(100)).await.is_err());
    assert!(eth.submitted().is_empty());
}

#[tokio::test]
async fn miswired_clients_are_rejected_at_construction() {
    let eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let also_eth = Arc::new(MockChain::new(ChainId::Ethereum));
    let store = Arc::new(MemorySecretStore::new());

    assert!(BridgeOrchestrator::new(eth, also_eth, store, BridgeConfig::default()).is_err());
}
