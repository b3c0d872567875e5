//! Bridge Orchestrator
//!
//! Drives one transfer through approve -> lock -> relay wait, against
//! injected chain clients. The orchestrator owns the transfer ledger and
//! publishes snapshots through a watch channel; it never talks to a node
//! itself and never auto-retries a failed operation.
//!
//! Submission is serialized per source chain so two transfers from the
//! same account cannot interleave chain-level nonces. Transfers sourced
//! on different chains proceed concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use ethers_core::types::U256;
use tokio::sync::{watch, Mutex as AsyncMutex};

use crate::chain::{CallRequest, ChainClient, TxHandle, ViewRequest};
use crate::error::{ErrorCode, FluidError, FluidResult};
use crate::store::SecretStore;
use crate::types::ChainId;
use crate::{log_debug, log_info, log_warn};

use super::config::BridgeConfig;
use super::nonce::NonceGenerator;
use super::types::{BridgeDirection, BridgeRequest, BridgeStatus, BridgeTransaction};

// =============================================================================
// Ledger
// =============================================================================

/// Transfer records plus the snapshot channel. Shared with spawned
/// finality watchers.
struct Ledger {
    records: StdMutex<HashMap<String, BridgeTransaction>>,
    snapshots: watch::Sender<Vec<BridgeTransaction>>,
}

impl Ledger {
    fn new() -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            records: StdMutex::new(HashMap::new()),
            snapshots,
        }
    }

    fn insert(&self, tx: BridgeTransaction) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(tx.id.clone(), tx);
        }
        self.publish();
    }

    fn get(&self, id: &str) -> Option<BridgeTransaction> {
        self.records.lock().ok()?.get(id).cloned()
    }

    fn all(&self) -> Vec<BridgeTransaction> {
        self.records
            .lock()
            .map(|r| r.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Move a record to `next`, applying `mutate` under the same lock.
    /// Rejects illegal transitions, including anything out of a
    /// terminal state.
    fn transition(
        &self,
        id: &str,
        next: BridgeStatus,
        mutate: impl FnOnce(&mut BridgeTransaction),
    ) -> FluidResult<BridgeTransaction> {
        let updated = {
            let mut records = self
                .records
                .lock()
                .map_err(|_| FluidError::internal("Ledger lock poisoned"))?;
            let record = records
                .get_mut(id)
                .ok_or_else(|| FluidError::internal("Bridge record not found"))?;

            if !record.status.can_transition(next) {
                return Err(FluidError::internal(format!(
                    "Illegal bridge transition {} -> {}",
                    record.status, next
                )));
            }

            record.status = next;
            record.updated_at = chrono::Utc::now();
            mutate(record);
            record.clone()
        };
        self.publish();
        Ok(updated)
    }

    /// Record a tx hash or similar without changing status
    fn update(&self, id: &str, mutate: impl FnOnce(&mut BridgeTransaction)) {
        if let Ok(mut records) = self.records.lock() {
            if let Some(record) = records.get_mut(id) {
                mutate(record);
                record.updated_at = chrono::Utc::now();
            }
        }
        self.publish();
    }

    /// Discard a record still in Idle. Returns whether it was removed.
    fn remove_if_idle(&self, id: &str) -> bool {
        let removed = self
            .records
            .lock()
            .ok()
            .map(|mut records| {
                let idle = records
                    .get(id)
                    .map(|r| r.status == BridgeStatus::Idle)
                    .unwrap_or(false);
                if idle {
                    records.remove(id);
                }
                idle
            })
            .unwrap_or(false);
        if removed {
            self.publish();
        }
        removed
    }

    fn publish(&self) {
        let snapshot = self.all();
        let _ = self.snapshots.send(snapshot);
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

pub struct BridgeOrchestrator {
    ethereum: Arc<dyn ChainClient>,
    starknet: Arc<dyn ChainClient>,
    store: Arc<dyn SecretStore>,
    config: BridgeConfig,
    nonces: NonceGenerator,
    eth_submission: AsyncMutex<()>,
    strk_submission: AsyncMutex<()>,
    ledger: Arc<Ledger>,
}

impl BridgeOrchestrator {
    pub fn new(
        ethereum: Arc<dyn ChainClient>,
        starknet: Arc<dyn ChainClient>,
        store: Arc<dyn SecretStore>,
        config: BridgeConfig,
    ) -> FluidResult<Self> {
        if ethereum.chain() != ChainId::Ethereum {
            return Err(FluidError::internal("Ethereum client reports wrong chain"));
        }
        if starknet.chain() != ChainId::Starknet {
            return Err(FluidError::internal("Starknet client reports wrong chain"));
        }

        Ok(Self {
            ethereum,
            starknet,
            store,
            config,
            nonces: NonceGenerator::new(),
            eth_submission: AsyncMutex::new(()),
            strk_submission: AsyncMutex::new(()),
            ledger: Arc::new(Ledger::new()),
        })
    }

    /// Snapshot channel; receives the full record list on every change
    pub fn watch(&self) -> watch::Receiver<Vec<BridgeTransaction>> {
        self.ledger.snapshots.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<BridgeTransaction> {
        self.ledger.get(id)
    }

    pub fn transactions(&self) -> Vec<BridgeTransaction> {
        self.ledger.all()
    }

    /// Discard a transfer that has not been submitted yet.
    /// Anything past Idle is already on (or headed to) a chain and
    /// cannot be recalled.
    pub fn cancel(&self, id: &str) -> FluidResult<()> {
        if self.ledger.remove_if_idle(id) {
            log_info!("bridge", "Bridge operation cancelled", operation_id = id);
            Ok(())
        } else {
            Err(FluidError::internal(
                "Only idle operations can be cancelled",
            ))
        }
    }

    /// Liquidity the target-chain vault can currently release
    pub async fn available_liquidity(&self, direction: BridgeDirection) -> FluidResult<U256> {
        let target = direction.target();
        let client = self.client_for(target);
        let request = ViewRequest {
            contract: self.vault_address(target).to_string(),
            entrypoint: liquidity_entrypoint(target).to_string(),
            calldata: Vec::new(),
        };
        client.call(&request).await
    }

    /// Native/token balance held by a chain's vault contract
    pub async fn vault_balance(&self, chain: ChainId) -> FluidResult<U256> {
        self.client_for(chain)
            .balance_of(self.vault_address(chain))
            .await
    }

    /// Run one transfer to the point of broadcast.
    ///
    /// Returns once the lock is on the wire (AwaitingRelay, lock tx hash
    /// set). A spawned watcher then drives the record to Confirmed or
    /// Failed; observe it via `watch()` or `get()`. Failures before
    /// broadcast surface as the returned error AND a Failed record
    /// (except pre-flight failures, which never create a record).
    pub async fn bridge(&self, request: BridgeRequest) -> FluidResult<BridgeTransaction> {
        let source = request.direction.source();

        self.preflight(&request).await?;

        let id = format!("{:032x}", self.nonces.next());
        self.ledger
            .insert(BridgeTransaction::new(id.clone(), &request));
        log_info!(
            "bridge",
            "Bridge operation created",
            operation_id = id,
            source = source,
            amount = request.amount,
            recipient = request.recipient,
        );

        // One submission at a time per source chain
        let _guard = self.submission_mutex(source).lock().await;

        // Cancelled while queued behind another submission
        if self.ledger.get(&id).is_none() {
            return Err(FluidError::internal("Bridge operation cancelled"));
        }

        if source.requires_approval() {
            self.run_approval(&id, &request).await?;
        }
        let handle = self.run_lock(&id, &request).await?;

        let ledger = Arc::clone(&self.ledger);
        let client = Arc::clone(self.client_for(source));
        let timeout = self.config.relay_timeout;
        let watcher_id = id.clone();
        tokio::spawn(async move {
            watch_finality(ledger, client, watcher_id, handle, timeout).await;
        });

        self.ledger
            .get(&id)
            .ok_or_else(|| FluidError::internal("Bridge record not found"))
    }

    // -------------------------------------------------------------------------
    // Stages
    // -------------------------------------------------------------------------

    /// Pre-flight checks, strictly ordered: liquidity first (so a doomed
    /// operation never spends gas), then amount, balance, recipient.
    async fn preflight(&self, request: &BridgeRequest) -> FluidResult<()> {
        let source = request.direction.source();
        let target = request.direction.target();

        // A drained vault fails here no matter what the amount is, so the
        // liquidity reason wins over amount validation
        let liquidity = self.available_liquidity(request.direction).await?;
        if liquidity.is_zero() || liquidity < request.amount {
            return Err(FluidError::insufficient_liquidity(format!(
                "Vault liquidity {} below requested {}",
                liquidity, request.amount
            )));
        }

        if request.amount.is_zero() {
            return Err(FluidError::invalid_amount("Amount must be greater than zero"));
        }

        let identity = self
            .store
            .get()
            .ok_or_else(|| FluidError::internal("No wallet identity in store"))?;
        let sender = match source {
            ChainId::Ethereum => identity.eth_address,
            ChainId::Starknet => identity.strk_address,
        };
        let balance = self.client_for(source).balance_of(&sender).await?;
        if balance < request.amount {
            return Err(FluidError::insufficient_balance(format!(
                "Balance {} below requested {}",
                balance, request.amount
            )));
        }

        validate_recipient(target, &request.recipient)
    }

    /// ERC-20 approval for the Starknet vault, waited to finality
    async fn run_approval(&self, id: &str, request: &BridgeRequest) -> FluidResult<()> {
        self.ledger.transition(id, BridgeStatus::Approving, |_| {})?;

        let (amount_low, amount_high) = split_u256(request.amount);
        let call = CallRequest {
            contract: self.config.strk_token_address.clone(),
            entrypoint: "approve".to_string(),
            calldata: vec![
                felt_decimal(&self.config.strk_vault_address)?,
                amount_low,
                amount_high,
            ],
            value: None,
        };

        let client = self.client_for(ChainId::Starknet);
        let handle = match client.submit(&call).await {
            Ok(handle) => handle,
            Err(e) => {
                let err = approval_error(e);
                self.fail(id, err.clone());
                return Err(err);
            }
        };

        self.ledger
            .update(id, |tx| tx.approve_tx_hash = Some(handle.hash.clone()));
        log_info!(
            "bridge",
            "Approval submitted",
            operation_id = id,
            tx_hash = handle.hash,
        );

        match client
            .wait_for_finality(&handle, self.config.approval_timeout)
            .await
        {
            Ok(receipt) if receipt.success => Ok(()),
            Ok(receipt) => {
                let reason = receipt
                    .revert_reason
                    .unwrap_or_else(|| "Approval reverted".to_string());
                let err = FluidError::approval_rejected(reason);
                self.fail(id, err.clone());
                Err(err)
            }
            Err(e) => {
                let err = approval_error(e);
                self.fail(id, err.clone());
                Err(err)
            }
        }
    }

    /// Submit the vault lock call; returns once the tx hash is known
    async fn run_lock(&self, id: &str, request: &BridgeRequest) -> FluidResult<TxHandle> {
        // Fresh pairing nonce every attempt, even on retry of the same
        // logical transfer
        let nonce = self.nonces.next();
        self.ledger
            .transition(id, BridgeStatus::Locking, |tx| tx.nonce = nonce)?;

        let source = request.direction.source();
        let call = self.lock_call(request, nonce)?;
        let client = self.client_for(source);

        match client.estimate_fee(&call).await {
            Ok(fee) => {
                log_debug!("bridge", "Lock fee estimated", operation_id = id, max_fee = fee.max_fee)
            }
            Err(e) => log_warn!("bridge", "Fee estimation failed", operation_id = id, reason = e),
        }

        let handle = match client.submit(&call).await {
            Ok(handle) => handle,
            Err(e) => {
                let err = lock_error(e);
                self.fail(id, err.clone());
                return Err(err);
            }
        };

        self.ledger.transition(id, BridgeStatus::AwaitingRelay, |tx| {
            tx.lock_tx_hash = Some(handle.hash.clone());
        })?;
        log_info!(
            "bridge",
            "Lock broadcast, awaiting relay",
            operation_id = id,
            tx_hash = handle.hash,
            nonce = nonce,
        );

        Ok(handle)
    }

    /// Build the per-chain lock invocation.
    ///
    /// Ethereum: `lockTokens(amount, nonce, targetChainId, recipient)`,
    /// payable with `value = amount`. Starknet:
    /// `lock_tokens(amount: u256, nonce, target_chain_id, recipient)`.
    fn lock_call(&self, request: &BridgeRequest, nonce: u128) -> FluidResult<CallRequest> {
        match request.direction.source() {
            ChainId::Ethereum => Ok(CallRequest {
                contract: self.config.eth_vault_address.clone(),
                entrypoint: "lockTokens".to_string(),
                calldata: vec![
                    request.amount.to_string(),
                    nonce.to_string(),
                    self.config.strk_chain_id.to_string(),
                    felt_decimal(&request.recipient)?,
                ],
                value: Some(request.amount),
            }),
            ChainId::Starknet => {
                let (amount_low, amount_high) = split_u256(request.amount);
                Ok(CallRequest {
                    contract: self.config.strk_vault_address.clone(),
                    entrypoint: "lock_tokens".to_string(),
                    calldata: vec![
                        amount_low,
                        amount_high,
                        nonce.to_string(),
                        self.config.eth_chain_id.to_string(),
                        felt_decimal(&request.recipient)?,
                    ],
                    value: None,
                })
            }
        }
    }

    fn fail(&self, id: &str, err: FluidError) {
        log_warn!(
            "bridge",
            "Bridge operation failed",
            operation_id = id,
            reason = err,
        );
        let _ = self.ledger.transition(id, BridgeStatus::Failed, |tx| {
            tx.error = Some(err);
        });
    }

    // -------------------------------------------------------------------------
    // Wiring helpers
    // -------------------------------------------------------------------------

    fn client_for(&self, chain: ChainId) -> &Arc<dyn ChainClient> {
        match chain {
            ChainId::Ethereum => &self.ethereum,
            ChainId::Starknet => &self.starknet,
        }
    }

    fn submission_mutex(&self, chain: ChainId) -> &AsyncMutex<()> {
        match chain {
            ChainId::Ethereum => &self.eth_submission,
            ChainId::Starknet => &self.strk_submission,
        }
    }

    fn vault_address(&self, chain: ChainId) -> &str {
        match chain {
            ChainId::Ethereum => &self.config.eth_vault_address,
            ChainId::Starknet => &self.config.strk_vault_address,
        }
    }
}

/// Drives one broadcast lock to Confirmed or Failed
async fn watch_finality(
    ledger: Arc<Ledger>,
    client: Arc<dyn ChainClient>,
    id: String,
    handle: TxHandle,
    timeout: Duration,
) {
    match client.wait_for_finality(&handle, timeout).await {
        Ok(receipt) if receipt.success => {
            let _ = ledger.transition(&id, BridgeStatus::Confirmed, |_| {});
            log_info!(
                "bridge",
                "Lock finalized",
                operation_id = id,
                tx_hash = receipt.tx_hash,
                block = receipt.block_number,
            );
        }
        Ok(receipt) => {
            let reason = receipt
                .revert_reason
                .unwrap_or_else(|| "Lock reverted".to_string());
            let err = classify_revert(&reason);
            log_warn!("bridge", "Lock reverted at finality", operation_id = id, reason = err);
            let _ = ledger.transition(&id, BridgeStatus::Failed, |tx| {
                tx.error = Some(err);
            });
        }
        Err(e) => {
            let err = relay_error(e);
            log_warn!("bridge", "Relay wait failed", operation_id = id, reason = err);
            let _ = ledger.transition(&id, BridgeStatus::Failed, |tx| {
                tx.error = Some(err);
            });
        }
    }
}

// =============================================================================
// Classification and encoding helpers
// =============================================================================

/// Vault liquidity view, named per each chain's ABI convention
fn liquidity_entrypoint(chain: ChainId) -> &'static str {
    match chain {
        ChainId::Ethereum => "getAvailableLiquidity",
        ChainId::Starknet => "get_available_liquidity",
    }
}

/// Recipient must be shaped for the TARGET chain. A 20-byte value bound
/// for Starknet (or a felt bound for Ethereum) is a cross-chain mix-up,
/// not a formatting nit.
///
/// The shapes: Ethereum is exactly 40 hex digits; Starknet is 41 to 64.
/// A felt whose minimal form is 40 digits or fewer is indistinguishable
/// from an Ethereum address here, so callers must zero-pad such
/// recipients to the full 64-digit form (wallets emit that form).
fn validate_recipient(target: ChainId, recipient: &str) -> FluidResult<()> {
    let mismatch = || {
        FluidError::cross_chain_mismatch(format!(
            "Recipient is not a valid {} address",
            target
        ))
    };

    let hex_part = recipient.strip_prefix("0x").ok_or_else(mismatch)?;
    if hex_part.is_empty() || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(mismatch());
    }

    match target {
        ChainId::Ethereum => {
            if hex_part.len() != 40 {
                return Err(mismatch());
            }
        }
        ChainId::Starknet => {
            // 40 hex digits is Ethereum-shaped; felts are written longer
            if hex_part.len() <= 40 || hex_part.len() > 64 {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

/// Hex address to the decimal string calldata form
fn felt_decimal(address: &str) -> FluidResult<String> {
    let hex_part = address.strip_prefix("0x").unwrap_or(address);
    let value = U256::from_str_radix(hex_part, 16)
        .map_err(|e| FluidError::parse_error(format!("Invalid address hex: {}", e)))?;
    Ok(value.to_string())
}

/// Split into (low, high) 128-bit decimal halves for Starknet u256 args
fn split_u256(value: U256) -> (String, String) {
    let mask = (U256::one() << 128) - U256::one();
    let low = value & mask;
    let high = value >> 128;
    (low.to_string(), high.to_string())
}

/// Map a lock revert string to the typed reason, keeping the text verbatim
fn classify_revert(reason: &str) -> FluidError {
    if reason.contains("InsufficientLiquidity") {
        FluidError::insufficient_liquidity(reason)
    } else if reason.contains("InsufficientBalance") {
        FluidError::insufficient_balance(reason)
    } else {
        FluidError::lock_rejected(reason)
    }
}

fn approval_error(e: FluidError) -> FluidError {
    match e.code {
        ErrorCode::Timeout => FluidError::approval_timeout(e.message),
        ErrorCode::NetworkError => e,
        _ => FluidError::approval_rejected(e.message),
    }
}

fn lock_error(e: FluidError) -> FluidError {
    match e.code {
        ErrorCode::Timeout => FluidError::relay_timeout(e.message),
        ErrorCode::NetworkError => e,
        _ => classify_revert(&e.message),
    }
}

fn relay_error(e: FluidError) -> FluidError {
    match e.code {
        ErrorCode::Timeout => FluidError::relay_timeout(e.message),
        _ => e,
    }
}
