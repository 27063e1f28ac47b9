//! Scripted in-memory chain for orchestrator tests.
//!
//! Records every submitted request. Failures, reverts, stalls and holds are keyed by
//! function name (`approve`, `selfStake`, ...).

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use staking_types::{
    ChainConfig, ChainError, ChainId, ChainReader, Receipt, ReceiptWaiter, StakeData,
    TransactionRequest, TxSubmitter,
};
use tokio::sync::Notify;

use crate::notify::{Notice, Notifier};

pub fn chain_config() -> ChainConfig {
    ChainConfig {
        id: 10,
        name: "OP Mainnet".into(),
        gtc_contract_addr: Address::repeat_byte(0x01),
        staking_contract_addr: Address::repeat_byte(0x02),
        explorer_url: "https://optimistic.etherscan.io".into(),
    }
}

pub fn staker() -> Address {
    Address::repeat_byte(0xaa)
}

#[derive(Default)]
pub struct ScriptedChain {
    allowance: Mutex<Option<U256>>,
    allowance_reads: AtomicUsize,
    submitted: Mutex<Vec<TransactionRequest>>,
    hashes: Mutex<HashMap<TxHash, &'static str>>,
    submit_failures: Mutex<HashMap<&'static str, ChainError>>,
    receipt_failures: Mutex<HashMap<&'static str, ChainError>>,
    reverts: Mutex<HashSet<&'static str>>,
    stalls: Mutex<HashSet<&'static str>>,
    holds: Mutex<HashMap<&'static str, Arc<Notify>>>,
}

impl ScriptedChain {
    /// `None` makes allowance reads fail.
    pub fn with_allowance(allowance: Option<U256>) -> Arc<Self> {
        let chain = Self::default();
        *chain.allowance.lock().unwrap() = allowance;
        Arc::new(chain)
    }

    pub fn fail_submit(&self, function: &'static str, err: ChainError) {
        self.submit_failures.lock().unwrap().insert(function, err);
    }

    pub fn fail_receipt(&self, function: &'static str, err: ChainError) {
        self.receipt_failures.lock().unwrap().insert(function, err);
    }

    pub fn revert(&self, function: &'static str) {
        self.reverts.lock().unwrap().insert(function);
    }

    /// Receipts for `function` never arrive.
    pub fn stall(&self, function: &'static str) {
        self.stalls.lock().unwrap().insert(function);
    }

    /// Receipts for `function` wait until the returned handle is notified.
    pub fn hold(&self, function: &'static str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.holds.lock().unwrap().insert(function, notify.clone());
        notify
    }

    /// Clears every scripted failure for `function`.
    pub fn heal(&self, function: &'static str) {
        self.submit_failures.lock().unwrap().remove(function);
        self.receipt_failures.lock().unwrap().remove(function);
        self.reverts.lock().unwrap().remove(function);
        self.stalls.lock().unwrap().remove(function);
    }

    pub fn submitted(&self) -> Vec<TransactionRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submitted_functions(&self) -> Vec<&'static str> {
        self.submitted()
            .iter()
            .map(TransactionRequest::function_name)
            .collect()
    }

    pub fn allowance_reads(&self) -> usize {
        self.allowance_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for ScriptedChain {
    async fn allowance(
        &self,
        _token: Address,
        _owner: Address,
        _spender: Address,
        _chain_id: ChainId,
    ) -> Result<U256, ChainError> {
        self.allowance_reads.fetch_add(1, Ordering::SeqCst);
        let allowance = *self.allowance.lock().unwrap();
        allowance.ok_or_else(|| ChainError::Rpc("allowance unavailable".into()))
    }

    async fn self_stake(
        &self,
        _staking: Address,
        _staker: Address,
        _chain_id: ChainId,
    ) -> Result<Option<StakeData>, ChainError> {
        Ok(None)
    }
}

#[async_trait]
impl TxSubmitter for ScriptedChain {
    async fn submit(&self, request: &TransactionRequest) -> Result<TxHash, ChainError> {
        let function = request.function_name();
        if let Some(err) = self.submit_failures.lock().unwrap().get(function) {
            return Err(err.clone());
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        let tx_hash = TxHash::with_last_byte(submitted.len() as u8);
        self.hashes.lock().unwrap().insert(tx_hash, function);
        Ok(tx_hash)
    }
}

#[async_trait]
impl ReceiptWaiter for ScriptedChain {
    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        _chain_id: ChainId,
    ) -> Result<Receipt, ChainError> {
        let function = self
            .hashes
            .lock()
            .unwrap()
            .get(&tx_hash)
            .copied()
            .ok_or_else(|| ChainError::Rpc(format!("unknown transaction {tx_hash}")))?;

        let hold = self.holds.lock().unwrap().get(function).cloned();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        let stalled = self.stalls.lock().unwrap().contains(function);
        if stalled {
            std::future::pending::<()>().await;
        }
        let failure = self.receipt_failures.lock().unwrap().get(function).cloned();
        if let Some(err) = failure {
            return Err(err);
        }
        Ok(Receipt {
            tx_hash,
            block_number: 100,
            success: !self.reverts.lock().unwrap().contains(function),
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
