//! Chain configuration and the capabilities the orchestrator consumes.
//!
//! Reading, submitting and receipt polling are provided by a blockchain client
//! (see `staking-cli`'s ethers-backed implementation); the orchestrator only
//! sequences them.

use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{request::TransactionRequest, stake::StakeData};

pub type ChainId = u64;

/// Per-chain contract addresses and explorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub id: ChainId,
    pub name: String,
    /// GTC token (the ERC20 being staked).
    pub gtc_contract_addr: Address,
    /// Identity Staking contract (the spender).
    pub staking_contract_addr: Address,
    /// Block explorer base URL, eg `https://optimistic.etherscan.io`.
    pub explorer_url: String,
}

impl ChainConfig {
    /// Explorer link for a transaction.
    pub fn tx_link(&self, tx_hash: &TxHash) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

/// Mined transaction outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// `status == 1`.
    pub success: bool,
}

/// Failures reported by the chain client.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("no receipt after {0:?}")]
    Timeout(Duration),

    #[error("malformed return data: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// ERC20 `allowance(owner, spender)` on `token`.
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        chain_id: ChainId,
    ) -> Result<U256, ChainError>;

    /// Current self-stake of `staker`, `None` when there is none.
    async fn self_stake(
        &self,
        staking: Address,
        staker: Address,
        chain_id: ChainId,
    ) -> Result<Option<StakeData>, ChainError>;
}

#[async_trait]
pub trait TxSubmitter: Send + Sync {
    /// Sign and broadcast; resolves once the node accepted the transaction.
    async fn submit(&self, request: &TransactionRequest) -> Result<TxHash, ChainError>;
}

#[async_trait]
pub trait ReceiptWaiter: Send + Sync {
    /// Resolve once `tx_hash` is mined. A reverted transaction still yields a receipt.
    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        chain_id: ChainId,
    ) -> Result<Receipt, ChainError>;
}

/// Everything the orchestrator needs from a chain client.
pub trait ChainClient: ChainReader + TxSubmitter + ReceiptWaiter {}

impl<T: ChainReader + TxSubmitter + ReceiptWaiter> ChainClient for T {}
