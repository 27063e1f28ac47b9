//! ethers-backed chain client.
//!
//! Reads go through `eth_call`, writes through a local-key `SignerMiddleware`, and
//! confirmation polls `eth_getTransactionReceipt` until the transaction is mined.

use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{transaction::eip2718::TypedTransaction, TransactionRequest as EthRequest, H160, H256, U64},
};
use staking_types::{
    interfaces::{IIdentityStaking, IERC20},
    ChainError, ChainId, ChainReader, Receipt, ReceiptWaiter, StakeData, TransactionRequest,
    TxSubmitter,
};

pub struct EthersChain {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
    chain_id: ChainId,
    poll_interval: Duration,
}

impl EthersChain {
    pub fn connect(
        rpc_url: &str,
        private_key: &str,
        chain_id: ChainId,
        poll_interval: Duration,
    ) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("invalid RPC URL {rpc_url}"))?;
        let wallet = private_key
            .trim()
            .parse::<LocalWallet>()
            .context("invalid private key")?
            .with_chain_id(chain_id);
        Ok(Self {
            client: SignerMiddleware::new(provider, wallet),
            chain_id,
            poll_interval,
        })
    }

    /// The signing wallet.
    pub fn address(&self) -> Address {
        Address::from(self.client.address().0)
    }

    fn ensure_chain(&self, chain_id: ChainId) -> Result<(), ChainError> {
        if chain_id != self.chain_id {
            return Err(ChainError::Rpc(format!(
                "client is connected to chain {}, request targets chain {chain_id}",
                self.chain_id
            )));
        }
        Ok(())
    }

    async fn eth_call<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return, ChainError> {
        let tx: TypedTransaction = EthRequest::new()
            .to(H160::from(to.into_array()))
            .data(call.abi_encode())
            .into();
        let out = self.client.call(&tx, None).await.map_err(rpc_error)?;
        C::abi_decode_returns(&out, true).map_err(|e| ChainError::Decode(e.to_string()))
    }
}

fn rpc_error(err: impl std::fmt::Display) -> ChainError {
    ChainError::Rpc(err.to_string())
}

#[async_trait]
impl ChainReader for EthersChain {
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        chain_id: ChainId,
    ) -> Result<U256, ChainError> {
        self.ensure_chain(chain_id)?;
        let ret = self
            .eth_call(token, &IERC20::allowanceCall { owner, spender })
            .await?;
        Ok(ret._0)
    }

    async fn self_stake(
        &self,
        staking: Address,
        staker: Address,
        chain_id: ChainId,
    ) -> Result<Option<StakeData>, ChainError> {
        self.ensure_chain(chain_id)?;
        let ret = self
            .eth_call(staking, &IIdentityStaking::selfStakesCall { staker })
            .await?;
        Ok(StakeData::from_onchain(U256::from(ret.amount), ret.unlockTime))
    }
}

#[async_trait]
impl TxSubmitter for EthersChain {
    async fn submit(&self, request: &TransactionRequest) -> Result<TxHash, ChainError> {
        self.ensure_chain(request.chain_id())?;
        let tx = EthRequest::new()
            .to(H160::from(request.to().into_array()))
            .data(request.calldata().to_vec())
            .chain_id(request.chain_id());
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(rpc_error)?;
        Ok(TxHash::from(pending.tx_hash().0))
    }
}

#[async_trait]
impl ReceiptWaiter for EthersChain {
    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        chain_id: ChainId,
    ) -> Result<Receipt, ChainError> {
        self.ensure_chain(chain_id)?;
        let hash = H256::from(tx_hash.0);
        loop {
            let receipt = self
                .client
                .get_transaction_receipt(hash)
                .await
                .map_err(rpc_error)?;
            if let Some(receipt) = receipt {
                if let Some(block) = receipt.block_number {
                    return Ok(Receipt {
                        tx_hash,
                        block_number: block.as_u64(),
                        success: receipt.status == Some(U64::from(1u64)),
                    });
                }
            }
            tracing::trace!(%tx_hash, "receipt not available yet");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
