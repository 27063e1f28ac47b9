//! Submission and confirmation of the staking call.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use alloy_primitives::TxHash;
use staking_types::{
    ChainConfig, ChainError, ChainId, Receipt, ReceiptWaiter, TransactionRequest, TxSubmitter,
};

use crate::{
    error::StakeTxError,
    notify::{Notice, Notifier},
};

/// Sets a flag for as long as it is alive, so a dropped future never leaves it stuck.
pub(crate) struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    pub(crate) fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }

    /// `None` if the flag is already set.
    pub(crate) fn try_enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Wait for `tx_hash` to be mined successfully.
///
/// Reverted receipts are errors. `timeout` bounds the whole wait.
pub(crate) async fn wait_confirmed<W: ReceiptWaiter + ?Sized>(
    waiter: &W,
    tx_hash: TxHash,
    chain_id: ChainId,
    timeout: Option<Duration>,
) -> Result<Receipt, ChainError> {
    let receipt = match timeout {
        Some(limit) => tokio::time::timeout(limit, waiter.wait_for_receipt(tx_hash, chain_id))
            .await
            .map_err(|_| ChainError::Timeout(limit))??,
        None => waiter.wait_for_receipt(tx_hash, chain_id).await?,
    };
    if !receipt.success {
        return Err(ChainError::Reverted(tx_hash));
    }
    Ok(receipt)
}

/// Writes a staking-contract call and tracks it until confirmation.
pub struct StakeTxHandler<C> {
    chain: Arc<C>,
    config: ChainConfig,
    notifier: Arc<dyn Notifier>,
    title: String,
    receipt_timeout: Option<Duration>,
    loading: AtomicBool,
    confirmed: AtomicBool,
}

impl<C: TxSubmitter + ReceiptWaiter> StakeTxHandler<C> {
    pub fn new(
        chain: Arc<C>,
        config: ChainConfig,
        notifier: Arc<dyn Notifier>,
        title: impl Into<String>,
        receipt_timeout: Option<Duration>,
    ) -> Self {
        Self {
            chain,
            config,
            notifier,
            title: title.into(),
            receipt_timeout,
            loading: AtomicBool::new(false),
            confirmed: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// The last written call reached a successful receipt.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed.load(Ordering::SeqCst)
    }

    pub async fn write_contract(
        &self,
        request: &TransactionRequest,
    ) -> Result<Receipt, StakeTxError> {
        let _loading = InFlight::enter(&self.loading);
        self.confirmed.store(false, Ordering::SeqCst);

        let tx_hash = match self.chain.submit(request).await {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                tracing::warn!(function = request.function_name(), error = %err, "stake submission failed");
                self.notifier.notify(Notice::tx_error(&self.title, &err));
                return Err(StakeTxError::StakeSubmission(err));
            }
        };
        tracing::info!(function = request.function_name(), %tx_hash, "stake submitted");

        match wait_confirmed(&*self.chain, tx_hash, request.chain_id(), self.receipt_timeout).await
        {
            Ok(receipt) => {
                self.confirmed.store(true, Ordering::SeqCst);
                tracing::info!(%tx_hash, block = receipt.block_number, "stake confirmed");
                self.notifier
                    .notify(Notice::confirmed(&self.title, tx_hash, &self.config));
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(%tx_hash, error = %err, "stake not confirmed");
                self.notifier.notify(Notice::receipt_error(
                    &self.title,
                    tx_hash,
                    &err,
                    &self.config,
                ));
                Err(StakeTxError::StakeConfirmation {
                    tx_hash,
                    source: err,
                })
            }
        }
    }
}
