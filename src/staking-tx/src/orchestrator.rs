//! Approve-then-stake sequencing.
//!
//! One attempt is: read allowance (if never read), compare, optionally submit
//! `approve(staking, required)` and wait for it to confirm, then write the
//! staking call. Every step is awaited in order; nothing runs concurrently and
//! nothing is retried automatically.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use alloy_primitives::{Address, TxHash, U256};
use staking_types::{
    interfaces::IERC20, AllowanceState, ChainClient, ChainConfig, ChainError, Receipt,
    TransactionRequest,
};

use crate::{
    allowance::{check_allowance, AllowanceCheck},
    error::StakeTxError,
    handler::{wait_confirmed, InFlight, StakeTxHandler},
    notify::{Notice, Notifier},
};

const APPROVAL_TITLE: &str = "Spending approval";
const STAKE_TITLE: &str = "Stake";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Upper bound for each receipt wait. `None` waits as long as the client does.
    pub receipt_timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            receipt_timeout: Some(Duration::from_secs(600)),
        }
    }
}

/// Result of a completed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Execution {
    /// Approval submitted (and confirmed) during this attempt, if one was needed.
    pub approval: Option<TxHash>,
    pub receipt: Receipt,
}

pub struct ApprovalGatedExecutor<C> {
    chain: Arc<C>,
    config: ChainConfig,
    owner: Address,
    notifier: Arc<dyn Notifier>,
    settings: ExecutorConfig,
    allowance: Mutex<AllowanceState>,
    approving: AtomicBool,
    attempt: AtomicBool,
    stake: StakeTxHandler<C>,
}

impl<C: ChainClient> ApprovalGatedExecutor<C> {
    pub fn new(
        chain: Arc<C>,
        config: ChainConfig,
        owner: Address,
        notifier: Arc<dyn Notifier>,
        settings: ExecutorConfig,
    ) -> Self {
        let stake = StakeTxHandler::new(
            chain.clone(),
            config.clone(),
            notifier.clone(),
            STAKE_TITLE,
            settings.receipt_timeout,
        );
        Self {
            chain,
            config,
            owner,
            notifier,
            settings,
            allowance: Mutex::new(AllowanceState::unknown()),
            approving: AtomicBool::new(false),
            attempt: AtomicBool::new(false),
            stake,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn chain_config(&self) -> &ChainConfig {
        &self.config
    }

    /// Snapshot of the last observed allowance.
    pub fn allowance(&self) -> AllowanceState {
        *self.allowance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allowance read, approval or staking call in flight.
    pub fn is_loading(&self) -> bool {
        self.allowance().is_loading()
            || self.approving.load(Ordering::SeqCst)
            || self.stake.is_loading()
    }

    /// The last staking call reached a successful receipt.
    pub fn is_confirmed(&self) -> bool {
        self.stake.is_confirmed()
    }

    /// Re-read the owner's allowance for the staking contract.
    pub async fn refresh_allowance(&self) -> Result<U256, ChainError> {
        self.update_allowance(AllowanceState::begin_refresh);
        let result = self
            .chain
            .allowance(
                self.config.gtc_contract_addr,
                self.owner,
                self.config.staking_contract_addr,
                self.config.id,
            )
            .await;
        match &result {
            Ok(amount) => {
                let amount = *amount;
                tracing::debug!(%amount, owner = %self.owner, "allowance refreshed");
                self.update_allowance(|state| state.finish_refresh(amount));
            }
            Err(err) => {
                tracing::warn!(error = %err, owner = %self.owner, "allowance read failed");
                self.update_allowance(AllowanceState::abort_refresh);
            }
        }
        result
    }

    /// Run one attempt: approve `required_approval` if the allowance does not cover it, then
    /// write `target`.
    ///
    /// Returns [`StakeTxError::Busy`] without touching the chain while another attempt runs.
    pub async fn execute(
        &self,
        required_approval: U256,
        target: TransactionRequest,
    ) -> Result<Execution, StakeTxError> {
        let _attempt = InFlight::try_enter(&self.attempt).ok_or(StakeTxError::Busy)?;

        // A failed read leaves the allowance unknown, which routes through approval.
        if !required_approval.is_zero() && !self.allowance().is_known() {
            let _ = self.refresh_allowance().await;
        }

        let approval = match check_allowance(&self.allowance(), required_approval) {
            AllowanceCheck::Sufficient => {
                tracing::debug!(required = %required_approval, "allowance sufficient");
                None
            }
            AllowanceCheck::Insufficient => Some(self.approve(required_approval).await?),
        };

        let receipt = self.stake.write_contract(&target).await?;

        if !required_approval.is_zero() {
            // The stake pulled the tokens out of the allowance.
            self.update_allowance(|state| state.spend(required_approval));
            let _ = self.refresh_allowance().await;
        }

        Ok(Execution { approval, receipt })
    }

    async fn approve(&self, amount: U256) -> Result<TxHash, StakeTxError> {
        let _approving = InFlight::enter(&self.approving);

        let call = IERC20::approveCall {
            spender: self.config.staking_contract_addr,
            amount,
        };
        let request = TransactionRequest::new(self.config.gtc_contract_addr, self.config.id, &call);

        let tx_hash = match self.chain.submit(&request).await {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                tracing::warn!(%amount, error = %err, "approval submission failed");
                self.notifier.notify(Notice::tx_error(APPROVAL_TITLE, &err));
                return Err(StakeTxError::ApprovalSubmission(err));
            }
        };
        tracing::info!(%amount, %tx_hash, "approval submitted");

        match wait_confirmed(
            &*self.chain,
            tx_hash,
            self.config.id,
            self.settings.receipt_timeout,
        )
        .await
        {
            Ok(receipt) => {
                tracing::info!(%tx_hash, block = receipt.block_number, "approval confirmed");
                // Lets a retry skip straight to the staking call if that call fails.
                self.update_allowance(|state| state.finish_refresh(amount));
                Ok(tx_hash)
            }
            Err(err) => {
                tracing::warn!(%tx_hash, error = %err, "approval not confirmed");
                self.notifier.notify(Notice::receipt_error(
                    APPROVAL_TITLE,
                    tx_hash,
                    &err,
                    &self.config,
                ));
                Err(StakeTxError::ApprovalConfirmation {
                    tx_hash,
                    source: err,
                })
            }
        }
    }

    fn update_allowance(&self, f: impl FnOnce(&mut AllowanceState)) {
        let mut state = self.allowance.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *state);
    }
}
