//! "Stake on yourself" and "Update self stake".

use std::sync::{Mutex, PoisonError};

use alloy_primitives::{utils::parse_ether, U256};
use async_trait::async_trait;
use staking_types::{ChainClient, LockupPeriod, StakeData, StakeIntent, TransactionRequest};
use time::OffsetDateTime;

use crate::{
    error::StakeTxError,
    format::{display_address, display_duration, format_amount, format_date},
    modal::{ConfirmAction, DataLine, ModalContent, StakeModal},
    orchestrator::{ApprovalGatedExecutor, Execution},
};

const ADDRESS_DISPLAY_MAX: usize = 20;
const GTC_DECIMALS: usize = 18;

/// Parse a user-entered GTC amount (18 decimals).
///
/// More fractional digits than the token has are rejected rather than truncated.
pub fn parse_gtc(input: &str) -> Result<U256, StakeTxError> {
    let trimmed = input.trim();
    let too_precise = trimmed
        .split_once('.')
        .is_some_and(|(_, fraction)| fraction.len() > GTC_DECIMALS);
    if trimmed.is_empty() || trimmed.starts_with(['-', '+']) || too_precise {
        return Err(StakeTxError::InvalidAmount(input.to_string()));
    }
    parse_ether(trimmed).map_err(|_| StakeTxError::InvalidAmount(input.to_string()))
}

/// A self-stake request bound to an executor.
pub struct SelfStakeTx<C> {
    executor: ApprovalGatedExecutor<C>,
    intent: StakeIntent,
    target: TransactionRequest,
    last: Mutex<Option<Execution>>,
}

impl<C: ChainClient> SelfStakeTx<C> {
    /// Zero `input_value` extends the lockup of the current stake without adding funds.
    pub fn new(
        executor: ApprovalGatedExecutor<C>,
        input_value: &str,
        locked_period_months: u64,
    ) -> Result<Self, StakeTxError> {
        let amount = parse_gtc(input_value)?;
        let intent = StakeIntent::new(
            executor.owner(),
            amount,
            LockupPeriod::from_months(locked_period_months),
        );
        let target = intent.target_call(executor.chain_config())?;
        Ok(Self {
            executor,
            intent,
            target,
            last: Mutex::new(None),
        })
    }

    pub fn intent(&self) -> &StakeIntent {
        &self.intent
    }

    /// The staking-contract call this will write.
    pub fn target(&self) -> &TransactionRequest {
        &self.target
    }

    pub fn executor(&self) -> &ApprovalGatedExecutor<C> {
        &self.executor
    }

    pub fn last_execution(&self) -> Option<Execution> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn stake(&self) -> Result<Execution, StakeTxError> {
        let execution = self
            .executor
            .execute(self.intent.required_approval(), self.target.clone())
            .await?;
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(execution);
        Ok(execution)
    }
}

#[async_trait]
impl<C: ChainClient> ConfirmAction for SelfStakeTx<C> {
    async fn confirm(&self) -> Result<(), StakeTxError> {
        self.stake().await.map(|_| ())
    }

    fn is_loading(&self) -> bool {
        self.executor.is_loading()
    }
}

pub type SelfStakeModal<C> = StakeModal<SelfStakeTx<C>>;

impl<C: ChainClient> StakeModal<SelfStakeTx<C>> {
    /// Build the dialog for staking `input_value` GTC for `locked_period_months`.
    ///
    /// With `stake_to_update` the dialog shows before/after amounts and unlock dates,
    /// with `now` as the start of the new lockup.
    pub fn self_stake(
        executor: ApprovalGatedExecutor<C>,
        input_value: &str,
        locked_period_months: u64,
        stake_to_update: Option<&StakeData>,
        now: OffsetDateTime,
    ) -> Result<Self, StakeTxError> {
        let tx = SelfStakeTx::new(executor, input_value, locked_period_months)?;
        let content = self_stake_content(
            tx.intent(),
            input_value.trim(),
            locked_period_months,
            stake_to_update,
            now,
        );
        Ok(Self::new(content, tx))
    }
}

fn self_stake_content(
    intent: &StakeIntent,
    input_value: &str,
    locked_period_months: u64,
    stake_to_update: Option<&StakeData>,
    now: OffsetDateTime,
) -> ModalContent {
    let address = display_address(intent.staker, ADDRESS_DISPLAY_MAX);

    let Some(current) = stake_to_update else {
        return ModalContent {
            title: "Stake on yourself".to_string(),
            button_text: "Stake".to_string(),
            lines: vec![
                DataLine::new("Address", address),
                DataLine::new("Amount", format!("{input_value} GTC")),
                DataLine::new("Lockup", format!("{locked_period_months} months")),
            ],
        };
    };

    let total = intent.amount.saturating_add(current.amount);
    let lockup = time::Duration::seconds(i64::try_from(intent.lockup.seconds()).unwrap_or(i64::MAX));
    let new_unlock = now.checked_add(lockup);

    ModalContent {
        title: "Update self stake".to_string(),
        button_text: "Update stake".to_string(),
        lines: vec![
            DataLine::new("Address", address),
            DataLine::new("Old amount", format!("{} GTC", format_amount(current.amount))),
            DataLine::emphasized("New amount", format!("+{input_value} GTC")),
            DataLine::emphasized("Total", format!("{} GTC", format_amount(total))),
            DataLine::new("Old unlock date", format_date(current.unlock_time)),
            DataLine::emphasized("New lockup period", display_duration(intent.lockup)),
            DataLine::new(
                "New unlock date",
                new_unlock.map_or_else(|| "unknown".to_string(), format_date),
            ),
        ],
    }
}
