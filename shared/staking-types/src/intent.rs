use alloy_primitives::{aliases::U88, Address, U256};
use thiserror::Error;

use crate::{chain::ChainConfig, interfaces::IIdentityStaking, request::TransactionRequest};

/// Lockup months are counted as 30 days.
pub const SECONDS_PER_MONTH: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("stake amount {0} does not fit in uint88")]
    AmountOutOfRange(U256),
}

/// Duration after which staked funds become withdrawable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LockupPeriod {
    seconds: u64,
}

impl LockupPeriod {
    pub fn from_months(months: u64) -> Self {
        Self {
            seconds: months.saturating_mul(SECONDS_PER_MONTH),
        }
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self { seconds }
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Whole months, if the period is a multiple of 30 days.
    pub fn whole_months(&self) -> Option<u64> {
        (self.seconds % SECONDS_PER_MONTH == 0).then_some(self.seconds / SECONDS_PER_MONTH)
    }
}

/// A single user request to stake on themselves.
///
/// A zero amount means "extend the lockup of the existing stake only".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeIntent {
    pub staker: Address,
    pub amount: U256,
    pub lockup: LockupPeriod,
}

impl StakeIntent {
    pub fn new(staker: Address, amount: U256, lockup: LockupPeriod) -> Self {
        Self {
            staker,
            amount,
            lockup,
        }
    }

    pub fn is_extension_only(&self) -> bool {
        self.amount.is_zero()
    }

    /// Amount the staking contract must be allowed to pull.
    pub fn required_approval(&self) -> U256 {
        self.amount
    }

    /// `selfStake(amount, duration)`, or `extendSelfStake(duration)` for a zero amount.
    pub fn target_call(&self, chain: &ChainConfig) -> Result<TransactionRequest, IntentError> {
        let duration = self.lockup.seconds();
        let to = chain.staking_contract_addr;

        if self.is_extension_only() {
            let call = IIdentityStaking::extendSelfStakeCall { duration };
            return Ok(TransactionRequest::new(to, chain.id, &call));
        }

        let amount = U88::checked_from_uint(self.amount)
            .ok_or(IntentError::AmountOutOfRange(self.amount))?;
        let call = IIdentityStaking::selfStakeCall { amount, duration };
        Ok(TransactionRequest::new(to, chain.id, &call))
    }
}
