use alloy_primitives::U256;
use time::OffsetDateTime;

/// An existing self-stake as recorded by the staking contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakeData {
    pub amount: U256,
    pub unlock_time: OffsetDateTime,
}

impl StakeData {
    /// Build from the contract's `(unlockTime, amount)` pair.
    ///
    /// Returns `None` for an empty slot (zero amount) or an unrepresentable timestamp.
    pub fn from_onchain(amount: U256, unlock_time: u64) -> Option<Self> {
        if amount.is_zero() {
            return None;
        }
        let secs = i64::try_from(unlock_time).ok()?;
        let unlock_time = OffsetDateTime::from_unix_timestamp(secs).ok()?;
        Some(Self {
            amount,
            unlock_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_is_no_stake() {
        assert!(StakeData::from_onchain(U256::ZERO, 1_700_000_000).is_none());

        let stake = StakeData::from_onchain(U256::from(7u64), 1_700_000_000).unwrap();
        assert_eq!(stake.unlock_time.unix_timestamp(), 1_700_000_000);
    }
}
