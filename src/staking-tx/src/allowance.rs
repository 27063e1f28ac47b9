use alloy_primitives::U256;
use staking_types::AllowanceState;

/// Whether an approval transaction has to precede the staking call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllowanceCheck {
    Sufficient,
    Insufficient,
}

/// Compare the last known allowance against the amount the staking call will pull.
///
/// A zero requirement is always covered. An allowance that was never read counts as zero.
pub fn check_allowance(state: &AllowanceState, required: U256) -> AllowanceCheck {
    if required.is_zero() {
        return AllowanceCheck::Sufficient;
    }
    match state.amount() {
        Some(allowance) if allowance >= required => AllowanceCheck::Sufficient,
        _ => AllowanceCheck::Insufficient,
    }
}
