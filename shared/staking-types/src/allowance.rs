use alloy_primitives::U256;

/// What we currently know about the staker's ERC20 allowance for the staking contract.
///
/// The value is observed from chain and may be stale; it is never the source of truth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllowanceState {
    amount: Option<U256>,
    loading: bool,
}

impl AllowanceState {
    /// Nothing read yet.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn loaded(amount: U256) -> Self {
        Self {
            amount: Some(amount),
            loading: false,
        }
    }

    /// Last successfully read allowance.
    pub fn amount(&self) -> Option<U256> {
        self.amount
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_known(&self) -> bool {
        self.amount.is_some()
    }

    /// Mark a read as in flight; the previous value stays visible.
    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    pub fn finish_refresh(&mut self, amount: U256) {
        self.amount = Some(amount);
        self.loading = false;
    }

    /// A read failed; keep whatever was known before.
    pub fn abort_refresh(&mut self) {
        self.loading = false;
    }

    /// A confirmed transfer pulled `amount` out of the allowance.
    pub fn spend(&mut self, amount: U256) {
        if let Some(known) = self.amount.as_mut() {
            *known = known.saturating_sub(amount);
        }
    }
}
