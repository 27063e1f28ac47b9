//! Display helpers for the modal summary.

use alloy_primitives::{Address, U256};
use staking_types::LockupPeriod;
use time::{macros::format_description, OffsetDateTime};

const WEI_PER_GTC: u128 = 1_000_000_000_000_000_000;
const WEI_PER_CENT: u128 = WEI_PER_GTC / 100;

/// GTC with at most two decimals, truncated, trailing zeros dropped.
pub fn format_amount(wei: U256) -> String {
    let whole = wei / U256::from(WEI_PER_GTC);
    let cents = (wei % U256::from(WEI_PER_GTC)) / U256::from(WEI_PER_CENT);
    if cents.is_zero() {
        return whole.to_string();
    }
    let cents = format!("{:02}", cents.to::<u64>());
    format!("{whole}.{}", cents.trim_end_matches('0'))
}

/// eg `Mar 5, 2025` (UTC).
pub fn format_date(date: OffsetDateTime) -> String {
    date.format(format_description!(
        "[month repr:short] [day padding:none], [year]"
    ))
    .unwrap_or_else(|_| "unknown".to_string())
}

pub fn display_duration(lockup: LockupPeriod) -> String {
    match lockup.whole_months() {
        Some(1) => "1 month".to_string(),
        Some(months) => format!("{months} months"),
        None => {
            let days = lockup.seconds() / 86_400;
            if days == 1 {
                "1 day".to_string()
            } else {
                format!("{days} days")
            }
        }
    }
}

/// Checksummed address, shortened in the middle to at most `max` characters.
pub fn display_address(address: Address, max: usize) -> String {
    let full = address.to_checksum(None);
    if full.len() <= max {
        return full;
    }
    let keep = max.saturating_sub(3);
    let tail = keep / 2;
    let head = keep - tail;
    format!("{}...{}", &full[..head], &full[full.len() - tail..])
}
