//! Health factor evaluation for leveraged sub-accounts
//!
//! Pure arithmetic over a sub-account's collateral and debt values, already
//! converted to the common unit. Zero debt and zero collateral are both valid
//! states and must never fail arithmetically.

use crate::constants::*;

/// Aggregated balances of one sub-account, in the common unit
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubAccountBalances {
    /// Collateral value after applying per-asset collateral factors
    pub risk_adjusted_collateral: u128,
    /// Face value of outstanding debt
    pub debt_value: u128,
}

impl SubAccountBalances {
    pub fn add_collateral(&mut self, value: u128, collateral_factor_bps: u16) {
        let weighted = value
            .saturating_mul(collateral_factor_bps as u128)
            .checked_div(MAX_BPS as u128)
            .unwrap_or(0);
        self.risk_adjusted_collateral = self.risk_adjusted_collateral.saturating_add(weighted);
    }

    pub fn add_debt(&mut self, value: u128) {
        self.debt_value = self.debt_value.saturating_add(value);
    }

    pub fn health_factor(&self) -> u64 {
        health_factor(self.risk_adjusted_collateral, self.debt_value)
    }
}

/// Ratio of risk-adjusted collateral to debt, `HEALTH_FACTOR_SCALE` fixed point
///
/// Zero debt returns the `u64::MAX` sentinel; zero collateral returns 0.
pub fn health_factor(risk_adjusted_collateral: u128, debt_value: u128) -> u64 {
    if debt_value == 0 {
        return u64::MAX;
    }
    if risk_adjusted_collateral == 0 {
        return 0;
    }
    let ratio = risk_adjusted_collateral
        .saturating_mul(HEALTH_FACTOR_SCALE as u128)
        / debt_value;
    u64::try_from(ratio).unwrap_or(u64::MAX)
}

/// Minimum post-operation health factor for a borrow
///
/// Same-asset leverage cannot suffer price-divergence liquidation, so it gets
/// the lower floor.
pub fn minimum_health_factor(self_leveraged: bool) -> u64 {
    if self_leveraged {
        SELF_LEVERAGE_MINIMUM_HEALTH_FACTOR
    } else {
        MINIMUM_HEALTH_FACTOR
    }
}
