//! Vault ledger core: staged adaptor-call execution and valuation
//!
//! Adaptor calls never touch `CellarState` directly. A batch runs against a
//! staged copy of the balance sheet and commits only after every call and the
//! final solvency check succeed, so a failure at step k leaves the cellar
//! exactly as it was before step 1.

use anchor_lang::prelude::*;

use crate::{
    adaptors::{position_hash, AdaptorCall, AdaptorKind, PositionTerms, StrategistCall},
    constants::*,
    errors::CellarError,
    health::{self, SubAccountBalances},
    state::{CellarState, Holding, PriceOracle, Registry},
};

/// Staged copy of a cellar's balance sheet
struct StagedLedger {
    idle_assets: u64,
    holdings: Vec<Holding>,
}

impl StagedLedger {
    fn new(cellar: &CellarState) -> Self {
        Self {
            idle_assets: cellar.idle_assets,
            holdings: cellar.holdings.clone(),
        }
    }

    fn debit_idle(&mut self, amount: u64) -> Result<()> {
        self.idle_assets = self
            .idle_assets
            .checked_sub(amount)
            .ok_or(CellarError::InsufficientVaultBalance)?;
        Ok(())
    }

    fn credit_idle(&mut self, amount: u64) -> Result<()> {
        self.idle_assets = self
            .idle_assets
            .checked_add(amount)
            .ok_or(CellarError::MathOverflow)?;
        Ok(())
    }
}

/// Add `amount` units to a position's holding, creating the entry on demand
fn credit_units(holdings: &mut Vec<Holding>, position_id: u32, amount: u64) -> Result<()> {
    if let Some(entry) = holdings.iter_mut().find(|h| h.position_id == position_id) {
        entry.units = entry
            .units
            .checked_add(amount)
            .ok_or(CellarError::MathOverflow)?;
        return Ok(());
    }
    holdings.push(Holding {
        position_id,
        units: amount,
    });
    Ok(())
}

/// Remove `amount` units, failing with `err` when the balance is short
fn debit_units(
    holdings: &mut [Holding],
    position_id: u32,
    amount: u64,
    err: CellarError,
) -> Result<()> {
    let entry = holdings.iter_mut().find(|h| h.position_id == position_id);
    match entry.and_then(|h| {
        h.units = h.units.checked_sub(amount)?;
        Some(())
    }) {
        Some(()) => Ok(()),
        None => Err(err.into()),
    }
}

/// Aggregate valuation in the accounting asset: idle + credit − debt
///
/// Errors with `VaultInsolvent` when debt value exceeds credit value.
fn valuation(
    idle_assets: u64,
    holdings: &[Holding],
    registry: &Registry,
    oracle: &PriceOracle,
    accounting: &Pubkey,
) -> Result<u64> {
    let mut credit = idle_assets as u128;
    let mut debt = 0u128;
    for holding in holdings.iter().filter(|h| h.units > 0) {
        let position = registry
            .get_position(holding.position_id)
            .ok_or(CellarError::PositionNotFound)?;
        let terms = position.adaptor.decode_config(&position.config)?;
        let value = oracle.get_value(&terms.asset, holding.units, accounting)? as u128;
        if position.is_debt {
            debt = debt.saturating_add(value);
        } else {
            credit = credit.saturating_add(value);
        }
    }
    let net = credit
        .checked_sub(debt)
        .ok_or(CellarError::VaultInsolvent)?;
    u64::try_from(net).map_err(|_| error!(CellarError::MathOverflow))
}

/// Current total assets of the cellar, in the accounting asset
pub fn total_assets(
    cellar: &CellarState,
    registry: &Registry,
    oracle: &PriceOracle,
) -> Result<u64> {
    valuation(
        cellar.idle_assets,
        &cellar.holdings,
        registry,
        oracle,
        &cellar.asset_mint,
    )
}

/// Value immediately liquid for user withdrawals: idle plus the withdrawable
/// part of each credit position, in withdraw order
pub fn total_withdrawable(
    cellar: &CellarState,
    registry: &Registry,
    oracle: &PriceOracle,
) -> Result<u64> {
    let mut liquid = cellar.idle_assets as u128;
    for &id in &cellar.credit_positions {
        let position = registry
            .get_position(id)
            .ok_or(CellarError::PositionNotFound)?;
        let units = position
            .adaptor
            .withdrawable_from(cellar.holding_units(id));
        if units == 0 {
            continue;
        }
        let terms = position.adaptor.decode_config(&position.config)?;
        let value = oracle.get_value(&terms.asset, units, &cellar.asset_mint)?;
        liquid = liquid.saturating_add(value as u128);
    }
    u64::try_from(liquid).map_err(|_| error!(CellarError::MathOverflow))
}

/// Size the share mint for a deposit, rejecting amounts too small to mint
pub fn prepare_deposit(
    cellar: &CellarState,
    registry: &Registry,
    oracle: &PriceOracle,
    amount: u64,
) -> Result<u64> {
    let total = total_assets(cellar, registry, oracle)?;
    let shares = cellar.convert_to_shares(amount, total)?;
    require!(shares > 0, CellarError::ZeroShares);
    Ok(shares)
}

/// Validate a withdrawal request and size the share burn
///
/// Rejects while the owner's shares are locked, caps the request at
/// maxWithdraw = min(share value, liquid value), and rounds the burn up
/// against the caller.
pub fn prepare_withdraw(
    cellar: &CellarState,
    registry: &Registry,
    oracle: &PriceOracle,
    now: i64,
    share_unlock_time: i64,
    owner_shares: u64,
    amount: u64,
) -> Result<u64> {
    require!(now >= share_unlock_time, CellarError::SharesLocked);

    let total = total_assets(cellar, registry, oracle)?;
    let share_value = cellar.convert_to_assets(owner_shares, total)?;
    let liquid = total_withdrawable(cellar, registry, oracle)?;
    require!(
        amount <= share_value.min(liquid),
        CellarError::WithdrawExceedsMax
    );

    let shares_to_burn = cellar.shares_for_withdraw(amount, total)?;
    require!(
        shares_to_burn <= owner_shares,
        CellarError::InsufficientShares
    );
    Ok(shares_to_burn)
}

/// Route a user deposit into idle reserves or the configured holding position
pub fn route_deposit(
    cellar: &mut CellarState,
    registry: &Registry,
    oracle: &PriceOracle,
    amount: u64,
) -> Result<()> {
    if cellar.holding_position == 0 {
        cellar.idle_assets = cellar
            .idle_assets
            .checked_add(amount)
            .ok_or(CellarError::MathOverflow)?;
        return Ok(());
    }

    let position = registry
        .get_position(cellar.holding_position)
        .ok_or(CellarError::PositionNotFound)?;
    position.adaptor.assert_user_deposits_allowed()?;
    require!(
        cellar.credit_positions.contains(&cellar.holding_position),
        CellarError::PositionNotActive
    );
    let terms = position.adaptor.decode_config(&position.config)?;
    let units = oracle.get_value(&cellar.asset_mint, amount, &terms.asset)?;
    credit_units(&mut cellar.holdings, cellar.holding_position, units)
}

/// Pull `assets` of liquidity for a withdrawal: idle first, then credit
/// positions in the strategist-configured order
pub fn pull_liquidity(
    cellar: &mut CellarState,
    registry: &Registry,
    oracle: &PriceOracle,
    assets: u64,
) -> Result<()> {
    let mut remaining = assets;

    let from_idle = remaining.min(cellar.idle_assets);
    cellar.idle_assets -= from_idle;
    remaining -= from_idle;

    let order = cellar.credit_positions.clone();
    for id in order {
        if remaining == 0 {
            break;
        }
        let position = registry
            .get_position(id)
            .ok_or(CellarError::PositionNotFound)?;
        position.adaptor.assert_user_withdraws_allowed()?;
        let liquid_units = position.adaptor.withdrawable_from(cellar.holding_units(id));
        if liquid_units == 0 {
            continue;
        }
        let terms = position.adaptor.decode_config(&position.config)?;
        let liquid_value = oracle.get_value(&terms.asset, liquid_units, &cellar.asset_mint)?;

        if liquid_value <= remaining {
            debit_units(
                &mut cellar.holdings,
                id,
                liquid_units,
                CellarError::LiquidityExhausted,
            )?;
            remaining -= liquid_value;
        } else {
            // Round units up so the pulled value covers the remainder
            let units_needed = oracle
                .get_value_ceil(&cellar.asset_mint, remaining, &terms.asset)?
                .min(liquid_units);
            debit_units(
                &mut cellar.holdings,
                id,
                units_needed,
                CellarError::LiquidityExhausted,
            )?;
            remaining = 0;
        }
    }

    require!(remaining == 0, CellarError::LiquidityExhausted);
    cellar.holdings.retain(|h| h.units > 0);
    Ok(())
}

/// Execute a strategist batch atomically and return the post-batch valuation
pub fn execute_adaptor_calls(
    cellar: &mut CellarState,
    registry: &Registry,
    oracle: &PriceOracle,
    now: i64,
    batch: &[AdaptorCall],
) -> Result<u64> {
    let mut staged = StagedLedger::new(cellar);

    for group in batch {
        require!(
            cellar.is_adaptor_catalogued(&group.adaptor_id),
            CellarError::AdaptorNotInCatalogue
        );
        require!(
            registry.is_adaptor_trusted(&group.adaptor_id),
            CellarError::AdaptorNotTrusted
        );
        let kind = AdaptorKind::from_identifier(&group.adaptor_id)
            .ok_or(CellarError::AdaptorNotTrusted)?;
        for call in &group.calls {
            dispatch(&mut staged, cellar, registry, oracle, kind, call, now)?;
        }
    }

    // Global solvency re-check before anything is committed
    let total = valuation(
        staged.idle_assets,
        &staged.holdings,
        registry,
        oracle,
        &cellar.asset_mint,
    )?;

    staged.holdings.retain(|h| h.units > 0);
    cellar.idle_assets = staged.idle_assets;
    cellar.holdings = staged.holdings;
    Ok(total)
}

/// Re-derive the position hash from the caller-supplied config and require the
/// resulting id to be active in the cellar
///
/// This is the tracked-position gate: a strategist cannot open a position the
/// registry and active lists do not know about.
fn resolve_tracked(
    cellar: &CellarState,
    registry: &Registry,
    kind: AdaptorKind,
    is_debt: bool,
    config: &[u8],
) -> Result<(u32, PositionTerms)> {
    let terms = kind.decode_config(config)?;
    let hash = position_hash(kind, is_debt, config);
    let id = registry.position_id_of_hash(&hash);
    let active = id != 0
        && if is_debt {
            cellar.debt_positions.contains(&id)
        } else {
            cellar.credit_positions.contains(&id)
        };
    if !active {
        return Err(if is_debt {
            error!(CellarError::DebtPositionsMustBeTracked)
        } else {
            error!(CellarError::PositionNotTracked)
        });
    }
    Ok((id, terms))
}

fn require_credit_kind(kind: AdaptorKind) -> Result<()> {
    require!(!kind.is_debt(), CellarError::AdaptorCallNotSupported);
    Ok(())
}

fn require_debt_kind(kind: AdaptorKind) -> Result<()> {
    require!(kind.is_debt(), CellarError::AdaptorCallNotSupported);
    Ok(())
}

fn dispatch(
    staged: &mut StagedLedger,
    cellar: &CellarState,
    registry: &Registry,
    oracle: &PriceOracle,
    kind: AdaptorKind,
    call: &StrategistCall,
    now: i64,
) -> Result<()> {
    match call {
        StrategistCall::Lend { config, amount } => {
            require_credit_kind(kind)?;
            let (id, terms) = resolve_tracked(cellar, registry, kind, false, config)?;
            let cost = oracle.get_value_ceil(&terms.asset, *amount, &cellar.asset_mint)?;
            staged.debit_idle(cost)?;
            credit_units(&mut staged.holdings, id, *amount)
        }
        StrategistCall::Redeem { config, amount } => {
            require_credit_kind(kind)?;
            let (id, terms) = resolve_tracked(cellar, registry, kind, false, config)?;
            debit_units(
                &mut staged.holdings,
                id,
                *amount,
                CellarError::InsufficientVaultBalance,
            )?;
            let proceeds = oracle.get_value(&terms.asset, *amount, &cellar.asset_mint)?;
            staged.credit_idle(proceeds)
        }
        StrategistCall::Borrow { config, amount } => {
            require_debt_kind(kind)?;
            let (id, terms) = resolve_tracked(cellar, registry, kind, true, config)?;
            let proceeds = oracle.get_value(&terms.asset, *amount, &cellar.asset_mint)?;
            credit_units(&mut staged.holdings, id, *amount)?;
            staged.credit_idle(proceeds)?;
            check_health(staged, registry, oracle, cellar, terms.sub_account, false)
        }
        StrategistCall::Repay { config, amount } => {
            require_debt_kind(kind)?;
            let (id, terms) = resolve_tracked(cellar, registry, kind, true, config)?;
            let cost = oracle.get_value_ceil(&terms.asset, *amount, &cellar.asset_mint)?;
            staged.debit_idle(cost)?;
            debit_units(
                &mut staged.holdings,
                id,
                *amount,
                CellarError::RepayExceedsDebt,
            )
        }
        StrategistCall::LeverUp { config, amount } => {
            require_debt_kind(kind)?;
            let (debt_id, terms) = resolve_tracked(cellar, registry, kind, true, config)?;
            let collateral_id = paired_collateral(cellar, registry, &terms)?;
            credit_units(&mut staged.holdings, debt_id, *amount)?;
            credit_units(&mut staged.holdings, collateral_id, *amount)?;
            check_health(staged, registry, oracle, cellar, terms.sub_account, true)
        }
        StrategistCall::LeverDown { config, amount } => {
            require_debt_kind(kind)?;
            let (debt_id, terms) = resolve_tracked(cellar, registry, kind, true, config)?;
            let collateral_id = paired_collateral(cellar, registry, &terms)?;
            debit_units(
                &mut staged.holdings,
                debt_id,
                *amount,
                CellarError::RepayExceedsDebt,
            )?;
            debit_units(
                &mut staged.holdings,
                collateral_id,
                *amount,
                CellarError::InsufficientVaultBalance,
            )
        }
        StrategistCall::Swap {
            exchange,
            from_config,
            to_config,
            amount,
            min_out,
            deadline,
        } => {
            require_credit_kind(kind)?;
            require!(now <= *deadline, CellarError::SwapDeadlineExceeded);
            let (from_id, from_terms) = resolve_tracked(cellar, registry, kind, false, from_config)?;
            let (to_id, to_terms) = resolve_tracked(cellar, registry, kind, false, to_config)?;
            debit_units(
                &mut staged.holdings,
                from_id,
                *amount,
                CellarError::InsufficientVaultBalance,
            )?;
            let quote = oracle.get_value(&from_terms.asset, *amount, &to_terms.asset)?;
            let fee = (quote as u128)
                .saturating_mul(exchange.fee_bps() as u128)
                / MAX_BPS as u128;
            let out = quote.saturating_sub(fee as u64);
            require!(out >= *min_out, CellarError::SlippageExceeded);
            credit_units(&mut staged.holdings, to_id, out)
        }
    }
}

/// Tracked credit position holding the same asset in the same sub-account,
/// required as the collateral leg of a leveraged pair
fn paired_collateral(
    cellar: &CellarState,
    registry: &Registry,
    debt_terms: &PositionTerms,
) -> Result<u32> {
    for &id in &cellar.credit_positions {
        let position = registry
            .get_position(id)
            .ok_or(CellarError::PositionNotFound)?;
        if position.is_debt {
            continue;
        }
        let terms = position.adaptor.decode_config(&position.config)?;
        if terms.asset == debt_terms.asset && terms.sub_account == debt_terms.sub_account {
            return Ok(id);
        }
    }
    Err(error!(CellarError::PositionNotTracked))
}

/// Evaluate the staged health factor of one sub-account and require it at or
/// above the applicable minimum
fn check_health(
    staged: &StagedLedger,
    registry: &Registry,
    oracle: &PriceOracle,
    cellar: &CellarState,
    sub_account: u8,
    self_leveraged: bool,
) -> Result<()> {
    let mut balances = SubAccountBalances::default();
    for holding in staged.holdings.iter().filter(|h| h.units > 0) {
        let position = registry
            .get_position(holding.position_id)
            .ok_or(CellarError::PositionNotFound)?;
        let terms = position.adaptor.decode_config(&position.config)?;
        if terms.sub_account != sub_account {
            continue;
        }
        let value = oracle.get_value(&terms.asset, holding.units, &cellar.asset_mint)? as u128;
        if position.is_debt {
            balances.add_debt(value);
        } else {
            let asset = oracle.asset_config(&terms.asset)?;
            balances.add_collateral(value, asset.collateral_factor_bps);
        }
    }
    require!(
        balances.health_factor() >= health::minimum_health_factor(self_leveraged),
        CellarError::HealthFactorTooLow
    );
    Ok(())
}
