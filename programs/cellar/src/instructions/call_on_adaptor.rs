use anchor_lang::prelude::*;

use crate::{adaptors::AdaptorCall, constants::*, errors::*, events::*, ledger, state::*};

/// Execute an ordered strategist batch of adaptor calls atomically
///
/// The batch runs against a staged copy of the balance sheet inside
/// `ledger::execute_adaptor_calls`; nothing is written back unless every call
/// and the final solvency valuation succeed. The enclosing transaction gives
/// the same all-or-nothing boundary for the token-program interactions.
#[derive(Accounts)]
pub struct CallOnAdaptor<'info> {
    /// Strategist authority - only they can rebalance
    /// Security: Must be signer and match cellar_state.authority
    pub authority: Signer<'info>,

    /// Cellar state PDA
    /// Security: has_one constraint validates authority from state
    #[account(
        mut,
        seeds = [CELLAR_SEED, cellar_state.asset_mint.as_ref()],
        bump = cellar_state.bump,
        has_one = authority @ CellarError::Unauthorized,
    )]
    pub cellar_state: Account<'info, CellarState>,

    /// Registry, pinned by the cellar
    #[account(address = cellar_state.registry @ CellarError::Unauthorized)]
    pub registry: Account<'info, Registry>,

    /// Price oracle, pinned by the cellar
    /// Security: prices are constant within the transaction, so the whole
    /// batch and its final valuation see one consistent view
    #[account(address = cellar_state.price_oracle @ CellarError::Unauthorized)]
    pub price_oracle: Account<'info, PriceOracle>,
}

pub fn handler(ctx: Context<CallOnAdaptor>, batch: Vec<AdaptorCall>) -> Result<()> {
    let cellar_state = &mut ctx.accounts.cellar_state;
    let registry = &ctx.accounts.registry;
    let price_oracle = &ctx.accounts.price_oracle;
    let now = Clock::get()?.unix_timestamp;

    let total_assets =
        ledger::execute_adaptor_calls(cellar_state, registry, price_oracle, now, &batch)?;

    emit!(AdaptorCalled {
        cellar: cellar_state.key(),
        authority: ctx.accounts.authority.key(),
        groups: batch.len() as u32,
        total_assets,
        timestamp: now,
    });

    Ok(())
}
