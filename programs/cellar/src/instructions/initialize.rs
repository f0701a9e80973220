use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Initialize a new cellar for a given asset token
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Strategist authority - manages positions and rebalancing
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Registry this cellar validates trust against
    /// Security: Pinned into cellar state at initialization
    pub registry: Account<'info, Registry>,

    /// Price oracle used for valuation
    /// Security: Pinned into cellar state at initialization
    pub price_oracle: Account<'info, PriceOracle>,

    /// Cellar state PDA
    /// Security: Initialized with proper space and padding for upgrades
    #[account(
        init,
        payer = authority,
        space = CellarState::SPACE,
        seeds = [CELLAR_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub cellar_state: Account<'info, CellarState>,

    /// Accounting asset mint (the underlying token users deposit)
    pub asset_mint: Account<'info, Mint>,

    /// Share token mint PDA
    /// Security: Mint authority is the cellar authority PDA
    #[account(
        init,
        payer = authority,
        seeds = [SHARE_MINT_SEED, asset_mint.key().as_ref()],
        bump,
        mint::decimals = asset_mint.decimals,
        mint::authority = cellar_authority,
    )]
    pub share_mint: Account<'info, Mint>,

    /// Cellar authority PDA - mint authority for shares, owner of custody
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [CELLAR_AUTHORITY_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub cellar_authority: UncheckedAccount<'info>,

    /// Cellar's token account for holding the accounting asset
    #[account(
        init,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = cellar_authority,
    )]
    pub cellar_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, share_lock_period: i64) -> Result<()> {
    // CHECKS: share lock must sit inside the configured bounds
    require!(
        (MINIMUM_SHARE_LOCK_PERIOD..=MAXIMUM_SHARE_LOCK_PERIOD).contains(&share_lock_period),
        CellarError::ShareLockPeriodOutOfBounds
    );

    let cellar_state = &mut ctx.accounts.cellar_state;

    // EFFECTS: Initialize cellar state
    cellar_state.authority = ctx.accounts.authority.key();
    cellar_state.registry = ctx.accounts.registry.key();
    cellar_state.price_oracle = ctx.accounts.price_oracle.key();
    cellar_state.asset_mint = ctx.accounts.asset_mint.key();
    cellar_state.share_mint = ctx.accounts.share_mint.key();
    cellar_state.total_shares = 0;
    cellar_state.idle_assets = 0;
    cellar_state.holding_position = 0;
    cellar_state.share_lock_period = share_lock_period;
    cellar_state.adaptor_catalogue = Vec::new();
    cellar_state.position_catalogue = Vec::new();
    cellar_state.credit_positions = Vec::new();
    cellar_state.debt_positions = Vec::new();
    cellar_state.holdings = Vec::new();
    cellar_state.bump = ctx.bumps.cellar_state;
    cellar_state.share_bump = ctx.bumps.share_mint;
    cellar_state.authority_bump = ctx.bumps.cellar_authority;

    // INTERACTIONS: Emit event
    emit!(CellarInitialized {
        cellar: cellar_state.key(),
        authority: cellar_state.authority,
        asset_mint: cellar_state.asset_mint,
        share_mint: cellar_state.share_mint,
        share_lock_period,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
