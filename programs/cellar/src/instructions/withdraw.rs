use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, ledger, state::*};

/// Withdraw assets from the cellar by burning shares
///
/// Security checklist:
/// - SIGNER VALIDATION: Owner must be signer (burn authority)
/// - SHARE LOCK: Rejected until the owner's lock window has passed
/// - MATH SAFETY: Burn rounds up against the caller
/// - BUSINESS LOGIC: Capped by maxWithdraw, pulls liquidity in withdraw order
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Share owner withdrawing assets
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Cellar state PDA
    #[account(
        mut,
        seeds = [CELLAR_SEED, cellar_state.asset_mint.as_ref()],
        bump = cellar_state.bump,
    )]
    pub cellar_state: Account<'info, CellarState>,

    /// Registry, pinned by the cellar
    #[account(address = cellar_state.registry @ CellarError::Unauthorized)]
    pub registry: Account<'info, Registry>,

    /// Price oracle, pinned by the cellar
    #[account(address = cellar_state.price_oracle @ CellarError::Unauthorized)]
    pub price_oracle: Account<'info, PriceOracle>,

    /// Per-depositor share lock state
    #[account(
        seeds = [DEPOSITOR_SEED, cellar_state.key().as_ref(), owner.key().as_ref()],
        bump = depositor_state.bump,
    )]
    pub depositor_state: Account<'info, DepositorState>,

    /// Share mint
    #[account(
        mut,
        address = cellar_state.share_mint,
    )]
    pub share_mint: Account<'info, Mint>,

    /// Cellar authority PDA
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [CELLAR_AUTHORITY_SEED, cellar_state.asset_mint.as_ref()],
        bump = cellar_state.authority_bump,
    )]
    pub cellar_authority: UncheckedAccount<'info>,

    /// Owner's share token account (burn source)
    #[account(
        mut,
        constraint = owner_share_account.mint == cellar_state.share_mint @ CellarError::InvalidMint,
        constraint = owner_share_account.owner == owner.key() @ CellarError::InvalidOwner,
    )]
    pub owner_share_account: Account<'info, TokenAccount>,

    /// Owner's asset token account (destination)
    #[account(
        mut,
        constraint = owner_asset_account.mint == cellar_state.asset_mint @ CellarError::InvalidMint,
        constraint = owner_asset_account.owner == owner.key() @ CellarError::InvalidOwner,
    )]
    pub owner_asset_account: Account<'info, TokenAccount>,

    /// Cellar's custody token account
    #[account(
        mut,
        constraint = cellar_token_account.mint == cellar_state.asset_mint @ CellarError::InvalidMint,
        constraint = cellar_token_account.owner == cellar_authority.key() @ CellarError::InvalidOwner,
    )]
    pub cellar_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    // CHECKS
    require!(amount > 0, CellarError::ZeroWithdrawAmount);

    let cellar_state = &mut ctx.accounts.cellar_state;
    let registry = &ctx.accounts.registry;
    let price_oracle = &ctx.accounts.price_oracle;
    let now = Clock::get()?.unix_timestamp;

    // Share lock, maxWithdraw cap, and round-up burn sizing
    let owner_shares = ctx.accounts.owner_share_account.amount;
    let shares_to_burn = ledger::prepare_withdraw(
        cellar_state,
        registry,
        price_oracle,
        now,
        ctx.accounts.depositor_state.share_unlock_time,
        owner_shares,
        amount,
    )?;

    // EFFECTS: pull liquidity idle-first, then credit positions in order
    ledger::pull_liquidity(cellar_state, registry, price_oracle, amount)?;
    cellar_state.total_shares = cellar_state
        .total_shares
        .checked_sub(shares_to_burn)
        .ok_or(CellarError::MathOverflow)?;
    let total_assets = ledger::total_assets(cellar_state, registry, price_oracle)?;

    // INTERACTIONS: burn shares, then pay out the accounting asset

    let burn_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.share_mint.to_account_info(),
            from: ctx.accounts.owner_share_account.to_account_info(),
            authority: ctx.accounts.owner.to_account_info(),
        },
    );
    token::burn(burn_ctx, shares_to_burn)?;

    let asset_mint_key = cellar_state.asset_mint;
    let authority_bump = cellar_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        CELLAR_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.cellar_token_account.to_account_info(),
            to: ctx.accounts.owner_asset_account.to_account_info(),
            authority: ctx.accounts.cellar_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(Withdrawn {
        cellar: cellar_state.key(),
        owner: ctx.accounts.owner.key(),
        asset_amount: amount,
        shares_burned: shares_to_burn,
        total_assets,
        total_shares: cellar_state.total_shares,
        timestamp: now,
    });

    Ok(())
}
