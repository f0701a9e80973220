use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, ledger, state::*};

/// Deposit assets into the cellar and receive shares
///
/// Security checklist:
/// - SIGNER VALIDATION: User must be signer
/// - ACCOUNT OWNERSHIP: Cellar state PDA validated with seeds
/// - MATH SAFETY: Checked share math, round-down mint
/// - TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// - BUSINESS LOGIC: Checks-effects-interactions pattern, share lock window
/// - EVENTS: Emits Deposited event
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User depositing assets
    #[account(mut)]
    pub user: Signer<'info>,

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
        init_if_needed,
        payer = user,
        space = DepositorState::SPACE,
        seeds = [DEPOSITOR_SEED, cellar_state.key().as_ref(), user.key().as_ref()],
        bump
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

    /// User's asset token account (source)
    #[account(
        mut,
        constraint = user_asset_account.mint == cellar_state.asset_mint @ CellarError::InvalidMint,
        constraint = user_asset_account.owner == user.key() @ CellarError::InvalidOwner,
    )]
    pub user_asset_account: Account<'info, TokenAccount>,

    /// User's share token account (destination)
    #[account(
        mut,
        constraint = user_share_account.mint == cellar_state.share_mint @ CellarError::InvalidMint,
        constraint = user_share_account.owner == user.key() @ CellarError::InvalidOwner,
    )]
    pub user_share_account: Account<'info, TokenAccount>,

    /// Cellar's custody token account
    #[account(
        mut,
        constraint = cellar_token_account.mint == cellar_state.asset_mint @ CellarError::InvalidMint,
        constraint = cellar_token_account.owner == cellar_authority.key() @ CellarError::InvalidOwner,
    )]
    pub cellar_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    // CHECKS: Validate amount
    require!(amount > 0, CellarError::ZeroDepositAmount);

    let cellar_state = &mut ctx.accounts.cellar_state;
    let registry = &ctx.accounts.registry;
    let price_oracle = &ctx.accounts.price_oracle;
    let now = Clock::get()?.unix_timestamp;

    // Valuation precedes the state change so the depositor prices in at the
    // pre-deposit share price
    let shares_to_mint = ledger::prepare_deposit(cellar_state, registry, price_oracle, amount)?;

    // EFFECTS: Update cellar state BEFORE external calls
    ledger::route_deposit(cellar_state, registry, price_oracle, amount)?;
    cellar_state.total_shares = cellar_state
        .total_shares
        .checked_add(shares_to_mint)
        .ok_or(CellarError::MathOverflow)?;

    // Fresh deposits restart the receiver's lock window
    let depositor = &mut ctx.accounts.depositor_state;
    depositor.owner = ctx.accounts.user.key();
    depositor.cellar = cellar_state.key();
    depositor.share_unlock_time = now
        .checked_add(cellar_state.share_lock_period)
        .ok_or(CellarError::MathOverflow)?;
    depositor.bump = ctx.bumps.depositor_state;

    // Post-state valuation; holding-position routing may floor away dust, so
    // the pre-state total plus the deposit would over-report
    let total_assets = ledger::total_assets(cellar_state, registry, price_oracle)?;

    // INTERACTIONS: External calls after state updates

    // Transfer assets from user to cellar custody
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_asset_account.to_account_info(),
            to: ctx.accounts.cellar_token_account.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    // Mint shares to user
    let asset_mint_key = cellar_state.asset_mint;
    let authority_bump = cellar_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        CELLAR_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let mint_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        MintTo {
            mint: ctx.accounts.share_mint.to_account_info(),
            to: ctx.accounts.user_share_account.to_account_info(),
            authority: ctx.accounts.cellar_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, shares_to_mint)?;

    emit!(Deposited {
        cellar: cellar_state.key(),
        user: ctx.accounts.user.key(),
        asset_amount: amount,
        shares_minted: shares_to_mint,
        total_assets,
        total_shares: cellar_state.total_shares,
        timestamp: now,
    });

    Ok(())
}
