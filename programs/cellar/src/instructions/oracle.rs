use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Initialize the global price oracle
#[derive(Accounts)]
pub struct InitializeOracle<'info> {
    /// Oracle admin - can set asset prices and risk weights
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Oracle PDA
    #[account(
        init,
        payer = admin,
        space = PriceOracle::SPACE,
        seeds = [ORACLE_SEED],
        bump
    )]
    pub price_oracle: Account<'info, PriceOracle>,

    pub system_program: Program<'info, System>,
}

/// Shared accounts for oracle administration
#[derive(Accounts)]
pub struct ManageOracle<'info> {
    /// Oracle admin
    /// Security: Must be signer and match price_oracle.admin
    pub admin: Signer<'info>,

    /// Oracle PDA
    #[account(
        mut,
        seeds = [ORACLE_SEED],
        bump = price_oracle.bump,
        has_one = admin @ CellarError::Unauthorized,
    )]
    pub price_oracle: Account<'info, PriceOracle>,
}

pub fn initialize_oracle(ctx: Context<InitializeOracle>) -> Result<()> {
    let oracle = &mut ctx.accounts.price_oracle;
    oracle.admin = ctx.accounts.admin.key();
    oracle.assets = Vec::new();
    oracle.bump = ctx.bumps.price_oracle;
    Ok(())
}

pub fn set_asset_config(ctx: Context<ManageOracle>, config: AssetConfig) -> Result<()> {
    let oracle = &mut ctx.accounts.price_oracle;
    oracle.set_asset(config)?;

    emit!(AssetConfigured {
        oracle: oracle.key(),
        mint: config.mint,
        price: config.price,
        collateral_factor_bps: config.collateral_factor_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
