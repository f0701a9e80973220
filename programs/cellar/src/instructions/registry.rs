use anchor_lang::prelude::*;

use crate::{adaptors::AdaptorKind, constants::*, errors::*, events::*, state::*};

/// Initialize the global position registry
#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    /// Registry admin - can trust and distrust entries
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Registry PDA
    /// Security: init-once; one registry per program deployment
    #[account(
        init,
        payer = admin,
        space = Registry::SPACE,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Account<'info, Registry>,

    pub system_program: Program<'info, System>,
}

/// Shared accounts for registry trust management
#[derive(Accounts)]
pub struct ManageRegistry<'info> {
    /// Registry admin
    /// Security: Must be signer and match registry.admin
    pub admin: Signer<'info>,

    /// Registry PDA
    /// Security: has_one constraint validates admin from state
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        has_one = admin @ CellarError::Unauthorized,
    )]
    pub registry: Account<'info, Registry>,
}

pub fn initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    registry.admin = ctx.accounts.admin.key();
    registry.adaptors = Vec::new();
    registry.positions = Vec::new();
    // Ids start at 1; 0 is the absent sentinel for hash lookups
    registry.next_position_id = 1;
    registry.bump = ctx.bumps.registry;
    Ok(())
}

pub fn trust_adaptor(ctx: Context<ManageRegistry>, kind: AdaptorKind) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    registry.trust_adaptor(kind)?;

    emit!(AdaptorTrusted {
        registry: registry.key(),
        identifier: kind.identifier(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn trust_position(
    ctx: Context<ManageRegistry>,
    kind: AdaptorKind,
    is_debt: bool,
    config: Vec<u8>,
) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    let position_id = registry.trust_position(kind, is_debt, config)?;
    let hash = registry
        .get_position(position_id)
        .ok_or(CellarError::PositionNotFound)?
        .hash;

    emit!(PositionTrusted {
        registry: registry.key(),
        position_id,
        hash,
        is_debt,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn distrust_adaptor(ctx: Context<ManageRegistry>, identifier: [u8; 32]) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    registry.distrust_adaptor(&identifier)?;

    emit!(AdaptorDistrusted {
        registry: registry.key(),
        identifier,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn distrust_position(ctx: Context<ManageRegistry>, position_id: u32) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    registry.distrust_position(position_id)?;

    emit!(PositionDistrusted {
        registry: registry.key(),
        position_id,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
