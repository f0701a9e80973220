use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Shared accounts for strategist catalogue and position management
#[derive(Accounts)]
pub struct ManageCatalogue<'info> {
    /// Strategist authority
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

    /// Registry this cellar was initialized against
    /// Security: address constraint pins the stored registry
    #[account(address = cellar_state.registry @ CellarError::Unauthorized)]
    pub registry: Account<'info, Registry>,
}

pub fn add_adaptor_to_catalogue(ctx: Context<ManageCatalogue>, identifier: [u8; 32]) -> Result<()> {
    let cellar = &mut ctx.accounts.cellar_state;
    let registry = &ctx.accounts.registry;

    // Trust tier gates the catalogue tier
    require!(
        registry.is_adaptor_trusted(&identifier),
        CellarError::AdaptorNotTrusted
    );
    if cellar.is_adaptor_catalogued(&identifier) {
        return Ok(());
    }
    require!(
        cellar.adaptor_catalogue.len() < MAX_CATALOGUE_ADAPTORS,
        CellarError::CatalogueFull
    );
    cellar.adaptor_catalogue.push(identifier);

    emit!(AdaptorCatalogued {
        cellar: cellar.key(),
        identifier,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn add_position_to_catalogue(ctx: Context<ManageCatalogue>, position_id: u32) -> Result<()> {
    let cellar = &mut ctx.accounts.cellar_state;
    let registry = &ctx.accounts.registry;

    let position = registry
        .get_position(position_id)
        .ok_or(CellarError::PositionNotFound)?;
    require!(position.trusted, CellarError::PositionNotTrusted);

    if cellar.is_position_catalogued(position_id) {
        return Ok(());
    }
    require!(
        cellar.position_catalogue.len() < MAX_CATALOGUE_POSITIONS,
        CellarError::CatalogueFull
    );
    cellar.position_catalogue.push(position_id);

    emit!(PositionCatalogued {
        cellar: cellar.key(),
        position_id,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
