use anchor_lang::prelude::*;

use super::catalogue::ManageCatalogue;
use crate::{constants::*, errors::*, events::*};

/// Insert a catalogued position into the active list at `index`
pub fn add_position(
    ctx: Context<ManageCatalogue>,
    index: u32,
    position_id: u32,
    is_debt: bool,
) -> Result<()> {
    let cellar = &mut ctx.accounts.cellar_state;
    let registry = &ctx.accounts.registry;

    // CHECKS: catalogue tier gates the active tier
    require!(
        cellar.is_position_catalogued(position_id),
        CellarError::PositionNotInCatalogue
    );
    let position = registry
        .get_position(position_id)
        .ok_or(CellarError::PositionNotFound)?;
    require!(position.trusted, CellarError::PositionNotTrusted);
    // Registry is the source of truth for the debt classification
    require!(position.is_debt == is_debt, CellarError::DebtMismatch);
    require!(
        !cellar.is_position_active(position_id),
        CellarError::PositionAlreadyActive
    );

    let (list, capacity) = if is_debt {
        (&mut cellar.debt_positions, MAX_DEBT_POSITIONS)
    } else {
        (&mut cellar.credit_positions, MAX_CREDIT_POSITIONS)
    };
    require!(list.len() < capacity, CellarError::PositionArrayFull);
    require!(
        (index as usize) <= list.len(),
        CellarError::PositionIndexOutOfBounds
    );

    // EFFECTS
    list.insert(index as usize, position_id);

    emit!(PositionAdded {
        cellar: cellar.key(),
        position_id,
        index,
        is_debt,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

/// Remove an active position; its balance must already be zero
pub fn remove_position(ctx: Context<ManageCatalogue>, index: u32, is_debt: bool) -> Result<()> {
    let cellar = &mut ctx.accounts.cellar_state;

    let list = if is_debt {
        &cellar.debt_positions
    } else {
        &cellar.credit_positions
    };
    let position_id = *list
        .get(index as usize)
        .ok_or(CellarError::PositionIndexOutOfBounds)?;

    // Forced unwinding is explicit; removal never silently drops value
    require!(
        cellar.holding_units(position_id) == 0,
        CellarError::PositionNotEmpty
    );
    if cellar.holding_position == position_id {
        cellar.holding_position = 0;
    }

    let list = if is_debt {
        &mut cellar.debt_positions
    } else {
        &mut cellar.credit_positions
    };
    list.remove(index as usize);
    cellar.holdings.retain(|h| h.position_id != position_id);

    emit!(PositionRemoved {
        cellar: cellar.key(),
        position_id,
        is_debt,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

/// Swap two entries of an active list to reorder withdraw pulls
pub fn swap_positions(
    ctx: Context<ManageCatalogue>,
    index_1: u32,
    index_2: u32,
    is_debt: bool,
) -> Result<()> {
    let cellar = &mut ctx.accounts.cellar_state;

    let list = if is_debt {
        &mut cellar.debt_positions
    } else {
        &mut cellar.credit_positions
    };
    require!(
        (index_1 as usize) < list.len() && (index_2 as usize) < list.len(),
        CellarError::PositionIndexOutOfBounds
    );
    list.swap(index_1 as usize, index_2 as usize);

    emit!(PositionsSwapped {
        cellar: cellar.key(),
        index_1,
        index_2,
        is_debt,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

/// Route future user deposits into an active credit position (0 = idle)
pub fn set_holding_position(ctx: Context<ManageCatalogue>, position_id: u32) -> Result<()> {
    let cellar = &mut ctx.accounts.cellar_state;
    let registry = &ctx.accounts.registry;

    if position_id != 0 {
        let position = registry
            .get_position(position_id)
            .ok_or(CellarError::PositionNotFound)?;
        // Structural refusal: user assets can never be routed into debt
        position.adaptor.assert_user_deposits_allowed()?;
        require!(
            cellar.credit_positions.contains(&position_id),
            CellarError::PositionNotActive
        );
    }
    cellar.holding_position = position_id;

    emit!(HoldingPositionSet {
        cellar: cellar.key(),
        position_id,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
