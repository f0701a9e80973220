use anchor_lang::prelude::*;

/// Event emitted when a new cellar is initialized
#[event]
pub struct CellarInitialized {
    pub cellar: Pubkey,
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub share_mint: Pubkey,
    pub share_lock_period: i64,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited
#[event]
pub struct Deposited {
    pub cellar: Pubkey,
    pub user: Pubkey,
    pub asset_amount: u64,
    pub shares_minted: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when assets are withdrawn
#[event]
pub struct Withdrawn {
    pub cellar: Pubkey,
    pub owner: Pubkey,
    pub asset_amount: u64,
    pub shares_burned: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when the registry trusts or re-trusts an adaptor
#[event]
pub struct AdaptorTrusted {
    pub registry: Pubkey,
    pub identifier: [u8; 32],
    pub timestamp: i64,
}

/// Event emitted when the registry distrusts an adaptor
#[event]
pub struct AdaptorDistrusted {
    pub registry: Pubkey,
    pub identifier: [u8; 32],
    pub timestamp: i64,
}

/// Event emitted when the registry trusts a position
#[event]
pub struct PositionTrusted {
    pub registry: Pubkey,
    pub position_id: u32,
    pub hash: [u8; 32],
    pub is_debt: bool,
    pub timestamp: i64,
}

/// Event emitted when the registry distrusts a position
#[event]
pub struct PositionDistrusted {
    pub registry: Pubkey,
    pub position_id: u32,
    pub timestamp: i64,
}

/// Event emitted when a cellar catalogues an adaptor
#[event]
pub struct AdaptorCatalogued {
    pub cellar: Pubkey,
    pub identifier: [u8; 32],
    pub timestamp: i64,
}

/// Event emitted when a cellar catalogues a position
#[event]
pub struct PositionCatalogued {
    pub cellar: Pubkey,
    pub position_id: u32,
    pub timestamp: i64,
}

/// Event emitted when a position joins the active list
#[event]
pub struct PositionAdded {
    pub cellar: Pubkey,
    pub position_id: u32,
    pub index: u32,
    pub is_debt: bool,
    pub timestamp: i64,
}

/// Event emitted when a position leaves the active list
#[event]
pub struct PositionRemoved {
    pub cellar: Pubkey,
    pub position_id: u32,
    pub is_debt: bool,
    pub timestamp: i64,
}

/// Event emitted when two active positions swap places in the withdraw order
#[event]
pub struct PositionsSwapped {
    pub cellar: Pubkey,
    pub index_1: u32,
    pub index_2: u32,
    pub is_debt: bool,
    pub timestamp: i64,
}

/// Event emitted when the user-deposit holding position changes
#[event]
pub struct HoldingPositionSet {
    pub cellar: Pubkey,
    pub position_id: u32,
    pub timestamp: i64,
}

/// Event emitted after a strategist batch commits
#[event]
pub struct AdaptorCalled {
    pub cellar: Pubkey,
    pub authority: Pubkey,
    pub groups: u32,
    pub total_assets: u64,
    pub timestamp: i64,
}

/// Event emitted when an oracle asset entry is set
#[event]
pub struct AssetConfigured {
    pub oracle: Pubkey,
    pub mint: Pubkey,
    pub price: u64,
    pub collateral_factor_bps: u16,
    pub timestamp: i64,
}
