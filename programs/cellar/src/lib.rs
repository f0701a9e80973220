// Cellar - multi-strategy asset-management vault ledger on Solana
// Security: Follows Solana security best practices with comprehensive validation
// Architecture: Registry trust -> per-cellar catalogue -> active positions,
// with tagged-variant adaptor dispatch and staged atomic rebalancing

use anchor_lang::prelude::*;

pub mod adaptors;
pub mod constants;
pub mod errors;
pub mod events;
pub mod health;
pub mod instructions;
pub mod ledger;
pub mod state;

use adaptors::{AdaptorCall, AdaptorKind};
use instructions::*;
use state::AssetConfig;

declare_id!("RWYHydygqpxp1w9NGTgQPeHaPZ3at42pjZCn2f9thCx");

#[program]
pub mod cellar {
    use super::*;

    /// Initialize the global position registry
    ///
    /// Security considerations:
    /// - Admin is the signer and stored in state
    /// - Single PDA with init-once semantics
    pub fn initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
        instructions::registry::initialize_registry(ctx)
    }

    /// Idempotently mark an adaptor eligible for use
    ///
    /// Security considerations:
    /// - Registry-admin only (has_one constraint)
    /// - First tier of the allow-list
    pub fn trust_adaptor(ctx: Context<ManageRegistry>, kind: AdaptorKind) -> Result<()> {
        instructions::registry::trust_adaptor(ctx, kind)
    }

    /// Trust a (adaptor, config) pair, allocating a position id
    ///
    /// Security considerations:
    /// - Registry-admin only
    /// - Requires the adaptor to be trusted first
    /// - Content-addressed dedup: re-trusting returns the existing id
    pub fn trust_position(
        ctx: Context<ManageRegistry>,
        kind: AdaptorKind,
        is_debt: bool,
        config: Vec<u8>,
    ) -> Result<()> {
        instructions::registry::trust_position(ctx, kind, is_debt, config)
    }

    /// Revoke an adaptor's trust flag
    ///
    /// Blocks new catalogue additions; existing holdings are untouched.
    /// Forced unwinding is a separate strategist operation.
    pub fn distrust_adaptor(ctx: Context<ManageRegistry>, identifier: [u8; 32]) -> Result<()> {
        instructions::registry::distrust_adaptor(ctx, identifier)
    }

    /// Revoke a position's trust flag
    pub fn distrust_position(ctx: Context<ManageRegistry>, position_id: u32) -> Result<()> {
        instructions::registry::distrust_position(ctx, position_id)
    }

    /// Initialize the global price oracle
    pub fn initialize_oracle(ctx: Context<InitializeOracle>) -> Result<()> {
        instructions::oracle::initialize_oracle(ctx)
    }

    /// Set or update an oracle asset entry (price, decimals, risk weight)
    ///
    /// Security considerations:
    /// - Oracle-admin only (has_one constraint)
    pub fn set_asset_config(ctx: Context<ManageOracle>, config: AssetConfig) -> Result<()> {
        instructions::oracle::set_asset_config(ctx, config)
    }

    /// Initialize a new cellar for a given asset token
    ///
    /// Security considerations:
    /// - Validates authority is signer
    /// - Pins the registry and oracle accounts into state
    /// - Creates share mint with cellar authority PDA as mint authority
    /// - Bounds-checks the share lock period
    pub fn initialize(ctx: Context<Initialize>, share_lock_period: i64) -> Result<()> {
        instructions::initialize::handler(ctx, share_lock_period)
    }

    /// Opt an adaptor into this cellar's catalogue
    ///
    /// Security considerations:
    /// - Strategist only (has_one constraint)
    /// - Requires registry trust (second tier of the allow-list)
    pub fn add_adaptor_to_catalogue(
        ctx: Context<ManageCatalogue>,
        identifier: [u8; 32],
    ) -> Result<()> {
        instructions::catalogue::add_adaptor_to_catalogue(ctx, identifier)
    }

    /// Opt a position into this cellar's catalogue
    pub fn add_position_to_catalogue(ctx: Context<ManageCatalogue>, position_id: u32) -> Result<()> {
        instructions::catalogue::add_position_to_catalogue(ctx, position_id)
    }

    /// Insert a catalogued position into the active list at `index`
    ///
    /// Security considerations:
    /// - Strategist only
    /// - Cross-checks the registry's debt flag against the caller's
    /// - Third tier of the allow-list
    pub fn add_position(
        ctx: Context<ManageCatalogue>,
        index: u32,
        position_id: u32,
        is_debt: bool,
    ) -> Result<()> {
        instructions::positions::add_position(ctx, index, position_id, is_debt)
    }

    /// Remove an active position; fails while it still has a balance
    pub fn remove_position(ctx: Context<ManageCatalogue>, index: u32, is_debt: bool) -> Result<()> {
        instructions::positions::remove_position(ctx, index, is_debt)
    }

    /// Swap two active positions to reorder user-withdraw pulls
    pub fn swap_positions(
        ctx: Context<ManageCatalogue>,
        index_1: u32,
        index_2: u32,
        is_debt: bool,
    ) -> Result<()> {
        instructions::positions::swap_positions(ctx, index_1, index_2, is_debt)
    }

    /// Route future user deposits into an active credit position (0 = idle)
    ///
    /// Security considerations:
    /// - Structural refusal when the target is a debt position
    pub fn set_holding_position(ctx: Context<ManageCatalogue>, position_id: u32) -> Result<()> {
        instructions::positions::set_holding_position(ctx, position_id)
    }

    /// Deposit assets into the cellar and receive shares
    ///
    /// Security considerations:
    /// - Validates user token accounts (mint, owner)
    /// - Shares round down; zero-share mints rejected
    /// - Starts the per-receiver share lock window
    /// - Follows checks-effects-interactions pattern
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraw assets by burning shares
    ///
    /// Security considerations:
    /// - Rejected while the owner's shares are locked
    /// - Capped by maxWithdraw (share value vs. liquid value)
    /// - Shares to burn round up against the caller
    /// - Pulls idle first, then credit positions in withdraw order
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Execute an ordered strategist batch of adaptor calls atomically
    ///
    /// Security considerations:
    /// - Strategist only (has_one constraint)
    /// - Every target adaptor must be catalogued and trusted
    /// - Runs against a staged balance sheet; commits only on full success
    /// - Leverage-increasing calls re-check the sub-account health factor
    /// - Final solvency valuation gates the commit
    pub fn call_on_adaptor(ctx: Context<CallOnAdaptor>, batch: Vec<AdaptorCall>) -> Result<()> {
        instructions::call_on_adaptor::handler(ctx, batch)
    }
}
