use anchor_lang::prelude::*;

use crate::{
    adaptors::{position_hash, AdaptorKind},
    constants::*,
    errors::CellarError,
};

/// Global position registry
///
/// First tier of the allow-list: an adaptor or position must be trusted here
/// before any cellar may catalogue it. Positions are content-addressed by
/// `position_hash` and deduplicated on trust; ids are monotonically allocated
/// aliases and never reused.
#[account]
pub struct Registry {
    /// Admin allowed to trust and distrust entries
    pub admin: Pubkey,

    /// Trusted adaptor set
    pub adaptors: Vec<TrustedAdaptor>,

    /// Trusted position set, indexed by content hash
    pub positions: Vec<PositionData>,

    /// Next position id to allocate; ids start at 1, 0 is the absent sentinel
    pub next_position_id: u32,

    /// Bump seed for the registry PDA
    pub bump: u8,
}

/// One trusted adaptor entry
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct TrustedAdaptor {
    pub kind: AdaptorKind,
    pub identifier: [u8; 32],
    pub trusted: bool,
}

/// One trusted position entry
///
/// Immutable after creation except for the `trusted` revocation flag.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct PositionData {
    pub id: u32,
    pub adaptor: AdaptorKind,
    pub is_debt: bool,
    pub trusted: bool,
    pub hash: [u8; 32],
    pub config: Vec<u8>,
}

impl Registry {
    /// 8 (discriminator) + 32 (admin) + adaptors vec + positions vec +
    /// 4 (counter) + 1 (bump) + 64 (padding)
    pub const SPACE: usize = 8
        + 32
        + 4
        + MAX_TRUSTED_ADAPTORS * (1 + 32 + 1)
        + 4
        + MAX_TRUSTED_POSITIONS * (4 + 1 + 1 + 1 + 32 + 4 + MAX_CONFIG_LEN)
        + 4
        + 1
        + 64;

    pub fn is_adaptor_trusted(&self, identifier: &[u8; 32]) -> bool {
        self.adaptors
            .iter()
            .any(|a| &a.identifier == identifier && a.trusted)
    }

    /// Idempotently mark an adaptor eligible for use
    pub fn trust_adaptor(&mut self, kind: AdaptorKind) -> Result<()> {
        let identifier = kind.identifier();
        if let Some(entry) = self
            .adaptors
            .iter_mut()
            .find(|a| a.identifier == identifier)
        {
            entry.trusted = true;
            return Ok(());
        }
        require!(
            self.adaptors.len() < MAX_TRUSTED_ADAPTORS,
            CellarError::RegistryFull
        );
        self.adaptors.push(TrustedAdaptor {
            kind,
            identifier,
            trusted: true,
        });
        Ok(())
    }

    pub fn distrust_adaptor(&mut self, identifier: &[u8; 32]) -> Result<()> {
        let entry = self
            .adaptors
            .iter_mut()
            .find(|a| &a.identifier == identifier)
            .ok_or(CellarError::AdaptorNotTrusted)?;
        entry.trusted = false;
        Ok(())
    }

    /// Pure content-addressed lookup; 0 means absent
    pub fn position_id_of_hash(&self, hash: &[u8; 32]) -> u32 {
        self.positions
            .iter()
            .find(|p| &p.hash == hash)
            .map(|p| p.id)
            .unwrap_or(0)
    }

    pub fn get_position(&self, id: u32) -> Option<&PositionData> {
        self.positions.iter().find(|p| p.id == id)
    }

    /// Trust a (adaptor, config) pair, allocating a position id
    ///
    /// Idempotent: trusting the same tuple twice returns the existing id
    /// rather than allocating a duplicate.
    pub fn trust_position(
        &mut self,
        kind: AdaptorKind,
        is_debt: bool,
        config: Vec<u8>,
    ) -> Result<u32> {
        require!(
            self.is_adaptor_trusted(&kind.identifier()),
            CellarError::AdaptorNotTrusted
        );
        require!(is_debt == kind.is_debt(), CellarError::DebtMismatch);
        require!(
            config.len() <= MAX_CONFIG_LEN,
            CellarError::InvalidPositionConfig
        );
        kind.decode_config(&config)?;

        let hash = position_hash(kind, is_debt, &config);
        let existing = self.position_id_of_hash(&hash);
        if existing != 0 {
            // Re-trusting restores a previously revoked position
            if let Some(entry) = self.positions.iter_mut().find(|p| p.id == existing) {
                entry.trusted = true;
            }
            return Ok(existing);
        }

        require!(
            self.positions.len() < MAX_TRUSTED_POSITIONS,
            CellarError::RegistryFull
        );
        let id = self.next_position_id;
        self.next_position_id = self
            .next_position_id
            .checked_add(1)
            .ok_or(CellarError::MathOverflow)?;
        self.positions.push(PositionData {
            id,
            adaptor: kind,
            is_debt,
            trusted: true,
            hash,
            config,
        });
        Ok(id)
    }

    pub fn distrust_position(&mut self, id: u32) -> Result<()> {
        let entry = self
            .positions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CellarError::PositionNotFound)?;
        entry.trusted = false;
        Ok(())
    }
}

/// Per-cellar ledger state
///
/// Security considerations:
/// - Authority (strategist) stored in state, not instruction args
/// - Balance sheet split into idle reserves and per-position holdings
/// - Active lists only ever mutated by the cellar's own entrypoints;
///   adaptor dispatch works on a staged copy and commits atomically
/// - Bumps stored for efficient PDA signing
#[account]
pub struct CellarState {
    /// Strategist authority for rebalancing and position management
    pub authority: Pubkey,

    /// Registry account this cellar validates trust against
    pub registry: Pubkey,

    /// Price oracle account used for valuation
    pub price_oracle: Pubkey,

    /// Mint of the accounting asset users deposit
    pub asset_mint: Pubkey,

    /// Mint of the cellar share token
    pub share_mint: Pubkey,

    /// Total shares issued to depositors
    pub total_shares: u64,

    /// Accounting asset held outside any position
    pub idle_assets: u64,

    /// Position user deposits are routed into; 0 routes to idle
    pub holding_position: u32,

    /// Seconds new deposits stay locked, bounds-checked at initialize
    pub share_lock_period: i64,

    /// Adaptor identifiers this cellar has opted into
    pub adaptor_catalogue: Vec<[u8; 32]>,

    /// Position ids this cellar has opted into
    pub position_catalogue: Vec<u32>,

    /// Active credit positions; order is the user-withdraw pull order
    pub credit_positions: Vec<u32>,

    /// Active debt positions
    pub debt_positions: Vec<u32>,

    /// Per-position unit balances
    pub holdings: Vec<Holding>,

    /// Bump seeds
    pub bump: u8,
    pub share_bump: u8,
    pub authority_bump: u8,
}

/// Unit balance of one active position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct Holding {
    pub position_id: u32,
    pub units: u64,
}

impl CellarState {
    /// 8 (discriminator) + 5 pubkeys + totals + catalogues + active lists +
    /// holdings + bumps + 64 (padding)
    pub const SPACE: usize = 8
        + 32 * 5
        + 8
        + 8
        + 4
        + 8
        + 4
        + MAX_CATALOGUE_ADAPTORS * 32
        + 4
        + MAX_CATALOGUE_POSITIONS * 4
        + 4
        + MAX_CREDIT_POSITIONS * 4
        + 4
        + MAX_DEBT_POSITIONS * 4
        + 4
        + (MAX_CREDIT_POSITIONS + MAX_DEBT_POSITIONS) * (4 + 8)
        + 3
        + 64;

    pub fn is_adaptor_catalogued(&self, identifier: &[u8; 32]) -> bool {
        self.adaptor_catalogue.iter().any(|id| id == identifier)
    }

    pub fn is_position_catalogued(&self, id: u32) -> bool {
        self.position_catalogue.contains(&id)
    }

    pub fn is_position_active(&self, id: u32) -> bool {
        self.credit_positions.contains(&id) || self.debt_positions.contains(&id)
    }

    pub fn holding_units(&self, id: u32) -> u64 {
        self.holdings
            .iter()
            .find(|h| h.position_id == id)
            .map(|h| h.units)
            .unwrap_or(0)
    }

    /// Calculate shares to mint for a deposit, rounding down
    ///
    /// ERC-4626 formula:
    /// - If first deposit: shares = assets
    /// - Otherwise: shares = assets * totalShares / totalAssets
    ///
    /// Rounding convention: mint rounds down, withdraw-burn rounds up, so
    /// rounding always favors the cellar over the caller.
    pub fn convert_to_shares(&self, assets: u64, total_assets: u64) -> Result<u64> {
        if self.total_shares == 0 || total_assets == 0 {
            return Ok(assets);
        }

        let shares = (assets as u128)
            .checked_mul(self.total_shares as u128)
            .ok_or(error!(CellarError::MathOverflow))?
            .checked_div(total_assets as u128)
            .ok_or(error!(CellarError::DivisionByZero))?;

        u64::try_from(shares).map_err(|_| error!(CellarError::MathOverflow))
    }

    /// Calculate the asset value of shares, rounding down
    pub fn convert_to_assets(&self, shares: u64, total_assets: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(0);
        }

        let assets = (shares as u128)
            .checked_mul(total_assets as u128)
            .ok_or(error!(CellarError::MathOverflow))?
            .checked_div(self.total_shares as u128)
            .ok_or(error!(CellarError::DivisionByZero))?;

        u64::try_from(assets).map_err(|_| error!(CellarError::MathOverflow))
    }

    /// Shares to burn to withdraw `assets`, rounding up against the caller
    pub fn shares_for_withdraw(&self, assets: u64, total_assets: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(0);
        }
        require!(total_assets > 0, CellarError::DivisionByZero);

        let numerator = (assets as u128)
            .checked_mul(self.total_shares as u128)
            .ok_or(error!(CellarError::MathOverflow))?;
        let shares = numerator
            .checked_add(total_assets as u128 - 1)
            .ok_or(error!(CellarError::MathOverflow))?
            / total_assets as u128;

        u64::try_from(shares).map_err(|_| error!(CellarError::MathOverflow))
    }
}

/// Per-asset oracle entry: price plus risk weighting
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct AssetConfig {
    pub mint: Pubkey,

    /// Price per whole token in the common unit, `PRICE_SCALE` fixed point
    pub price: u64,

    /// Token decimals, used to normalize cross-asset conversions
    pub decimals: u8,

    /// Risk weight applied to collateral value, in basis points
    pub collateral_factor_bps: u16,
}

/// Global price oracle
///
/// Concrete stand-in for the consumed price-router interface. Prices are
/// admin-set and constant within a transaction, so a single valuation pass
/// is internally consistent.
#[account]
pub struct PriceOracle {
    pub admin: Pubkey,
    pub assets: Vec<AssetConfig>,
    pub bump: u8,
}

impl PriceOracle {
    pub const SPACE: usize = 8 + 32 + 4 + MAX_ORACLE_ASSETS * (32 + 8 + 1 + 2) + 1 + 64;

    pub fn asset_config(&self, mint: &Pubkey) -> Result<&AssetConfig> {
        self.assets
            .iter()
            .find(|a| &a.mint == mint)
            .ok_or(error!(CellarError::UnderlyingNotSupported))
    }

    /// Value `amount` of `asset_in` in units of `asset_out`, rounding down
    pub fn get_value(&self, asset_in: &Pubkey, amount: u64, asset_out: &Pubkey) -> Result<u64> {
        self.convert(asset_in, amount, asset_out, false)
    }

    /// Same conversion rounding up; used when sizing units that must cover
    /// a target value
    pub fn get_value_ceil(
        &self,
        asset_in: &Pubkey,
        amount: u64,
        asset_out: &Pubkey,
    ) -> Result<u64> {
        self.convert(asset_in, amount, asset_out, true)
    }

    fn convert(
        &self,
        asset_in: &Pubkey,
        amount: u64,
        asset_out: &Pubkey,
        round_up: bool,
    ) -> Result<u64> {
        if asset_in == asset_out {
            return Ok(amount);
        }
        let cfg_in = self.asset_config(asset_in)?;
        let cfg_out = self.asset_config(asset_out)?;

        // amount_out = amount * price_in * 10^dec_out / (price_out * 10^dec_in)
        let numerator = (amount as u128)
            .checked_mul(cfg_in.price as u128)
            .ok_or(error!(CellarError::MathOverflow))?
            .checked_mul(pow10(cfg_out.decimals))
            .ok_or(error!(CellarError::MathOverflow))?;
        let denominator = (cfg_out.price as u128)
            .checked_mul(pow10(cfg_in.decimals))
            .ok_or(error!(CellarError::MathOverflow))?;
        require!(denominator > 0, CellarError::DivisionByZero);

        let out = if round_up {
            numerator
                .checked_add(denominator - 1)
                .ok_or(error!(CellarError::MathOverflow))?
                / denominator
        } else {
            numerator / denominator
        };
        u64::try_from(out).map_err(|_| error!(CellarError::MathOverflow))
    }

    /// Upsert an asset entry
    pub fn set_asset(&mut self, config: AssetConfig) -> Result<()> {
        require!(
            config.collateral_factor_bps as u64 <= MAX_BPS,
            CellarError::InvalidPositionConfig
        );
        if let Some(entry) = self.assets.iter_mut().find(|a| a.mint == config.mint) {
            *entry = config;
            return Ok(());
        }
        require!(
            self.assets.len() < MAX_ORACLE_ASSETS,
            CellarError::OracleFull
        );
        self.assets.push(config);
        Ok(())
    }
}

fn pow10(decimals: u8) -> u128 {
    10u128.pow(decimals as u32)
}

/// Per-depositor share lock state
///
/// Freshly minted shares stay locked for the cellar's share lock period,
/// blocking same-window deposit/withdraw arbitrage against the valuation.
#[account]
pub struct DepositorState {
    pub owner: Pubkey,
    pub cellar: Pubkey,
    pub share_unlock_time: i64,
    pub bump: u8,
}

impl DepositorState {
    pub const SPACE: usize = 8 + 32 + 32 + 8 + 1 + 16;
}
