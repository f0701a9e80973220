use anchor_lang::prelude::*;
use solana_keccak_hasher as keccak;

use crate::{constants::*, errors::CellarError};

/// Closed set of adaptor implementations
///
/// Architecture: tagged-variant dispatch instead of dynamic code loading.
/// Each variant is a stateless capability unit; positions reference a variant
/// plus adaptor-specific config bytes and never own adaptor state.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdaptorKind {
    /// Supply-side lending pool holding a single asset (credit)
    TokenPool,
    /// Borrow market keyed by sub-account (debt)
    DebtMarket,
    /// Shares of a nested vault, valued through the oracle (credit)
    VaultShares,
}

/// Config for a `TokenPool` position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct TokenPoolConfig {
    pub mint: Pubkey,
    pub sub_account: u8,
}

/// Config for a `DebtMarket` position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct DebtMarketConfig {
    pub mint: Pubkey,
    pub sub_account: u8,
}

/// Config for a `VaultShares` position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct VaultSharesConfig {
    pub share_mint: Pubkey,
}

/// Normalized view of a decoded position config
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionTerms {
    /// Asset the position's balance is measured in
    pub asset: Pubkey,
    /// Sub-account this position belongs to (0 for kinds without sub-accounts)
    pub sub_account: u8,
}

impl AdaptorKind {
    /// Constant identifier used for content-addressed position hashing
    ///
    /// Name plus version, zero-padded to 32 bytes. Bumping a version yields a
    /// distinct adaptor that must be re-trusted.
    pub fn identifier(&self) -> [u8; 32] {
        let name: &[u8] = match self {
            AdaptorKind::TokenPool => b"Token Pool Adaptor V1.0",
            AdaptorKind::DebtMarket => b"Debt Market Adaptor V1.0",
            AdaptorKind::VaultShares => b"Vault Shares Adaptor V1.0",
        };
        let mut id = [0u8; 32];
        id[..name.len()].copy_from_slice(name);
        id
    }

    /// Resolve a kind back from its identifier
    pub fn from_identifier(identifier: &[u8; 32]) -> Option<Self> {
        [
            AdaptorKind::TokenPool,
            AdaptorKind::DebtMarket,
            AdaptorKind::VaultShares,
        ]
        .into_iter()
        .find(|kind| &kind.identifier() == identifier)
    }

    /// Constant per-kind classification
    pub fn is_debt(&self) -> bool {
        matches!(self, AdaptorKind::DebtMarket)
    }

    /// Decode and validate adaptor-specific config bytes
    pub fn decode_config(&self, config: &[u8]) -> Result<PositionTerms> {
        let terms = match self {
            AdaptorKind::TokenPool => {
                let cfg = TokenPoolConfig::try_from_slice(config)
                    .map_err(|_| error!(CellarError::InvalidPositionConfig))?;
                PositionTerms {
                    asset: cfg.mint,
                    sub_account: cfg.sub_account,
                }
            }
            AdaptorKind::DebtMarket => {
                let cfg = DebtMarketConfig::try_from_slice(config)
                    .map_err(|_| error!(CellarError::InvalidPositionConfig))?;
                PositionTerms {
                    asset: cfg.mint,
                    sub_account: cfg.sub_account,
                }
            }
            AdaptorKind::VaultShares => {
                let cfg = VaultSharesConfig::try_from_slice(config)
                    .map_err(|_| error!(CellarError::InvalidPositionConfig))?;
                PositionTerms {
                    asset: cfg.share_mint,
                    sub_account: 0,
                }
            }
        };
        require!(
            terms.sub_account < MAX_SUB_ACCOUNTS,
            CellarError::InvalidSubAccountId
        );
        Ok(terms)
    }

    /// Portion of a holding immediately liquid for user withdrawal
    ///
    /// Debt positions always report zero: debt cannot be redeemed, unwinding
    /// it is a strategist operation.
    pub fn withdrawable_from(&self, units: u64) -> u64 {
        match self {
            AdaptorKind::TokenPool | AdaptorKind::VaultShares => units,
            AdaptorKind::DebtMarket => 0,
        }
    }

    /// Structural capability guard for user deposit routing
    pub fn assert_user_deposits_allowed(&self) -> Result<()> {
        require!(!self.is_debt(), CellarError::UserDepositsNotAllowed);
        Ok(())
    }

    /// Structural capability guard for user withdrawal routing
    pub fn assert_user_withdraws_allowed(&self) -> Result<()> {
        require!(!self.is_debt(), CellarError::UserWithdrawsNotAllowed);
        Ok(())
    }
}

/// Content address of a position: keccak(identifier || is_debt || config)
///
/// This hash is the source of truth for deduplication and lookup; the integer
/// position id is an allocated alias.
pub fn position_hash(kind: AdaptorKind, is_debt: bool, config: &[u8]) -> [u8; 32] {
    keccak::hashv(&[kind.identifier().as_ref(), &[is_debt as u8], config]).0
}

/// Execution venue for strategist swaps, selecting the fee tier
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exchange {
    Spot,
    Stable,
}

impl Exchange {
    pub fn fee_bps(&self) -> u64 {
        match self {
            Exchange::Spot => SPOT_SWAP_FEE_BPS,
            Exchange::Stable => STABLE_SWAP_FEE_BPS,
        }
    }
}

/// One group of strategist calls routed through a single adaptor
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct AdaptorCall {
    /// Identifier of the adaptor the calls are dispatched to
    pub adaptor_id: [u8; 32],
    /// Ordered calls executed against the cellar's balance sheet
    pub calls: Vec<StrategistCall>,
}

/// Strategist-only mutation entrypoints
///
/// Every variant carries the raw config of the position it targets so the
/// dispatcher can re-derive the position hash and reject untracked positions.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub enum StrategistCall {
    /// Supply `amount` of the position's asset into its pool, paid from idle
    Lend { config: Vec<u8>, amount: u64 },
    /// Redeem `amount` of pool units back into idle reserves
    Redeem { config: Vec<u8>, amount: u64 },
    /// Borrow `amount` of the position's asset against its sub-account
    Borrow { config: Vec<u8>, amount: u64 },
    /// Repay `amount` of outstanding debt from idle reserves
    Repay { config: Vec<u8>, amount: u64 },
    /// Same-asset leveraged mint: collateral and debt grow together
    LeverUp { config: Vec<u8>, amount: u64 },
    /// Unwind a same-asset leveraged pair
    LeverDown { config: Vec<u8>, amount: u64 },
    /// Move value between two credit positions at the oracle rate
    Swap {
        exchange: Exchange,
        from_config: Vec<u8>,
        to_config: Vec<u8>,
        amount: u64,
        min_out: u64,
        deadline: i64,
    },
}
