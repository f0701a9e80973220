// Constants for the Cellar program

/// Seed for the global position registry PDA
pub const REGISTRY_SEED: &[u8] = b"registry";

/// Seed for the global price oracle PDA
pub const ORACLE_SEED: &[u8] = b"price_oracle";

/// Seed for cellar state PDA
pub const CELLAR_SEED: &[u8] = b"cellar";

/// Seed for share mint PDA
pub const SHARE_MINT_SEED: &[u8] = b"shares";

/// Seed for cellar authority PDA
pub const CELLAR_AUTHORITY_SEED: &[u8] = b"cellar_authority";

/// Seed for per-depositor state PDA
pub const DEPOSITOR_SEED: &[u8] = b"depositor";

/// Fixed-point scale for oracle prices (1.0 == 1_000_000)
pub const PRICE_SCALE: u64 = 1_000_000;

/// Fixed-point scale for health factors (1.0 == 1_000_000)
pub const HEALTH_FACTOR_SCALE: u64 = 1_000_000;

/// Minimum post-operation health factor for cross-asset borrows (1.05)
pub const MINIMUM_HEALTH_FACTOR: u64 = 1_050_000;

/// Minimum post-operation health factor for same-asset leverage (1.01)
///
/// Same-asset pairs carry no price-divergence liquidation risk, so a lower
/// floor applies, but one is still enforced to keep collateral from being
/// exhausted outright.
pub const SELF_LEVERAGE_MINIMUM_HEALTH_FACTOR: u64 = 1_010_000;

/// Basis-point denominator for risk weights and swap fees
pub const MAX_BPS: u64 = 10_000;

/// Swap fee charged by the spot execution venue
pub const SPOT_SWAP_FEE_BPS: u64 = 30;

/// Swap fee charged by the stable execution venue
pub const STABLE_SWAP_FEE_BPS: u64 = 5;

/// Maximum adaptors the registry can trust
pub const MAX_TRUSTED_ADAPTORS: usize = 8;

/// Maximum positions the registry can trust
pub const MAX_TRUSTED_POSITIONS: usize = 32;

/// Maximum adaptor-specific config length in bytes
pub const MAX_CONFIG_LEN: usize = 64;

/// Maximum adaptors in a single cellar's catalogue
pub const MAX_CATALOGUE_ADAPTORS: usize = 8;

/// Maximum positions in a single cellar's catalogue
pub const MAX_CATALOGUE_POSITIONS: usize = 32;

/// Maximum active credit positions per cellar
pub const MAX_CREDIT_POSITIONS: usize = 16;

/// Maximum active debt positions per cellar
pub const MAX_DEBT_POSITIONS: usize = 8;

/// Maximum assets the price oracle can list
pub const MAX_ORACLE_ASSETS: usize = 16;

/// Sub-account ids must be below this bound
pub const MAX_SUB_ACCOUNTS: u8 = 32;

/// Share lock period bounds, in seconds
pub const MINIMUM_SHARE_LOCK_PERIOD: i64 = 300; // 5 minutes
pub const MAXIMUM_SHARE_LOCK_PERIOD: i64 = 172_800; // 2 days
