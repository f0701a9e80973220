use anchor_lang::prelude::*;

/// Custom error codes for the Cellar program
///
/// Security: Descriptive error messages without information leakage
#[error_code]
pub enum CellarError {
    // --- input validation ---
    #[msg("Deposit amount must be greater than zero")]
    ZeroDepositAmount,

    #[msg("Withdraw amount must be greater than zero")]
    ZeroWithdrawAmount,

    #[msg("Deposit too small - would mint zero shares")]
    ZeroShares,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Cannot divide by zero - cellar has no shares")]
    DivisionByZero,

    #[msg("Invalid token mint - does not match cellar asset")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Unauthorized - only the configured authority can perform this action")]
    Unauthorized,

    #[msg("Share lock period outside allowed bounds")]
    ShareLockPeriodOutOfBounds,

    // --- registry / trust tier ---
    #[msg("Adaptor is not trusted by the registry")]
    AdaptorNotTrusted,

    #[msg("Position is not trusted by the registry")]
    PositionNotTrusted,

    #[msg("Position id not found in the registry")]
    PositionNotFound,

    #[msg("Debt flag does not match the adaptor's classification")]
    DebtMismatch,

    #[msg("Registry is full - maximum trusted entries reached")]
    RegistryFull,

    #[msg("Adaptor-specific config failed to decode")]
    InvalidPositionConfig,

    // --- catalogue / active tier ---
    #[msg("Adaptor not present in this cellar's catalogue")]
    AdaptorNotInCatalogue,

    #[msg("Position not present in this cellar's catalogue")]
    PositionNotInCatalogue,

    #[msg("Catalogue is full")]
    CatalogueFull,

    #[msg("Position is already active in this cellar")]
    PositionAlreadyActive,

    #[msg("Position is not active in this cellar")]
    PositionNotActive,

    #[msg("Active position list is full")]
    PositionArrayFull,

    #[msg("Position index out of bounds")]
    PositionIndexOutOfBounds,

    #[msg("Position still has a balance and cannot be removed")]
    PositionNotEmpty,

    // --- adaptor call failures ---
    #[msg("Oracle has no market for the requested asset")]
    UnderlyingNotSupported,

    #[msg("Debt positions must be tracked before use")]
    DebtPositionsMustBeTracked,

    #[msg("Credit position must be tracked before use")]
    PositionNotTracked,

    #[msg("Health factor below the configured minimum")]
    HealthFactorTooLow,

    #[msg("Sub-account id out of range")]
    InvalidSubAccountId,

    #[msg("User deposits are not allowed into this position")]
    UserDepositsNotAllowed,

    #[msg("User withdraws are not allowed from this position")]
    UserWithdrawsNotAllowed,

    #[msg("Call is not supported by the target adaptor")]
    AdaptorCallNotSupported,

    #[msg("Repay amount exceeds outstanding debt")]
    RepayExceedsDebt,

    #[msg("Swap deadline has passed")]
    SwapDeadlineExceeded,

    #[msg("Swap output below the minimum out bound")]
    SlippageExceeded,

    // --- ledger / solvency ---
    #[msg("Insufficient cellar balance for this operation")]
    InsufficientVaultBalance,

    #[msg("Debt value exceeds credit value - cellar insolvent")]
    VaultInsolvent,

    #[msg("Shares are still locked for this depositor")]
    SharesLocked,

    #[msg("Withdraw exceeds the owner's maximum withdrawable assets")]
    WithdrawExceedsMax,

    #[msg("Active positions could not satisfy the requested liquidity")]
    LiquidityExhausted,

    #[msg("Owner does not hold enough shares")]
    InsufficientShares,

    #[msg("Oracle asset list is full")]
    OracleFull,
}
