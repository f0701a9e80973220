//! Logic-level tests for the accounting and adaptor-dispatch core
//!
//! These drive the registry, oracle, and staged ledger directly, the same
//! state the on-chain handlers operate on, so every property is checked
//! without a validator in the loop.

use anchor_lang::error::ERROR_CODE_OFFSET;
use anchor_lang::prelude::*;

use cellar::adaptors::{
    position_hash, AdaptorCall, AdaptorKind, DebtMarketConfig, Exchange, StrategistCall,
    TokenPoolConfig,
};
use cellar::constants::*;
use cellar::errors::CellarError;
use cellar::ledger;
use cellar::state::{AssetConfig, CellarState, Holding, PriceOracle, Registry};

const NOW: i64 = 1_700_000_000;

fn encode<T: AnchorSerialize>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.serialize(&mut buf).unwrap();
    buf
}

fn assert_cellar_err<T: std::fmt::Debug>(result: Result<T>, expected: CellarError) {
    let err = result.unwrap_err();
    let code = match err {
        anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
        other => panic!("expected an anchor error, got {other:?}"),
    };
    assert_eq!(code, expected as u32 + ERROR_CODE_OFFSET);
}

/// Test world: usdc-accounted cellar with one usdc pool, one sol pool, and
/// one usdc debt market, all trusted and active
struct World {
    registry: Registry,
    oracle: PriceOracle,
    cellar: CellarState,
    usdc: Pubkey,
    sol: Pubkey,
    pool_usdc: u32,
    pool_sol: u32,
    debt_usdc: u32,
}

fn pool_config(mint: Pubkey, sub_account: u8) -> Vec<u8> {
    encode(&TokenPoolConfig { mint, sub_account })
}

fn debt_config(mint: Pubkey, sub_account: u8) -> Vec<u8> {
    encode(&DebtMarketConfig { mint, sub_account })
}

fn setup() -> World {
    let usdc = Pubkey::new_unique();
    let sol = Pubkey::new_unique();

    let mut registry = Registry {
        admin: Pubkey::default(),
        adaptors: Vec::new(),
        positions: Vec::new(),
        next_position_id: 1,
        bump: 0,
    };
    registry.trust_adaptor(AdaptorKind::TokenPool).unwrap();
    registry.trust_adaptor(AdaptorKind::DebtMarket).unwrap();

    let pool_usdc = registry
        .trust_position(AdaptorKind::TokenPool, false, pool_config(usdc, 0))
        .unwrap();
    let pool_sol = registry
        .trust_position(AdaptorKind::TokenPool, false, pool_config(sol, 0))
        .unwrap();
    let debt_usdc = registry
        .trust_position(AdaptorKind::DebtMarket, true, debt_config(usdc, 0))
        .unwrap();

    let oracle = PriceOracle {
        admin: Pubkey::default(),
        assets: vec![
            AssetConfig {
                mint: usdc,
                price: PRICE_SCALE, // 1.0
                decimals: 6,
                collateral_factor_bps: 8000,
            },
            AssetConfig {
                mint: sol,
                price: 2 * PRICE_SCALE, // 2.0
                decimals: 6,
                collateral_factor_bps: 9000,
            },
        ],
        bump: 0,
    };

    let cellar = CellarState {
        authority: Pubkey::default(),
        registry: Pubkey::default(),
        price_oracle: Pubkey::default(),
        asset_mint: usdc,
        share_mint: Pubkey::default(),
        total_shares: 0,
        idle_assets: 10_000,
        holding_position: 0,
        share_lock_period: MINIMUM_SHARE_LOCK_PERIOD,
        adaptor_catalogue: vec![
            AdaptorKind::TokenPool.identifier(),
            AdaptorKind::DebtMarket.identifier(),
        ],
        position_catalogue: vec![pool_usdc, pool_sol, debt_usdc],
        credit_positions: vec![pool_usdc, pool_sol],
        debt_positions: vec![debt_usdc],
        holdings: Vec::new(),
        bump: 0,
        share_bump: 0,
        authority_bump: 0,
    };

    World {
        registry,
        oracle,
        cellar,
        usdc,
        sol,
        pool_usdc,
        pool_sol,
        debt_usdc,
    }
}

fn group(kind: AdaptorKind, calls: Vec<StrategistCall>) -> AdaptorCall {
    AdaptorCall {
        adaptor_id: kind.identifier(),
        calls,
    }
}

// ============================================================================
// Valuation and conservation
// ============================================================================

#[test]
fn deposits_and_withdrawals_move_valuation_by_exactly_the_flow() {
    let mut w = setup();
    let before = ledger::total_assets(&w.cellar, &w.registry, &w.oracle).unwrap();

    ledger::route_deposit(&mut w.cellar, &w.registry, &w.oracle, 500).unwrap();
    let after_deposit = ledger::total_assets(&w.cellar, &w.registry, &w.oracle).unwrap();
    assert_eq!(after_deposit, before + 500);

    ledger::pull_liquidity(&mut w.cellar, &w.registry, &w.oracle, 500).unwrap();
    let after_withdraw = ledger::total_assets(&w.cellar, &w.registry, &w.oracle).unwrap();
    assert_eq!(after_withdraw, before);
}

#[test]
fn lending_does_not_change_total_assets() {
    let mut w = setup();
    let before = ledger::total_assets(&w.cellar, &w.registry, &w.oracle).unwrap();

    let batch = vec![group(
        AdaptorKind::TokenPool,
        vec![StrategistCall::Lend {
            config: pool_config(w.usdc, 0),
            amount: 4_000,
        }],
    )];
    let after =
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch).unwrap();

    assert_eq!(after, before);
    assert_eq!(w.cellar.idle_assets, 6_000);
    assert_eq!(w.cellar.holding_units(w.pool_usdc), 4_000);
}

#[test]
fn borrowing_is_valuation_neutral() {
    let mut w = setup();
    let batch = vec![
        group(
            AdaptorKind::TokenPool,
            vec![StrategistCall::Lend {
                config: pool_config(w.usdc, 0),
                amount: 10_000,
            }],
        ),
        group(
            AdaptorKind::DebtMarket,
            vec![StrategistCall::Borrow {
                config: debt_config(w.usdc, 0),
                amount: 5_000,
            }],
        ),
    ];
    let after =
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch).unwrap();

    // Borrowed value lands in idle while an equal debt is recorded
    assert_eq!(after, 10_000);
    assert_eq!(w.cellar.idle_assets, 5_000);
    assert_eq!(w.cellar.holding_units(w.debt_usdc), 5_000);
}

#[test]
fn rebalance_round_trip_restores_the_balance_sheet() {
    let mut w = setup();
    let batch = vec![
        group(
            AdaptorKind::TokenPool,
            vec![StrategistCall::Lend {
                config: pool_config(w.usdc, 0),
                amount: 10_000,
            }],
        ),
        group(
            AdaptorKind::DebtMarket,
            vec![
                StrategistCall::Borrow {
                    config: debt_config(w.usdc, 0),
                    amount: 3_000,
                },
                StrategistCall::Repay {
                    config: debt_config(w.usdc, 0),
                    amount: 3_000,
                },
            ],
        ),
        group(
            AdaptorKind::TokenPool,
            vec![StrategistCall::Redeem {
                config: pool_config(w.usdc, 0),
                amount: 10_000,
            }],
        ),
    ];
    let after =
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch).unwrap();

    assert_eq!(after, 10_000);
    assert_eq!(w.cellar.idle_assets, 10_000);
    assert!(w.cellar.holdings.is_empty());
}

#[test]
fn repaying_more_than_the_outstanding_debt_fails() {
    let mut w = setup();
    w.cellar.idle_assets = 10_000;
    w.cellar.holdings = vec![
        Holding {
            position_id: w.pool_usdc,
            units: 10_000,
        },
        Holding {
            position_id: w.debt_usdc,
            units: 1_000,
        },
    ];
    let batch = vec![group(
        AdaptorKind::DebtMarket,
        vec![StrategistCall::Repay {
            config: debt_config(w.usdc, 0),
            amount: 1_001,
        }],
    )];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::RepayExceedsDebt,
    );
    assert_eq!(w.cellar.holding_units(w.debt_usdc), 1_000);
}

#[test]
fn insolvent_cellar_fails_valuation() {
    let mut w = setup();
    w.cellar.idle_assets = 100;
    w.cellar.holdings = vec![Holding {
        position_id: w.debt_usdc,
        units: 20_000,
    }];
    assert_cellar_err(
        ledger::total_assets(&w.cellar, &w.registry, &w.oracle),
        CellarError::VaultInsolvent,
    );
}

// ============================================================================
// Tracked-position and allow-list gates
// ============================================================================

#[test]
fn borrowing_against_an_untracked_market_fails_and_rolls_back() {
    let mut w = setup();
    // sub-account 1 was never trusted or activated
    let batch = vec![
        group(
            AdaptorKind::TokenPool,
            vec![StrategistCall::Lend {
                config: pool_config(w.usdc, 0),
                amount: 4_000,
            }],
        ),
        group(
            AdaptorKind::DebtMarket,
            vec![StrategistCall::Borrow {
                config: debt_config(w.usdc, 1),
                amount: 1,
            }],
        ),
    ];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::DebtPositionsMustBeTracked,
    );

    // The lend that preceded the failure must not have been applied
    assert_eq!(w.cellar.idle_assets, 10_000);
    assert!(w.cellar.holdings.is_empty());
}

#[test]
fn trusted_but_inactive_debt_position_is_still_untracked() {
    let mut w = setup();
    w.cellar.debt_positions.clear();
    let batch = vec![group(
        AdaptorKind::DebtMarket,
        vec![StrategistCall::Borrow {
            config: debt_config(w.usdc, 0),
            amount: 1,
        }],
    )];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::DebtPositionsMustBeTracked,
    );
}

#[test]
fn uncatalogued_adaptor_is_rejected() {
    let mut w = setup();
    let batch = vec![group(AdaptorKind::VaultShares, Vec::new())];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::AdaptorNotInCatalogue,
    );
}

#[test]
fn distrusted_adaptor_is_rejected_even_when_catalogued() {
    let mut w = setup();
    w.registry
        .distrust_adaptor(&AdaptorKind::TokenPool.identifier())
        .unwrap();
    let batch = vec![group(AdaptorKind::TokenPool, Vec::new())];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::AdaptorNotTrusted,
    );
}

#[test]
fn borrow_through_a_credit_adaptor_is_a_structural_refusal() {
    let mut w = setup();
    let batch = vec![group(
        AdaptorKind::TokenPool,
        vec![StrategistCall::Borrow {
            config: debt_config(w.usdc, 0),
            amount: 1,
        }],
    )];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::AdaptorCallNotSupported,
    );
}

// ============================================================================
// Health factor gating
// ============================================================================

/// 10,000 usdc collateral at an 80% collateral factor gives 8,000 of
/// risk-adjusted value; at the 1.05 minimum the largest passing borrow is
/// floor(8000 / 1.05) = 7,619.
#[test]
fn borrow_at_exactly_the_minimum_health_factor_succeeds() {
    let mut w = setup();
    let batch = vec![
        group(
            AdaptorKind::TokenPool,
            vec![StrategistCall::Lend {
                config: pool_config(w.usdc, 0),
                amount: 10_000,
            }],
        ),
        group(
            AdaptorKind::DebtMarket,
            vec![StrategistCall::Borrow {
                config: debt_config(w.usdc, 0),
                amount: 7_619,
            }],
        ),
    ];
    ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch).unwrap();
    assert_eq!(w.cellar.holding_units(w.debt_usdc), 7_619);
}

#[test]
fn borrowing_one_unit_more_fails_with_health_factor_too_low() {
    let mut w = setup();
    let batch = vec![
        group(
            AdaptorKind::TokenPool,
            vec![StrategistCall::Lend {
                config: pool_config(w.usdc, 0),
                amount: 10_000,
            }],
        ),
        group(
            AdaptorKind::DebtMarket,
            vec![StrategistCall::Borrow {
                config: debt_config(w.usdc, 0),
                amount: 7_620,
            }],
        ),
    ];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::HealthFactorTooLow,
    );
    // Atomicity: post-state equals pre-state
    assert_eq!(w.cellar.idle_assets, 10_000);
    assert!(w.cellar.holdings.is_empty());
}

#[test]
fn self_leverage_uses_the_lower_minimum() {
    // Cross-asset minimum would cap debt near 7,619; the self-leverage floor
    // of 1.01 admits far more: 0.8 * (10000 + L) >= 1.01 * L holds up to
    // L = 38,095
    let lever = |w: &World, amount: u64| {
        vec![group(
            AdaptorKind::DebtMarket,
            vec![StrategistCall::LeverUp {
                config: debt_config(w.usdc, 0),
                amount,
            }],
        )]
    };
    let seed_collateral = |w: &mut World| {
        w.cellar.holdings = vec![Holding {
            position_id: w.pool_usdc,
            units: 10_000,
        }];
    };

    let mut ok = setup();
    seed_collateral(&mut ok);
    let batch = lever(&ok, 38_095);
    ledger::execute_adaptor_calls(&mut ok.cellar, &ok.registry, &ok.oracle, NOW, &batch).unwrap();
    assert_eq!(ok.cellar.holding_units(ok.pool_usdc), 48_095);
    assert_eq!(ok.cellar.holding_units(ok.debt_usdc), 38_095);

    let mut over = setup();
    seed_collateral(&mut over);
    let batch = lever(&over, 38_096);
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut over.cellar, &over.registry, &over.oracle, NOW, &batch),
        CellarError::HealthFactorTooLow,
    );
}

#[test]
fn lever_down_unwinds_both_legs_together() {
    let mut w = setup();
    w.cellar.holdings = vec![
        Holding {
            position_id: w.pool_usdc,
            units: 20_000,
        },
        Holding {
            position_id: w.debt_usdc,
            units: 10_000,
        },
    ];
    let batch = vec![group(
        AdaptorKind::DebtMarket,
        vec![StrategistCall::LeverDown {
            config: debt_config(w.usdc, 0),
            amount: 10_000,
        }],
    )];
    ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch).unwrap();

    assert_eq!(w.cellar.holding_units(w.pool_usdc), 10_000);
    assert_eq!(w.cellar.holding_units(w.debt_usdc), 0);

    // Unwinding past the outstanding debt fails
    let batch = vec![group(
        AdaptorKind::DebtMarket,
        vec![StrategistCall::LeverDown {
            config: debt_config(w.usdc, 0),
            amount: 1,
        }],
    )];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::RepayExceedsDebt,
    );
}

#[test]
fn lever_up_requires_a_tracked_collateral_leg() {
    let mut w = setup();
    w.cellar.credit_positions.clear();
    let batch = vec![group(
        AdaptorKind::DebtMarket,
        vec![StrategistCall::LeverUp {
            config: debt_config(w.usdc, 0),
            amount: 100,
        }],
    )];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::PositionNotTracked,
    );
}

// ============================================================================
// Swaps
// ============================================================================

#[test]
fn swap_executes_at_the_oracle_rate_minus_the_venue_fee() {
    let mut w = setup();
    w.cellar.holdings = vec![Holding {
        position_id: w.pool_usdc,
        units: 1_000,
    }];
    let batch = vec![group(
        AdaptorKind::TokenPool,
        vec![StrategistCall::Swap {
            exchange: Exchange::Spot,
            from_config: pool_config(w.usdc, 0),
            to_config: pool_config(w.sol, 0),
            amount: 1_000,
            min_out: 495,
            deadline: NOW + 60,
        }],
    )];
    ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch).unwrap();

    // 1000 usdc at 2.0 quotes 500 sol; 30 bps spot fee takes 1 unit
    assert_eq!(w.cellar.holding_units(w.pool_usdc), 0);
    assert_eq!(w.cellar.holding_units(w.pool_sol), 499);
}

#[test]
fn swap_past_its_deadline_is_rejected() {
    let mut w = setup();
    w.cellar.holdings = vec![Holding {
        position_id: w.pool_usdc,
        units: 1_000,
    }];
    let batch = vec![group(
        AdaptorKind::TokenPool,
        vec![StrategistCall::Swap {
            exchange: Exchange::Spot,
            from_config: pool_config(w.usdc, 0),
            to_config: pool_config(w.sol, 0),
            amount: 1_000,
            min_out: 0,
            deadline: NOW - 1,
        }],
    )];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::SwapDeadlineExceeded,
    );
}

#[test]
fn swap_below_min_out_is_rejected() {
    let mut w = setup();
    w.cellar.holdings = vec![Holding {
        position_id: w.pool_usdc,
        units: 1_000,
    }];
    let batch = vec![group(
        AdaptorKind::TokenPool,
        vec![StrategistCall::Swap {
            exchange: Exchange::Spot,
            from_config: pool_config(w.usdc, 0),
            to_config: pool_config(w.sol, 0),
            amount: 1_000,
            min_out: 500,
            deadline: NOW + 60,
        }],
    )];
    assert_cellar_err(
        ledger::execute_adaptor_calls(&mut w.cellar, &w.registry, &w.oracle, NOW, &batch),
        CellarError::SlippageExceeded,
    );
    assert_eq!(w.cellar.holding_units(w.pool_usdc), 1_000);
}

// ============================================================================
// User liquidity
// ============================================================================

#[test]
fn withdrawable_counts_idle_and_credit_positions_only() {
    let mut w = setup();
    w.cellar.idle_assets = 100;
    w.cellar.holdings = vec![
        Holding {
            position_id: w.pool_usdc,
            units: 200,
        },
        Holding {
            position_id: w.debt_usdc,
            units: 5_000,
        },
    ];
    let liquid = ledger::total_withdrawable(&w.cellar, &w.registry, &w.oracle).unwrap();
    assert_eq!(liquid, 300);
}

#[test]
fn pull_liquidity_drains_idle_before_positions() {
    let mut w = setup();
    w.cellar.idle_assets = 100;
    w.cellar.holdings = vec![Holding {
        position_id: w.pool_usdc,
        units: 200,
    }];
    ledger::pull_liquidity(&mut w.cellar, &w.registry, &w.oracle, 250).unwrap();
    assert_eq!(w.cellar.idle_assets, 0);
    assert_eq!(w.cellar.holding_units(w.pool_usdc), 50);
}

#[test]
fn pull_liquidity_converts_foreign_assets_at_the_oracle_rate() {
    let mut w = setup();
    w.cellar.idle_assets = 100;
    w.cellar.holdings = vec![Holding {
        position_id: w.pool_sol,
        units: 100, // worth 200 usdc
    }];
    ledger::pull_liquidity(&mut w.cellar, &w.registry, &w.oracle, 250).unwrap();
    assert_eq!(w.cellar.idle_assets, 0);
    // 150 usdc of the pull came from sol units at 2.0
    assert_eq!(w.cellar.holding_units(w.pool_sol), 25);
}

#[test]
fn exhausted_liquidity_fails_the_withdrawal() {
    let mut w = setup();
    w.cellar.idle_assets = 100;
    w.cellar.holdings = vec![Holding {
        position_id: w.pool_usdc,
        units: 200,
    }];
    assert_cellar_err(
        ledger::pull_liquidity(&mut w.cellar, &w.registry, &w.oracle, 301),
        CellarError::LiquidityExhausted,
    );
}

// ============================================================================
// Share lock and withdraw sizing
// ============================================================================

#[test]
fn withdraw_before_the_unlock_time_is_rejected() {
    let mut w = setup();
    w.cellar.total_shares = 10_000;
    assert_cellar_err(
        ledger::prepare_withdraw(&w.cellar, &w.registry, &w.oracle, NOW, NOW + 1, 1_000, 100),
        CellarError::SharesLocked,
    );
}

#[test]
fn withdraw_at_or_after_the_unlock_time_succeeds() {
    let mut w = setup();
    w.cellar.total_shares = 10_000;
    // 10,000 shares over 10,000 idle assets burns 1:1
    let at = ledger::prepare_withdraw(&w.cellar, &w.registry, &w.oracle, NOW, NOW, 1_000, 100)
        .unwrap();
    assert_eq!(at, 100);
    let after =
        ledger::prepare_withdraw(&w.cellar, &w.registry, &w.oracle, NOW, NOW - 60, 1_000, 100)
            .unwrap();
    assert_eq!(after, 100);
}

#[test]
fn withdraw_above_the_owners_share_value_is_rejected() {
    let mut w = setup();
    w.cellar.total_shares = 10_000;
    // 1,000 of 10,000 shares redeems at most 1,000 of the 10,000 total
    let shares =
        ledger::prepare_withdraw(&w.cellar, &w.registry, &w.oracle, NOW, NOW, 1_000, 1_000)
            .unwrap();
    assert_eq!(shares, 1_000);
    assert_cellar_err(
        ledger::prepare_withdraw(&w.cellar, &w.registry, &w.oracle, NOW, NOW, 1_000, 1_001),
        CellarError::WithdrawExceedsMax,
    );
}

#[test]
fn withdraw_burn_rounds_up_against_the_owner() {
    let mut w = setup();
    // 3,000 shares over 10,000 assets: 100 assets is 30 shares exactly,
    // 101 assets rounds the burn up to 31
    w.cellar.total_shares = 3_000;
    let shares = ledger::prepare_withdraw(&w.cellar, &w.registry, &w.oracle, NOW, NOW, 3_000, 101)
        .unwrap();
    assert_eq!(shares, 31);
}

#[test]
fn dust_deposits_that_mint_zero_shares_are_rejected() {
    let mut w = setup();
    // 1,000 shares over 10,000 assets: 9 assets floors to 0 shares
    w.cellar.total_shares = 1_000;
    assert_cellar_err(
        ledger::prepare_deposit(&w.cellar, &w.registry, &w.oracle, 9),
        CellarError::ZeroShares,
    );
    assert_eq!(
        ledger::prepare_deposit(&w.cellar, &w.registry, &w.oracle, 10).unwrap(),
        1
    );
}

// ============================================================================
// Deposit routing
// ============================================================================

#[test]
fn deposits_route_into_the_holding_position() {
    let mut w = setup();
    w.cellar.holding_position = w.pool_sol;
    ledger::route_deposit(&mut w.cellar, &w.registry, &w.oracle, 1_000).unwrap();
    // 1000 usdc buys 500 sol units at 2.0
    assert_eq!(w.cellar.holding_units(w.pool_sol), 500);
    assert_eq!(w.cellar.idle_assets, 10_000);
}

#[test]
fn holding_position_routing_floors_dust_out_of_the_valuation() {
    let mut w = setup();
    w.cellar.holding_position = w.pool_sol;
    let before = ledger::total_assets(&w.cellar, &w.registry, &w.oracle).unwrap();

    // 1,001 usdc buys floor(500.5) = 500 sol units, worth 1,000 usdc
    ledger::route_deposit(&mut w.cellar, &w.registry, &w.oracle, 1_001).unwrap();
    let after = ledger::total_assets(&w.cellar, &w.registry, &w.oracle).unwrap();
    assert_eq!(w.cellar.holding_units(w.pool_sol), 500);
    assert_eq!(after, before + 1_000);
}

#[test]
fn deposits_into_a_debt_holding_position_are_structurally_refused() {
    let mut w = setup();
    w.cellar.holding_position = w.debt_usdc;
    assert_cellar_err(
        ledger::route_deposit(&mut w.cellar, &w.registry, &w.oracle, 1_000),
        CellarError::UserDepositsNotAllowed,
    );
}

// ============================================================================
// Registry hashing
// ============================================================================

#[test]
fn registry_lookup_matches_rederived_hashes() {
    let w = setup();
    let hash = position_hash(AdaptorKind::TokenPool, false, &pool_config(w.usdc, 0));
    assert_eq!(w.registry.position_id_of_hash(&hash), w.pool_usdc);

    let foreign = position_hash(AdaptorKind::TokenPool, false, &pool_config(w.usdc, 3));
    assert_eq!(w.registry.position_id_of_hash(&foreign), 0);
}

#[test]
fn trusting_the_same_pair_twice_returns_the_same_id() {
    let mut w = setup();
    let again = w
        .registry
        .trust_position(AdaptorKind::TokenPool, false, pool_config(w.usdc, 0))
        .unwrap();
    assert_eq!(again, w.pool_usdc);
}
