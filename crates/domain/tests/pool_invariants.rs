//! Property tests for the pool engine invariants.
//!
//! Increase cases: PROPTEST_CASES=5000 cargo test -p cpamm-domain --test pool_invariants

use cpamm_domain::prelude::*;
use primitive_types::U256;
use proptest::prelude::*;
use rust_decimal::Decimal;

const UNIT: u128 = 1_000_000_000_000_000_000;

fn amount(raw: u128) -> TokenAmount {
    TokenAmount::new(U256::from(raw))
}

fn pool_with(balance_a: u128, balance_b: u128, total_lp: u128, fee_tenths: u32) -> Pool {
    Pool::new(
        Token::new("Alpha", "ALPHA", 18),
        Token::new("Beta", "BETA", 18),
        Percentage::new(Decimal::new(fee_tenths as i64, 1)),
    )
    .unwrap()
    .with_liquidity(amount(balance_a), amount(balance_b), amount(total_lp))
    .unwrap()
}

fn reserve() -> impl Strategy<Value = u128> {
    UNIT / 1000..1_000_000_000 * UNIT
}

fn trade() -> impl Strategy<Value = u128> {
    1u128..10_000_000 * UNIT
}

fn direction() -> impl Strategy<Value = SwapDirection> {
    prop_oneof![Just(SwapDirection::AToB), Just(SwapDirection::BToA)]
}

proptest! {
    #[test]
    fn swap_never_decreases_k(
        a in reserve(),
        b in reserve(),
        input in trade(),
        fee in 0u32..1000,
        dir in direction(),
    ) {
        let pool = pool_with(a, b, UNIT, fee);
        let outcome = engine::apply_swap(&pool, amount(input), dir);

        prop_assert!(outcome.pool.k() >= pool.k());
        if fee > 0 {
            prop_assert!(outcome.pool.k() > pool.k());
        }
        prop_assert_eq!(outcome.pool.total_lp_tokens(), pool.total_lp_tokens());
    }

    #[test]
    fn swap_output_below_opposite_reserve(
        a in reserve(),
        b in reserve(),
        input in 1u128..u128::MAX,
        fee in 0u32..1000,
        dir in direction(),
    ) {
        let pool = pool_with(a, b, UNIT, fee);
        let (_, reserve_out) = pool.reserves(dir);
        let out = engine::quote_swap_output(&pool, amount(input), dir);

        prop_assert!(out < reserve_out);
        let after = engine::apply_swap(&pool, amount(input), dir).pool;
        prop_assert!(!after.balance_a().is_zero() && !after.balance_b().is_zero());
    }

    #[test]
    fn add_then_remove_round_trips(
        a in reserve(),
        b in reserve(),
        lp in reserve(),
        deposit in trade(),
    ) {
        let pool = pool_with(a, b, lp, 3);
        let required = engine::quote_required_counterpart(&pool, amount(deposit));
        let added = engine::apply_add_liquidity(&pool, amount(deposit), required);
        prop_assume!(!added.lp_minted.is_zero());

        prop_assert!(added.pool.total_lp_tokens() > pool.total_lp_tokens());

        let removed = engine::apply_remove_liquidity(&added.pool, added.lp_minted);
        prop_assert_eq!(removed.pool.total_lp_tokens(), pool.total_lp_tokens());

        // Rounding favours the pool: the depositor never gets back more than
        // they put in, and never loses more than a couple of base units per
        // share of precision lost.
        prop_assert!(removed.amount_a <= amount(deposit));
        prop_assert!(removed.amount_b <= required);
        prop_assert!(removed.pool.balance_a() >= pool.balance_a());
        prop_assert!(removed.pool.balance_b() >= pool.balance_b());

        let leak_a = removed.pool.balance_a().0 - pool.balance_a().0;
        let leak_b = removed.pool.balance_b().0 - pool.balance_b().0;
        let tolerance_a = pool.balance_a().0 / pool.total_lp_tokens().0 + U256::from(2u8);
        let tolerance_b = pool.balance_b().0 / pool.total_lp_tokens().0 + U256::from(2u8);
        prop_assert!(leak_a <= tolerance_a, "leak_a {} > {}", leak_a, tolerance_a);
        prop_assert!(leak_b <= tolerance_b, "leak_b {} > {}", leak_b, tolerance_b);
    }

    #[test]
    fn remove_keeps_backing_per_share(
        a in reserve(),
        b in reserve(),
        lp in reserve(),
        burn_bps in 1u128..10_000,
    ) {
        let pool = pool_with(a, b, lp, 3);
        let burn = amount(lp * burn_bps / 10_000);
        prop_assume!(!burn.is_zero());

        let outcome = engine::apply_remove_liquidity(&pool, burn);
        prop_assert!(outcome.pool.total_lp_tokens() < pool.total_lp_tokens());

        // balance / supply never drops: (a' * lp) >= (a * lp')
        let remaining = outcome.pool.total_lp_tokens();
        if !remaining.is_zero() {
            prop_assert!(
                outcome.pool.balance_a().0.full_mul(pool.total_lp_tokens().0)
                    >= pool.balance_a().0.full_mul(remaining.0)
            );
            prop_assert!(
                outcome.pool.balance_b().0.full_mul(pool.total_lp_tokens().0)
                    >= pool.balance_b().0.full_mul(remaining.0)
            );
            prop_assert!(!outcome.pool.balance_a().is_zero());
            prop_assert!(!outcome.pool.balance_b().is_zero());
        }
    }

    #[test]
    fn full_withdrawal_leaves_nothing(
        a in reserve(),
        b in reserve(),
        lp in reserve(),
        swaps in prop::collection::vec((trade(), direction()), 0..8),
    ) {
        let mut pool = pool_with(a, b, lp, 3);
        for (input, dir) in swaps {
            pool = engine::apply_swap(&pool, amount(input), dir).pool;
        }

        let outcome = engine::apply_remove_liquidity(&pool, pool.total_lp_tokens());
        prop_assert!(outcome.pool.balance_a().is_zero());
        prop_assert!(outcome.pool.balance_b().is_zero());
        prop_assert!(outcome.pool.total_lp_tokens().is_zero());
        prop_assert_eq!(outcome.amount_a, pool.balance_a());
        prop_assert_eq!(outcome.amount_b, pool.balance_b());
    }

    #[test]
    fn invalid_strings_never_change_the_pool(input in "[^0-9.]*|-[0-9]+(\\.[0-9]+)?|0(\\.0*)?") {
        let pool = pool_with(1000 * UNIT, 1000 * UNIT, 1000 * UNIT, 3);

        prop_assert!(engine::quote_swap_output(&pool, input.as_str(), SwapDirection::AToB).is_zero());
        prop_assert_eq!(engine::apply_swap(&pool, input.as_str(), SwapDirection::BToA).pool, pool.clone());
        prop_assert_eq!(engine::apply_add_liquidity(&pool, input.as_str(), "1").pool, pool.clone());
        prop_assert_eq!(engine::apply_remove_liquidity(&pool, input.as_str()).pool, pool.clone());
        prop_assert_eq!(engine::quote_remove_liquidity(&pool, input.as_str()), WithdrawalQuote::zero());
    }
}

#[test]
fn repeated_small_swaps_keep_k_monotonic() {
    let mut pool = pool_with(1000 * UNIT, 1000 * UNIT, 1000 * UNIT, 3);
    let mut last_k = pool.k();

    for i in 0..500 {
        let dir = if i % 2 == 0 {
            SwapDirection::AToB
        } else {
            SwapDirection::BToA
        };
        pool = engine::apply_swap(&pool, "0.000001", dir).pool;
        assert!(pool.k() > last_k);
        last_k = pool.k();
    }
}
