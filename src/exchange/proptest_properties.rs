//! Property-based tests for routed trades.
//!
//! 1. **Routing never loses to the curve**: a routed trade pays out at
//!    least what the bare AMM would, up to per-leg rounding.
//! 2. **Level conservation**: level books and ledger custody agree.
//! 3. **Invariant growth**: `k` never decreases across a trade.
//! 4. **Ladder contiguity**: rungs stay one spread step apart.
//! 5. **Exact-out exactness**: exact-out trades deliver the amount asked.

use proptest::prelude::*;

use crate::config::ExchangeConfig;
use crate::domain::{
    AccountId, Amount, BasisPoints, CallContext, Currency, FeeTier, LevelSide, Price, Timestamp,
    TradeDirection, TradeOutcome, TradeSpec,
};
use crate::exchange::Exchange;
use crate::ledger::MemoryLedger;
use crate::pools::ConstantProductPool;
use crate::traits::{FromConfig, SwapPool, TokenLedger};

const WAD: u128 = Price::WAD;
const FUNDS: u128 = 1_000_000_000 * WAD;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn house() -> AccountId {
    AccountId::from_index(1)
}

fn seeder() -> AccountId {
    AccountId::from_index(2)
}

fn trader() -> AccountId {
    AccountId::from_index(3)
}

fn depositors() -> [AccountId; 2] {
    [AccountId::from_index(4), AccountId::from_index(5)]
}

fn ctx(who: AccountId) -> CallContext {
    CallContext::new(who, Timestamp::new(0))
}

fn config(fee_bps: u32) -> ExchangeConfig {
    let Ok(cfg) = ExchangeConfig::new(
        house(),
        ExchangeConfig::DEFAULT_PRICE_SPREAD,
        FeeTier::new(BasisPoints::new(fee_bps)),
        ExchangeConfig::DEFAULT_MAX_RUNGS_PER_TRADE,
    ) else {
        panic!("valid config");
    };
    cfg
}

fn funded_ledger() -> MemoryLedger {
    let mut ledger = MemoryLedger::new();
    for who in [seeder(), trader(), depositors()[0], depositors()[1]] {
        for currency in [Currency::Base, Currency::Asset] {
            let Ok(()) = ledger.mint(currency, who, Amount::new(FUNDS)) else {
                panic!("mint failed");
            };
            let Ok(()) = ledger.approve(currency, who, house(), Amount::MAX) else {
                panic!("approve failed");
            };
        }
    }
    ledger
}

/// A seeded exchange with `deposits[i]` placed by depositor `i` on both
/// active rungs.
fn seeded(
    fee_bps: u32,
    base: u128,
    asset: u128,
    deposits: [u128; 2],
) -> (Exchange, MemoryLedger) {
    let mut ledger = funded_ledger();
    let Ok(mut exchange) = Exchange::new(config(fee_bps)) else {
        panic!("valid exchange");
    };
    let Ok(_) = exchange.initialize(&ctx(seeder()), Amount::new(asset), Amount::new(base), &mut ledger)
    else {
        panic!("seed failed");
    };
    for side in [LevelSide::Ceiling, LevelSide::Floor] {
        let price = match side {
            LevelSide::Ceiling => exchange.current_ceiling_price(),
            LevelSide::Floor => exchange.current_floor_price(),
        };
        let Ok(price) = price else {
            panic!("active rung");
        };
        for (who, amount) in depositors().into_iter().zip(deposits) {
            if amount == 0 {
                continue;
            }
            let Ok(level) = exchange.level_mut(side, price) else {
                panic!("active level");
            };
            let (account, currency) = (level.account(), level.reserve_currency());
            let Ok(()) = ledger.approve(currency, who, account, Amount::MAX) else {
                panic!("approve failed");
            };
            let Ok(()) = level.place_order(&ctx(who), Amount::new(amount), None, &mut ledger) else {
                panic!("deposit failed");
            };
        }
    }
    (exchange, ledger)
}

fn amm_only(exchange: &Exchange, direction: TradeDirection, amount_in: Amount) -> Amount {
    let Ok(mut pool) = ConstantProductPool::from_config(exchange.config()) else {
        panic!("valid pool");
    };
    let Ok(_) = pool.initialize(seeder(), exchange.reserve_base(), exchange.reserve_asset()) else {
        panic!("seed failed");
    };
    pool.quote_exact_in(direction, amount_in)
        .map_or(Amount::ZERO, |leg| leg.amount_out())
}

/// Rounding slack for a routed trade, in output units: a few wei per leg,
/// scaled by how many output wei one input wei can buy.
fn slack(outcome: &TradeOutcome, base: u128, asset: u128) -> u128 {
    let legs = outcome.fills().len() as u128 + u128::from(outcome.rungs_crossed()) + 2;
    let per_wei = match outcome.direction() {
        TradeDirection::AssetToBase => base / asset,
        TradeDirection::BaseToAsset => asset / base,
    };
    8 * legs * (per_wei + 1)
}

fn trade(
    exchange: &mut Exchange,
    ledger: &mut MemoryLedger,
    direction: TradeDirection,
    spec: TradeSpec,
) -> Option<TradeOutcome> {
    exchange
        .execute(&ctx(trader()), direction, spec, Timestamp::MAX, trader(), ledger)
        .ok()
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Reserves between 1 and 1000 whole units.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    (1u128..=1_000u128).prop_map(|v| v * WAD)
}

/// Rung deposits, zero included.
fn deposit_strategy() -> impl Strategy<Value = u128> {
    prop_oneof![Just(0u128), (1u128..=500u128).prop_map(|v| v * WAD / 10)]
}

fn direction_strategy() -> impl Strategy<Value = TradeDirection> {
    prop_oneof![
        Just(TradeDirection::AssetToBase),
        Just(TradeDirection::BaseToAsset)
    ]
}

/// Trade size as a percentage of the input-side reserve.
fn size_strategy() -> impl Strategy<Value = u128> {
    1u128..=200u128
}

fn input_reserve(exchange: &Exchange, direction: TradeDirection) -> u128 {
    match direction {
        TradeDirection::AssetToBase => exchange.reserve_asset().get(),
        TradeDirection::BaseToAsset => exchange.reserve_base().get(),
    }
}

fn output_reserve(exchange: &Exchange, direction: TradeDirection) -> u128 {
    match direction {
        TradeDirection::AssetToBase => exchange.reserve_base().get(),
        TradeDirection::BaseToAsset => exchange.reserve_asset().get(),
    }
}

// ---------------------------------------------------------------------------
// Property 1: routing never loses to the curve
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_routing_beats_amm_only(
        base in reserve_strategy(),
        asset in reserve_strategy(),
        d0 in deposit_strategy(),
        d1 in deposit_strategy(),
        direction in direction_strategy(),
        pct in size_strategy(),
    ) {
        let (mut exchange, mut ledger) = seeded(0, base, asset, [d0, d1]);
        let amount_in = Amount::new(input_reserve(&exchange, direction) * pct / 100);
        let baseline = amm_only(&exchange, direction, amount_in);
        let Ok(spec) = TradeSpec::exact_in(amount_in, Amount::ZERO) else {
            return Ok(());
        };
        let Some(outcome) = trade(&mut exchange, &mut ledger, direction, spec) else {
            return Ok(());
        };
        let tolerance = slack(&outcome, base, asset);
        prop_assert_eq!(outcome.amount_in(), amount_in);
        prop_assert!(
            outcome.amount_out().get() + tolerance >= baseline.get(),
            "routed {} < amm-only {} (tolerance {})",
            outcome.amount_out().get(), baseline.get(), tolerance
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: level conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_level_books_match_custody(
        base in reserve_strategy(),
        asset in reserve_strategy(),
        d0 in deposit_strategy(),
        d1 in deposit_strategy(),
        direction in direction_strategy(),
        pct in size_strategy(),
        fee in 0u32..=100u32,
    ) {
        let (mut exchange, mut ledger) = seeded(fee, base, asset, [d0, d1]);
        let amount_in = Amount::new(input_reserve(&exchange, direction) * pct / 100);
        let Ok(spec) = TradeSpec::exact_in(amount_in, Amount::ZERO) else {
            return Ok(());
        };
        let _ = trade(&mut exchange, &mut ledger, direction, spec);

        let Some(ladder) = exchange.ladder() else {
            panic!("seeded exchange has a ladder");
        };
        for side in [LevelSide::Ceiling, LevelSide::Floor] {
            for level in ladder.levels(side) {
                let deposits: u128 = depositors().iter().map(|a| level.deposit_of(a).get()).sum();
                let entitled: u128 =
                    depositors().iter().map(|a| level.entitlement_of(a).get()).sum();
                prop_assert_eq!(deposits, level.reserve().get());
                prop_assert_eq!(
                    entitled,
                    level.total_proceeds().get() - level.total_withdrawn().get()
                );
                prop_assert_eq!(
                    ledger.balance_of(level.reserve_currency(), &level.account()),
                    level.reserve()
                );
                prop_assert_eq!(
                    ledger.balance_of(level.entitlement_currency(), &level.account()).get(),
                    entitled
                );
            }
        }
        prop_assert_eq!(ledger.balance_of(Currency::Base, &house()), exchange.reserve_base());
        prop_assert_eq!(ledger.balance_of(Currency::Asset, &house()), exchange.reserve_asset());
    }
}

// ---------------------------------------------------------------------------
// Property 3: invariant growth
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_invariant_non_decreasing(
        base in reserve_strategy(),
        asset in reserve_strategy(),
        d0 in deposit_strategy(),
        direction in direction_strategy(),
        pct in size_strategy(),
        fee in 0u32..=100u32,
    ) {
        let (mut exchange, mut ledger) = seeded(fee, base, asset, [d0, 0]);
        let k_before = exchange.pool().invariant();
        let amount_in = Amount::new(input_reserve(&exchange, direction) * pct / 100);
        let Ok(spec) = TradeSpec::exact_in(amount_in, Amount::ZERO) else {
            return Ok(());
        };
        if trade(&mut exchange, &mut ledger, direction, spec).is_none() {
            return Ok(());
        }
        prop_assert!(exchange.pool().invariant() >= k_before);
    }
}

// ---------------------------------------------------------------------------
// Property 4: ladder contiguity and spot bracketing
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_ladder_stays_contiguous(
        base in reserve_strategy(),
        asset in reserve_strategy(),
        d0 in deposit_strategy(),
        trades in prop::collection::vec((direction_strategy(), size_strategy()), 1..6),
    ) {
        let (mut exchange, mut ledger) = seeded(30, base, asset, [d0, 0]);
        for (direction, pct) in trades {
            let amount_in = Amount::new(input_reserve(&exchange, direction) * pct / 100);
            let Ok(spec) = TradeSpec::exact_in(amount_in, Amount::ZERO) else {
                continue;
            };
            let _ = trade(&mut exchange, &mut ledger, direction, spec);
            let Some(ladder) = exchange.ladder() else {
                panic!("seeded exchange has a ladder");
            };
            prop_assert!(ladder.is_contiguous());
            let Ok(spot) = exchange.spot_price() else {
                panic!("seeded exchange has a spot price");
            };
            prop_assert!(ladder.current_floor_price() < spot);
            prop_assert!(spot < ladder.current_ceiling_price());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: exact-out exactness
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_exact_out_delivers_requested(
        base in reserve_strategy(),
        asset in reserve_strategy(),
        d0 in deposit_strategy(),
        d1 in deposit_strategy(),
        direction in direction_strategy(),
        pct in 1u128..=50u128,
        fee in 0u32..=100u32,
    ) {
        let (mut exchange, mut ledger) = seeded(fee, base, asset, [d0, d1]);
        let amount_out = Amount::new(output_reserve(&exchange, direction) * pct / 100);
        let Ok(spec) = TradeSpec::exact_out(amount_out, Amount::MAX) else {
            return Ok(());
        };
        let before = ledger.balance_of(direction.output_currency(), &trader());
        let Some(outcome) = trade(&mut exchange, &mut ledger, direction, spec) else {
            return Ok(());
        };
        prop_assert_eq!(outcome.amount_out(), amount_out);
        prop_assert_eq!(
            ledger.balance_of(direction.output_currency(), &trader()).get(),
            before.get() + amount_out.get()
        );
    }
}
