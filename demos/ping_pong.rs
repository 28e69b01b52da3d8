//! Ladder-assisted trading example.
//!
//! Seeds an exchange at spot 10, puts maker liquidity on the first ceiling
//! and floor, then pushes the price up and back down. Each trade prints
//! how much the curve and the rungs contributed.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=hydra_ladder=debug cargo run --example ping_pong
//! ```

use hydra_ladder::config::ExchangeConfig;
use hydra_ladder::domain::{
    AccountId, Amount, BasisPoints, CallContext, Currency, FeeTier, LevelSide, Price, Timestamp,
    TradeOutcome,
};
use hydra_ladder::exchange::Exchange;
use hydra_ladder::ledger::MemoryLedger;
use hydra_ladder::traits::TokenLedger;

const WAD: u128 = Price::WAD;

fn units(raw: Amount) -> String {
    format!("{}.{:06}", raw.get() / WAD, raw.get() % WAD / 1_000_000_000_000)
}

fn report(label: &str, outcome: &TradeOutcome) {
    println!("\n--- {label} ---");
    println!("  Amount in:   {}", units(outcome.amount_in()));
    println!("  Amount out:  {}", units(outcome.amount_out()));
    println!("  AMM leg:     {} -> {}", units(outcome.amm_in()), units(outcome.amm_out()));
    println!("  AMM fee:     {}", units(outcome.amm_fee()));
    for fill in outcome.fills() {
        println!(
            "  Rung {}: {} -> {}",
            fill.price,
            units(fill.amount_in),
            units(fill.amount_out)
        );
    }
    println!("  Rungs crossed: {}", outcome.rungs_crossed());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    println!("=== Hybrid AMM + fixed-price ladder ===");

    // ── 1. Accounts and balances ────────────────────────────────────────
    let house = AccountId::from_index(1);
    let lp = AccountId::from_index(2);
    let maker = AccountId::from_index(3);
    let taker = AccountId::from_index(4);
    let now = |who| CallContext::new(who, Timestamp::new(1_700_000_000));

    let mut ledger = MemoryLedger::new();
    for who in [lp, maker, taker] {
        for currency in [Currency::Base, Currency::Asset] {
            ledger.mint(currency, who, Amount::new(10_000 * WAD))?;
            ledger.approve(currency, who, house, Amount::MAX)?;
        }
    }

    // ── 2. Exchange with a 0.30% fee and 2.5% rung spacing ──────────────
    let config = ExchangeConfig::new(
        house,
        BasisPoints::new(250),
        FeeTier::new(BasisPoints::new(30)),
        ExchangeConfig::DEFAULT_MAX_RUNGS_PER_TRADE,
    )?;
    let mut exchange = Exchange::new(config)?;
    let shares = exchange.initialize(
        &now(lp),
        Amount::new(1_000 * WAD),
        Amount::new(100 * WAD),
        &mut ledger,
    )?;
    println!("\nSeeded 1000 asset / 100 base, {} shares", units(Amount::new(shares.get())));
    println!("  Spot:     {}", exchange.spot_price()?);
    println!("  Ceiling:  {}", exchange.current_ceiling_price()?);
    println!("  Floor:    {}", exchange.current_floor_price()?);

    // ── 3. Maker liquidity on both active rungs ─────────────────────────
    for (side, amount) in [(LevelSide::Ceiling, 20 * WAD), (LevelSide::Floor, 200 * WAD)] {
        let price = match side {
            LevelSide::Ceiling => exchange.current_ceiling_price()?,
            LevelSide::Floor => exchange.current_floor_price()?,
        };
        let level = exchange.level_mut(side, price)?;
        ledger.approve(level.reserve_currency(), maker, level.account(), Amount::MAX)?;
        level.place_order(&now(maker), Amount::new(amount), None, &mut ledger)?;
        println!("Maker placed {} on the {side} at {price}", units(Amount::new(amount)));
    }

    // ── 4. Push the price up, then back down ────────────────────────────
    let up = exchange.asset_to_base_input(
        &now(taker),
        Amount::new(300 * WAD),
        Amount::ZERO,
        Timestamp::MAX,
        taker,
        &mut ledger,
    )?;
    report("Buy base with 300 asset", &up);
    println!("  Spot now:    {}", exchange.spot_price()?);

    let down = exchange.base_to_asset_input(
        &now(taker),
        Amount::new(40 * WAD),
        Amount::ZERO,
        Timestamp::MAX,
        taker,
        &mut ledger,
    )?;
    report("Sell 40 base", &down);
    println!("  Spot now:    {}", exchange.spot_price()?);

    // ── 5. Maker collects what the ceiling earned ───────────────────────
    let ceiling = match up.fills().first() {
        Some(fill) => fill.price,
        None => return Ok(()),
    };
    let level = exchange.ceiling_mut(ceiling)?;
    let owed = level.entitlement_of(&maker);
    if !owed.is_zero() {
        level.withdraw(&now(maker), owed, &mut ledger)?;
    }
    println!(
        "\nMaker withdrew {} asset; ledger balance {}",
        units(owed),
        units(ledger.balance_of(Currency::Asset, &maker))
    );

    Ok(())
}
