//! Trade routing across the ladder and the constant-product curve.
//!
//! # Algorithm
//!
//! Each iteration looks at the active rung on the trade's side:
//!
//! 1. Size the *reach* leg: the curve input that moves its marginal rate
//!    to the rung's rate. Until then the curve pays better than the rung.
//! 2. If the remaining trade fits inside the reach leg, the curve takes it
//!    all and routing stops.
//! 3. Otherwise the curve takes the reach leg and the rung fills next.
//! 4. An exhausted rung advances the ladder one step, creating an empty
//!    level if needed, and the loop repeats against the new rung.
//!
//! Whatever the ladder cannot take goes to the curve: a dust remainder
//! the rung cannot price, anything left once the side cannot step any
//! further, or anything left once `max_rungs` advances have been made.
//! A capped trade then walks the active rung past the new spot so the
//! ladder still brackets the curve.
//!
//! Every iteration either terminates or advances a rung, and advances are
//! capped, so routing always terminates.

use tracing::debug;

use crate::domain::{Amount, LevelSide, RungFill, TradeDirection, TradeOutcome, TradeSpec};
use crate::error::AmmError;
use crate::ladder::PriceLadder;
use crate::math::CheckedArithmetic;
use crate::traits::SwapPool;

/// Routes `spec` and checks the combined result against its bound.
///
/// Mutates `pool` and `ladder` in place; the caller snapshots them if the
/// trade may still be rolled back.
///
/// # Errors
///
/// - [`AmmError::InsufficientLiquidity`] if the trade produces no output
///   or an exact output cannot be met.
/// - [`AmmError::SlippageExceeded`] if the combined result violates the bound.
/// - Any pool, ladder, or arithmetic error.
pub(crate) fn route<P: SwapPool + ?Sized>(
    pool: &mut P,
    ladder: &mut PriceLadder,
    direction: TradeDirection,
    spec: &TradeSpec,
    max_rungs: u32,
) -> Result<TradeOutcome, AmmError> {
    let outcome = match *spec {
        TradeSpec::ExactIn { amount_in, .. } => {
            route_exact_in(pool, ladder, direction, amount_in, max_rungs)?
        }
        TradeSpec::ExactOut { amount_out, .. } => {
            route_exact_out(pool, ladder, direction, amount_out, max_rungs)?
        }
    };
    if outcome.amount_out().is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    spec.check_slippage(outcome.amount_in(), outcome.amount_out())?;
    debug!(
        %direction,
        %spec,
        amount_in = outcome.amount_in().get(),
        amount_out = outcome.amount_out().get(),
        fills = outcome.fills().len(),
        rungs_crossed = outcome.rungs_crossed(),
        "trade routed"
    );
    Ok(outcome)
}

fn amm_exact_in<P: SwapPool + ?Sized>(
    pool: &mut P,
    direction: TradeDirection,
    amount_in: Amount,
    outcome: &mut TradeOutcome,
) -> Result<(), AmmError> {
    let leg = pool.swap_exact_in(direction, amount_in)?;
    outcome.record_amm(leg.amount_in(), leg.amount_out(), leg.fee());
    Ok(())
}

fn amm_exact_out<P: SwapPool + ?Sized>(
    pool: &mut P,
    direction: TradeDirection,
    amount_out: Amount,
    outcome: &mut TradeOutcome,
) -> Result<(), AmmError> {
    let leg = pool.swap_exact_out(direction, amount_out)?;
    outcome.record_amm(leg.amount_in(), leg.amount_out(), leg.fee());
    Ok(())
}

/// Moves the active rung on `side` past the curve's spot after a capped
/// trade. A spot that no longer prices leaves the ladder as is.
fn rebracket<P: SwapPool + ?Sized>(pool: &P, ladder: &mut PriceLadder, side: LevelSide) {
    let Ok(spot) = pool.spot_price() else {
        return;
    };
    let steps = ladder.advance_past(side, spot);
    if steps > 0 {
        debug!(%side, steps, %spot, "ladder re-bracketed after rung cap");
    }
}

fn route_exact_in<P: SwapPool + ?Sized>(
    pool: &mut P,
    ladder: &mut PriceLadder,
    direction: TradeDirection,
    amount_in: Amount,
    max_rungs: u32,
) -> Result<TradeOutcome, AmmError> {
    let side = direction.level_side();
    let mut outcome = TradeOutcome::new(direction);
    let mut remaining = amount_in;

    while !remaining.is_zero() {
        let rate = ladder.current_price(side);
        let reach = pool.input_to_reach(direction, rate)?;
        if remaining <= reach {
            amm_exact_in(pool, direction, remaining, &mut outcome)?;
            break;
        }
        if !reach.is_zero() {
            amm_exact_in(pool, direction, reach, &mut outcome)?;
            remaining = remaining.safe_sub(&reach)?;
        }

        let level = ladder.current_level_mut(side)?;
        if !level.is_exhausted() {
            let fill = level.fill(remaining)?;
            if fill.output.is_zero() {
                // dust the rung cannot price
                amm_exact_in(pool, direction, remaining, &mut outcome)?;
                break;
            }
            outcome.record_fill(RungFill {
                price: rate,
                amount_in: fill.consumed,
                amount_out: fill.output,
            });
            remaining = fill.remainder;
            if !level.is_exhausted() {
                break;
            }
        }
        if remaining.is_zero() {
            break;
        }
        if outcome.rungs_crossed() >= max_rungs {
            amm_exact_in(pool, direction, remaining, &mut outcome)?;
            rebracket(pool, ladder, side);
            break;
        }
        if let Err(err) = ladder.advance(side) {
            debug!(%side, %err, "no further rung, remainder priced on curve");
            amm_exact_in(pool, direction, remaining, &mut outcome)?;
            break;
        }
        outcome.record_advance();
    }
    Ok(outcome)
}

fn route_exact_out<P: SwapPool + ?Sized>(
    pool: &mut P,
    ladder: &mut PriceLadder,
    direction: TradeDirection,
    amount_out: Amount,
    max_rungs: u32,
) -> Result<TradeOutcome, AmmError> {
    let side = direction.level_side();
    let mut outcome = TradeOutcome::new(direction);
    let mut remaining = amount_out;

    while !remaining.is_zero() {
        let rate = ladder.current_price(side);
        let reach = pool.input_to_reach(direction, rate)?;
        if !reach.is_zero() {
            let leg = pool.quote_exact_in(direction, reach)?;
            if leg.amount_out() >= remaining {
                amm_exact_out(pool, direction, remaining, &mut outcome)?;
                break;
            }
            amm_exact_in(pool, direction, reach, &mut outcome)?;
            remaining = remaining.safe_sub(&leg.amount_out())?;
        }

        let level = ladder.current_level_mut(side)?;
        let take = remaining.min(level.reserve());
        if !take.is_zero() {
            let fill = level.fill_exact_out(take)?;
            outcome.record_fill(RungFill {
                price: rate,
                amount_in: fill.consumed,
                amount_out: fill.output,
            });
            remaining = remaining.safe_sub(&take)?;
        }
        if remaining.is_zero() {
            break;
        }
        if outcome.rungs_crossed() >= max_rungs {
            amm_exact_out(pool, direction, remaining, &mut outcome)?;
            rebracket(pool, ladder, side);
            break;
        }
        if let Err(err) = ladder.advance(side) {
            debug!(%side, %err, "no further rung, remainder priced on curve");
            amm_exact_out(pool, direction, remaining, &mut outcome)?;
            break;
        }
        outcome.record_advance();
    }
    Ok(outcome)
}
