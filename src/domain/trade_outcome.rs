//! Breakdown of a routed trade.

use core::fmt;

use super::{Amount, Price, TradeDirection};

/// One fill against a fixed-price rung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RungFill {
    /// The rung's rate.
    pub price: Price,
    /// Input consumed by the rung.
    pub amount_in: Amount,
    /// Output paid by the rung.
    pub amount_out: Amount,
}

/// Result of routing a trade through the ladder and the AMM curve.
///
/// `amount_in = amm_in + Σ fills.amount_in`, and likewise for the output.
/// Fills are listed in the order they executed.
///
/// # Examples
///
/// ```
/// use hydra_ladder::domain::{Amount, TradeDirection, TradeOutcome};
///
/// let outcome = TradeOutcome::new(TradeDirection::AssetToBase);
/// assert!(outcome.amount_out().is_zero());
/// assert_eq!(outcome.rungs_crossed(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOutcome {
    direction: TradeDirection,
    amm_in: Amount,
    amm_out: Amount,
    amm_fee: Amount,
    fills: Vec<RungFill>,
    rungs_crossed: u32,
}

impl TradeOutcome {
    /// Empty outcome for a trade in `direction`.
    #[must_use]
    pub fn new(direction: TradeDirection) -> Self {
        Self {
            direction,
            amm_in: Amount::ZERO,
            amm_out: Amount::ZERO,
            amm_fee: Amount::ZERO,
            fills: Vec::new(),
            rungs_crossed: 0,
        }
    }

    /// The trade's direction.
    #[must_use]
    pub const fn direction(&self) -> TradeDirection {
        self.direction
    }

    /// Total input paid by the trader.
    pub fn amount_in(&self) -> Amount {
        let ladder = self.ladder_in().get();
        Amount::new(self.amm_in.get().saturating_add(ladder))
    }

    /// Total output received by the trader.
    pub fn amount_out(&self) -> Amount {
        let ladder = self.ladder_out().get();
        Amount::new(self.amm_out.get().saturating_add(ladder))
    }

    /// Input routed to the AMM curve, fee included.
    pub const fn amm_in(&self) -> Amount {
        self.amm_in
    }

    /// Output produced by the AMM curve.
    pub const fn amm_out(&self) -> Amount {
        self.amm_out
    }

    /// Fee retained in the AMM reserves.
    pub const fn amm_fee(&self) -> Amount {
        self.amm_fee
    }

    /// Input consumed by fixed-price rungs.
    pub fn ladder_in(&self) -> Amount {
        Amount::new(self.fills.iter().map(|f| f.amount_in.get()).sum())
    }

    /// Output paid by fixed-price rungs.
    pub fn ladder_out(&self) -> Amount {
        Amount::new(self.fills.iter().map(|f| f.amount_out.get()).sum())
    }

    /// Individual rung fills, in execution order.
    #[must_use]
    pub fn fills(&self) -> &[RungFill] {
        &self.fills
    }

    /// Number of times the active rung advanced during the trade.
    #[must_use]
    pub const fn rungs_crossed(&self) -> u32 {
        self.rungs_crossed
    }

    pub(crate) fn record_amm(&mut self, amount_in: Amount, amount_out: Amount, fee: Amount) {
        self.amm_in = Amount::new(self.amm_in.get().saturating_add(amount_in.get()));
        self.amm_out = Amount::new(self.amm_out.get().saturating_add(amount_out.get()));
        self.amm_fee = Amount::new(self.amm_fee.get().saturating_add(fee.get()));
    }

    pub(crate) fn record_fill(&mut self, fill: RungFill) {
        self.fills.push(fill);
    }

    pub(crate) fn record_advance(&mut self) {
        self.rungs_crossed = self.rungs_crossed.saturating_add(1);
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TradeOutcome(in={}, out={}, amm={}/{}, rungs={}/{})",
            self.amount_in(),
            self.amount_out(),
            self.amm_in,
            self.amm_out,
            self.fills.len(),
            self.rungs_crossed,
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn totals_combine_amm_and_fills() {
        let Ok(price) = Price::new(Price::WAD) else {
            panic!("expected price");
        };
        let mut outcome = TradeOutcome::new(TradeDirection::BaseToAsset);
        outcome.record_amm(Amount::new(10), Amount::new(9), Amount::new(1));
        outcome.record_fill(RungFill {
            price,
            amount_in: Amount::new(5),
            amount_out: Amount::new(5),
        });
        outcome.record_advance();
        assert_eq!(outcome.amount_in(), Amount::new(15));
        assert_eq!(outcome.amount_out(), Amount::new(14));
        assert_eq!(outcome.ladder_in(), Amount::new(5));
        assert_eq!(outcome.amm_fee(), Amount::new(1));
        assert_eq!(outcome.rungs_crossed(), 1);
        assert_eq!(outcome.fills().len(), 1);
        assert_eq!(
            outcome.to_string(),
            "TradeOutcome(in=15, out=14, amm=10/9, rungs=1/1)"
        );
    }
}
