//! Arbitrage value and profit margin calculations.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Decimal places kept on the profit margin.
pub const MARGIN_DECIMAL_PLACES: u32 = 2;

/// A profitable two-bookmaker combination.
///
/// Backing outcome slot 0 at `bookmaker_a` and outcome slot 1 at
/// `bookmaker_b` in proportion to the inverse prices returns
/// `profit_margin_percent` whichever outcome happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opportunity {
    /// Feed identifier of the match, when known.
    pub match_id: Option<String>,
    /// Competitors, copied from the match.
    pub participants: Vec<String>,
    /// Bookmaker quoting outcome slot 0.
    pub bookmaker_a: String,
    /// Bookmaker quoting outcome slot 1.
    pub bookmaker_b: String,
    /// Slot 0 price at `bookmaker_a`.
    pub price_a: Decimal,
    /// Slot 1 price at `bookmaker_b`.
    pub price_b: Decimal,
    /// `(1 - arbitrage value) * 100`, rounded to 2 places.
    pub profit_margin_percent: Decimal,
}

impl Opportunity {
    /// Recompute the arbitrage value from the stored prices.
    pub fn arbitrage_value(&self) -> Option<Decimal> {
        arbitrage_value(self.price_a, self.price_b)
    }

    /// Participants joined for display.
    pub fn label(&self) -> String {
        self.participants.join(" vs ")
    }
}

/// Sum of implied probabilities: `1/price_a + 1/price_b`.
///
/// Returns `None` for non-positive prices or if the arithmetic overflows.
pub fn arbitrage_value(price_a: Decimal, price_b: Decimal) -> Option<Decimal> {
    if price_a <= Decimal::ZERO || price_b <= Decimal::ZERO {
        return None;
    }

    let implied_a = Decimal::ONE.checked_div(price_a)?;
    let implied_b = Decimal::ONE.checked_div(price_b)?;
    implied_a.checked_add(implied_b)
}

/// Profit margin in percent for an arbitrage value, rounded half-to-even.
pub fn profit_margin_percent(arbitrage_value: Decimal) -> Decimal {
    ((Decimal::ONE - arbitrage_value) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(MARGIN_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Whether an arbitrage value leaves a guaranteed profit.
pub fn is_profitable(arbitrage_value: Decimal) -> bool {
    arbitrage_value < Decimal::ONE
}

/// Sort opportunities by margin, best first, keeping detection order on ties.
pub fn sort_by_margin(opportunities: &mut [Opportunity]) {
    opportunities.sort_by(|a, b| b.profit_margin_percent.cmp(&a.profit_margin_percent));
}
