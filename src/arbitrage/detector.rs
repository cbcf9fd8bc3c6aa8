//! Two-way arbitrage detection over an odds snapshot.
//!
//! For every match, each unordered bookmaker pair `(i, j)` with `i < j` is
//! evaluated by backing outcome slot 0 at bookmaker `i` and outcome slot 1
//! at bookmaker `j`. Bad records are skipped where they occur and never
//! abort the rest of the pass.

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::calculator::{arbitrage_value, is_profitable, profit_margin_percent, Opportunity};
use crate::error::ArbitrageError;
use crate::odds::{Match, OddsSnapshot, Quote};

/// Outcome slot read from the first quote of a pair.
pub const SLOT_A: usize = 0;
/// Outcome slot read from the second quote of a pair.
pub const SLOT_B: usize = 1;

/// Result of scanning one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionSummary {
    /// Matches examined.
    pub matches_scanned: usize,
    /// Matches skipped for too few or malformed quotes.
    pub matches_skipped: usize,
    /// Bookmaker pairs evaluated.
    pub pairs_evaluated: usize,
    /// Pairs skipped for non-positive prices.
    pub pairs_skipped: usize,
    /// Profitable pairs, in match order then pair order.
    pub opportunities: Vec<Opportunity>,
}

/// Result of scanning one match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchScan {
    /// Bookmaker pairs evaluated.
    pub pairs_evaluated: usize,
    /// Pairs skipped for non-positive prices.
    pub pairs_skipped: usize,
    /// Profitable pairs, in pair order.
    pub opportunities: Vec<Opportunity>,
}

/// Detect every two-way arbitrage opportunity in a snapshot.
pub fn detect(snapshot: &OddsSnapshot) -> Vec<Opportunity> {
    detect_with_summary(snapshot).opportunities
}

/// Detect opportunities, failing only when no snapshot was supplied.
pub fn try_detect(snapshot: Option<&OddsSnapshot>) -> Result<Vec<Opportunity>, ArbitrageError> {
    snapshot
        .map(detect)
        .ok_or_else(|| ArbitrageError::InvalidSnapshot("no snapshot supplied".to_string()))
}

/// Detect opportunities and report how much of the snapshot was usable.
#[instrument(skip(snapshot), fields(sport = %snapshot.sport, matches = snapshot.len()))]
pub fn detect_with_summary(snapshot: &OddsSnapshot) -> DetectionSummary {
    let mut summary = DetectionSummary::default();

    for m in snapshot.matches() {
        summary.matches_scanned += 1;

        match detect_match(m) {
            Ok(scan) => {
                summary.pairs_evaluated += scan.pairs_evaluated;
                summary.pairs_skipped += scan.pairs_skipped;
                summary.opportunities.extend(scan.opportunities);
            }
            Err(e) => {
                summary.matches_skipped += 1;
                debug!(event = %m.label(), error = %e, "Skipping match");
            }
        }
    }

    debug!(
        scanned = summary.matches_scanned,
        skipped = summary.matches_skipped,
        pairs = summary.pairs_evaluated,
        found = summary.opportunities.len(),
        "Detection pass complete"
    );

    summary
}

/// Scan one match.
///
/// Fails with [`ArbitrageError::InsufficientQuotes`] or
/// [`ArbitrageError::MalformedQuote`] when the match has to be skipped as a
/// whole. A pair with a non-positive price is skipped on its own.
pub fn detect_match(m: &Match) -> Result<MatchScan, ArbitrageError> {
    if m.quotes.len() < 2 {
        return Err(ArbitrageError::InsufficientQuotes {
            available: m.quotes.len(),
        });
    }

    for quote in &m.quotes {
        quote.validate()?;
    }

    let mut scan = MatchScan::default();

    for (i, j) in quote_pairs(m.quotes.len()) {
        scan.pairs_evaluated += 1;

        match evaluate_pair(m, &m.quotes[i], &m.quotes[j]) {
            Ok(Some(opportunity)) => scan.opportunities.push(opportunity),
            Ok(None) => {}
            Err(e) => {
                scan.pairs_skipped += 1;
                debug!(event = %m.label(), error = %e, "Skipping pair");
            }
        }
    }

    Ok(scan)
}

/// Every unordered index pair `(i, j)` with `i < j`, in lexicographic order.
pub fn quote_pairs(count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..count).flat_map(move |i| (i + 1..count).map(move |j| (i, j)))
}

/// Evaluate slot 0 of `first` against slot 1 of `second`.
///
/// Both legs must come from different bookmakers.
pub fn evaluate_pair(
    m: &Match,
    first: &Quote,
    second: &Quote,
) -> Result<Option<Opportunity>, ArbitrageError> {
    if first.bookmaker == second.bookmaker {
        return Err(ArbitrageError::malformed(
            second.bookmaker.clone(),
            "bookmaker quoted twice for the same match",
        ));
    }

    let price_a = first.price(SLOT_A).ok_or_else(|| {
        ArbitrageError::malformed(
            first.bookmaker.clone(),
            format!("missing outcome slot {}", SLOT_A),
        )
    })?;
    let price_b = second.price(SLOT_B).ok_or_else(|| {
        ArbitrageError::malformed(
            second.bookmaker.clone(),
            format!("missing outcome slot {}", SLOT_B),
        )
    })?;

    let value = arbitrage_value(price_a, price_b).ok_or_else(|| {
        let culprit = if price_a <= Decimal::ZERO {
            first
        } else {
            second
        };
        ArbitrageError::malformed(
            culprit.bookmaker.clone(),
            format!("non-positive price ({} / {})", price_a, price_b),
        )
    })?;

    if !is_profitable(value) {
        return Ok(None);
    }

    Ok(Some(Opportunity {
        match_id: m.id.clone(),
        participants: m.participants.clone(),
        bookmaker_a: first.bookmaker.clone(),
        bookmaker_b: second.bookmaker.clone(),
        price_a,
        price_b,
        profit_margin_percent: profit_margin_percent(value),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::MatchBuilder;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn quote_pairs_enumerates_in_order() {
        let pairs: Vec<_> = quote_pairs(4).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(quote_pairs(1).count(), 0);
        assert_eq!(quote_pairs(0).count(), 0);
    }

    #[test]
    fn detect_match_finds_crossed_slots() {
        let m = MatchBuilder::new("Arsenal", "Chelsea")
            .quote("A", &[dec!(2.10), dec!(2.00)])
            .quote("B", &[dec!(2.05), dec!(2.20)])
            .build();

        let scan = detect_match(&m).unwrap();
        assert_eq!(scan.pairs_evaluated, 1);
        assert_eq!(scan.opportunities.len(), 1);

        let opp = &scan.opportunities[0];
        assert_eq!(opp.bookmaker_a, "A");
        assert_eq!(opp.bookmaker_b, "B");
        assert_eq!(opp.price_a, dec!(2.10));
        assert_eq!(opp.price_b, dec!(2.20));
        assert_eq!(opp.profit_margin_percent, dec!(6.93));
    }

    #[test]
    fn detect_match_ignores_reverse_direction() {
        // B slot 0 (3.00) against A slot 1 (3.00) would be profitable, but
        // only the first quote's slot 0 is paired with the second's slot 1.
        let m = MatchBuilder::new("X", "Y")
            .quote("A", &[dec!(1.20), dec!(3.00)])
            .quote("B", &[dec!(3.00), dec!(1.20)])
            .build();

        assert!(detect_match(&m).unwrap().opportunities.is_empty());
    }

    #[test]
    fn detect_match_rejects_single_quote() {
        let m = MatchBuilder::new("X", "Y")
            .quote("A", &[dec!(2.10), dec!(2.20)])
            .build();

        assert_eq!(
            detect_match(&m).unwrap_err(),
            ArbitrageError::InsufficientQuotes { available: 1 }
        );
    }

    #[test]
    fn detect_match_rejects_missing_slot() {
        let m = MatchBuilder::new("X", "Y")
            .quote("A", &[dec!(2.10), dec!(2.20)])
            .quote("B", &[dec!(2.10), dec!(2.20)])
            .quote("C", &[dec!(5.00)])
            .build();

        assert!(matches!(
            detect_match(&m),
            Err(ArbitrageError::MalformedQuote { .. })
        ));
    }

    #[test]
    fn non_positive_price_skips_only_its_pairs() {
        let m = MatchBuilder::new("X", "Y")
            .quote("A", &[dec!(2.10), dec!(2.00)])
            .quote("Bad", &[dec!(2.00), dec!(0)])
            .quote("B", &[dec!(2.05), dec!(2.20)])
            .build();

        let scan = detect_match(&m).unwrap();
        assert_eq!(scan.pairs_evaluated, 3);
        // (A, Bad) reads Bad's zero slot 1; (Bad, B) only reads Bad's slot 0.
        assert_eq!(scan.pairs_skipped, 1);

        let pairs: Vec<_> = scan
            .opportunities
            .iter()
            .map(|o| (o.bookmaker_a.as_str(), o.bookmaker_b.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "B"), ("Bad", "B")]);
    }

    #[test]
    fn duplicate_bookmaker_skips_only_its_pair() {
        let m = MatchBuilder::new("X", "Y")
            .quote("A", &[dec!(2.50), dec!(2.50)])
            .quote("A", &[dec!(2.50), dec!(2.50)])
            .quote("B", &[dec!(2.50), dec!(2.50)])
            .build();

        let scan = detect_match(&m).unwrap();
        assert_eq!(scan.pairs_evaluated, 3);
        assert_eq!(scan.pairs_skipped, 1);

        let pairs: Vec<_> = scan
            .opportunities
            .iter()
            .map(|o| (o.bookmaker_a.as_str(), o.bookmaker_b.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "B"), ("A", "B")]);
    }

    #[test]
    fn summary_counts_skipped_matches() {
        let snapshot = crate::odds::SnapshotBuilder::new("soccer_epl")
            .with_match(MatchBuilder::new("X", "Y").build())
            .with_match(
                MatchBuilder::new("Arsenal", "Chelsea")
                    .quote("A", &[dec!(2.10), dec!(2.00)])
                    .quote("B", &[dec!(2.05), dec!(2.20)])
                    .build(),
            )
            .build();

        let summary = detect_with_summary(&snapshot);
        assert_eq!(summary.matches_scanned, 2);
        assert_eq!(summary.matches_skipped, 1);
        assert_eq!(summary.pairs_evaluated, 1);
        assert_eq!(summary.opportunities.len(), 1);
    }

    #[test]
    fn try_detect_requires_snapshot() {
        assert!(matches!(
            try_detect(None),
            Err(ArbitrageError::InvalidSnapshot(_))
        ));

        let empty = crate::odds::SnapshotBuilder::new("soccer_epl").build();
        assert!(try_detect(Some(&empty)).unwrap().is_empty());
    }
}
