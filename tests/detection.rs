//! Detection behaviour over the public API.

use oddsarb::arbitrage::{arbitrage_value, detect, profit_margin_percent, try_detect};
use oddsarb::error::ArbitrageError;
use oddsarb::odds::{Match, MatchBuilder, OddsSnapshot, Quote, SnapshotBuilder};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::macros::datetime;

fn two_way(home: &str, away: &str, quotes: &[(&str, [Decimal; 2])]) -> Match {
    quotes
        .iter()
        .fold(MatchBuilder::new(home, away), |builder, (bookmaker, prices)| {
            builder.quote(*bookmaker, prices)
        })
        .build()
}

fn mixed_snapshot() -> OddsSnapshot {
    OddsSnapshot::at(
        "soccer_epl",
        datetime!(2024-08-17 14:00 UTC),
        vec![
            two_way(
                "Arsenal",
                "Chelsea",
                &[
                    ("A", [dec!(2.10), dec!(2.00)]),
                    ("B", [dec!(2.05), dec!(2.20)]),
                ],
            ),
            two_way("Leeds", "Everton", &[("A", [dec!(3.00), dec!(3.00)])]),
            two_way(
                "Spurs",
                "Fulham",
                &[
                    ("A", [dec!(2.50), dec!(1.90)]),
                    ("B", [dec!(1.60), dec!(2.10)]),
                    ("C", [dec!(2.30), dec!(2.05)]),
                ],
            ),
        ],
    )
}

#[test]
fn profitable_pair_yields_margin() {
    let snapshot = SnapshotBuilder::new("soccer_epl")
        .with_match(two_way(
            "Arsenal",
            "Chelsea",
            &[
                ("A", [dec!(2.10), dec!(2.00)]),
                ("B", [dec!(2.05), dec!(2.20)]),
            ],
        ))
        .build();

    let opportunities = detect(&snapshot);

    assert_eq!(opportunities.len(), 1);
    let opp = &opportunities[0];
    assert_eq!(opp.participants, vec!["Arsenal".to_string(), "Chelsea".to_string()]);
    assert_eq!((opp.bookmaker_a.as_str(), opp.bookmaker_b.as_str()), ("A", "B"));
    assert_eq!((opp.price_a, opp.price_b), (dec!(2.10), dec!(2.20)));
    assert_eq!(opp.profit_margin_percent, dec!(6.93));
}

#[test]
fn unprofitable_pair_yields_nothing() {
    let snapshot = SnapshotBuilder::new("soccer_epl")
        .with_match(two_way(
            "X",
            "Y",
            &[
                ("A", [dec!(1.50), dec!(2.80)]),
                ("B", [dec!(1.55), dec!(2.70)]),
            ],
        ))
        .build();

    assert!(detect(&snapshot).is_empty());
}

#[test]
fn three_bookmakers_evaluate_three_pairs_in_order() {
    // Every slot-0 price is 2.50 and every slot-1 price 2.50, so all pairs pay.
    let snapshot = SnapshotBuilder::new("soccer_epl")
        .with_match(two_way(
            "X",
            "Y",
            &[
                ("A", [dec!(2.50), dec!(2.50)]),
                ("B", [dec!(2.50), dec!(2.50)]),
                ("C", [dec!(2.50), dec!(2.50)]),
            ],
        ))
        .build();

    let pairs: Vec<_> = detect(&snapshot)
        .into_iter()
        .map(|o| (o.bookmaker_a, o.bookmaker_b))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("A".to_string(), "B".to_string()),
            ("A".to_string(), "C".to_string()),
            ("B".to_string(), "C".to_string()),
        ]
    );
}

#[test]
fn empty_snapshot_yields_nothing() {
    let snapshot = SnapshotBuilder::new("soccer_epl").build();
    assert!(detect(&snapshot).is_empty());
    assert_eq!(try_detect(Some(&snapshot)), Ok(Vec::new()));
}

#[test]
fn missing_snapshot_is_the_only_hard_failure() {
    assert!(matches!(
        try_detect(None),
        Err(ArbitrageError::InvalidSnapshot(_))
    ));
}

#[test]
fn single_quote_matches_yield_nothing() {
    let snapshot = SnapshotBuilder::new("soccer_epl")
        .with_match(two_way("X", "Y", &[("A", [dec!(5.00), dec!(5.00)])]))
        .with_match(MatchBuilder::new("Z", "W").build())
        .build();

    assert!(detect(&snapshot).is_empty());
}

#[test]
fn opportunities_follow_match_then_pair_order() {
    let labels: Vec<_> = detect(&mixed_snapshot())
        .into_iter()
        .map(|o| format!("{}:{}-{}", o.label(), o.bookmaker_a, o.bookmaker_b))
        .collect();

    assert_eq!(
        labels,
        vec![
            "Arsenal vs Chelsea:A-B",
            "Spurs vs Fulham:A-B",
            "Spurs vs Fulham:A-C",
        ]
    );
}

#[test]
fn every_opportunity_matches_its_prices() {
    for opp in detect(&mixed_snapshot()) {
        let value = arbitrage_value(opp.price_a, opp.price_b).unwrap();
        assert!(value < Decimal::ONE);
        assert_eq!(opp.profit_margin_percent, profit_margin_percent(value));
        assert!(opp.profit_margin_percent >= Decimal::ZERO);
        assert!(opp.profit_margin_percent <= Decimal::ONE_HUNDRED);
        assert_ne!(opp.bookmaker_a, opp.bookmaker_b);
    }
}

#[test]
fn margins_match_hand_computed_values() {
    let margins: Vec<_> = detect(&mixed_snapshot())
        .into_iter()
        .map(|o| (o.bookmaker_a, o.bookmaker_b, o.profit_margin_percent))
        .collect();

    assert_eq!(
        margins,
        vec![
            ("A".to_string(), "B".to_string(), dec!(6.93)),
            ("A".to_string(), "B".to_string(), dec!(12.38)),
            ("A".to_string(), "C".to_string(), dec!(11.22)),
        ]
    );
}

#[test]
fn duplicate_bookmaker_never_pairs_with_itself() {
    let snapshot = SnapshotBuilder::new("soccer_epl")
        .with_match(two_way(
            "X",
            "Y",
            &[
                ("A", [dec!(2.50), dec!(2.50)]),
                ("A", [dec!(2.50), dec!(2.50)]),
            ],
        ))
        .build();

    assert!(detect(&snapshot).is_empty());
}

#[test]
fn detection_is_deterministic() {
    let snapshot = mixed_snapshot();
    assert_eq!(detect(&snapshot), detect(&snapshot));
}

#[test]
fn non_positive_price_does_not_hide_valid_pairs() {
    let clean = two_way(
        "Arsenal",
        "Chelsea",
        &[
            ("A", [dec!(2.10), dec!(2.00)]),
            ("B", [dec!(2.05), dec!(2.20)]),
        ],
    );
    let mut dirty = clean.clone();
    dirty.quotes.insert(
        1,
        Quote {
            bookmaker: "Broken".to_string(),
            outcome_prices: vec![dec!(-1), dec!(0)],
        },
    );

    let snapshot = SnapshotBuilder::new("soccer_epl").with_match(dirty).build();
    let opportunities = detect(&snapshot);

    assert_eq!(opportunities.len(), 1);
    assert_eq!(opportunities[0].bookmaker_a, "A");
    assert_eq!(opportunities[0].bookmaker_b, "B");
    assert_eq!(opportunities[0].profit_margin_percent, dec!(6.93));
}

#[test]
fn structurally_malformed_match_does_not_affect_others() {
    let broken = two_way(
        "Leeds",
        "Everton",
        &[
            ("A", [dec!(3.00), dec!(3.00)]),
            ("", [dec!(3.00), dec!(3.00)]),
        ],
    );

    let snapshot = SnapshotBuilder::new("soccer_epl")
        .with_match(broken)
        .with_match(two_way(
            "Arsenal",
            "Chelsea",
            &[
                ("A", [dec!(2.10), dec!(2.00)]),
                ("B", [dec!(2.05), dec!(2.20)]),
            ],
        ))
        .build();

    let opportunities = detect(&snapshot);
    assert_eq!(opportunities.len(), 1);
    assert_eq!(opportunities[0].label(), "Arsenal vs Chelsea");
}

#[test]
fn detection_runs_concurrently_on_independent_snapshots() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| detect(&mixed_snapshot())))
        .collect();

    let expected = detect(&mixed_snapshot());
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
