//! Text rendering for alerts and the console dashboard.

use crate::arbitrage::Opportunity;

/// Banner shown when a cycle finds nothing.
pub const NO_OPPORTUNITIES: &str = "No arbitrage opportunities at the moment. Try again later.";

/// Alert subject line.
pub fn alert_subject(opp: &Opportunity) -> String {
    format!("Arbitrage Alert: {}", opp.label())
}

/// Alert body: match, margin, then each leg's price.
pub fn alert_body(opp: &Opportunity) -> String {
    format!(
        "Match: {}\nProfit: {}%\n{} odds: {}\n{} odds: {}",
        opp.label(),
        opp.profit_margin_percent,
        opp.bookmaker_a,
        opp.price_a,
        opp.bookmaker_b,
        opp.price_b,
    )
}

/// Summary line for a cycle.
pub fn summary_line(count: usize) -> String {
    if count == 0 {
        NO_OPPORTUNITIES.to_string()
    } else {
        format!("{} arbitrage opportunities found!", count)
    }
}

/// Dashboard block for a cycle.
pub fn dashboard_lines(opportunities: &[Opportunity]) -> Vec<String> {
    let mut lines = vec![summary_line(opportunities.len())];

    for opp in opportunities {
        lines.push(format!("### {}", opp.label()));
        lines.push(format!(
            "- Bookmakers: {} & {}",
            opp.bookmaker_a, opp.bookmaker_b
        ));
        lines.push(format!("- Odds: {} / {}", opp.price_a, opp.price_b));
        lines.push(format!("- Profit Margin: {}%", opp.profit_margin_percent));
        lines.push("---".to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn opportunity() -> Opportunity {
        Opportunity {
            match_id: None,
            participants: vec!["Arsenal".to_string(), "Chelsea".to_string()],
            bookmaker_a: "Bet365".to_string(),
            bookmaker_b: "William Hill".to_string(),
            price_a: dec!(2.10),
            price_b: dec!(2.20),
            profit_margin_percent: dec!(6.93),
        }
    }

    #[test]
    fn alert_text() {
        let opp = opportunity();
        assert_eq!(alert_subject(&opp), "Arbitrage Alert: Arsenal vs Chelsea");
        assert_eq!(
            alert_body(&opp),
            "Match: Arsenal vs Chelsea\nProfit: 6.93%\nBet365 odds: 2.10\nWilliam Hill odds: 2.20"
        );
    }

    #[test]
    fn dashboard_for_empty_cycle() {
        assert_eq!(dashboard_lines(&[]), vec![NO_OPPORTUNITIES.to_string()]);
    }

    #[test]
    fn dashboard_lists_each_opportunity() {
        let lines = dashboard_lines(&[opportunity()]);
        assert_eq!(
            lines,
            vec![
                "1 arbitrage opportunities found!",
                "### Arsenal vs Chelsea",
                "- Bookmakers: Bet365 & William Hill",
                "- Odds: 2.10 / 2.20",
                "- Profit Margin: 6.93%",
                "---",
            ]
        );
    }
}
