//! Table rendering of dashboard state

use crate::controller::{DashboardState, Mode, RiskView};
use crate::format::{self, IndustryColor, PeTier, YieldTier};
use crate::histogram::Histogram;
use crate::model::{CorrelationMatrix, StatKey, StockRecord, Suggestion};
use crate::team::TeamAggregate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

const BAR_WIDTH: usize = 30;

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn accent(record: &StockRecord) -> Color {
    let (r, g, b) = IndustryColor::for_industry(record.category.as_deref()).rgb();
    Color::Rgb { r, g, b }
}

fn title(record: &StockRecord) -> Cell {
    Cell::new(format!("{} ({})", record.display_name(), record.ticker))
        .fg(accent(record))
        .add_attribute(Attribute::Bold)
}

/// Whatever the current mode shows
pub fn dashboard(state: &DashboardState) -> String {
    let mut out = Vec::new();
    match state.mode {
        Mode::Single => match &state.primary {
            Some(primary) => out.push(record(primary)),
            None => out.push("Nothing loaded yet. Type a ticker to begin.".to_string()),
        },
        Mode::Compare => match (&state.primary, &state.compare) {
            (Some(primary), Some(compare)) => out.push(comparison(primary, compare)),
            (Some(primary), None) => {
                out.push(record(primary));
                out.push("Type another ticker to compare.".to_string());
            }
            _ => out.push("Type a ticker to start comparing.".to_string()),
        },
        Mode::Team => out.push(team(state)),
    }
    if let Some(view) = &state.risk {
        out.push(risk(view));
    }
    out.join("\n")
}

/// Stats and key metrics of one record
pub fn record(record: &StockRecord) -> String {
    let mut stats = table();
    stats.set_header(vec![title(record), Cell::new("Score")]);
    for (key, value) in record.stats.iter() {
        stats.add_row(vec![Cell::new(key), Cell::new(format!("{value:.0}"))]);
    }

    let mut metrics = table();
    metrics.set_header(vec!["Key Metrics", ""]);
    for (label, value) in format::raw_stat_rows(&record.raw_stats) {
        metrics.add_row(vec![label.to_string(), value]);
    }

    let mut out = format!("{stats}\n{metrics}");
    if let (Some(last), Some(change)) = (record.last_price(), record.period_change()) {
        out.push_str(&format!(
            "\nLast close {last:.2} {}, {} over {} sessions",
            record.currency.as_deref().unwrap_or("USD"),
            format::percent(change),
            record.history.len()
        ));
    }
    out
}

/// Side-by-side stats of two records
pub fn comparison(primary: &StockRecord, compare: &StockRecord) -> String {
    let mut stats = table();
    stats.set_header(vec![Cell::new("Stat"), title(primary), title(compare)]);
    for key in StatKey::ALL {
        stats.add_row(vec![
            key.to_string(),
            format!("{:.0}", primary.stats.get(key)),
            format!("{:.0}", compare.stats.get(key)),
        ]);
    }

    let mut metrics = table();
    metrics.set_header(vec!["Key Metrics", primary.ticker.as_str(), compare.ticker.as_str()]);
    let left = format::raw_stat_rows(&primary.raw_stats);
    let right = format::raw_stat_rows(&compare.raw_stats);
    for ((label, a), (_, b)) in left.into_iter().zip(right) {
        metrics.add_row(vec![label.to_string(), a, b]);
    }

    format!("{stats}\n{metrics}")
}

/// Members, averages, sectors and correlation
pub fn team(state: &DashboardState) -> String {
    let capacity = state.team.capacity();
    let mut members = table();
    members.set_header(vec![
        format!("Team {}/{}", state.team.len(), capacity),
        "Name".to_string(),
        "Sector".to_string(),
    ]);
    for member in state.team.members() {
        members.add_row(vec![
            Cell::new(&member.ticker).fg(accent(member)),
            Cell::new(member.display_name()),
            Cell::new(member.sector.as_deref().unwrap_or("-")),
        ]);
    }
    for _ in state.team.len()..capacity {
        members.add_row(vec!["(empty)", "", ""]);
    }

    let mut out = vec![members.to_string()];
    match &state.team_aggregate {
        Some(aggregate) => out.push(team_aggregate(aggregate)),
        None => out.push("Add at least one stock to see the team analysis.".to_string()),
    }
    if let Some(matrix) = &state.team_risk {
        out.push(correlation(matrix));
    }
    out.join("\n")
}

/// Averaged stats, valuation tiers and sector breakdown
pub fn team_aggregate(aggregate: &TeamAggregate) -> String {
    let mut stats = table();
    stats.set_header(vec!["Team Average", "Score"]);
    for (key, value) in aggregate.stats.iter() {
        stats.add_row(vec![key.to_string(), format!("{value:.0}")]);
    }

    let pe = aggregate.raw.pe_ratio;
    let yield_percent = aggregate.raw.dividend_yield * 100.0;
    let tier = |t: Option<String>| t.unwrap_or_else(|| "-".to_string());
    let mut metrics = table();
    metrics.set_header(vec!["Team Metric", "Value", "Tier"]);
    metrics.add_row(vec![
        "Avg P/E Ratio".to_string(),
        format!("{pe:.2}"),
        tier(PeTier::classify(pe).map(|t| t.to_string())),
    ]);
    metrics.add_row(vec![
        "Avg Div. Yield".to_string(),
        format!("{yield_percent:.2}%"),
        tier(YieldTier::classify(yield_percent).map(|t| t.to_string())),
    ]);

    let mut sectors = table();
    sectors.set_header(vec!["Sector", "Count", "Share"]);
    for share in &aggregate.composition {
        sectors.add_row(vec![
            share.sector.clone(),
            share.count.to_string(),
            format!("{:.1}%", share.percentage),
        ]);
    }

    format!("{stats}\n{metrics}\n{sectors}")
}

/// Correlation grid
pub fn correlation(matrix: &CorrelationMatrix) -> String {
    if matrix.is_empty() {
        return "Correlation unavailable.".to_string();
    }

    let mut grid = table();
    let mut header = vec![Cell::new("Correlation")];
    header.extend(matrix.tickers.iter().map(Cell::new));
    grid.set_header(header);

    for row in &matrix.tickers {
        let mut cells = vec![Cell::new(row)];
        for col in &matrix.tickers {
            let cell = match matrix.get(row, col) {
                Some(v) => Cell::new(format!("{v:.2}")).fg(correlation_color(v)),
                None => Cell::new("-"),
            };
            cells.push(cell);
        }
        grid.add_row(cells);
    }
    grid.to_string()
}

fn correlation_color(value: f64) -> Color {
    if value >= 0.7 {
        Color::Red
    } else if value >= 0.3 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// VaR summary plus the return distribution
pub fn risk(view: &RiskView) -> String {
    let m = &view.metrics;
    let mut summary = table();
    summary.set_header(vec![format!("Risk {}", view.ticker), String::new()]);
    summary.add_row(vec!["VaR".to_string(), format::percent(m.var)]);
    summary.add_row(vec!["CVaR".to_string(), format::percent(m.cvar)]);
    if let Some(v) = m.volatility {
        summary.add_row(vec!["Volatility".to_string(), format::percent(v)]);
    }
    if let Some(v) = m.mean_return {
        summary.add_row(vec!["Mean return".to_string(), format::percent(v)]);
    }
    if let Some(c) = m.confidence_level {
        summary.add_row(vec!["Confidence".to_string(), format!("{:.0}%", c * 100.0)]);
    }

    match &view.histogram {
        Some(histogram) => format!("{summary}\n{}", distribution(histogram)),
        None => format!("{summary}\nNo return history."),
    }
}

/// One line per bucket, tail buckets marked, VaR bucket flagged
pub fn distribution(histogram: &Histogram) -> String {
    let peak = histogram.peak().max(1);
    let marker = histogram.var_marker();

    histogram
        .buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let len = bucket.count * BAR_WIDTH / peak;
            let glyph = if bucket.is_tail { "!" } else { "#" };
            let flag = if marker == Some(i) { " <- VaR" } else { "" };
            format!(
                "{:>7} |{:<width$}| {}{}",
                bucket.label(),
                glyph.repeat(len),
                bucket.count,
                flag,
                width = BAR_WIDTH
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Suggestion list
pub fn suggestions(list: &[Suggestion]) -> String {
    if list.is_empty() {
        return "No suggestions.".to_string();
    }
    let mut table = table();
    table.set_header(vec!["Symbol", "Name"]);
    for s in list {
        table.add_row(vec![s.symbol.as_str(), s.shortname.as_str()]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn stock(ticker: &str, sector: &str) -> Arc<StockRecord> {
        Arc::new(
            serde_json::from_value(json!({
                "ticker": ticker,
                "name": format!("{ticker} Corp"),
                "category": "Software",
                "sector": sector,
                "stats": {"Liquidity": 70, "Growth": 55},
                "raw_stats": {"pe_ratio": 18.0, "dividend_yield": 0.035, "market_cap": 2.0e12},
                "history": [
                    {"date": "2024-01-02", "price": 100.0},
                    {"date": "2024-01-03", "price": 110.0}
                ]
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_record_lists_stats_and_metrics() {
        let out = record(&stock("MSFT", "Technology"));
        assert!(out.contains("MSFT Corp (MSFT)"));
        assert!(out.contains("Liquidity"));
        assert!(out.contains("2.00T"));
        assert!(out.contains("10.0% over 2 sessions"));
    }

    #[test]
    fn test_team_view() {
        let mut state = DashboardState::new(3);
        state.set_mode(Mode::Team);
        state.apply_record(stock("AAPL", "Technology")).unwrap();
        state.apply_record(stock("JPM", "Financial Services")).unwrap();

        let out = dashboard(&state);
        assert!(out.contains("Team 2/3"));
        assert!(out.contains("(empty)"));
        assert!(out.contains("Value"));
        assert!(out.contains("High"));
        assert!(out.contains("50.0%"));
    }

    #[test]
    fn test_empty_team_prompts() {
        let mut state = DashboardState::new(6);
        state.set_mode(Mode::Team);
        assert!(dashboard(&state).contains("Add at least one stock"));
    }

    #[test]
    fn test_distribution_marks_var_bucket() {
        let histogram = Histogram::build(&[-0.05, -0.03, 0.0, 0.02, 0.04], -0.02, 5).unwrap();
        let out = distribution(&histogram);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("<- VaR"));
        assert!(!lines[1].ends_with("<- VaR"));
        assert!(lines[0].contains('!'));
        assert!(lines[4].contains('#'));
    }

    #[test]
    fn test_correlation_grid() {
        let matrix = CorrelationMatrix {
            tickers: vec!["AAPL".to_string(), "MSFT".to_string()],
            matrix: vec![vec![1.0, 0.82], vec![0.82, 1.0]],
        };
        let out = correlation(&matrix);
        assert!(out.contains("0.82"));
        assert_eq!(correlation(&CorrelationMatrix::default()), "Correlation unavailable.");
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(suggestions(&[]), "No suggestions.");
        let out = suggestions(&[Suggestion {
            symbol: "AAPL".to_string(),
            shortname: "Apple Inc.".to_string(),
        }]);
        assert!(out.contains("Apple Inc."));
    }
}
