//! Text formatting for records and team metrics

use crate::model::RawStats;
use std::fmt;

/// Placeholder for a missing value
pub const MISSING: &str = "N/A";

/// Compact notation for large amounts: 3.40T, 812.50B, 55.00M
///
/// Smaller values are digit-grouped. Missing and zero values render as N/A.
pub fn compact_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => {
            if v >= 1e12 {
                format!("{:.2}T", v / 1e12)
            } else if v >= 1e9 {
                format!("{:.2}B", v / 1e9)
            } else if v >= 1e6 {
                format!("{:.2}M", v / 1e6)
            } else {
                group_digits(v)
            }
        }
        _ => MISSING.to_string(),
    }
}

/// Thousands separators, at most two decimals with trailing zeros dropped
pub fn group_digits(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Signed percentage of a fraction with one decimal: -0.0231 -> "-2.3%"
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Label/value rows for the key metrics panel
pub fn raw_stat_rows(raw: &RawStats) -> Vec<(&'static str, String)> {
    vec![
        ("Market Cap", compact_number(raw.market_cap())),
        ("P/E Ratio", or_missing(raw.pe_ratio(), |v| format!("{v:.2}"))),
        (
            "Div Yield",
            or_missing(raw.dividend_yield(), |v| format!("{:.2}%", v * 100.0)),
        ),
        ("52W High", or_missing(raw.fifty_two_week_high(), |v| format!("${v}"))),
        ("52W Low", or_missing(raw.fifty_two_week_low(), |v| format!("${v}"))),
        ("Avg Vol", compact_number(raw.avg_volume())),
    ]
}

fn or_missing(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    match value {
        Some(v) if v != 0.0 => render(v),
        _ => MISSING.to_string(),
    }
}

/// Accent colour picked from an industry label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndustryColor {
    Sky,
    Emerald,
    Pink,
    Amber,
    Red,
    Violet,
    Teal,
    Slate,
}

impl IndustryColor {
    /// Match keywords in the label; first match wins
    pub fn for_industry(industry: Option<&str>) -> Self {
        const RULES: [(&[&str], IndustryColor); 7] = [
            (&["tech", "semicon", "software"], IndustryColor::Sky),
            (&["bank", "financ", "capital"], IndustryColor::Emerald),
            (&["health", "pharm", "bio"], IndustryColor::Pink),
            (&["energy", "oil", "gas"], IndustryColor::Amber),
            (&["auto", "transport", "travel"], IndustryColor::Red),
            (&["consumer", "retail"], IndustryColor::Violet),
            (&["communic", "media"], IndustryColor::Teal),
        ];

        let Some(industry) = industry.filter(|s| !s.is_empty()) else {
            return IndustryColor::Sky;
        };
        let lower = industry.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map_or(IndustryColor::Slate, |(_, color)| *color)
    }

    pub fn hex(self) -> &'static str {
        match self {
            IndustryColor::Sky => "#38bdf8",
            IndustryColor::Emerald => "#34d399",
            IndustryColor::Pink => "#f472b6",
            IndustryColor::Amber => "#fbbf24",
            IndustryColor::Red => "#f87171",
            IndustryColor::Violet => "#a78bfa",
            IndustryColor::Teal => "#2dd4bf",
            IndustryColor::Slate => "#94a3b8",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            IndustryColor::Sky => (0x38, 0xbd, 0xf8),
            IndustryColor::Emerald => (0x34, 0xd3, 0x99),
            IndustryColor::Pink => (0xf4, 0x72, 0xb6),
            IndustryColor::Amber => (0xfb, 0xbf, 0x24),
            IndustryColor::Red => (0xf8, 0x71, 0x71),
            IndustryColor::Violet => (0xa7, 0x8b, 0xfa),
            IndustryColor::Teal => (0x2d, 0xd4, 0xbf),
            IndustryColor::Slate => (0x94, 0xa3, 0xb8),
        }
    }
}

/// Valuation band of an average P/E
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeTier {
    Value,
    Growth,
    Expensive,
}

impl PeTier {
    pub fn classify(pe: f64) -> Option<Self> {
        if !pe.is_finite() {
            return None;
        }
        Some(if pe < 20.0 {
            PeTier::Value
        } else if pe < 35.0 {
            PeTier::Growth
        } else {
            PeTier::Expensive
        })
    }
}

impl fmt::Display for PeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeTier::Value => write!(f, "Value"),
            PeTier::Growth => write!(f, "Growth"),
            PeTier::Expensive => write!(f, "Expensive"),
        }
    }
}

/// Income band of a dividend yield given in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldTier {
    High,
    Moderate,
    Low,
}

impl YieldTier {
    pub fn classify(yield_percent: f64) -> Option<Self> {
        if !yield_percent.is_finite() {
            return None;
        }
        Some(if yield_percent > 3.0 {
            YieldTier::High
        } else if yield_percent > 1.0 {
            YieldTier::Moderate
        } else {
            YieldTier::Low
        })
    }
}

impl fmt::Display for YieldTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YieldTier::High => write!(f, "High"),
            YieldTier::Moderate => write!(f, "Moderate"),
            YieldTier::Low => write!(f, "Low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawValue;

    #[test]
    fn test_compact_number() {
        assert_eq!(compact_number(Some(3.4e12)), "3.40T");
        assert_eq!(compact_number(Some(812_500_000_000.0)), "812.50B");
        assert_eq!(compact_number(Some(55_000_000.0)), "55.00M");
        assert_eq!(compact_number(Some(950_123.0)), "950,123");
        assert_eq!(compact_number(Some(1234.5)), "1,234.5");
        assert_eq!(compact_number(Some(0.0)), "N/A");
        assert_eq!(compact_number(None), "N/A");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0.0), "0");
        assert_eq!(group_digits(999.0), "999");
        assert_eq!(group_digits(1000.0), "1,000");
        assert_eq!(group_digits(-1_234_567.891), "-1,234,567.89");
        assert_eq!(group_digits(-0.001), "0");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(-0.0231), "-2.3%");
        assert_eq!(percent(0.05), "5.0%");
    }

    #[test]
    fn test_raw_stat_rows() {
        let raw = RawStats {
            market_cap: Some(RawValue::Number(3.4e12)),
            pe_ratio: Some(RawValue::Text("35.236".to_string())),
            dividend_yield: Some(RawValue::Number(0.0044)),
            fifty_two_week_high: Some(RawValue::Number(260.1)),
            fifty_two_week_low: None,
            avg_volume: Some(RawValue::Text("n/a".to_string())),
        };

        let rows = raw_stat_rows(&raw);
        let value = |label: &str| rows.iter().find(|(l, _)| *l == label).unwrap().1.clone();
        assert_eq!(rows.len(), 6);
        assert_eq!(value("Market Cap"), "3.40T");
        assert_eq!(value("P/E Ratio"), "35.24");
        assert_eq!(value("Div Yield"), "0.44%");
        assert_eq!(value("52W High"), "$260.1");
        assert_eq!(value("52W Low"), "N/A");
        assert_eq!(value("Avg Vol"), "N/A");
    }

    #[test]
    fn test_industry_color() {
        assert_eq!(IndustryColor::for_industry(None), IndustryColor::Sky);
        assert_eq!(IndustryColor::for_industry(Some("Semiconductors")), IndustryColor::Sky);
        assert_eq!(IndustryColor::for_industry(Some("Banks - Diversified")), IndustryColor::Emerald);
        assert_eq!(IndustryColor::for_industry(Some("Biotechnology")), IndustryColor::Sky);
        assert_eq!(IndustryColor::for_industry(Some("Drug Manufacturers")), IndustryColor::Slate);
        assert_eq!(IndustryColor::for_industry(Some("Oil & Gas E&P")), IndustryColor::Amber);
        assert_eq!(IndustryColor::for_industry(Some("Auto Manufacturers")), IndustryColor::Red);
        assert_eq!(IndustryColor::for_industry(Some("Consumer Electronics")), IndustryColor::Violet);
        assert_eq!(IndustryColor::for_industry(Some("Entertainment Media")), IndustryColor::Teal);
        assert_eq!(IndustryColor::Emerald.hex(), "#34d399");
        assert_eq!(IndustryColor::Slate.rgb(), (0x94, 0xa3, 0xb8));
    }

    #[test]
    fn test_tiers() {
        assert_eq!(PeTier::classify(15.0), Some(PeTier::Value));
        assert_eq!(PeTier::classify(20.0), Some(PeTier::Growth));
        assert_eq!(PeTier::classify(35.0), Some(PeTier::Expensive));
        assert_eq!(PeTier::classify(f64::NAN), None);

        assert_eq!(YieldTier::classify(3.5), Some(YieldTier::High));
        assert_eq!(YieldTier::classify(3.0), Some(YieldTier::Moderate));
        assert_eq!(YieldTier::classify(1.0), Some(YieldTier::Low));
        assert_eq!(YieldTier::Moderate.to_string(), "Moderate");
    }
}
