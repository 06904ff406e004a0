//! Display coercions applied while projecting binding rows

use crate::query::LIST_SEPARATOR;
use indexmap::IndexSet;
use serde::Serialize;

/// Stand-in for any absent scalar field
pub const PLACEHOLDER: &str = "-";

/// Labels for the grower view's organic flag
pub const ORGANIC: &str = "Organik";
pub const CONVENTIONAL: &str = "Konvensional";

/// Short display id: everything after the last `#`, or the whole identifier
pub fn fragment_id(iri: &str) -> &str {
    match iri.rfind('#') {
        Some(pos) => &iri[pos + 1..],
        None => iri,
    }
}

/// Split a `GROUP_CONCAT` value into its labels.
///
/// Empty segments are dropped and the first occurrence of a repeated label
/// wins, so the order of first appearance is kept.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Parse a numeric literal, refusing NaN and infinities
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// `Rp 12,000`: zero decimals, comma thousands grouping
pub fn rupiah(value: f64) -> String {
    let whole = format!("{:.0}", value.abs());
    let sign = if value < 0.0 && whole != "0" { "-" } else { "" };
    format!("Rp {}{}", sign, group_thousands(&whole))
}

/// Price text, or `fallback` when absent or not a number
pub fn price_or(raw: Option<&str>, fallback: &str) -> String {
    parse_number(raw).map(rupiah).unwrap_or_else(|| fallback.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Non-negative quantity; absent, negative or unparseable counts as zero
pub fn parse_quantity(raw: Option<&str>) -> f64 {
    parse_number(raw).filter(|v| *v >= 0.0).unwrap_or(0.0)
}

/// Quantity without a trailing `.0` for whole numbers
pub fn quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Only the literal text `true` counts as organic
pub fn organic_label(raw: Option<&str>) -> &'static str {
    if raw == Some("true") {
        ORGANIC
    } else {
        CONVENTIONAL
    }
}

/// Availability tier of a lot's stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockLevel {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    Low,
    #[serde(rename = "Available")]
    Available,
}

impl StockLevel {
    /// Tier for a stock quantity in kilograms
    pub fn classify(stock_kg: f64) -> Self {
        if stock_kg <= 0.0 {
            StockLevel::OutOfStock
        } else if stock_kg < 100.0 {
            StockLevel::Low
        } else {
            StockLevel::Available
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockLevel::OutOfStock => "Out of Stock",
            StockLevel::Low => "Low Stock",
            StockLevel::Available => "Available",
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_id() {
        assert_eq!(fragment_id("http://kopiverse.org/ontology#GayoWine"), "GayoWine");
        assert_eq!(fragment_id("http://a.org/x#y#Z"), "Z");
        assert_eq!(fragment_id("urn:lot:17"), "urn:lot:17");
        assert_eq!(fragment_id("http://kopiverse.org/ontology#"), "");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("Floral|Citrus|Floral")), vec!["Floral", "Citrus"]);
        assert_eq!(split_list(Some("Citrus||Floral|")), vec!["Citrus", "Floral"]);
        assert!(split_list(Some("")).is_empty());
        assert!(split_list(None).is_empty());
        assert_eq!(split_list(Some("Dark Chocolate, Nutty")), vec!["Dark Chocolate, Nutty"]);
    }

    #[test]
    fn test_rupiah() {
        assert_eq!(rupiah(12000.0), "Rp 12,000");
        assert_eq!(rupiah(0.0), "Rp 0");
        assert_eq!(rupiah(999.0), "Rp 999");
        assert_eq!(rupiah(1000.0), "Rp 1,000");
        assert_eq!(rupiah(185000.4), "Rp 185,000");
        assert_eq!(rupiah(1234567.0), "Rp 1,234,567");
        assert_eq!(rupiah(-5000.0), "Rp -5,000");
        assert_eq!(rupiah(-0.2), "Rp 0");
    }

    #[test]
    fn test_price_fallbacks() {
        assert_eq!(price_or(Some("12000.0"), "Rp -"), "Rp 12,000");
        assert_eq!(price_or(Some(" 25000 "), "Call"), "Rp 25,000");
        assert_eq!(price_or(None, "Call"), "Call");
        assert_eq!(price_or(Some("call us"), "Ask Barista"), "Ask Barista");
        assert_eq!(price_or(Some("NaN"), "Rp -"), "Rp -");
        assert_eq!(price_or(Some("inf"), "Rp -"), "Rp -");
    }

    #[test]
    fn test_stock_boundaries() {
        assert_eq!(StockLevel::classify(0.0), StockLevel::OutOfStock);
        assert_eq!(StockLevel::classify(0.5), StockLevel::Low);
        assert_eq!(StockLevel::classify(99.0), StockLevel::Low);
        assert_eq!(StockLevel::classify(100.0), StockLevel::Available);
        assert_eq!(StockLevel::classify(100000.0), StockLevel::Available);
        assert_eq!(StockLevel::Low.to_string(), "Low Stock");
    }

    #[test]
    fn test_quantities() {
        assert_eq!(parse_quantity(Some("120")), 120.0);
        assert_eq!(parse_quantity(Some("-4")), 0.0);
        assert_eq!(parse_quantity(Some("lots")), 0.0);
        assert_eq!(parse_quantity(None), 0.0);
        assert_eq!(quantity(120.0), "120");
        assert_eq!(quantity(12.5), "12.5");
    }

    #[test]
    fn test_organic_label() {
        assert_eq!(organic_label(Some("true")), ORGANIC);
        assert_eq!(organic_label(Some("1")), CONVENTIONAL);
        assert_eq!(organic_label(Some("TRUE")), CONVENTIONAL);
        assert_eq!(organic_label(Some("false")), CONVENTIONAL);
        assert_eq!(organic_label(None), CONVENTIONAL);
    }
}
