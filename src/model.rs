use serde::{Deserialize, Serialize};

use crate::warning::ExtractWarning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Item number of the last accepted table row in a document.
///
/// Row boundaries are only recognised by the next expected item number, so
/// the counter is carried from page to page and owned by a single document
/// pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RowCounter(u32);

impl RowCounter {
    #[must_use]
    pub const fn new(last_item: u32) -> Self {
        Self(last_item)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn next_item(self) -> u32 {
        self.0 + 1
    }

    #[must_use]
    pub(crate) const fn advance(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Row-level columns of one purchase-order line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFields {
    #[serde(rename = "Lp.")]
    pub lp: String,
    #[serde(rename = "Zakład")]
    pub plant: String,
    #[serde(rename = "CPV")]
    pub cpv: String,
    #[serde(rename = "Nazwa materiału")]
    pub name: String,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Jm")]
    pub unit: String,
    #[serde(rename = "Ilość w Jm")]
    pub quantity: String,
    #[serde(rename = "Cena")]
    pub price: String,
    #[serde(rename = "Wartość")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(rename = "Umowa")]
    pub contract: String,
    #[serde(rename = "Aukcja")]
    pub auction: String,
    #[serde(rename = "Data zamowienia")]
    pub order_date: String,
    #[serde(rename = "Nr zamowienia")]
    pub order_number: String,
    #[serde(rename = "Realizacja od")]
    pub period_start: String,
    #[serde(rename = "Realizacja do")]
    pub period_end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub row: RowFields,
    #[serde(flatten)]
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutput {
    pub records: Vec<Record>,
    pub counter: RowCounter,
    pub warnings: Vec<ExtractWarning>,
}

/// Parses a comma or dot decimal such as `1234,56`.
#[must_use]
pub fn parse_decimal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::{RowCounter, parse_decimal};

    #[test]
    fn counter_points_at_next_item() {
        let counter = RowCounter::default();
        assert_eq!(counter.next_item(), 1);
        assert_eq!(counter.advance().advance().value(), 2);
    }

    #[test]
    fn parses_comma_and_dot_decimals() {
        assert_eq!(parse_decimal("1234,56"), Some(1234.56));
        assert_eq!(parse_decimal(" 5.5 "), Some(5.5));
        assert_eq!(parse_decimal("szt"), None);
        assert_eq!(parse_decimal(""), None);
    }
}
