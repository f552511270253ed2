use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ExtractError;
use crate::model::DocumentMetadata;

fn header_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hardcoded order header regex is valid")
}

static CONTRACT_RE: LazyLock<Regex> =
    LazyLock::new(|| header_regex(r"Warunki płatności:\s*(?:AUKCJA|PWD) (\d+)"));
static AUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| header_regex(r"Warunki płatności:\s*(?:AUKCJA|PWD) \d+ (.*)"));
static ORDER_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| header_regex(r"Z dnia:\s*(\d{2}.\d{2}.\d{4})"));
static ORDER_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| header_regex(r"Z dnia:.*?Nr (.*?)Oświadczamy"));
static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    header_regex(r"od\s*(\d{2}.\d{2}.\d{4})\s*do\s*(\d{2}.\d{2}.\d{4})")
});

fn scan<'t>(regex: &Regex, text: &'t str, field: &'static str) -> Result<Captures<'t>, ExtractError> {
    regex
        .captures(text)
        .ok_or(ExtractError::MissingMetadata { field })
}

fn group(captures: &Captures<'_>, index: usize) -> String {
    captures
        .get(index)
        .map(|value| value.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Reads the order header from the first page of a purchase order.
///
/// Every field is required; a header that cannot be read in full rejects the
/// whole document.
pub(crate) fn extract_metadata(first_page: &str) -> Result<DocumentMetadata, ExtractError> {
    let contract = scan(&CONTRACT_RE, first_page, "contract number")?;
    let auction = scan(&AUCTION_RE, first_page, "auction reference")?;
    let order_date = scan(&ORDER_DATE_RE, first_page, "order date")?;
    let order_number = scan(&ORDER_NUMBER_RE, first_page, "order number")?;
    let period = scan(&PERIOD_RE, first_page, "fulfillment period")?;

    Ok(DocumentMetadata {
        contract: group(&contract, 1),
        auction: group(&auction, 1),
        order_date: group(&order_date, 1),
        order_number: group(&order_number, 1),
        period_start: group(&period, 1),
        period_end: group(&period, 2),
    })
}
