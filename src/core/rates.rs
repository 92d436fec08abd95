//! Exchange rate table and the per-field parsing of published rows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A rate quoted in pivot currency units per `quantity` units of a foreign currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub rate: f64,
    pub quantity: f64,
}

impl RateEntry {
    pub const IDENTITY: RateEntry = RateEntry {
        rate: 1.0,
        quantity: 1.0,
    };
}

/// Cell texts of one row of the published table, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub country: String,
    pub currency: String,
    pub quantity: String,
    pub code: String,
    pub rate: String,
}

/// Rates published for a single day, keyed by uppercase currency code.
///
/// The pivot currency is always present with [`RateEntry::IDENTITY`]. A table
/// holding nothing else is degraded: no published table was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pivot: String,
    effective_date: Option<NaiveDate>,
    rates: BTreeMap<String, RateEntry>,
}

impl RateTable {
    /// Table with only the pivot identity entry.
    pub fn degraded(pivot: &str) -> Self {
        let pivot = pivot.trim().to_uppercase();
        let mut rates = BTreeMap::new();
        rates.insert(pivot.clone(), RateEntry::IDENTITY);
        RateTable {
            pivot,
            effective_date: None,
            rates,
        }
    }

    /// Builds the table published on `date` from raw rows.
    ///
    /// Unparsable quantities default to 1. Rows with an unparsable rate or an
    /// empty code are skipped.
    pub fn from_rows(pivot: &str, date: NaiveDate, rows: &[RawRow]) -> Self {
        let mut table = Self::degraded(pivot);
        table.effective_date = Some(date);

        for row in rows {
            let code = row.code.trim().to_uppercase();
            if code.is_empty() {
                debug!(?row, "Skipping row without currency code");
                continue;
            }
            if code == table.pivot {
                debug!(%code, "Ignoring row quoting the pivot currency");
                continue;
            }
            let Some(rate) = parse_rate(&row.rate) else {
                debug!(%code, rate = %row.rate, "Skipping row with unparsable rate");
                continue;
            };
            let quantity = parse_quantity(&row.quantity).unwrap_or_else(|| {
                debug!(%code, quantity = %row.quantity, "Unparsable quantity, assuming 1");
                1.0
            });
            table.rates.insert(code, RateEntry { rate, quantity });
        }

        table
    }

    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    /// Date of the published table, `None` when degraded.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.effective_date
    }

    pub fn get(&self, code: &str) -> Option<&RateEntry> {
        self.rates.get(&code.trim().to_uppercase())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Currency codes in alphabetical order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RateEntry)> {
        self.rates.iter().map(|(code, entry)| (code.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Always false, the pivot entry is never absent.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.rates.len() <= 1
    }
}

/// Strips regular and non-breaking spaces used as thousands separators.
fn strip_spaces(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parses a quantity cell such as `1`, `100` or `1 000`.
pub fn parse_quantity(text: &str) -> Option<f64> {
    strip_spaces(text).parse::<f64>().ok().and_then(positive)
}

/// Parses a rate cell with decimal comma such as `24,500` or `1 234,56`.
pub fn parse_rate(text: &str) -> Option<f64> {
    strip_spaces(text)
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .and_then(positive)
}
