//! Extraction of rate rows from the published HTML page
//!
//! The first `<table>` on the page is taken as the rate table. Every row after
//! the header row with at least five `<td>` cells becomes a [`RawRow`], read as
//! country, currency name, quantity, code and rate. Cell texts are trimmed but
//! otherwise left as published.

use crate::core::RawRow;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid cell selector"));

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Returns `None` when the page has no table at all.
pub fn parse_rate_rows(html: &str) -> Option<Vec<RawRow>> {
    let document = Html::parse_document(html);
    let table = document.select(&TABLE).next()?;

    let rows = table
        .select(&ROW)
        .skip(1)
        .filter_map(|row| {
            let mut cells = row.select(&CELL).map(cell_text);
            Some(RawRow {
                country: cells.next()?,
                currency: cells.next()?,
                quantity: cells.next()?,
                code: cells.next()?,
                rate: cells.next()?,
            })
        })
        .collect();

    Some(rows)
}
