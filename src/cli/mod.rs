pub mod convert;
pub mod rates;
pub mod setup;
pub mod ui;

use crate::core::config::AppConfig;
use crate::core::{RateFetcher, RateTable};
use crate::providers::cnb::{CnbProvider, DATE_FORMAT};
use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use tracing::warn;

/// Date and attempt budget selected on the command line.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub date: Option<NaiveDate>,
    pub max_attempts: Option<u32>,
}

/// Parses `YYYY-MM-DD` or the `dd.mm.yyyy` form used by the bank.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, DATE_FORMAT))
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD or DD.MM.YYYY"))
}

fn resolve_date(requested: Option<NaiveDate>, today: NaiveDate) -> Result<NaiveDate> {
    match requested {
        Some(date) if date > today => bail!(
            "Date {} is in the future, rates are published up to {}",
            date.format(DATE_FORMAT),
            today.format(DATE_FORMAT)
        ),
        Some(date) => Ok(date),
        None => Ok(today),
    }
}

/// Rate table retrieved for a command, with the note to show about it.
pub struct FetchedRates {
    pub requested: NaiveDate,
    pub table: RateTable,
    pub notice: Option<String>,
}

/// Retrieves the rate table for the selected date with a spinner on screen.
pub async fn fetch_table(config: &AppConfig, options: &FetchOptions) -> Result<FetchedRates> {
    let requested = resolve_date(options.date, Local::now().date_naive())?;
    let max_attempts = options.max_attempts.unwrap_or(config.max_attempts);
    if !config.has_cnb_pivot() {
        warn!(
            pivot = %config.pivot,
            "Configured pivot differs from CZK, the currency CNB rates are quoted against"
        );
    }

    let provider = CnbProvider::from_config(&config.providers.cnb);
    let fetcher = RateFetcher::new(&provider, &config.pivot);

    let pb = ui::new_spinner();
    let table = fetcher
        .fetch_with_progress(requested, max_attempts, &|date| {
            pb.set_message(format!("Fetching rates for {}...", date.format(DATE_FORMAT)))
        })
        .await;
    pb.finish_and_clear();

    let notice = table_notice(requested, &table, max_attempts);
    Ok(FetchedRates {
        requested,
        table,
        notice,
    })
}

/// Note shown when the table is degraded or comes from an earlier day.
pub fn table_notice(requested: NaiveDate, table: &RateTable, max_attempts: u32) -> Option<String> {
    match table.effective_date() {
        None => Some(ui::style_text(
            &format!(
                "No exchange rates found within {} day(s) up to {}",
                max_attempts,
                requested.format(DATE_FORMAT)
            ),
            ui::StyleType::Error,
        )),
        Some(date) if date != requested => Some(ui::style_text(
            &format!(
                "No rates published for {}, using rates from {}",
                requested.format(DATE_FORMAT),
                date.format(DATE_FORMAT)
            ),
            ui::StyleType::Warning,
        )),
        Some(_) => None,
    }
}
