//! Date-fallback retrieval of the rate table

use super::rates::RateTable;
use super::source::RateSource;
use chrono::NaiveDate;
use tracing::{debug, error, info, instrument, warn};

/// Walks back from a requested date until some day has a published table.
pub struct RateFetcher<'a> {
    source: &'a dyn RateSource,
    pivot: String,
}

impl<'a> RateFetcher<'a> {
    pub fn new(source: &'a dyn RateSource, pivot: &str) -> Self {
        RateFetcher {
            source,
            pivot: pivot.to_string(),
        }
    }

    /// Returns the table of `requested` or of the closest earlier day with one.
    ///
    /// Never fails: after `max_attempts` days without a table the result is
    /// [`RateTable::degraded`].
    pub async fn fetch(&self, requested: NaiveDate, max_attempts: u32) -> RateTable {
        self.fetch_with_progress(requested, max_attempts, &|_| {})
            .await
    }

    /// Like [`RateFetcher::fetch`], calling `on_attempt` before probing each date.
    #[instrument(name = "RateFetch", skip(self, on_attempt), fields(pivot = %self.pivot))]
    pub async fn fetch_with_progress(
        &self,
        requested: NaiveDate,
        max_attempts: u32,
        on_attempt: &(dyn Fn(NaiveDate) + Sync),
    ) -> RateTable {
        let mut current = requested;

        for attempt in 1..=max_attempts {
            on_attempt(current);
            debug!(%current, attempt, max_attempts, "Probing rate table");

            match self.source.fetch_rows(current).await {
                Ok(Some(rows)) => {
                    debug!(%current, rows = rows.len(), "Found rate table");
                    return RateTable::from_rows(&self.pivot, current, &rows);
                }
                Ok(None) => info!(%current, "No rate table published, trying previous day"),
                Err(e) => warn!(%current, error = %e, "Failed to fetch rates, trying previous day"),
            }

            match current.pred_opt() {
                Some(previous) => current = previous,
                None => break,
            }
        }

        error!(
            %requested,
            max_attempts,
            "No rate table found, falling back to pivot currency only"
        );
        RateTable::degraded(&self.pivot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::{RateEntry, RawRow};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum Page {
        Rows(Vec<RawRow>),
        NoTable,
        Failure,
    }

    /// Serves scripted pages per date; unscripted dates fail.
    struct ScriptedSource {
        pages: HashMap<NaiveDate, Page>,
        probed: Mutex<Vec<NaiveDate>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<(NaiveDate, Page)>) -> Self {
            ScriptedSource {
                pages: pages.into_iter().collect(),
                probed: Mutex::new(Vec::new()),
            }
        }

        fn probed(&self) -> Vec<NaiveDate> {
            self.probed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RateSource for ScriptedSource {
        async fn fetch_rows(&self, date: NaiveDate) -> Result<Option<Vec<RawRow>>> {
            self.probed.lock().unwrap().push(date);
            match self.pages.get(&date) {
                Some(Page::Rows(rows)) => Ok(Some(rows.clone())),
                Some(Page::NoTable) => Ok(None),
                Some(Page::Failure) | None => Err(anyhow!("HTTP error: 503 Service Unavailable")),
            }
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, d).unwrap()
    }

    fn row(code: &str, rate: &str) -> RawRow {
        RawRow {
            country: "EMU".to_string(),
            currency: "euro".to_string(),
            quantity: "1".to_string(),
            code: code.to_string(),
            rate: rate.to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_requested_day_table() {
        let source = ScriptedSource::new(vec![(day(15), Page::Rows(vec![row("EUR", "23,760")]))]);
        let table = RateFetcher::new(&source, "CZK").fetch(day(15), 5).await;

        assert_eq!(table.effective_date(), Some(day(15)));
        assert_eq!(table.get("EUR").unwrap().rate, 23.76);
        assert_eq!(source.probed(), vec![day(15)]);
    }

    #[tokio::test]
    async fn test_steps_back_over_missing_tables_and_failures() {
        let source = ScriptedSource::new(vec![
            (day(18), Page::NoTable),
            (day(17), Page::Failure),
            (day(16), Page::Rows(vec![row("EUR", "23,760")])),
            (day(15), Page::Rows(vec![row("EUR", "1,000")])),
        ]);
        let table = RateFetcher::new(&source, "CZK").fetch(day(18), 5).await;

        assert_eq!(table.effective_date(), Some(day(16)));
        assert_eq!(table.get("EUR").unwrap().rate, 23.76);
        assert_eq!(source.probed(), vec![day(18), day(17), day(16)]);
    }

    #[tokio::test]
    async fn test_stops_at_first_table_even_if_sparse() {
        let source = ScriptedSource::new(vec![
            (day(16), Page::Rows(vec![row("EUR", "N/A")])),
            (day(15), Page::Rows(vec![row("EUR", "23,760")])),
        ]);
        let table = RateFetcher::new(&source, "CZK").fetch(day(16), 5).await;

        assert_eq!(table.effective_date(), Some(day(16)));
        assert_eq!(table.len(), 1);
        assert_eq!(source.probed(), vec![day(16)]);
    }

    #[tokio::test]
    async fn test_exhaustion_yields_pivot_only_table() {
        let source = ScriptedSource::new(vec![
            (day(20), Page::Failure),
            (day(19), Page::NoTable),
            (day(18), Page::Failure),
            (day(17), Page::Rows(vec![row("EUR", "23,760")])),
        ]);
        let table = RateFetcher::new(&source, "CZK").fetch(day(20), 3).await;

        assert_eq!(table, RateTable::degraded("CZK"));
        assert_eq!(table.get("CZK"), Some(&RateEntry::IDENTITY));
        assert_eq!(source.probed(), vec![day(20), day(19), day(18)]);
    }

    #[tokio::test]
    async fn test_zero_attempts_makes_no_request() {
        let source = ScriptedSource::new(vec![(day(15), Page::Rows(vec![row("EUR", "23,760")]))]);
        let table = RateFetcher::new(&source, "CZK").fetch(day(15), 0).await;

        assert!(table.is_degraded());
        assert!(source.probed().is_empty());
    }

    #[tokio::test]
    async fn test_stops_at_calendar_start() {
        let source = ScriptedSource::new(vec![]);
        let table = RateFetcher::new(&source, "CZK")
            .fetch(NaiveDate::MIN, 10)
            .await;

        assert!(table.is_degraded());
        assert_eq!(source.probed(), vec![NaiveDate::MIN]);
    }

    #[tokio::test]
    async fn test_progress_callback_sees_each_probed_date() {
        let source = ScriptedSource::new(vec![(day(14), Page::Rows(vec![]))]);
        let seen = Mutex::new(Vec::new());
        let table = RateFetcher::new(&source, "CZK")
            .fetch_with_progress(day(15), 5, &|d| seen.lock().unwrap().push(d))
            .await;

        assert_eq!(table.effective_date(), Some(day(14)));
        assert_eq!(seen.into_inner().unwrap(), vec![day(15), day(14)]);
    }
}
