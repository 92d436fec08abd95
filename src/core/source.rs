//! Abstraction over where published rate tables come from

use super::rates::RawRow;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches the rows published for `date`.
    ///
    /// `Ok(None)` means the page was retrieved but carries no rate table,
    /// which is normal for weekends, holidays and future dates.
    async fn fetch_rows(&self, date: NaiveDate) -> Result<Option<Vec<RawRow>>>;
}
