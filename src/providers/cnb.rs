use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::CnbProviderConfig;
use crate::core::{RateSource, RawRow};
use crate::providers::html::parse_rate_rows;

/// Date format of the `date` query parameter, e.g. `15.06.2023`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Scrapes the daily rate page of the Czech National Bank.
pub struct CnbProvider {
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl CnbProvider {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Self {
        CnbProvider {
            base_url: base_url.to_string(),
            user_agent: user_agent.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &CnbProviderConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Downloads the raw page for `date`.
    pub async fn fetch_page(&self, date: NaiveDate) -> Result<String> {
        let date_param = date.format(DATE_FORMAT).to_string();
        let url = format!("{}?date={}", self.base_url, date_param);
        debug!("Requesting rate page from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for date: {}", e, date_param))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for date: {}",
                response.status(),
                date_param
            ));
        }

        response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read rate page for {}: {}", date_param, e))
    }
}

#[async_trait]
impl RateSource for CnbProvider {
    #[instrument(name = "CnbRateFetch", skip(self), fields(date = %date))]
    async fn fetch_rows(&self, date: NaiveDate) -> Result<Option<Vec<RawRow>>> {
        let html = self.fetch_page(date).await?;
        let rows = parse_rate_rows(&html);
        debug!(rows = ?rows.as_ref().map(Vec::len), "Parsed rate page");
        Ok(rows)
    }
}
