use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Url};
use serde::Deserialize;

const EXCHANGE_PATH: &str = "NBUStatService/v1/statdirectory/exchange";
const TARGET_CURRENCY: &str = "USD";

/// One record of the upstream exchange directory.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExchangeRate {
    pub rate: f64,
    #[serde(rename = "cc")]
    pub currency_code: String,
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("failed to reach the rate API")]
    Network(#[source] reqwest::Error),
    #[error("the rate API answered with an error status")]
    Status(#[source] reqwest::Error),
    #[error("failed to read the rate API response")]
    Body(#[source] reqwest::Error),
    #[error("the rate API response is not a list of exchange rates")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct RateClient {
    http_client: Client,
    exchange_url: Url,
}

impl RateClient {
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let mut exchange_url = base_url
            .join(EXCHANGE_PATH)
            .context("Invalid rate API base url.")?;
        exchange_url.set_query(Some("json"));

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Could not build the rate API http client.")?;

        Ok(Self {
            http_client,
            exchange_url,
        })
    }

    /// Current UAH price of one USD.
    ///
    /// Yields `0.0` when the directory has no USD record.
    #[tracing::instrument(name = "Fetch USD exchange rate", skip(self))]
    pub async fn fetch_usd_to_local_rate(&self) -> Result<f64, FetchError> {
        let rates = self.fetch_rates().await?;
        let rate = find_rate(&rates, TARGET_CURRENCY);
        if rate.is_none() {
            tracing::warn!(
                currency = TARGET_CURRENCY,
                "currency missing from the rate API response"
            );
        }

        Ok(rate.unwrap_or(0.0))
    }

    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, FetchError> {
        let response = self
            .http_client
            .get(self.exchange_url.clone())
            .send()
            .await
            .map_err(FetchError::Network)?
            .error_for_status()
            .map_err(FetchError::Status)?;

        let body = response.bytes().await.map_err(FetchError::Body)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn find_rate(rates: &[ExchangeRate], currency_code: &str) -> Option<f64> {
    rates
        .iter()
        .find(|r| r.currency_code == currency_code)
        .map(|r| r.rate)
}
