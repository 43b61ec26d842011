use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::{
    domain::subscriber::email::Email, email::EmailClient, notifier, rate::RateClient,
    store::SubscriberStore,
};

/// Outcome of one broadcast of the rate.
#[derive(Debug, Default, PartialEq)]
pub struct DeliveryReport {
    pub rate: f64,
    pub delivered: usize,
    pub failed: Vec<String>,
}

/// Fetches the rate and mails it to every subscriber.
#[derive(Clone)]
pub struct DailyJob {
    store: Arc<dyn SubscriberStore>,
    rate_client: RateClient,
    email_client: EmailClient,
}

impl DailyJob {
    pub fn new(
        store: Arc<dyn SubscriberStore>,
        rate_client: RateClient,
        email_client: EmailClient,
    ) -> Self {
        Self {
            store,
            rate_client,
            email_client,
        }
    }

    /// Runs one broadcast; `None` when the run was aborted before sending.
    #[tracing::instrument(name = "Send daily exchange rate emails", skip(self))]
    pub async fn run(&self) -> Option<DeliveryReport> {
        match self.try_run().await {
            Ok(report) => {
                tracing::info!(
                    rate = report.rate,
                    delivered = report.delivered,
                    failed = report.failed.len(),
                    "daily exchange rate emails sent"
                );
                Some(report)
            }
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Daily exchange rate run aborted"
                );
                None
            }
        }
    }

    async fn try_run(&self) -> anyhow::Result<DeliveryReport> {
        let rate = self
            .rate_client
            .fetch_usd_to_local_rate()
            .await
            .context("Failed to fetch the exchange rate.")?;

        let subscribers = self
            .store
            .list_subscribers()
            .await
            .context("Failed to retrieve subscribers.")?;

        let mut report = DeliveryReport {
            rate,
            ..Default::default()
        };
        for subscriber in subscribers {
            match self.deliver(rate, &subscriber).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        error.cause_chain = ?e,
                        error.message = %e,
                        subscriber = %subscriber,
                        "Failed to send the exchange rate to a subscriber. Skipping"
                    );
                    report.failed.push(subscriber);
                }
            }
        }

        Ok(report)
    }

    async fn deliver(&self, rate: f64, subscriber: &str) -> anyhow::Result<()> {
        let recipient = Email::try_from(subscriber.to_owned())
            .map_err(|e| anyhow::anyhow!(e))
            .context("Stored subscriber address is invalid.")?;

        notifier::notify(&self.email_client, rate, &recipient)
            .await
            .with_context(|| format!("Failed to send the exchange rate to {}.", recipient))
    }
}

/// Fires `job` every `period`, starting one period from now.
///
/// Runs never overlap: the next tick is awaited only after the current run
/// finished, and ticks missed meanwhile are dropped.
pub async fn run_until_stopped(job: DailyJob, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(period_secs = period.as_secs(), "scheduler started");
    loop {
        interval.tick().await;
        job.run().await;
    }
}
