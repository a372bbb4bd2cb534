use std::{future::Future, time::Duration};

use anyhow::Context;
use chrono::Local;
use tokio::time::MissedTickBehavior;

use crate::cleansys::{FetchOutcome, MeasurementSource, NoDataReason};
use crate::measurement::LastNotified;
use crate::state::StateStore;
use crate::telegram::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    NoData,
    Changed,
    Unchanged,
    Failed,
}

#[derive(Debug)]
pub struct Monitor<S, N> {
    source: S,
    notifier: N,
    store: StateStore,
    last: LastNotified,
}

impl<S, N> Monitor<S, N>
where
    S: MeasurementSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, store: StateStore, last: LastNotified) -> Self {
        Self {
            source,
            notifier,
            store,
            last,
        }
    }

    pub async fn run(&mut self, period: Duration) -> Result<(), anyhow::Error> {
        self.run_until(period, tokio::signal::ctrl_c())
            .await
            .context("Failed to wait for Ctrl+C signal")
    }

    /// A cycle in progress is finished before `shutdown` is seen.
    pub async fn run_until<F, E>(&mut self, period: Duration, shutdown: F) -> Result<(), E>
    where
        F: Future<Output = Result<(), E>>,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.cycle().await;
                }
                res = &mut shutdown => {
                    log::info!("Shutting down");
                    return res;
                }
            }
        }
    }

    pub async fn cycle(&mut self) -> CycleOutcome {
        log::info!("API call time: {}", Local::now().format("%Y-%m-%d %H:%M"));

        match self.try_cycle().await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("API call failed: {e:#}");
                CycleOutcome::Failed
            }
        }
    }

    async fn try_cycle(&mut self) -> Result<CycleOutcome, anyhow::Error> {
        let measurement = match self.source.fetch().await? {
            FetchOutcome::Latest(m) => m,
            FetchOutcome::NoData(reason) => {
                let now = Local::now().format("%Y-%m-%d %H:%M");
                match reason {
                    NoDataReason::MissingItems => {
                        log::info!("[{now}] 'body' or 'items' key missing, no API data")
                    }
                    NoDataReason::NoItems => log::info!("[{now}] no items, no API data"),
                }
                return Ok(CycleOutcome::NoData);
            }
        };

        if !self.last.differs_from(&measurement) {
            log::info!(
                "[{}] no change, notification skipped",
                measurement.timestamp
            );
            return Ok(CycleOutcome::Unchanged);
        }

        self.notifier.send(&measurement.message()).await?;

        let next = LastNotified::from(&measurement);
        self.store
            .save(&next)
            .context("Failed to persist last notified reading")?;
        self.last = next;

        log::info!(
            "[{}] change detected, notification sent",
            measurement.timestamp
        );
        Ok(CycleOutcome::Changed)
    }
}
