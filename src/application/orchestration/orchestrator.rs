//! The polling loop.
//!
//! One iteration walks `RUNNING_SCRAPERS -> DECIDING -> DISPATCHING ->
//! PERSISTING`, then the loop sleeps out the rest of the interval. All
//! store reads of an iteration happen before any of its writes, so every
//! decision is taken against the previous iteration's state.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::boundary::{catch_errors, ErrorPolicy};
use super::pacing::remaining_sleep;
use crate::domain::{decide, Clinic, Observation, ThresholdTable};
use crate::error::{ChannelError, ConfigError, Error, Result};
use crate::port::{ErrorReporter, NotifierRegistry, NullReporter, Scraper, StateStore};

/// Default time between iteration starts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Counters describing one iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationReport {
    /// Clinics returned by all scrapers.
    pub clinics: usize,
    /// Scrapers whose failure was isolated.
    pub scraper_failures: usize,
    /// Clinics the policy selected.
    pub notified: usize,
    /// Clinics whose post time was recorded.
    pub delivered: usize,
    /// Channels whose failure was isolated.
    pub channel_failures: usize,
}

/// Drives scrapers, the policy, notifiers and the store.
pub struct Orchestrator {
    scrapers: Vec<Arc<dyn Scraper>>,
    notifiers: NotifierRegistry,
    state: StateStore,
    thresholds: ThresholdTable,
    reporter: Arc<dyn ErrorReporter>,
    interval: Duration,
    scraper_policy: ErrorPolicy,
}

impl Orchestrator {
    /// Start building an orchestrator.
    #[must_use]
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Names of the configured scrapers, in run order.
    #[must_use]
    pub fn scraper_names(&self) -> Vec<&'static str> {
        self.scrapers.iter().map(|s| s.name()).collect()
    }

    /// Persist current counts without evaluating or notifying.
    ///
    /// Used at bootstrap so the first real iteration does not treat all
    /// existing availability as new.
    pub async fn seed(&self) -> Result<IterationReport> {
        let (clinics, scraper_failures) = self.collect().await?;

        for (_, clinic) in &clinics {
            self.state.save_count(clinic.as_ref()).await?;
        }

        Ok(IterationReport {
            clinics: clinics.len(),
            scraper_failures,
            ..IterationReport::default()
        })
    }

    /// Run one full iteration with `now` as the decision time.
    pub async fn run_iteration(&self, now: DateTime<Utc>) -> Result<IterationReport> {
        let (clinics, scraper_failures) = self.collect().await?;
        let observations = self.evaluate(clinics, now).await?;

        let batch: Vec<&Observation> = observations.iter().filter(|o| o.should_notify()).collect();
        let (delivered_keys, channel_failures) = self.dispatch(&batch).await?;

        for observation in &observations {
            self.state.save_count(observation.clinic.as_ref()).await?;
        }

        let mut delivered = 0;
        for observation in &batch {
            if delivered_keys.contains(&observation.clinic.storage_key()) {
                self.state
                    .save_post_time(observation.clinic.as_ref(), now)
                    .await?;
                delivered += 1;
            }
        }

        Ok(IterationReport {
            clinics: observations.len(),
            scraper_failures,
            notified: batch.len(),
            delivered,
            channel_failures,
        })
    }

    /// Run forever, or until `shutdown` flips to `true`.
    ///
    /// With `seed` set, the first pass only records baselines.
    pub async fn run(&self, seed: bool, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            interval_secs = self.interval.as_secs(),
            scrapers = ?self.scraper_names(),
            notifiers = ?self.notifiers.names(),
            "Update frequency is set to every {} seconds",
            self.interval.as_secs()
        );

        let mut seed_pending = seed;
        loop {
            let started = Instant::now();

            if seed_pending {
                info!("Seeding store with current appointments");
                let report = self.seed().await?;
                info!(clinics = report.clinics, "Done seeding store");
                seed_pending = false;
            } else {
                info!("Started checking");
                let report = self.run_iteration(Utc::now()).await?;
                info!(
                    clinics = report.clinics,
                    notified = report.notified,
                    delivered = report.delivered,
                    scraper_failures = report.scraper_failures,
                    channel_failures = report.channel_failures,
                    "Done checking"
                );
            }

            let pause = remaining_sleep(self.interval, started.elapsed());
            if pause.is_zero() {
                warn!(
                    elapsed_secs = started.elapsed().as_secs(),
                    "Iteration overran the update frequency"
                );
            }
            if wait_or_shutdown(pause, &mut shutdown).await {
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }

    /// RUNNING_SCRAPERS: every scraper, each behind its own boundary.
    ///
    /// Under [`ErrorPolicy::Propagate`] the first scraper failure ends the
    /// iteration.
    async fn collect(&self) -> Result<(Vec<(&'static str, Box<dyn Clinic>)>, usize)> {
        let mut clinics = Vec::new();
        let mut failures = 0;

        for scraper in &self.scrapers {
            let name = scraper.name();
            debug!(scraper = name, "Running scraper");

            let found = catch_errors(self.reporter.as_ref(), name, self.scraper_policy, None, async {
                scraper.all_clinics(&self.state).await.map(Some)
            })
            .await?;

            match found {
                Some(found) => {
                    debug!(scraper = name, clinics = found.len(), "Scraper finished");
                    clinics.extend(found.into_iter().map(|clinic| (name, clinic)));
                }
                None => failures += 1,
            }
        }

        Ok((clinics, failures))
    }

    /// DECIDING: read the previous state of every clinic, then apply the policy.
    async fn evaluate(
        &self,
        clinics: Vec<(&'static str, Box<dyn Clinic>)>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Observation>> {
        let mut observations = Vec::with_capacity(clinics.len());

        for (scraper, clinic) in clinics {
            let last_count = self.state.get_count(clinic.as_ref()).await?;
            let last_post = self.state.get_post_time(clinic.as_ref()).await?;
            let thresholds = clinic.thresholds(&self.thresholds);
            let decision = decide(clinic.as_ref(), last_count, last_post, now, &thresholds);

            debug!(
                scraper,
                clinic = %clinic.title(),
                appointments = clinic.appointments(),
                new_appointments = decision.new_appointments,
                verdict = decision.verdict.as_str(),
                "Evaluated clinic"
            );

            observations.push(Observation {
                scraper: scraper.to_string(),
                clinic,
                last_count,
                last_post,
                decision,
            });
        }

        Ok(observations)
    }

    /// DISPATCHING: the batch goes to every notifier, each isolated.
    ///
    /// Returns the storage keys at least one notifier fully delivered, and
    /// how many notifiers failed.
    async fn dispatch(&self, batch: &[&Observation]) -> Result<(HashSet<String>, usize)> {
        let mut delivered = HashSet::new();
        let mut failures = 0;
        if batch.is_empty() {
            return Ok((delivered, failures));
        }

        for notifier in self.notifiers.iter() {
            let channel = notifier.name();
            for observation in batch {
                info!(
                    channel,
                    clinic = %observation.clinic.title(),
                    new_appointments = observation.new_appointments(),
                    "Sending notification"
                );
            }

            let mut partial = Vec::new();
            let sent = catch_errors(
                self.reporter.as_ref(),
                channel,
                ErrorPolicy::Isolate,
                false,
                async {
                    match notifier.post(batch).await {
                        Ok(()) => Ok(true),
                        Err(err) => {
                            if let ChannelError::Partial { delivered: keys, .. } = &err {
                                partial.clone_from(keys);
                            }
                            Err(Error::from(err))
                        }
                    }
                },
            )
            .await?;

            if sent {
                delivered.extend(batch.iter().map(|o| o.clinic.storage_key()));
            } else {
                failures += 1;
                delivered.extend(partial);
            }
        }

        Ok((delivered, failures))
    }
}

/// Sleep for `pause`; returns `true` if shutdown was requested meanwhile.
async fn wait_or_shutdown(pause: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }

    let sleep = tokio::time::sleep(pause);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return false,
            changed = shutdown.changed() => match changed {
                Ok(()) if *shutdown.borrow() => return true,
                Ok(()) => continue,
                Err(_) => return true,
            },
        }
    }
}

/// Builder for [`Orchestrator`].
#[derive(Default)]
pub struct OrchestratorBuilder {
    scrapers: Vec<Arc<dyn Scraper>>,
    notifiers: Option<NotifierRegistry>,
    state: Option<StateStore>,
    thresholds: Option<ThresholdTable>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    interval: Option<Duration>,
    scraper_policy: Option<ErrorPolicy>,
}

impl OrchestratorBuilder {
    /// Append one scraper.
    #[must_use]
    pub fn scraper(mut self, scraper: Arc<dyn Scraper>) -> Self {
        self.scrapers.push(scraper);
        self
    }

    /// Append several scrapers, keeping their order.
    #[must_use]
    pub fn scrapers(mut self, scrapers: impl IntoIterator<Item = Arc<dyn Scraper>>) -> Self {
        self.scrapers.extend(scrapers);
        self
    }

    #[must_use]
    pub fn notifiers(mut self, notifiers: NotifierRegistry) -> Self {
        self.notifiers = Some(notifiers);
        self
    }

    #[must_use]
    pub fn state(mut self, state: StateStore) -> Self {
        self.state = Some(state);
        self
    }

    #[must_use]
    pub fn thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// How scraper failures are handled. Defaults to [`ErrorPolicy::Isolate`].
    #[must_use]
    pub fn scraper_policy(mut self, policy: ErrorPolicy) -> Self {
        self.scraper_policy = Some(policy);
        self
    }

    /// Finish the builder.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingField`] if no store was supplied, or
    /// [`ConfigError::InvalidValue`] for a zero interval.
    pub fn build(self) -> Result<Orchestrator> {
        let state = self
            .state
            .ok_or(ConfigError::MissingField { field: "store" })?;

        let interval = self.interval.unwrap_or(DEFAULT_INTERVAL);
        if interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "interval",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(Orchestrator {
            scrapers: self.scrapers,
            notifiers: self.notifiers.unwrap_or_default(),
            state,
            thresholds: self.thresholds.unwrap_or_default(),
            reporter: self.reporter.unwrap_or_else(|| Arc::new(NullReporter)),
            interval,
            scraper_policy: self.scraper_policy.unwrap_or(ErrorPolicy::Isolate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemoryStore;

    #[test]
    fn build_requires_a_store() {
        let result = Orchestrator::builder().build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { field: "store" }))
        ));
    }

    #[test]
    fn build_applies_defaults() {
        let orchestrator = Orchestrator::builder()
            .state(StateStore::new(Arc::new(MemoryStore::new())))
            .build()
            .unwrap();
        assert_eq!(orchestrator.interval(), DEFAULT_INTERVAL);
        assert_eq!(orchestrator.scraper_policy, ErrorPolicy::Isolate);
        assert!(orchestrator.scraper_names().is_empty());
    }

    #[test]
    fn build_rejects_a_zero_interval() {
        let result = Orchestrator::builder()
            .state(StateStore::new(Arc::new(MemoryStore::new())))
            .interval(Duration::ZERO)
            .build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "interval",
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn shutdown_interrupts_sleep() {
        let (tx, mut rx) = watch::channel(false);
        let waiter = tokio::spawn(async move {
            wait_or_shutdown(Duration::from_secs(3600), &mut rx).await
        });
        tx.send(true).unwrap();
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn elapsed_sleep_returns_false() {
        let (_tx, mut rx) = watch::channel(false);
        assert!(!wait_or_shutdown(Duration::from_millis(1), &mut rx).await);
    }
}
