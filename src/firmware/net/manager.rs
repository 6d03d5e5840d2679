use embassy_time::{with_timeout, Duration, Timer};

use super::{
    engine::NetEngine,
    trial::TrialRequests,
    types::{LinkError, NetOutcome, NetPhase},
};
use crate::firmware::{
    config::NetPolicy,
    storage::{CredentialStore, KeyValueStore},
    telemetry::NodeCounters,
    types::NetworkCredentials,
};

/// Wi-Fi station surface consumed by the manager.
#[allow(async_fn_in_trait)]
pub trait Connectivity {
    async fn connect(&mut self, credentials: &NetworkCredentials) -> Result<(), LinkError>;
    async fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
}

impl<T: Connectivity> Connectivity for &mut T {
    async fn connect(&mut self, credentials: &NetworkCredentials) -> Result<(), LinkError> {
        (**self).connect(credentials).await
    }

    async fn disconnect(&mut self) {
        (**self).disconnect().await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

pub struct NetworkResilienceManager<'a, L, S> {
    engine: NetEngine,
    link: L,
    store: CredentialStore<S>,
    trials: &'a TrialRequests,
    counters: &'a NodeCounters,
    policy: NetPolicy,
}

impl<'a, L, S> NetworkResilienceManager<'a, L, S>
where
    L: Connectivity,
    S: KeyValueStore,
{
    /// Boots on stored credentials, falling back to `fallback` when storage has no complete pair.
    pub fn new(
        link: L,
        mut store: CredentialStore<S>,
        fallback: Option<NetworkCredentials>,
        trials: &'a TrialRequests,
        counters: &'a NodeCounters,
        policy: NetPolicy,
    ) -> Self {
        let active = store.load_or(fallback);
        if active.is_none() {
            log::warn!("net: no credentials; waiting for config command");
        }
        Self {
            engine: NetEngine::new(active),
            link,
            store,
            trials,
            counters,
            policy: policy.sanitized(),
        }
    }

    pub fn engine(&self) -> &NetEngine {
        &self.engine
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn store_mut(&mut self) -> &mut CredentialStore<S> {
        &mut self.store
    }

    /// One pass of the connection loop: apply a pending trial, then make at most one bounded
    /// connection attempt if the link is down.
    pub async fn tick(&mut self) -> NetOutcome {
        let mut outcome = NetOutcome::Unchanged;

        if let Some(credentials) = self.trials.take() {
            outcome = self.begin_trial(credentials).await;
        }

        if self.link.is_connected() {
            if self.engine.phase() == NetPhase::Connected {
                return outcome;
            }
            if !self.engine.attempt().trialing {
                return self.adopt_restored_link();
            }
            // A trial is only proven by a connect made with the trial credentials.
            log::info!("net: dropping association made outside the trial");
            self.link.disconnect().await;
        }

        if self.engine.phase() == NetPhase::Connected {
            self.engine.link_lost();
            log::warn!("net: link lost ssid={}", self.active_ssid());
        }

        let Some(active) = self.engine.active().cloned() else {
            return NetOutcome::NoCredentials;
        };

        self.engine.start_attempt();
        self.counters.record_connect_attempt();
        let attempt = self.engine.attempt();
        log::info!(
            "net: connecting ssid={} retry={} trialing={}",
            active.ssid(),
            attempt.retry_count,
            attempt.trialing
        );

        let timeout = Duration::from_millis(self.policy.connect_timeout_ms as u64);
        let result = match with_timeout(timeout, self.link.connect(&active)).await {
            Ok(result) => result,
            Err(_) => Err(LinkError::Timeout),
        };

        match result {
            Ok(()) => self.on_connected(&active),
            Err(err) => self.on_connect_failed(err).await,
        }
    }

    /// The station re-associated on its own with the active credentials.
    fn adopt_restored_link(&mut self) -> NetOutcome {
        if self.engine.start_attempt() == NetOutcome::NoCredentials {
            return NetOutcome::NoCredentials;
        }
        let outcome = self.engine.attempt_succeeded();
        log::info!("net: link restored ssid={}", self.active_ssid());
        outcome
    }

    async fn begin_trial(&mut self, credentials: NetworkCredentials) -> NetOutcome {
        log::info!("net: trial begin ssid={}", credentials.ssid());
        let outcome = self.engine.begin_trial(credentials);
        self.counters.record_trial_started();
        self.link.disconnect().await;
        settle(self.policy.reconnect_settle_ms).await;
        outcome
    }

    fn on_connected(&mut self, active: &NetworkCredentials) -> NetOutcome {
        self.counters.record_connect_success();
        let outcome = self.engine.attempt_succeeded();
        if outcome == NetOutcome::TrialCommitted {
            self.counters.record_trial_committed();
            match self.store.commit(active) {
                Ok(()) => log::info!("net: trial committed ssid={}", active.ssid()),
                Err(err) => {
                    // Credentials stay active for this boot even if they did not persist.
                    self.counters.record_persist_failure();
                    log::warn!(
                        "net: trial committed ssid={} persist={}",
                        active.ssid(),
                        err.as_str()
                    );
                }
            }
        } else {
            log::info!("net: connected ssid={}", active.ssid());
        }
        outcome
    }

    async fn on_connect_failed(&mut self, err: LinkError) -> NetOutcome {
        self.counters.record_connect_failure();
        self.link.disconnect().await;
        let outcome = self.engine.attempt_failed();
        let attempt = self.engine.attempt();
        match outcome {
            NetOutcome::RolledBack => {
                self.counters.record_rollback();
                log::warn!(
                    "net: trial failed err={}; rolled back to ssid={}",
                    err.as_str(),
                    self.active_ssid()
                );
            }
            NetOutcome::GaveUp => log::warn!(
                "net: connect failed err={} retry={} give_up=true",
                err.as_str(),
                attempt.retry_count
            ),
            _ => log::info!(
                "net: connect failed err={} retry={}",
                err.as_str(),
                attempt.retry_count
            ),
        }
        settle(self.policy.retry_cooldown_ms).await;
        outcome
    }

    fn active_ssid(&self) -> &str {
        self.engine.active().map(|active| active.ssid()).unwrap_or("-")
    }
}

async fn settle(ms: u32) {
    if ms > 0 {
        Timer::after(Duration::from_millis(ms as u64)).await;
    }
}
