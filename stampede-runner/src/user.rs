//! A single simulated user

use crate::stats::{RequestOutcome, StatsCollector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use stampede_core::{RequestSpec, Scenario};
use stampede_http::HttpClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

/// Send one request and classify the response
///
/// Transport errors (refused connections, timeouts) are failures with
/// status 0 and the error text as the message.
pub async fn execute_request(client: &dyn HttpClient, spec: &RequestSpec) -> RequestOutcome {
    let request = spec.to_http_request();
    let started = Instant::now();

    match client.send(&request).await {
        Ok(response) => {
            let response_time = if response.elapsed.is_zero() {
                started.elapsed()
            } else {
                response.elapsed
            };
            let failure = spec
                .check
                .evaluate(response.status, &response.body)
                .err()
                .map(|e| e.to_string());

            RequestOutcome {
                method: spec.method,
                name: spec.name.clone(),
                response_time,
                status: response.status,
                content_length: response.content_length(),
                failure,
            }
        }
        Err(e) => {
            trace!("{} {} failed: {}", spec.method, spec.path, e);
            RequestOutcome {
                method: spec.method,
                name: spec.name.clone(),
                response_time: started.elapsed(),
                status: 0,
                content_length: 0,
                failure: Some(e.to_string()),
            }
        }
    }
}

/// What one user did before it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSummary {
    pub id: u32,
    pub setup_requests: u64,
    pub tasks_completed: u64,
}

/// Runs a scenario's setup, then its weighted tasks with think time in
/// between, until told to stop or out of iterations
pub struct SimulatedUser<S: Scenario> {
    id: u32,
    scenario: Arc<S>,
    client: Arc<dyn HttpClient>,
    stats: Arc<StatsCollector>,
    rng: StdRng,
    iterations: Option<u64>,
    stop: watch::Receiver<bool>,
}

impl<S: Scenario> SimulatedUser<S> {
    pub fn new(
        id: u32,
        scenario: Arc<S>,
        client: Arc<dyn HttpClient>,
        stats: Arc<StatsCollector>,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            scenario,
            client,
            stats,
            rng: StdRng::seed_from_u64(rand::random()),
            iterations: None,
            stop,
        }
    }

    /// Make the user's request mix reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_iterations(mut self, iterations: Option<u64>) -> Self {
        self.iterations = iterations;
        self
    }

    fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }

    async fn send(&self, spec: &RequestSpec) {
        let outcome = execute_request(self.client.as_ref(), spec).await;
        if let Some(failure) = &outcome.failure {
            debug!(user = self.id, "{} {} failed: {}", spec.method, spec.name, failure);
        }
        self.stats.record(&outcome);
    }

    /// Sleep for `pause` unless stopped first; returns whether the user should stop
    async fn think(&mut self, pause: Duration) -> bool {
        let stop = &mut self.stop;
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            changed = stop.changed() => {
                if changed.is_err() {
                    return true;
                }
            }
        }
        self.is_stopped()
    }

    pub async fn run(mut self) -> UserSummary {
        let mut summary = UserSummary {
            id: self.id,
            ..Default::default()
        };
        debug!(user = self.id, "Simulated user started");

        for spec in self.scenario.on_start(&mut self.rng) {
            if self.is_stopped() {
                debug!(user = self.id, "Stopped during setup");
                return summary;
            }
            self.send(&spec).await;
            summary.setup_requests += 1;
        }

        let wait_time = self.scenario.wait_time();
        loop {
            if self.is_stopped() {
                break;
            }

            let Some(task) = self.scenario.tasks().pick(&mut self.rng) else {
                warn!(user = self.id, "Scenario has no runnable tasks");
                break;
            };
            let build = task.build;
            let spec = build(self.scenario.as_ref(), &mut self.rng);
            self.send(&spec).await;
            summary.tasks_completed += 1;

            if self.iterations.is_some_and(|limit| summary.tasks_completed >= limit) {
                break;
            }

            let pause = wait_time.sample(&mut self.rng);
            if self.think(pause).await {
                break;
            }
        }

        debug!(
            user = self.id,
            tasks = summary.tasks_completed,
            "Simulated user stopped"
        );
        summary
    }
}
