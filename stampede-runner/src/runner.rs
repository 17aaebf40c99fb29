//! Load runner: spawns simulated users and decides when the run is over

use crate::error::RunnerResult;
use crate::report::RunReport;
use crate::settings::RunSettings;
use crate::stats::StatsCollector;
use crate::user::{SimulatedUser, UserSummary};
use chrono::Utc;
use serde::Serialize;
use stampede_core::{Scenario, ScenarioError};
use stampede_http::HttpClient;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    RunTimeElapsed,
    UsersFinished,
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::RunTimeElapsed => write!(f, "run time elapsed"),
            StopReason::UsersFinished => write!(f, "all users finished"),
            StopReason::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Stops a running [`LoadRunner`] from another task (e.g. a Ctrl-C handler)
///
/// Stopping before the run starts is remembered.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    notify: Arc<Notify>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.notify.notify_one();
    }
}

enum Event {
    Deadline,
    Interrupted,
    Spawn,
    UserDone(Result<UserSummary, JoinError>),
}

pub struct LoadRunner<S: Scenario> {
    scenario: Arc<S>,
    client: Arc<dyn HttpClient>,
    settings: RunSettings,
    target: String,
    stop: StopHandle,
}

impl<S: Scenario> LoadRunner<S> {
    pub fn new(scenario: S, client: Arc<dyn HttpClient>, settings: RunSettings) -> Self {
        Self {
            scenario: Arc::new(scenario),
            client,
            settings,
            target: String::new(),
            stop: StopHandle::default(),
        }
    }

    /// Host recorded in the report
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    fn spawn_user(
        &self,
        id: u32,
        users: &mut JoinSet<UserSummary>,
        stats: &Arc<StatsCollector>,
        stop: &watch::Receiver<bool>,
    ) {
        let mut user = SimulatedUser::new(
            id,
            self.scenario.clone(),
            self.client.clone(),
            stats.clone(),
            stop.clone(),
        )
        .with_iterations(self.settings.iterations);

        if let Some(seed) = self.settings.seed {
            user = user.with_seed(seed.wrapping_add(u64::from(id)));
        }

        users.spawn(user.run());
    }

    fn finished_user(result: Result<UserSummary, JoinError>, summaries: &mut Vec<UserSummary>) {
        match result {
            Ok(summary) => {
                debug!(
                    user = summary.id,
                    tasks = summary.tasks_completed,
                    "User finished"
                );
                summaries.push(summary);
            }
            Err(e) if e.is_panic() => error!("Simulated user panicked: {}", e),
            Err(_) => {}
        }
    }

    /// Run the load test to completion and report what happened
    pub async fn run(self) -> RunnerResult<RunReport> {
        self.settings.validate()?;
        let scenario_name = self.scenario.name();
        if self.scenario.tasks().total_weight() == 0 {
            return Err(ScenarioError::NoRunnableTasks(scenario_name.to_string()).into());
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();
        let total_users = self.settings.users;

        info!(
            %run_id,
            scenario = scenario_name,
            users = total_users,
            spawn_rate = self.settings.spawn_rate,
            "Starting load test against {}",
            self.target
        );
        if self.settings.is_unbounded() {
            warn!("No run time or iteration limit set; running until interrupted");
        }

        let stats = Arc::new(StatsCollector::new());
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut users: JoinSet<UserSummary> = JoinSet::new();
        let mut summaries = Vec::with_capacity(total_users as usize);

        let spawn_interval = self.settings.spawn_interval();
        let mut next_spawn = Instant::now();
        let mut spawned = 0u32;

        let run_time = self.settings.run_time;
        let deadline = async move {
            match run_time {
                Some(run_time) => tokio::time::sleep(run_time).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let stop_reason = loop {
            let event = tokio::select! {
                _ = &mut deadline => Event::Deadline,
                _ = self.stop.notify.notified() => Event::Interrupted,
                _ = tokio::time::sleep_until(next_spawn), if spawned < total_users => Event::Spawn,
                Some(result) = users.join_next(), if !users.is_empty() => Event::UserDone(result),
            };

            match event {
                Event::Deadline => break StopReason::RunTimeElapsed,
                Event::Interrupted => break StopReason::Interrupted,
                Event::Spawn => {
                    self.spawn_user(spawned, &mut users, &stats, &stop_rx);
                    spawned += 1;
                    next_spawn += spawn_interval;
                    if spawned == total_users {
                        info!("All {} users spawned", total_users);
                    }
                }
                Event::UserDone(result) => {
                    Self::finished_user(result, &mut summaries);
                    if users.is_empty() && spawned == total_users {
                        break StopReason::UsersFinished;
                    }
                }
            }
        };

        info!("Stopping load test: {}", stop_reason);
        let _ = stop_tx.send(true);

        let stop_timeout = self.settings.stop_timeout;
        let drained = timeout(stop_timeout, async {
            while let Some(result) = users.join_next().await {
                Self::finished_user(result, &mut summaries);
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                remaining = users.len(),
                "Users did not stop within {:?}; aborting",
                stop_timeout
            );
            users.abort_all();
            while let Some(result) = users.join_next().await {
                Self::finished_user(result, &mut summaries);
            }
        }

        let elapsed = started.elapsed();
        let snapshot = stats.snapshot(elapsed);
        info!(
            requests = snapshot.aggregated.num_requests,
            failures = snapshot.aggregated.num_failures,
            "Load test finished in {:.2}s",
            elapsed.as_secs_f64()
        );

        Ok(RunReport {
            run_id,
            scenario: scenario_name.to_string(),
            host: self.target,
            users: spawned,
            started_at,
            duration_secs: elapsed.as_secs_f64(),
            stop_reason,
            tasks_completed: summaries.iter().map(|s| s.tasks_completed).sum(),
            entries: snapshot.entries,
            aggregated: snapshot.aggregated,
            failures: snapshot.failures,
        })
    }
}
