// Recovery verification state machine
use std::sync::Arc;
use tokio::time::sleep;

use super::config::{LocalPolicy, VerifierConfig};
use super::log_window::LogWindow;
use super::poller::ReachabilityPoller;
use super::recorder::ResultRecorder;
use super::trigger::DisruptionTrigger;
use crate::domain::{
    classify, header_not_found_excerpt, Credential, IterationNumber, IterationRecord, Phase,
    Reachability, Scenario, Status, RETRIEVAL_ERROR_PREFIX, SKIPPED_SENTINEL,
};
use crate::error::Result;
use crate::port::{
    CommandChannel, EventSink, ReachabilityProbe, TimeProvider, VerificationEvent,
};

/// Device pair under test plus the two login identities
///
/// `trigger_credential` runs the disruptive command; `admin_credential`
/// reads device logs after a reboot.
#[derive(Debug, Clone)]
pub struct DeviceTarget {
    pub local_address: String,
    pub remote_address: String,
    pub trigger_credential: Credential,
    pub admin_credential: Option<Credential>,
}

/// Outcome of the log inspection phase
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogInspection {
    Window(String),
    HeaderMissing(String),
    RetrievalFailed(String),
}

impl LogInspection {
    fn excerpt(&self) -> String {
        match self {
            LogInspection::Window(text) => text.clone(),
            LogInspection::HeaderMissing(header) => header_not_found_excerpt(header),
            LogInspection::RetrievalFailed(error) => format!("{}{}", RETRIEVAL_ERROR_PREFIX, error),
        }
    }
}

/// Runs one trigger -> poll -> inspect -> classify cycle
///
/// Nothing inside an iteration is allowed to fail the run: channel and
/// probe errors degrade into reachability values or excerpt sentinels.
/// Persisting the finished record is the only fallible step.
pub struct RecoveryVerifier {
    channel: Arc<dyn CommandChannel>,
    poller: ReachabilityPoller,
    trigger: DisruptionTrigger,
    recorder: Arc<ResultRecorder>,
    time_provider: Arc<dyn TimeProvider>,
    events: Arc<dyn EventSink>,
    window: LogWindow,
    config: VerifierConfig,
}

impl RecoveryVerifier {
    /// Create a new verifier
    ///
    /// # Arguments
    /// * `channel` - Remote command channel (trigger and log retrieval)
    /// * `probe` - Single-shot reachability probe
    /// * `recorder` - Destination for finished records
    /// * `time_provider` - Timestamp source for records
    /// * `events` - Observability sink
    /// * `config` - Timings and device strings
    pub fn new(
        channel: Arc<dyn CommandChannel>,
        probe: Arc<dyn ReachabilityProbe>,
        recorder: Arc<ResultRecorder>,
        time_provider: Arc<dyn TimeProvider>,
        events: Arc<dyn EventSink>,
        config: VerifierConfig,
    ) -> Self {
        Self {
            poller: ReachabilityPoller::new(probe, events.clone()),
            trigger: DisruptionTrigger::new(channel.clone(), events.clone(), config.settle_delay),
            window: LogWindow::new(
                config.log_header.clone(),
                config.window_offset,
                config.window_length,
            ),
            channel,
            recorder,
            time_provider,
            events,
            config,
        }
    }

    /// Verify one iteration and append its record to the result store
    ///
    /// # Errors
    /// Only if the record cannot be persisted.
    pub async fn run_iteration(
        &self,
        target: &DeviceTarget,
        iteration: IterationNumber,
        scenario: Scenario,
    ) -> Result<IterationRecord> {
        let record = self.verify(target, iteration, scenario).await;
        self.recorder.append(&record).await?;
        Ok(record)
    }

    /// Drive the state machine to `Classified` and build the record
    pub async fn verify(
        &self,
        target: &DeviceTarget,
        iteration: IterationNumber,
        scenario: Scenario,
    ) -> IterationRecord {
        self.events.emit(&VerificationEvent::IterationStarted {
            iteration,
            scenario,
            local_address: target.local_address.clone(),
            remote_address: target.remote_address.clone(),
        });

        // Triggering: a dropped channel is expected, the outcome was already reported
        self.enter(iteration, Phase::Triggering);
        let _ = self
            .trigger
            .trigger(
                &target.local_address,
                &target.trigger_credential,
                self.config.command_for(scenario),
            )
            .await;

        self.enter(iteration, Phase::AwaitingLocal);
        let mut reachability = Reachability {
            local_up: self
                .await_local(&target.local_address, self.config.local_policy(scenario))
                .await,
            remote_up: false,
        };

        let mut status = Status::Fail;
        let log_excerpt = if !reachability.local_up {
            Some(SKIPPED_SENTINEL.to_string())
        } else {
            self.enter(iteration, Phase::AwaitingRemote);
            reachability.remote_up = self.poller.check_once(&target.remote_address).await;
            if reachability.remote_up {
                status = Status::Pass;
            }

            if scenario.inspects_logs() {
                self.enter(iteration, Phase::InspectingLogs);
                let inspection = self.inspect_logs(target).await;
                status = self.apply_inspection(status, &inspection);
                Some(inspection.excerpt())
            } else {
                None
            }
        };

        self.enter(iteration, Phase::Classified);
        self.events
            .emit(&VerificationEvent::Classified { iteration, status });

        IterationRecord {
            iteration,
            scenario,
            status,
            local_address: target.local_address.clone(),
            remote_address: target.remote_address.clone(),
            reachability,
            log_excerpt,
            recorded_at_ms: self.time_provider.now_millis(),
        }
    }

    async fn await_local(&self, address: &str, policy: LocalPolicy) -> bool {
        match policy {
            LocalPolicy::FixedDelay(delay) => {
                self.events.emit(&VerificationEvent::Waiting {
                    address: address.to_string(),
                    duration: delay,
                });
                sleep(delay).await;
                self.poller.check_once(address).await
            }
            LocalPolicy::BoundedRetry { timeout, interval } => {
                self.poller.poll(address, timeout, interval).await
            }
        }
    }

    async fn inspect_logs(&self, target: &DeviceTarget) -> LogInspection {
        let address = &target.local_address;
        let credential = match &target.admin_credential {
            Some(credential) => credential,
            None => {
                let error = "no administrative credential configured".to_string();
                self.events.emit(&VerificationEvent::LogRetrievalFailed {
                    address: address.clone(),
                    error: error.clone(),
                });
                return LogInspection::RetrievalFailed(error);
            }
        };

        let logs = match self
            .channel
            .run_foreground(address, credential, &self.config.log_command)
            .await
        {
            Ok(logs) => logs,
            Err(e) => {
                self.events.emit(&VerificationEvent::LogRetrievalFailed {
                    address: address.clone(),
                    error: e.to_string(),
                });
                return LogInspection::RetrievalFailed(e.to_string());
            }
        };

        self.events.emit(&VerificationEvent::LogsRetrieved {
            address: address.clone(),
            bytes: logs.len(),
        });

        match self.window.extract(&logs) {
            Some(window) => LogInspection::Window(window),
            None => {
                self.events.emit(&VerificationEvent::LogHeaderMissing {
                    header: self.config.log_header.clone(),
                });
                LogInspection::HeaderMissing(self.config.log_header.clone())
            }
        }
    }

    /// A missing header counts as a missing marker; a failed retrieval
    /// leaves the ping-derived status alone.
    fn apply_inspection(&self, ping_status: Status, inspection: &LogInspection) -> Status {
        let found = match inspection {
            LogInspection::RetrievalFailed(_) => return ping_status,
            LogInspection::HeaderMissing(_) => false,
            LogInspection::Window(window) => window.contains(&self.config.success_marker),
        };

        self.events.emit(&VerificationEvent::MarkerChecked {
            marker: self.config.success_marker.clone(),
            found,
        });
        classify(ping_status, found)
    }

    fn enter(&self, iteration: IterationNumber, phase: Phase) {
        self.events
            .emit(&VerificationEvent::PhaseEntered { iteration, phase });
    }
}
