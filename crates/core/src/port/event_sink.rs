// Observability port
// The verifier reports progress through an injected sink, never through globals

use std::time::Duration;
use tracing::{info, warn};

use crate::domain::{IterationNumber, Phase, Scenario, Status};

/// Structured progress events emitted while verifying one iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationEvent {
    IterationStarted {
        iteration: IterationNumber,
        scenario: Scenario,
        local_address: String,
        remote_address: String,
    },
    PhaseEntered {
        iteration: IterationNumber,
        phase: Phase,
    },
    TriggerIssued {
        address: String,
        command: String,
    },
    /// Channel failure during a disruptive command (expected)
    TriggerDisconnected {
        address: String,
        error: String,
    },
    Waiting {
        address: String,
        duration: Duration,
    },
    ProbeError {
        address: String,
        error: String,
    },
    ProbeMissed {
        address: String,
        elapsed: Duration,
    },
    ReachabilityChecked {
        address: String,
        up: bool,
    },
    LogsRetrieved {
        address: String,
        bytes: usize,
    },
    LogRetrievalFailed {
        address: String,
        error: String,
    },
    LogHeaderMissing {
        header: String,
    },
    MarkerChecked {
        marker: String,
        found: bool,
    },
    Classified {
        iteration: IterationNumber,
        status: Status,
    },
    RecordAppended {
        iteration: IterationNumber,
        location: String,
        total: usize,
    },
    /// Unusable document replaced by an empty one before an append
    StoreReinitialized {
        location: String,
        reason: String,
    },
    /// Unusable document found while only reading (left untouched)
    StoreUnparsable {
        location: String,
        reason: String,
    },
    EntrySkipped {
        location: String,
        index: usize,
        error: String,
    },
}

/// Event sink trait
///
/// Implementations:
/// - TracingEventSink: forwards to `tracing` (production)
/// - mocks::RecordingEventSink: keeps events in memory (tests)
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &VerificationEvent);
}

/// Forwards events to the `tracing` subscriber installed by the binary
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &VerificationEvent) {
        match event {
            VerificationEvent::IterationStarted {
                iteration,
                scenario,
                local_address,
                remote_address,
            } => info!(
                iteration = %iteration,
                scenario = %scenario,
                local = %local_address,
                remote = %remote_address,
                "Running iteration"
            ),
            VerificationEvent::PhaseEntered { iteration, phase } => {
                info!(iteration = %iteration, phase = %phase, "Phase entered")
            }
            VerificationEvent::TriggerIssued { address, command } => {
                info!(address = %address, command = %command, "Disruptive command issued")
            }
            VerificationEvent::TriggerDisconnected { address, error } => warn!(
                address = %address,
                error = %error,
                "Channel dropped during disruptive command (expected)"
            ),
            VerificationEvent::Waiting { address, duration } => info!(
                address = %address,
                wait_secs = duration.as_secs(),
                "Waiting for device"
            ),
            VerificationEvent::ProbeError { address, error } => warn!(
                address = %address,
                error = %error,
                "Probe could not run, treating as unreachable"
            ),
            VerificationEvent::ProbeMissed { address, elapsed } => info!(
                address = %address,
                elapsed_ms = elapsed.as_millis() as u64,
                "Waiting for address to respond"
            ),
            VerificationEvent::ReachabilityChecked { address, up } => {
                info!(address = %address, up = %up, "Reachability checked")
            }
            VerificationEvent::LogsRetrieved { address, bytes } => {
                info!(address = %address, bytes = %bytes, "Device logs retrieved")
            }
            VerificationEvent::LogRetrievalFailed { address, error } => {
                warn!(address = %address, error = %error, "Failed to retrieve device logs")
            }
            VerificationEvent::LogHeaderMissing { header } => {
                warn!(header = %header, "Log header not found in device logs")
            }
            VerificationEvent::MarkerChecked { marker, found } => {
                info!(marker = %marker, found = %found, "Recovery marker checked")
            }
            VerificationEvent::Classified { iteration, status } => {
                info!(iteration = %iteration, status = %status, "Iteration classified")
            }
            VerificationEvent::RecordAppended {
                iteration,
                location,
                total,
            } => info!(
                iteration = %iteration,
                location = %location,
                total = %total,
                "Result appended"
            ),
            VerificationEvent::StoreReinitialized { location, reason } => warn!(
                location = %location,
                reason = %reason,
                "Result store unreadable, starting a new one"
            ),
            VerificationEvent::StoreUnparsable { location, reason } => warn!(
                location = %location,
                reason = %reason,
                "Result store is not a result document, nothing to read"
            ),
            VerificationEvent::EntrySkipped {
                location,
                index,
                error,
            } => warn!(
                location = %location,
                index = %index,
                error = %error,
                "Skipping stored entry that is not an iteration record"
            ),
        }
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Keeps every emitted event
    #[derive(Clone, Default)]
    pub struct RecordingEventSink {
        events: Arc<Mutex<Vec<VerificationEvent>>>,
    }

    impl RecordingEventSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<VerificationEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn phases(&self) -> Vec<Phase> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    VerificationEvent::PhaseEntered { phase, .. } => Some(phase),
                    _ => None,
                })
                .collect()
        }
    }

    impl EventSink for RecordingEventSink {
        fn emit(&self, event: &VerificationEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
