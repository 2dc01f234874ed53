// Bounded reachability polling
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use super::constants::MIN_POLL_INTERVAL;
use crate::port::{EventSink, ReachabilityProbe, VerificationEvent};

/// Retry wrapper over a single-shot `ReachabilityProbe`
///
/// A probe that cannot run counts as a negative answer; the poller itself
/// never fails.
pub struct ReachabilityPoller {
    probe: Arc<dyn ReachabilityProbe>,
    events: Arc<dyn EventSink>,
}

impl ReachabilityPoller {
    pub fn new(probe: Arc<dyn ReachabilityProbe>, events: Arc<dyn EventSink>) -> Self {
        Self { probe, events }
    }

    /// One probe, no retry
    pub async fn check_once(&self, address: &str) -> bool {
        let up = self.probe_once(address).await;
        self.events.emit(&VerificationEvent::ReachabilityChecked {
            address: address.to_string(),
            up,
        });
        up
    }

    /// Probe every `interval` until an answer arrives or `timeout` has elapsed
    ///
    /// The first probe always runs, so a zero timeout means exactly one probe.
    /// Returns as soon as a probe succeeds.
    pub async fn poll(&self, address: &str, timeout: Duration, interval: Duration) -> bool {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let start = Instant::now();

        let up = loop {
            if self.probe_once(address).await {
                break true;
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                break false;
            }

            self.events.emit(&VerificationEvent::ProbeMissed {
                address: address.to_string(),
                elapsed,
            });
            sleep(interval).await;
        };

        self.events.emit(&VerificationEvent::ReachabilityChecked {
            address: address.to_string(),
            up,
        });
        up
    }

    async fn probe_once(&self, address: &str) -> bool {
        match self.probe.probe(address).await {
            Ok(up) => up,
            Err(e) => {
                self.events.emit(&VerificationEvent::ProbeError {
                    address: address.to_string(),
                    error: e.to_string(),
                });
                false
            }
        }
    }
}
