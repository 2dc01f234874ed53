// Reachability probe port
use async_trait::async_trait;
use thiserror::Error;

/// The probe itself could not run (distinct from "host did not answer")
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Probe spawn failed: {0}")]
    Spawn(String),

    #[error("Probe IO error: {0}")]
    Io(String),
}

/// Single-attempt liveness check
///
/// No retries: bounded polling lives in `ReachabilityPoller`.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Returns true if `address` answered one basic network probe
    async fn probe(&self, address: &str) -> Result<bool, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    /// Mock probe answering from a per-address script
    ///
    /// Each address consumes its scripted answers in order; once the script is
    /// exhausted the last answer repeats. Unknown addresses answer `Ok(false)`.
    pub struct MockReachabilityProbe {
        scripts: Arc<Mutex<HashMap<String, VecDeque<Result<bool, ProbeError>>>>>,
        last: Arc<Mutex<HashMap<String, Result<bool, ProbeError>>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockReachabilityProbe {
        pub fn new() -> Self {
            Self {
                scripts: Arc::new(Mutex::new(HashMap::new())),
                last: Arc::new(Mutex::new(HashMap::new())),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Script the answers for one address
        pub fn script(self, address: &str, answers: Vec<Result<bool, ProbeError>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(address.to_string(), answers.into());
            self
        }

        /// Address always answers `up`
        pub fn always(self, address: &str, up: bool) -> Self {
            self.script(address, vec![Ok(up)])
        }

        pub fn call_count(&self, address: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.as_str() == address)
                .count()
        }
    }

    impl Default for MockReachabilityProbe {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ReachabilityProbe for MockReachabilityProbe {
        async fn probe(&self, address: &str) -> Result<bool, ProbeError> {
            self.calls.lock().unwrap().push(address.to_string());

            let next = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(address)
                .and_then(|script| script.pop_front());

            let mut last = self.last.lock().unwrap();
            match next {
                Some(answer) => {
                    last.insert(address.to_string(), answer.clone());
                    answer
                }
                None => last.get(address).cloned().unwrap_or(Ok(false)),
            }
        }
    }
}
