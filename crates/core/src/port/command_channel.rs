// Remote Command Channel Port
// Abstraction for running commands on the device (ssh in production)

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Credential;

/// Channel errors
///
/// `Disconnected` is the expected outcome of a disruptive command and is
/// never fatal to an iteration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Connection dropped: {0}")]
    Disconnected(String),

    #[error("Command failed (exit code {exit_code:?}): {stderr}")]
    CommandFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Spawn failed: {0}")]
    Spawn(String),

    #[error("Command timeout after {0}ms")]
    Timeout(u64),
}

/// Remote command channel trait
///
/// Implementations:
/// - SshCommandChannel: runs commands through the system ssh client
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// Fire-and-forget execution of a command expected to sever the connection
    ///
    /// # Errors
    /// Any error here is tolerated by the caller for disruptive commands.
    async fn run_background(
        &self,
        address: &str,
        credential: &Credential,
        command: &str,
    ) -> Result<String, ChannelError>;

    /// Run a command and return its full captured output
    ///
    /// # Errors
    /// Fails explicitly instead of returning partial output.
    async fn run_foreground(
        &self,
        address: &str,
        credential: &Credential,
        command: &str,
    ) -> Result<String, ChannelError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// One recorded channel invocation
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ChannelCall {
        pub address: String,
        pub username: String,
        pub command: String,
        pub background: bool,
    }

    /// Mock channel with scripted responses
    pub struct MockCommandChannel {
        background: Arc<Mutex<Result<String, ChannelError>>>,
        foreground: Arc<Mutex<Result<String, ChannelError>>>,
        calls: Arc<Mutex<Vec<ChannelCall>>>,
    }

    impl MockCommandChannel {
        pub fn new(
            background: Result<String, ChannelError>,
            foreground: Result<String, ChannelError>,
        ) -> Self {
            Self {
                background: Arc::new(Mutex::new(background)),
                foreground: Arc::new(Mutex::new(foreground)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Trigger drops the connection, log retrieval returns `logs`
        pub fn with_logs(logs: impl Into<String>) -> Self {
            Self::new(
                Err(ChannelError::Disconnected("connection reset by peer".to_string())),
                Ok(logs.into()),
            )
        }

        /// Trigger drops the connection, log retrieval fails
        pub fn with_log_failure(error: ChannelError) -> Self {
            Self::new(
                Err(ChannelError::Disconnected("connection reset by peer".to_string())),
                Err(error),
            )
        }

        pub fn calls(&self) -> Vec<ChannelCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, address: &str, credential: &Credential, command: &str, background: bool) {
            self.calls.lock().unwrap().push(ChannelCall {
                address: address.to_string(),
                username: credential.username.clone(),
                command: command.to_string(),
                background,
            });
        }
    }

    #[async_trait]
    impl CommandChannel for MockCommandChannel {
        async fn run_background(
            &self,
            address: &str,
            credential: &Credential,
            command: &str,
        ) -> Result<String, ChannelError> {
            self.record(address, credential, command, true);
            self.background.lock().unwrap().clone()
        }

        async fn run_foreground(
            &self,
            address: &str,
            credential: &Credential,
            command: &str,
        ) -> Result<String, ChannelError> {
            self.record(address, credential, command, false);
            self.foreground.lock().unwrap().clone()
        }
    }
}
