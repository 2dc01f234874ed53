// ICMP reachability probe (system ping)
// reason: tokio::process, raw sockets would need elevated privileges
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use rebound_core::port::reachability_probe::{ProbeError, ReachabilityProbe};

/// Default per-probe reply wait (1 second)
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(1);

/// Single echo request through the platform `ping` binary
///
/// A zero exit status means the host answered. Spawn or wait failures are
/// reported as `ProbeError`; callers treat them as unreachable.
pub struct PingProbe {
    reply_timeout: Duration,
}

impl PingProbe {
    pub fn new(reply_timeout: Duration) -> Self {
        Self { reply_timeout }
    }

    fn args(&self, address: &str) -> Vec<String> {
        #[cfg(windows)]
        {
            // -w takes milliseconds
            vec![
                "-n".to_string(),
                "1".to_string(),
                "-w".to_string(),
                self.reply_timeout.as_millis().max(1).to_string(),
                address.to_string(),
            ]
        }

        // BSD-family ping: -W takes milliseconds
        #[cfg(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "freebsd",
            target_os = "dragonfly"
        ))]
        {
            vec![
                "-c".to_string(),
                "1".to_string(),
                "-W".to_string(),
                self.reply_timeout.as_millis().max(1).to_string(),
                address.to_string(),
            ]
        }

        // Linux (iputils/busybox) ping: -W takes whole seconds
        #[cfg(not(any(
            windows,
            target_os = "macos",
            target_os = "ios",
            target_os = "freebsd",
            target_os = "dragonfly"
        )))]
        {
            vec![
                "-c".to_string(),
                "1".to_string(),
                "-W".to_string(),
                self.reply_timeout.as_secs().max(1).to_string(),
                address.to_string(),
            ]
        }
    }
}

impl Default for PingProbe {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_TIMEOUT)
    }
}

#[async_trait]
impl ReachabilityProbe for PingProbe {
    async fn probe(&self, address: &str) -> Result<bool, ProbeError> {
        let status = Command::new("ping")
            .args(self.args(address))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProbeError::Spawn(e.to_string()))?
            .wait()
            .await
            .map_err(|e| ProbeError::Io(e.to_string()))?;

        let up = status.success();
        debug!(address = %address, up = %up, exit_code = ?status.code(), "Ping probe");
        Ok(up)
    }
}
