// Verifier configuration
use std::time::Duration;

use super::constants::*;
use crate::domain::Scenario;
use crate::error::{AppError, Result};

/// How the verifier waits for the local address after a disruption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalPolicy {
    /// Sleep the full duration, then probe once
    FixedDelay(Duration),
    /// Poll until the address answers or the timeout elapses
    BoundedRetry { timeout: Duration, interval: Duration },
}

/// Timings and device strings for one verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub settle_delay: Duration,
    pub boot_delay: Duration,
    pub reset_poll_timeout: Duration,
    pub reset_poll_interval: Duration,
    pub reboot_command: String,
    pub reset_command: String,
    pub log_command: String,
    pub log_header: String,
    pub success_marker: String,
    pub window_offset: usize,
    pub window_length: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            boot_delay: DEFAULT_BOOT_DELAY,
            reset_poll_timeout: DEFAULT_RESET_POLL_TIMEOUT,
            reset_poll_interval: DEFAULT_RESET_POLL_INTERVAL,
            reboot_command: DEFAULT_REBOOT_COMMAND.to_string(),
            reset_command: DEFAULT_RESET_COMMAND.to_string(),
            log_command: DEFAULT_LOG_COMMAND.to_string(),
            log_header: DEFAULT_LOG_HEADER.to_string(),
            success_marker: DEFAULT_SUCCESS_MARKER.to_string(),
            window_offset: DEFAULT_WINDOW_OFFSET,
            window_length: DEFAULT_WINDOW_LENGTH,
        }
    }
}

impl VerifierConfig {
    /// Reboot waits out a full boot cycle; soft reset polls
    pub fn local_policy(&self, scenario: Scenario) -> LocalPolicy {
        match scenario {
            Scenario::Reboot => LocalPolicy::FixedDelay(self.boot_delay),
            Scenario::SoftReset => LocalPolicy::BoundedRetry {
                timeout: self.reset_poll_timeout,
                interval: self.reset_poll_interval,
            },
        }
    }

    pub fn command_for(&self, scenario: Scenario) -> &str {
        match scenario {
            Scenario::Reboot => &self.reboot_command,
            Scenario::SoftReset => &self.reset_command,
        }
    }

    /// Reject configurations that can never produce a meaningful record
    pub fn validate(&self) -> Result<()> {
        if self.reboot_command.trim().is_empty() || self.reset_command.trim().is_empty() {
            return Err(AppError::Config("disruptive commands cannot be empty".to_string()));
        }
        if self.log_header.trim().is_empty() {
            return Err(AppError::Config("log header cannot be empty".to_string()));
        }
        if self.success_marker.is_empty() {
            return Err(AppError::Config("success marker cannot be empty".to_string()));
        }
        if self.window_length == 0 {
            return Err(AppError::Config("log window length must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_per_scenario() {
        let config = VerifierConfig::default();

        assert_eq!(
            config.local_policy(Scenario::Reboot),
            LocalPolicy::FixedDelay(Duration::from_secs(180))
        );
        assert_eq!(
            config.local_policy(Scenario::SoftReset),
            LocalPolicy::BoundedRetry {
                timeout: Duration::from_secs(15),
                interval: Duration::from_secs(3),
            }
        );
    }

    #[test]
    fn test_command_per_scenario() {
        let config = VerifierConfig::default();
        assert_eq!(config.command_for(Scenario::Reboot), "reboot &");
        assert_eq!(
            config.command_for(Scenario::SoftReset),
            "/etc/init.d/network reload &"
        );
    }

    #[test]
    fn test_validate() {
        assert!(VerifierConfig::default().validate().is_ok());

        let config = VerifierConfig {
            window_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = VerifierConfig {
            log_header: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
