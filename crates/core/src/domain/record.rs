// Iteration Record Domain Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::DomainError;

/// Caller-supplied iteration sequence number (not checked for uniqueness)
pub type IterationNumber = i64;

/// Log excerpt recorded when the local address never came back
pub const SKIPPED_SENTINEL: &str = "skipped: local unreachable";

/// Prefix of the log excerpt recorded when the device log header is missing
pub const HEADER_NOT_FOUND_PREFIX: &str = "not found: header ";

/// Prefix of the log excerpt recorded when log retrieval itself failed
pub const RETRIEVAL_ERROR_PREFIX: &str = "error: log retrieval failed: ";

/// Log excerpt recorded when `header` never appears in the device logs
pub fn header_not_found_excerpt(header: &str) -> String {
    format!("{}'{}' absent from device logs", HEADER_NOT_FOUND_PREFIX, header)
}

/// Disruptive action run during an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Full device reboot
    Reboot,
    /// Network-stack reload without reboot
    SoftReset,
}

impl Scenario {
    /// Only the reboot scenario inspects device logs
    pub fn inspects_logs(&self) -> bool {
        matches!(self, Scenario::Reboot)
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::Reboot => write!(f, "reboot"),
            Scenario::SoftReset => write!(f, "soft-reset"),
        }
    }
}

impl FromStr for Scenario {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reboot" => Ok(Scenario::Reboot),
            "soft-reset" | "soft_reset" | "reset" => Ok(Scenario::SoftReset),
            other => Err(DomainError::UnknownScenario(other.to_string())),
        }
    }
}

/// Three-valued iteration outcome
///
/// `Partial` flags disagreement between ping reachability and the device's
/// own log confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pass,
    Partial,
    Fail,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Partial => write!(f, "PARTIAL"),
            Status::Fail => write!(f, "FAIL"),
        }
    }
}

/// Combine the ping-derived status with the log marker outcome
///
/// | ping    | marker | result  |
/// |---------|--------|---------|
/// | Pass    | yes    | Pass    |
/// | Pass    | no     | Partial |
/// | Fail    | yes    | Partial |
/// | Fail    | no     | Fail    |
pub fn classify(ping_status: Status, marker_found: bool) -> Status {
    match (ping_status, marker_found) {
        (Status::Pass, true) => Status::Pass,
        (Status::Pass, false) => Status::Partial,
        (Status::Fail, true) => Status::Partial,
        (Status::Fail, false) => Status::Fail,
        // Ping checks never produce Partial; keep it as-is
        (Status::Partial, _) => Status::Partial,
    }
}

/// Reachability observed after the disruption
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reachability {
    pub local_up: bool,
    pub remote_up: bool,
}

/// One verification attempt, as appended to the result store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationRecord {
    pub iteration: IterationNumber,
    pub scenario: Scenario,
    pub status: Status,
    pub local_address: String,
    pub remote_address: String,
    pub reachability: Reachability,
    pub log_excerpt: Option<String>,
    pub recorded_at_ms: i64, // epoch ms
}

impl IterationRecord {
    /// Check the record-level invariants
    ///
    /// - `Pass` requires both local and remote up
    /// - remote up requires local up (remote is only probed after local)
    /// - local down means the log check was skipped and the status is `Fail`
    pub fn validate(&self) -> Result<(), DomainError> {
        let violation = |reason: &str| DomainError::InvariantViolation {
            iteration: self.iteration,
            reason: reason.to_string(),
        };

        if self.status == Status::Pass
            && !(self.reachability.local_up && self.reachability.remote_up)
        {
            return Err(violation("PASS requires local and remote reachability"));
        }

        if self.reachability.remote_up && !self.reachability.local_up {
            return Err(violation("remote reported up while local was down"));
        }

        if !self.reachability.local_up {
            if self.status != Status::Fail {
                return Err(violation("local unreachable must classify as FAIL"));
            }
            if self.log_excerpt.as_deref() != Some(SKIPPED_SENTINEL) {
                return Err(violation("local unreachable must carry the skipped excerpt"));
            }
        }

        Ok(())
    }

    /// True if the excerpt is one of the explanatory sentinels rather than log text
    pub fn has_sentinel_excerpt(&self) -> bool {
        match self.log_excerpt.as_deref() {
            Some(text) => {
                text == SKIPPED_SENTINEL
                    || text.starts_with(HEADER_NOT_FOUND_PREFIX)
                    || text.starts_with(RETRIEVAL_ERROR_PREFIX)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: Status, local_up: bool, remote_up: bool, excerpt: Option<&str>) -> IterationRecord {
        IterationRecord {
            iteration: 7,
            scenario: Scenario::Reboot,
            status,
            local_address: "192.168.1.56".to_string(),
            remote_address: "192.168.1.15".to_string(),
            reachability: Reachability {
                local_up,
                remote_up,
            },
            log_excerpt: excerpt.map(str::to_string),
            recorded_at_ms: 1_000,
        }
    }

    #[test]
    fn test_classify_table() {
        assert_eq!(classify(Status::Pass, true), Status::Pass);
        assert_eq!(classify(Status::Pass, false), Status::Partial);
        assert_eq!(classify(Status::Fail, true), Status::Partial);
        assert_eq!(classify(Status::Fail, false), Status::Fail);
    }

    #[test]
    fn test_scenario_parse_and_display() {
        assert_eq!("reboot".parse::<Scenario>().unwrap(), Scenario::Reboot);
        assert_eq!("Soft-Reset".parse::<Scenario>().unwrap(), Scenario::SoftReset);
        assert_eq!(Scenario::SoftReset.to_string(), "soft-reset");
        assert!("shutdown".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(record(Status::Pass, true, true, Some("line"))).unwrap();

        assert_eq!(json["status"], "PASS");
        assert_eq!(json["scenario"], "reboot");
        assert_eq!(json["localAddress"], "192.168.1.56");
        assert_eq!(json["reachability"]["localUp"], true);
        assert_eq!(json["logExcerpt"], "line");
    }

    #[test]
    fn test_validate_accepts_consistent_records() {
        assert!(record(Status::Pass, true, true, Some("ok")).validate().is_ok());
        assert!(record(Status::Partial, true, false, Some("ok")).validate().is_ok());
        assert!(record(Status::Fail, false, false, Some(SKIPPED_SENTINEL))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_broken_invariants() {
        assert!(record(Status::Pass, true, false, None).validate().is_err());
        assert!(record(Status::Fail, false, true, Some(SKIPPED_SENTINEL))
            .validate()
            .is_err());
        assert!(record(Status::Fail, false, false, None).validate().is_err());

        let err = record(Status::Partial, false, false, Some(SKIPPED_SENTINEL))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("FAIL"));
    }

    #[test]
    fn test_sentinel_detection() {
        assert!(record(Status::Fail, false, false, Some(SKIPPED_SENTINEL)).has_sentinel_excerpt());
        let retrieval = format!("{}connection refused", RETRIEVAL_ERROR_PREFIX);
        assert!(record(Status::Pass, true, true, Some(&retrieval)).has_sentinel_excerpt());
        let missing = header_not_found_excerpt("Boot Journal");
        assert_eq!(missing, "not found: header 'Boot Journal' absent from device logs");
        assert!(record(Status::Partial, true, true, Some(&missing)).has_sentinel_excerpt());
        assert!(!record(Status::Pass, true, true, Some("Device Init, Success")).has_sentinel_excerpt());
        assert!(!record(Status::Pass, true, true, None).has_sentinel_excerpt());
    }
}
