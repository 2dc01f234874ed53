// Verification state machine phases

use serde::{Deserialize, Serialize};

/// Phase of one iteration: `Triggering -> AwaitingLocal -> AwaitingRemote
/// -> (InspectingLogs) -> Classified`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Triggering,
    AwaitingLocal,
    AwaitingRemote,
    InspectingLogs,
    Classified,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Triggering => write!(f, "TRIGGERING"),
            Phase::AwaitingLocal => write!(f, "AWAITING_LOCAL"),
            Phase::AwaitingRemote => write!(f, "AWAITING_REMOTE"),
            Phase::InspectingLogs => write!(f, "INSPECTING_LOGS"),
            Phase::Classified => write!(f, "CLASSIFIED"),
        }
    }
}
