// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Record invariant violated (iteration {iteration}): {reason}")]
    InvariantViolation { iteration: i64, reason: String },

    #[error("Unknown scenario: {0} (expected 'reboot' or 'soft-reset')")]
    UnknownScenario(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
