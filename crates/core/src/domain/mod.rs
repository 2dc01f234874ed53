// Domain Layer - Pure verification entities and classification rules

pub mod credential;
pub mod error;
pub mod phase;
pub mod record;

// Re-exports
pub use credential::Credential;
pub use error::DomainError;
pub use phase::Phase;
pub use record::{
    classify, header_not_found_excerpt, IterationNumber, IterationRecord, Reachability, Scenario,
    Status, HEADER_NOT_FOUND_PREFIX, RETRIEVAL_ERROR_PREFIX, SKIPPED_SENTINEL,
};
