// Application Layer - Verification use cases

pub mod campaign;
pub mod config;
pub mod constants;
pub mod log_window;
pub mod poller;
pub mod recorder;
pub mod summary;
pub mod trigger;
pub mod verifier;

// Re-exports
pub use campaign::{Campaign, CampaignPlan};
pub use config::{LocalPolicy, VerifierConfig};
pub use log_window::LogWindow;
pub use poller::ReachabilityPoller;
pub use recorder::{ResultRecorder, ITERATIONS_KEY};
pub use summary::{ResultSummary, StatusCounts};
pub use trigger::DisruptionTrigger;
pub use verifier::{DeviceTarget, RecoveryVerifier};
