// Port Layer - Interfaces for external collaborators

pub mod command_channel;
pub mod event_sink; // Injected observability
pub mod reachability_probe;
pub mod result_store;
pub mod time_provider;

// Re-exports
pub use command_channel::{ChannelError, CommandChannel};
pub use event_sink::{EventSink, TracingEventSink, VerificationEvent};
pub use reachability_probe::{ProbeError, ReachabilityProbe};
pub use result_store::{ResultStore, StoreError};
pub use time_provider::TimeProvider;
