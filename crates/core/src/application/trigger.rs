// Disruptive command trigger
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::Credential;
use crate::port::{ChannelError, CommandChannel, EventSink, VerificationEvent};

/// Issues a connectivity-severing command over the remote channel
///
/// A channel failure here is the expected outcome (the device drops the
/// session as it goes down), so it is reported and handed back to the
/// caller without aborting anything.
pub struct DisruptionTrigger {
    channel: Arc<dyn CommandChannel>,
    events: Arc<dyn EventSink>,
    settle_delay: Duration,
}

impl DisruptionTrigger {
    pub fn new(
        channel: Arc<dyn CommandChannel>,
        events: Arc<dyn EventSink>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            channel,
            events,
            settle_delay,
        }
    }

    /// Run `command` in the background on `address`, then wait the settle delay
    pub async fn trigger(
        &self,
        address: &str,
        credential: &Credential,
        command: &str,
    ) -> Result<String, ChannelError> {
        self.events.emit(&VerificationEvent::TriggerIssued {
            address: address.to_string(),
            command: command.to_string(),
        });

        let result = self
            .channel
            .run_background(address, credential, command)
            .await;

        if let Err(e) = &result {
            self.events.emit(&VerificationEvent::TriggerDisconnected {
                address: address.to_string(),
                error: e.to_string(),
            });
        }

        self.events.emit(&VerificationEvent::Waiting {
            address: address.to_string(),
            duration: self.settle_delay,
        });
        sleep(self.settle_delay).await;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::command_channel::mocks::MockCommandChannel;
    use crate::port::event_sink::mocks::RecordingEventSink;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_is_returned_not_raised() {
        let channel = Arc::new(MockCommandChannel::with_logs(""));
        let sink = RecordingEventSink::new();
        let trigger = DisruptionTrigger::new(
            channel.clone(),
            Arc::new(sink.clone()),
            Duration::from_secs(2),
        );
        let start = Instant::now();

        let result = trigger
            .trigger("10.0.0.1", &Credential::key_based("root"), "reboot &")
            .await;

        assert!(matches!(result, Err(ChannelError::Disconnected(_))));
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, VerificationEvent::TriggerDisconnected { .. })));

        let calls = channel.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].background);
        assert_eq!(calls[0].command, "reboot &");
        assert_eq!(calls[0].username, "root");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_passes_output_through() {
        let channel = Arc::new(MockCommandChannel::new(
            Ok("reloading".to_string()),
            Ok(String::new()),
        ));
        let trigger = DisruptionTrigger::new(
            channel,
            Arc::new(RecordingEventSink::new()),
            Duration::from_secs(2),
        );

        let output = trigger
            .trigger("10.0.0.1", &Credential::key_based("root"), "reload")
            .await;

        let output = tokio_test::assert_ok!(output);
        assert_eq!(output, "reloading");
    }
}
