use super::NotificationPublisher;

/// Publisher that only emits a tracing event per message.
///
/// Used when no message broker is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPublisher;

impl NotificationPublisher for LoggingPublisher {
    fn publish(&self, topic: &str, payload: Vec<u8>, key: Option<Vec<u8>>) {
        tracing::info!(
            topic,
            key = %key.as_deref().map(String::from_utf8_lossy).unwrap_or_default(),
            payload = %String::from_utf8_lossy(&payload),
            "notification published"
        );
    }
}
