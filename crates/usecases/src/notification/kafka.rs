use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use super::NotificationPublisher;

/// Publisher backed by a Kafka producer.
///
/// Every message is sent from its own task; the caller never waits for the
/// broker. Delivery failures are logged.
#[derive(Clone)]
pub struct KafkaPublisher {
    producer: FutureProducer,
}

impl KafkaPublisher {
    pub fn new(brokers: &str) -> Result<Self, KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer })
    }
}

impl NotificationPublisher for KafkaPublisher {
    fn publish(&self, topic: &str, payload: Vec<u8>, key: Option<Vec<u8>>) {
        let producer = self.producer.clone();
        let topic = topic.to_string();

        tokio::spawn(async move {
            let mut record = FutureRecord::<[u8], [u8]>::to(&topic).payload(&payload);
            if let Some(key) = key.as_deref() {
                record = record.key(key);
            }

            match producer
                .send(record, Timeout::After(Duration::from_secs(0)))
                .await
            {
                Ok(_) => tracing::debug!(%topic, "notification delivered"),
                Err((e, _)) => tracing::error!(%topic, error = %e, "notification delivery failed"),
            }
        });
    }
}
