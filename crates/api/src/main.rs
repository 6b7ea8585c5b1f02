//! API server entry point.

use std::sync::Arc;

use api::config::{Config, LogFormat};
use document_store::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use usecases::{LoggingPublisher, NotificationPublisher};

const DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn build_publisher(config: &Config) -> Arc<dyn NotificationPublisher> {
    #[cfg(feature = "kafka")]
    {
        if let Some(brokers) = &config.kafka_brokers {
            match usecases::KafkaPublisher::new(brokers) {
                Ok(publisher) => {
                    tracing::info!(%brokers, "publishing notifications to Kafka");
                    return Arc::new(publisher);
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to create Kafka producer, notifications will only be logged");
                }
            }
        }
    }

    #[cfg(not(feature = "kafka"))]
    {
        if config.kafka_brokers.is_some() {
            tracing::warn!("KAFKA_BROKERS is set but the kafka feature is disabled, notifications will only be logged");
        }
    }

    Arc::new(LoggingPublisher)
}

async fn serve<S: DocumentStore + Clone + 'static>(
    config: &Config,
    store: S,
    metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
) {
    let publisher = build_publisher(config);
    let state = api::create_default_state(store, publisher, &config.ticket_created_topic);
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the document store and serve
    match &config.database_url {
        Some(url) => {
            let store = PostgresDocumentStore::connect(url, DATABASE_MAX_CONNECTIONS)
                .await
                .expect("failed to connect to PostgreSQL");
            store
                .run_migrations()
                .await
                .expect("failed to run migrations");
            serve(&config, store, metrics_handle).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory document store");
            serve(&config, InMemoryDocumentStore::new(), metrics_handle).await;
        }
    }
}
