//! HTTP API server with observability for the event provisioning service.
//!
//! Exposes the event workflows as REST endpoints, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use document_store::DocumentStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use usecases::{EventCommandService, EventQueryService, NotificationPublisher};

pub use routes::events::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    let event_routes = Router::new()
        .route("/v1/create-event", post(routes::events::create_event::<S>))
        .route(
            "/v1/create-online-ticket-config",
            post(routes::events::create_online_ticket_config::<S>),
        )
        .route("/v1/list", get(routes::events::list::<S>))
        .with_state(state);

    Router::new()
        .route("/health", get(routes::health::check))
        .nest("/api/event", event_routes)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the workflows over one document store and publisher.
pub fn create_default_state<S: DocumentStore + Clone + 'static>(
    store: S,
    publisher: Arc<dyn NotificationPublisher>,
    ticket_created_topic: &str,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        commands: EventCommandService::new(store.clone(), publisher)
            .with_ticket_created_topic(ticket_created_topic),
        queries: EventQueryService::new(store),
    })
}
