//! Event provisioning endpoints under `/api/event`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use common::UserId;
use document_store::DocumentStore;
use serde::Serialize;
use usecases::{
    CreateEventRequest, EventCommandService, EventQueryService, EventView, FindEventsRequest,
    NotificationPublisher, OnlineTicketConfigRequest, PageMetadata,
};

use crate::error::ApiError;

/// Header carrying the authenticated caller, set by the gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub commands: EventCommandService<S, Arc<dyn NotificationPublisher>>,
    pub queries: EventQueryService<S>,
}

/// The caller's identity, taken from [`USER_ID_HEADER`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| CurrentUser(UserId::new(v)))
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {USER_ID_HEADER} header")))
    }
}

/// Success envelope shared by all event endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMetadata>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, message: &'static str) -> Self {
        Self {
            success: true,
            data,
            message,
            meta: None,
        }
    }
}

/// POST /api/event/v1/create-event
#[tracing::instrument(skip_all, fields(user_id = %user))]
pub async fn create_event<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<&'static str>>), ApiError> {
    let Json(mut request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    request.user_id = user;

    let result = state.commands.create_event(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(result, "Create event success")),
    ))
}

/// POST /api/event/v1/create-online-ticket-config
#[tracing::instrument(skip_all, fields(user_id = %user))]
pub async fn create_online_ticket_config<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<OnlineTicketConfigRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    let Json(mut request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    request.user_id = user;

    let result = state.commands.create_online_ticket_config(request).await?;
    Ok(Json(ApiResponse::ok(
        result,
        "Create online ticket config success",
    )))
}

/// GET /api/event/v1/list?page=&size=&search=
#[tracing::instrument(skip_all)]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(_user): CurrentUser,
    query: Result<Query<FindEventsRequest>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<EventView>>>, ApiError> {
    let Query(request) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let page = state.queries.find_events(request).await?;
    Ok(Json(ApiResponse {
        meta: Some(page.meta_data),
        ..ApiResponse::ok(page.collection_data, "Get event success")
    }))
}
