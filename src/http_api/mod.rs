use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::{CalendarError, CalendarService, Event, NewEvent, PersistenceError};

#[derive(Clone)]
pub struct AppState {
    service: Arc<CalendarService>,
}

impl AppState {
    pub fn new(service: CalendarService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    fn service(&self) -> Arc<CalendarService> {
        self.service.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug, Serialize)]
struct EventsBody {
    events: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RegisterBody {
    user_key: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<CalendarError> for ApiError {
    fn from(value: CalendarError) -> Self {
        match value {
            CalendarError::UnknownUser(_) => ApiError::NotFound(value.to_string()),
            CalendarError::InvalidEvent(_) => ApiError::Invalid(value.to_string()),
            CalendarError::Persistence(PersistenceError::DuplicateUser(_)) => {
                ApiError::Conflict(value.to_string())
            }
            CalendarError::Persistence(_)
            | CalendarError::MalformedEvent { .. }
            | CalendarError::TimeOutOfRange(_) => {
                error!(error = %value, "request failed");
                ApiError::Internal(value.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/events/today/:user_key", get(today_events))
        .route(
            "/events/day-offset/:user_key/:offset",
            get(events_at_offset),
        )
        .route("/events/:user_key", post(create_event))
        .route("/add-test-events/:user_key", post(add_test_events))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, service: CalendarService) -> std::io::Result<()> {
    let state = AppState::new(service);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "calendar HTTP API listening");
    axum::serve(listener, app).await
}

async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "store": state.service().store_name() }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn register(State(state): State<AppState>) -> Result<Json<RegisterBody>, ApiError> {
    let user = state.service().register()?;
    Ok(Json(RegisterBody {
        user_key: user.user_key,
    }))
}

async fn today_events(
    State(state): State<AppState>,
    Path(user_key): Path<String>,
) -> Result<Json<EventsBody>, ApiError> {
    let events = state.service().today_events(&user_key)?;
    Ok(Json(EventsBody { events }))
}

async fn events_at_offset(
    State(state): State<AppState>,
    Path((user_key, offset)): Path<(String, String)>,
) -> Result<Json<EventsBody>, ApiError> {
    let offset: i64 = offset
        .trim()
        .parse()
        .map_err(|_| ApiError::invalid(format!("day offset '{offset}' is not an integer")))?;
    let events = state.service().events_at_offset(&user_key, offset)?;
    Ok(Json(EventsBody { events }))
}

async fn create_event(
    State(state): State<AppState>,
    Path(user_key): Path<String>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::invalid(rejection.body_text()))?;
    let event = state.service().add_event(&user_key, &payload)?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn add_test_events(
    State(state): State<AppState>,
    Path(user_key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service().seed_test_events(&user_key)?;
    Ok(Json(json!({ "status": "test events added" })))
}
