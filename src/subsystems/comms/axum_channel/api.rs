//! Axum handlers for `/api/*` routes.
//!
//! Each handler receives [`AxumState`] via [`axum::extract::State`] and
//! returns an axum [`Response`]. Store locks are never held across an
//! `.await` on the LLM.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{info, warn};

use crate::error::RecordError;
use crate::llm::ProviderError;
use crate::subsystems::dashboard::DashboardSummary;
use crate::subsystems::fleet::NewVehicle;
use crate::subsystems::marketing::{NewAlert, NewCampaign};
use crate::subsystems::recommend::{RecommendError, RecommendKind, RecommendRequest};
use crate::subsystems::roster::{AgentRequest, AgentStatus};
use crate::subsystems::vendors::{NewPartner, NewSupplier};
use crate::subsystems::visa::{DocumentStatus, NewVisaApplication, VisaStatus};

use super::AxumState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusUpdate<T> {
    status: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct BookingRequest {
    seats: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct MaintenanceRequest {
    maintenance: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct DocumentUpdate {
    name: String,
    status: DocumentStatus,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": msg.to_string() }))
}

fn record_error(e: RecordError) -> Response {
    let status = match e {
        RecordError::Validation(_) => StatusCode::BAD_REQUEST,
        RecordError::NotFound { .. } => StatusCode::NOT_FOUND,
        RecordError::CapacityExceeded { .. } | RecordError::Unavailable { .. } => StatusCode::CONFLICT,
    };
    (status, json_error(e)).into_response()
}

/// `status` + JSON body on success, mapped [`RecordError`] otherwise.
fn reply<T: Serialize>(status: StatusCode, result: Result<T, RecordError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => record_error(e),
    }
}

/// Unwrap a JSON body, turning malformed input into a 400 `{ error }`.
fn payload<T: DeserializeOwned>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(v)| v).map_err(|e| {
        (StatusCode::BAD_REQUEST, json_error(format!("Invalid request body: {}", e.body_text()))).into_response()
    })
}

/// Numeric record id from the path; a non-numeric id is a 400 `{ error }`.
fn record_id(path: Result<Path<u32>, PathRejection>) -> Result<u32, Response> {
    path.map(|Path(id)| id).map_err(|e| {
        (StatusCode::BAD_REQUEST, json_error(format!("Invalid record id: {}", e.body_text()))).into_response()
    })
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health
pub(super) async fn health(State(state): State<AxumState>) -> Response {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "channel": &*state.channel_id,
        "llm": state.office.recommender().provider_name(),
    }))
    .into_response()
}

/// GET /api/dashboard
pub(super) async fn dashboard(State(state): State<AxumState>) -> Response {
    let today = state.office.today();
    let stores = state.office.read().await;
    Json(DashboardSummary::collect(&stores, today)).into_response()
}

pub(super) async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, json_error("Not found")).into_response()
}

// ── Agents ──

/// GET /api/agents?q=
pub(super) async fn list_agents(State(state): State<AxumState>, Query(query): Query<SearchQuery>) -> Response {
    Json(state.office.read().await.roster.list(&query.q)).into_response()
}

/// GET /api/agents/{id}
pub(super) async fn get_agent(State(state): State<AxumState>, id: Result<Path<u32>, PathRejection>) -> Response {
    let id = match record_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let stores = state.office.read().await;
    reply(StatusCode::OK, stores.roster.get(id))
}

/// POST /api/agents — new agent request, routed to HR as `Pending`.
pub(super) async fn request_agent(
    State(state): State<AxumState>,
    body: Result<Json<AgentRequest>, JsonRejection>,
) -> Response {
    let req = match payload(body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let today = state.office.today();
    let result = state.office.write().await.roster.request(req, today);
    if let Ok(agent) = &result {
        info!(channel_id = %state.channel_id, id = agent.id, name = %agent.name, "agent request sent to HR");
    }
    reply(StatusCode::CREATED, result)
}

/// PATCH /api/agents/{id}/status
pub(super) async fn set_agent_status(
    State(state): State<AxumState>,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<StatusUpdate<AgentStatus>>, JsonRejection>,
) -> Response {
    let id = match record_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let update = match payload(body) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    reply(StatusCode::OK, state.office.write().await.roster.set_status(id, update.status))
}

// ── Suppliers & partners ──

/// GET /api/suppliers?q=
pub(super) async fn list_suppliers(State(state): State<AxumState>, Query(query): Query<SearchQuery>) -> Response {
    Json(state.office.read().await.vendors.list_suppliers(&query.q)).into_response()
}

/// POST /api/suppliers
pub(super) async fn add_supplier(
    State(state): State<AxumState>,
    body: Result<Json<NewSupplier>, JsonRejection>,
) -> Response {
    let new = match payload(body) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    reply(StatusCode::CREATED, state.office.write().await.vendors.add_supplier(new))
}

/// GET /api/partners
pub(super) async fn list_partners(State(state): State<AxumState>) -> Response {
    Json(state.office.read().await.vendors.list_partners()).into_response()
}

/// POST /api/partners
pub(super) async fn add_partner(
    State(state): State<AxumState>,
    body: Result<Json<NewPartner>, JsonRejection>,
) -> Response {
    let new = match payload(body) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    reply(StatusCode::CREATED, state.office.write().await.vendors.add_partner(new))
}

// ── Vehicles ──

/// GET /api/vehicles?q=
pub(super) async fn list_vehicles(State(state): State<AxumState>, Query(query): Query<SearchQuery>) -> Response {
    let stores = state.office.read().await;
    Json(json!({
        "summary": stores.fleet.summary(),
        "vehicles": stores.fleet.list(&query.q),
    }))
    .into_response()
}

/// POST /api/vehicles
pub(super) async fn add_vehicle(
    State(state): State<AxumState>,
    body: Result<Json<NewVehicle>, JsonRejection>,
) -> Response {
    let new = match payload(body) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    reply(StatusCode::CREATED, state.office.write().await.fleet.add(new))
}

/// POST /api/vehicles/{id}/bookings
pub(super) async fn book_vehicle(
    State(state): State<AxumState>,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Response {
    let id = match record_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let booking = match payload(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let result = state.office.write().await.fleet.book(id, booking.seats);
    if let Err(e) = &result {
        warn!(channel_id = %state.channel_id, id, seats = booking.seats, "vehicle booking refused: {e}");
    }
    reply(StatusCode::OK, result)
}

/// PATCH /api/vehicles/{id}/maintenance
pub(super) async fn set_vehicle_maintenance(
    State(state): State<AxumState>,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<MaintenanceRequest>, JsonRejection>,
) -> Response {
    let id = match record_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let req = match payload(body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    reply(StatusCode::OK, state.office.write().await.fleet.set_maintenance(id, req.maintenance))
}

// ── Tours ──

/// GET /api/tours
pub(super) async fn list_tours(State(state): State<AxumState>) -> Response {
    let stores = state.office.read().await;
    Json(json!({
        "summary": stores.tours.summary(),
        "tours": stores.tours.list(),
    }))
    .into_response()
}

/// POST /api/tours/{id}/bookings
pub(super) async fn book_tour(
    State(state): State<AxumState>,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Response {
    let id = match record_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let booking = match payload(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let result = state.office.write().await.tours.book(id, booking.seats);
    if let Err(e) = &result {
        warn!(channel_id = %state.channel_id, id, seats = booking.seats, "tour booking refused: {e}");
    }
    reply(StatusCode::OK, result)
}

// ── Visa ──

/// GET /api/visa
pub(super) async fn list_visa(State(state): State<AxumState>) -> Response {
    let today = state.office.today();
    Json(state.office.read().await.visa.list(today)).into_response()
}

/// POST /api/visa
pub(super) async fn submit_visa(
    State(state): State<AxumState>,
    body: Result<Json<NewVisaApplication>, JsonRejection>,
) -> Response {
    let new = match payload(body) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    let today = state.office.today();
    reply(StatusCode::CREATED, state.office.write().await.visa.submit(new, today))
}

/// POST /api/visa/{id}/documents
pub(super) async fn record_visa_document(
    State(state): State<AxumState>,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<DocumentUpdate>, JsonRejection>,
) -> Response {
    let id = match record_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let doc = match payload(body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let today = state.office.today();
    let result = state.office.write().await.visa.record_document(id, &doc.name, doc.status, today);
    reply(StatusCode::OK, result)
}

/// PATCH /api/visa/{id}/status
pub(super) async fn set_visa_status(
    State(state): State<AxumState>,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<StatusUpdate<VisaStatus>>, JsonRejection>,
) -> Response {
    let id = match record_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let update = match payload(body) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let today = state.office.today();
    reply(StatusCode::OK, state.office.write().await.visa.set_status(id, update.status, today))
}

// ── Marketing ──

/// GET /api/marketing/strategies
pub(super) async fn list_strategies(State(state): State<AxumState>) -> Response {
    Json(state.office.read().await.marketing.strategies()).into_response()
}

/// GET /api/marketing/campaigns
pub(super) async fn list_campaigns(State(state): State<AxumState>) -> Response {
    Json(state.office.read().await.marketing.campaigns()).into_response()
}

/// POST /api/marketing/campaigns
pub(super) async fn create_campaign(
    State(state): State<AxumState>,
    body: Result<Json<NewCampaign>, JsonRejection>,
) -> Response {
    let new = match payload(body) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    reply(StatusCode::CREATED, state.office.write().await.marketing.create_campaign(new))
}

/// GET /api/marketing/alerts
pub(super) async fn list_alerts(State(state): State<AxumState>) -> Response {
    Json(state.office.read().await.marketing.alerts()).into_response()
}

/// POST /api/marketing/alerts
pub(super) async fn add_alert(
    State(state): State<AxumState>,
    body: Result<Json<NewAlert>, JsonRejection>,
) -> Response {
    let new = match payload(body) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    let today = state.office.today();
    let result = state.office.write().await.marketing.add_alert(new, today);
    if let Ok(alert) = &result {
        info!(channel_id = %state.channel_id, location = %alert.location, severity = ?alert.severity, "destination alert posted");
    }
    reply(StatusCode::CREATED, result)
}

// ── Manual ──

/// GET /api/manual
pub(super) async fn list_manual(State(state): State<AxumState>) -> Response {
    Json(state.office.manual().list()).into_response()
}

/// GET /api/manual/{id}
pub(super) async fn get_manual(State(state): State<AxumState>, Path(id): Path<String>) -> Response {
    match state.office.manual().get(&id) {
        Some(doc) => Json(doc).into_response(),
        None => (StatusCode::NOT_FOUND, json_error(format!("manual module '{id}' not found"))).into_response(),
    }
}

// ── Recommend ──

/// POST /api/recommend
pub(super) async fn recommend(
    State(state): State<AxumState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Response {
    let req = match payload(body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let Some(kind) = RecommendKind::parse(&req.kind) else {
        return recommend_error(RecommendError::InvalidKind);
    };

    // Snapshot the records, then release the lock before calling out.
    let records = {
        let stores = state.office.read().await;
        match kind {
            RecommendKind::Agent => stores.roster.prompt_lines(),
            RecommendKind::Supplier => stores.vendors.prompt_lines(),
        }
    };

    match state.office.recommender().recommend(kind, &req.context, &records).await {
        Ok(rec) => Json(rec).into_response(),
        Err(e) => recommend_error(e),
    }
}

fn recommend_error(e: RecommendError) -> Response {
    let (status, message) = match &e {
        RecommendError::InvalidKind | RecommendError::EmptyContext => (StatusCode::BAD_REQUEST, e.to_string()),
        RecommendError::Provider(ProviderError::RateLimited) => (
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again later.".to_string(),
        ),
        RecommendError::Provider(ProviderError::QuotaExhausted) => (
            StatusCode::PAYMENT_REQUIRED,
            "AI credits exhausted. Please add credits in Settings.".to_string(),
        ),
        RecommendError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AI service error".to_string()),
    };
    (status, json_error(message)).into_response()
}
