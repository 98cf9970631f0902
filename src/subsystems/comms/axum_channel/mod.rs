//! Axum-based HTTP channel — serves the back-office JSON API under `/api/`.
//!
//! Implements [`Component`] so it slots into the comms subsystem lifecycle:
//! `run()` drives the axum event loop and the shared [`CancellationToken`]
//! is wired to axum's graceful shutdown.
//!
//! ## URL layout
//!
//! ```text
//! GET   /api/health
//! GET   /api/dashboard
//! GET   /api/agents?q=              POST  /api/agents
//! GET   /api/agents/{id}            PATCH /api/agents/{id}/status
//! GET   /api/suppliers?q=           POST  /api/suppliers
//! GET   /api/partners               POST  /api/partners
//! GET   /api/vehicles?q=            POST  /api/vehicles
//! POST  /api/vehicles/{id}/bookings PATCH /api/vehicles/{id}/maintenance
//! GET   /api/tours                  POST  /api/tours/{id}/bookings
//! GET   /api/visa                   POST  /api/visa
//! POST  /api/visa/{id}/documents    PATCH /api/visa/{id}/status
//! GET   /api/marketing/strategies
//! GET   /api/marketing/campaigns    POST  /api/marketing/campaigns
//! GET   /api/marketing/alerts       POST  /api/marketing/alerts
//! GET   /api/manual                 GET   /api/manual/{id}
//! POST  /api/recommend
//! ```
//!
//! Every response carries permissive CORS headers; `OPTIONS` preflights are
//! answered directly with 200.

mod api;

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::subsystems::runtime::{Component, ComponentFuture};

use super::state::BackofficeState;

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "GET, POST, PATCH, OPTIONS";

/// Router state injected into every handler. Cheap to clone.
#[derive(Clone)]
pub(crate) struct AxumState {
    /// Channel identifier used in log fields.
    pub channel_id: Arc<str>,
    pub office: Arc<BackofficeState>,
}

// ── AxumChannel ───────────────────────────────────────────────────────────────

pub struct AxumChannel {
    channel_id: String,
    bind_addr: String,
    state: Arc<BackofficeState>,
}

impl AxumChannel {
    pub fn new(channel_id: impl Into<String>, bind_addr: impl Into<String>, state: Arc<BackofficeState>) -> Self {
        Self {
            channel_id: channel_id.into(),
            bind_addr: bind_addr.into(),
            state,
        }
    }
}

impl Component for AxumChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_axum(self.channel_id, self.bind_addr, self.state, shutdown))
    }
}

// ── Server loop ───────────────────────────────────────────────────────────────

async fn run_axum(
    channel_id: String,
    bind_addr: String,
    office: Arc<BackofficeState>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router_for(&channel_id, office);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Comms(format!("axum bind failed on {bind_addr}: {e}")))?;

    let local = listener.local_addr().map(|a| a.to_string()).unwrap_or(bind_addr);
    info!(%channel_id, bind = %local, "axum channel listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Comms(format!("axum server error: {e}")))?;

    info!(%channel_id, "axum channel shut down");
    Ok(())
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Full API router over `office`, with CORS applied. Used by the channel and
/// by integration tests that drive it without a socket.
pub fn build_router(office: Arc<BackofficeState>) -> Router {
    build_router_for("axum0", office)
}

fn build_router_for(channel_id: &str, office: Arc<BackofficeState>) -> Router {
    let state = AxumState { channel_id: Arc::from(channel_id), office };

    Router::new()
        .route("/api/health",                         get(api::health))
        .route("/api/dashboard",                      get(api::dashboard))
        .route("/api/agents",                         get(api::list_agents).post(api::request_agent))
        .route("/api/agents/{id}",                    get(api::get_agent))
        .route("/api/agents/{id}/status",             patch(api::set_agent_status))
        .route("/api/suppliers",                      get(api::list_suppliers).post(api::add_supplier))
        .route("/api/partners",                       get(api::list_partners).post(api::add_partner))
        .route("/api/vehicles",                       get(api::list_vehicles).post(api::add_vehicle))
        .route("/api/vehicles/{id}/bookings",         post(api::book_vehicle))
        .route("/api/vehicles/{id}/maintenance",      patch(api::set_vehicle_maintenance))
        .route("/api/tours",                          get(api::list_tours))
        .route("/api/tours/{id}/bookings",            post(api::book_tour))
        .route("/api/visa",                           get(api::list_visa).post(api::submit_visa))
        .route("/api/visa/{id}/documents",            post(api::record_visa_document))
        .route("/api/visa/{id}/status",               patch(api::set_visa_status))
        .route("/api/marketing/strategies",           get(api::list_strategies))
        .route("/api/marketing/campaigns",            get(api::list_campaigns).post(api::create_campaign))
        .route("/api/marketing/alerts",               get(api::list_alerts).post(api::add_alert))
        .route("/api/manual",                         get(api::list_manual))
        .route("/api/manual/{id}",                    get(api::get_manual))
        .route("/api/recommend",                      post(api::recommend))
        .fallback(api::not_found)
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

// ── CORS ──────────────────────────────────────────────────────────────────────

/// Answer preflights directly; stamp CORS headers and a request id on
/// everything else.
async fn cors(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    debug!(%request_id, %method, %path, status = %response.status(), "http request");

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    if let Ok(v) = HeaderValue::from_str(&request_id) {
        headers.insert("x-request-id", v);
    }
    response
}
