//! Router-level tests for the back-office JSON API, driven through
//! `tower::ServiceExt::oneshot` without binding a socket.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt;

use travelops_backoffice::config::Config;
use travelops_backoffice::llm::LlmProvider;
use travelops_backoffice::llm::providers::dummy::DummyProvider;
use travelops_backoffice::subsystems::Stores;
use travelops_backoffice::subsystems::comms::BackofficeState;
use travelops_backoffice::subsystems::comms::axum_channel::build_router;
use travelops_backoffice::subsystems::manual::Manual;
use travelops_backoffice::subsystems::recommend::Recommender;

fn router() -> Router {
    let config = Config::test_default();
    let manual = Manual::load(Path::new("config/manual.toml")).unwrap();
    let recommender = Recommender::new(LlmProvider::Dummy(DummyProvider), &config);
    let state = BackofficeState::new(Stores::seeded(), manual, recommender)
        .with_today(NaiveDate::from_ymd_opt(2026, 2, 14).unwrap());
    build_router(Arc::new(state))
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    call(router, Method::GET, uri, None).await
}

// ── Plumbing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_provider_and_cors() {
    let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let resp = router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["llm"], "dummy");
}

#[tokio::test]
async fn preflight_is_answered_for_any_route() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/recommend")
        .body(Body::empty())
        .unwrap();
    let resp = router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, body) = get(&router(), "/api/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn malformed_body_is_400_with_error() {
    let r = router();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/vehicles")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"Van #4\""))
        .unwrap();
    let resp = r.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn non_numeric_id_is_json_400() {
    let r = router();
    let (status, body) = get(&r, "/api/agents/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid record id"));

    let (status, body) = call(&r, Method::POST, "/api/vehicles/van-1/bookings", Some(json!({ "seats": 2 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

// ── Agents ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn agents_search_by_role() {
    let (status, body) = get(&router(), "/api/agents?q=TRAVEL").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Russel Santillan", "Maria Santos", "Ana Reyes"]);
}

#[tokio::test]
async fn agent_request_is_pending_and_listed() {
    let r = router();
    let (status, agent) = call(
        &r,
        Method::POST,
        "/api/agents",
        Some(json!({ "name": "Lea Mendoza", "role": "Tour Guide", "reason": "Peak season" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(agent["id"], 6);
    assert_eq!(agent["status"], "Pending");
    assert_eq!(agent["hireDate"], "2026-02-14");

    let (_, all) = get(&r, "/api/agents").await;
    assert_eq!(all.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn agent_request_requires_name_and_role() {
    let (status, body) = call(&router(), Method::POST, "/api/agents", Some(json!({ "name": "Lea" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please fill in at least the name and role.");
}

#[tokio::test]
async fn agent_status_update_and_missing_agent() {
    let r = router();
    let (status, agent) = call(&r, Method::PATCH, "/api/agents/4/status", Some(json!({ "status": "Active" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agent["status"], "Active");

    let (status, body) = get(&r, "/api/agents/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "agent #99 not found");
}

// ── Suppliers & partners ──────────────────────────────────────────────────────

#[tokio::test]
async fn suppliers_carry_occupancy() {
    let (status, body) = get(&router(), "/api/suppliers?q=paradise").await;
    assert_eq!(status, StatusCode::OK);
    let paradise = &body[0];
    assert_eq!(paradise["type"], "Hotel");
    assert_eq!(paradise["occupancy"]["remaining"], 25);
    assert_eq!(paradise["occupancy"]["percent"], 50.0);
}

#[tokio::test]
async fn supplier_slots_cannot_exceed_max() {
    let (status, _) = call(
        &router(),
        Method::POST,
        "/api/suppliers",
        Some(json!({ "name": "Cebu Inn", "type": "Hotel", "location": "Cebu", "slots": 20, "maxSlots": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn new_partner_starts_pending() {
    let (status, partner) = call(
        &router(),
        Method::POST,
        "/api/partners",
        Some(json!({
            "name": "Visayas Capital",
            "investment": 750000,
            "contractStart": "2026-03-01",
            "contractEnd": "2028-02-28",
            "sharePercent": 12
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(partner["status"], "Pending");
    assert_eq!(partner["id"], 4);
}

// ── Vehicles & tours ──────────────────────────────────────────────────────────

#[tokio::test]
async fn vehicle_booking_enforces_capacity() {
    let r = router();
    let (status, body) = call(&r, Method::POST, "/api/vehicles/1/bookings", Some(json!({ "seats": 9 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "requested 9 slot(s) but only 8 remaining");

    let (status, vehicle) = call(&r, Method::POST, "/api/vehicles/1/bookings", Some(json!({ "seats": 8 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vehicle["status"], "Full");
    assert_eq!(vehicle["occupancy"]["remaining"], 0);
}

#[tokio::test]
async fn vehicle_in_maintenance_refuses_bookings_until_released() {
    let r = router();
    let (status, _) = call(&r, Method::POST, "/api/vehicles/5/bookings", Some(json!({ "seats": 1 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, vehicle) =
        call(&r, Method::PATCH, "/api/vehicles/5/maintenance", Some(json!({ "maintenance": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vehicle["status"], "Available");

    let (_, listing) = get(&r, "/api/vehicles").await;
    assert_eq!(listing["summary"]["maintenance"], 0);
    assert_eq!(listing["summary"]["available"], 4);
}

#[tokio::test]
async fn new_vehicle_defaults() {
    let (status, vehicle) = call(
        &router(),
        Method::POST,
        "/api/vehicles",
        Some(json!({ "name": "Van #4", "type": "Van", "capacity": 12, "supplier": "Island Van Rentals" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(vehicle["id"], 7);
    assert_eq!(vehicle["status"], "Available");
    assert_eq!(vehicle["location"], "Unassigned");
    assert_eq!(vehicle["booked"], 0);
}

#[tokio::test]
async fn tour_booking_rederives_status() {
    let r = router();
    let (status, tour) = call(&r, Method::POST, "/api/tours/3/bookings", Some(json!({ "seats": 5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tour["status"], "Almost Full");

    let (status, _) = call(&r, Method::POST, "/api/tours/4/bookings", Some(json!({ "seats": 1 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ── Visa ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn visa_list_flags_expiring_passports() {
    let (status, body) = get(&router(), "/api/visa").await;
    assert_eq!(status, StatusCode::OK);
    let warnings: Vec<(&str, bool)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| (v["customerName"].as_str().unwrap(), v["passportWarning"].as_bool().unwrap()))
        .collect();
    assert_eq!(warnings, [("Mark Rivera", false), ("Lisa Cruz", false), ("David Tan", true)]);
}

#[tokio::test]
async fn visa_submission_and_document_upload() {
    let r = router();
    let (status, app) = call(
        &r,
        Method::POST,
        "/api/visa",
        Some(json!({ "customerName": "Grace Lim", "destination": "Japan", "passportExpiry": "2030-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app["overallStatus"], "Under Review");
    assert_eq!(app["checklist"]["total"], 3);
    assert_eq!(app["checklist"]["verified"], 0);

    let (status, app) = call(
        &r,
        Method::POST,
        "/api/visa/4/documents",
        Some(json!({ "name": "Passport Copy", "status": "Verified" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app["checklist"]["verified"], 1);

    let (status, app) = call(&r, Method::PATCH, "/api/visa/4/status", Some(json!({ "status": "Approved" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app["overallStatus"], "Approved");
}

// ── Marketing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn campaign_and_alert_creation() {
    let r = router();
    let (status, campaign) = call(
        &r,
        Method::POST,
        "/api/marketing/campaigns",
        Some(json!({ "name": "Holy Week Escape", "startDate": "2026-03-29", "endDate": "2026-04-05", "discount": "10% off" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(campaign["status"], "Scheduled");
    assert_eq!(campaign["type"], "Custom Promo");

    let (status, alert) = call(
        &r,
        Method::POST,
        "/api/marketing/alerts",
        Some(json!({ "location": "Siargao", "alert": "Swell warning" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(alert["severity"], "medium");
    assert_eq!(alert["date"], "2026-02-14");

    let (_, strategies) = get(&r, "/api/marketing/strategies").await;
    assert_eq!(strategies.as_array().unwrap().len(), 5);
}

// ── Dashboard & manual ────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_follows_mutations() {
    let r = router();
    let (_, before) = get(&r, "/api/dashboard").await;
    assert_eq!(before["pendingAgentRequests"], 1);
    assert_eq!(before["visasUnderReview"], 1);
    assert_eq!(before["passportWarnings"], 1);
    assert_eq!(before["activePartners"], 2);
    assert_eq!(before["partnerInvestment"], 1_700_000);

    call(&r, Method::POST, "/api/agents", Some(json!({ "name": "Lea Mendoza", "role": "Tour Guide" }))).await;
    let (_, after) = get(&r, "/api/dashboard").await;
    assert_eq!(after["pendingAgentRequests"], 2);
    assert_eq!(after["totalAgents"], 6);
}

#[tokio::test]
async fn manual_lists_and_fetches_modules() {
    let r = router();
    let (status, all) = get(&r, "/api/manual").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 7);

    let (status, visa) = get(&r, "/api/manual/visa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(visa["path"], "/visa");

    let (status, _) = get(&r, "/api/manual/payroll").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Recommend ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn recommend_rejects_unknown_type() {
    let (status, body) = call(
        &router(),
        Method::POST,
        "/api/recommend",
        Some(json!({ "type": "hotel", "context": "Beach tour" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid type. Use 'agent' or 'supplier'.");
}

#[tokio::test]
async fn recommend_rejects_blank_context() {
    let (status, _) = call(
        &router(),
        Method::POST,
        "/api/recommend",
        Some(json!({ "type": "agent", "context": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recommend_with_echo_provider_falls_back_to_free_text() {
    let (status, body) = call(
        &router(),
        Method::POST,
        "/api/recommend",
        Some(json!({ "type": "supplier", "context": "Family of 6 in Cebu" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"], "[echo] Family of 6 in Cebu");
    assert_eq!(body["confidence"], "medium");
    assert_eq!(body["alternatives"], json!([]));
    assert_eq!(body["tips"], "");
}
