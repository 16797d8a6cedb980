//! REST endpoints over the intake manager.
//!
//! Handlers are pure plumbing: deserialize, delegate, serialize. All
//! business rules live behind the manager.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::manager::{IntakeManager, PincodeVerification, StepAdvance};
use crate::steps::{BackNav, StepId};
use crate::store::{
    AddressPatch, BankPatch, EducationPatch, EsiPatch, FamilyMemberPatch, GmcPatch,
    OrganizationPatch, PersonalPatch,
};

/// Shared state for intake routes.
#[derive(Clone)]
pub struct IntakeRouteState {
    pub manager: Arc<IntakeManager>,
}

async fn get_status(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    Json(state.manager.status().await)
}

async fn get_snapshot(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    Json(state.manager.snapshot().await)
}

async fn put_organization(
    State(state): State<IntakeRouteState>,
    Json(patch): Json<OrganizationPatch>,
) -> impl IntoResponse {
    state.manager.update_organization(patch).await;
    StatusCode::NO_CONTENT
}

async fn put_personal(
    State(state): State<IntakeRouteState>,
    Json(patch): Json<PersonalPatch>,
) -> impl IntoResponse {
    state.manager.update_personal(patch).await;
    StatusCode::NO_CONTENT
}

async fn put_address(
    State(state): State<IntakeRouteState>,
    Json(patch): Json<AddressPatch>,
) -> impl IntoResponse {
    state.manager.update_address(patch).await;
    StatusCode::NO_CONTENT
}

async fn put_bank(
    State(state): State<IntakeRouteState>,
    Json(patch): Json<BankPatch>,
) -> impl IntoResponse {
    state.manager.update_bank(patch).await;
    StatusCode::NO_CONTENT
}

async fn put_esi(
    State(state): State<IntakeRouteState>,
    Json(patch): Json<EsiPatch>,
) -> impl IntoResponse {
    state.manager.update_esi(patch).await;
    StatusCode::NO_CONTENT
}

async fn put_gmc(
    State(state): State<IntakeRouteState>,
    Json(patch): Json<GmcPatch>,
) -> impl IntoResponse {
    state.manager.update_gmc(patch).await;
    StatusCode::NO_CONTENT
}

async fn post_education(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    let id = state.manager.add_education().await;
    Json(serde_json::json!({ "id": id }))
}

async fn put_education(
    State(state): State<IntakeRouteState>,
    Path(id): Path<u64>,
    Json(patch): Json<EducationPatch>,
) -> impl IntoResponse {
    state.manager.update_education(id, patch).await;
    StatusCode::NO_CONTENT
}

async fn delete_education(
    State(state): State<IntakeRouteState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    state.manager.remove_education(id).await;
    StatusCode::NO_CONTENT
}

async fn post_family(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    let id = state.manager.add_family_member().await;
    Json(serde_json::json!({ "id": id }))
}

async fn put_family(
    State(state): State<IntakeRouteState>,
    Path(id): Path<u64>,
    Json(patch): Json<FamilyMemberPatch>,
) -> impl IntoResponse {
    state.manager.update_family_member(id, patch).await;
    StatusCode::NO_CONTENT
}

async fn delete_family(
    State(state): State<IntakeRouteState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    state.manager.remove_family_member(id).await;
    StatusCode::NO_CONTENT
}

async fn post_verify_pincode(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    match state.manager.verify_present_pincode().await {
        Ok(PincodeVerification::Verified { city, state: st }) => Json(serde_json::json!({
            "verified": true,
            "city": city,
            "state": st,
        }))
        .into_response(),
        Ok(PincodeVerification::Skipped) => {
            Json(serde_json::json!({ "verified": false })).into_response()
        }
        Err(errors) => (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
    }
}

async fn post_commit(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    match state.manager.commit_current_step().await {
        Ok(StepAdvance::MovedTo(step)) => Json(serde_json::json!({
            "current_step": step,
            "at_review": false,
        }))
        .into_response(),
        Ok(StepAdvance::AtReview) => Json(serde_json::json!({
            "current_step": StepId::Review,
            "at_review": true,
        }))
        .into_response(),
        Err(errors) => (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
    }
}

async fn post_back(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    match state.manager.go_previous().await {
        BackNav::MovedTo(step) => Json(serde_json::json!({
            "current_step": step,
            "left_wizard": false,
        })),
        BackNav::LeaveWizard => Json(serde_json::json!({
            "current_step": StepId::Personal,
            "left_wizard": true,
        })),
    }
}

#[derive(Debug, Deserialize)]
struct GotoRequest {
    step: StepId,
}

async fn post_goto(
    State(state): State<IntakeRouteState>,
    Json(request): Json<GotoRequest>,
) -> impl IntoResponse {
    let step = state.manager.go_to_step(request.step).await;
    Json(serde_json::json!({ "current_step": step }))
}

async fn post_submit(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    Json(state.manager.submit().await)
}

/// Build the intake REST routes.
pub fn intake_routes(state: IntakeRouteState) -> Router {
    Router::new()
        .route("/api/intake/status", get(get_status))
        .route("/api/intake/snapshot", get(get_snapshot))
        .route("/api/intake/organization", put(put_organization))
        .route("/api/intake/personal", put(put_personal))
        .route("/api/intake/address", put(put_address))
        .route("/api/intake/address/verify-pincode", post(post_verify_pincode))
        .route("/api/intake/bank", put(put_bank))
        .route("/api/intake/esi", put(put_esi))
        .route("/api/intake/gmc", put(put_gmc))
        .route("/api/intake/education", post(post_education))
        .route(
            "/api/intake/education/{id}",
            put(put_education).delete(delete_education),
        )
        .route("/api/intake/family", post(post_family))
        .route(
            "/api/intake/family/{id}",
            put(put_family).delete(delete_family),
        )
        .route("/api/intake/steps/commit", post(post_commit))
        .route("/api/intake/steps/back", post(post_back))
        .route("/api/intake/steps/goto", post(post_goto))
        .route("/api/intake/submit", post(post_submit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
