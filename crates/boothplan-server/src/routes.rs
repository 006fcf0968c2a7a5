//! HTTP routes.

use crate::error::ApiError;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use boothplan_core::storage::UploadedImage;
use boothplan_core::StorageError;
use boothplan_core::{FloorPlanConfig, GateDecision, PersistenceGateway, Vendor, Viewer, VisibilityGate};
use boothplan_render::{Drawing, LegendEntry, RenderOptions, legend, render, to_svg_with_images};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    gateway: PersistenceGateway,
    gate: Arc<dyn VisibilityGate + Send + Sync>,
    /// Plans already read from storage, by show id.
    plans: Arc<DashMap<String, FloorPlanConfig>>,
    clock: fn() -> DateTime<Utc>,
}

impl AppState {
    pub fn new(gateway: PersistenceGateway, gate: Arc<dyn VisibilityGate + Send + Sync>) -> Self {
        Self {
            gateway,
            gate,
            plans: Arc::new(DashMap::new()),
            clock: Utc::now,
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// The show's plan. Only stored plans are cached; an unsaved show gets a
    /// fresh default each time.
    async fn plan(&self, show_id: &str) -> Result<FloorPlanConfig, ApiError> {
        if let Some(plan) = self.plans.get(show_id) {
            return Ok(plan.clone());
        }
        match self.gateway.load(show_id).await {
            Ok(plan) => {
                self.plans.insert(show_id.to_string(), plan.clone());
                Ok(plan)
            }
            Err(StorageError::NotFound(_)) => Ok(FloorPlanConfig::new(show_id)),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/shows/{show_id}/floorplan", get(load_floorplan).put(save_floorplan))
        .route("/shows/{show_id}/background", post(upload_background))
        .route("/shows/{show_id}/vendors", get(list_vendors))
        .route("/shows/{show_id}/public", get(public_view))
        .route("/shows/{show_id}/public.svg", get(public_svg))
        .route("/images/{reference}", get(get_image))
        .with_state(state)
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

async fn load_floorplan(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
) -> Result<Json<FloorPlanConfig>, ApiError> {
    Ok(Json(state.plan(&show_id).await?))
}

/// Replace the whole document (last save wins).
async fn save_floorplan(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    Json(mut config): Json<FloorPlanConfig>,
) -> Result<Json<FloorPlanConfig>, ApiError> {
    if config.show_id != show_id {
        tracing::warn!("Document for {} posted to {}; using the path", config.show_id, show_id);
        config.show_id = show_id.clone();
    }
    config.normalize();
    state.gateway.save(&config).await?;
    tracing::info!("Saved floor plan for {} ({} booths)", show_id, config.len());
    state.plans.insert(show_id, config.clone());
    Ok(Json(config))
}

async fn upload_background(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadedImage>), ApiError> {
    let uploaded = state.gateway.upload_background(&body).await?;
    tracing::info!(
        "Background {} uploaded for {} ({}x{})",
        uploaded.reference,
        show_id,
        uploaded.width,
        uploaded.height
    );
    Ok((StatusCode::CREATED, Json(uploaded)))
}

async fn list_vendors(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
) -> Result<Json<Vec<Vendor>>, ApiError> {
    Ok(Json(state.gateway.vendors(&show_id).await?))
}

/// Who is viewing, as told by the embedding site.
#[derive(Debug, Default, Deserialize)]
pub struct ViewerQuery {
    role: Option<String>,
    #[serde(default)]
    paid: bool,
}

impl ViewerQuery {
    /// Public routes never grant operator access; anything but "vendor" is public.
    fn viewer(&self) -> Viewer {
        match self.role.as_deref() {
            Some("vendor") => Viewer::Vendor { paid: self.paid },
            _ => Viewer::Public,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicView {
    pub drawing: Drawing,
    pub legend: Vec<LegendEntry>,
}

async fn gated_plan(state: &AppState, show_id: &str, query: &ViewerQuery) -> Result<FloorPlanConfig, ApiError> {
    let plan = state.plan(show_id).await?;
    match state.gate.decide(&plan.visibility, query.viewer(), (state.clock)()) {
        GateDecision::Render => Ok(plan),
        GateDecision::Deny(reason) => {
            tracing::debug!("Public view of {} denied: {:?}", show_id, reason);
            Err(ApiError::Denied(reason))
        }
    }
}

async fn public_view(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<PublicView>, ApiError> {
    let plan = gated_plan(&state, &show_id, &query).await?;
    let options = RenderOptions::public();
    Ok(Json(PublicView {
        drawing: render(&plan, &options),
        legend: legend(&plan, options.show_category_colors),
    }))
}

async fn public_svg(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Response, ApiError> {
    let plan = gated_plan(&state, &show_id, &query).await?;
    let drawing = render(&plan, &RenderOptions::public());
    let svg = to_svg_with_images(&drawing, |reference| format!("/images/{reference}"));
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

async fn get_image(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Response, ApiError> {
    let image = state.gateway.image(&reference).await?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response())
}
