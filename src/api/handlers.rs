use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json
};
use chrono::Utc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    api::{
        api_structs::{HealthResponse, RenderRequest},
        error::ApiError,
        AppState
    },
    model::{pipeline::RatingReport, structures::records::SelectionResult},
    render::{cover_art_refs, RenderedChart}
};

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let index = state.store.index();
    let uptime = Utc::now().signed_duration_since(state.started_at);
    let status = if index.is_some() { "ok" } else { "loading" };

    Json(HealthResponse {
        status: status.to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        reference_loaded: index.is_some(),
        reference_titles: index.map(|i| i.len()),
        uptime_seconds: uptime.num_seconds().max(0) as u64
    })
}

/// POST /api/ratings
///
/// Body is a JSON array of `{sheetId, achievementRate}` records.
pub async fn rate(State(state): State<AppState>, body: Bytes) -> Result<Json<RatingReport>, ApiError> {
    let span = info_span!("rate", request_id = %Uuid::new_v4());
    let report = span.in_scope(|| state.processor.process_submission(&body, &state.store))?;

    Ok(Json(report))
}

/// POST /api/ratings/image
pub async fn rate_image(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let span = info_span!("rate_image", request_id = %Uuid::new_v4());

    async move {
        let report = state.processor.process_submission(&body, &state.store)?;
        let cover_refs = lookup_cover_art(&state, &report.selection);
        let chart = state.presenter.render(&report.selection, &cover_refs).await?;

        info!(
            "Rendered chart for {} recent and {} older records",
            report.selection.recent_list.len(),
            report.selection.older_list.len()
        );
        Ok(svg_response(chart))
    }
    .instrument(span)
    .await
}

/// POST /api/render
///
/// Body is `{recentList, olderList, coverArt?}` with already enriched records.
pub async fn render(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let span = info_span!("render", request_id = %Uuid::new_v4());

    async move {
        let request: RenderRequest = serde_json::from_slice(&body).map_err(ApiError::InvalidRenderRequest)?;
        let (selection, mut cover_refs) = request.into_parts();
        if cover_refs.is_empty() {
            cover_refs = lookup_cover_art(&state, &selection);
        }

        let chart = state.presenter.render(&selection, &cover_refs).await?;
        Ok(svg_response(chart))
    }
    .instrument(span)
    .await
}

fn lookup_cover_art(state: &AppState, selection: &SelectionResult) -> HashMap<String, String> {
    state
        .store
        .index()
        .map(|index| cover_art_refs(&index, selection))
        .unwrap_or_default()
}

fn svg_response(chart: RenderedChart) -> Response {
    ([(header::CONTENT_TYPE, chart.content_type)], chart.body).into_response()
}
