use crate::error::{AppError, Result};
use crate::model::{
    AnalyticsResponse, ListUrlsQuery, ListUrlsResponse, ShortenRequest, ShortenResponse,
    UrlResponse,
};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::{PageRequest, ShortenParams};
use tracing::debug;

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected shorten request body");
        AppError::InvalidRequest
    })?;

    let params = ShortenParams {
        original_url: request.original_url,
        custom_alias: request.custom_alias,
    };
    let shortened = state.shortener().shorten(params).await?;

    let response = ShortenResponse {
        short_url: shortened.short_code.to_url(state.base_url()),
        original_url: shortened.original_url,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Response> {
    let url = state.redirector().resolve(&short_code).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

pub async fn list_urls_handler(
    State(state): State<AppState>,
    Query(query): Query<ListUrlsQuery>,
) -> Result<Json<ListUrlsResponse>> {
    let request = PageRequest::new(query.page(), query.limit());
    let page = state.shortener().list(request).await?;

    Ok(Json(ListUrlsResponse {
        data: page
            .data
            .into_iter()
            .map(|record| UrlResponse::from_record(record, state.base_url()))
            .collect(),
        total_count: page.total_count,
        pages: page.pages,
    }))
}

pub async fn analytics_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<AnalyticsResponse>> {
    let analytics = state.shortener().analytics(&short_code).await?;
    Ok(Json(analytics.into()))
}
