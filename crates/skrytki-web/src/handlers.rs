use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use skrytki_core::model::SearchHit;

use crate::error::ApiError;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Optional search parameters, named as the landing page sends them.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Restrict results to government offices.
    pub czy_urzad: Option<bool>,
    pub limit: Option<usize>,
}

/// Parameters of `GET /search`, with the text in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct QuerySearchParams {
    #[serde(default)]
    pub query: String,
    pub czy_urzad: Option<bool>,
    pub limit: Option<usize>,
}

/// One element of the `/get_uris/:id` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriEntry {
    pub skrytki: String,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /search/:text`
pub async fn search_path(
    State(state): State<AppState>,
    Path(text): Path<String>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let Query(params) = params?;
    run_search(&state, &text, &params).await
}

/// `GET /search?query=…`
pub async fn search_query(
    State(state): State<AppState>,
    params: Result<Query<QuerySearchParams>, QueryRejection>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let Query(params) = params?;
    let options = SearchParams {
        czy_urzad: params.czy_urzad,
        limit: params.limit,
    };
    run_search(&state, &params.query, &options).await
}

/// `GET /get_uris/:id`
pub async fn get_uris(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<UriEntry>>, ApiError> {
    let records = state.service.get_addresses(&id).await?;
    Ok(Json(
        records
            .into_iter()
            .map(|r| UriEntry { skrytki: r.skrytka })
            .collect(),
    ))
}

async fn run_search(
    state: &AppState,
    text: &str,
    params: &SearchParams,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let hits = state
        .service
        .search(
            text,
            params.czy_urzad.unwrap_or(false),
            params.limit.unwrap_or(state.default_limit),
        )
        .await?;
    Ok(Json(hits))
}
