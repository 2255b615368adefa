use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use osn_core::{ArticleSummary, Error, RepoStats};
use osn_scrapers::{Analysis, CurationOutcome};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::state::{AppState, View};
use crate::views;

#[derive(Debug, Deserialize)]
pub struct TextInput {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub name: String,
}

pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn require_text(input: &TextInput) -> ApiResult<&str> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(Error::InvalidInput("text must not be empty".to_string()).into());
    }
    Ok(text)
}

pub async fn index() -> Redirect {
    Redirect::to(View::Create.path())
}

pub async fn create_form() -> ApiResult<Html<String>> {
    Ok(Html(views::create_page("", None, &[])?))
}

pub async fn create_submit(
    State(state): State<Arc<AppState>>,
    Form(input): Form<TextInput>,
) -> ApiResult<Html<String>> {
    if input.text.trim().is_empty() {
        return Ok(Html(views::create_page("", None, &["Enter some text to analyze".to_string()])?));
    }
    let page = match state.manager.process(&input.text).await {
        Ok(outcome) => views::create_page(&input.text, Some(&outcome), &[])?,
        Err(e) => {
            warn!("⚠️ Failed to save article: {}", e);
            views::create_page(&input.text, None, &[format!("Failed to save article: {}", e)])?
        }
    };
    Ok(Html(page))
}

pub async fn list_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Html<String>> {
    let all = state.manager.list(None).await?;
    let total = all.len();
    let search = query.q.unwrap_or_default();
    let matching = osn_core::filter_by_title(all, &search);

    let mut cards = Vec::with_capacity(matching.len());
    for summary in matching {
        match state.manager.read(&summary.filename).await {
            Ok(content) => cards.push((summary, content)),
            Err(e) => warn!("⚠️ Skipping {}: {}", summary.filename, e),
        }
    }
    Ok(Html(views::list_page(&search, &cards, total)?))
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TextInput>,
) -> ApiResult<Json<Analysis>> {
    let text = require_text(&input)?;
    Ok(Json(state.manager.analyze(text).await))
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TextInput>,
) -> ApiResult<(StatusCode, Json<CurationOutcome>)> {
    let text = require_text(&input)?;
    let outcome = state.manager.process(text).await?;
    let status = if outcome.filename.is_some() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(outcome)))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ArticleSummary>>> {
    Ok(Json(state.manager.list(query.q.as_deref()).await?))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let content = state.manager.read(&filename).await?;
    Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], content))
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> Json<RepoStats> {
    Json(state.manager.resolve(&query.name).await)
}
