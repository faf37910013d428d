use crate::ask_form::AskForm;
use crate::ask_response::AskResponse;
use crate::error::ApiError;
use crate::page::{render_page, PageView};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use pdf_qa::PdfQa;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub qa: Arc<PdfQa>,
}

impl AppState {
    pub fn new(qa: PdfQa) -> Self {
        Self { qa: Arc::new(qa) }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_page).post(submit_page))
        .route("/api/ask", post(ask))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn show_page() -> Html<String> {
    Html(render_page(&PageView::default()))
}

/// Re-runs the whole pipeline for this submission and re-renders the page.
async fn submit_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let form = match AskForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(err) => return error_page(None, err),
    };

    let question = form.question.clone();
    match state.qa.run(form.pdf, form.question.as_deref()).await {
        Ok(outcome) => {
            let view = PageView {
                question,
                outcome: Some(outcome),
                error: None,
            };
            (StatusCode::OK, Html(render_page(&view)))
        }
        Err(err) => error_page(question, ApiError::from(err)),
    }
}

fn error_page(question: Option<String>, err: ApiError) -> (StatusCode, Html<String>) {
    log::error!("Request failed: {}", err.message());
    let view = PageView {
        question,
        outcome: None,
        error: Some(err.message()),
    };
    (err.status_code(), Html(render_page(&view)))
}

async fn ask(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AskResponse>, ApiError> {
    let form = AskForm::from_multipart(multipart).await?;
    let outcome = state
        .qa
        .run(form.pdf, form.question.as_deref())
        .await
        .map_err(|err| {
            log::error!("Request failed: {:#}", err);
            ApiError::Pipeline(err)
        })?;
    Ok(Json(outcome.into()))
}
