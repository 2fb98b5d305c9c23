use axum::extract::{FromRequest, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use jcr_ai::{changes_tables, flat_changes, merge_with_tables, AiRequest, MergedReport, OutputMode};
use jcr_diff::{try_flatten_with, DecodeOptions};
use jcr_report::{
    added_table, build_tables, render_document, RenderMode, RenderedDocument, TableMode,
    ADDED_TABLE_NAME,
};
use jcr_source::{analyze, GitCliProvider};
use jcr_types::{ChangeRecord, CommitPair, FileDelta, Table};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// JSON body extractor whose rejections use the `{error}` response shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct FlattenRequest {
    #[serde(default)]
    pub delta: Value,
}

#[derive(Debug, Serialize)]
pub struct FlattenResponse {
    pub changes: Vec<ChangeRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub files: Option<Vec<FileDelta>>,
    #[serde(default)]
    pub mode: TableMode,
}

#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub tables: Vec<Table>,
}

#[derive(Debug, Deserialize)]
pub struct AddedRequest {
    #[serde(default)]
    pub delta: Value,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub files: Option<Vec<FileDelta>>,
    #[serde(default)]
    pub mode: TableMode,
    pub title: Option<String>,
    pub render_mode: Option<RenderMode>,
    pub max_cell_len: Option<usize>,
    pub rows_per_page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    #[serde(flatten)]
    pub document: RenderedDocument,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub git_url: String,
    #[serde(default)]
    pub mode: TableMode,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub commits: CommitPair,
    pub tables: Vec<Table>,
    pub text_diff: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub files: Option<Vec<FileDelta>>,
    pub output: Option<OutputMode>,
    pub title: Option<String>,
    pub description: Option<String>,
}

fn require_files(files: Option<Vec<FileDelta>>) -> ServerResult<Vec<FileDelta>> {
    files.ok_or_else(|| ServerError::BadRequest("request body must include a 'files' change list".into()))
}

/// Reject malformed deltas up front when strict decoding is configured.
fn check_deltas(options: DecodeOptions, files: &[FileDelta]) -> ServerResult<()> {
    if !options.strict {
        return Ok(());
    }
    for fd in files {
        try_flatten_with(&fd.diff, options)
            .map_err(|e| ServerError::BadRequest(format!("{}: {e}", fd.file)))?;
    }
    Ok(())
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

pub async fn flatten_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<FlattenRequest>,
) -> ServerResult<Json<FlattenResponse>> {
    let changes = try_flatten_with(&req.delta, state.config.decode)?;
    Ok(Json(FlattenResponse { changes }))
}

pub async fn report_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReportRequest>,
) -> ServerResult<Json<TablesResponse>> {
    let files = require_files(req.files)?;
    check_deltas(state.config.decode, &files)?;
    Ok(Json(TablesResponse {
        tables: build_tables(&files, req.mode),
    }))
}

/// Added-only table for one ad-hoc delta.
pub async fn added_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AddedRequest>,
) -> ServerResult<Json<TablesResponse>> {
    try_flatten_with(&req.delta, state.config.decode)?;
    let name = req.name.unwrap_or_else(|| ADDED_TABLE_NAME.to_string());
    Ok(Json(TablesResponse {
        tables: vec![added_table(name, &req.delta)],
    }))
}

pub async fn render_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RenderRequest>,
) -> ServerResult<Json<RenderResponse>> {
    let files = require_files(req.files)?;
    check_deltas(state.config.decode, &files)?;

    let mut config = state.config.render.clone();
    if let Some(title) = req.title {
        config.title = title;
    }
    if let Some(mode) = req.render_mode {
        config.mode = mode;
    }
    if let Some(len) = req.max_cell_len {
        config.max_cell_len = Some(len);
    }
    if let Some(rows) = req.rows_per_page {
        config.rows_per_page = rows;
    }

    let document = render_document(&build_tables(&files, req.mode), &config)?;
    let text = document.to_text();
    Ok(Json(RenderResponse { document, text }))
}

/// Clone a repository and report on its last commit pair.
pub async fn analyze_handler(JsonBody(req): JsonBody<AnalyzeRequest>) -> ServerResult<Json<AnalyzeResponse>> {
    let url = req.git_url.trim().to_string();
    if url.is_empty() {
        return Err(ServerError::BadRequest("git_url must not be empty".into()));
    }
    if url.starts_with('-') {
        return Err(ServerError::BadRequest("git_url must not start with '-'".into()));
    }
    info!(%url, "analyzing repository");

    let analysis = tokio::task::spawn_blocking(move || {
        let provider = GitCliProvider::clone_url(&url)?;
        analyze(&provider)
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))??;

    Ok(Json(AnalyzeResponse {
        tables: build_tables(&analysis.files, req.mode),
        commits: analysis.commits,
        text_diff: analysis.text_diff,
    }))
}

/// Ask the summary service about the changes and merge its answer with the tables.
pub async fn summary_handler(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SummaryRequest>,
) -> ServerResult<Json<MergedReport>> {
    let files = require_files(req.files)?;
    check_deltas(state.config.decode, &files)?;

    let changes = flat_changes(&files);
    let tables = changes_tables(&changes);
    let mut request = AiRequest::changes(changes, req.output.unwrap_or(OutputMode::Summary));
    if req.title.is_some() || req.description.is_some() {
        request = request.with_heading(
            req.title.unwrap_or_default(),
            req.description.unwrap_or_default(),
        );
    }

    let output = state.summarizer.generate(&request).await?;
    Ok(Json(merge_with_tables(
        &state.config.render.title,
        tables,
        Some(output),
    )))
}
