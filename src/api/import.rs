use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::import::import_accession_csv;
use crate::infrastructure::AppState;

/// Upload an accession register export (multipart field `file`) and import it
pub async fn import_accession(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut content = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => content = Some(bytes),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": format!("Failed to read upload: {}", e) })),
                        )
                            .into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("Invalid multipart body: {}", e) })),
                )
                    .into_response();
            }
        }
    }

    let Some(content) = content else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing 'file' field" })),
        )
            .into_response();
    };

    let importer = state.row_importer();
    match import_accession_csv(
        &content,
        &importer,
        state.book_repo.as_ref(),
        &state.import_settings,
    )
    .await
    {
        Ok(run) => (
            StatusCode::OK,
            Json(json!({
                "imported": run.imported_count,
                "skipped": run.skipped_count,
                "errors": run.errors,
                "message": run.summary_message(),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Import failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Import failed: {}", e) })),
            )
                .into_response()
        }
    }
}
