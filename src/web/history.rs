//! History endpoints, one list per kind.

use super::prelude::*;
use crate::db::history::HistoryKind;

#[derive(Deserialize)]
pub(crate) struct SaveHistoryRequest {
    description: String,
    payload: Value,
}

fn parse_kind(kind: &str) -> Result<HistoryKind, MemetalkError> {
    kind.parse::<HistoryKind>()
        .map_err(|err| MemetalkError::NotFound(err.to_string()))
}

/// handles GET /api/history/{kind}
pub(crate) async fn list_history_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, MemetalkError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.history.list(kind).await?))
}

/// handles POST /api/history/{kind}
pub(crate) async fn save_history_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    payload: Result<Json<SaveHistoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MemetalkError> {
    let kind = parse_kind(&kind)?;
    let Json(request) = payload.map_err(|err| MemetalkError::BadRequest(err.body_text()))?;
    if request.description.is_empty() {
        return Err(MemetalkError::description_required());
    }
    let entry = state
        .history
        .append(kind, &request.description, &request.payload)
        .await?;
    debug!("Saved {} history entry {}", kind.as_str(), entry.id);
    Ok((StatusCode::CREATED, Json(entry)))
}

/// handles DELETE /api/history/{kind}/{id}
pub(crate) async fn delete_history_entry_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
) -> Result<StatusCode, MemetalkError> {
    let kind = parse_kind(&kind)?;
    if state.history.remove(kind, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MemetalkError::NotFound(format!(
            "{} history entry {}",
            kind.as_str(),
            id
        )))
    }
}

/// handles DELETE /api/history/{kind}
pub(crate) async fn clear_history_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, MemetalkError> {
    let kind = parse_kind(&kind)?;
    let removed = state.history.clear(kind).await?;
    info!("Cleared {} {} history entries", removed, kind.as_str());
    Ok(Json(serde_json::json!({ "removed": removed })))
}
