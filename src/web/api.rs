//! JSON endpoints the browser calls.

use super::prelude::*;
use crate::caption::generate_caption;
use crate::dialogue::{DialogueResult, DialogueSettings, RawDialogueSettings, generate_dialogue};
use crate::selector;
use crate::templates::{self, Template};

#[derive(Deserialize)]
pub(crate) struct GenerateDialogueRequest {
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    settings: Option<Value>,
}

#[derive(Deserialize)]
pub(crate) struct GenerateMemeRequest {
    #[serde(default)]
    description: Option<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DialogueResponse {
    #[serde(flatten)]
    result: DialogueResult,
    ai_enabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MemeData {
    top_text: String,
    bottom_text: String,
    template: &'static str,
    template_id: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MemeResponse {
    image_url: &'static str,
    meme_data: MemeData,
    ai_enabled: bool,
}

/// Only non-empty strings get through to the generators. Whitespace counts
/// as content.
pub(crate) fn require_description(value: Option<Value>) -> Result<String, MemetalkError> {
    match value {
        Some(Value::String(description)) if !description.is_empty() => Ok(description),
        _ => Err(MemetalkError::description_required()),
    }
}

/// Settings that aren't an object at all are treated as absent.
fn settings_from(value: Option<Value>) -> DialogueSettings {
    value
        .and_then(|value| serde_json::from_value::<RawDialogueSettings>(value).ok())
        .map(DialogueSettings::from)
        .unwrap_or_default()
}

/// handles POST /api/generate-dialogue
pub(crate) async fn generate_dialogue_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateDialogueRequest>, JsonRejection>,
) -> Result<Json<DialogueResponse>, MemetalkError> {
    let Json(request) = payload.map_err(|err| {
        debug!("Rejected dialogue request body: {}", err);
        MemetalkError::description_required()
    })?;
    let description = require_description(request.description)?;
    let settings = settings_from(request.settings);

    let result = generate_dialogue(
        state.text_model(),
        &description,
        &settings,
        state.random.as_ref(),
    )
    .await;
    info!(
        "Generated {} dialogue with {} characters (ai: {})",
        result.style,
        result.characters.len(),
        result.ai_generated
    );

    Ok(Json(DialogueResponse {
        result,
        ai_enabled: state.ai_enabled(),
    }))
}

/// handles POST /api/generate-meme
pub(crate) async fn generate_meme_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateMemeRequest>, JsonRejection>,
) -> Result<Json<MemeResponse>, MemetalkError> {
    let Json(request) = payload.map_err(|err| {
        debug!("Rejected meme request body: {}", err);
        MemetalkError::description_required()
    })?;
    let description = require_description(request.description)?;

    let caption = generate_caption(state.text_model(), &description).await;
    let template = selector::select(&description, state.random.as_ref());
    info!("Generated meme on template {}", template.id);

    Ok(Json(MemeResponse {
        image_url: template.image_ref,
        meme_data: MemeData {
            top_text: caption.top_text,
            bottom_text: caption.bottom_text,
            template: template.name,
            template_id: template.id,
        },
        ai_enabled: state.ai_enabled(),
    }))
}

/// handles GET /api/templates
pub(crate) async fn templates_handler() -> Json<&'static [Template]> {
    Json(templates::all())
}
