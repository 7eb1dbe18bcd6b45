use super::prelude::*;
use crate::dialogue::{DialogueStyle, MAX_CHARACTERS, MIN_CHARACTERS, Tone};
use crate::templates::{self, Template as MemeTemplate};

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub(crate) struct HomeTemplate {
    pub(crate) templates: &'static [MemeTemplate],
    pub(crate) styles: Vec<&'static str>,
    pub(crate) tones: Vec<&'static str>,
    pub(crate) character_counts: Vec<u8>,
    pub(crate) ai_enabled: bool,
}

/// handles the / GET
pub(crate) async fn root_handler(State(state): State<AppState>) -> HomeTemplate {
    HomeTemplate {
        templates: templates::all(),
        styles: DialogueStyle::ALL.iter().map(|style| style.as_str()).collect(),
        tones: Tone::ALL.iter().map(|tone| tone.as_str()).collect(),
        character_counts: (MIN_CHARACTERS..=MAX_CHARACTERS).collect(),
        ai_enabled: state.ai_enabled(),
    }
}

const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
const APP_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/app.js"));

pub(crate) async fn styles_handler() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

pub(crate) async fn app_js_handler() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/javascript")], APP_JS)
}
