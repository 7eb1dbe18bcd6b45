//! Hosted language-model client.
//!
//! The generators only see [`TextModel`]; [`OpenAiModel`] talks to the OpenAI
//! Responses API. One attempt per call, never retried: callers fall back to the
//! rule-based generators on any error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

/// Why a model call produced no usable text.
#[derive(Debug)]
pub enum LlmError {
    /// Building the client, sending, or reading the body failed (includes timeouts).
    Http(reqwest::Error),
    /// The API answered with a non-success status.
    Status(u16, String),
    /// The body wasn't the JSON shape we expect, or carried an `error` field.
    Payload(String),
    /// The response had no output text.
    EmptyOutput,
    /// The configured base URL can't be joined with the endpoint path.
    Url(url::ParseError),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "Request to language model failed: {err}"),
            Self::Status(status, body) => {
                write!(f, "Language model returned status {status}: {body}")
            }
            Self::Payload(message) => write!(f, "Unexpected language model response: {message}"),
            Self::EmptyOutput => write!(f, "Language model returned no text"),
            Self::Url(err) => write!(f, "Invalid language model URL: {err}"),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Http(err)
    }
}

impl From<url::ParseError> for LlmError {
    fn from(err: url::ParseError) -> Self {
        LlmError::Url(err)
    }
}

/// Something that turns a system instruction plus a user prompt into text.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generates text for `prompt` under the `system` instruction.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Deserialize)]
struct ResponsesCreateResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<ResponseOutputItem>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseOutputItem {
    #[serde(default)]
    content: Vec<ResponseContentItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseContentItem {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(other)]
    Other,
}

/// Pulls the generated text out of a `/responses` body.
fn extract_output_text(bytes: &[u8]) -> Result<String, LlmError> {
    let parsed: ResponsesCreateResponse =
        serde_json::from_slice(bytes).map_err(|err| LlmError::Payload(err.to_string()))?;
    if let Some(err) = parsed.error.filter(|err| !err.is_null()) {
        return Err(LlmError::Payload(err.to_string()));
    }

    parsed
        .output_text
        .or_else(|| {
            parsed
                .output
                .into_iter()
                .flat_map(|item| item.content.into_iter())
                .find_map(|content| match content {
                    ResponseContentItem::OutputText { text } => Some(text),
                    ResponseContentItem::Other => None,
                })
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyOutput)
}

/// OpenAI Responses API client.
#[derive(Clone, Debug)]
pub struct OpenAiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl OpenAiModel {
    /// Builds a client for `model`, posting to `<base_url>/responses`.
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &Url,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("responses")?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint,
        })
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TextModel for OpenAiModel {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let req_body = json!({
            "model": self.model,
            "instructions": system,
            "input": [
                {"role": "user", "content": [{"type": "input_text", "text": prompt}]}
            ],
        });

        debug!("Sending prompt to {} ({})", self.endpoint, self.model);
        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&req_body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(LlmError::Status(
                status.as_u16(),
                String::from_utf8_lossy(&bytes).to_string(),
            ));
        }
        extract_output_text(&bytes)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Replays canned replies and records the prompts it was given.
    pub(crate) struct ScriptedModel {
        reply: Option<String>,
        pub(crate) calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedModel {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((system.to_string(), prompt.to_string()));
            }
            self.reply.clone().ok_or(LlmError::EmptyOutput)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;

    async fn spawn_api(router: axum::Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Url::parse(&format!("http://{addr}/v1")).unwrap()
    }

    #[test]
    fn reads_output_text_field() {
        let body = br#"{"output_text": "TOP: A|BOTTOM: B"}"#;
        assert_eq!(extract_output_text(body).unwrap(), "TOP: A|BOTTOM: B");
    }

    #[test]
    fn reads_nested_output_content() {
        let body = br#"{"output": [{"content": [
            {"type": "reasoning"},
            {"type": "output_text", "text": "Person A: hi"}
        ]}]}"#;
        assert_eq!(extract_output_text(body).unwrap(), "Person A: hi");
    }

    #[test]
    fn rejects_error_and_empty_payloads() {
        assert!(matches!(
            extract_output_text(br#"{"error": {"message": "nope"}}"#),
            Err(LlmError::Payload(_))
        ));
        assert!(matches!(
            extract_output_text(br#"{"output": []}"#),
            Err(LlmError::EmptyOutput)
        ));
        assert!(matches!(
            extract_output_text(br#"{"output_text": "   "}"#),
            Err(LlmError::EmptyOutput)
        ));
        assert!(matches!(
            extract_output_text(b"<html>"),
            Err(LlmError::Payload(_))
        ));
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let base = Url::parse("https://api.openai.com/v1").unwrap();
        let model = OpenAiModel::new("k", "gpt-4o", &base, Duration::from_secs(1)).unwrap();
        assert_eq!(model.endpoint().as_str(), "https://api.openai.com/v1/responses");
    }

    #[tokio::test]
    async fn posts_prompt_with_bearer_auth() {
        let router = axum::Router::new().route(
            "/v1/responses",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let text = format!(
                    "{}|{}|{}",
                    auth, body["instructions"], body["input"][0]["content"][0]["text"]
                );
                Json(json!({ "output_text": text }))
            }),
        );
        let base = spawn_api(router).await;
        let model = OpenAiModel::new("sekrit", "gpt-4o", &base, Duration::from_secs(5)).unwrap();

        let text = model.generate("be funny", "a cat").await.unwrap();
        assert_eq!(text, "Bearer sekrit|\"be funny\"|\"a cat\"");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let router = axum::Router::new().route(
            "/v1/responses",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = spawn_api(router).await;
        let model = OpenAiModel::new("k", "gpt-4o", &base, Duration::from_secs(5)).unwrap();

        let result = model.generate("s", "p").await;
        assert!(
            matches!(&result, Err(LlmError::Status(429, body)) if body == "slow down"),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn slow_api_times_out() {
        let router = axum::Router::new().route(
            "/v1/responses",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "output_text": "too late" }))
            }),
        );
        let base = spawn_api(router).await;
        let model = OpenAiModel::new("k", "gpt-4o", &base, Duration::from_millis(100)).unwrap();

        assert!(matches!(
            model.generate("s", "p").await,
            Err(LlmError::Http(_))
        ));
    }
}
