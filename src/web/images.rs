//! Serves the template images with conditional-request support.

use std::io::ErrorKind;
use std::path::Path as StdPath;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::HeaderMap;
use axum::http::header::{CACHE_CONTROL, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use axum::http::response::Builder;
use axum::response::Response;
use httpdate::{fmt_http_date, parse_http_date};

use super::prelude::*;
use crate::constants::IMAGE_CACHE_CONTROL;
use crate::templates;

/// Validators for one image file.
#[derive(Clone, Debug)]
pub(crate) struct ImageValidators {
    etag: Option<HeaderValue>,
    last_modified: Option<HeaderValue>,
    modified_at: Option<SystemTime>,
}

impl ImageValidators {
    /// Derives validators from filesystem metadata.
    pub(crate) fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        let modified_at = metadata.modified().ok();
        Self {
            etag: weak_etag(metadata.len(), modified_at),
            last_modified: modified_at
                .and_then(|modified| HeaderValue::from_str(&fmt_http_date(modified)).ok()),
            modified_at,
        }
    }

    /// Adds Cache-Control, ETag and Last-Modified.
    pub(crate) fn apply(&self, mut builder: Builder) -> Builder {
        builder = builder.header(CACHE_CONTROL, IMAGE_CACHE_CONTROL.as_str());
        if let Some(etag) = &self.etag {
            builder = builder.header(ETAG, etag.clone());
        }
        if let Some(last_modified) = &self.last_modified {
            builder = builder.header(LAST_MODIFIED, last_modified.clone());
        }
        builder
    }

    /// If-None-Match takes precedence; If-Modified-Since is only consulted
    /// without it.
    pub(crate) fn is_fresh(&self, headers: &HeaderMap) -> bool {
        if let Some(if_none_match) = headers.get(IF_NONE_MATCH) {
            let Ok(candidates) = if_none_match.to_str() else {
                return false;
            };
            let candidates = candidates.trim();
            if candidates == "*" {
                return true;
            }
            return self
                .etag
                .as_ref()
                .and_then(|etag| etag.to_str().ok())
                .is_some_and(|etag| candidates.split(',').any(|tag| tag.trim() == etag));
        }

        matches!(
            (headers.get(IF_MODIFIED_SINCE), self.modified_at),
            (Some(since), Some(modified_at))
                if since
                    .to_str()
                    .ok()
                    .and_then(|since| parse_http_date(since).ok())
                    .is_some_and(|since| modified_at <= since)
        )
    }

    /// 304 carrying the same cache headers.
    pub(crate) fn not_modified(&self) -> Result<Response, MemetalkError> {
        self.apply(Response::builder().status(StatusCode::NOT_MODIFIED))
            .body(Body::empty())
            .map_err(MemetalkError::from)
    }
}

fn weak_etag(size: u64, modified_at: Option<SystemTime>) -> Option<HeaderValue> {
    let seconds = modified_at
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map(|since_epoch| since_epoch.as_secs())
        .unwrap_or(0);
    HeaderValue::from_str(&format!("W/\"{size}-{seconds}\"")).ok()
}

fn content_type_for(file: &str) -> &'static str {
    match StdPath::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// handles GET /memes/{file}; only files named by the catalog are served.
pub(crate) async fn template_image_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Result<Response, MemetalkError> {
    let Some(template) = templates::by_image_file(&file) else {
        return Err(MemetalkError::NotFound(format!("template image {file}")));
    };

    let image_path = state.image_dir.join(template.image_file());
    let not_found = || MemetalkError::NotFound(image_path.display().to_string());
    let metadata = match tokio::fs::metadata(&image_path).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(err) => return Err(MemetalkError::InternalServerError(err.to_string())),
    };
    let validators = ImageValidators::from_metadata(&metadata);
    if validators.is_fresh(&headers) {
        return validators.not_modified();
    }

    let bytes = match tokio::fs::read(&image_path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(err) => return Err(MemetalkError::InternalServerError(err.to_string())),
    };
    validators
        .apply(Response::builder().header(
            CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(template.image_file())),
        ))
        .body(Body::from(bytes))
        .map_err(MemetalkError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("drake.png"), "image/png");
        assert_eq!(content_type_for("this-is-fine.JPG"), "image/jpeg");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }

    #[test]
    fn etag_tracks_size_and_mtime() {
        let stamp = UNIX_EPOCH + Duration::from_secs(42);
        assert_eq!(weak_etag(1234, Some(stamp)).unwrap(), "W/\"1234-42\"");
        assert_eq!(weak_etag(7, None).unwrap(), "W/\"7-0\"");
    }

    #[test]
    fn if_none_match() {
        let validators = ImageValidators {
            etag: weak_etag(1, None),
            last_modified: None,
            modified_at: None,
        };
        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, HeaderValue::from_static("*"));
        assert!(validators.is_fresh(&headers));

        headers.insert(IF_NONE_MATCH, HeaderValue::from_static("W/\"2-0\", W/\"1-0\""));
        assert!(validators.is_fresh(&headers));

        headers.insert(IF_NONE_MATCH, HeaderValue::from_static("W/\"2-0\""));
        assert!(!validators.is_fresh(&headers));
    }

    #[test]
    fn if_modified_since() {
        let modified_at = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let validators = ImageValidators {
            etag: None,
            last_modified: None,
            modified_at: Some(modified_at),
        };
        let mut headers = HeaderMap::new();
        let later = fmt_http_date(modified_at + Duration::from_secs(60));
        headers.insert(IF_MODIFIED_SINCE, HeaderValue::from_str(&later).unwrap());
        assert!(validators.is_fresh(&headers));

        let earlier = fmt_http_date(modified_at - Duration::from_secs(60));
        headers.insert(IF_MODIFIED_SINCE, HeaderValue::from_str(&earlier).unwrap());
        assert!(!validators.is_fresh(&headers));
    }
}
