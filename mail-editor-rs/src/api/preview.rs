//! Preview endpoints
//!
//! GET renders the selected preview plus auxiliary debug data, as an HTML
//! page or (with the `api` flag) as JSON. POST accepts replacement content,
//! sanitizes and persists it, then redirects back to the GET view. Errors
//! encountered while shaping a response accumulate in an ordered list so the
//! UI can show all of them instead of failing on the first.

use crate::auth::AdminStore;
use crate::preview::{BackendKind, PreviewDescriptor, PreviewEnv, PreviewProvider, PreviewRegistry};
use crate::settings::{EditorKind, SettingsHandle};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

/// Shared application state.
pub struct AppState {
    pub registry: Arc<PreviewRegistry>,
    pub env: PreviewEnv,
    pub settings: SettingsHandle,
    pub admin: AdminStore,
    /// 401 instead of login redirect for unauthenticated requests.
    pub reject_unauthorized: bool,
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub preview_cls: Option<String>,
    pub editor: Option<String>,
    pub language: Option<String>,
    pub api: Option<String>,
}

/// JSON payload for `api` mode responses. The debug fields are omitted in
/// preview-only mode.
#[derive(Debug, Serialize)]
pub struct PreviewPayload {
    pub html: Option<String>,
    pub subject: Option<String>,
    pub errors: Vec<String>,
    pub editor_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_tree: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Per-request language override on top of a registered provider.
struct LanguageOverride {
    inner: Arc<dyn PreviewProvider>,
    language: String,
}

impl PreviewProvider for LanguageOverride {
    fn template_name(&self) -> &str {
        self.inner.template_name()
    }

    fn backend(&self) -> BackendKind {
        self.inner.backend()
    }

    fn language(&self) -> Option<&str> {
        Some(&self.language)
    }

    fn context(&self) -> Value {
        self.inner.context()
    }
}

/// GET URL equivalent to the current request, so the post-write redirect
/// lands on the same variant and editor the user was looking at.
fn preview_url(name: &str, query: &PreviewQuery) -> String {
    let mut url = format!("/admin/preview?preview_cls={}", name);
    if let Some(language) = query.language.as_deref().filter(|l| !l.is_empty()) {
        url.push_str(&format!("&language={}", language));
    }
    if let Some(editor) = query.editor.as_deref().filter(|e| !e.is_empty()) {
        url.push_str(&format!("&editor={}", editor));
    }
    url
}

fn select_provider(
    state: &AppState,
    name: &str,
    language: Option<&str>,
) -> Option<Arc<dyn PreviewProvider>> {
    let provider = state.registry.get(name)?.clone();
    match language {
        Some(lang) if !lang.is_empty() => Some(Arc::new(LanguageOverride {
            inner: provider,
            language: lang.to_string(),
        })),
        _ => Some(provider),
    }
}

/// Build the response payload for one selected preview, accumulating
/// recoverable errors instead of bailing on the first.
async fn build_payload(
    descriptor: &PreviewDescriptor,
    editor_type: EditorKind,
    preview_only: bool,
    max_depth: usize,
) -> PreviewPayload {
    let mut errors = Vec::new();

    let html = match descriptor.render(&Map::new()).await {
        Ok(html) => Some(html),
        Err(e) => {
            warn!("Preview render failed: {}", e);
            errors.push(e.to_string());
            None
        }
    };

    let subject = if html.is_some() {
        match descriptor.subject().await {
            Ok(subject) => subject,
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        }
    } else {
        None
    };

    let (context_tree, raw) = if preview_only {
        (None, None)
    } else {
        let tree = match descriptor.context_tree(max_depth) {
            Ok(tree) => Some(tree),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        };
        let raw = match descriptor.raw_content().await {
            Ok(raw) => Some(raw),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        };
        (tree, raw)
    };

    PreviewPayload {
        html,
        subject,
        errors,
        editor_type: editor_type.as_str().to_string(),
        context_tree,
        raw,
    }
}

/// GET /admin/preview
pub async fn preview_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let settings = state.settings.get();
    let editor_type = query
        .editor
        .as_deref()
        .and_then(EditorKind::parse)
        .unwrap_or(settings.editor);
    // An empty flag value counts as absent, like the other query parameters.
    let is_api = query.api.as_deref().is_some_and(|v| !v.is_empty());

    let Some(name) = query.preview_cls.as_deref().filter(|n| !n.is_empty()) else {
        // No selection: the picker page listing registered previews.
        return super::web::editor_page(&state, &settings, editor_type, None, None)
            .into_response();
    };

    let Some(provider) = select_provider(&state, name, query.language.as_deref()) else {
        let msg = format!("Unknown preview class: {}", name);
        if is_api {
            return (StatusCode::NOT_FOUND, Json(ApiError::new(&msg))).into_response();
        }
        return super::web::editor_page(&state, &settings, editor_type, None, Some(msg))
            .into_response();
    };

    let descriptor = match PreviewDescriptor::new(provider, &state.env) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            // Misconfigured preview; an operator problem, not a user one.
            warn!("Preview construction failed for {}: {}", name, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(&e.to_string())),
            )
                .into_response();
        }
    };

    let payload = build_payload(
        &descriptor,
        editor_type,
        settings.preview_only,
        settings.max_context_depth,
    )
    .await;

    if is_api {
        return Json(payload).into_response();
    }

    super::web::editor_page(&state, &settings, editor_type, Some((name, payload)), None)
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct WriteForm {
    pub content: String,
}

/// POST /admin/preview — sanitize + persist, then redirect to the GET view.
pub async fn preview_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
    Form(form): Form<WriteForm>,
) -> Response {
    let settings = state.settings.get();
    if settings.preview_only {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiError::new("Editing is disabled in preview-only mode")),
        )
            .into_response();
    }

    let Some(name) = query.preview_cls.as_deref().filter(|n| !n.is_empty()) else {
        return Redirect::to("/admin/preview").into_response();
    };

    let Some(provider) = select_provider(&state, name, query.language.as_deref()) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(&format!("Unknown preview class: {}", name))),
        )
            .into_response();
    };

    let descriptor = match PreviewDescriptor::new(provider, &state.env) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!("Preview construction failed for {}: {}", name, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(&e.to_string())),
            )
                .into_response();
        }
    };

    if let Err(e) = descriptor.write(&form.content).await {
        warn!("Preview write failed for {}: {}", name, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(&e.to_string())),
        )
            .into_response();
    }

    Redirect::to(&preview_url(name, &query)).into_response()
}
