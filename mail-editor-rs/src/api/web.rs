//! Admin HTML pages (login + editor)

use askama_axum::Template;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::{clear_session_cookie, session_cookie};
use crate::settings::{EditorKind, EditorSettings};

use super::preview::{AppState, PreviewPayload};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    error: String,
}

#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorTemplate {
    preview_names: Vec<String>,
    selected: String,
    html: String,
    subject: String,
    raw: String,
    context_tree: String,
    errors: Vec<String>,
    editor_type: String,
    preview_only: bool,
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

/// Assemble the editor page for the current selection (or the bare picker).
pub fn editor_page(
    state: &AppState,
    settings: &EditorSettings,
    editor_type: EditorKind,
    selection: Option<(&str, PreviewPayload)>,
    error: Option<String>,
) -> EditorTemplate {
    let preview_names = state
        .registry
        .names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let mut template = EditorTemplate {
        preview_names,
        selected: String::new(),
        html: String::new(),
        subject: String::new(),
        raw: String::new(),
        context_tree: String::new(),
        errors: Vec::new(),
        editor_type: editor_type.as_str().to_string(),
        preview_only: settings.preview_only,
    };

    if let Some(message) = error {
        template.errors.push(message);
    }

    if let Some((name, payload)) = selection {
        template.selected = name.to_string();
        template.html = payload.html.unwrap_or_default();
        template.subject = payload.subject.unwrap_or_default();
        template.raw = payload.raw.unwrap_or_default();
        template.context_tree = payload
            .context_tree
            .map(|tree| serde_json::to_string_pretty(&tree).unwrap_or_default())
            .unwrap_or_default();
        template.errors.extend(payload.errors);
    }

    template
}

/// GET /admin/login
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        error: String::new(),
    }
}

/// POST /admin/login
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> axum::response::Response {
    match state.admin.authenticate(&form.email, &form.password).await {
        Ok(true) => (
            StatusCode::SEE_OTHER,
            [
                (header::SET_COOKIE, session_cookie(&form.email)),
                (header::LOCATION, "/admin/preview".to_string()),
            ],
            "Redirecting...",
        )
            .into_response(),
        _ => LoginTemplate {
            error: "Invalid email or password".to_string(),
        }
        .into_response(),
    }
}

/// GET /admin/logout
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, clear_session_cookie()),
            (header::LOCATION, "/admin/login".to_string()),
        ],
        "Redirecting...",
    )
}
