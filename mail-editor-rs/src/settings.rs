//! Runtime editor settings
//!
//! Host overrides are merged over built-in defaults at startup. The merged
//! settings live behind a shared handle so they can be swapped out when the
//! host signals a configuration change.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Rich-text editor backend served to the admin page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    Tinymce,
    Ckeditor,
}

impl EditorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorKind::Tinymce => "tinymce",
            EditorKind::Ckeditor => "ckeditor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tinymce" => Some(EditorKind::Tinymce),
            "ckeditor" => Some(EditorKind::Ckeditor),
            _ => None,
        }
    }
}

/// Fully resolved editor settings.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSettings {
    /// Disables the write path and the debug payload (context tree, raw
    /// source) on responses.
    pub preview_only: bool,
    pub editor: EditorKind,
    pub toolbar: Vec<String>,
    pub plugins: Vec<String>,
    pub color_map: Vec<String>,
    /// Maximum recursion depth for the context summary.
    pub max_context_depth: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            preview_only: false,
            editor: EditorKind::Tinymce,
            toolbar: [
                "undo redo",
                "blocks fontsize",
                "bold italic underline forecolor backcolor",
                "align bullist numlist",
                "table link image",
                "removeformat code",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            plugins: ["lists", "link", "image", "table", "code", "wordcount"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            color_map: [
                "000000", "Black", "FFFFFF", "White", "E03E2D", "Red", "2DC26B", "Green",
                "3598DB", "Blue", "F1C40F", "Yellow",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_context_depth: 3,
        }
    }
}

/// Partial host-supplied overrides. Unknown keys are a configuration error
/// and fail deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EditorOverrides {
    pub preview_only: Option<bool>,
    pub editor: Option<EditorKind>,
    pub toolbar: Option<Vec<String>>,
    pub plugins: Option<Vec<String>>,
    pub color_map: Option<Vec<String>>,
    pub max_context_depth: Option<usize>,
}

impl EditorSettings {
    /// Merge overrides over the built-in defaults.
    pub fn with_overrides(overrides: &EditorOverrides) -> Self {
        let mut settings = EditorSettings::default();
        if let Some(preview_only) = overrides.preview_only {
            settings.preview_only = preview_only;
        }
        if let Some(editor) = overrides.editor {
            settings.editor = editor;
        }
        if let Some(toolbar) = &overrides.toolbar {
            settings.toolbar = toolbar.clone();
        }
        if let Some(plugins) = &overrides.plugins {
            settings.plugins = plugins.clone();
        }
        if let Some(color_map) = &overrides.color_map {
            settings.color_map = color_map.clone();
        }
        if let Some(depth) = overrides.max_context_depth {
            settings.max_context_depth = depth;
        }
        settings
    }
}

/// Shared handle over the resolved settings. Reads clone the current value;
/// `reload` swaps in a fresh merge when the host configuration changes.
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<RwLock<EditorSettings>>,
}

impl SettingsHandle {
    pub fn new(overrides: &EditorOverrides) -> Self {
        Self {
            inner: Arc::new(RwLock::new(EditorSettings::with_overrides(overrides))),
        }
    }

    pub fn get(&self) -> EditorSettings {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Re-merge from new overrides, invalidating previously resolved values.
    pub fn reload(&self, overrides: &EditorOverrides) {
        let settings = EditorSettings::with_overrides(overrides);
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = settings;
    }
}
