//! Email template previews
//!
//! A host application registers one [`PreviewProvider`] per editable email
//! template: the template's identity, which backend stores it, and the
//! sample context it should render with. Per request, a [`PreviewDescriptor`]
//! is built from the provider and the configured stores; it is a short-lived
//! view over a template file or database record and owns no state of its own.

pub mod registry;

pub use registry::{PreviewRegistry, RegisterFn};

use crate::error::{EditorError, Result};
use crate::render;
use crate::store::{FileStore, RecordStore, TemplateRecord};
use crate::{sanitize, summary};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Which storage a preview's template lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// A file resolved through the template search path.
    Filesystem,
    /// A database record, optionally per-language.
    Record,
}

/// A registered description of one editable email template.
pub trait PreviewProvider: Send + Sync {
    /// Template identifier: a search-path-relative file name for the
    /// filesystem backend, a record name for the database backend.
    fn template_name(&self) -> &str;

    fn backend(&self) -> BackendKind {
        BackendKind::Filesystem
    }

    /// Localized record variant to select instead of the base record
    /// (database backend only).
    fn language(&self) -> Option<&str> {
        None
    }

    /// Sample data the template renders with. Must be a JSON object.
    fn context(&self) -> Value;
}

/// Stores available to descriptor construction. The record store is the
/// optional add-on: previews declaring the record backend fail construction
/// when it is absent.
#[derive(Clone)]
pub struct PreviewEnv {
    pub file_store: FileStore,
    pub record_store: Option<RecordStore>,
}

enum TemplateBackend {
    Filesystem(FileStore),
    Record(RecordStore),
}

/// Per-request view over one registered preview. The backend is chosen at
/// construction and immutable afterwards.
pub struct PreviewDescriptor {
    provider: Arc<dyn PreviewProvider>,
    backend: TemplateBackend,
}

impl PreviewDescriptor {
    pub fn new(provider: Arc<dyn PreviewProvider>, env: &PreviewEnv) -> Result<Self> {
        if provider.template_name().is_empty() {
            return Err(EditorError::Construction(
                "preview has no template name".to_string(),
            ));
        }

        let backend = match provider.backend() {
            BackendKind::Filesystem => TemplateBackend::Filesystem(env.file_store.clone()),
            BackendKind::Record => match &env.record_store {
                Some(store) => TemplateBackend::Record(store.clone()),
                None => {
                    return Err(EditorError::Construction(
                        "record template store is not configured".to_string(),
                    ))
                }
            },
        };

        Ok(Self { provider, backend })
    }

    pub fn template_name(&self) -> &str {
        self.provider.template_name()
    }

    /// Sample context as a JSON object.
    fn context_map(&self) -> Result<Map<String, Value>> {
        match self.provider.context() {
            Value::Object(map) => Ok(map),
            other => Err(EditorError::Parse(format!(
                "preview context must be an object, got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Render the template with the sample context merged with `extra`
    /// (extras win), trimmed of surrounding whitespace. Template syntax
    /// failures propagate to the caller.
    pub async fn render(&self, extra: &Map<String, Value>) -> Result<String> {
        let context = render::merge_context(&self.context_map()?, extra);
        match &self.backend {
            TemplateBackend::Filesystem(store) => {
                render::render_file(store.dirs(), self.template_name(), &context)
            }
            TemplateBackend::Record(store) => {
                let record = self.fetch_record(store).await?;
                render::render_str(&record.html_content, &context, true)
            }
        }
    }

    /// Extract the subject line.
    ///
    /// Filesystem backend: render, then pull the subject out of the leading
    /// HTML comment convention. Record backend: render the record's subject
    /// field as its own template fragment against the same context.
    pub async fn subject(&self) -> Result<Option<String>> {
        match &self.backend {
            TemplateBackend::Filesystem(_) => {
                let html = self.render(&Map::new()).await?;
                Ok(extract_subject(&html))
            }
            TemplateBackend::Record(store) => {
                let record = self.fetch_record(store).await?;
                if record.subject.is_empty() {
                    return Ok(None);
                }
                let context = self.context_map()?;
                let subject = render::render_str(&record.subject, &context, false)?;
                Ok(Some(subject))
            }
        }
    }

    /// The stored template source, unrendered.
    pub async fn raw_content(&self) -> Result<String> {
        match &self.backend {
            TemplateBackend::Filesystem(store) => store.read(self.template_name()),
            TemplateBackend::Record(store) => {
                let record = self.fetch_record(store).await?;
                if !record.html_content.is_empty() {
                    Ok(record.html_content)
                } else {
                    Ok(record.content)
                }
            }
        }
    }

    /// Sanitize and persist replacement content. Whole-file overwrite or a
    /// single record update; no locking, last writer wins.
    pub async fn write(&self, new_content: &str) -> Result<()> {
        let cleaned = sanitize::clean(new_content);
        debug!(
            template = self.template_name(),
            bytes = cleaned.len(),
            "Persisting sanitized template content"
        );
        match &self.backend {
            TemplateBackend::Filesystem(store) => store.write(self.template_name(), &cleaned),
            TemplateBackend::Record(store) => {
                let record = self.fetch_record(store).await?;
                store.update_html(&record.id, &cleaned).await
            }
        }
    }

    /// Depth-bounded display tree over the sample context.
    pub fn context_tree(&self, max_depth: usize) -> Result<Value> {
        Ok(summary::summarize(&self.context_map()?, max_depth))
    }

    /// Resolved file path (filesystem backend only).
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match &self.backend {
            TemplateBackend::Filesystem(store) => store.resolve(self.template_name()).ok(),
            TemplateBackend::Record(_) => None,
        }
    }

    async fn fetch_record(&self, store: &RecordStore) -> Result<TemplateRecord> {
        store
            .find(self.template_name(), self.provider.language())
            .await
    }
}

/// Pull the subject out of an HTML comment following the
/// `<!-- Subject: ... -->` convention.
pub fn extract_subject(html: &str) -> Option<String> {
    static SUBJECT_RE: OnceLock<Regex> = OnceLock::new();
    let re = SUBJECT_RE.get_or_init(|| {
        Regex::new(r"<!--.*[sS]ubject: *(?P<subject>.*?) *-->").expect("subject regex")
    });
    re.captures(html)
        .map(|caps| caps["subject"].trim().to_string())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_subject_basic() {
        let html = "<!-- Subject: Hello World -->\n<p>body</p>";
        assert_eq!(extract_subject(html), Some("Hello World".to_string()));
    }

    #[test]
    fn test_extract_subject_lowercase_and_padding() {
        let html = "<!--   subject:   spaced out   -->";
        assert_eq!(extract_subject(html), Some("spaced out".to_string()));
    }

    #[test]
    fn test_extract_subject_absent() {
        assert_eq!(extract_subject("<p>no comment</p>"), None);
    }

    struct NamelessPreview;

    impl PreviewProvider for NamelessPreview {
        fn template_name(&self) -> &str {
            ""
        }

        fn context(&self) -> Value {
            json!({})
        }
    }

    struct RecordPreview;

    impl PreviewProvider for RecordPreview {
        fn template_name(&self) -> &str {
            "welcome"
        }

        fn backend(&self) -> BackendKind {
            BackendKind::Record
        }

        fn context(&self) -> Value {
            json!({})
        }
    }

    fn env_without_records() -> PreviewEnv {
        PreviewEnv {
            file_store: FileStore::new(vec![]),
            record_store: None,
        }
    }

    #[test]
    fn test_missing_template_name_fails_construction() {
        let err = PreviewDescriptor::new(Arc::new(NamelessPreview), &env_without_records())
            .err()
            .unwrap();
        assert!(matches!(err, EditorError::Construction(_)));
    }

    #[test]
    fn test_record_backend_without_store_fails_construction() {
        let err = PreviewDescriptor::new(Arc::new(RecordPreview), &env_without_records())
            .err()
            .unwrap();
        assert!(matches!(err, EditorError::Construction(_)));
    }
}
