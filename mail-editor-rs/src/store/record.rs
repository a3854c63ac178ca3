//! Database-backed template records
//!
//! Stores template content as rows instead of files, with optional
//! per-language variants of a base record. The base record of a name carries
//! the default flag; localized variants share the name, carry a language tag
//! and are explicitly not flagged default.

use crate::error::{EditorError, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// One stored template variant.
#[derive(Debug, Clone)]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    /// Empty for the base record.
    pub language: String,
    pub is_default: bool,
    pub subject: String,
    pub html_content: String,
    /// Plain-text fallback body.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct RecordStore {
    db: SqlitePool,
}

impl RecordStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the template records table.
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS email_templates (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                language TEXT NOT NULL DEFAULT '',
                is_default BOOLEAN NOT NULL DEFAULT 1,
                subject TEXT NOT NULL DEFAULT '',
                html_content TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_template_name ON email_templates(name)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Create a template record. `language = None` creates the default/base
    /// record; `Some(lang)` creates a localized variant.
    pub async fn create(
        &self,
        name: &str,
        language: Option<&str>,
        subject: &str,
        html_content: &str,
        content: &str,
    ) -> Result<TemplateRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let language = language.unwrap_or("");
        let is_default = language.is_empty();

        sqlx::query(
            r#"
            INSERT INTO email_templates (
                id, name, language, is_default, subject, html_content, content,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(language)
        .bind(is_default)
        .bind(subject)
        .bind(html_content)
        .bind(content)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(TemplateRecord {
            id,
            name: name.to_string(),
            language: language.to_string(),
            is_default,
            subject: subject.to_string(),
            html_content: html_content.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Look up a record by name.
    ///
    /// Without a language the default record is selected; with one, only the
    /// matching non-default variant. The two filters are mutually exclusive
    /// so a localized lookup can never fall through to the base record.
    pub async fn find(&self, name: &str, language: Option<&str>) -> Result<TemplateRecord> {
        let query = match language {
            None => sqlx::query_as::<_, RecordRow>(
                r#"
                SELECT id, name, language, is_default, subject, html_content,
                       content, created_at, updated_at
                FROM email_templates
                WHERE name = ? AND is_default = 1
                "#,
            )
            .bind(name),
            Some(lang) => sqlx::query_as::<_, RecordRow>(
                r#"
                SELECT id, name, language, is_default, subject, html_content,
                       content, created_at, updated_at
                FROM email_templates
                WHERE name = ? AND language = ? AND is_default = 0
                "#,
            )
            .bind(name)
            .bind(lang),
        };

        let row = query.fetch_optional(&self.db).await?;
        match row {
            Some(row) => row.into_record(),
            None => {
                let attempted = match language {
                    Some(lang) => format!("{} ({})", name, lang),
                    None => name.to_string(),
                };
                Err(EditorError::NotFound(attempted))
            }
        }
    }

    /// Replace the stored HTML content of a record.
    ///
    /// Plain read-modify-save with no optimistic-concurrency token;
    /// concurrent editors of the same record overwrite each other.
    pub async fn update_html(&self, id: &str, html_content: &str) -> Result<()> {
        sqlx::query("UPDATE email_templates SET html_content = ?, updated_at = ? WHERE id = ?")
            .bind(html_content)
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: String,
    name: String,
    language: String,
    is_default: bool,
    subject: String,
    html_content: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl RecordRow {
    fn into_record(self) -> Result<TemplateRecord> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| EditorError::Parse(format!("Invalid created_at date: {}", e)))?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(|e| EditorError::Parse(format!("Invalid updated_at date: {}", e)))?
            .with_timezone(&Utc);

        Ok(TemplateRecord {
            id: self.id,
            name: self.name,
            language: self.language,
            is_default: self.is_default,
            subject: self.subject,
            html_content: self.html_content,
            content: self.content,
            created_at,
            updated_at,
        })
    }
}
