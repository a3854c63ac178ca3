//! Admin authentication
//!
//! Pool-backed user store with Argon2 password hashes and a staff flag, plus
//! the session-cookie helpers used by the admin pages. Preview routes are
//! staff-only; the middleware in `api::server` enforces that.

use crate::error::{EditorError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::http::HeaderMap;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Clone)]
pub struct AdminStore {
    db: SqlitePool,
}

impl AdminStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the admin users table.
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                email TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                is_staff BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Add a user. The password is hashed with Argon2 before storage.
    pub async fn add_user(&self, email: &str, password: &str, is_staff: bool) -> Result<()> {
        info!("Adding admin user: {}", email);

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| EditorError::Parse(format!("Password hashing failed: {}", e)))?
            .to_string();

        sqlx::query(
            "INSERT INTO admin_users (email, password_hash, is_staff, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(hash)
        .bind(is_staff)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Verify credentials. Unknown users fail the same way as bad passwords.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<bool> {
        let row = sqlx::query_as::<_, (String,)>(
            "SELECT password_hash FROM admin_users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        let Some((stored_hash,)) = row else {
            warn!("Authentication attempt for unknown user: {}", email);
            return Ok(false);
        };

        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| EditorError::Parse(format!("Corrupt password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Whether the user carries the staff flag.
    pub async fn is_staff(&self, email: &str) -> Result<bool> {
        let row = sqlx::query_as::<_, (bool,)>(
            "SELECT is_staff FROM admin_users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(is_staff,)| is_staff).unwrap_or(false))
    }
}

/// Pull the logged-in email out of the session cookie, if present.
pub fn get_session_email(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

/// Session cookie for a fresh login.
pub fn session_cookie(email: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, email)
}

/// Expired cookie clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> AdminStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let store = AdminStore::new(pool);
        store.init_db().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_authenticate_roundtrip() {
        let store = store().await;
        store.add_user("staff@example.com", "hunter2", true).await.unwrap();

        assert!(store.authenticate("staff@example.com", "hunter2").await.unwrap());
        assert!(!store.authenticate("staff@example.com", "wrong").await.unwrap());
        assert!(!store.authenticate("nobody@example.com", "hunter2").await.unwrap());
    }

    #[tokio::test]
    async fn test_staff_flag() {
        let store = store().await;
        store.add_user("staff@example.com", "pw", true).await.unwrap();
        store.add_user("user@example.com", "pw", false).await.unwrap();

        assert!(store.is_staff("staff@example.com").await.unwrap());
        assert!(!store.is_staff("user@example.com").await.unwrap());
        assert!(!store.is_staff("ghost@example.com").await.unwrap());
    }

    #[test]
    fn test_session_cookie_roundtrip() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            "other=1; admin_session=staff@example.com".parse().unwrap(),
        );
        assert_eq!(
            get_session_email(&headers),
            Some("staff@example.com".to_string())
        );
    }

    #[test]
    fn test_missing_session_cookie() {
        let headers = HeaderMap::new();
        assert_eq!(get_session_email(&headers), None);
    }
}
