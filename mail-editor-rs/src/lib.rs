//! mail-editor-rs: admin backend for previewing and editing email templates
//!
//! A host application registers preview providers describing its email
//! templates and the sample data they render with; this crate serves a
//! staff-only admin surface to preview them, inspect their render context,
//! and edit their content through a sanitizing write path.
//!
//! # Features
//!
//! - **Previews**: per-template descriptors over two storage backends
//!   (filesystem search path, database records with language variants)
//! - **Rendering**: runtime Tera engine, so edits are visible immediately
//! - **Sanitization**: email-safe allow-list applied to everything persisted
//! - **Admin surface**: axum HTML pages + JSON API, staff-only
//!
//! # Example
//!
//! ```no_run
//! use mail_editor_rs::config::Config;
//! use mail_editor_rs::preview::{PreviewEnv, PreviewRegistry};
//! use mail_editor_rs::store::FileStore;
//!
//! let config = Config::default();
//! let registry = PreviewRegistry::new();
//! let env = PreviewEnv {
//!     file_store: FileStore::new(config.templates.dirs.clone()),
//!     record_store: None,
//! };
//! ```
//!
//! # Modules
//!
//! - [`config`]: startup configuration
//! - [`settings`]: runtime editor settings (merge + hot reload)
//! - [`preview`]: preview providers, descriptors and the registry
//! - [`render`]: template rendering over the search path
//! - [`store`]: filesystem and database template storage
//! - [`summary`]: depth-bounded context summarizer
//! - [`sanitize`]: email-safe HTML sanitization
//! - [`auth`]: admin users and sessions
//! - [`api`]: the HTTP admin surface

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod preview;
pub mod render;
pub mod sanitize;
pub mod settings;
pub mod store;
pub mod summary;

// Re-export commonly used types
pub use config::Config;
pub use error::{EditorError, Result};
