use mail_editor_rs::api::ApiServer;
use mail_editor_rs::auth::AdminStore;
use mail_editor_rs::config::Config;
use mail_editor_rs::preview::{
    BackendKind, PreviewEnv, PreviewProvider, PreviewRegistry, RegisterFn,
};
use mail_editor_rs::settings::SettingsHandle;
use mail_editor_rs::store::{FileStore, RecordStore};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Demo preview so a fresh install has something to look at. Host
/// applications contribute their own providers through `REGISTRATIONS`.
struct WelcomePreview;

impl PreviewProvider for WelcomePreview {
    fn template_name(&self) -> &str {
        "welcome.html"
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Filesystem
    }

    fn context(&self) -> Value {
        json!({
            "user": {
                "first_name": "Ada",
                "email": "ada@example.com",
            },
            "site_name": "Example",
        })
    }
}

fn register_builtin(registry: &mut PreviewRegistry) {
    registry.register("Welcome", Arc::new(WelcomePreview));
}

/// Statically declared registration hooks, run once at startup.
const REGISTRATIONS: &[RegisterFn] = &[register_builtin];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .pretty()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Starting mail-editor-rs");

    // Load configuration
    let config = if std::path::Path::new("config.toml").exists() {
        Config::from_file("config.toml")?
    } else {
        info!("No config file found, using defaults");
        Config::default()
    };

    info!("Configuration loaded");
    info!("  Listening on: {}", config.server.listen_addr);
    info!("  Template dirs: {:?}", config.templates.dirs);
    info!("  Record templates: {}", config.storage.record_templates);

    // Editor settings: host overrides merged over defaults
    let settings = SettingsHandle::new(&config.editor);

    // Stores
    let pool = SqlitePool::connect(&config.storage.database_url).await?;

    let admin = AdminStore::new(pool.clone());
    admin.init_db().await?;

    let record_store = if config.storage.record_templates {
        let store = RecordStore::new(pool.clone());
        store.init_db().await?;
        Some(store)
    } else {
        None
    };

    let env = PreviewEnv {
        file_store: FileStore::new(config.templates.dirs.clone()),
        record_store,
    };

    // Registry: populated once at startup, read-only afterwards
    let registry = Arc::new(PreviewRegistry::from_providers(REGISTRATIONS));
    info!("Registered previews: {:?}", registry.names());

    let server = ApiServer::new(
        registry,
        env,
        settings,
        admin,
        config.auth.reject_unauthorized,
        config.server.listen_addr.clone(),
    );

    server.run().await?;

    Ok(())
}
