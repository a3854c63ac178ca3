use crate::error::Result;
use crate::settings::EditorOverrides;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub templates: TemplatesConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    /// Host overrides for the runtime editor settings.
    #[serde(default)]
    pub editor: EditorOverrides,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplatesConfig {
    /// Template search path; directories are probed in order, first hit wins.
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub database_url: String,
    /// Enables the database-record template backend. Previews that declare
    /// the record backend fail at construction when this is off.
    pub record_templates: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Respond 401 instead of redirecting unauthenticated requests to the
    /// login page.
    pub reject_unauthorized: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::EditorError::Config(e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| crate::error::EditorError::Config(e.to_string()))
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "127.0.0.1:8030".to_string(),
            },
            templates: TemplatesConfig {
                dirs: vec![PathBuf::from("templates/emails")],
            },
            storage: StorageConfig {
                database_url: "sqlite://editor.db".to_string(),
                record_templates: false,
            },
            auth: AuthConfig {
                reject_unauthorized: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            editor: EditorOverrides::default(),
        }
    }
}
