//! Application configuration.

use serde::Deserialize;
use std::path::Path;

use routed_voice::VoiceConfig;

/// Application configuration loaded from environment variables and secrets
/// files.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Route backend base URL (default: `http://127.0.0.1:5000`).
    pub backend_url: String,

    /// Path to the RocksDB data directory (default: `routed-data`).
    pub data_dir: String,

    /// Current user's identity token.
    pub user_id: String,

    /// Planner API key (optional; planner commands are disabled without it).
    pub planner_api_key: Option<String>,

    /// Planner model name.
    pub planner_model: String,

    /// Voice-assistant configuration.
    pub voice: VoiceConfig,
}

/// Planner secrets file structure.
#[derive(Debug, Deserialize)]
struct PlannerSecrets {
    api_key: String,
    #[serde(default)]
    model: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (planner_api_key, planner_model) = load_planner_secrets();

        Self {
            backend_url: std::env::var("ROUTE_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "routed-data".into()),
            user_id: std::env::var("ROUTED_USER_ID").unwrap_or_else(|_| "local".into()),
            planner_api_key,
            planner_model,
            voice: VoiceConfig::from_env(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".into(),
            data_dir: "routed-data".into(),
            user_id: "local".into(),
            planner_api_key: None,
            planner_model: routed_client::planner::DEFAULT_MODEL.into(),
            voice: VoiceConfig::default(),
        }
    }
}

/// Load planner secrets from file or environment.
fn load_planner_secrets() -> (Option<String>, String) {
    let secret_paths = [".secrets/gemini.json", "../.secrets/gemini.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<PlannerSecrets>(path) {
            tracing::info!(path = %path, "Loaded planner secrets from file");
            let model = secrets
                .model
                .unwrap_or_else(|| routed_client::planner::DEFAULT_MODEL.to_string());
            return (Some(secrets.api_key), model);
        }
    }

    tracing::debug!("Planner secrets file not found, using environment variables");
    (
        std::env::var("GEMINI_API_KEY").ok(),
        std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| routed_client::planner::DEFAULT_MODEL.to_string()),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
