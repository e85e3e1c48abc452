//! Voice-assistant configuration.

use serde::Deserialize;
use std::path::Path;

use crate::error::VoiceError;

/// Configuration for the voice-assistant integration.
///
/// Both values are required to start a call; either may be absent, in which
/// case `start_call` fails fast with a configuration error.
#[derive(Debug, Clone, Default)]
pub struct VoiceConfig {
    /// Public key for the voice-assistant service.
    pub public_key: Option<String>,

    /// Assistant id to connect to.
    pub assistant_id: Option<String>,
}

/// Secrets file structure.
#[derive(Debug, Deserialize)]
struct VapiSecrets {
    public_key: String,
    assistant_id: String,
}

impl VoiceConfig {
    /// Load configuration from a secrets file or environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load secrets from file first, then fall back to env vars
        let secret_paths = [".secrets/vapi.json", "../.secrets/vapi.json"];

        for path in &secret_paths {
            if let Ok(secrets) = load_secrets_file::<VapiSecrets>(path) {
                tracing::info!(path = %path, "Loaded voice secrets from file");
                return Self {
                    public_key: Some(secrets.public_key),
                    assistant_id: Some(secrets.assistant_id),
                };
            }
        }

        tracing::debug!("Voice secrets file not found, using environment variables");
        Self {
            public_key: std::env::var("VAPI_PUBLIC_KEY").ok(),
            assistant_id: std::env::var("VAPI_ASSISTANT_ID").ok(),
        }
    }

    /// Both secrets, or a configuration error naming the missing one.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Configuration` when either secret is absent.
    pub fn credentials(&self) -> Result<Credentials<'_>, VoiceError> {
        let public_key = self
            .public_key
            .as_deref()
            .ok_or_else(|| VoiceError::Configuration("VAPI_PUBLIC_KEY is not set".to_string()))?;
        let assistant_id = self
            .assistant_id
            .as_deref()
            .ok_or_else(|| VoiceError::Configuration("VAPI_ASSISTANT_ID is not set".to_string()))?;
        Ok(Credentials {
            public_key,
            assistant_id,
        })
    }
}

/// Borrowed view of the two required secrets.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    /// Public key for the voice-assistant service.
    pub public_key: &'a str,

    /// Assistant id to connect to.
    pub assistant_id: &'a str,
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
