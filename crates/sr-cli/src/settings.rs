//! The JSON settings file holding OpenAI credentials.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the settings file in the home directory.
pub const SETTINGS_FILE_NAME: &str = ".sprawl-runner.json";

/// Model used when the settings leave it empty.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0125";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Contents of the settings file. Missing keys read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_assistant_id: String,
}

/// `~/.sprawl-runner.json`.
pub fn default_path() -> Result<PathBuf, String> {
    dirs::home_dir()
        .map(|home| home.join(SETTINGS_FILE_NAME))
        .ok_or_else(|| "cannot locate the home directory; pass --config".to_string())
}

/// A settings file on disk.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Settings, String> {
        let text = fs::read_to_string(&self.path)
            .map_err(|_| format!("No config file found at: {}", self.path.display()))?;
        serde_json::from_str(&text)
            .map_err(|e| format!("invalid settings in {}: {e}", self.path.display()))
    }

    pub fn write(&self, settings: &Settings) -> Result<(), String> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| format!("cannot serialize settings: {e}"))?;
        fs::write(&self.path, json + "\n")
            .map_err(|e| format!("cannot write {}: {e}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}

/// Let a non-empty `OPENAI_API_KEY` replace the stored key.
pub fn apply_env(settings: &mut Settings) {
    let key = std::env::var(API_KEY_ENV).unwrap_or_default();
    if !key.trim().is_empty() {
        settings.openai_api_key = key.trim().to_string();
    }
}

/// Fill in what can be defaulted and reject what cannot.
///
/// An empty model becomes [`DEFAULT_MODEL`]. An empty assistant id is
/// filled by `create_assistant`, which gets the model to register with.
/// Returns whether anything changed and should be written back.
pub fn validate<F>(settings: &mut Settings, create_assistant: F) -> Result<bool, String>
where
    F: FnOnce(&str) -> Result<String, String>,
{
    if settings.openai_api_key.trim().is_empty() {
        return Err("OpenAI API Key was not found in settings.".to_string());
    }

    let mut dirty = false;
    if settings.openai_model.trim().is_empty() {
        settings.openai_model = DEFAULT_MODEL.to_string();
        dirty = true;
    }
    if settings.openai_assistant_id.trim().is_empty() {
        settings.openai_assistant_id = create_assistant(&settings.openai_model)?;
        dirty = true;
    }
    Ok(dirty)
}
