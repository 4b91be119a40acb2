use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{ArancelError, ArancelResult};

pub const DEFAULT_CONFIG_FILE: &str = "arancel.toml";

/// File names of the four artifacts inside `model_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactFiles {
    pub model: String,
    pub scaler_x: String,
    pub scaler_y: String,
    pub feature_names: String,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            model: "model.onnx".to_string(),
            scaler_x: "scaler_X.json".to_string(),
            scaler_y: "scaler_y.json".to_string(),
            feature_names: "feature_names.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Values shown in the form before anything is submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormConfig {
    pub tipo_pu_pr: String,
    pub terreno: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            tipo_pu_pr: "PU".to_string(),
            terreno: "0.79".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArancelConfig {
    pub model_dir: PathBuf,
    #[serde(default)]
    pub artifacts: ArtifactFiles,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub form: FormConfig,
}

impl Default for ArancelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
            artifacts: ArtifactFiles::default(),
            server: ServerConfig::default(),
            form: FormConfig::default(),
        }
    }
}

/// Absolute-or-relative paths of the four artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler_x: PathBuf,
    pub scaler_y: PathBuf,
    pub feature_names: PathBuf,
}

impl ArancelConfig {
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model_dir.join(&self.artifacts.model),
            scaler_x: self.model_dir.join(&self.artifacts.scaler_x),
            scaler_y: self.model_dir.join(&self.artifacts.scaler_y),
            feature_names: self.model_dir.join(&self.artifacts.feature_names),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Layered configuration: built-in defaults, then the TOML file, then
/// `ARANCEL_` environment variables (`__` separates nested keys).
pub fn load_config(path: Option<&Path>) -> ArancelResult<ArancelConfig> {
    let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    let figment = Figment::from(Serialized::defaults(ArancelConfig::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed("ARANCEL_").split("__"));

    let config: ArancelConfig = figment.extract()?;

    if config.model_dir.as_os_str().is_empty() {
        return Err(ArancelError::config("model_dir must not be empty"));
    }
    if config.server.host.trim().is_empty() {
        return Err(ArancelError::config("server.host must not be empty"));
    }

    Ok(config)
}
