//! Startup loading of the model, the two scalers and the feature names.
//!
//! Every artifact is read once, checked against the feature schema, and
//! then shared read-only by all requests. Any failure here is fatal for
//! the process.

use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config_loader::ArtifactPaths;
use crate::errors::{ArancelError, ArancelResult};
use crate::feature_schema::FeatureSchema;
use crate::options::DropdownOptions;
use crate::regressor::{LinearRegressor, OnnxRegressor, Regressor};
use crate::scaler::Scaler;

/// Immutable bundle of everything needed to serve predictions.
pub struct ArtifactSet {
    pub model: Box<dyn Regressor>,
    pub scaler_x: Scaler,
    pub scaler_y: Scaler,
    pub schema: FeatureSchema,
    pub options: DropdownOptions,
    /// base64 SHA-256 of the model file, empty for in-memory sets.
    pub model_fingerprint: String,
}

impl std::fmt::Debug for ArtifactSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactSet")
            .field("model", &self.model.kind())
            .field("n_features", &self.schema.len())
            .field("model_fingerprint", &self.model_fingerprint)
            .finish()
    }
}

impl ArtifactSet {
    /// Assemble and cross-check an artifact set. Used by `load` and by tests
    /// that build artifacts in memory.
    pub fn new(
        model: Box<dyn Regressor>,
        scaler_x: Scaler,
        scaler_y: Scaler,
        schema: FeatureSchema,
    ) -> ArancelResult<Self> {
        let width = schema.len();

        scaler_x
            .validate(width)
            .map_err(|e| ArancelError::artifact("scaler_X", e.to_string()))?;
        scaler_y
            .validate(1)
            .map_err(|e| ArancelError::artifact("scaler_y", e.to_string()))?;

        if model.input_width() != width {
            return Err(ArancelError::artifact(
                "model",
                format!(
                    "model expects {} features but feature names list {}",
                    model.input_width(),
                    width
                ),
            ));
        }

        let options = DropdownOptions::from_schema(&schema);

        Ok(Self {
            model,
            scaler_x,
            scaler_y,
            schema,
            options,
            model_fingerprint: String::new(),
        })
    }

    pub fn load(paths: &ArtifactPaths) -> ArancelResult<Self> {
        let names: Vec<String> = read_json(&paths.feature_names)?;
        let schema = FeatureSchema::from_names(names).map_err(|e| {
            ArancelError::artifact(paths.feature_names.display().to_string(), e.to_string())
        })?;

        let scaler_x: Scaler = read_json(&paths.scaler_x)?;
        let scaler_y: Scaler = read_json(&paths.scaler_y)?;
        let model = load_model(&paths.model, schema.len())?;
        let fingerprint = fingerprint_file(&paths.model)?;

        let mut set = Self::new(model, scaler_x, scaler_y, schema)?;
        set.model_fingerprint = fingerprint;

        info!(
            scalar = set.schema.scalar_feature().unwrap_or("<none>"),
            "Loaded {} model with {} features ({} sectors, {} estados, {} tipos de predio), fingerprint {}",
            set.model.kind(),
            set.schema.len(),
            set.options.sector.len(),
            set.options.estado.len(),
            set.options.tipo_predio.len(),
            set.model_fingerprint
        );

        Ok(set)
    }
}

/// Pick the model runtime from the file extension: `.json` is a linear
/// model, anything else is treated as ONNX.
fn load_model(path: &Path, width: usize) -> ArancelResult<Box<dyn Regressor>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let model: LinearRegressor = read_json(path)?;
        Ok(Box::new(model))
    } else {
        if !path.is_file() {
            return Err(ArancelError::artifact(path.display().to_string(), "file not found"));
        }
        Ok(Box::new(OnnxRegressor::load(path, width)?))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ArancelResult<T> {
    let artifact = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|e| ArancelError::artifact(&artifact, e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| ArancelError::artifact(artifact, e.to_string()))
}

fn fingerprint_file(path: &Path) -> ArancelResult<String> {
    let bytes =
        fs::read(path).map_err(|e| ArancelError::artifact(path.display().to_string(), e.to_string()))?;
    Ok(b64.encode(Sha256::digest(&bytes)))
}
