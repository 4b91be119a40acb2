//! Regression models that turn a scaled feature row into a scaled target.

use crate::errors::{ArancelError, ArancelResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tract_onnx::prelude::*;

/// Single-row regression inference. Implementations must be safe to call
/// concurrently from request handlers.
pub trait Regressor: Send + Sync {
    /// Predict the scaled target for one scaled row.
    fn predict(&self, row: &[f64]) -> ArancelResult<f64>;

    /// Number of input columns the model accepts.
    fn input_width(&self) -> usize;

    fn kind(&self) -> &'static str;
}

/// Linear model exported as JSON: `intercept + sum(coefficients_i * x_i)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, row: &[f64]) -> ArancelResult<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ArancelError::inference(format!(
                "linear model expects {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }

        Ok(self.intercept
            + row
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, w)| x * w)
                .sum::<f64>())
    }

    fn input_width(&self) -> usize {
        self.coefficients.len()
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// ONNX regression graph executed with tract. The input is pinned to a
/// `[1, width]` float32 tensor when the model is loaded.
pub struct OnnxRegressor {
    plan: OnnxPlan,
    width: usize,
}

impl OnnxRegressor {
    pub fn load(path: &Path, width: usize) -> ArancelResult<Self> {
        let artifact = path.display().to_string();
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, width]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ArancelError::artifact(artifact, format!("{e:#}")))?;

        Ok(Self { plan, width })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, row: &[f64]) -> ArancelResult<f64> {
        if row.len() != self.width {
            return Err(ArancelError::inference(format!(
                "onnx model expects {} features, got {}",
                self.width,
                row.len()
            )));
        }

        let data: Vec<f32> = row.iter().map(|x| *x as f32).collect();
        let input = Tensor::from_shape(&[1, self.width], &data)
            .map_err(|e| ArancelError::inference(format!("{e:#}")))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| ArancelError::inference(format!("{e:#}")))?;

        let first = outputs
            .first()
            .ok_or_else(|| ArancelError::inference("model produced no outputs"))?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| ArancelError::inference(format!("{e:#}")))?;

        view.iter()
            .next()
            .map(|v| *v as f64)
            .ok_or_else(|| ArancelError::inference("model output tensor is empty"))
    }

    fn input_width(&self) -> usize {
        self.width
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_prediction() {
        let model = LinearRegressor::new(0.5, vec![1.0, -2.0, 0.25]);
        let y = model.predict(&[2.0, 1.0, 4.0]).unwrap();
        assert!((y - 1.5).abs() < 1e-12);
    }

    #[test]
    fn linear_rejects_width_mismatch() {
        let model = LinearRegressor::new(0.0, vec![1.0, 1.0]);
        assert!(model.predict(&[1.0]).is_err());
        assert_eq!(model.input_width(), 2);
    }

    #[test]
    fn linear_model_json() {
        let model: LinearRegressor =
            serde_json::from_str(r#"{"intercept": 1.0, "coefficients": [0.5, 0.5]}"#).unwrap();
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.predict(&[2.0, 2.0]).unwrap(), 3.0);
    }

    #[test]
    fn onnx_load_reports_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();

        let err = OnnxRegressor::load(&path, 3).err().expect("garbage must not load");
        assert!(err.is_startup());
    }
}
