//! Feature and target scalers exported from the training pipeline.
//!
//! Both follow the sklearn conventions for the stored attributes
//! (`mean_`/`scale_` for standard scaling, `min_`/`scale_` for min-max).

use crate::errors::{ArancelError, ArancelResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    pub fn width(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }

    /// Check internal consistency and the expected column count.
    pub fn validate(&self, expected_width: usize) -> ArancelResult<()> {
        let (offset, scale) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { min, scale } => (min, scale),
        };

        if offset.len() != scale.len() {
            return Err(ArancelError::schema(format!(
                "scaler offset has {} columns but scale has {}",
                offset.len(),
                scale.len()
            )));
        }
        if offset.len() != expected_width {
            return Err(ArancelError::schema(format!(
                "scaler expects {} columns, model input has {}",
                offset.len(),
                expected_width
            )));
        }
        if let Some(i) = scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(ArancelError::schema(format!(
                "scaler column {i} has invalid scale {}",
                scale[i]
            )));
        }
        if let Some(i) = offset.iter().position(|o| !o.is_finite()) {
            return Err(ArancelError::schema(format!("scaler column {i} has non-finite offset")));
        }
        Ok(())
    }

    pub fn transform(&self, row: &[f64]) -> ArancelResult<Vec<f64>> {
        self.check_row(row)?;
        Ok(match self {
            Scaler::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Scaler::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        })
    }

    pub fn inverse_transform(&self, row: &[f64]) -> ArancelResult<Vec<f64>> {
        self.check_row(row)?;
        Ok(match self {
            Scaler::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
            Scaler::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
        })
    }

    fn check_row(&self, row: &[f64]) -> ArancelResult<()> {
        if row.len() != self.width() {
            return Err(ArancelError::inference(format!(
                "row has {} values, scaler expects {}",
                row.len(),
                self.width()
            )));
        }
        Ok(())
    }
}
