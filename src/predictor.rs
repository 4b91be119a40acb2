use tracing::debug;

use crate::artifacts::ArtifactSet;
use crate::encoder::{encode, PredictionInput};
use crate::errors::{ArancelError, ArancelResult};

/// Scale, predict and unscale one encoded row. The result is rounded to two
/// decimal places.
pub fn predict(artifacts: &ArtifactSet, vector: &[f64]) -> ArancelResult<f64> {
    if vector.len() != artifacts.schema.len() {
        return Err(ArancelError::inference(format!(
            "encoded vector has {} values, schema has {}",
            vector.len(),
            artifacts.schema.len()
        )));
    }

    let scaled = artifacts.scaler_x.transform(vector)?;
    let y_scaled = artifacts.model.predict(&scaled)?;
    let y = artifacts
        .scaler_y
        .inverse_transform(&[y_scaled])?
        .first()
        .copied()
        .ok_or_else(|| ArancelError::inference("target scaler returned no value"))?;

    if !y.is_finite() {
        return Err(ArancelError::inference(format!("model produced non-finite value {y}")));
    }

    debug!(y_scaled, y, "prediction computed");
    Ok(round2(y))
}

/// Encode the human inputs and predict the arancel.
pub fn predict_arancel(artifacts: &ArtifactSet, input: &PredictionInput) -> ArancelResult<f64> {
    let vector = encode(&artifacts.schema, input);
    predict(artifacts, &vector)
}

/// Round to two decimals using the exact binary value, ties to even.
/// `2.675` is stored as `2.67499..` and becomes `2.67`.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_schema::FeatureSchema;
    use crate::regressor::LinearRegressor;
    use crate::scaler::Scaler;

    fn artifacts() -> ArtifactSet {
        let schema = FeatureSchema::from_names(
            ["Sector_A", "Sector_B", "Tipo PU/PR", "terreno"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        ArtifactSet::new(
            Box::new(LinearRegressor::new(0.0, vec![1.0, 2.0, 0.5, 1.0])),
            Scaler::Standard {
                mean: vec![0.0, 0.0, 0.0, 1.0],
                scale: vec![1.0, 1.0, 1.0, 2.0],
            },
            Scaler::Standard {
                mean: vec![100.0],
                scale: vec![10.0],
            },
            schema,
        )
        .unwrap()
    }

    fn input(sector: &str, terreno: f64) -> PredictionInput {
        PredictionInput {
            tipo_pu_pr: "PU".into(),
            estado: String::new(),
            tipo_predio: String::new(),
            sector: sector.into(),
            terreno,
        }
    }

    #[test]
    fn scales_predicts_and_unscales() {
        // scaled row [0, 1, 1, 0.5] -> 2 + 0.5 + 0.5 = 3 -> 3 * 10 + 100
        let y = predict_arancel(&artifacts(), &input("B", 2.0)).unwrap();
        assert_eq!(y, 130.0);
    }

    #[test]
    fn result_is_rounded_to_cents() {
        // scaled row [1, 0, 1, 0.123456] -> 1.623456 -> 116.23456
        let y = predict_arancel(&artifacts(), &input("A", 1.246912)).unwrap();
        assert_eq!(y, 116.23);
    }

    #[test]
    fn rejects_vector_of_wrong_width() {
        assert!(predict(&artifacts(), &[1.0, 0.0]).is_err());
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(-1.236), -1.24);
        assert_eq!(round2(5.0), 5.0);
    }

    #[test]
    fn round2_uses_exact_binary_value() {
        assert_eq!(round2(0.015), 0.01);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
    }
}
