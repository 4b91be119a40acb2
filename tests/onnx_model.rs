// tests/onnx_model.rs
//
// `tests/fixtures/onnx_linear` holds a MatMul + Add graph over four inputs:
// y = x . [1.0, 2.0, 0.5, 1.0] + 0.25, input [1, 4], output [1, 1].
use arancel_predictor::artifacts::ArtifactSet;
use arancel_predictor::config_loader::{ArancelConfig, ArtifactPaths};
use arancel_predictor::regressor::{OnnxRegressor, Regressor};
use arancel_predictor::{predict_arancel, PredictionInput};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/onnx_linear")
}

fn default_paths() -> ArtifactPaths {
    ArancelConfig {
        model_dir: fixture_dir(),
        ..ArancelConfig::default()
    }
    .artifact_paths()
}

fn input(sector: &str, tipo_pu_pr: &str, terreno: f64) -> PredictionInput {
    PredictionInput {
        tipo_pu_pr: tipo_pu_pr.to_string(),
        estado: String::new(),
        tipo_predio: String::new(),
        sector: sector.to_string(),
        terreno,
    }
}

#[test]
fn onnx_regressor_runs_graph() {
    let model = OnnxRegressor::load(&fixture_dir().join("model.onnx"), 4).expect("onnx loads");
    assert_eq!(model.kind(), "onnx");
    assert_eq!(model.input_width(), 4);

    assert_eq!(model.predict(&[0.0, 0.0, 0.0, 0.0]).unwrap(), 0.25);
    assert_eq!(model.predict(&[1.0, 1.0, 1.0, 1.0]).unwrap(), 4.75);
}

#[test]
fn onnx_regressor_rejects_row_of_wrong_width() {
    let model = OnnxRegressor::load(&fixture_dir().join("model.onnx"), 4).unwrap();
    assert!(model.predict(&[1.0, 2.0]).is_err());
}

#[test]
fn default_artifact_names_load_onnx_model() {
    let set = ArtifactSet::load(&default_paths()).expect("artifacts load");
    assert_eq!(set.model.kind(), "onnx");
    assert_eq!(set.schema.len(), 4);
    assert_eq!(set.options.sector, vec!["A", "B"]);
    assert!(!set.model_fingerprint.is_empty());
}

#[test]
fn onnx_prediction_through_scalers() {
    let set = ArtifactSet::load(&default_paths()).unwrap();

    // scaled row [0, 1, 1, 0.5] -> 2 + 0.5 + 0.5 + 0.25 = 3.25 -> 132.5
    assert_eq!(predict_arancel(&set, &input("B", "PU", 2.0)).unwrap(), 132.5);

    // scaled row [1, 0, 0, 1] -> 1 + 1 + 0.25 = 2.25 -> 122.5
    assert_eq!(predict_arancel(&set, &input("A", "PR", 3.0)).unwrap(), 122.5);
}

#[test]
fn onnx_model_must_match_feature_count() {
    let dir = TempDir::new().unwrap();
    let names = dir.path().join("feature_names.json");
    fs::write(&names, r#"["Sector_A", "Tipo PU/PR", "terreno"]"#).unwrap();
    let scaler_x = dir.path().join("scaler_X.json");
    fs::write(
        &scaler_x,
        r#"{"kind": "standard", "mean": [0, 0, 0], "scale": [1, 1, 1]}"#,
    )
    .unwrap();

    let paths = ArtifactPaths {
        feature_names: names,
        scaler_x,
        ..default_paths()
    };
    let err = ArtifactSet::load(&paths).unwrap_err();
    assert!(err.is_startup());
}
