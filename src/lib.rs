//! Library root for the `arancel_predictor` crate

// Core error handling
pub mod api_errors;
pub mod errors;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

// Model artifacts
pub mod artifacts;
pub mod feature_schema;
pub mod regressor;
pub mod scaler;

// Encoding & inference
pub mod encoder;
pub mod options;
pub mod predictor;

// Web server interface
pub mod app_state;
pub mod form_controller;
pub mod render;
pub mod web;

pub use artifacts::ArtifactSet;
pub use encoder::{encode, PredictionInput};
pub use errors::{ArancelError, ArancelResult};
pub use feature_schema::{CategoricalGroup, FeatureSchema, FeatureSlot};
pub use form_controller::{handle_submission, FormState, FormValues, SubmittedFields};
pub use predictor::{predict, predict_arancel};
