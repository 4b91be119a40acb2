//! One request/response cycle of the arancel form, independent of HTTP.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::artifacts::ArtifactSet;
use crate::config_loader::FormConfig;
use crate::encoder::PredictionInput;
use crate::errors::{ArancelError, ArancelResult};
use crate::feature_schema::CategoricalGroup;
use crate::predictor::predict_arancel;

pub const INVALID_TERRENO_MESSAGE: &str = "El valor de terreno debe ser numerico.";
pub const PREDICTION_FAILED_MESSAGE: &str = "No fue posible calcular el arancel.";

/// Values echoed back into the form. `terreno` stays a raw string so that an
/// invalid entry is shown exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    pub tipo_pu_pr: String,
    pub estado: String,
    pub tipo_predio: String,
    pub sector: String,
    pub terreno: String,
}

impl FormValues {
    /// Initial values: configured PU/PR and terreno, first option of each
    /// categorical dropdown (or empty when the dropdown is empty).
    pub fn defaults(artifacts: &ArtifactSet, form: &FormConfig) -> Self {
        let options = &artifacts.options;
        Self {
            tipo_pu_pr: form.tipo_pu_pr.clone(),
            estado: options.first_or_empty(CategoricalGroup::Estado),
            tipo_predio: options.first_or_empty(CategoricalGroup::TipoPredio),
            sector: options.first_or_empty(CategoricalGroup::Sector),
            terreno: form.terreno.clone(),
        }
    }

    /// Overlay submitted fields; absent fields keep the prior value.
    pub fn merge(&self, submitted: &SubmittedFields) -> Self {
        let pick = |field: &Option<String>, prior: &String| field.clone().unwrap_or_else(|| prior.clone());
        Self {
            tipo_pu_pr: pick(&submitted.tipo_pu_pr, &self.tipo_pu_pr),
            estado: pick(&submitted.estado, &self.estado),
            tipo_predio: pick(&submitted.tipo_predio, &self.tipo_predio),
            sector: pick(&submitted.sector, &self.sector),
            terreno: pick(&submitted.terreno, &self.terreno),
        }
    }
}

/// Raw form fields as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmittedFields {
    pub tipo_pu_pr: Option<String>,
    pub estado: Option<String>,
    pub tipo_predio: Option<String>,
    pub sector: Option<String>,
    pub terreno: Option<String>,
}

/// Either a prediction or a user-facing error, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Prediction(f64),
    Error(String),
}

/// Everything the page needs after one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub outcome: Option<Outcome>,
}

impl FormState {
    /// Idle state: defaults and no outcome.
    pub fn idle(values: FormValues) -> Self {
        Self {
            values,
            outcome: None,
        }
    }

    pub fn prediction(&self) -> Option<f64> {
        match self.outcome {
            Some(Outcome::Prediction(p)) => Some(p),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Error(e)) => Some(e.as_str()),
            _ => None,
        }
    }
}

/// Parse a terreno entry. Surrounding whitespace is ignored, single
/// underscores between digits are accepted as separators (`1_000`), and NaN
/// and infinities are rejected.
pub fn parse_terreno(raw: &str) -> ArancelResult<f64> {
    strip_digit_separators(raw.trim())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| ArancelError::validation("terreno", INVALID_TERRENO_MESSAGE))
}

/// Drop `_` separators; `None` when one is not surrounded by digits.
fn strip_digit_separators(s: &str) -> Option<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, c) in chars.iter().enumerate() {
        if *c != '_' {
            out.push(*c);
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| chars.get(j));
        let after = chars.get(i + 1);
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(out)
}

/// Handle a submitted form: merge fields over `prior`, parse terreno, and
/// predict. Failures become a localized message; submitted values are kept.
pub fn handle_submission(
    artifacts: &ArtifactSet,
    prior: &FormValues,
    submitted: &SubmittedFields,
) -> FormState {
    let values = prior.merge(submitted);

    let terreno = match parse_terreno(&values.terreno) {
        Ok(t) => t,
        Err(_) => {
            debug!(terreno = %values.terreno, "rejected non-numeric terreno");
            return FormState {
                values,
                outcome: Some(Outcome::Error(INVALID_TERRENO_MESSAGE.to_string())),
            };
        }
    };

    let input = PredictionInput {
        tipo_pu_pr: values.tipo_pu_pr.clone(),
        estado: values.estado.clone(),
        tipo_predio: values.tipo_predio.clone(),
        sector: values.sector.clone(),
        terreno,
    };

    let outcome = match predict_arancel(artifacts, &input) {
        Ok(arancel) => Outcome::Prediction(arancel),
        Err(e) => {
            error!("prediction failed: {e}");
            Outcome::Error(PREDICTION_FAILED_MESSAGE.to_string())
        }
    };

    FormState {
        values,
        outcome: Some(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_schema::FeatureSchema;
    use crate::regressor::{LinearRegressor, Regressor};
    use crate::scaler::Scaler;

    const NAMES: [&str; 7] = [
        "Sector_A",
        "Sector_B",
        "Estado_X",
        "Estado_Y",
        "Tipo predio_Casa",
        "Tipo PU/PR",
        "terreno",
    ];

    fn build(model: Box<dyn Regressor>) -> ArtifactSet {
        let schema =
            FeatureSchema::from_names(NAMES.iter().map(|s| s.to_string()).collect()).unwrap();
        ArtifactSet::new(
            model,
            Scaler::Standard {
                mean: vec![0.0; 7],
                scale: vec![1.0; 7],
            },
            Scaler::Standard {
                mean: vec![0.0],
                scale: vec![1.0],
            },
            schema,
        )
        .unwrap()
    }

    fn artifacts() -> ArtifactSet {
        build(Box::new(LinearRegressor::new(
            0.1,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 1.0 / 3.0],
        )))
    }

    struct FailingModel;

    impl Regressor for FailingModel {
        fn predict(&self, _row: &[f64]) -> ArancelResult<f64> {
            Err(ArancelError::inference("boom"))
        }
        fn input_width(&self) -> usize {
            7
        }
        fn kind(&self) -> &'static str {
            "failing"
        }
    }

    fn submitted(terreno: &str) -> SubmittedFields {
        SubmittedFields {
            tipo_pu_pr: Some("PR".into()),
            estado: Some("Y".into()),
            tipo_predio: Some("Casa".into()),
            sector: Some("B".into()),
            terreno: Some(terreno.into()),
        }
    }

    #[test]
    fn defaults_use_first_options() {
        let a = artifacts();
        let values = FormValues::defaults(&a, &FormConfig::default());
        assert_eq!(values.tipo_pu_pr, "PU");
        assert_eq!(values.estado, "X");
        assert_eq!(values.tipo_predio, "Casa");
        assert_eq!(values.sector, "A");
        assert_eq!(values.terreno, "0.79");
    }

    #[test]
    fn non_numeric_terreno_keeps_values_and_reports_error() {
        let a = artifacts();
        let prior = FormValues::defaults(&a, &FormConfig::default());
        let state = handle_submission(&a, &prior, &submitted("abc"));

        assert_eq!(state.prediction(), None);
        assert_eq!(state.error(), Some(INVALID_TERRENO_MESSAGE));
        assert_eq!(state.values.tipo_pu_pr, "PR");
        assert_eq!(state.values.estado, "Y");
        assert_eq!(state.values.sector, "B");
        assert_eq!(state.values.terreno, "abc");
    }

    #[test]
    fn numeric_terreno_yields_rounded_prediction() {
        let a = artifacts();
        let prior = FormValues::defaults(&a, &FormConfig::default());
        let state = handle_submission(&a, &prior, &submitted("1.5"));

        // 0.1 + 2 (Sector_B) + 4 (Estado_Y) + 5 (Casa) + 0 (PR) + 0.5
        let p = state.prediction().expect("prediction");
        assert!(p.is_finite());
        assert_eq!(p, 11.6);
        assert_eq!((p * 100.0).round() / 100.0, p);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn missing_fields_fall_back_to_prior() {
        let a = artifacts();
        let prior = FormValues::defaults(&a, &FormConfig::default());
        let state = handle_submission(&a, &prior, &SubmittedFields::default());
        assert_eq!(state.values, prior);
        assert!(state.prediction().is_some());
    }

    #[test]
    fn rejects_non_finite_terreno() {
        assert!(parse_terreno("NaN").is_err());
        assert!(parse_terreno("inf").is_err());
        assert!(parse_terreno("").is_err());
        assert_eq!(parse_terreno(" 0.79 ").unwrap(), 0.79);
        assert_eq!(parse_terreno("1e2").unwrap(), 100.0);
    }

    #[test]
    fn terreno_accepts_digit_separators() {
        assert_eq!(parse_terreno("1_000").unwrap(), 1000.0);
        assert_eq!(parse_terreno("1_0.2_5").unwrap(), 10.25);
        assert_eq!(parse_terreno("1e1_0").unwrap(), 1e10);
        for bad in ["_1", "1_", "1__0", "1_.5", "1._5", "1_e2"] {
            assert!(parse_terreno(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn inference_failure_becomes_message() {
        let a = build(Box::new(FailingModel));
        let prior = FormValues::defaults(&a, &FormConfig::default());
        let state = handle_submission(&a, &prior, &submitted("1.0"));
        assert_eq!(state.error(), Some(PREDICTION_FAILED_MESSAGE));
        assert_eq!(state.values.terreno, "1.0");
    }
}
