use crate::feature_schema::{CategoricalGroup, FeatureSchema, FeatureSlot, INDICATOR_REFERENCE};
use serde::{Deserialize, Serialize};

/// Human-facing inputs of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub tipo_pu_pr: String,
    pub estado: String,
    pub tipo_predio: String,
    pub sector: String,
    pub terreno: f64,
}

impl PredictionInput {
    pub fn selected(&self, group: CategoricalGroup) -> &str {
        match group {
            CategoricalGroup::Sector => &self.sector,
            CategoricalGroup::Estado => &self.estado,
            CategoricalGroup::TipoPredio => &self.tipo_predio,
        }
    }
}

/// Encode `input` into a vector aligned 1:1 with `schema`.
///
/// Categorical slots are one-hot: 1.0 when the slot value equals the
/// selected value, else 0.0. A selection matching no slot of its group
/// leaves the whole group at 0.0. The indicator is 1.0 only for "PU".
/// The scalar slot carries `terreno` unchanged.
pub fn encode(schema: &FeatureSchema, input: &PredictionInput) -> Vec<f64> {
    schema
        .slots()
        .iter()
        .map(|slot| match slot {
            FeatureSlot::Categorical { group, value } => one_hot(value == input.selected(*group)),
            FeatureSlot::Indicator => one_hot(input.tipo_pu_pr == INDICATOR_REFERENCE),
            FeatureSlot::Scalar => input.terreno,
        })
        .collect()
}

fn one_hot(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}
