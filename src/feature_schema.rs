//! Typed feature schema.
//!
//! The model artifact ships an ordered list of column names. Each name is
//! classified exactly once at load time so that encoding a request never
//! parses strings again.

use crate::errors::{ArancelError, ArancelResult};
use serde::Serialize;

/// Name of the binary PU/PR indicator column.
pub const INDICATOR_FEATURE: &str = "Tipo PU/PR";

/// Value of `tipo_pu_pr` that switches the indicator on.
pub const INDICATOR_REFERENCE: &str = "PU";

/// One-hot encoded categorical dimensions, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalGroup {
    Sector,
    Estado,
    TipoPredio,
}

impl CategoricalGroup {
    pub const ALL: [CategoricalGroup; 3] = [
        CategoricalGroup::Sector,
        CategoricalGroup::Estado,
        CategoricalGroup::TipoPredio,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            CategoricalGroup::Sector => "Sector_",
            CategoricalGroup::Estado => "Estado_",
            CategoricalGroup::TipoPredio => "Tipo predio_",
        }
    }

    /// Trimmed suffix of `name` when it belongs to this group.
    pub fn suffix_of<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_prefix(self.prefix()).map(str::trim)
    }
}

/// Role of a single column in the model input vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSlot {
    Categorical {
        group: CategoricalGroup,
        value: String,
    },
    Indicator,
    Scalar,
}

impl FeatureSlot {
    /// Classify a column name. First match wins: the categorical groups in
    /// `CategoricalGroup::ALL` order, then the indicator, then scalar.
    pub fn classify(name: &str) -> Self {
        for group in CategoricalGroup::ALL {
            if let Some(value) = group.suffix_of(name) {
                return FeatureSlot::Categorical {
                    group,
                    value: value.to_string(),
                };
            }
        }

        if name == INDICATOR_FEATURE {
            FeatureSlot::Indicator
        } else {
            FeatureSlot::Scalar
        }
    }
}

/// Ordered, classified feature columns. The order is the training order and
/// is never changed.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    slots: Vec<FeatureSlot>,
}

impl FeatureSchema {
    pub fn from_names(names: Vec<String>) -> ArancelResult<Self> {
        if names.is_empty() {
            return Err(ArancelError::schema("feature name list is empty"));
        }

        let slots: Vec<FeatureSlot> = names.iter().map(|n| FeatureSlot::classify(n)).collect();

        let scalars: Vec<&str> = names
            .iter()
            .zip(&slots)
            .filter(|(_, slot)| **slot == FeatureSlot::Scalar)
            .map(|(name, _)| name.as_str())
            .collect();

        match scalars.len() {
            0 => tracing::warn!("feature schema has no scalar slot; terreno will be ignored"),
            1 => {}
            _ => {
                return Err(ArancelError::schema(format!(
                    "expected at most one scalar feature, found {}: {}",
                    scalars.len(),
                    scalars.join(", ")
                )))
            }
        }

        Ok(Self { names, slots })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn slots(&self) -> &[FeatureSlot] {
        &self.slots
    }

    /// Column name of the scalar (terreno) slot, if the schema has one.
    pub fn scalar_feature(&self) -> Option<&str> {
        self.names
            .iter()
            .zip(&self.slots)
            .find(|(_, slot)| **slot == FeatureSlot::Scalar)
            .map(|(name, _)| name.as_str())
    }

    /// Categorical values of one group, in schema order (may repeat).
    pub fn group_values(&self, group: CategoricalGroup) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(move |slot| match slot {
            FeatureSlot::Categorical { group: g, value } if *g == group => Some(value.as_str()),
            _ => None,
        })
    }
}
