//! Dropdown option sets derived from the feature schema.

use crate::feature_schema::{CategoricalGroup, FeatureSchema};
use serde::Serialize;
use std::collections::BTreeSet;

/// Choices offered for the PU/PR selector. Not derived from the schema.
pub const TIPO_PU_PR_OPTIONS: [&str; 2] = ["PU", "PR"];

/// Distinct trimmed suffixes of `group`, sorted lexicographically.
pub fn extract_options(schema: &FeatureSchema, group: CategoricalGroup) -> Vec<String> {
    schema
        .group_values(group)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Option lists computed once at startup and reused for every render.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DropdownOptions {
    pub tipo_pu_pr: Vec<String>,
    pub estado: Vec<String>,
    pub tipo_predio: Vec<String>,
    pub sector: Vec<String>,
}

impl DropdownOptions {
    pub fn from_schema(schema: &FeatureSchema) -> Self {
        Self {
            tipo_pu_pr: TIPO_PU_PR_OPTIONS.iter().map(|s| s.to_string()).collect(),
            estado: extract_options(schema, CategoricalGroup::Estado),
            tipo_predio: extract_options(schema, CategoricalGroup::TipoPredio),
            sector: extract_options(schema, CategoricalGroup::Sector),
        }
    }

    pub fn for_group(&self, group: CategoricalGroup) -> &[String] {
        match group {
            CategoricalGroup::Sector => &self.sector,
            CategoricalGroup::Estado => &self.estado,
            CategoricalGroup::TipoPredio => &self.tipo_predio,
        }
    }

    /// First option of a group, or an empty string when the group is empty.
    pub fn first_or_empty(&self, group: CategoricalGroup) -> String {
        self.for_group(group).first().cloned().unwrap_or_default()
    }
}
