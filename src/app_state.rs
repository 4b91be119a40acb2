use std::sync::Arc;

use crate::artifacts::ArtifactSet;
use crate::config_loader::FormConfig;
use crate::form_controller::FormValues;

/// Shared, read-only state handed to every request handler.
pub struct AppState {
    pub artifacts: Arc<ArtifactSet>,
    pub form: FormConfig,
}

impl AppState {
    pub fn new(artifacts: Arc<ArtifactSet>, form: FormConfig) -> Self {
        Self { artifacts, form }
    }

    /// Fresh form values for a request that has submitted nothing yet.
    pub fn default_values(&self) -> FormValues {
        FormValues::defaults(&self.artifacts, &self.form)
    }
}
