//! Data handed to every page template.

use serde::Serialize;

use crate::models::Snippet;

/// Fields available to templates. Unused fields stay at their defaults.
#[derive(Debug, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub form: Option<tera::Value>,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
}

impl TemplateData {
    /// Attach a form (values plus validation errors) for re-rendering.
    pub fn with_form<F: Serialize>(mut self, form: &F) -> Result<Self, super::TemplateError> {
        let value = tera::to_value(form).map_err(|e| super::TemplateError::Context(e.to_string()))?;
        self.form = Some(value);
        Ok(self)
    }
}
