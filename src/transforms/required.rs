//! Presence validation.

use crate::configuration::{Configuration, is_truthy};
use crate::error::{ConfabError, ConfabResult};
use crate::transform::Transform;

/// Fails if any listed field is missing or falsy; otherwise a pass-through.
#[derive(Debug, Clone, Default)]
pub struct Required {
    fields: Vec<String>,
}

impl Required {
    /// Fields whose value is absent or falsy, in the order they were listed.
    pub fn missing(&self, config: &Configuration) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| !config.get(field).is_some_and(is_truthy))
            .cloned()
            .collect()
    }
}

impl Transform for Required {
    fn apply(&self, config: Configuration) -> ConfabResult<Configuration> {
        let missing = self.missing(&config);
        if !missing.is_empty() {
            return Err(ConfabError::Validation { missing });
        }
        Ok(config)
    }

    fn name(&self) -> &str {
        "required"
    }
}

/// Require `fields` to be present and truthy. An empty list never fails.
pub fn required<I, S>(fields: I) -> Required
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Required {
        fields: fields.into_iter().map(Into::into).collect(),
    }
}
