//! Pipeline runner.
//!
//! Reduces an ordered list of transforms over an empty configuration, left to
//! right. The first error aborts the run; later transforms never execute.

use crate::configuration::Configuration;
use crate::error::ConfabResult;
use crate::transform::{BoxedTransform, Transform};
use tracing::debug;

/// Run `transforms` in order, starting from an empty configuration.
///
/// An empty list yields an empty configuration.
///
/// # Example
/// ```
/// use confab::{confab, transforms, BoxedTransform};
/// use serde_json::json;
///
/// let pipeline: Vec<BoxedTransform> = vec![
///     Box::new(transforms::assign([json!({"role": "api"})]).unwrap()),
///     Box::new(transforms::defaults(json!({"port": 3200})).unwrap()),
/// ];
/// let config = confab(pipeline).unwrap();
/// assert_eq!(config.get("role"), Some(&json!("api")));
/// assert_eq!(config.get("port"), Some(&json!(3200)));
/// ```
pub fn confab<I, T>(transforms: I) -> ConfabResult<Configuration>
where
    I: IntoIterator<Item = T>,
    T: Transform,
{
    let mut config = Configuration::new();
    let mut applied = 0usize;
    for transform in transforms {
        debug!(transform = transform.name(), "applying transform");
        config = transform.apply(config)?;
        applied += 1;
    }
    debug!(applied, keys = config.len(), "pipeline complete");
    Ok(config)
}

/// Builder-style pipeline, equivalent to calling [`confab`] with the
/// accumulated transforms.
#[derive(Default)]
pub struct Pipeline {
    transforms: Vec<BoxedTransform>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform.
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Append a transform in place.
    pub fn push(&mut self, transform: impl Transform + 'static) {
        self.transforms.push(Box::new(transform));
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Consume the pipeline and build the configuration.
    pub fn run(self) -> ConfabResult<Configuration> {
        confab(self.transforms)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.transforms.iter().map(|t| t.name()).collect();
        f.debug_struct("Pipeline").field("transforms", &names).finish()
    }
}
