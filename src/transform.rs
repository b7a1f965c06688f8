//! The unit of composition: a function from configuration to configuration.

use crate::configuration::Configuration;
use crate::error::ConfabResult;

/// A single pipeline stage.
///
/// Each stage receives the configuration built so far by value and returns
/// the configuration to hand to the next stage. Standard transforms hold
/// their parameters (paths, maps, defaults) as plain fields.
pub trait Transform {
    fn apply(&self, config: Configuration) -> ConfabResult<Configuration>;

    /// Short label used in pipeline diagnostics.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<T: Transform + ?Sized> Transform for &T {
    fn apply(&self, config: Configuration) -> ConfabResult<Configuration> {
        (**self).apply(config)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn apply(&self, config: Configuration) -> ConfabResult<Configuration> {
        (**self).apply(config)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Owned, type-erased transform as stored in a pipeline.
pub type BoxedTransform = Box<dyn Transform>;

/// Transform backed by a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnTransform<F> {
    name: &'static str,
    f: F,
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(Configuration) -> ConfabResult<Configuration>,
{
    fn apply(&self, config: Configuration) -> ConfabResult<Configuration> {
        (self.f)(config)
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl<F> std::fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTransform").field("name", &self.name).finish()
    }
}

/// Turn a closure into a transform for ad-hoc stages.
pub fn from_fn<F>(f: F) -> FnTransform<F>
where
    F: Fn(Configuration) -> ConfabResult<Configuration>,
{
    named("custom", f)
}

/// Like [`from_fn`], with a label shown in diagnostics.
pub fn named<F>(name: &'static str, f: F) -> FnTransform<F>
where
    F: Fn(Configuration) -> ConfabResult<Configuration>,
{
    FnTransform { name, f }
}
