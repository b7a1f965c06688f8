//! Confab: build a configuration from an ordered list of transforms.
//!
//! ```no_run
//! use confab::{Pipeline, transforms};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), confab::ConfabError> {
//! let config = Pipeline::new()
//!     .with(transforms::load_json(["./config.production.json", "./config.json"]))
//!     .with(transforms::load_environment([("PORT", "port")])?)
//!     .with(transforms::defaults(json!({"role": "api", "port": 3200}))?)
//!     .with(transforms::required(["role"]))
//!     .with(transforms::freeze())
//!     .run()?;
//!
//! println!("{:?}", config.get("role"));
//! # Ok(())
//! # }
//! ```

pub mod accessor;
pub mod cli;
pub mod configuration;
pub mod environment;
pub mod error;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod transform;
pub mod transforms;

pub use accessor::Config;
pub use configuration::{Configuration, is_truthy};
pub use error::{ConfabError, ConfabResult};
pub use pipeline::{Pipeline, confab};
pub use transform::{BoxedTransform, Transform, from_fn, named};
