//! Make the configuration read-only. Run this last.

use crate::configuration::Configuration;
use crate::error::ConfabResult;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, Default)]
pub struct Freeze;

impl Transform for Freeze {
    fn apply(&self, mut config: Configuration) -> ConfabResult<Configuration> {
        config.freeze();
        Ok(config)
    }

    fn name(&self) -> &str {
        "freeze"
    }
}

pub fn freeze() -> Freeze {
    Freeze
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfabError;
    use serde_json::json;

    #[test]
    fn test_freezes_the_result() {
        let incoming = Configuration::from_value(json!({"a": 4})).unwrap();
        let mut config = freeze().apply(incoming).unwrap();

        assert!(config.is_frozen());
        assert!(matches!(
            config.insert("a", json!("14")),
            Err(ConfabError::Frozen { .. })
        ));
        assert_eq!(config.get("a"), Some(&json!(4)));
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let config = freeze().apply(Configuration::new()).unwrap();
        let config = freeze().apply(config).unwrap();
        assert!(config.is_frozen());
    }
}
