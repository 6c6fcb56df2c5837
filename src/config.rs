//! Registry configuration.

use serde::{Deserialize, Serialize};

use crate::callback::{DEFAULT_ACCEPTED_ARGS, DEFAULT_PRIORITY};
use crate::error::HookResult;

/// Defaults applied when a tag declaration omits priority or argument count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HooksConfig {
    /// Priority of hooks declared without `::priority`.
    pub default_priority: i32,
    /// Forwarded argument count of actions and filters declared without `?args`.
    pub default_accepted_args: usize,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY,
            default_accepted_args: DEFAULT_ACCEPTED_ARGS,
        }
    }
}

impl HooksConfig {
    /// Parses a JSON document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `HookError::InvalidConfig` for malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> HookResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = HooksConfig::default();
        assert_eq!(cfg.default_priority, 10);
        assert_eq!(cfg.default_accepted_args, 1);
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = HooksConfig::from_json(r#"{"default_priority": 50}"#).unwrap();
        assert_eq!(cfg.default_priority, 50);
        assert_eq!(cfg.default_accepted_args, 1);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = HooksConfig::from_json(r#"{"priority": 5}"#).unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(HooksConfig::from_json("not json").is_err());
    }
}
