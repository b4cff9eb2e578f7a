//! Editor configuration
//!
//! Every field has a default, so a RON file only needs to name the values
//! it overrides:
//!
//! ```
//! use tedit_core::OlcConfig;
//!
//! let config = OlcConfig::from_ron_str("(max_command_length: 4096)").unwrap();
//! assert_eq!(config.max_command_length, 4096);
//! assert_eq!(config.new_trigger_name, "New Trigger");
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Configuration for trigger editing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OlcConfig {
    /// Name given to prototypes created by the store
    pub new_trigger_name: String,
    /// Name given to blank drafts
    pub draft_name: String,
    /// Numeric argument of a blank draft ("no limit")
    pub draft_narg: i32,
    /// Script compiled in place of an empty command list
    pub placeholder_script: String,
    /// Largest command text the capture facility may produce
    pub max_command_length: usize,
}

impl OlcConfig {
    /// Parse a configuration from RON, defaulting missing fields
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }
}

impl Default for OlcConfig {
    fn default() -> Self {
        Self {
            new_trigger_name: "New Trigger".to_string(),
            draft_name: "new trigger".to_string(),
            draft_narg: 100,
            placeholder_script: "%echo% This trigger commandlist is not complete!".to_string(),
            max_command_length: 16384,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OlcConfig::default();
        assert_eq!(config.draft_narg, 100);
        assert!(config.placeholder_script.starts_with("%echo%"));
    }

    #[test]
    fn test_partial_ron_overrides() {
        let config = OlcConfig::from_ron_str(r#"(draft_name: "untitled", draft_narg: 50)"#).unwrap();
        assert_eq!(config.draft_name, "untitled");
        assert_eq!(config.draft_narg, 50);
        assert_eq!(config.max_command_length, 16384);
    }

    #[test]
    fn test_bad_ron_is_config_error() {
        assert!(matches!(
            OlcConfig::from_ron_str("(draft_narg: \"lots\")"),
            Err(crate::Error::Config(_))
        ));
    }
}
