//! Options controlling which rules run and with which limits.
//!
//! Limits are kept as their raw strings: a malformed limit must surface as a
//! 417 verdict at the point its rule is evaluated, not when options are loaded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransparencyCheck {
    #[default]
    Disabled,
    OnlyTransparent,
    NoTransparent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    // Prompt rules
    pub banned_words: String,
    pub char_count_limit: String,
    pub supported_languages: String,

    // Image rules
    pub url_encoding: bool,
    pub image_count_limit: String,
    pub total_size_limit: String,
    pub single_size_limit: String,
    pub long_edge_limit: String,
    pub short_edge_limit: String,
    pub aspect_ratio_limit: String,
    pub fixed_ratios: String,
    pub image_formats: String,
    pub transparency_check: TransparencyCheck,

    /// Turn an error verdict into `Err(ValidationError::Rejected)`
    pub trigger_system_error: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            banned_words: String::new(),
            char_count_limit: "0,0".to_string(),
            supported_languages: String::new(),
            url_encoding: true,
            image_count_limit: "0,0".to_string(),
            total_size_limit: "0,0".to_string(),
            single_size_limit: "0,0".to_string(),
            long_edge_limit: "0,0".to_string(),
            short_edge_limit: "0,0".to_string(),
            aspect_ratio_limit: "0,0".to_string(),
            fixed_ratios: "0:0".to_string(),
            image_formats: String::new(),
            transparency_check: TransparencyCheck::Disabled,
            trigger_system_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "char_count_limit: \"10,500\"\ntransparency_check: no_transparent\n";
        let options: ValidationOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(options.char_count_limit, "10,500");
        assert_eq!(options.transparency_check, TransparencyCheck::NoTransparent);
        assert!(options.url_encoding);
        assert_eq!(options.fixed_ratios, "0:0");
    }

    #[test]
    fn test_json_options() {
        let options: ValidationOptions =
            serde_json::from_str(r#"{"url_encoding": false, "image_formats": "jpg,png"}"#).unwrap();
        assert!(!options.url_encoding);
        assert_eq!(options.image_formats, "jpg,png");
        assert!(!options.trigger_system_error);
    }

    #[test]
    fn test_unknown_transparency_mode_is_rejected() {
        let result: Result<ValidationOptions, _> =
            serde_json::from_str(r#"{"transparency_check": "sometimes"}"#);
        assert!(result.is_err());
    }
}
