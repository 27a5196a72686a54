//! Editor settings
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! design_width = 375.0
//! design_height = 667.0
//! responsive = true
//! focus_class = "yh-block-focus"
//! modal_mask_name = "modalMask"
//! animation_base_class = "animate__animated"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Canvas and composition settings shared by every block
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Width of the design canvas
    pub design_width: f32,
    /// Height of the design canvas
    pub design_height: f32,
    /// Scale the canvas to the window width in preview
    pub responsive: bool,
    /// Class applied to a focused, non-static block in the editor
    pub focus_class: String,
    /// Reserved block name that never opens a context menu
    pub modal_mask_name: String,
    /// Base class of the animation library
    pub animation_base_class: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            design_width: 375.0,
            design_height: 667.0,
            responsive: true,
            focus_class: "yh-block-focus".to_string(),
            modal_mask_name: "modalMask".to_string(),
            animation_base_class: "animate__animated".to_string(),
        }
    }
}

impl EditorSettings {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_toml_str(&source)?;
        tracing::debug!("loaded editor settings from {}", path.as_ref().display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlinthError;

    #[test]
    fn test_empty_toml_is_default() {
        let settings = EditorSettings::from_toml_str("").unwrap();
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let settings = EditorSettings::from_toml_str(
            r#"
            design_width = 750.0
            responsive = false
            modal_mask_name = "mask"
            "#,
        )
        .unwrap();

        assert_eq!(settings.design_width, 750.0);
        assert!(!settings.responsive);
        assert_eq!(settings.modal_mask_name, "mask");
        assert_eq!(settings.design_height, 667.0);
        assert_eq!(settings.animation_base_class, "animate__animated");
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let err = EditorSettings::from_toml_str("design_width = \"wide\"").unwrap_err();
        assert!(matches!(err, PlinthError::SettingsParse(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = EditorSettings::load("/nonexistent/plinth.toml").unwrap_err();
        assert!(matches!(err, PlinthError::Io(_)));
    }
}
