//! Animation descriptors
//!
//! Block animations are played by a CSS-class animation library. A block's
//! settings become a class string (library base token, animation name, delay
//! and speed tokens) plus an iteration count style.

use plinth_core::AnimationSettings;

use crate::element_style::ElementStyle;

/// Class string and iteration count derived from animation settings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationDescriptor {
    pub class_name: String,
    /// Verbatim iteration count, empty when not set
    pub iteration_count: String,
}

impl AnimationDescriptor {
    /// Style carrying the iteration count
    pub fn style(&self) -> ElementStyle {
        ElementStyle::new().animation_iteration_count(self.iteration_count.clone())
    }

    pub fn is_inert(&self) -> bool {
        self.class_name.is_empty()
    }
}

/// Resolve a block's animation settings
///
/// Empty settings produce an inert descriptor. Missing fields are skipped.
pub fn resolve(settings: &AnimationSettings, base_class: &str) -> AnimationDescriptor {
    if settings.is_empty() {
        return AnimationDescriptor::default();
    }

    let tokens = [
        Some(base_class),
        settings.animate.as_deref(),
        settings.delay.as_deref(),
        settings.speed.as_deref(),
    ];
    let class_name = tokens
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    AnimationDescriptor {
        class_name,
        iteration_count: settings
            .iteration_count
            .as_ref()
            .map(|count| count.to_string())
            .unwrap_or_default(),
    }
}
