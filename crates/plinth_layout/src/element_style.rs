//! Element styling
//!
//! `ElementStyle` carries the paint-time properties of a composed element.
//! All properties are optional: an unset property is inherited from the
//! host's defaults, so two layers only differ in what they set.
//!
//! ```ignore
//! use plinth_layout::prelude::*;
//! use plinth_core::Position;
//!
//! let style = ElementStyle::new()
//!     .position(Position::Absolute)
//!     .top(Length::Px(10.0))
//!     .left(Length::Px(20.0))
//!     .rotate(45.0)
//!     .pointer_events(PointerEvents::None);
//! ```

use std::fmt;

use plinth_core::{Display, Geometry, Position};

/// A length value
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Length {
    #[default]
    Auto,
    Px(f32),
    Percent(f32),
}

impl Length {
    pub const FULL: Length = Length::Percent(100.0);
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Auto => f.write_str("auto"),
            Length::Px(v) => write!(f, "{v}px"),
            Length::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Pointer hit-testing behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerEvents {
    /// Normal hit testing
    #[default]
    Auto,
    /// Transparent to input
    None,
}

/// Visual style properties for an element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementStyle {
    pub position: Option<Position>,
    pub top: Option<Length>,
    pub left: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub z_index: Option<i32>,
    pub display: Option<Display>,
    /// Opacity (0.0 = transparent, 1.0 = opaque)
    pub opacity: Option<f32>,
    /// Rotation in degrees
    pub rotate: Option<f32>,
    pub pointer_events: PointerEvents,
    /// Verbatim animation iteration count; empty means inherited
    pub animation_iteration_count: Option<String>,
}

impl ElementStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn top(mut self, top: Length) -> Self {
        self.top = Some(top);
        self
    }

    pub fn left(mut self, left: Length) -> Self {
        self.left = Some(left);
        self
    }

    pub fn width(mut self, width: Length) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: Length) -> Self {
        self.height = Some(height);
        self
    }

    /// Set top/left/width/height in pixels
    pub fn geometry(self, geometry: Geometry) -> Self {
        self.top(Length::Px(geometry.top))
            .left(Length::Px(geometry.left))
            .width(Length::Px(geometry.width))
            .height(Length::Px(geometry.height))
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn pointer_events(mut self, pointer_events: PointerEvents) -> Self {
        self.pointer_events = pointer_events;
        self
    }

    pub fn animation_iteration_count(mut self, count: impl Into<String>) -> Self {
        self.animation_iteration_count = Some(count.into());
        self
    }

    /// Merge another style on top of this one
    ///
    /// Properties set in `other` win. Pointer events are disabled if either
    /// side disables them.
    pub fn merge(&self, other: &ElementStyle) -> ElementStyle {
        ElementStyle {
            position: other.position.or(self.position),
            top: other.top.or(self.top),
            left: other.left.or(self.left),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            z_index: other.z_index.or(self.z_index),
            display: other.display.or(self.display),
            opacity: other.opacity.or(self.opacity),
            rotate: other.rotate.or(self.rotate),
            pointer_events: if other.pointer_events == PointerEvents::None {
                PointerEvents::None
            } else {
                self.pointer_events
            },
            animation_iteration_count: other
                .animation_iteration_count
                .clone()
                .or_else(|| self.animation_iteration_count.clone()),
        }
    }
}
