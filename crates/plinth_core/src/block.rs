//! Block records
//!
//! A [`Block`] is one positioned item on a page canvas. Blocks are owned by
//! the page document; the composition engine only reads them. They are stored
//! as JSON with camelCase keys:
//!
//! ```ignore
//! use plinth_core::block::Block;
//!
//! let block = Block::from_json(r#"{
//!     "id": "b1", "name": "button",
//!     "top": 10, "left": 20, "width": 100, "height": 40,
//!     "position": "absolute", "display": "block",
//!     "rotate": { "value": 15 },
//!     "animate": { "animate": "animate__bounce", "animationIterationCount": "infinite" }
//! }"#)?;
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlinthError, Result};

/// Top/left/width/height of a block, in canvas units
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Geometry {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Equality under which a NaN component matches a NaN component
    pub fn same_as(&self, other: &Geometry) -> bool {
        same_f32(self.top, other.top)
            && same_f32(self.left, other.left)
            && same_f32(self.width, other.width)
            && same_f32(self.height, other.height)
    }
}

fn same_f32(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Positioning mode of a block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Laid out in document flow
    Static,
    Relative,
    #[default]
    Absolute,
    Fixed,
}

impl Position {
    pub fn is_static(self) -> bool {
        self == Position::Static
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Static => "static",
            Position::Relative => "relative",
            Position::Absolute => "absolute",
            Position::Fixed => "fixed",
        }
    }
}

impl FromStr for Position {
    type Err = PlinthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "static" => Ok(Position::Static),
            "relative" => Ok(Position::Relative),
            "absolute" => Ok(Position::Absolute),
            "fixed" => Ok(Position::Fixed),
            other => Err(PlinthError::UnknownPosition(other.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display mode token of a block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    None,
}

impl Display {
    pub fn is_inline(self) -> bool {
        self == Display::Inline
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::Inline => "inline",
            Display::InlineBlock => "inline-block",
            Display::Flex => "flex",
            Display::None => "none",
        }
    }
}

impl FromStr for Display {
    type Err = PlinthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "block" => Ok(Display::Block),
            "inline" => Ok(Display::Inline),
            "inline-block" => Ok(Display::InlineBlock),
            "flex" => Ok(Display::Flex),
            "none" => Ok(Display::None),
            other => Err(PlinthError::UnknownDisplay(other.to_string())),
        }
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation of a block in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rotation {
    pub value: f32,
    /// Whether the rotate handle may change the value
    pub can_rotate: bool,
}

impl Rotation {
    pub fn degrees(value: f32) -> Self {
        Self {
            value,
            can_rotate: true,
        }
    }

    /// Rotation angle, with non-finite values read as zero
    pub fn value_or_zero(&self) -> f32 {
        if self.value.is_finite() {
            self.value
        } else {
            0.0
        }
    }
}

/// Iteration count of an animation, kept verbatim
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IterationCount {
    Count(f64),
    Keyword(String),
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationCount::Count(n) => write!(f, "{n}"),
            IterationCount::Keyword(k) => f.write_str(k),
        }
    }
}

/// Animation settings of a block
///
/// Every key is optional. A record with no keys at all means the block is
/// not animated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Animation name token, e.g. `animate__bounce`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(
        rename = "animationIterationCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub iteration_count: Option<IterationCount>,
}

impl AnimationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.animate.is_none()
            && self.delay.is_none()
            && self.speed.is_none()
            && self.iteration_count.is_none()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.animate = Some(name.into());
        self
    }

    pub fn delay(mut self, delay: impl Into<String>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn speed(mut self, speed: impl Into<String>) -> Self {
        self.speed = Some(speed.into());
        self
    }

    pub fn iterations(mut self, count: IterationCount) -> Self {
        self.iteration_count = Some(count);
        self
    }
}

fn default_true() -> bool {
    true
}

/// A positioned block on a page canvas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub id: String,
    /// Renderer registry key
    pub name: String,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub rotate: Rotation,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub can_see: bool,
    /// Selected in the editor
    #[serde(default)]
    pub focus: bool,
    /// Anchored to the viewport in preview
    #[serde(default)]
    pub fixed: bool,
    /// Dragging is handled by the overlay, content must not take pointer input
    #[serde(default)]
    pub can_drag: bool,
    #[serde(default)]
    pub animate: AnimationSettings,
    /// Renderer-specific properties
    #[serde(default)]
    pub props: serde_json::Map<String, serde_json::Value>,
}

impl Block {
    /// Whether two records describe the same block
    ///
    /// Like `==`, except that NaN coordinates and rotation match themselves.
    pub fn same_as(&self, other: &Block) -> bool {
        self.geometry().same_as(&other.geometry())
            && same_f32(self.rotate.value, other.rotate.value)
            && self.rotate.can_rotate == other.rotate.can_rotate
            && self.id == other.id
            && self.name == other.name
            && self.position == other.position
            && self.display == other.display
            && self.z_index == other.z_index
            && self.can_see == other.can_see
            && self.focus == other.focus
            && self.fixed == other.fixed
            && self.can_drag == other.can_drag
            && self.animate == other.animate
            && self.props == other.props
    }

    /// Create an absolutely positioned block at the origin
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            top: 0.0,
            left: 0.0,
            width: 0.0,
            height: 0.0,
            rotate: Rotation::default(),
            position: Position::default(),
            display: Display::default(),
            z_index: 0,
            can_see: true,
            focus: false,
            fixed: false,
            can_drag: false,
            animate: AnimationSettings::default(),
            props: serde_json::Map::new(),
        }
    }

    /// Parse a block from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.top, self.left, self.width, self.height)
    }

    /// Copy of this block with its geometry replaced
    pub fn with_geometry(&self, geometry: Geometry) -> Self {
        Self {
            top: geometry.top,
            left: geometry.left,
            width: geometry.width,
            height: geometry.height,
            ..self.clone()
        }
    }

    // =========================================================================
    // Builder helpers
    // =========================================================================

    pub fn at(mut self, top: f32, left: f32) -> Self {
        self.top = top;
        self.left = left;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotate = Rotation::degrees(degrees);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn focused(mut self, focus: bool) -> Self {
        self.focus = focus;
        self
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn draggable(mut self, can_drag: bool) -> Self {
        self.can_drag = can_drag;
        self
    }

    pub fn animate(mut self, animate: AnimationSettings) -> Self {
        self.animate = animate;
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_as_tolerates_nan() {
        let block = Block::new("b", "text").at(f32::NAN, 4.0).rotated(f32::NAN);

        assert!(block != block.clone());
        assert!(block.same_as(&block.clone()));
        assert!(!block.same_as(&block.clone().at(1.0, 4.0)));
        assert!(!block.same_as(&block.clone().z_index(2)));
        assert!(Geometry::new(f32::NAN, 0.0, 1.0, 1.0)
            .same_as(&Geometry::new(f32::NAN, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_block_from_json() {
        let block = Block::from_json(
            r#"{
                "id": "b1",
                "name": "button",
                "top": 10, "left": 20, "width": 100, "height": 40,
                "position": "static",
                "display": "inline",
                "zIndex": 3,
                "canDrag": true,
                "rotate": { "value": 15, "canRotate": true },
                "animate": { "animate": "animate__bounce", "animationIterationCount": "infinite" },
                "props": { "text": "hello" }
            }"#,
        )
        .unwrap();

        assert_eq!(block.name, "button");
        assert_eq!(block.geometry(), Geometry::new(10.0, 20.0, 100.0, 40.0));
        assert_eq!(block.position, Position::Static);
        assert!(block.display.is_inline());
        assert_eq!(block.z_index, 3);
        assert!(block.can_drag);
        assert!(block.can_see);
        assert_eq!(block.rotate.value, 15.0);
        assert_eq!(
            block.animate.iteration_count,
            Some(IterationCount::Keyword("infinite".into()))
        );
        assert_eq!(block.props["text"], "hello");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let block = Block::from_json(r#"{ "name": "text" }"#).unwrap();

        assert_eq!(block.rotate.value_or_zero(), 0.0);
        assert_eq!(block.position, Position::Absolute);
        assert_eq!(block.display, Display::Block);
        assert!(block.animate.is_empty());
    }

    #[test]
    fn test_malformed_block_is_an_error() {
        let err = Block::from_json(r#"{ "name": 5 }"#).unwrap_err();
        assert!(matches!(err, PlinthError::BlockParse(_)));
    }

    #[test]
    fn test_non_finite_rotation_reads_as_zero() {
        let rotation = Rotation::degrees(f32::NAN);
        assert_eq!(rotation.value_or_zero(), 0.0);
        assert_eq!(Rotation::degrees(30.0).value_or_zero(), 30.0);
    }

    #[test]
    fn test_with_geometry_keeps_other_fields() {
        let block = Block::new("b", "image")
            .at(1.0, 2.0)
            .size(3.0, 4.0)
            .z_index(9)
            .fixed(true);
        let moved = block.with_geometry(Geometry::new(10.0, 20.0, 30.0, 40.0));

        assert_eq!(moved.geometry(), Geometry::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(moved.z_index, 9);
        assert!(moved.fixed);
        assert_eq!(block.geometry(), Geometry::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_tokens_parse() {
        assert_eq!("fixed".parse::<Position>().unwrap(), Position::Fixed);
        assert_eq!(
            "inline-block".parse::<Display>().unwrap(),
            Display::InlineBlock
        );
        assert!(matches!(
            "sticky".parse::<Position>(),
            Err(PlinthError::UnknownPosition(_))
        ));
        assert_eq!(IterationCount::Count(3.0).to_string(), "3");
        assert_eq!(IterationCount::Count(2.5).to_string(), "2.5");
    }
}
