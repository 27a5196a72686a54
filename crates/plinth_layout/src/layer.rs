//! Content layer selection for edit-mode blocks

use plinth_core::{Display, Position};

/// Structural layout of the layer wrapping a block's content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentLayer {
    /// Relative, absolute or fixed block: animated layer over the drag surface
    Absolute,
    /// Static block-level: full-size layer that ignores the pointer
    StaticBlock,
    /// Static inline: inline wrapper that ignores the pointer
    StaticInline,
}

impl ContentLayer {
    pub fn select(position: Position, display: Display) -> Self {
        match (position, display) {
            (Position::Static, Display::Inline) => ContentLayer::StaticInline,
            (Position::Static, _) => ContentLayer::StaticBlock,
            _ => ContentLayer::Absolute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITIONS: [Position; 4] = [
        Position::Static,
        Position::Relative,
        Position::Absolute,
        Position::Fixed,
    ];
    const DISPLAYS: [Display; 5] = [
        Display::Block,
        Display::Inline,
        Display::InlineBlock,
        Display::Flex,
        Display::None,
    ];

    #[test]
    fn test_static_inline() {
        assert_eq!(
            ContentLayer::select(Position::Static, Display::Inline),
            ContentLayer::StaticInline
        );
    }

    #[test]
    fn test_exactly_one_layer_per_combination() {
        for position in POSITIONS {
            for display in DISPLAYS {
                let layer = ContentLayer::select(position, display);
                let expected = if !position.is_static() {
                    ContentLayer::Absolute
                } else if display.is_inline() {
                    ContentLayer::StaticInline
                } else {
                    ContentLayer::StaticBlock
                };
                assert_eq!(layer, expected, "{position} / {display}");
            }
        }
    }
}
