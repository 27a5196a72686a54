//! Coordinate transform from canvas space to preview space
//!
//! Blocks are stored in design-time canvas coordinates. In preview, a block
//! anchored to the viewport (`fixed`) is painted relative to the window, so
//! its coordinates go through the current [`CanvasFrame`]. Everything else
//! keeps canvas coordinates.

use plinth_core::{Block, CanvasFrame, EditorSettings, Geometry, Viewport};

/// Map stored geometry to effective preview geometry
///
/// Rotation is accepted for reference only; it is applied at paint time and
/// never moves or resizes the box.
pub fn transform(
    geometry: Geometry,
    fixed: bool,
    _rotation_deg: f32,
    frame: &CanvasFrame,
) -> Geometry {
    if !fixed {
        return geometry;
    }

    let frame = if frame.origin_x.is_finite() && frame.origin_y.is_finite() && frame.scale.is_finite()
    {
        *frame
    } else {
        CanvasFrame::IDENTITY
    };

    Geometry {
        top: frame.origin_y + geometry.top * frame.scale,
        left: frame.origin_x + geometry.left * frame.scale,
        width: geometry.width * frame.scale,
        height: geometry.height * frame.scale,
    }
}

/// Inputs that determine a block's effective geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformKey {
    pub geometry: Geometry,
    pub fixed: bool,
    pub rotation_deg: f32,
    pub frame: CanvasFrame,
}

impl TransformKey {
    pub fn new(block: &Block, viewport: &Viewport, settings: &EditorSettings) -> Self {
        Self {
            geometry: block.geometry(),
            fixed: block.fixed,
            rotation_deg: block.rotate.value_or_zero(),
            frame: CanvasFrame::compute(viewport, settings),
        }
    }

    pub fn compute(&self) -> Geometry {
        transform(self.geometry, self.fixed, self.rotation_deg, &self.frame)
    }

    /// Like `==`, except that NaN geometry matches itself
    pub fn same_inputs(&self, other: &TransformKey) -> bool {
        self.geometry.same_as(&other.geometry)
            && self.fixed == other.fixed
            && self.rotation_deg == other.rotation_deg
            && self.frame == other.frame
    }
}

/// Effective geometry memoized on its inputs
#[derive(Clone, Debug)]
pub struct EffectiveGeometry {
    key: TransformKey,
    value: Geometry,
}

impl EffectiveGeometry {
    pub fn new(key: TransformKey) -> Self {
        Self {
            value: key.compute(),
            key,
        }
    }

    pub fn get(&self) -> Geometry {
        self.value
    }

    /// Recompute if `key` differs from the cached inputs
    ///
    /// Returns `true` when the effective geometry changed.
    pub fn refresh(&mut self, key: TransformKey) -> bool {
        if key.same_inputs(&self.key) {
            return false;
        }
        let value = key.compute();
        self.key = key;
        let changed = !value.same_as(&self.value);
        self.value = value;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(origin_x: f32, origin_y: f32, scale: f32) -> CanvasFrame {
        CanvasFrame {
            origin_x,
            origin_y,
            scale,
        }
    }

    #[test]
    fn test_identity_when_not_fixed() {
        let geometry = Geometry::new(10.0, 20.0, 40.0, 30.0);
        let scaled = frame(50.0, 5.0, 2.0);

        for rotation in [0.0, 45.0, -90.0, 359.0, f32::NAN, f32::INFINITY] {
            assert_eq!(transform(geometry, false, rotation, &scaled), geometry);
        }
    }

    #[test]
    fn test_fixed_maps_through_frame() {
        let geometry = Geometry::new(10.0, 20.0, 40.0, 30.0);
        let out = transform(geometry, true, 0.0, &frame(50.0, 5.0, 2.0));

        assert_eq!(out, Geometry::new(25.0, 90.0, 80.0, 60.0));
    }

    #[test]
    fn test_rotation_does_not_move_fixed_box() {
        let geometry = Geometry::new(10.0, 20.0, 40.0, 30.0);
        let f = frame(0.0, 0.0, 1.5);

        let a = transform(geometry, true, 0.0, &f);
        let b = transform(geometry, true, 45.0, &f);
        let c = transform(geometry, true, f32::NAN, &f);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(a.top.is_finite() && a.left.is_finite());
    }

    #[test]
    fn test_fixed_is_stable_across_calls() {
        let geometry = Geometry::new(1.0, 2.0, 3.0, 4.0);
        let f = frame(10.0, 0.0, 0.5);
        let first = transform(geometry, true, 30.0, &f);
        for _ in 0..10 {
            assert_eq!(transform(geometry, true, 30.0, &f), first);
        }
    }

    #[test]
    fn test_non_finite_frame_degrades_to_identity() {
        let geometry = Geometry::new(1.0, 2.0, 3.0, 4.0);
        let out = transform(geometry, true, 0.0, &frame(f32::NAN, 0.0, 1.0));
        assert_eq!(out, geometry);
    }

    #[test]
    fn test_effective_geometry_refresh() {
        let settings = EditorSettings::default();
        let block = Block::new("b", "text").at(10.0, 10.0).size(100.0, 50.0).fixed(true);
        let small = Viewport {
            width: 375.0,
            height: 667.0,
            epoch: 0,
        };
        let large = Viewport {
            width: 750.0,
            height: 667.0,
            epoch: 1,
        };

        let mut effective = EffectiveGeometry::new(TransformKey::new(&block, &small, &settings));
        assert_eq!(effective.get(), block.geometry());

        // Same inputs, nothing to do
        assert!(!effective.refresh(TransformKey::new(&block, &small, &settings)));

        assert!(effective.refresh(TransformKey::new(&block, &large, &settings)));
        assert_eq!(effective.get(), Geometry::new(20.0, 20.0, 200.0, 100.0));

        // Rotation changes the key but not the box
        let rotated = block.clone().rotated(30.0);
        assert!(!effective.refresh(TransformKey::new(&rotated, &large, &settings)));

        let unplaced = block.clone().at(f32::NAN, 10.0);
        let mut effective = EffectiveGeometry::new(TransformKey::new(&unplaced, &large, &settings));
        assert!(!effective.refresh(TransformKey::new(&unplaced, &large, &settings)));
    }
}
