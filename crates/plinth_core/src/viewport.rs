//! Viewport state and the resize signal
//!
//! The window size is ambient state shared by every block on a page. Blocks
//! that anchor to the viewport listen for resizes through [`ResizeSignal`];
//! each listener is a scoped guard removed when dropped.
//!
//! ```ignore
//! use plinth_core::viewport::ResizeSignal;
//!
//! let signal = ResizeSignal::new(375.0, 667.0);
//! let listener = signal.listen(|viewport| println!("now {}x{}", viewport.width, viewport.height));
//!
//! signal.resize(750.0, 1334.0);
//! drop(listener); // no further callbacks
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::settings::EditorSettings;

new_key_type! {
    /// Unique identifier for a resize listener
    pub struct ListenerId;
}

/// Current window size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Incremented on every size change
    pub epoch: u64,
}

/// Placement of the design canvas inside the viewport
///
/// A canvas-space point `(x, y)` is painted at
/// `(origin_x + x * scale, origin_y + y * scale)` in viewport space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasFrame {
    pub origin_x: f32,
    pub origin_y: f32,
    pub scale: f32,
}

impl CanvasFrame {
    pub const IDENTITY: CanvasFrame = CanvasFrame {
        origin_x: 0.0,
        origin_y: 0.0,
        scale: 1.0,
    };

    /// Frame of a canvas centered horizontally in the viewport
    ///
    /// Responsive canvases are scaled to the viewport width. Degenerate sizes
    /// yield the identity frame.
    pub fn compute(viewport: &Viewport, settings: &EditorSettings) -> Self {
        let design_width = settings.design_width;
        if !(design_width.is_finite() && design_width > 0.0 && viewport.width.is_finite()) {
            return Self::IDENTITY;
        }

        let scale = if settings.responsive {
            viewport.width / design_width
        } else {
            1.0
        };
        if !(scale.is_finite() && scale > 0.0) {
            return Self::IDENTITY;
        }

        Self {
            origin_x: (viewport.width - design_width * scale) / 2.0,
            origin_y: 0.0,
            scale,
        }
    }
}

impl Default for CanvasFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Callback invoked with the new viewport after a resize
pub type ResizeCallback = Rc<dyn Fn(&Viewport)>;

struct SignalInner {
    viewport: Cell<Viewport>,
    listeners: RefCell<SlotMap<ListenerId, ResizeCallback>>,
}

/// Source of viewport resize notifications
///
/// Cloning yields another handle to the same signal.
#[derive(Clone)]
pub struct ResizeSignal {
    inner: Rc<SignalInner>,
}

impl ResizeSignal {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                viewport: Cell::new(Viewport {
                    width,
                    height,
                    epoch: 0,
                }),
                listeners: RefCell::new(SlotMap::with_key()),
            }),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.viewport.get()
    }

    /// Check if two handles are the same signal
    pub fn ptr_eq(&self, other: &ResizeSignal) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of installed listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Install a listener, removed when the returned guard is dropped
    pub fn listen<F>(&self, callback: F) -> ResizeListener
    where
        F: Fn(&Viewport) + 'static,
    {
        let id = self.inner.listeners.borrow_mut().insert(Rc::new(callback));
        tracing::trace!("resize listener {:?} installed", id);
        ResizeListener {
            id,
            signal: Rc::downgrade(&self.inner),
        }
    }

    /// Apply a new window size and notify listeners
    ///
    /// Returns `false` without notifying when the size is unchanged.
    pub fn resize(&self, width: f32, height: f32) -> bool {
        let current = self.inner.viewport.get();
        if current.width == width && current.height == height {
            return false;
        }

        let viewport = Viewport {
            width,
            height,
            epoch: current.epoch + 1,
        };
        self.inner.viewport.set(viewport);

        // Snapshot so listeners may install or remove listeners while notified
        let listeners: Vec<(ListenerId, ResizeCallback)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(id, cb)| (id, Rc::clone(cb)))
            .collect();

        for (id, callback) in listeners {
            if !self.inner.listeners.borrow().contains_key(id) {
                continue;
            }
            callback(&viewport);
        }
        true
    }
}

impl fmt::Debug for ResizeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeSignal")
            .field("viewport", &self.viewport())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Scoped resize listener
#[must_use = "dropping a ResizeListener removes it"]
pub struct ResizeListener {
    id: ListenerId,
    signal: Weak<SignalInner>,
}

impl ResizeListener {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the listener. Safe to call more than once.
    pub fn remove(&self) {
        if let Some(signal) = self.signal.upgrade() {
            let removed = signal.listeners.borrow_mut().remove(self.id);
            if removed.is_some() {
                tracing::trace!("resize listener {:?} removed", self.id);
            }
        }
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_notified_on_resize() {
        let signal = ResizeSignal::new(375.0, 667.0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let out = Rc::clone(&seen);
        let _listener = signal.listen(move |vp| out.borrow_mut().push((vp.width, vp.epoch)));

        assert!(signal.resize(750.0, 667.0));
        assert!(signal.resize(1000.0, 800.0));
        assert_eq!(*seen.borrow(), vec![(750.0, 1), (1000.0, 2)]);
    }

    #[test]
    fn test_unchanged_size_does_not_notify() {
        let signal = ResizeSignal::new(375.0, 667.0);
        let calls = Rc::new(Cell::new(0));

        let count = Rc::clone(&calls);
        let _listener = signal.listen(move |_| count.set(count.get() + 1));

        assert!(!signal.resize(375.0, 667.0));
        assert_eq!(calls.get(), 0);
        assert_eq!(signal.viewport().epoch, 0);
    }

    #[test]
    fn test_drop_removes_listener() {
        let signal = ResizeSignal::new(100.0, 100.0);
        let calls = Rc::new(Cell::new(0));

        let count = Rc::clone(&calls);
        let listener = signal.listen(move |_| count.set(count.get() + 1));
        assert_eq!(signal.listener_count(), 1);

        listener.remove();
        listener.remove();
        drop(listener);
        assert_eq!(signal.listener_count(), 0);

        signal.resize(200.0, 100.0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_frame_responsive() {
        let settings = EditorSettings::default();
        let viewport = Viewport {
            width: 750.0,
            height: 1334.0,
            epoch: 1,
        };
        let frame = CanvasFrame::compute(&viewport, &settings);
        assert_eq!(frame.scale, 2.0);
        assert_eq!(frame.origin_x, 0.0);
        assert_eq!(frame.origin_y, 0.0);
    }

    #[test]
    fn test_frame_centered_when_not_responsive() {
        let settings = EditorSettings {
            responsive: false,
            ..Default::default()
        };
        let viewport = Viewport {
            width: 775.0,
            height: 600.0,
            epoch: 0,
        };
        let frame = CanvasFrame::compute(&viewport, &settings);
        assert_eq!(frame.scale, 1.0);
        assert_eq!(frame.origin_x, 200.0);
    }

    #[test]
    fn test_degenerate_frame_is_identity() {
        let settings = EditorSettings {
            design_width: 0.0,
            ..Default::default()
        };
        let viewport = Viewport {
            width: 800.0,
            height: 600.0,
            epoch: 0,
        };
        assert_eq!(CanvasFrame::compute(&viewport, &settings), CanvasFrame::IDENTITY);

        let zero = Viewport {
            width: 0.0,
            height: 0.0,
            epoch: 0,
        };
        assert_eq!(
            CanvasFrame::compute(&zero, &EditorSettings::default()),
            CanvasFrame::IDENTITY
        );
    }
}
