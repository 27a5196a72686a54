//! Event handler storage for composed elements
//!
//! Handlers are attached to elements while composing and dispatched by the
//! host's input layer.
//!
//! # Example
//!
//! ```ignore
//! use plinth_layout::prelude::*;
//!
//! let mut handlers = EventHandlers::new();
//! handlers.on_mouse_down(|e| println!("pressed at {}, {}", e.mouse_x, e.mouse_y));
//! handlers.on_context_menu(|_| println!("menu"));
//!
//! let container = div().handlers(handlers);
//! ```

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Event type identifier
pub type EventType = u32;

/// Event types routed to composed elements
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    /// Secondary-button press that asks for a context menu
    pub const CONTEXT_MENU: EventType = 4;
    pub const DRAG: EventType = 5;
    pub const DRAG_END: EventType = 6;
}

/// Mouse button identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// Callback for handling events
///
/// Uses Rc since UI is single-threaded.
pub type EventCallback = Rc<dyn Fn(&EventContext)>;

/// Context passed to event handlers
#[derive(Clone, Debug)]
pub struct EventContext {
    /// The type of event that occurred
    pub event_type: EventType,
    /// Pointer position in viewport space
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Button involved, for pointer down/up and context menu events
    pub button: Option<MouseButton>,
    /// Offset from drag start, for DRAG/DRAG_END events
    pub drag_delta_x: f32,
    pub drag_delta_y: f32,
}

impl EventContext {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            mouse_x: 0.0,
            mouse_y: 0.0,
            button: None,
            drag_delta_x: 0.0,
            drag_delta_y: 0.0,
        }
    }

    /// A right-click context menu request at a position
    pub fn context_menu(x: f32, y: f32) -> Self {
        Self::new(event_types::CONTEXT_MENU)
            .with_mouse_pos(x, y)
            .with_button(MouseButton::Right)
    }

    pub fn with_mouse_pos(mut self, x: f32, y: f32) -> Self {
        self.mouse_x = x;
        self.mouse_y = y;
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_drag_delta(mut self, dx: f32, dy: f32) -> Self {
        self.drag_delta_x = dx;
        self.drag_delta_y = dy;
        self
    }
}

/// Storage for event handlers on an element
#[derive(Default, Clone)]
pub struct EventHandlers {
    handlers: FxHashMap<EventType, SmallVec<[EventCallback; 2]>>,
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("event_types", &self.event_types_sorted())
            .finish()
    }
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn has_handler(&self, event_type: EventType) -> bool {
        self.handlers.contains_key(&event_type)
    }

    /// Register a handler for an event type
    pub fn on<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.handlers
            .entry(event_type)
            .or_default()
            .push(Rc::new(handler));
    }

    pub fn get(&self, event_type: EventType) -> Option<&[EventCallback]> {
        self.handlers.get(&event_type).map(|v| v.as_slice())
    }

    /// Registered event types in ascending order
    pub fn event_types_sorted(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = self.handlers.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Dispatch an event to all registered handlers for that type
    pub fn dispatch(&self, ctx: &EventContext) {
        if let Some(handlers) = self.handlers.get(&ctx.event_type) {
            for handler in handlers {
                handler(ctx);
            }
        }
    }

    /// Merge another set of handlers into this one
    pub fn merge(&mut self, other: EventHandlers) {
        for (event_type, handlers) in other.handlers {
            self.handlers
                .entry(event_type)
                .or_default()
                .extend(handlers);
        }
    }

    // =========================================================================
    // Convenience registration methods
    // =========================================================================

    pub fn on_mouse_down<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::POINTER_DOWN, handler);
    }

    pub fn on_mouse_up<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::POINTER_UP, handler);
    }

    pub fn on_mouse_move<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::POINTER_MOVE, handler);
    }

    /// Register a context menu handler (secondary click)
    pub fn on_context_menu<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::CONTEXT_MENU, handler);
    }

    /// Register a drag handler (pointer down + move)
    ///
    /// Use `EventContext::drag_delta_x/y` to get the offset from the start.
    pub fn on_drag<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::DRAG, handler);
    }

    pub fn on_drag_end<F>(&mut self, handler: F)
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on(event_types::DRAG_END, handler);
    }
}
