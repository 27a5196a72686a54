//! Interaction-layer collaborators
//!
//! The editor canvas decorates each block with a drag surface, resize and
//! rotate handles and a context menu. Their behavior lives outside the
//! composition engine; the composer only asks them for handlers and elements
//! and wires them onto the block container.

use std::rc::Rc;

use plinth_core::Block;

use crate::config::RuntimeConfig;
use crate::element::{Element, ElementRef};
use crate::event_handler::{EventContext, EventHandlers};

/// Supplies the drag handlers spread onto an edit-mode container
pub trait DragSurface {
    fn handlers(&self, block: &Block, container: &ElementRef, config: &RuntimeConfig)
        -> EventHandlers;
}

/// A self-contained handle element rendered next to the block content
///
/// Used for both the resize and the rotate handle.
pub trait HandleOverlay {
    fn render(&self, block: &Block, config: &RuntimeConfig, container: &ElementRef) -> Element;
}

/// Opens the external context menu
pub trait ContextMenu {
    fn open(&self, event: &EventContext, container: &ElementRef, config: &RuntimeConfig);
}

impl<F> DragSurface for F
where
    F: Fn(&Block, &ElementRef, &RuntimeConfig) -> EventHandlers,
{
    fn handlers(
        &self,
        block: &Block,
        container: &ElementRef,
        config: &RuntimeConfig,
    ) -> EventHandlers {
        self(block, container, config)
    }
}

impl<F> HandleOverlay for F
where
    F: Fn(&Block, &RuntimeConfig, &ElementRef) -> Element,
{
    fn render(&self, block: &Block, config: &RuntimeConfig, container: &ElementRef) -> Element {
        self(block, config, container)
    }
}

impl<F> ContextMenu for F
where
    F: Fn(&EventContext, &ElementRef, &RuntimeConfig),
{
    fn open(&self, event: &EventContext, container: &ElementRef, config: &RuntimeConfig) {
        self(event, container, config)
    }
}

/// Drag surface that attaches no handlers
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDrag;

impl DragSurface for NoDrag {
    fn handlers(&self, _: &Block, _: &ElementRef, _: &RuntimeConfig) -> EventHandlers {
        EventHandlers::new()
    }
}

/// Handle that renders an empty div
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyHandle;

impl HandleOverlay for EmptyHandle {
    fn render(&self, _: &Block, _: &RuntimeConfig, _: &ElementRef) -> Element {
        crate::element::div()
    }
}

/// Context menu that ignores requests
#[derive(Clone, Copy, Debug, Default)]
pub struct NoContextMenu;

impl ContextMenu for NoContextMenu {
    fn open(&self, _: &EventContext, _: &ElementRef, _: &RuntimeConfig) {}
}

/// Wrap a closure as a drag surface
pub fn drag_surface_fn<F>(f: F) -> Rc<dyn DragSurface>
where
    F: Fn(&Block, &ElementRef, &RuntimeConfig) -> EventHandlers + 'static,
{
    Rc::new(f)
}

/// Wrap a closure as a handle overlay
pub fn handle_fn<F>(f: F) -> Rc<dyn HandleOverlay>
where
    F: Fn(&Block, &RuntimeConfig, &ElementRef) -> Element + 'static,
{
    Rc::new(f)
}

/// Wrap a closure as a context menu
pub fn context_menu_fn<F>(f: F) -> Rc<dyn ContextMenu>
where
    F: Fn(&EventContext, &ElementRef, &RuntimeConfig) + 'static,
{
    Rc::new(f)
}
