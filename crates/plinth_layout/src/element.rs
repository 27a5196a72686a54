//! Composed element tree with a fluent builder
//!
//! ```rust
//! use plinth_layout::prelude::*;
//!
//! let ui = div()
//!     .class("card")
//!     .style(ElementStyle::new().opacity(1.0))
//!     .child(span().child(text("Hello")));
//!
//! assert_eq!(ui.children().len(), 1);
//! assert!(ui.has_class("card"));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::element_style::ElementStyle;
use crate::event_handler::{EventContext, EventHandlers};

/// Measured bounds of an element in viewport space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Shared handle to an element's measured bounds
///
/// The host writes bounds after layout; collaborators such as resize handles
/// read them to measure the container they decorate.
#[derive(Clone, Default)]
pub struct ElementRef {
    bounds: Rc<Cell<Option<ElementBounds>>>,
}

impl ElementRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bounds(&self, bounds: ElementBounds) {
        self.bounds.set(Some(bounds));
    }

    pub fn clear(&self) {
        self.bounds.set(None);
    }

    /// Bounds of the bound element, if it has been laid out
    pub fn bounds(&self) -> Option<ElementBounds> {
        self.bounds.get()
    }

    /// Check if two refs point to the same element slot
    pub fn ptr_eq(&self, other: &ElementRef) -> bool {
        Rc::ptr_eq(&self.bounds, &other.bounds)
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementRef").field(&self.bounds()).finish()
    }
}

/// Kind of a composed element
#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    Div,
    Span,
    Text(String),
}

/// A node of the composed visual tree
#[derive(Clone, Debug)]
pub struct Element {
    kind: ElementKind,
    class_name: String,
    style: ElementStyle,
    handlers: EventHandlers,
    node_ref: Option<ElementRef>,
    children: Vec<Element>,
}

/// Create a div element
pub fn div() -> Element {
    Element::new(ElementKind::Div)
}

/// Create an inline span element
pub fn span() -> Element {
    Element::new(ElementKind::Span)
}

/// Create a text leaf
pub fn text(content: impl Into<String>) -> Element {
    Element::new(ElementKind::Text(content.into()))
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            class_name: String::new(),
            style: ElementStyle::default(),
            handlers: EventHandlers::default(),
            node_ref: None,
            children: Vec::new(),
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Set the class string (space separated tokens)
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Merge handlers into the element
    pub fn handlers(mut self, handlers: EventHandlers) -> Self {
        self.handlers.merge(handlers);
        self
    }

    pub fn on_context_menu<F>(mut self, handler: F) -> Self
    where
        F: Fn(&EventContext) + 'static,
    {
        self.handlers.on_context_menu(handler);
        self
    }

    /// Bind the element to a ref for external measurement
    pub fn bind(mut self, node_ref: &ElementRef) -> Self {
        self.node_ref = Some(node_ref.clone());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn child_opt(mut self, child: Option<Element>) -> Self {
        self.children.extend(child);
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    pub fn get_style(&self) -> &ElementStyle {
        &self.style
    }

    pub fn get_handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    pub fn node_ref(&self) -> Option<&ElementRef> {
        self.node_ref.as_ref()
    }

    /// Text content of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let ElementKind::Text(content) = &self.kind {
            out.push_str(content);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first search for the first element matching `predicate`
    pub fn find(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(predicate))
    }

    /// Dispatch an event to this element's handlers
    pub fn dispatch(&self, ctx: &EventContext) {
        self.handlers.dispatch(ctx);
    }
}

/// Structural equality
///
/// Handlers compare by the set of event types they listen to and refs by
/// presence, since callbacks and ref slots have no value identity.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.class_name == other.class_name
            && self.style == other.style
            && self.handlers.event_types_sorted() == other.handlers.event_types_sorted()
            && self.node_ref.is_some() == other.node_ref.is_some()
            && self.children == other.children
    }
}
