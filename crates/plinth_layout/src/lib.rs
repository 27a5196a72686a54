//! Plinth Layout
//!
//! Block composition for the edit canvas and the responsive preview.
//!
//! # Example
//!
//! ```rust
//! use plinth_layout::prelude::*;
//!
//! let config = RuntimeConfig::builder().build();
//! let block = Block::new("title", "text").at(10.0, 10.0).size(200.0, 40.0);
//!
//! let composer = BlockComposer::mount(BlockProps::new(block, RenderMode::Preview, config.clone()));
//! assert!(!composer.is_resolved());
//!
//! config
//!     .component_register()
//!     .register("text", renderer_fn(|_block, _mode, _store, _config| text("Hello")));
//!
//! assert_eq!(composer.render().text_content(), "Hello");
//! ```

pub mod animate;
pub mod collaborators;
pub mod composer;
pub mod config;
pub mod element;
pub mod element_style;
pub mod event_handler;
pub mod host;
pub mod layer;
pub mod renderer;
pub mod transform;


// Core types
pub use element::{div, span, text, Element, ElementBounds, ElementKind, ElementRef};
pub use element_style::{ElementStyle, Length, PointerEvents};
pub use event_handler::{event_types, EventCallback, EventContext, EventHandlers, MouseButton};

// Composition
pub use animate::AnimationDescriptor;
pub use composer::{BlockComposer, BlockProps, ResolveState};
pub use host::BlockHost;
pub use layer::ContentLayer;
pub use transform::{transform, EffectiveGeometry, TransformKey};

// Configuration and plugins
pub use collaborators::{ContextMenu, DragSurface, HandleOverlay};
pub use config::{RuntimeConfig, RuntimeConfigBuilder};
pub use renderer::{renderer_fn, BlockRenderer, ComponentRegister, RenderMode, RendererHandle};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::element::{div, span, text, Element, ElementBounds, ElementKind, ElementRef};
    pub use crate::element_style::{ElementStyle, Length, PointerEvents};
    // Event handlers
    pub use crate::event_handler::{
        event_types, EventCallback, EventContext, EventHandlers, MouseButton,
    };
    // Interaction collaborators
    pub use crate::collaborators::{
        context_menu_fn, drag_surface_fn, handle_fn, ContextMenu, DragSurface, EmptyHandle,
        HandleOverlay, NoContextMenu, NoDrag,
    };
    pub use crate::config::{RuntimeConfig, RuntimeConfigBuilder};
    pub use crate::renderer::{
        renderer_fn, BlockRenderer, ComponentRegister, RenderMode, RendererHandle,
    };
    // Composition
    pub use crate::animate::AnimationDescriptor;
    pub use crate::composer::{BlockComposer, BlockProps, ResolveState};
    pub use crate::host::BlockHost;
    pub use crate::layer::ContentLayer;
    pub use crate::transform::{transform, EffectiveGeometry, TransformKey};

    // Re-export core types
    pub use plinth_core::{
        AnimationSettings, Block, BlockStore, CanvasFrame, Display, EditorSettings, Geometry,
        IterationCount, PlinthError, Position, ResizeListener, ResizeSignal, Rotation,
        Subscription, Viewport,
    };
}
