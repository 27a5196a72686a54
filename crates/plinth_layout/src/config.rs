//! Runtime configuration shared by every block on a canvas
//!
//! `RuntimeConfig` bundles the capabilities a block needs: the renderer
//! registry, the page store, the viewport signal, editor settings and the
//! interaction collaborators.
//!
//! ```ignore
//! use plinth_layout::prelude::*;
//!
//! let config = RuntimeConfig::builder()
//!     .settings(EditorSettings::load("plinth.toml")?)
//!     .context_menu(context_menu_fn(|event, _container, _config| {
//!         println!("menu at {}, {}", event.mouse_x, event.mouse_y);
//!     }))
//!     .build();
//! ```
//!
//! Cloning is cheap. Two configs are the same config when they share the same
//! allocation ([`RuntimeConfig::ptr_eq`]); composers use that to detect a
//! config change.

use std::fmt;
use std::rc::Rc;

use plinth_core::{BlockStore, EditorSettings, ResizeSignal};

use crate::collaborators::{
    ContextMenu, DragSurface, EmptyHandle, HandleOverlay, NoContextMenu, NoDrag,
};
use crate::renderer::ComponentRegister;

struct ConfigInner {
    registry: ComponentRegister,
    store: BlockStore,
    viewport: ResizeSignal,
    settings: EditorSettings,
    drag_surface: Rc<dyn DragSurface>,
    resize_handle: Rc<dyn HandleOverlay>,
    rotate_handle: Rc<dyn HandleOverlay>,
    context_menu: Rc<dyn ContextMenu>,
}

/// Shared runtime capabilities
#[derive(Clone)]
pub struct RuntimeConfig {
    inner: Rc<ConfigInner>,
}

impl RuntimeConfig {
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::new()
    }

    /// Renderer registry
    pub fn component_register(&self) -> &ComponentRegister {
        &self.inner.registry
    }

    /// Page store handed through to renderers
    pub fn store(&self) -> &BlockStore {
        &self.inner.store
    }

    /// Viewport resize signal
    pub fn viewport(&self) -> &ResizeSignal {
        &self.inner.viewport
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.inner.settings
    }

    pub fn drag_surface(&self) -> &dyn DragSurface {
        self.inner.drag_surface.as_ref()
    }

    pub fn resize_handle(&self) -> &dyn HandleOverlay {
        self.inner.resize_handle.as_ref()
    }

    pub fn rotate_handle(&self) -> &dyn HandleOverlay {
        self.inner.rotate_handle.as_ref()
    }

    pub fn context_menu(&self) -> &dyn ContextMenu {
        self.inner.context_menu.as_ref()
    }

    /// Check if two handles are the same config
    pub fn ptr_eq(&self, other: &RuntimeConfig) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("registry", &self.inner.registry)
            .field("store", &self.inner.store)
            .field("viewport", &self.inner.viewport)
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RuntimeConfig`]
///
/// Anything not set gets a fresh default: an empty registry and store, a
/// viewport the size of the design canvas, and inert collaborators.
#[derive(Default)]
pub struct RuntimeConfigBuilder {
    registry: Option<ComponentRegister>,
    store: Option<BlockStore>,
    viewport: Option<ResizeSignal>,
    settings: Option<EditorSettings>,
    drag_surface: Option<Rc<dyn DragSurface>>,
    resize_handle: Option<Rc<dyn HandleOverlay>>,
    rotate_handle: Option<Rc<dyn HandleOverlay>>,
    context_menu: Option<Rc<dyn ContextMenu>>,
}

impl RuntimeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing registry
    pub fn registry(mut self, registry: ComponentRegister) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn store(mut self, store: BlockStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn viewport(mut self, viewport: ResizeSignal) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn settings(mut self, settings: EditorSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn drag_surface(mut self, drag_surface: Rc<dyn DragSurface>) -> Self {
        self.drag_surface = Some(drag_surface);
        self
    }

    pub fn resize_handle(mut self, handle: Rc<dyn HandleOverlay>) -> Self {
        self.resize_handle = Some(handle);
        self
    }

    pub fn rotate_handle(mut self, handle: Rc<dyn HandleOverlay>) -> Self {
        self.rotate_handle = Some(handle);
        self
    }

    pub fn context_menu(mut self, context_menu: Rc<dyn ContextMenu>) -> Self {
        self.context_menu = Some(context_menu);
        self
    }

    pub fn build(self) -> RuntimeConfig {
        let settings = self.settings.unwrap_or_default();
        let viewport = self
            .viewport
            .unwrap_or_else(|| ResizeSignal::new(settings.design_width, settings.design_height));

        RuntimeConfig {
            inner: Rc::new(ConfigInner {
                registry: self.registry.unwrap_or_default(),
                store: self.store.unwrap_or_default(),
                viewport,
                settings,
                drag_surface: self.drag_surface.unwrap_or_else(|| Rc::new(NoDrag)),
                resize_handle: self.resize_handle.unwrap_or_else(|| Rc::new(EmptyHandle)),
                rotate_handle: self.rotate_handle.unwrap_or_else(|| Rc::new(EmptyHandle)),
                context_menu: self.context_menu.unwrap_or_else(|| Rc::new(NoContextMenu)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::builder().build();
        let viewport = config.viewport().viewport();

        assert!(config.component_register().is_empty());
        assert_eq!(viewport.width, 375.0);
        assert_eq!(viewport.height, 667.0);
        assert_eq!(config.settings().modal_mask_name, "modalMask");
    }

    #[test]
    fn test_identity() {
        let config = RuntimeConfig::builder().build();
        let clone = config.clone();
        let other = RuntimeConfig::builder()
            .registry(config.component_register().clone())
            .build();

        assert!(config.ptr_eq(&clone));
        assert!(!config.ptr_eq(&other));
    }
}
