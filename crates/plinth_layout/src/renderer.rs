//! Block renderer plugins
//!
//! A renderer turns a block record into the element tree for its content.
//! Renderers are registered by name in the [`ComponentRegister`] and shared
//! by every block using that name.
//!
//! ```ignore
//! use plinth_layout::prelude::*;
//!
//! let config = RuntimeConfig::builder().build();
//! config.component_register().register(
//!     "text",
//!     renderer_fn(|block, _mode, _store, _config| {
//!         text(block.props.get("text").and_then(|v| v.as_str()).unwrap_or_default())
//!     }),
//! );
//! ```

use std::fmt;
use std::rc::Rc;

use plinth_core::{Block, BlockStore, ComponentRegistry};

use crate::config::RuntimeConfig;
use crate::element::Element;

/// Which canvas a block is composed for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Editable canvas with interaction overlays
    #[default]
    Edit,
    /// Read-only responsive preview
    Preview,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Edit => "edit",
            RenderMode::Preview => "preview",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces the content of a block
pub trait BlockRenderer {
    fn render(
        &self,
        block: &Block,
        mode: RenderMode,
        store: &BlockStore,
        config: &RuntimeConfig,
    ) -> Element;
}

impl<F> BlockRenderer for F
where
    F: Fn(&Block, RenderMode, &BlockStore, &RuntimeConfig) -> Element,
{
    fn render(
        &self,
        block: &Block,
        mode: RenderMode,
        store: &BlockStore,
        config: &RuntimeConfig,
    ) -> Element {
        self(block, mode, store, config)
    }
}

/// Shared renderer handle
pub type RendererHandle = Rc<dyn BlockRenderer>;

/// Registry of block renderers by name
pub type ComponentRegister = ComponentRegistry<dyn BlockRenderer>;

/// Wrap a closure as a renderer handle
pub fn renderer_fn<F>(render: F) -> RendererHandle
where
    F: Fn(&Block, RenderMode, &BlockStore, &RuntimeConfig) -> Element + 'static,
{
    Rc::new(render)
}
