//! Plinth Core
//!
//! Foundational pieces of the Plinth page-building canvas:
//!
//! - **Blocks**: the positioned records a page is made of
//! - **Renderer Registry**: named renderer lookup with one-shot load notifications
//! - **Store**: opaque page-level data handed through to renderers
//! - **Viewport**: window size, canvas frame and the resize signal
//! - **Settings**: editor settings loaded from TOML
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use plinth_core::registry::ComponentRegistry;
//!
//! let registry: ComponentRegistry<str> = ComponentRegistry::new();
//! assert!(registry.resolve("button").is_none());
//!
//! let sub = registry.subscribe("button", || println!("button loaded"));
//! registry.register("button", Rc::from("button renderer"));
//!
//! assert!(!sub.is_pending());
//! assert!(registry.resolve("button").is_some());
//! ```

pub mod block;
pub mod error;
pub mod registry;
pub mod settings;
pub mod store;
pub mod viewport;

pub use block::{AnimationSettings, Block, Display, Geometry, IterationCount, Position, Rotation};
pub use error::{PlinthError, Result};
pub use registry::{ComponentRegistry, RegisterCallback, Subscription, SubscriptionId};
pub use settings::EditorSettings;
pub use store::BlockStore;
pub use viewport::{CanvasFrame, ListenerId, ResizeCallback, ResizeListener, ResizeSignal, Viewport};
