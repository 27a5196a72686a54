//! Block composer
//!
//! A [`BlockComposer`] is one mounted block. It resolves the block's
//! renderer, keeps the block's effective geometry in step with the viewport,
//! and composes the final element tree for the edit canvas or the preview.
//!
//! ```ignore
//! use plinth_layout::prelude::*;
//!
//! let config = RuntimeConfig::builder().build();
//! let block = Block::new("b1", "button").at(10.0, 20.0).size(100.0, 40.0);
//!
//! let mut composer = BlockComposer::mount(BlockProps::new(block, RenderMode::Edit, config.clone()));
//! assert!(!composer.is_resolved());
//!
//! // The renderer arrives later; the composer picks it up
//! config.component_register().register("button", renderer_fn(|_, _, _, _| text("OK")));
//! assert!(composer.is_resolved());
//!
//! let tree = composer.render();
//! ```
//!
//! # Lifecycle
//!
//! - **Resolving**: the renderer is not loaded; no content is produced. Edit
//!   mode still composes the container, drag surface, context menu and
//!   handles around an empty content layer.
//! - **Resolved**: the renderer output is cached until block, mode, config or
//!   effective geometry change, which restarts resolution.
//!
//! Each composer holds at most one registry subscription and one resize
//! listener. Both are released on unmount.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use plinth_core::{Block, Position, ResizeListener, Subscription};

use crate::animate::{self, AnimationDescriptor};
use crate::config::RuntimeConfig;
use crate::element::{div, span, Element, ElementRef};
use crate::element_style::{ElementStyle, Length, PointerEvents};
use crate::event_handler::EventHandlers;
use crate::layer::ContentLayer;
use crate::renderer::{BlockRenderer, RenderMode};
use crate::transform::{EffectiveGeometry, TransformKey};

/// Inputs of a composer
#[derive(Clone, Debug)]
pub struct BlockProps {
    pub block: Block,
    pub mode: RenderMode,
    pub config: RuntimeConfig,
    /// Placeholder pass: the edit container is painted fully transparent
    pub iframe: bool,
}

impl BlockProps {
    pub fn new(block: Block, mode: RenderMode, config: RuntimeConfig) -> Self {
        Self {
            block,
            mode,
            config,
            iframe: false,
        }
    }

    pub fn iframe(mut self, iframe: bool) -> Self {
        self.iframe = iframe;
        self
    }

    /// Whether a change from `self` to `next` restarts resolution
    fn resolution_changed(&self, next: &BlockProps) -> bool {
        !self.block.same_as(&next.block)
            || self.mode != next.mode
            || !self.config.ptr_eq(&next.config)
    }
}

/// Renderer resolution state
#[derive(Clone, Debug, PartialEq)]
pub enum ResolveState {
    Resolving,
    Resolved(Element),
}

impl ResolveState {
    pub fn element(&self) -> Option<&Element> {
        match self {
            ResolveState::Resolving => None,
            ResolveState::Resolved(element) => Some(element),
        }
    }
}

/// Snapshot of one resolution request
struct RenderRequest {
    block: Block,
    mode: RenderMode,
    config: RuntimeConfig,
    generation: u64,
}

impl RenderRequest {
    fn render(&self, renderer: &dyn BlockRenderer) -> Element {
        renderer.render(&self.block, self.mode, self.config.store(), &self.config)
    }
}

struct ComposerState {
    props: BlockProps,
    effective: EffectiveGeometry,
    content: ResolveState,
    subscription: Option<Subscription>,
    /// Incremented on every resolution request
    generation: u64,
    container: ElementRef,
    drag_handlers: EventHandlers,
}

impl ComposerState {
    fn transform_key(props: &BlockProps) -> TransformKey {
        TransformKey::new(
            &props.block,
            &props.config.viewport().viewport(),
            props.config.settings(),
        )
    }

    /// Block handed to the renderer
    ///
    /// Preview renders see the effective geometry, edit renders the stored one.
    fn render_block(&self) -> Block {
        match self.props.mode {
            RenderMode::Edit => self.props.block.clone(),
            RenderMode::Preview => self.props.block.with_geometry(self.effective.get()),
        }
    }
}

/// A mounted block
pub struct BlockComposer {
    state: Rc<RefCell<ComposerState>>,
    resize_listener: Option<ResizeListener>,
}

impl BlockComposer {
    /// Mount a block and start resolving its renderer
    pub fn mount(props: BlockProps) -> Self {
        tracing::debug!(
            "mounting block '{}' ({}) in {} mode",
            props.block.id,
            props.block.name,
            props.mode
        );
        let container = ElementRef::new();
        let drag_handlers =
            props
                .config
                .drag_surface()
                .handlers(&props.block, &container, &props.config);

        let state = Rc::new(RefCell::new(ComposerState {
            effective: EffectiveGeometry::new(ComposerState::transform_key(&props)),
            props,
            content: ResolveState::Resolving,
            subscription: None,
            generation: 0,
            container,
            drag_handlers,
        }));

        let resize_listener = Some(install_resize_listener(&state));
        start_resolution(&state);

        Self {
            state,
            resize_listener,
        }
    }

    /// Apply new inputs
    ///
    /// A change of block, mode or config restarts resolution after cancelling
    /// any pending subscription. An iframe-only change just recomposes.
    pub fn update(&mut self, props: BlockProps) {
        let (restart, block_changed, config_changed, signal_changed) = {
            let state = self.state.borrow();
            let current = &state.props;
            (
                current.resolution_changed(&props),
                !current.block.same_as(&props.block),
                !current.config.ptr_eq(&props.config),
                !current.config.viewport().ptr_eq(props.config.viewport()),
            )
        };

        let drag_handlers = (block_changed || config_changed).then(|| {
            let container = self.container();
            props
                .config
                .drag_surface()
                .handlers(&props.block, &container, &props.config)
        });

        let geometry_changed = {
            let mut state = self.state.borrow_mut();
            let key = ComposerState::transform_key(&props);
            state.props = props;
            if let Some(handlers) = drag_handlers {
                state.drag_handlers = handlers;
            }
            state.effective.refresh(key)
        };

        if signal_changed {
            self.resize_listener = None;
            self.resize_listener = Some(install_resize_listener(&self.state));
        }

        if restart || geometry_changed {
            start_resolution(&self.state);
        }
    }

    /// Unmount the block, releasing its listener and subscription
    pub fn unmount(self) {}

    pub fn is_resolved(&self) -> bool {
        matches!(self.state.borrow().content, ResolveState::Resolved(_))
    }

    pub fn resolve_state(&self) -> ResolveState {
        self.state.borrow().content.clone()
    }

    /// Whether a registry subscription is waiting
    pub fn has_pending_subscription(&self) -> bool {
        self.state
            .borrow()
            .subscription
            .as_ref()
            .is_some_and(Subscription::is_pending)
    }

    pub fn effective_geometry(&self) -> plinth_core::Geometry {
        self.state.borrow().effective.get()
    }

    /// Ref bound to the edit-mode container
    pub fn container(&self) -> ElementRef {
        self.state.borrow().container.clone()
    }

    pub fn block(&self) -> Block {
        self.state.borrow().props.block.clone()
    }

    /// Compose the element tree for the current mode
    pub fn render(&self) -> Element {
        let state = self.state.borrow();
        match state.props.mode {
            RenderMode::Edit => compose_edit(&state),
            RenderMode::Preview => compose_preview(&state),
        }
    }
}

impl Drop for BlockComposer {
    fn drop(&mut self) {
        if let Some(listener) = self.resize_listener.take() {
            listener.remove();
        }
        let subscription = self.state.borrow_mut().subscription.take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
        tracing::debug!("unmounted block '{}'", self.state.borrow().props.block.id);
    }
}

fn install_resize_listener(state: &Rc<RefCell<ComposerState>>) -> ResizeListener {
    let weak: Weak<RefCell<ComposerState>> = Rc::downgrade(state);
    let signal = state.borrow().props.config.viewport().clone();
    signal.listen(move |_viewport| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        let changed = {
            let mut current = state.borrow_mut();
            let key = ComposerState::transform_key(&current.props);
            current.effective.refresh(key)
        };
        if changed {
            start_resolution(&state);
        }
    })
}

/// Resolve the renderer for the current inputs
///
/// The previous subscription is cancelled before anything else, so a
/// superseded request can never write content.
fn start_resolution(state: &Rc<RefCell<ComposerState>>) {
    let (previous, request) = {
        let mut current = state.borrow_mut();
        current.generation += 1;
        current.content = ResolveState::Resolving;
        let previous = current.subscription.take();
        let request = RenderRequest {
            block: current.render_block(),
            mode: current.props.mode,
            config: current.props.config.clone(),
            generation: current.generation,
        };
        (previous, request)
    };
    if let Some(previous) = previous {
        previous.cancel();
    }

    let registry = request.config.component_register().clone();
    if let Some(renderer) = registry.resolve(&request.block.name) {
        tracing::trace!("renderer '{}' resolved synchronously", request.block.name);
        let element = request.render(renderer.as_ref());
        state.borrow_mut().content = ResolveState::Resolved(element);
        return;
    }

    tracing::debug!(
        "renderer '{}' not loaded, waiting for registration",
        request.block.name
    );
    let name = request.block.name.clone();
    let weak = Rc::downgrade(state);
    let subscription = registry.subscribe(&name, move || {
        let Some(state) = weak.upgrade() else {
            return;
        };
        if state.borrow().generation != request.generation {
            return;
        }
        let Some(renderer) = request.config.component_register().resolve(&request.block.name)
        else {
            tracing::warn!(
                "renderer '{}' notified but not resolvable",
                request.block.name
            );
            return;
        };

        let element = request.render(renderer.as_ref());
        let finished = {
            let mut current = state.borrow_mut();
            current.content = ResolveState::Resolved(element);
            current.subscription.take()
        };
        if let Some(finished) = finished {
            finished.cancel();
        }
    });
    state.borrow_mut().subscription = Some(subscription);
}

fn animation_of(block: &Block, config: &RuntimeConfig) -> AnimationDescriptor {
    animate::resolve(&block.animate, &config.settings().animation_base_class)
}

fn compose_edit(state: &ComposerState) -> Element {
    let block = &state.props.block;
    let config = &state.props.config;
    let settings = config.settings();
    let animation = animation_of(block, config);
    let content = state.content.element().cloned();

    let layer = match ContentLayer::select(block.position, block.display) {
        ContentLayer::Absolute => {
            let pointer = if block.can_drag {
                PointerEvents::None
            } else {
                PointerEvents::Auto
            };
            div()
                .class(animation.class_name.clone())
                .style(
                    ElementStyle::new()
                        .pointer_events(pointer)
                        .merge(&animation.style()),
                )
                .child_opt(content)
        }
        ContentLayer::StaticBlock => div()
            .class(animation.class_name.clone())
            .style(
                ElementStyle::new()
                    .pointer_events(PointerEvents::None)
                    .width(Length::FULL)
                    .height(Length::FULL)
                    .merge(&animation.style()),
            )
            .child_opt(content),
        ContentLayer::StaticInline => span()
            .style(ElementStyle::new().pointer_events(PointerEvents::None))
            .child_opt(content),
    };

    let focus_class = if block.focus && !block.position.is_static() {
        settings.focus_class.clone()
    } else {
        String::new()
    };

    let mut container = div()
        .class(focus_class)
        .style(
            ElementStyle::new()
                .position(block.position)
                .geometry(block.geometry())
                .z_index(block.z_index)
                .display(block.display)
                .opacity(if state.props.iframe { 0.0 } else { 1.0 })
                .rotate(block.rotate.value_or_zero()),
        )
        .bind(&state.container)
        .handlers(state.drag_handlers.clone());

    if block.name != settings.modal_mask_name {
        let menu_config = config.clone();
        let menu_container = state.container.clone();
        container = container.on_context_menu(move |event| {
            menu_config
                .context_menu()
                .open(event, &menu_container, &menu_config);
        });
    }

    container
        .child(layer)
        .child(config.resize_handle().render(block, config, &state.container))
        .child(config.rotate_handle().render(block, config, &state.container))
}

fn compose_preview(state: &ComposerState) -> Element {
    let block = &state.props.block;
    let animation = animation_of(block, &state.props.config);
    let position = if block.fixed {
        Position::Fixed
    } else {
        block.position
    };

    div()
        .class(animation.class_name.clone())
        .style(
            ElementStyle::new()
                .position(position)
                .geometry(state.effective.get())
                .z_index(block.z_index)
                .display(block.display)
                .rotate(block.rotate.value_or_zero())
                .merge(&animation.style()),
        )
        .child_opt(state.content.element().cloned())
}
