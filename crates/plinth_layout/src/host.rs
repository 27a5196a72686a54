//! Page-level host for a list of blocks
//!
//! `BlockHost` keeps one [`BlockComposer`] per block, matched by id. Syncing
//! a new block list updates survivors in place, mounts new ids and unmounts
//! the rest, so a block keeps its resolved content across edits that don't
//! touch it.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use plinth_core::Block;

use crate::composer::{BlockComposer, BlockProps};
use crate::config::RuntimeConfig;
use crate::element::Element;
use crate::renderer::RenderMode;

/// Mounted blocks of one canvas, in paint order
pub struct BlockHost {
    mode: RenderMode,
    config: RuntimeConfig,
    iframe: bool,
    composers: Vec<(String, BlockComposer)>,
}

impl BlockHost {
    pub fn new(mode: RenderMode, config: RuntimeConfig) -> Self {
        Self {
            mode,
            config,
            iframe: false,
            composers: Vec::new(),
        }
    }

    /// Compose every block as an iframe placeholder
    pub fn iframe(mut self, iframe: bool) -> Self {
        self.iframe = iframe;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.composers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BlockComposer> {
        self.composers
            .iter()
            .find(|(block_id, _)| block_id == id)
            .map(|(_, composer)| composer)
    }

    /// Ids in paint order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.composers.iter().map(|(id, _)| id.as_str())
    }

    fn props(&self, block: &Block) -> BlockProps {
        BlockProps::new(block.clone(), self.mode, self.config.clone()).iframe(self.iframe)
    }

    /// Reconcile mounted composers with `blocks`
    ///
    /// Occurrences of a repeated id are matched to existing composers in
    /// order, so each keeps its own composer across syncs.
    pub fn sync(&mut self, blocks: &[Block]) {
        let mut previous: FxHashMap<String, VecDeque<BlockComposer>> = FxHashMap::default();
        for (id, composer) in self.composers.drain(..) {
            previous.entry(id).or_default().push_back(composer);
        }
        let mut mounted = 0usize;

        let mut next = Vec::with_capacity(blocks.len());
        for block in blocks {
            let props = self.props(block);
            let reused = previous
                .get_mut(&block.id)
                .and_then(VecDeque::pop_front);
            let composer = match reused {
                Some(mut composer) => {
                    composer.update(props);
                    composer
                }
                None => {
                    mounted += 1;
                    BlockComposer::mount(props)
                }
            };
            next.push((block.id.clone(), composer));
        }
        self.composers = next;

        tracing::debug!(
            "synced {} blocks ({} mounted, {} unmounted)",
            self.composers.len(),
            mounted,
            previous.values().map(VecDeque::len).sum::<usize>()
        );
        // Leftovers unmount here
        drop(previous);
    }

    /// Switch every block to another mode
    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.refresh();
    }

    /// Swap in another config
    pub fn set_config(&mut self, config: RuntimeConfig) {
        if self.config.ptr_eq(&config) {
            return;
        }
        self.config = config;
        self.refresh();
    }

    fn refresh(&mut self) {
        let mut composers = std::mem::take(&mut self.composers);
        for (_, composer) in &mut composers {
            let props = self.props(&composer.block());
            composer.update(props);
        }
        self.composers = composers;
    }

    /// Compose every block in paint order
    pub fn render(&self) -> Vec<Element> {
        self.composers
            .iter()
            .map(|(_, composer)| composer.render())
            .collect()
    }

    /// Unmount everything
    pub fn clear(&mut self) {
        self.composers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::text;
    use crate::renderer::renderer_fn;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_config(renders: Rc<Cell<u32>>) -> RuntimeConfig {
        let config = RuntimeConfig::builder().build();
        config.component_register().register(
            "text",
            renderer_fn(move |block, _, _, _| {
                renders.set(renders.get() + 1);
                text(block.id.clone())
            }),
        );
        config
    }

    #[test]
    fn test_sync_mounts_in_order() {
        let config = counting_config(Rc::new(Cell::new(0)));
        let mut host = BlockHost::new(RenderMode::Edit, config);

        host.sync(&[Block::new("a", "text"), Block::new("b", "text")]);

        assert_eq!(host.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        let rendered = host.render();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].text_content(), "a");
        assert_eq!(rendered[1].text_content(), "b");
    }

    #[test]
    fn test_unchanged_blocks_are_not_rerendered() {
        let renders = Rc::new(Cell::new(0));
        let config = counting_config(Rc::clone(&renders));
        let mut host = BlockHost::new(RenderMode::Edit, config);

        let a = Block::new("a", "text");
        let b = Block::new("b", "text");
        host.sync(&[a.clone(), b.clone()]);
        assert_eq!(renders.get(), 2);

        // Reordered and one moved: only the moved block re-renders
        host.sync(&[b.clone().at(5.0, 5.0), a.clone()]);
        assert_eq!(renders.get(), 3);
        assert_eq!(host.ids().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_repeated_ids_keep_their_composers() {
        let renders = Rc::new(Cell::new(0));
        let config = counting_config(Rc::clone(&renders));
        let mut host = BlockHost::new(RenderMode::Edit, config.clone());

        let blocks = [
            Block::new("x", "text").at(0.0, 0.0),
            Block::new("x", "text").at(50.0, 0.0),
        ];
        host.sync(&blocks);
        host.sync(&blocks);
        host.sync(&blocks);

        assert_eq!(renders.get(), 2);
        assert_eq!(host.len(), 2);
        assert_eq!(config.viewport().listener_count(), 2);

        // Dropping one occurrence unmounts exactly one composer
        host.sync(&blocks[..1]);
        assert_eq!(renders.get(), 2);
        assert_eq!(config.viewport().listener_count(), 1);
    }

    #[test]
    fn test_removed_blocks_release_subscriptions() {
        let config = RuntimeConfig::builder().build();
        let mut host = BlockHost::new(RenderMode::Edit, config.clone());

        host.sync(&[Block::new("a", "late"), Block::new("b", "late")]);
        assert_eq!(config.component_register().pending_count("late"), 2);
        assert_eq!(config.viewport().listener_count(), 2);

        host.sync(&[Block::new("b", "late")]);
        assert_eq!(config.component_register().pending_count("late"), 1);
        assert_eq!(config.viewport().listener_count(), 1);

        host.clear();
        assert!(host.is_empty());
        assert_eq!(config.component_register().pending_count("late"), 0);
        assert_eq!(config.viewport().listener_count(), 0);
    }

    #[test]
    fn test_set_mode_recomposes() {
        let renders = Rc::new(Cell::new(0));
        let config = counting_config(Rc::clone(&renders));
        let mut host = BlockHost::new(RenderMode::Edit, config);
        host.sync(&[Block::new("a", "text")]);

        host.set_mode(RenderMode::Edit);
        assert_eq!(renders.get(), 1);

        host.set_mode(RenderMode::Preview);
        assert_eq!(renders.get(), 2);
        assert_eq!(host.mode(), RenderMode::Preview);
        // Preview output has no edit container ref
        assert!(host.render()[0].node_ref().is_none());
    }
}
