//! Shared page store handed to renderers
//!
//! The composition engine never reads the store. It only passes the handle
//! through to renderer plugins, which use it to share page-level data
//! (form values, data sources, global styles) between blocks.
//!
//! # Example
//!
//! ```ignore
//! use plinth_core::store::BlockStore;
//!
//! let store = BlockStore::new();
//! store.set("title", "Landing page".to_string());
//!
//! // A clone is another handle to the same values
//! let handle = store.clone();
//! assert_eq!(handle.get::<String>("title").as_deref(), Some("Landing page"));
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

#[derive(Default)]
struct StoreInner {
    values: RefCell<FxHashMap<String, Box<dyn Any>>>,
    /// Bumped on every write
    version: Cell<u64>,
}

/// A heterogeneous key-value store shared by reference
#[derive(Clone, Default)]
pub struct BlockStore {
    inner: Rc<StoreInner>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.inner
            .values
            .borrow()
            .get(key)
            .and_then(|v| v.downcast_ref::<T>().cloned())
    }

    pub fn set<T: 'static>(&self, key: &str, value: T) {
        self.inner
            .values
            .borrow_mut()
            .insert(key.to_string(), Box::new(value));
        self.bump();
    }

    /// Update a value in place, returning whether it existed with type `T`
    pub fn update<T: 'static>(&self, key: &str, f: impl FnOnce(&mut T)) -> bool {
        let updated = {
            let mut values = self.inner.values.borrow_mut();
            match values.get_mut(key).and_then(|v| v.downcast_mut::<T>()) {
                Some(value) => {
                    f(value);
                    true
                }
                None => false,
            }
        };
        if updated {
            self.bump();
        }
        updated
    }

    pub fn delete(&self, key: &str) {
        if self.inner.values.borrow_mut().remove(key).is_some() {
            self.bump();
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.values.borrow().contains_key(key)
    }

    pub fn clear(&self) {
        self.inner.values.borrow_mut().clear();
        self.bump();
    }

    /// Write counter, for renderers that cache derived data
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Check if two handles point to the same store
    pub fn ptr_eq(&self, other: &BlockStore) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn bump(&self) {
        self.inner.version.set(self.inner.version.get() + 1);
    }
}

impl fmt::Debug for BlockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockStore")
            .field("len", &self.inner.values.borrow().len())
            .field("version", &self.version())
            .finish()
    }
}
