//! Drag payloads: typed key/value data for in-process items and MIME-style
//! transfer payloads for native drags.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use dragcula_core::alloc::HashMap;
use dragcula_core::ItemId;
use indexmap::IndexMap;

use crate::effect::DragEffect;

enum Entry {
    Value(Rc<dyn Any>),
    /// Resolved lazily on every read; never memoized, so suppliers can
    /// observe current state at drop time.
    Supplier(Rc<dyn Fn() -> Rc<dyn Any>>),
}

/// Typed key/value payload attached to a drag item.
///
/// Keys are unique within one instance. Values are stored behind `Rc` so a
/// `DragData` clone (taken into the active operation and into every event
/// snapshot) shares storage instead of copying it.
#[derive(Clone, Default)]
pub struct DragData {
    entries: Rc<RefCell<HashMap<String, Entry>>>,
}

impl DragData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous entry.
    pub fn set<T: 'static>(&self, key: impl Into<String>, value: T) {
        self.entries
            .borrow_mut()
            .insert(key.into(), Entry::Value(Rc::new(value)));
    }

    /// Store a supplier under `key`; it is invoked on every read.
    pub fn set_with<T, F>(&self, key: impl Into<String>, supplier: F)
    where
        T: 'static,
        F: Fn() -> T + 'static,
    {
        self.entries.borrow_mut().insert(
            key.into(),
            Entry::Supplier(Rc::new(move || Rc::new(supplier()) as Rc<dyn Any>)),
        );
    }

    /// Read a value by key, downcast to `T`. Returns `None` when the key is
    /// absent or holds a different type.
    pub fn get<T: 'static>(&self, key: &str) -> Option<Rc<T>> {
        let entries = self.entries.borrow();
        let resolved = match entries.get(key)? {
            Entry::Value(value) => Rc::clone(value),
            Entry::Supplier(supplier) => supplier(),
        };
        resolved.downcast::<T>().ok()
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Remove one entry, or every entry when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        let mut entries = self.entries.borrow_mut();
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl std::fmt::Debug for DragData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.borrow();
        f.debug_struct("DragData").field("len", &entries.len()).finish()
    }
}

/// The payload of a native (OS/browser originated) drag: an ordered map of
/// MIME type to string data, plus the requested drop effect.
///
/// In-process items serialize a marker entry so a drag that round-trips
/// through the native layer can be resolved back to its item.
#[derive(Debug, Clone, Default)]
pub struct TransferPayload {
    entries: IndexMap<String, String>,
    pub drop_effect: DragEffect,
}

impl TransferPayload {
    /// Marker MIME type identifying an in-process item payload.
    pub const ITEM_MARKER: &'static str = "dragcula/item";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build the payload advertising an in-process item to the native layer.
    pub fn for_item(item: ItemId) -> Self {
        let mut payload = Self::new();
        payload.set_data(Self::ITEM_MARKER, format!("{:x}", item.as_u64()));
        payload
    }

    pub fn set_data(&mut self, mime: impl Into<String>, data: impl Into<String>) {
        self.entries.insert(mime.into(), data.into());
    }

    pub fn get_data(&self, mime: &str) -> Option<&str> {
        self.entries.get(mime).map(String::as_str)
    }

    pub fn has_data(&self, mime: &str) -> bool {
        self.entries.contains_key(mime)
    }

    /// MIME types present, in insertion order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolve the in-process item marker, if this payload carries one.
    pub fn item_marker(&self) -> Option<ItemId> {
        let raw = self.get_data(Self::ITEM_MARKER)?;
        u64::from_str_radix(raw, 16).ok().map(ItemId::from_raw)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
