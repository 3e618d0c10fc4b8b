//! Id types for zones, items, operations, and tabs.
//!
//! Ids are `u64` newtypes: stable ids are derived from string keys with
//! FNV-1a hashing, anonymous ids come from a process-local counter. Both
//! are cheap to copy and hash, which matters because ids flow through every
//! pointer-movement event.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(s: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in s.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

// Fresh ids start above any realistic hash collision window with zero;
// the counter only has to be unique within one process.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn fresh_raw() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Derive a stable id from a string key (FNV-1a).
            pub fn new(key: &str) -> Self {
                Self(fnv1a(key))
            }

            /// Allocate a fresh anonymous id, unique within this process.
            pub fn fresh() -> Self {
                Self(fresh_raw())
            }

            pub const fn from_raw(id: u64) -> Self {
                Self(id)
            }

            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "(0x{:016x})"), self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

define_id!(
    /// Identifies a registered drop zone.
    ZoneId,
    "Zone"
);
define_id!(
    /// Identifies a registered drag item.
    ItemId,
    "Item"
);
define_id!(
    /// Correlates one drag gesture from pick-up to drop or cancel.
    OperationId,
    "Op"
);
define_id!(
    /// Identifies a tab in the tab-strip layout engine.
    TabId,
    "Tab"
);
