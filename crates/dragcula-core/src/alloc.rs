//! Optimized collection types for Dragcula.
//!
//! Re-exports hash collections backed by AHash, which is faster than the
//! default SipHash for the small string/id keys used throughout the toolkit.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
