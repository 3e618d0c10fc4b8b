//! Vector math via SIMD-accelerated `glam` types.
//!
//! Pointer positions, scroll offsets, and sizes are all [`Vec2`]. The full
//! `glam` surface is re-exported so downstream crates don't need a direct
//! dependency.

pub use glam::*;
