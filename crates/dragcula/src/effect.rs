//! Drag effects, zone capability sets, and pointer state passthrough.

use bitflags::bitflags;
use dragcula_core::math::Vec2;

/// The effect a drag requests or a drop applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragEffect {
    #[default]
    None,
    Move,
    Copy,
    Link,
}

impl DragEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            DragEffect::None => "none",
            DragEffect::Move => "move",
            DragEffect::Copy => "copy",
            DragEffect::Link => "link",
        }
    }

    /// Parse a native drop-effect string; unknown values map to `None`.
    pub fn parse(value: &str) -> Self {
        match value {
            "move" => DragEffect::Move,
            "copy" => DragEffect::Copy,
            "link" => DragEffect::Link,
            _ => DragEffect::None,
        }
    }
}

bitflags! {
    /// The set of effects a drop zone accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EffectSet: u8 {
        const MOVE = 1 << 0;
        const COPY = 1 << 1;
        const LINK = 1 << 2;
    }
}

impl EffectSet {
    pub fn allows(&self, effect: DragEffect) -> bool {
        match effect {
            DragEffect::None => true,
            DragEffect::Move => self.contains(EffectSet::MOVE),
            DragEffect::Copy => self.contains(EffectSet::COPY),
            DragEffect::Link => self.contains(EffectSet::LINK),
        }
    }
}

impl Default for EffectSet {
    fn default() -> Self {
        EffectSet::all()
    }
}

bitflags! {
    /// Modifier keys held during a pointer sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// A pointer snapshot carried on every drag event so consumers can react to
/// position and modifier keys without a second event source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub position: Vec2,
    pub modifiers: Modifiers,
}

impl PointerSample {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_parse_unknown_is_none() {
        assert_eq!(DragEffect::parse("move"), DragEffect::Move);
        assert_eq!(DragEffect::parse("teleport"), DragEffect::None);
    }

    #[test]
    fn effect_set_allows() {
        let set = EffectSet::MOVE | EffectSet::COPY;
        assert!(set.allows(DragEffect::Move));
        assert!(set.allows(DragEffect::None));
        assert!(!set.allows(DragEffect::Link));
    }
}
