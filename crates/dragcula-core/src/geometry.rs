//! Geometry primitives for drop-zone hit testing and layout.

use crate::math::Vec2;

/// An axis-aligned rectangle in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Layout axis of an ordered drop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    Horizontal,
    /// The default when configuration is missing or unrecognized; ordered
    /// zones must keep working even with a bad axis attribute.
    #[default]
    Vertical,
}

impl Axis {
    /// Parse an axis from a configuration attribute. Anything other than
    /// `"horizontal"` or `"vertical"` falls back to [`Axis::Vertical`].
    pub fn parse(value: &str) -> Self {
        match value {
            "horizontal" => Axis::Horizontal,
            "vertical" => Axis::Vertical,
            _ => Axis::Vertical,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Axis::Horizontal)
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Axis::Vertical)
    }

    /// The coordinate of a point along this axis.
    pub fn main(&self, point: Vec2) -> f32 {
        match self {
            Axis::Horizontal => point.x,
            Axis::Vertical => point.y,
        }
    }

    /// Leading edge of a rect along this axis (left or top).
    pub fn leading(&self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.x,
            Axis::Vertical => rect.y,
        }
    }

    /// Trailing edge of a rect along this axis (right or bottom).
    pub fn trailing(&self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.right(),
            Axis::Vertical => rect.bottom(),
        }
    }

    /// Center coordinate of a rect along this axis.
    pub fn center(&self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.x + rect.width / 2.0,
            Axis::Vertical => rect.y + rect.height / 2.0,
        }
    }

    /// Extent of a rect along this axis.
    pub fn extent(&self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.width,
            Axis::Vertical => rect.height,
        }
    }
}
