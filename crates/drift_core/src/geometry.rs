//! Geometry primitives
//!
//! Minimal 2D types used for target layout rects and viewport math.
//! Coordinates are in logical pixels; the document origin is the top-left
//! corner with y growing downward, matching scroll conventions.

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Top edge (document y of the rect's upper boundary)
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Translate by an offset, returning a new rect
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
    }

    #[test]
    fn test_rect_translated() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).translated(5.0, -5.0);
        assert_eq!(r.origin, Point::new(5.0, -5.0));
        assert_eq!(r.size, Size::new(10.0, 10.0));
    }
}
