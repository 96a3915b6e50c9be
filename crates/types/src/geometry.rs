/// An axis-aligned box in layout space (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrinks the box horizontally by `padding` on both sides.
    pub fn inset_x(&self, padding: f32) -> Self {
        let width = (self.width - 2.0 * padding).max(0.0);
        Self { x: self.x + padding, y: self.y, width, height: self.height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// ISO A4 portrait in PDF points.
    pub fn a4() -> Self {
        Self::new(595.28, 841.89)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn test_inset_never_goes_negative() {
        let r = Rect::new(0.0, 0.0, 6.0, 10.0).inset_x(4.0);
        assert_eq!(r.x, 4.0);
        assert_eq!(r.width, 0.0);
    }
}
