//! Page boxes in default user space units

use std::fmt;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }
}

/// An axis-aligned box given by its lower-left and upper-right corners.
///
/// Used for media and crop boxes and as the coordinate frame that text and
/// drawing operations are placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub lower_left: Point,
    pub upper_right: Point,
}

impl Rectangle {
    pub fn new(lower_left: Point, upper_right: Point) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    pub fn from_coords(left: i32, bottom: i32, right: i32, top: i32) -> Self {
        Self::new(Point::new(left, bottom), Point::new(right, top))
    }

    pub fn a4() -> Self {
        Self::from_coords(0, 0, 595, 842)
    }

    pub fn a3() -> Self {
        Self::from_coords(0, 0, 842, 1191)
    }

    pub fn a2() -> Self {
        Self::from_coords(0, 0, 1191, 1684)
    }

    pub fn a1() -> Self {
        Self::from_coords(0, 0, 1684, 2384)
    }

    pub fn a0() -> Self {
        Self::from_coords(0, 0, 2384, 3370)
    }

    /// Box shrunk by the given margins (CSS order: top, right, bottom, left).
    pub fn inner_box(&self, top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self::from_coords(
            self.lower_left.x + left,
            self.lower_left.y + bottom,
            self.upper_right.x - right,
            self.upper_right.y - top,
        )
    }

    pub fn left(&self) -> i32 {
        self.lower_left.x
    }

    pub fn bottom(&self) -> i32 {
        self.lower_left.y
    }

    pub fn right(&self) -> i32 {
        self.upper_right.x
    }

    pub fn top(&self) -> i32 {
        self.upper_right.y
    }

    pub fn width(&self) -> i32 {
        self.upper_right.x - self.lower_left.x
    }

    pub fn height(&self) -> i32 {
        self.upper_right.y - self.lower_left.y
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::a4()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {}]",
            self.lower_left.x, self.lower_left.y, self.upper_right.x, self.upper_right.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let p = Point::new(10, 20);
        assert_eq!(p.x, 10);
        assert_eq!(p.y, 20);
        assert_eq!(Point::origin(), Point::new(0, 0));
    }

    #[test]
    fn test_presets() {
        assert_eq!(Rectangle::a4().to_string(), "[0 0 595 842]");
        assert_eq!(Rectangle::a3().to_string(), "[0 0 842 1191]");
        assert_eq!(Rectangle::a2().to_string(), "[0 0 1191 1684]");
        assert_eq!(Rectangle::a1().to_string(), "[0 0 1684 2384]");
        assert_eq!(Rectangle::a0().to_string(), "[0 0 2384 3370]");
        assert_eq!(Rectangle::default(), Rectangle::a4());
    }

    #[test]
    fn test_inner_box() {
        let inner = Rectangle::a4().inner_box(10, 20, 30, 40);
        assert_eq!(inner.to_string(), "[40 30 575 832]");
        assert_eq!(inner.width(), 535);
        assert_eq!(inner.height(), 802);
        assert_eq!(inner.left(), 40);
        assert_eq!(inner.top(), 832);
    }
}
