//! Minimal geometry for the output tree

/// A point in logical pixels, origin at the stack's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A circle described by its center and radius
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Circle whose bounding box starts at `left` and spans `2 * radius` from the top edge
    pub fn from_left_edge(left: f32, radius: f32) -> Self {
        Self::new(Point::new(left + radius, radius), radius)
    }

    /// Concentric circle shrunk by `amount`
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(self.center, (self.radius - amount).max(0.0))
    }

    /// Left edge of the bounding box
    pub fn left(&self) -> f32 {
        self.center.x - self.radius
    }

    /// Right edge of the bounding box
    pub fn right(&self) -> f32 {
        self.center.x + self.radius
    }

    /// Bottom edge of the bounding box
    pub fn bottom(&self) -> f32 {
        self.center.y + self.radius
    }

    pub fn contains(&self, point: Point) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_left_edge() {
        let circle = Circle::from_left_edge(20.0, 25.0);
        assert_eq!(circle.center, Point::new(45.0, 25.0));
        assert_eq!(circle.left(), 20.0);
        assert_eq!(circle.right(), 70.0);
        assert_eq!(circle.bottom(), 50.0);
    }

    #[test]
    fn test_inset_never_negative() {
        let circle = Circle::new(Point::new(0.0, 0.0), 2.0);
        assert_eq!(circle.inset(1.0).radius, 1.0);
        assert_eq!(circle.inset(5.0).radius, 0.0);
    }

    #[test]
    fn test_contains() {
        let circle = Circle::from_left_edge(0.0, 10.0);
        assert!(circle.contains(Point::new(10.0, 10.0)));
        assert!(circle.contains(Point::new(0.0, 10.0)));
        assert!(!circle.contains(Point::new(1.0, 1.0)));
    }
}
