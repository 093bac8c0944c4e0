/// Axis-aligned rectangle in world pixels, used for collisions and drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hitbox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Hitbox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    pub fn center_x(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width / 2)
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Hitbox) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Anything that occupies space on the playfield
pub trait Body {
    fn rect(&self) -> Hitbox;

    fn collides_with<B: Body + ?Sized>(&self, other: &B) -> bool {
        self.rect().intersects(&other.rect())
    }
}
