use std::ops::Add;

/// Top-left offset of a rectangle, relative to whatever contains it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_zero(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The same size turned a quarter: width and height swapped.
    pub fn rotated(&self) -> Size {
        Size::new(self.height, self.width)
    }
}

/// A positioned rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Zone {
    pub pos: Position,
    pub size: Size,
}

impl Zone {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            pos: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.size.is_zero()
    }

    /// Check if a rectangle of `size` fits inside this zone
    pub fn contains(&self, size: Size) -> bool {
        self.size.width >= size.width && self.size.height >= size.height
    }

    pub fn right(&self) -> u32 {
        self.pos.x + self.size.width
    }

    pub fn bottom(&self) -> u32 {
        self.pos.y + self.size.height
    }

    /// Check if this zone overlaps another
    pub fn intersects(&self, other: &Zone) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}
