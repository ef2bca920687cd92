//! Structures used to map areas on the screen

use std::fmt;

// =============================== Point ==============================
// ====================================================================

/// A position on the screen. When this is used with a [`Rectangle`], it
/// represents the top-left corner
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Point {
    /// X-coordinate
    pub(crate) x: i32,
    /// Y-coordinate
    pub(crate) y: i32,
}

impl Point {
    /// The origin, `(0, 0)`
    pub(crate) const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new [`Point`]
    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x: {}, y: {}", self.x, self.y)
    }
}

// ============================= Dimension ============================
// ====================================================================

/// An a `width` and a `height`. An `area` of a [`Rectangle`]`
#[derive(Debug, Default, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub(crate) struct Dimension {
    /// The width of the [`Rectangle`]
    pub(crate) width:  u32,
    /// The height of the [`Rectangle`]
    pub(crate) height: u32,
}

impl Dimension {
    /// Create a new [`Dimension`]
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "width: {}, height: {}", self.width, self.height)
    }
}

// ============================= Rectangle ============================
// ====================================================================

/// A [`Point`] paired with a [`Dimension`]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Rectangle {
    /// Top-left corner
    pub(crate) point:     Point,
    /// Width and height
    pub(crate) dimension: Dimension,
}

impl Rectangle {
    /// Create a new [`Rectangle`]
    pub(crate) const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            point:     Point::new(x, y),
            dimension: Dimension::new(width, height),
        }
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}), ({})", self.point, self.dimension)
    }
}
