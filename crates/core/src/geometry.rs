//! Axis-aligned rectangles, surfaces and the two geometric predicates the
//! engine is built on.
//!
//! Coordinates follow the deck convention: `x` runs across the surface from
//! its left edge and is bounded by `width`; `y` runs from the front edge and
//! is bounded by `length`. Items are never rotated.

use crate::coord::Coordinate;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Footprint of an item: its extent along the surface length and width.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Footprint<C> {
    /// Extent along `y`.
    pub length: C,
    /// Extent along `x`.
    pub width: C,
}

impl<C: Coordinate> Footprint<C> {
    /// Creates a footprint.
    pub fn new(length: C, width: C) -> Self {
        Self { length, width }
    }

    /// Area covered by the footprint.
    pub fn area(&self) -> C {
        self.length * self.width
    }

    /// Returns the rectangle covered when the top-left corner is at `at`.
    pub fn at(&self, at: Position<C>) -> Rect<C> {
        Rect::new(at.x, at.y, self.length, self.width)
    }
}

/// Top-left corner of an item in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position<C> {
    pub x: C,
    pub y: C,
}

impl<C> Position<C> {
    pub fn new(x: C, y: C) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle placed on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect<C> {
    pub x: C,
    pub y: C,
    pub length: C,
    pub width: C,
}

impl<C: Coordinate> Rect<C> {
    /// Creates a rectangle from its top-left corner and footprint.
    pub fn new(x: C, y: C, length: C, width: C) -> Self {
        Self {
            x,
            y,
            length,
            width,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Position<C> {
        Position::new(self.x, self.y)
    }

    /// Length and width without the position.
    pub fn footprint(&self) -> Footprint<C> {
        Footprint::new(self.length, self.width)
    }

    /// Right edge (`x + width`).
    pub fn max_x(&self) -> C {
        self.x + self.width
    }

    /// Back edge (`y + length`).
    pub fn max_y(&self) -> C {
        self.y + self.length
    }

    pub fn area(&self) -> C {
        self.length * self.width
    }

    /// Same footprint moved to `at`.
    pub fn moved_to(&self, at: Position<C>) -> Self {
        Self::new(at.x, at.y, self.length, self.width)
    }
}

/// The bounded rectangular area items are placed on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Surface<C> {
    /// Extent along `y`.
    pub length: C,
    /// Extent along `x`.
    pub width: C,
}

impl<C: Coordinate> Surface<C> {
    /// Creates a surface without validating it; see [`Surface::validate`].
    pub fn new(length: C, width: C) -> Self {
        Self { length, width }
    }

    /// Total area of the surface.
    pub fn area(&self) -> C {
        self.length * self.width
    }

    /// Checks that both dimensions are positive.
    pub fn validate(&self) -> Result<()> {
        let zero = C::zero();
        if !(self.length > zero && self.width > zero) {
            return Err(Error::InvalidSurface(format!(
                "length and width must be positive, got {} x {}",
                self.length, self.width
            )));
        }
        if !(self.length.to_f64().is_finite() && self.width.to_f64().is_finite()) {
            return Err(Error::InvalidSurface("dimensions must be finite".into()));
        }
        Ok(())
    }

    /// Returns true if a footprint of this size fits anywhere on the surface.
    pub fn admits(&self, footprint: Footprint<C>) -> bool {
        footprint.width <= self.width && footprint.length <= self.length
    }
}

/// Returns true if the two rectangles share interior area.
///
/// Touching edges do not count as an overlap, and in the metric domain
/// neither does a sliver thinner than [`Coordinate::tolerance`]. A rectangle
/// always overlaps itself, so callers must skip self-comparison.
pub fn overlaps<C: Coordinate>(a: &Rect<C>, b: &Rect<C>) -> bool {
    let tol = C::tolerance();
    !(a.max_x() <= b.x + tol
        || b.max_x() <= a.x + tol
        || a.max_y() <= b.y + tol
        || b.max_y() <= a.y + tol)
}

/// Returns true if the rectangle lies entirely within the surface, up to
/// [`Coordinate::tolerance`].
pub fn fits_within<C: Coordinate>(rect: &Rect<C>, surface: &Surface<C>) -> bool {
    let zero = C::zero();
    let tol = C::tolerance();
    rect.x + tol >= zero
        && rect.y + tol >= zero
        && rect.max_x() <= surface.width + tol
        && rect.max_y() <= surface.length + tol
}
