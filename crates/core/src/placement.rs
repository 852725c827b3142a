//! Raster-scan first-fit placement.
//!
//! [`Placer`] finds, validates and bulk re-assigns positions for rectangular
//! items on a [`Surface`]. It never mutates its inputs on failure: callers
//! get a position or a rejection and decide whether to commit.

use crate::coord::Coordinate;
use crate::error::ItemId;
use crate::geometry::{fits_within, Footprint, Position, Rect, Surface};
use crate::spatial_index::SpatialIndex;
use crate::{Error, Result};

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decimal places stored coordinates are rounded to by default.
pub const DEFAULT_PRECISION: u32 = 2;

/// Upper bound on the candidates a single scan visits.
pub const MAX_SCAN_CANDIDATES: usize = 50_000_000;

/// An item the engine can (re)position.
pub trait Placeable<C: Coordinate> {
    /// Id used in rejection reports.
    fn item_id(&self) -> ItemId;

    /// Current footprint of the item.
    fn footprint(&self) -> Footprint<C>;

    /// Moves the item's top-left corner.
    fn place_at(&mut self, at: Position<C>);

    /// Area used to order items before a repack (largest first).
    fn sort_area(&self) -> f64 {
        self.footprint().area().to_f64()
    }
}

/// Outcome of [`Placer::repack_all`].
#[derive(Debug, Clone)]
pub struct RepackOutcome<T> {
    /// Items that received a position, in placement order.
    pub placed: Vec<T>,
    /// Items for which the scan found no slot, in placement order.
    pub rejected: Vec<T>,
}

impl<T> RepackOutcome<T> {
    /// Returns true if every item was placed.
    pub fn all_placed(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Raster-scan placement engine over a coordinate domain.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placer<C> {
    /// Distance between candidate positions along both axes.
    step: C,
    /// Decimal places candidate coordinates are rounded to.
    precision: u32,
}

impl<C: Coordinate> Placer<C> {
    /// Creates a placer scanning with the given step.
    pub fn new(step: C) -> Self {
        Self {
            step,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Sets the decimal precision of produced coordinates.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn step(&self) -> C {
        self.step
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Rounds a coordinate to the placer's precision.
    pub fn snap(&self, value: C) -> C {
        value.snap(self.precision)
    }

    /// Finds the frontmost, then leftmost, free position for `footprint`.
    ///
    /// Candidates are scanned row-major (`y` outer, `x` inner) in multiples
    /// of the step, rounded to the configured precision, and the first one
    /// that fits on the surface without overlapping any of `existing` is
    /// returned. Returns `None` when the footprint is larger than the surface,
    /// every candidate is blocked, or the scan would exceed
    /// [`MAX_SCAN_CANDIDATES`].
    pub fn find_position(
        &self,
        footprint: Footprint<C>,
        surface: &Surface<C>,
        existing: &[Rect<C>],
    ) -> Option<Position<C>> {
        self.find_position_where(footprint, surface, existing, |_| true)
    }

    /// Like [`Placer::find_position`], but a candidate must also satisfy
    /// `accept`. A rejected candidate moves the scan on to the next one.
    pub fn find_position_where<F>(
        &self,
        footprint: Footprint<C>,
        surface: &Surface<C>,
        existing: &[Rect<C>],
        mut accept: F,
    ) -> Option<Position<C>>
    where
        F: FnMut(Position<C>) -> bool,
    {
        let (rows, cols) = match (
            C::steps_within(surface.length - footprint.length, self.step),
            C::steps_within(surface.width - footprint.width, self.step),
        ) {
            (Some(rows), Some(cols)) => (rows, cols),
            _ => {
                if self.step.partial_cmp(&C::zero()) != Some(Ordering::Greater) {
                    log::warn!("Scan step {} is not positive, nothing to scan", self.step);
                }
                return None;
            }
        };

        let candidates = rows
            .checked_add(1)
            .zip(cols.checked_add(1))
            .and_then(|(r, c)| r.checked_mul(c));
        match candidates {
            Some(n) if n <= MAX_SCAN_CANDIDATES => {}
            _ => {
                log::warn!(
                    "Scan step {} is too fine for a {}x{} surface, giving up",
                    self.step,
                    surface.length,
                    surface.width
                );
                return None;
            }
        }

        let index = SpatialIndex::from_rects(existing);
        let mut scanned = 0usize;

        for row in 0..=rows {
            let y = self.snap(self.step.scaled(row));
            for col in 0..=cols {
                let x = self.snap(self.step.scaled(col));
                scanned += 1;
                let at = Position::new(x, y);
                let candidate = footprint.at(at);
                if fits_within(&candidate, surface) && !index.collides(&candidate) && accept(at) {
                    log::debug!(
                        "Placed {}x{} at ({}, {}) after {} candidates",
                        footprint.length,
                        footprint.width,
                        x,
                        y,
                        scanned
                    );
                    return Some(at);
                }
            }
        }

        None
    }

    /// Validates moving item `id` to `target` against the surface and
    /// every other item.
    ///
    /// Bounds are checked before collisions, so a target that is both out
    /// of bounds and colliding is reported as [`Error::OutOfBounds`]. The
    /// caller commits the new position only on `Ok`.
    pub fn try_move_to(
        &self,
        id: ItemId,
        target: &Rect<C>,
        surface: &Surface<C>,
        others: &[(ItemId, Rect<C>)],
    ) -> Result<()> {
        if !fits_within(target, surface) {
            return Err(Error::OutOfBounds {
                id,
                x: target.x.to_f64(),
                y: target.y.to_f64(),
            });
        }

        let mut index = SpatialIndex::new();
        for &(other_id, rect) in others.iter().filter(|(other_id, _)| *other_id != id) {
            index.insert(other_id, rect);
        }
        match index.first_collision(target) {
            Some(other) => Err(Error::Collision { id, other }),
            None => Ok(()),
        }
    }

    /// Clears and re-places every item, largest area first.
    ///
    /// Items with equal area keep their input order. Each item is placed
    /// with [`Placer::find_position`] against the items placed before it;
    /// items that find no slot are returned in `rejected` with their
    /// original positions untouched.
    pub fn repack_all<T: Placeable<C>>(
        &self,
        mut items: Vec<T>,
        surface: &Surface<C>,
    ) -> RepackOutcome<T> {
        items.sort_by(|a, b| {
            b.sort_area()
                .partial_cmp(&a.sort_area())
                .unwrap_or(Ordering::Equal)
        });

        let mut placed: Vec<T> = Vec::with_capacity(items.len());
        let mut placed_rects: Vec<Rect<C>> = Vec::with_capacity(items.len());
        let mut rejected = Vec::new();

        for mut item in items {
            let footprint = item.footprint();
            match self.find_position(footprint, surface, &placed_rects) {
                Some(at) => {
                    item.place_at(at);
                    placed_rects.push(footprint.at(at));
                    placed.push(item);
                }
                None => {
                    log::warn!(
                        "Repack found no space for item {} ({}x{})",
                        item.item_id(),
                        footprint.length,
                        footprint.width
                    );
                    rejected.push(item);
                }
            }
        }

        RepackOutcome { placed, rejected }
    }
}
