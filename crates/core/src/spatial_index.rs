//! Broad-phase collision queries over placed rectangles using an R*-tree.
//!
//! The tree returns every rectangle whose envelope intersects the query,
//! including ones that merely touch it; [`SpatialIndex::first_collision`]
//! then applies the exact [`overlaps`] test.

use crate::coord::Coordinate;
use crate::error::ItemId;
use crate::geometry::{overlaps, Rect};
use rstar::{RTree, RTreeObject, AABB};

/// A placed rectangle stored in the index.
#[derive(Debug, Clone)]
pub struct SpatialEntry<C: Coordinate> {
    /// Id of the item owning the rectangle.
    pub id: ItemId,
    pub rect: Rect<C>,
}

impl<C: Coordinate> SpatialEntry<C> {
    pub fn new(id: ItemId, rect: Rect<C>) -> Self {
        Self { id, rect }
    }
}

impl<C: Coordinate> RTreeObject for SpatialEntry<C> {
    type Envelope = AABB<[C; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope_of(&self.rect)
    }
}

fn envelope_of<C: Coordinate>(rect: &Rect<C>) -> AABB<[C; 2]> {
    AABB::from_corners([rect.x, rect.y], [rect.max_x(), rect.max_y()])
}

/// R*-tree over placed rectangles.
#[derive(Debug)]
pub struct SpatialIndex<C: Coordinate> {
    tree: RTree<SpatialEntry<C>>,
}

impl<C: Coordinate> SpatialIndex<C> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-loads an index from existing entries.
    pub fn with_entries(entries: Vec<SpatialEntry<C>>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Builds an index from anonymous rectangles; ids are their slice indices.
    pub fn from_rects(rects: &[Rect<C>]) -> Self {
        let entries = rects
            .iter()
            .enumerate()
            .map(|(i, rect)| SpatialEntry::new(i as ItemId, *rect))
            .collect();
        Self::with_entries(entries)
    }

    pub fn insert(&mut self, id: ItemId, rect: Rect<C>) {
        self.tree.insert(SpatialEntry::new(id, rect));
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Entries whose envelopes intersect or touch `rect`.
    pub fn candidates(&self, rect: &Rect<C>) -> Vec<&SpatialEntry<C>> {
        self.tree
            .locate_in_envelope_intersecting(&envelope_of(rect))
            .collect()
    }

    /// Returns the smallest id among entries that truly overlap `rect`.
    ///
    /// The smallest id is reported so the answer does not depend on the
    /// tree's internal ordering.
    pub fn first_collision(&self, rect: &Rect<C>) -> Option<ItemId> {
        self.candidates(rect)
            .into_iter()
            .filter(|entry| overlaps(&entry.rect, rect))
            .map(|entry| entry.id)
            .min()
    }

    /// Returns true if `rect` overlaps any indexed rectangle.
    pub fn collides(&self, rect: &Rect<C>) -> bool {
        self.tree
            .locate_in_envelope_intersecting(&envelope_of(rect))
            .any(|entry| overlaps(&entry.rect, rect))
    }
}

impl<C: Coordinate> Default for SpatialIndex<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_entries_are_candidates_but_not_collisions() {
        let mut index = SpatialIndex::new();
        index.insert(1, Rect::new(0.0, 0.0, 10.0, 2.5));

        let neighbour = Rect::new(2.5, 0.0, 10.0, 2.5);
        assert_eq!(index.candidates(&neighbour).len(), 1);
        assert!(!index.collides(&neighbour));
        assert_eq!(index.first_collision(&neighbour), None);
    }

    #[test]
    fn test_first_collision_reports_smallest_id() {
        let mut index = SpatialIndex::new();
        index.insert(9, Rect::new(0.0, 0.0, 5.0, 5.0));
        index.insert(4, Rect::new(4.0, 4.0, 5.0, 5.0));
        index.insert(2, Rect::new(20.0, 20.0, 1.0, 1.0));

        let probe = Rect::new(3.0, 3.0, 3.0, 3.0);
        assert_eq!(index.first_collision(&probe), Some(4));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_from_rects_uses_indices() {
        let rects = vec![Rect::new(0_i64, 0, 2, 2), Rect::new(2, 0, 2, 2)];
        let index = SpatialIndex::from_rects(&rects);
        assert_eq!(index.first_collision(&Rect::new(3, 1, 1, 1)), Some(1));
        assert!(!index.collides(&Rect::new(0, 2, 1, 4)));
        assert!(!index.is_empty());
    }
}
