//! Lane grid placement domain.
//!
//! The deck width is divided into equal lanes and the length into rows of a
//! fixed pitch. Vehicles are quantized to whole cells by ceiling division of
//! their dimensions, searched for on the integer grid, and mapped back to
//! metres. Every cell the scan proposes is re-checked in metres against the
//! deck and the existing vehicles before it is accepted, so grid placements
//! obey the same bounds and overlap rules as the continuous scan.

use crate::vehicle::Vehicle;
use roro_core::{
    fits_within, Error, Footprint, Placeable, Placer, Position, Rect, RepackOutcome, Result,
    SpatialIndex, Surface,
};

use std::cmp::Ordering;

/// Slack absorbing floating point error when converting metres to cells.
const CELL_EPSILON: f64 = 1e-9;

/// A deck divided into lanes and rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneGrid {
    lanes: u32,
    row_length: f64,
    placer: Placer<i64>,
}

impl LaneGrid {
    pub fn new(lanes: u32, row_length: f64) -> Result<Self> {
        if lanes == 0 {
            return Err(Error::InvalidConfig("grid needs at least one lane".into()));
        }
        if !(row_length.is_finite() && row_length > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "row_length must be positive, got {}",
                row_length
            )));
        }
        Ok(Self {
            lanes,
            row_length,
            placer: Placer::new(1),
        })
    }

    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    pub fn row_length(&self) -> f64 {
        self.row_length
    }

    /// Same grid with a different lane count.
    pub fn with_lanes(self, lanes: u32) -> Result<Self> {
        Self::new(lanes, self.row_length)
    }

    /// Width of one lane on `surface`.
    pub fn lane_width(&self, surface: &Surface<f64>) -> f64 {
        surface.width / f64::from(self.lanes)
    }

    /// Left edge of `lane` in metres.
    ///
    /// Computed from the deck width directly so the last lane ends exactly
    /// on the deck edge.
    pub fn lane_edge(&self, lane: i64, surface: &Surface<f64>) -> f64 {
        surface.width * lane as f64 / f64::from(self.lanes)
    }

    /// The surface expressed in cells: whole rows by lanes.
    pub fn cells(&self, surface: &Surface<f64>) -> Surface<i64> {
        let rows = (surface.length / self.row_length + CELL_EPSILON).floor() as i64;
        Surface::new(rows, i64::from(self.lanes))
    }

    /// Cells spanned by a footprint, rounding each dimension up.
    pub fn span(&self, footprint: Footprint<f64>, surface: &Surface<f64>) -> Footprint<i64> {
        let lanes = ceil_cells(self.in_lanes(footprint.width, surface));
        let rows = ceil_cells(footprint.length / self.row_length);
        Footprint::new(rows, lanes)
    }

    /// Cells touched by a rectangle in metres.
    pub fn occupied(&self, rect: &Rect<f64>, surface: &Surface<f64>) -> Rect<i64> {
        let first_lane = (self.in_lanes(rect.x, surface) + CELL_EPSILON).floor() as i64;
        let last_lane = (self.in_lanes(rect.max_x(), surface) - CELL_EPSILON).ceil() as i64;
        let first_row = (rect.y / self.row_length + CELL_EPSILON).floor() as i64;
        let last_row = (rect.max_y() / self.row_length - CELL_EPSILON).ceil() as i64;
        Rect::new(
            first_lane,
            first_row,
            (last_row - first_row).max(1),
            (last_lane - first_lane).max(1),
        )
    }

    /// Metric position of a cell's top-left corner.
    pub fn to_metres(&self, cell: Position<i64>, surface: &Surface<f64>) -> Position<f64> {
        Position::new(
            self.lane_edge(cell.x, surface),
            cell.y as f64 * self.row_length,
        )
    }

    /// Finds the first free cell-aligned position for `footprint`.
    ///
    /// A cell whose metric rectangle leaves the deck or overlaps one of
    /// `existing` is skipped and the scan moves on to the next cell.
    pub fn find_position(
        &self,
        footprint: Footprint<f64>,
        surface: &Surface<f64>,
        existing: &[Rect<f64>],
    ) -> Option<Position<f64>> {
        let cells = self.cells(surface);
        let span = self.span(footprint, surface);
        let blocked: Vec<Rect<i64>> = existing
            .iter()
            .map(|rect| self.occupied(rect, surface))
            .collect();
        let metric = SpatialIndex::from_rects(existing);

        self.placer
            .find_position_where(span, &cells, &blocked, |cell| {
                let rect = footprint.at(self.to_metres(cell, surface));
                let ok = fits_within(&rect, surface) && !metric.collides(&rect);
                if !ok {
                    log::debug!("Lane cell ({}, {}) failed the metric check", cell.x, cell.y);
                }
                ok
            })
            .map(|cell| self.to_metres(cell, surface))
    }

    /// Largest-first repack on the grid.
    ///
    /// Vehicles with equal area keep their input order. Each one goes
    /// through [`LaneGrid::find_position`] against the vehicles placed
    /// before it; rejected vehicles keep their previous position.
    pub fn repack_all(&self, mut vehicles: Vec<Vehicle>, surface: &Surface<f64>) -> RepackOutcome<Vehicle> {
        vehicles.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap_or(Ordering::Equal));

        let mut placed: Vec<Vehicle> = Vec::with_capacity(vehicles.len());
        let mut placed_rects: Vec<Rect<f64>> = Vec::with_capacity(vehicles.len());
        let mut rejected = Vec::new();

        for mut vehicle in vehicles {
            let footprint = vehicle.footprint();
            match self.find_position(footprint, surface, &placed_rects) {
                Some(at) => {
                    vehicle.place_at(at);
                    placed_rects.push(footprint.at(at));
                    placed.push(vehicle);
                }
                None => {
                    log::warn!(
                        "Grid repack found no lane for vehicle {} ({}x{})",
                        vehicle.id,
                        footprint.length,
                        footprint.width
                    );
                    rejected.push(vehicle);
                }
            }
        }

        RepackOutcome { placed, rejected }
    }

    /// Converts a metric x extent to fractional lanes.
    fn in_lanes(&self, metres: f64, surface: &Surface<f64>) -> f64 {
        metres * f64::from(self.lanes) / surface.width
    }
}

fn ceil_cells(cells: f64) -> i64 {
    ((cells - CELL_EPSILON).ceil() as i64).max(1)
}
