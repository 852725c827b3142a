//! Placement dispatch for the configured coordinate domain.

use crate::config::{DeckConfig, PlacementDomain};
use crate::grid::LaneGrid;
use crate::vehicle::Vehicle;
use roro_core::{Footprint, ItemId, Placer, Position, Rect, RepackOutcome, Result, Surface};

/// Placement engine used by a layout store.
///
/// Free-slot searches and repacks run in the configured domain; move
/// validation is always metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckPlacer {
    metric: Placer<f64>,
    grid: Option<LaneGrid>,
}

impl DeckPlacer {
    /// Builds the placer described by `config`.
    pub fn from_config(config: &DeckConfig) -> Result<Self> {
        let metric = Placer::new(config.scan_step).with_precision(config.precision);
        let grid = match config.domain {
            PlacementDomain::Continuous => None,
            PlacementDomain::Grid { lanes, row_length } => Some(LaneGrid::new(lanes, row_length)?),
        };
        Ok(Self { metric, grid })
    }

    pub fn grid(&self) -> Option<&LaneGrid> {
        self.grid.as_ref()
    }

    /// Replaces the lane count of a grid placer; no-op for the metric domain.
    pub fn set_lanes(&mut self, lanes: u32) -> Result<()> {
        if let Some(grid) = self.grid {
            self.grid = Some(grid.with_lanes(lanes)?);
        }
        Ok(())
    }

    /// Rounds a metric coordinate to the configured precision.
    pub fn snap(&self, value: f64) -> f64 {
        self.metric.snap(value)
    }

    /// Finds a free position for `footprint` among `existing`.
    pub fn locate(
        &self,
        footprint: Footprint<f64>,
        surface: &Surface<f64>,
        existing: &[Rect<f64>],
    ) -> Option<Position<f64>> {
        match &self.grid {
            None => self.metric.find_position(footprint, surface, existing),
            Some(grid) => grid.find_position(footprint, surface, existing),
        }
    }

    /// Validates moving vehicle `id` to `target`.
    pub fn validate_move(
        &self,
        id: ItemId,
        target: &Rect<f64>,
        surface: &Surface<f64>,
        others: &[(ItemId, Rect<f64>)],
    ) -> Result<()> {
        self.metric.try_move_to(id, target, surface, others)
    }

    /// Re-places every vehicle, largest first.
    pub fn repack(&self, vehicles: Vec<Vehicle>, surface: &Surface<f64>) -> RepackOutcome<Vehicle> {
        match &self.grid {
            None => self.metric.repack_all(vehicles, surface),
            Some(grid) => grid.repack_all(vehicles, surface),
        }
    }
}
