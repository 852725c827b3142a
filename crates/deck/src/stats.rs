//! Derived layout statistics.

use crate::vehicle::{Vehicle, VehicleCategory};
use roro_core::Surface;
use serde::Serialize;
use std::collections::BTreeMap;

/// Read-only summary of a layout, recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutStats {
    /// Deck area in square metres.
    pub surface_area: f64,
    /// Sum of vehicle footprints.
    pub used_area: f64,
    /// `surface_area - used_area`.
    pub free_area: f64,
    /// Share of the deck covered by vehicles, 0 for an empty deck area.
    pub usage_percent: f64,
    pub vehicle_count: usize,
    pub max_vehicles: usize,
    /// Share of the vehicle limit in use.
    pub capacity_percent: f64,
    /// Vehicle count per category; categories without vehicles are absent.
    pub count_by_category: BTreeMap<VehicleCategory, usize>,
}

impl LayoutStats {
    /// Computes statistics for `vehicles` on `surface`.
    pub fn compute(surface: &Surface<f64>, vehicles: &[Vehicle], max_vehicles: usize) -> Self {
        let surface_area = surface.area();
        let used_area: f64 = vehicles.iter().map(Vehicle::area).sum();

        let mut count_by_category = BTreeMap::new();
        for vehicle in vehicles {
            *count_by_category.entry(vehicle.category).or_insert(0) += 1;
        }

        Self {
            surface_area,
            used_area,
            free_area: surface_area - used_area,
            usage_percent: percent(used_area, surface_area),
            vehicle_count: vehicles.len(),
            max_vehicles,
            capacity_percent: percent(vehicles.len() as f64, max_vehicles as f64),
            count_by_category,
        }
    }

    /// Count for one category.
    pub fn count(&self, category: VehicleCategory) -> usize {
        self.count_by_category.get(&category).copied().unwrap_or(0)
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        100.0 * part / whole
    } else {
        0.0
    }
}
