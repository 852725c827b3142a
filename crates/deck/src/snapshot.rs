//! JSON snapshots of a layout store.
//!
//! ```json
//! {
//!   "ship_layout": { "length": 50.0, "width": 15.0 },
//!   "vehicles": [
//!     { "id": 1, "name": "Truck", "type": "truck", "length": 10.0, "width": 2.5,
//!       "x": 0.0, "y": 0.0, "color": "#FF6B6B", "icon": "🚚" }
//!   ],
//!   "next_vehicle_id": 2,
//!   "max_vehicles": 20
//! }
//! ```
//!
//! `ship_layout.lanes` is present for grid-domain stores. Import is
//! lenient: missing top-level fields keep the store's current values.

use crate::config::ImportPolicy;
use crate::store::{check_layout, LayoutStore};
use crate::vehicle::{validate_dimensions, Vehicle};
use roro_core::{Error, ItemId, Result, Surface};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Deck dimensions as written to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipLayout {
    pub length: f64,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lanes: Option<u32>,
}

/// Everything needed to rebuild a store's layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ship_layout: ShipLayout,
    pub vehicles: Vec<Vehicle>,
    pub next_vehicle_id: ItemId,
    pub max_vehicles: usize,
}

#[derive(Debug, Default, Deserialize)]
struct PartialLayout {
    length: Option<f64>,
    width: Option<f64>,
    lanes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialSnapshot {
    ship_layout: Option<PartialLayout>,
    vehicles: Option<Vec<Vehicle>>,
    next_vehicle_id: Option<ItemId>,
    max_vehicles: Option<usize>,
}

impl LayoutStore {
    /// Captures the current layout.
    pub fn export(&self) -> Snapshot {
        Snapshot {
            ship_layout: ShipLayout {
                length: self.surface.length,
                width: self.surface.width,
                lanes: self.placer.grid().map(|grid| grid.lanes()),
            },
            vehicles: self.vehicles.clone(),
            next_vehicle_id: self.next_id,
            max_vehicles: self.max_vehicles,
        }
    }

    /// Captures the current layout as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Replaces the layout with `snapshot`.
    ///
    /// The snapshot is checked as a whole before anything changes; on error
    /// the store is untouched. Under [`ImportPolicy::Permissive`] vehicles
    /// may overlap or lie outside the deck. The id counter is raised above
    /// the largest imported id, and vehicles without an icon get their
    /// category's default.
    pub fn import(&mut self, mut snapshot: Snapshot) -> Result<()> {
        let surface = Surface::new(snapshot.ship_layout.length, snapshot.ship_layout.width);
        surface
            .validate()
            .map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        if snapshot.max_vehicles == 0 {
            return Err(Error::InvalidSnapshot("max_vehicles must be at least 1".into()));
        }

        let mut ids = HashSet::with_capacity(snapshot.vehicles.len());
        for vehicle in &snapshot.vehicles {
            if !ids.insert(vehicle.id) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate vehicle id {}",
                    vehicle.id
                )));
            }
            validate_dimensions(vehicle.length, vehicle.width).map_err(|e| {
                Error::InvalidSnapshot(format!("vehicle {}: {}", vehicle.id, e))
            })?;
            if !(vehicle.x.is_finite() && vehicle.y.is_finite()) {
                return Err(Error::InvalidSnapshot(format!(
                    "vehicle {} has a non-finite position",
                    vehicle.id
                )));
            }
        }

        if self.config().import_policy == ImportPolicy::Strict {
            check_layout(&surface, &snapshot.vehicles, snapshot.max_vehicles)
                .map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        }

        let mut placer = self.placer;
        match (snapshot.ship_layout.lanes, placer.grid().is_some()) {
            (Some(lanes), true) => placer
                .set_lanes(lanes)
                .map_err(|e| Error::InvalidSnapshot(e.to_string()))?,
            (Some(lanes), false) => {
                log::debug!("Ignoring lanes = {} for a continuous deck", lanes)
            }
            (None, _) => {}
        }

        for vehicle in snapshot.vehicles.iter_mut().filter(|v| v.icon.is_empty()) {
            vehicle.icon = vehicle.category.default_icon().to_string();
        }

        let next_id = snapshot
            .vehicles
            .iter()
            .map(|v| v.id.saturating_add(1))
            .fold(snapshot.next_vehicle_id.max(1), ItemId::max);

        log::debug!(
            "Imported {} vehicles on a {}x{} deck",
            snapshot.vehicles.len(),
            surface.length,
            surface.width
        );
        self.surface = surface;
        self.vehicles = snapshot.vehicles;
        self.next_id = next_id;
        self.max_vehicles = snapshot.max_vehicles;
        self.placer = placer;
        self.selected = None;
        Ok(())
    }

    /// Parses a JSON snapshot and imports it.
    ///
    /// Missing top-level fields fall back to the store's current values;
    /// a missing `next_vehicle_id` becomes the current counter plus one.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let partial: PartialSnapshot =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        let layout = partial.ship_layout.unwrap_or_default();
        let current = self.export();

        let snapshot = Snapshot {
            ship_layout: ShipLayout {
                length: layout.length.unwrap_or(current.ship_layout.length),
                width: layout.width.unwrap_or(current.ship_layout.width),
                lanes: layout.lanes.or(current.ship_layout.lanes),
            },
            vehicles: partial.vehicles.unwrap_or(current.vehicles),
            next_vehicle_id: partial
                .next_vehicle_id
                .unwrap_or(current.next_vehicle_id.saturating_add(1)),
            max_vehicles: partial.max_vehicles.unwrap_or(current.max_vehicles),
        };
        self.import(snapshot)
    }
}
