//! The layout store: sole owner of the deck and its vehicles.
//!
//! Every mutation goes through [`LayoutStore`], which checks before it
//! commits. A failed operation returns an [`Error`] and leaves the store
//! exactly as it was. The one deliberate exception is
//! [`LayoutStore::resize_surface`], which evicts vehicles that no longer fit
//! anywhere and reports them.

use crate::config::{DeckConfig, RevalidationOrder};
use crate::engine::DeckPlacer;
use crate::palette::{ColorPicker, RandomColor};
use crate::stats::LayoutStats;
use crate::vehicle::{validate_dimensions, Direction, Vehicle, VehiclePreset, VehicleSpec};
use roro_core::{
    fits_within, overlaps, Error, Footprint, ItemId, Position, Rect, Result, SpatialIndex, Surface,
};
use std::cmp::Ordering;
use std::collections::HashSet;

/// A vehicle moved by a resize.
#[derive(Debug, Clone, PartialEq)]
pub struct Relocation {
    pub id: ItemId,
    pub from: Position<f64>,
    pub to: Position<f64>,
}

/// Outcome of [`LayoutStore::resize_surface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResizeReport {
    /// Vehicles that had to move, in re-validation order.
    pub relocated: Vec<Relocation>,
    /// Vehicles removed because no position was left for them.
    pub evicted: Vec<Vehicle>,
}

impl ResizeReport {
    /// Returns true if no vehicle was moved or removed.
    pub fn is_clean(&self) -> bool {
        self.relocated.is_empty() && self.evicted.is_empty()
    }
}

/// Changes applied by [`LayoutStore::edit_vehicle`]. `None` keeps the
/// current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleEdit {
    pub name: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
}

impl VehicleEdit {
    /// An edit changing both dimensions.
    pub fn resize(length: f64, width: f64) -> Self {
        Self {
            name: None,
            length: Some(length),
            width: Some(width),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Where an edited vehicle ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    /// The new footprint fits at the old position.
    InPlace,
    /// The vehicle was moved to make the new footprint fit.
    Relocated {
        from: Position<f64>,
        to: Position<f64>,
    },
}

/// Outcome of [`LayoutStore::repack`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepackReport {
    /// Ids of the re-placed vehicles, in placement order.
    pub placed: Vec<ItemId>,
    /// Vehicles removed because the repack found no slot for them.
    pub rejected: Vec<Vehicle>,
}

/// The deck, its vehicles and the session state around them.
#[derive(Debug)]
pub struct LayoutStore {
    config: DeckConfig,
    pub(crate) surface: Surface<f64>,
    pub(crate) vehicles: Vec<Vehicle>,
    pub(crate) next_id: ItemId,
    pub(crate) max_vehicles: usize,
    pub(crate) selected: Option<ItemId>,
    pub(crate) placer: DeckPlacer,
    colors: Box<dyn ColorPicker>,
}

impl LayoutStore {
    /// Creates an empty store. Colours are picked at random.
    pub fn new(config: DeckConfig) -> Result<Self> {
        config.validate()?;
        let surface = Surface::new(config.length, config.width);
        let placer = DeckPlacer::from_config(&config)?;
        Ok(Self {
            surface,
            vehicles: Vec::new(),
            next_id: 1,
            max_vehicles: config.max_vehicles,
            selected: None,
            placer,
            colors: Box::new(RandomColor::new()),
            config,
        })
    }

    /// Replaces the colour source for vehicles added without a colour.
    pub fn with_color_picker(mut self, picker: impl ColorPicker + 'static) -> Self {
        self.colors = Box::new(picker);
        self
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn surface(&self) -> Surface<f64> {
        self.surface
    }

    /// Vehicles in store order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn get(&self, id: ItemId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Id the next added vehicle will receive.
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    pub fn max_vehicles(&self) -> usize {
        self.max_vehicles
    }

    pub fn placer(&self) -> &DeckPlacer {
        &self.placer
    }

    /// Places a new vehicle at the first free slot and returns its id.
    ///
    /// Fails with [`Error::CapacityExceeded`] when the store is full and
    /// with [`Error::NoSpaceAvailable`] when the scan finds no slot. Ids are
    /// only consumed by successful adds.
    pub fn add_vehicle(&mut self, mut spec: VehicleSpec) -> Result<ItemId> {
        spec.validate()?;
        if self.vehicles.len() >= self.max_vehicles {
            return Err(Error::CapacityExceeded {
                max: self.max_vehicles,
            });
        }

        let at = self
            .placer
            .locate(spec.footprint(), &self.surface, &self.rects())
            .ok_or(Error::NoSpaceAvailable {
                length: spec.length,
                width: spec.width,
            })?;

        let id = self.next_id;
        self.next_id += 1;
        let color = match spec.color.take() {
            Some(color) => color,
            None => self.colors.pick(),
        };
        let vehicle = Vehicle::from_spec(id, spec, at, color);
        log::debug!(
            "Added vehicle {} ({}) at ({}, {})",
            id,
            vehicle.category,
            vehicle.x,
            vehicle.y
        );
        self.vehicles.push(vehicle);
        Ok(id)
    }

    /// Adds a vehicle of a standard size.
    pub fn add_preset(&mut self, preset: VehiclePreset) -> Result<ItemId> {
        self.add_vehicle(preset.spec())
    }

    /// Removes a vehicle. Returns `None` if the id is unknown.
    pub fn remove_vehicle(&mut self, id: ItemId) -> Option<Vehicle> {
        let index = self.vehicles.iter().position(|v| v.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.vehicles.remove(index))
    }

    /// Moves a vehicle to an absolute position.
    ///
    /// The target is rounded to the configured precision, then checked for
    /// bounds and then for collisions with every other vehicle.
    pub fn move_vehicle(&mut self, id: ItemId, x: f64, y: f64) -> Result<()> {
        let index = self.index_of(id)?;
        let at = Position::new(self.placer.snap(x), self.placer.snap(y));
        let target = self.vehicles[index].rect().moved_to(at);
        let others: Vec<(ItemId, Rect<f64>)> =
            self.vehicles.iter().map(|v| (v.id, v.rect())).collect();

        self.placer
            .validate_move(id, &target, &self.surface, &others)?;

        let vehicle = &mut self.vehicles[index];
        vehicle.x = at.x;
        vehicle.y = at.y;
        Ok(())
    }

    /// Moves a vehicle by `distance` metres in `direction`.
    pub fn nudge(&mut self, id: ItemId, direction: Direction, distance: f64) -> Result<()> {
        let index = self.index_of(id)?;
        let (dx, dy) = direction.delta(distance);
        let vehicle = &self.vehicles[index];
        let (x, y) = (vehicle.x + dx, vehicle.y + dy);
        self.move_vehicle(id, x, y)
    }

    /// Changes the deck dimensions and re-validates every vehicle.
    ///
    /// Vehicles are visited in the configured [`RevalidationOrder`]. One
    /// that no longer fits is moved to the first free slot among the
    /// remaining vehicles, or evicted if there is none. Vehicles that still
    /// fit are never moved.
    pub fn resize_surface(&mut self, length: f64, width: f64) -> Result<ResizeReport> {
        let surface = Surface::new(length, width);
        surface.validate()?;
        self.surface = surface;

        let mut report = ResizeReport::default();
        for id in self.revalidation_order() {
            let Some(index) = self.vehicles.iter().position(|v| v.id == id) else {
                continue;
            };
            let rect = self.vehicles[index].rect();
            if fits_within(&rect, &self.surface) {
                continue;
            }

            let others: Vec<Rect<f64>> = self
                .vehicles
                .iter()
                .filter(|v| v.id != id)
                .map(Vehicle::rect)
                .collect();
            match self.placer.locate(rect.footprint(), &self.surface, &others) {
                Some(to) => {
                    log::debug!(
                        "Resize moved vehicle {} from ({}, {}) to ({}, {})",
                        id,
                        rect.x,
                        rect.y,
                        to.x,
                        to.y
                    );
                    let vehicle = &mut self.vehicles[index];
                    vehicle.x = to.x;
                    vehicle.y = to.y;
                    report.relocated.push(Relocation {
                        id,
                        from: rect.origin(),
                        to,
                    });
                }
                None => {
                    log::warn!(
                        "Evicted vehicle {} ({}x{}): no space on {}x{} deck",
                        id,
                        rect.length,
                        rect.width,
                        length,
                        width
                    );
                    if self.selected == Some(id) {
                        self.selected = None;
                    }
                    report.evicted.push(self.vehicles.remove(index));
                }
            }
        }
        Ok(report)
    }

    /// Changes a vehicle's dimensions and/or name.
    ///
    /// If the new footprint fits at the current position the vehicle stays;
    /// otherwise it is moved to the first free slot among the other
    /// vehicles. When neither works the edit fails with
    /// [`Error::NoSpaceAvailable`] and nothing changes.
    pub fn edit_vehicle(&mut self, id: ItemId, edit: VehicleEdit) -> Result<EditOutcome> {
        let index = self.index_of(id)?;
        let current = &self.vehicles[index];
        let length = edit.length.unwrap_or(current.length);
        let width = edit.width.unwrap_or(current.width);
        validate_dimensions(length, width)?;

        let footprint = Footprint::new(length, width);
        let candidate = footprint.at(current.position());
        let others: Vec<Rect<f64>> = self
            .vehicles
            .iter()
            .filter(|v| v.id != id)
            .map(Vehicle::rect)
            .collect();

        let outcome = if fits_within(&candidate, &self.surface)
            && !others.iter().any(|other| overlaps(other, &candidate))
        {
            EditOutcome::InPlace
        } else {
            let to = self
                .placer
                .locate(footprint, &self.surface, &others)
                .ok_or(Error::NoSpaceAvailable { length, width })?;
            EditOutcome::Relocated {
                from: current.position(),
                to,
            }
        };

        let vehicle = &mut self.vehicles[index];
        vehicle.length = length;
        vehicle.width = width;
        if let Some(name) = edit.name {
            vehicle.name = name;
        }
        if let EditOutcome::Relocated { to, .. } = outcome {
            log::debug!("Edit moved vehicle {} to ({}, {})", id, to.x, to.y);
            vehicle.x = to.x;
            vehicle.y = to.y;
        }
        Ok(outcome)
    }

    /// Clears the deck and re-places every vehicle, largest first.
    ///
    /// Vehicles the repack cannot place are removed and returned. The store
    /// order becomes the placement order.
    pub fn repack(&mut self) -> RepackReport {
        let vehicles = std::mem::take(&mut self.vehicles);
        let outcome = self.placer.repack(vehicles, &self.surface);

        self.vehicles = outcome.placed;
        if let Some(selected) = self.selected {
            if outcome.rejected.iter().any(|v| v.id == selected) {
                self.selected = None;
            }
        }
        RepackReport {
            placed: self.vehicles.iter().map(|v| v.id).collect(),
            rejected: outcome.rejected,
        }
    }

    /// Removes every vehicle and returns how many there were. Ids already
    /// handed out are not reused.
    pub fn clear(&mut self) -> usize {
        let count = self.vehicles.len();
        self.vehicles.clear();
        self.selected = None;
        count
    }

    /// Marks a vehicle as selected.
    pub fn select(&mut self, id: ItemId) -> Result<()> {
        self.index_of(id)?;
        self.selected = Some(id);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Vehicle> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Changes the vehicle limit. It cannot drop below the current count.
    pub fn set_max_vehicles(&mut self, max: usize) -> Result<()> {
        if max == 0 {
            return Err(Error::InvalidConfig("max_vehicles must be at least 1".into()));
        }
        if max < self.vehicles.len() {
            return Err(Error::CapacityExceeded { max });
        }
        self.max_vehicles = max;
        Ok(())
    }

    pub fn stats(&self) -> LayoutStats {
        LayoutStats::compute(&self.surface, &self.vehicles, self.max_vehicles)
    }

    /// Verifies the layout invariants, reporting the first violation.
    pub fn check_invariants(&self) -> Result<()> {
        check_layout(&self.surface, &self.vehicles, self.max_vehicles)
    }

    fn index_of(&self, id: ItemId) -> Result<usize> {
        self.vehicles
            .iter()
            .position(|v| v.id == id)
            .ok_or(Error::NotFound(id))
    }

    fn rects(&self) -> Vec<Rect<f64>> {
        self.vehicles.iter().map(Vehicle::rect).collect()
    }

    fn revalidation_order(&self) -> Vec<ItemId> {
        let mut order: Vec<&Vehicle> = self.vehicles.iter().collect();
        match self.config.revalidation {
            RevalidationOrder::InsertionOrder => order.sort_by_key(|v| v.id),
            RevalidationOrder::LargestFirst => order.sort_by(|a, b| {
                b.area()
                    .partial_cmp(&a.area())
                    .unwrap_or(Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            }),
        }
        order.into_iter().map(|v| v.id).collect()
    }
}

/// Checks capacity, id uniqueness, bounds and pairwise overlap.
pub fn check_layout(surface: &Surface<f64>, vehicles: &[Vehicle], max_vehicles: usize) -> Result<()> {
    if vehicles.len() > max_vehicles {
        return Err(Error::CapacityExceeded { max: max_vehicles });
    }

    let mut ids = HashSet::with_capacity(vehicles.len());
    for vehicle in vehicles {
        if !ids.insert(vehicle.id) {
            return Err(Error::InvalidSnapshot(format!(
                "duplicate vehicle id {}",
                vehicle.id
            )));
        }
    }

    let mut index = SpatialIndex::new();
    for vehicle in vehicles {
        let rect = vehicle.rect();
        if !fits_within(&rect, surface) {
            return Err(Error::OutOfBounds {
                id: vehicle.id,
                x: vehicle.x,
                y: vehicle.y,
            });
        }
        if let Some(other) = index.first_collision(&rect) {
            return Err(Error::Collision {
                id: vehicle.id,
                other,
            });
        }
        index.insert(vehicle.id, rect);
    }
    Ok(())
}
