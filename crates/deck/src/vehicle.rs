//! Vehicle types and presets.

use roro_core::{Error, Footprint, ItemId, Placeable, Position, Rect, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle category.
///
/// Serialized as the short tags used in layout files. Unknown tags read as
/// [`VehicleCategory::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleCategory {
    /// Motorcycles and scooters.
    Light2Wheel,
    /// Compact passenger cars.
    SmallVehicle,
    /// Larger passenger cars and vans.
    MediumVehicle,
    /// Trucks and lorries.
    HeavyVehicle,
    Bus,
    #[default]
    Custom,
}

impl VehicleCategory {
    /// All categories, in display order.
    pub const ALL: [VehicleCategory; 6] = [
        VehicleCategory::Light2Wheel,
        VehicleCategory::SmallVehicle,
        VehicleCategory::MediumVehicle,
        VehicleCategory::HeavyVehicle,
        VehicleCategory::Bus,
        VehicleCategory::Custom,
    ];

    /// Tag written to layout files.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Light2Wheel => "motor",
            Self::SmallVehicle => "car",
            Self::MediumVehicle => "medium_car",
            Self::HeavyVehicle => "truck",
            Self::Bus => "bus",
            Self::Custom => "custom",
        }
    }

    /// Parses a tag, case-insensitively. Unknown tags map to `Custom`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "motor" => Self::Light2Wheel,
            "car" => Self::SmallVehicle,
            "medium_car" => Self::MediumVehicle,
            "truck" => Self::HeavyVehicle,
            "bus" => Self::Bus,
            _ => Self::Custom,
        }
    }

    /// Icon token shown for vehicles of this category unless overridden.
    pub fn default_icon(&self) -> &'static str {
        match self {
            Self::Light2Wheel => "🏍️",
            Self::SmallVehicle => "🚗",
            Self::MediumVehicle => "🚙",
            Self::HeavyVehicle => "🚚",
            Self::Bus => "🚌",
            Self::Custom => "🚙",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl From<String> for VehicleCategory {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<VehicleCategory> for String {
    fn from(category: VehicleCategory) -> Self {
        category.tag().to_string()
    }
}

/// Standard vehicle sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehiclePreset {
    /// 2.0m x 0.8m
    Motor,
    /// 4.5m x 1.8m
    SmallCar,
    /// 5.0m x 2.0m
    MediumCar,
    /// 10.0m x 2.5m
    Truck,
    /// 12.0m x 2.5m
    Bus,
}

impl VehiclePreset {
    pub const ALL: [VehiclePreset; 5] = [
        VehiclePreset::Motor,
        VehiclePreset::SmallCar,
        VehiclePreset::MediumCar,
        VehiclePreset::Truck,
        VehiclePreset::Bus,
    ];

    /// Builds the spec for this preset.
    pub fn spec(&self) -> VehicleSpec {
        let (name, category, length, width) = match self {
            Self::Motor => ("Motor", VehicleCategory::Light2Wheel, 2.0, 0.8),
            Self::SmallCar => ("Small car", VehicleCategory::SmallVehicle, 4.5, 1.8),
            Self::MediumCar => ("Medium car", VehicleCategory::MediumVehicle, 5.0, 2.0),
            Self::Truck => ("Truck", VehicleCategory::HeavyVehicle, 10.0, 2.5),
            Self::Bus => ("Bus", VehicleCategory::Bus, 12.0, 2.5),
        };
        VehicleSpec::new(name, category, length, width)
    }
}

/// Request to add a vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSpec {
    pub name: String,
    pub category: VehicleCategory,
    pub length: f64,
    pub width: f64,
    /// Colour token; picked from the palette when `None`.
    pub color: Option<String>,
    /// Icon token; the category default when `None`.
    pub icon: Option<String>,
}

impl VehicleSpec {
    pub fn new(name: impl Into<String>, category: VehicleCategory, length: f64, width: f64) -> Self {
        Self {
            name: name.into(),
            category,
            length,
            width,
            color: None,
            icon: None,
        }
    }

    /// Sets an explicit colour token.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets an explicit icon token.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn footprint(&self) -> Footprint<f64> {
        Footprint::new(self.length, self.width)
    }

    /// Checks that both dimensions are positive and finite.
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.length, self.width)
    }
}

pub(crate) fn validate_dimensions(length: f64, width: f64) -> Result<()> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(length) || !valid(width) {
        return Err(Error::InvalidGeometry(format!(
            "length and width must be positive, got {} x {}",
            length, width
        )));
    }
    Ok(())
}

/// A vehicle placed on the deck.
///
/// Field names match the layout file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: VehicleCategory,
    pub length: f64,
    pub width: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

impl Vehicle {
    /// Builds a placed vehicle from a spec and a resolved colour.
    pub fn from_spec(id: ItemId, spec: VehicleSpec, at: Position<f64>, color: String) -> Self {
        let icon = spec
            .icon
            .unwrap_or_else(|| spec.category.default_icon().to_string());
        Self {
            id,
            name: spec.name,
            category: spec.category,
            length: spec.length,
            width: spec.width,
            x: at.x,
            y: at.y,
            color,
            icon,
        }
    }

    pub fn rect(&self) -> Rect<f64> {
        Rect::new(self.x, self.y, self.length, self.width)
    }

    pub fn position(&self) -> Position<f64> {
        Position::new(self.x, self.y)
    }

    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

impl Placeable<f64> for Vehicle {
    fn item_id(&self) -> ItemId {
        self.id
    }

    fn footprint(&self) -> Footprint<f64> {
        Footprint::new(self.length, self.width)
    }

    fn place_at(&mut self, at: Position<f64>) {
        self.x = at.x;
        self.y = at.y;
    }
}

/// Direction of a relative move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the back of the deck (+y).
    Forward,
    /// Towards the front edge (-y).
    Back,
    /// Towards the left edge (-x).
    Left,
    /// Towards the right edge (+x).
    Right,
}

impl Direction {
    /// Offset `(dx, dy)` of a move of `distance` metres.
    pub fn delta(&self, distance: f64) -> (f64, f64) {
        match self {
            Self::Forward => (0.0, distance),
            Self::Back => (0.0, -distance),
            Self::Left => (-distance, 0.0),
            Self::Right => (distance, 0.0),
        }
    }
}
