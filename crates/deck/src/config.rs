//! Layout store configuration.

use roro_core::{Error, Result, DEFAULT_PRECISION};
use serde::{Deserialize, Serialize};

/// Coordinate domain used to search for free slots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementDomain {
    /// Raster scan in metres with `DeckConfig::scan_step`.
    #[default]
    Continuous,
    /// Scan over a grid of `lanes` across the width and rows of
    /// `row_length` metres along the length.
    Grid { lanes: u32, row_length: f64 },
}

/// Order in which vehicles are re-validated after the deck shrinks.
///
/// The order decides which vehicles survive when space runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevalidationOrder {
    /// Oldest vehicle first.
    #[default]
    InsertionOrder,
    /// Largest footprint first, as in a repack.
    LargestFirst,
}

/// How imported layouts are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Accept bounds violations and overlaps in imported layouts.
    #[default]
    Permissive,
    /// Reject layouts that break any layout invariant.
    Strict,
}

/// Configuration for a [`LayoutStore`](crate::LayoutStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Initial deck length in metres.
    pub length: f64,

    /// Initial deck width in metres.
    pub width: f64,

    /// Maximum number of vehicles on the deck.
    pub max_vehicles: usize,

    /// Distance between scan candidates in metres (continuous domain).
    pub scan_step: f64,

    /// Decimal places stored coordinates are rounded to.
    pub precision: u32,

    /// Search domain.
    pub domain: PlacementDomain,

    /// Re-validation order used by `resize_surface`.
    pub revalidation: RevalidationOrder,

    /// Checks applied on import.
    pub import_policy: ImportPolicy,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            length: 50.0,
            width: 15.0,
            max_vehicles: 20,
            scan_step: 1.0,
            precision: DEFAULT_PRECISION,
            domain: PlacementDomain::Continuous,
            revalidation: RevalidationOrder::InsertionOrder,
            import_policy: ImportPolicy::Permissive,
        }
    }
}

impl DeckConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial deck dimensions.
    pub fn with_surface(mut self, length: f64, width: f64) -> Self {
        self.length = length;
        self.width = width;
        self
    }

    pub fn with_max_vehicles(mut self, max: usize) -> Self {
        self.max_vehicles = max;
        self
    }

    pub fn with_scan_step(mut self, step: f64) -> Self {
        self.scan_step = step;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Switches to the lane grid domain.
    pub fn with_grid(mut self, lanes: u32, row_length: f64) -> Self {
        self.domain = PlacementDomain::Grid { lanes, row_length };
        self
    }

    pub fn with_revalidation(mut self, order: RevalidationOrder) -> Self {
        self.revalidation = order;
        self
    }

    pub fn with_import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    /// Checks every value is in range.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.length) || !positive(self.width) {
            return Err(Error::InvalidConfig(format!(
                "deck dimensions must be positive, got {} x {}",
                self.length, self.width
            )));
        }
        if self.max_vehicles == 0 {
            return Err(Error::InvalidConfig("max_vehicles must be at least 1".into()));
        }
        if !positive(self.scan_step) {
            return Err(Error::InvalidConfig(format!(
                "scan_step must be positive, got {}",
                self.scan_step
            )));
        }
        // Candidates are rounded to `precision` decimals; a finer step only
        // revisits the same positions.
        let finest = 10f64.powi(-i32::try_from(self.precision).unwrap_or(i32::MAX));
        if self.scan_step < finest {
            return Err(Error::InvalidConfig(format!(
                "scan_step {} is finer than the {} decimal precision",
                self.scan_step, self.precision
            )));
        }
        if let PlacementDomain::Grid { lanes, row_length } = self.domain {
            if lanes == 0 {
                return Err(Error::InvalidConfig("grid needs at least one lane".into()));
            }
            if !positive(row_length) {
                return Err(Error::InvalidConfig(format!(
                    "row_length must be positive, got {}",
                    row_length
                )));
            }
        }
        Ok(())
    }
}
