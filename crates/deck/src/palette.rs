//! Cosmetic colour assignment for vehicles.
//!
//! Colours never influence placement.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt::Debug;

/// Colour tokens assigned to new vehicles.
pub const VEHICLE_COLORS: [&str; 12] = [
    "#FF6B6B", "#4ECDC4", "#FFD166", "#06D6A0", "#118AB2", "#EF476F", "#7209B7", "#073B4C",
    "#F72585", "#3A86FF", "#FB5607", "#8338EC",
];

/// Source of colour tokens for vehicles added without one.
pub trait ColorPicker: Debug + Send {
    fn pick(&mut self) -> String;
}

/// Picks uniformly at random from [`VEHICLE_COLORS`].
#[derive(Debug)]
pub struct RandomColor {
    rng: StdRng,
}

impl RandomColor {
    /// Seeds from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColor {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPicker for RandomColor {
    fn pick(&mut self) -> String {
        VEHICLE_COLORS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(VEHICLE_COLORS[0])
            .to_string()
    }
}

/// Always returns the same colour.
#[derive(Debug, Clone)]
pub struct FixedColor(pub String);

impl FixedColor {
    pub fn new(color: impl Into<String>) -> Self {
        Self(color.into())
    }
}

impl ColorPicker for FixedColor {
    fn pick(&mut self) -> String {
        self.0.clone()
    }
}
