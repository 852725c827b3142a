//! # Ro-Ro Deck
//!
//! Vehicle layouts for roll-on/roll-off ship decks, built on the
//! [`roro_core`] placement engine.
//!
//! ## Core Components
//!
//! - **Store**: [`LayoutStore`] - owns the deck and its vehicles; add, move,
//!   nudge, edit, resize, repack and clear with invariant checks
//! - **Vehicles**: [`Vehicle`], [`VehicleSpec`], [`VehicleCategory`] and the
//!   standard [`VehiclePreset`] sizes
//! - **Domains**: [`DeckPlacer`] dispatching to the continuous scan or the
//!   [`LaneGrid`]
//! - **Statistics**: [`LayoutStats`]
//! - **Snapshots**: [`Snapshot`] JSON export and lenient import
//! - **Configuration**: [`DeckConfig`]
//!
//! ## Example
//!
//! ```rust
//! use roro_deck::{DeckConfig, FixedColor, LayoutStore, VehiclePreset};
//!
//! let mut store = LayoutStore::new(DeckConfig::new().with_scan_step(0.5))
//!     .unwrap()
//!     .with_color_picker(FixedColor::new("#3A86FF"));
//!
//! let first = store.add_preset(VehiclePreset::Truck).unwrap();
//! let second = store.add_preset(VehiclePreset::Truck).unwrap();
//!
//! assert_eq!(store.get(first).unwrap().x, 0.0);
//! assert_eq!(store.get(second).unwrap().x, 2.5);
//! assert!(store.check_invariants().is_ok());
//! ```

pub mod config;
pub mod engine;
pub mod grid;
pub mod palette;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod vehicle;

// Re-exports
pub use config::{DeckConfig, ImportPolicy, PlacementDomain, RevalidationOrder};
pub use engine::DeckPlacer;
pub use grid::LaneGrid;
pub use palette::{ColorPicker, FixedColor, RandomColor, VEHICLE_COLORS};
pub use snapshot::{ShipLayout, Snapshot};
pub use stats::LayoutStats;
pub use store::{
    check_layout, EditOutcome, LayoutStore, Relocation, RepackReport, ResizeReport, VehicleEdit,
};
pub use vehicle::{Direction, Vehicle, VehicleCategory, VehiclePreset, VehicleSpec};

pub use roro_core::{Error, ItemId, Result};
