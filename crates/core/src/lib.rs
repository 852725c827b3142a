//! # Ro-Ro Core
//!
//! Geometry and placement engine for laying out rectangular items on a
//! bounded rectangular surface, such as vehicles on a ship deck.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Rect`], [`Footprint`], [`Surface`] with the
//!   [`overlaps`] and [`fits_within`] predicates
//! - **Coordinates**: [`Coordinate`], implemented for continuous metres
//!   (`f64`) and grid cells (`i64`)
//! - **Placement**: [`Placer`] - raster-scan first-fit search, move
//!   validation and largest-first repacking
//! - **Spatial index**: [`SpatialIndex`] - R*-tree broad phase for
//!   collision queries
//!
//! ## Example
//!
//! ```rust
//! use roro_core::{Footprint, Placer, Position, Rect, Surface};
//!
//! let deck = Surface::new(50.0, 15.0);
//! let placer = Placer::new(0.5);
//!
//! let truck = Rect::new(0.0, 0.0, 10.0, 2.5);
//! let at = placer.find_position(Footprint::new(10.0, 2.5), &deck, &[truck]);
//! assert_eq!(at, Some(Position::new(2.5, 0.0)));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod coord;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod spatial_index;

// Re-exports
pub use coord::{Coordinate, GEOMETRY_EPSILON};
pub use error::{Error, ItemId, Result};
pub use geometry::{fits_within, overlaps, Footprint, Position, Rect, Surface};
pub use placement::{Placeable, Placer, RepackOutcome, DEFAULT_PRECISION, MAX_SCAN_CANDIDATES};
pub use spatial_index::{SpatialEntry, SpatialIndex};
