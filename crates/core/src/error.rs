//! Error types shared by the placement engine and the layout store.

use thiserror::Error;

/// Identifier of an item placed on a surface.
pub type ItemId = u64;

/// Errors reported by placement and layout operations.
///
/// Every variant is recoverable: a failed operation leaves the state it was
/// applied to unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The scan found no free slot for an item of the given footprint.
    #[error("no space available for an item of {length}m x {width}m")]
    NoSpaceAvailable { length: f64, width: f64 },

    /// The configured maximum item count has been reached.
    #[error("capacity exceeded: at most {max} items allowed")]
    CapacityExceeded { max: usize },

    /// A move target would put the item (partly) outside the surface.
    #[error("item {id} at ({x}, {y}) would leave the surface")]
    OutOfBounds { id: ItemId, x: f64, y: f64 },

    /// A move target would overlap another item.
    #[error("item {id} would collide with item {other}")]
    Collision { id: ItemId, other: ItemId },

    /// A snapshot could not be parsed or lacks required structure.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// No item with the given id exists.
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// Item dimensions are not positive finite numbers.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Surface dimensions are not positive finite numbers.
    #[error("invalid surface: {0}")]
    InvalidSurface(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;
