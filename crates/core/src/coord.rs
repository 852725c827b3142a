//! Coordinate domains for the placement engine.
//!
//! The engine runs either in continuous metres (`f64`) or on an integer cell
//! grid (`i64`). Both share the same scan, bounds and overlap rules; the
//! [`Coordinate`] trait captures the few operations where they differ.

use rstar::RTreeNum;
use std::fmt::{Debug, Display};

/// Tolerance used when counting how many scan steps fit into a span.
const STEP_EPSILON: f64 = 1e-9;

/// Edges closer than this count as touching in the metric domain.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// A scalar usable as a surface coordinate.
pub trait Coordinate: RTreeNum + Display + Debug + Default + Send + Sync + 'static {
    /// Rounds the value to `decimals` decimal places (identity for integers).
    fn snap(self, decimals: u32) -> Self;

    /// Number of whole `step`s that fit into `span`, or `None` when `span`
    /// is negative or `step` is not positive.
    fn steps_within(span: Self, step: Self) -> Option<usize>;

    /// Returns `self * n`.
    fn scaled(self, n: usize) -> Self;

    /// Lossy conversion used for reporting.
    fn to_f64(self) -> f64;

    /// Slack allowed by the bounds and overlap predicates (zero for integers).
    fn tolerance() -> Self;
}

impl Coordinate for f64 {
    fn snap(self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        (self * factor).round() / factor
    }

    fn steps_within(span: Self, step: Self) -> Option<usize> {
        if step.is_nan() || step <= 0.0 || !span.is_finite() || span < 0.0 {
            return None;
        }
        Some((span / step + STEP_EPSILON).floor() as usize)
    }

    fn scaled(self, n: usize) -> Self {
        self * n as f64
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn tolerance() -> Self {
        GEOMETRY_EPSILON
    }
}

impl Coordinate for i64 {
    fn snap(self, _decimals: u32) -> Self {
        self
    }

    fn steps_within(span: Self, step: Self) -> Option<usize> {
        if step <= 0 || span < 0 {
            return None;
        }
        usize::try_from(span / step).ok()
    }

    fn scaled(self, n: usize) -> Self {
        self * n as i64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn tolerance() -> Self {
        0
    }
}
