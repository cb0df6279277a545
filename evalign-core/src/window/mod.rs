//! Time window generation and set algebra.

/// Union, intersection and aggregation of windows.
pub mod algebra;
/// Windows from a pooling declaration.
pub mod generate;

pub use algebra::{adjust_for_time_scale, aggregate, intersection, intersects, union};
pub use generate::{one_big_window, time_windows};
