//! ispkit Core - Basic buffers for image-signal-processor validation
//!
//! This crate provides the data structures shared by every pipeline
//! stage:
//!
//! - [`Plane`] / [`PlaneMut`] - Single-channel 8-bit image (immutable / mutable)
//! - [`RgbImage`] - Interleaved 8-bit RGB image, with the HSV value-channel
//!   bridge used to equalize color frames through one intensity plane
//! - [`ParityReport`] - Software/hardware output comparison

pub mod compare;
pub mod error;
pub mod plane;
pub mod rgb;

pub use compare::ParityReport;
pub use error::{Error, Result};
pub use plane::{Plane, PlaneMut};
pub use rgb::RgbImage;

/// Number of distinct 8-bit intensity levels.
pub const LEVELS: usize = 256;

/// Largest 8-bit intensity.
pub const MAX_LEVEL: u8 = 255;
