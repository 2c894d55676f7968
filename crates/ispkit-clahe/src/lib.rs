//! ispkit CLAHE - Contrast-limited adaptive histogram equalization
//!
//! Two variants of the same algorithm, sharing tiling and case selection:
//!
//! - [`Reference`] - floating-point model
//! - [`FixedPoint`] - integer model reproducing the FPGA datapath bit for
//!   bit, including its truncation artifacts
//!
//! # Pipeline
//!
//! - [`grid`] - tile partitioning and per-axis addressing
//! - [`histogram`] - per-tile histograms
//! - [`limiter`] - clip and redistribute
//! - [`cdf`] - per-tile mapping tables
//! - [`neighborhood`] - corner / edge / interior case selection
//! - [`backend`] - numeric representation of each variant
//! - [`equalize`] - the assembled pipeline
//!
//! # Examples
//!
//! ```
//! use ispkit_clahe::{clahe_fixed, clahe_reference};
//! use ispkit_core::Plane;
//!
//! let plane = Plane::from_fn(512, 512, |x, y| ((x ^ y) & 0xff) as u8).unwrap();
//! let soft = clahe_reference(&plane, 8).unwrap();
//! let hard = clahe_fixed(&plane).unwrap();
//! assert_eq!(soft.dimensions(), hard.dimensions());
//! ```

pub mod backend;
pub mod cdf;
pub mod equalize;
pub mod error;
pub mod grid;
pub mod histogram;
pub mod limiter;
pub mod neighborhood;

pub use backend::{Backend, FixedPoint, FixedPointParams, HARDWARE_BLOCK, Reference};
pub use cdf::{Cdf, FixedCdf, HARDWARE_CDF_DIVISOR, ReferenceCdf};
pub use equalize::{ClaheOptions, ClaheTables, clahe_fixed, clahe_reference, equalize, equalize_rgb};
pub use error::{ClaheError, ClaheResult};
pub use grid::{AxisSpan, DEFAULT_BLOCK, TileGrid};
pub use histogram::{TileHistogram, build_histograms};
pub use limiter::{CLIP_MULTIPLIER, ClipStats, hardware_limit, reference_limit};
pub use neighborhood::{AddressPlan, Axis, Neighborhood, Quad};
