//! ispkit - Software model of an FPGA CLAHE stage
//!
//! Contrast-limited adaptive histogram equalization in two variants: a
//! floating-point reference and a fixed-point model that reproduces the
//! hardware output bit for bit, so RTL simulation dumps can be checked
//! against software.
//!
//! # Overview
//!
//! - Contrast-limited adaptive histogram equalization ([`clahe`])
//! - PNG and RTL hex-dump I/O ([`io`])
//! - Software/hardware parity reports ([`ParityReport`])
//!
//! # Example
//!
//! ```
//! use ispkit::Plane;
//! use ispkit::clahe::{ClaheOptions, FixedPoint, Reference, equalize};
//!
//! let plane = Plane::from_fn(1024, 1024, |x, y| ((x / 4 + y / 4) % 256) as u8).unwrap();
//! let options = ClaheOptions::default();
//! let soft = equalize::<Reference>(&plane, &options).unwrap();
//! let hard = equalize::<FixedPoint>(&plane, &options).unwrap();
//! let report = soft.parity(&hard).unwrap();
//! println!("max error {}, {} pixels differ", report.max_error, report.mismatches);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use ispkit_core::*;

// Re-export stage crates as modules to avoid name conflicts
pub use ispkit_clahe as clahe;
pub use ispkit_io as io;
