//! Helpers shared by the tiffstack crates
//!
//! Everything in here is independent of the TIFF format itself.

pub mod math;
pub mod read;
pub mod utils;
