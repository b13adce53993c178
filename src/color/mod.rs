//! Color representation, conversion and clustering
//!
//! This module defines the canonical pixel type, the hex encoding used in
//! reports, and the k-means clustering behind the extraction strategies.

pub mod conversion;
pub mod clustering;

pub use conversion::{brightness, hex_of, rgb_of, saturation_value, squared_distance, Pixel};
pub use clustering::{Cluster, KMeans};
