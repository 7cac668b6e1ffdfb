//! # Lidarfeat Extractors
//!
//! Per-neighborhood feature extractors over point cloud attributes.
//!
//! Each extractor implements the [`lidarfeat_core::FeatureExtractor`]
//! contract: it names the values it produces, computes them per
//! neighborhood, and reports its construction parameters for provenance.

pub mod band_ratio;

pub use band_ratio::*;
