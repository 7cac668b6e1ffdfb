//! Core data structures and traits for lidarfeat
//!
//! This crate provides the substrate for per-neighborhood point cloud
//! statistics: an attribute-table point cloud, masked per-neighborhood
//! attribute tables, the ASPRS classification table, search volume
//! descriptions, and the feature extractor contract.

pub mod classification;
pub mod error;
pub mod extractor;
pub mod neighborhood;
pub mod point_cloud;
pub mod volume;

pub use classification::*;
pub use error::*;
pub use extractor::*;
pub use neighborhood::*;
pub use point_cloud::*;
pub use volume::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::Point3;
