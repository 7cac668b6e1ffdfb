//! Point cloud data structures and functionality

use crate::error::{Error, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the x coordinate attribute
pub const X: &str = "x";
/// Name of the y coordinate attribute
pub const Y: &str = "y";
/// Name of the z coordinate attribute
pub const Z: &str = "z";
/// Name of the classification attribute
pub const CLASSIFICATION: &str = "classification";
/// Name of the intensity attribute
pub const INTENSITY: &str = "intensity";
/// Name of the normalized height attribute
pub const NORMALIZED_HEIGHT: &str = "normalized_height";

/// A point cloud stored as a table of named per-point attribute columns.
///
/// Every column has the same length (the number of points). Coordinates and
/// classification codes live in ordinary columns, so extractors can address
/// any attribute by name. Integer-coded attributes such as classification
/// are stored as whole-number `f64` values, matching what LAS readers
/// produce.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointCloud {
    attributes: BTreeMap<String, Vec<f64>>,
    len: usize,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a point cloud from a slice of 3D points, populating the
    /// `x`, `y` and `z` attribute columns.
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(X.to_string(), points.iter().map(|p| p.x).collect());
        attributes.insert(Y.to_string(), points.iter().map(|p| p.y).collect());
        attributes.insert(Z.to_string(), points.iter().map(|p| p.z).collect());
        Self {
            attributes,
            len: points.len(),
        }
    }

    /// Create a point cloud from a single named attribute column.
    pub fn from_attribute(name: &str, values: Vec<f64>) -> Self {
        let len = values.len();
        let mut attributes = BTreeMap::new();
        attributes.insert(name.to_string(), values);
        Self { attributes, len }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether the cloud carries an attribute column with this name
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Get an attribute column by name
    pub fn attribute(&self, name: &str) -> Result<&[f64]> {
        self.attributes
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingAttribute(name.to_string()))
    }

    /// Add an attribute column to the cloud.
    ///
    /// The column must match the point count of the existing columns; a
    /// mismatch is rejected with [`Error::InvalidData`]. Adding to an empty
    /// cloud sets the point count.
    pub fn add_attribute(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if self.attributes.is_empty() {
            self.len = values.len();
        } else if values.len() != self.len {
            return Err(Error::InvalidData(format!(
                "attribute '{}' has {} values, expected {}",
                name,
                values.len(),
                self.len
            )));
        }
        self.attributes.insert(name.to_string(), values);
        Ok(())
    }

    /// Get an iterator over the attribute names in the cloud
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}
