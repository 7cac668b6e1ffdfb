//! Per-neighborhood attribute tables with explicit missing-value masks

use crate::error::{Error, Result};
use crate::point_cloud::PointCloud;
use ndarray::{Array3, ArrayView2};

/// Indices of the points that a spatial search found near one target point.
pub type Neighborhood = Vec<usize>;

/// A 3-axis table of attribute values gathered per neighborhood.
///
/// Axes are (attribute, neighborhood, slot). The slot axis is as wide as the
/// largest neighborhood; neighborhoods with fewer points leave their trailing
/// slots masked. The mask is the explicit missing marker: a masked cell
/// carries no data and must never be read as a valid zero.
#[derive(Debug, Clone)]
pub struct NeighborhoodAttributes {
    values: Array3<f64>,
    mask: Array3<bool>,
}

impl NeighborhoodAttributes {
    /// Number of slots along the slot axis (the largest neighborhood size)
    pub fn width(&self) -> usize {
        self.values.shape()[2]
    }

    /// Number of neighborhoods in the table
    pub fn neighborhood_count(&self) -> usize {
        self.values.shape()[1]
    }

    /// Values for one attribute, axes (neighborhood, slot)
    pub fn values(&self, attribute_index: usize) -> ArrayView2<'_, f64> {
        self.values.index_axis(ndarray::Axis(0), attribute_index)
    }

    /// Missing-value mask for one attribute, axes (neighborhood, slot);
    /// `true` marks an absent slot
    pub fn mask(&self, attribute_index: usize) -> ArrayView2<'_, bool> {
        self.mask.index_axis(ndarray::Axis(0), attribute_index)
    }

    /// Number of unmasked slots per neighborhood for one attribute
    pub fn valid_counts(&self, attribute_index: usize) -> Vec<usize> {
        self.mask(attribute_index)
            .rows()
            .into_iter()
            .map(|row| row.iter().filter(|&&masked| !masked).count())
            .collect()
    }
}

/// Gather attribute values per neighborhood into a masked 3-axis table.
///
/// `neighborhoods` holds, per target point, the indices of its neighbors in
/// `cloud`. Neighborhoods may have unequal lengths; the table is padded to
/// the longest one and padding slots are masked.
///
/// Fails with [`Error::MissingAttribute`] for an unknown key and
/// [`Error::InvalidData`] for a neighbor index outside the cloud.
pub fn attributes_per_neighborhood(
    cloud: &PointCloud,
    neighborhoods: &[Neighborhood],
    attribute_names: &[&str],
) -> Result<NeighborhoodAttributes> {
    let width = neighborhoods.iter().map(Vec::len).max().unwrap_or(0);
    let shape = (attribute_names.len(), neighborhoods.len(), width);
    let mut values = Array3::zeros(shape);
    let mut mask = Array3::from_elem(shape, true);

    for (a, name) in attribute_names.iter().enumerate() {
        let column = cloud.attribute(name)?;
        for (n, neighborhood) in neighborhoods.iter().enumerate() {
            for (s, &index) in neighborhood.iter().enumerate() {
                let value = *column.get(index).ok_or_else(|| {
                    Error::InvalidData(format!(
                        "neighbor index {} out of range for cloud of {} points",
                        index,
                        cloud.len()
                    ))
                })?;
                values[(a, n, s)] = value;
                mask[(a, n, s)] = false;
            }
        }
    }

    Ok(NeighborhoodAttributes { values, mask })
}
