//! The feature extractor contract

use crate::error::Result;
use crate::neighborhood::Neighborhood;
use crate::point_cloud::PointCloud;
use crate::volume::Volume;
use serde::{Deserialize, Serialize};

/// A construction parameter of a feature extractor, in a form the external
/// provenance layer can record without knowing the concrete extractor type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// A numeric parameter
    Float(f64),
    /// A numeric parameter that may be absent
    OptionalFloat(Option<f64>),
    /// A textual parameter such as an attribute name
    Text(String),
    /// An ordered list of classification codes
    Codes(Vec<u8>),
    /// The "all known classification codes" token
    All,
}

/// Trait for per-neighborhood feature extraction.
///
/// The framework calls `provides` to learn the output field names, then
/// `extract` once per batch of neighborhoods; `extract` must return exactly
/// one value array per provided name, one value per neighborhood, with
/// undefined cells resolved to NaN.
pub trait FeatureExtractor {
    /// Names of precomputed features this extractor needs as input
    /// attributes, beyond the raw per-point attributes.
    fn requires(&self) -> Vec<String>;

    /// Names of the feature values this extractor produces, deterministic in
    /// the construction parameters.
    fn provides(&self) -> Vec<String>;

    /// Extract the feature values for every neighborhood.
    ///
    /// `point_cloud` is the environment (search space) cloud that the
    /// neighborhood indices point into; `target_point_cloud` and
    /// `target_index` identify the point the neighborhoods belong to;
    /// `volume` describes the search volume the neighborhoods were gathered
    /// with.
    fn extract(
        &self,
        point_cloud: &PointCloud,
        neighborhoods: &[Neighborhood],
        target_point_cloud: &PointCloud,
        target_index: usize,
        volume: &Volume,
    ) -> Result<Vec<Vec<f64>>>;

    /// Construction parameters in declaration order, for provenance.
    fn get_params(&self) -> Vec<ParamValue>;
}
