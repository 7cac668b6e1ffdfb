//! Search volume descriptions

use serde::{Deserialize, Serialize};

/// Shape and size of the search volume a neighborhood was gathered with.
///
/// Extractors inspect the shape tag to decide whether their statistic is
/// meaningful for the given volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Volume {
    /// Sphere around the target point
    Sphere { radius: f64 },
    /// Infinite vertical cylinder around the target point
    InfiniteCylinder { radius: f64 },
    /// Square cell centered on the target point, infinite in z
    Cell { side_length: f64 },
    /// Cube centered on the target point
    Cube { side_length: f64 },
}

impl Volume {
    /// The shape-type tag of this volume
    pub fn shape(&self) -> &'static str {
        match self {
            Volume::Sphere { .. } => "sphere",
            Volume::InfiniteCylinder { .. } => "infinite cylinder",
            Volume::Cell { .. } => "cell",
            Volume::Cube { .. } => "cube",
        }
    }
}
