//! ASPRS LAS point classification codes and class groups

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Classification codes by the ASPRS LAS 1.4 specification, paired with the
/// class group each code belongs to. Several raw codes collapse into one
/// group: low, medium and high vegetation all map to "vegetation".
pub const POINT_CLASSES: &[(u8, &str)] = &[
    (0, "neverClassified"), // created, never classified
    (1, "unclassified"),
    (2, "ground"),
    (3, "vegetation"), // low vegetation
    (4, "vegetation"), // medium vegetation
    (5, "vegetation"), // high vegetation
    (6, "building"),
    (7, "noise"), // low point (noise)
    (8, "keyPoint"), // model key-point (mass point)
    (9, "water"),
    (12, "overlap"),
];

/// Look up the class group name for a raw classification code.
pub fn class_group(code: u8) -> Option<&'static str> {
    POINT_CLASSES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, group)| *group)
}

/// All known classification codes, in specification order.
pub fn all_class_codes() -> Vec<u8> {
    POINT_CLASSES.iter().map(|(code, _)| *code).collect()
}

/// De-duplicate a sequence preserving first occurrence order.
pub fn ordered_unique<T: Clone + Eq + Hash>(items: &[T]) -> Vec<T> {
    items.iter().unique().cloned().collect()
}

/// Which classification codes a filter should accept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassSelection {
    /// Every known classification code
    #[default]
    All,
    /// An explicit ordered list of codes, de-duplicated preserving first
    /// occurrence
    Codes(Vec<u8>),
}

impl ClassSelection {
    /// Build a selection from an explicit code list, dropping duplicates
    /// while preserving first occurrence order.
    pub fn from_codes(codes: &[u8]) -> Self {
        ClassSelection::Codes(ordered_unique(codes))
    }

    /// The ordered list of codes this selection stands for.
    pub fn resolve(&self) -> Vec<u8> {
        match self {
            ClassSelection::All => all_class_codes(),
            ClassSelection::Codes(codes) => ordered_unique(codes),
        }
    }

    /// Whether the selection accepts every known classification code.
    pub fn covers_all_known(&self) -> bool {
        match self {
            ClassSelection::All => true,
            ClassSelection::Codes(codes) => {
                all_class_codes().iter().all(|code| codes.contains(code))
            }
        }
    }
}
