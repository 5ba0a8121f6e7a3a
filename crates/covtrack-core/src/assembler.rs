//! Coverage assembler: merges reducer output onto the structural entities.
//!
//! Output follows the order of the entity list it is given (the store lists
//! areas and features by name). Entities without runs in the window get
//! zeroed stats.

use crate::model::{AggregatedCoverage, Area, AreaCoverage, ExplOverview, Feature, FeatureCoverage};
use std::collections::{BTreeMap, HashMap};

pub fn assemble_area_coverage(
    areas: Vec<Area>,
    coverage: &BTreeMap<i64, AggregatedCoverage>,
    expl: &HashMap<i64, ExplOverview>,
) -> Vec<AreaCoverage> {
    areas
        .into_iter()
        .map(|area| AreaCoverage {
            stats: coverage.get(&area.id).map(|c| c.stats).unwrap_or_default(),
            expl: expl.get(&area.id).copied().unwrap_or_default(),
            area,
        })
        .collect()
}

pub fn assemble_feature_coverage(
    features: Vec<Feature>,
    coverage: &BTreeMap<i64, AggregatedCoverage>,
) -> Vec<FeatureCoverage> {
    features
        .into_iter()
        .map(|feature| FeatureCoverage {
            stats: coverage.get(&feature.id).map(|c| c.stats).unwrap_or_default(),
            feature,
        })
        .collect()
}
