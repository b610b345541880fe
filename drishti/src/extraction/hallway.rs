//! Hallway classification by parallel wall length.
//!
//! Lines are clustered by single linkage on parallelism: a line joins the
//! first cluster holding a line parallel to it, otherwise it starts a new
//! cluster. The scan is a hallway once any cluster's accumulated length
//! exceeds `parallel.hallway_length`.

use super::{FeatureExtractor, FeatureKind, LineExtractor};
use crate::core::LaserScan;
use crate::error::Result;
use crate::features::Line;
use crate::model::FeatureModel;

/// Classifies a scan as hallway or not. Produces exactly one `bool`.
#[derive(Clone, Debug)]
pub struct HallwayDetector<L = LineExtractor> {
    lines: L,
}

impl HallwayDetector {
    /// Create a hallway detector using the stock line extractor.
    pub fn new() -> Self {
        Self::with_line_extractor(LineExtractor::new())
    }
}

impl Default for HallwayDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> HallwayDetector<L>
where
    L: FeatureExtractor<Feature = Line>,
{
    /// Create a hallway detector on top of a custom line extractor.
    pub fn with_line_extractor(lines: L) -> Self {
        Self { lines }
    }

    /// Classify already extracted lines.
    pub fn extract_from_lines(&self, lines: &[Line], model: &FeatureModel) -> Result<bool> {
        detect_hallway(lines, model)
    }
}

impl<L> FeatureExtractor for HallwayDetector<L>
where
    L: FeatureExtractor<Feature = Line>,
{
    type Feature = bool;
    const KIND: FeatureKind = FeatureKind::Hallway;

    fn extract(&self, scan: &LaserScan, model: &FeatureModel) -> Result<Vec<bool>> {
        let lines = self.lines.extract(scan, model)?;
        Ok(vec![self.extract_from_lines(&lines, model)?])
    }
}

struct Cluster<'a> {
    members: Vec<&'a Line>,
    length: f64,
}

/// Check whether any parallel cluster of `lines` is longer than the hallway length.
pub fn detect_hallway(lines: &[Line], model: &FeatureModel) -> Result<bool> {
    let params = model.parallel();
    let threshold = params.threshold()?;
    let min_line_length = params.min_line_length()?;
    let hallway_length = params.hallway_length()?;

    let mut clusters: Vec<Cluster<'_>> = Vec::new();
    for line in lines {
        let length = line.length();
        let contribution = if length >= min_line_length { length } else { 0.0 };

        let joined = clusters
            .iter_mut()
            .find(|c| c.members.iter().any(|m| m.is_parallel_to(line, threshold)));

        let cluster_length = match joined {
            Some(cluster) => {
                cluster.members.push(line);
                cluster.length += contribution;
                cluster.length
            }
            None => {
                clusters.push(Cluster {
                    members: vec![line],
                    length: contribution,
                });
                contribution
            }
        };

        if cluster_length > hallway_length {
            return Ok(true);
        }
    }
    Ok(false)
}
