//! Behavioral segmentation.
//!
//! K-means over [`FeatureVector`]s with named, 1-indexed segments.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;

/// One behavioral segment of the user base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// 1-based segment id.
    pub id: usize,
    /// Display name ("Low Engagement", "Medium Engagement", ...).
    pub name: String,
    /// Feature vectors assigned to this segment.
    pub members: Vec<FeatureVector>,
    /// Segment centroid. `None` when the segment ended up empty.
    pub centroid: Option<FeatureVector>,
    /// Number of members.
    pub size: usize,
}

/// Result of a segmentation run.
///
/// Segments partition the input: every vector appears in exactly one
/// segment and sizes sum to the input length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segmentation {
    /// The segments, ordered by id.
    pub segments: Vec<Segment>,
    /// Final centroids, index-aligned with `segments`.
    pub centroids: Vec<Option<FeatureVector>>,
    /// Segment index (0-based) per input vector, in input order.
    pub assignments: Vec<usize>,
    /// Iterations run before convergence or cutoff.
    pub iterations: usize,
}

/// K-means segmentation engine.
///
/// Holds only configuration; every [`segment`](SegmentationEngine::segment)
/// call computes from scratch.
///
/// # Algorithm
///
/// 1. Initialize centroids by sampling k input vectors uniformly at random
///    with replacement
/// 2. Assign each vector to its nearest centroid (Euclidean)
/// 3. Update each centroid to the mean of its members; an empty segment's
///    centroid becomes `None` and drops out of assignment
/// 4. Repeat until no surviving centroid moves more than the tolerance, or
///    the iteration cap is reached
///
/// # Examples
///
/// ```
/// use agrolytics::features::FeatureVector;
/// use agrolytics::segmentation::SegmentationEngine;
///
/// let points = vec![
///     FeatureVector { total_orders: 1.0, ..FeatureVector::default() },
///     FeatureVector { total_orders: 2.0, ..FeatureVector::default() },
///     FeatureVector { total_orders: 40.0, ..FeatureVector::default() },
/// ];
///
/// let engine = SegmentationEngine::new().with_random_state(42);
/// let result = engine.segment(&points);
/// assert_eq!(result.segments.len(), 3);
/// assert_eq!(result.assignments.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentationEngine {
    n_segments: usize,
    max_iter: usize,
    tolerance: f64,
    random_state: Option<u64>,
}

impl Default for SegmentationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentationEngine {
    /// Creates an engine with 3 segments, 100 max iterations, tolerance 1e-3.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_segments: 3,
            max_iter: 100,
            tolerance: 1e-3,
            random_state: None,
        }
    }

    /// Sets the number of segments.
    ///
    /// # Panics
    ///
    /// Panics if `n_segments` is 0.
    #[must_use]
    pub fn with_segments(mut self, n_segments: usize) -> Self {
        assert!(n_segments >= 1, "n_segments must be >= 1, got {n_segments}");
        self.n_segments = n_segments;
        self
    }

    /// Sets the maximum number of iterations.
    ///
    /// # Panics
    ///
    /// Panics if `max_iter` is 0.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        assert!(max_iter >= 1, "max_iter must be >= 1, got {max_iter}");
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is negative or not finite.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        assert!(
            tolerance.is_finite() && tolerance >= 0.0,
            "tolerance must be finite and >= 0, got {tolerance}"
        );
        self.tolerance = tolerance;
        self
    }

    /// Sets the random seed for reproducible initialization.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Number of segments this engine produces.
    #[must_use]
    pub fn n_segments(&self) -> usize {
        self.n_segments
    }

    /// Maximum iteration count.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Convergence tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Segment the given feature vectors.
    ///
    /// Empty input yields an empty [`Segmentation`] with no segments.
    #[must_use]
    pub fn segment(&self, points: &[FeatureVector]) -> Segmentation {
        if points.is_empty() {
            return Segmentation::default();
        }

        let mut centroids = self.init_centroids(points);
        let mut assignments = Vec::new();
        let mut iterations = 0;

        for iteration in 0..self.max_iter {
            assignments = self.assign_members(points, &centroids);
            let new_centroids = self.update_centroids(points, &assignments);
            iterations = iteration + 1;

            let converged = self.centroids_converged(&centroids, &new_centroids);
            centroids = new_centroids;
            if converged {
                break;
            }
        }

        let segments = self.build_segments(points, &assignments, &centroids);

        Segmentation {
            segments,
            centroids,
            assignments,
            iterations,
        }
    }

    /// Samples k starting centroids uniformly at random with replacement.
    fn init_centroids(&self, points: &[FeatureVector]) -> Vec<Option<FeatureVector>> {
        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        (0..self.n_segments)
            .map(|_| Some(points[rng.gen_range(0..points.len())]))
            .collect()
    }

    /// Assigns each vector to the nearest live centroid.
    fn assign_members(
        &self,
        points: &[FeatureVector],
        centroids: &[Option<FeatureVector>],
    ) -> Vec<usize> {
        let mut assignments = vec![0; points.len()];

        for (point, assignment) in points.iter().zip(assignments.iter_mut()) {
            let mut min_dist = f64::INFINITY;
            let mut min_segment = 0;

            for (k, centroid) in centroids.iter().enumerate() {
                let Some(centroid) = centroid else { continue };
                let dist = point.squared_distance(centroid);
                if dist < min_dist {
                    min_dist = dist;
                    min_segment = k;
                }
            }

            *assignment = min_segment;
        }

        assignments
    }

    /// Updates centroids as per-segment means; empty segments become `None`.
    fn update_centroids(
        &self,
        points: &[FeatureVector],
        assignments: &[usize],
    ) -> Vec<Option<FeatureVector>> {
        let mut members: Vec<Vec<FeatureVector>> = vec![Vec::new(); self.n_segments];
        for (point, &assignment) in points.iter().zip(assignments.iter()) {
            members[assignment].push(*point);
        }

        members
            .iter()
            .map(|group| FeatureVector::mean(group))
            .collect()
    }

    /// Checks whether every surviving centroid moved at most the tolerance.
    fn centroids_converged(
        &self,
        old: &[Option<FeatureVector>],
        new: &[Option<FeatureVector>],
    ) -> bool {
        for (old_c, new_c) in old.iter().zip(new.iter()) {
            let (Some(old_c), Some(new_c)) = (old_c, new_c) else {
                continue;
            };
            if old_c.squared_distance(new_c) > self.tolerance * self.tolerance {
                return false;
            }
        }
        true
    }

    fn build_segments(
        &self,
        points: &[FeatureVector],
        assignments: &[usize],
        centroids: &[Option<FeatureVector>],
    ) -> Vec<Segment> {
        (0..self.n_segments)
            .map(|k| {
                let members: Vec<FeatureVector> = points
                    .iter()
                    .zip(assignments.iter())
                    .filter(|(_, &a)| a == k)
                    .map(|(p, _)| *p)
                    .collect();
                Segment {
                    id: k + 1,
                    name: segment_name(k),
                    size: members.len(),
                    centroid: centroids[k],
                    members,
                }
            })
            .collect()
    }
}

/// Display name for a segment index.
fn segment_name(index: usize) -> String {
    match index {
        0 => "Low Engagement".to_string(),
        1 => "Medium Engagement".to_string(),
        2 => "High Engagement".to_string(),
        n => format!("Segment {}", n + 1),
    }
}
