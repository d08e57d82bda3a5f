//! Segmentation quality metrics.

use crate::features::FeatureVector;
use crate::segmentation::Segmentation;

/// Computes the inertia (within-segment sum of squares).
///
/// Inertia = Σ ||x - centroid||²
///
/// Points are paired with assignments positionally; pass the same slice
/// the segmentation was computed from.
///
/// # Examples
///
/// ```
/// use agrolytics::features::FeatureVector;
/// use agrolytics::metrics::inertia;
/// use agrolytics::segmentation::SegmentationEngine;
///
/// let points = vec![
///     FeatureVector { total_orders: 0.0, ..FeatureVector::default() },
///     FeatureVector { total_orders: 1.0, ..FeatureVector::default() },
/// ];
/// let result = SegmentationEngine::new()
///     .with_segments(1)
///     .with_random_state(1)
///     .segment(&points);
///
/// assert!(inertia(&points, &result) > 0.0);
/// ```
#[must_use]
pub fn inertia(points: &[FeatureVector], segmentation: &Segmentation) -> f64 {
    let mut total = 0.0;

    for (point, &label) in points.iter().zip(segmentation.assignments.iter()) {
        if let Some(centroid) = &segmentation.centroids[label] {
            total += point.squared_distance(centroid);
        }
    }

    total
}

/// Computes the mean distance from a point to other points in the same segment.
fn mean_intra_segment_distance(
    points: &[FeatureVector],
    point_idx: usize,
    segment: usize,
    assignments: &[usize],
) -> f64 {
    let point = &points[point_idx];
    let distances: Vec<f64> = assignments
        .iter()
        .enumerate()
        .filter(|&(j, &label)| j != point_idx && label == segment)
        .map(|(j, _)| point.distance(&points[j]))
        .collect();

    if distances.is_empty() {
        0.0
    } else {
        distances.iter().sum::<f64>() / distances.len() as f64
    }
}

/// Computes the minimum mean distance from a point to points in other segments.
fn min_inter_segment_distance(
    points: &[FeatureVector],
    point_idx: usize,
    segment: usize,
    assignments: &[usize],
    n_segments: usize,
) -> f64 {
    let point = &points[point_idx];
    let mut min_mean = f64::INFINITY;

    for other_segment in 0..n_segments {
        if other_segment == segment {
            continue;
        }

        let distances: Vec<f64> = assignments
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == other_segment)
            .map(|(j, _)| point.distance(&points[j]))
            .collect();

        if !distances.is_empty() {
            let mean_dist = distances.iter().sum::<f64>() / distances.len() as f64;
            min_mean = min_mean.min(mean_dist);
        }
    }

    if min_mean == f64::INFINITY {
        0.0
    } else {
        min_mean
    }
}

/// Computes the silhouette coefficient for a single point.
fn silhouette_coefficient(a_i: f64, b_i: f64) -> f64 {
    let max_ab = a_i.max(b_i);
    if max_ab == 0.0 {
        0.0
    } else {
        (b_i - a_i) / max_ab
    }
}

/// Computes the silhouette score for segmentation quality.
///
/// Measures how similar a point is to its own segment compared to other
/// segments. Values range from -1 to 1, where higher is better.
///
/// s(i) = (b(i) - a(i)) / max(a(i), b(i))
///
/// where:
/// - a(i) = mean distance to other points in the same segment
/// - b(i) = mean distance to points in the nearest other segment
///
/// Returns 0.0 when there are fewer than 2 points or fewer than 2
/// segments in use.
///
/// # Panics
///
/// Panics if `assignments` is shorter than `points`.
///
/// # Examples
///
/// ```
/// use agrolytics::features::FeatureVector;
/// use agrolytics::metrics::silhouette_score;
///
/// let points: Vec<FeatureVector> = [0.0, 0.1, 5.0, 5.1]
///     .iter()
///     .map(|&v| FeatureVector { total_orders: v, ..FeatureVector::default() })
///     .collect();
/// let assignments = vec![0, 0, 1, 1];
///
/// assert!(silhouette_score(&points, &assignments) > 0.5);
/// ```
#[must_use]
pub fn silhouette_score(points: &[FeatureVector], assignments: &[usize]) -> f64 {
    let n_points = points.len();

    if n_points < 2 {
        return 0.0;
    }

    let n_segments = assignments.iter().max().map_or(0, |&m| m + 1);

    if n_segments < 2 {
        return 0.0;
    }

    let silhouettes: Vec<f64> = (0..n_points)
        .map(|i| {
            let segment = assignments[i];
            let a_i = mean_intra_segment_distance(points, i, segment, assignments);
            let b_i = min_inter_segment_distance(points, i, segment, assignments, n_segments);
            silhouette_coefficient(a_i, b_i)
        })
        .collect();

    silhouettes.iter().sum::<f64>() / silhouettes.len() as f64
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
