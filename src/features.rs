//! Behavioral feature extraction.
//!
//! Turns raw [`UserRecord`]s into fixed-shape [`FeatureVector`]s for
//! segmentation and scoring. The vector schema is a struct rather than a
//! keyed map, so every vector has the same five components in the same
//! order and clustering distance is always well defined.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::record::UserRecord;

/// Component names of a [`FeatureVector`], in `as_array` order.
pub const FEATURE_NAMES: [&str; 5] = [
    "total_orders",
    "total_spent",
    "last_activity_ms",
    "account_age_ms",
    "engagement_score",
];

/// A user's behavioral features, fixed shape.
///
/// Timestamp-derived components are ages in milliseconds relative to the
/// extractor's reference time. A record missing its dates gets ages
/// measured from epoch 0, which dwarfs every other component; callers that
/// need clean distances should backfill dates upstream.
///
/// # Examples
///
/// ```
/// use agrolytics::features::FeatureVector;
///
/// let a = FeatureVector { total_orders: 3.0, ..FeatureVector::default() };
/// let b = FeatureVector { total_orders: 7.0, ..FeatureVector::default() };
/// assert_eq!(a.distance(&b), 4.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Lifetime order count.
    pub total_orders: f64,
    /// Lifetime spend in rupees.
    pub total_spent: f64,
    /// Milliseconds since last activity.
    pub last_activity_ms: f64,
    /// Milliseconds since account creation.
    pub account_age_ms: f64,
    /// Engagement score in [0, 1].
    pub engagement_score: f64,
}

impl FeatureVector {
    /// Components in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.total_orders,
            self.total_spent,
            self.last_activity_ms,
            self.account_age_ms,
            self.engagement_score,
        ]
    }

    /// Build a vector from components in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn from_array(values: [f64; 5]) -> Self {
        Self {
            total_orders: values[0],
            total_spent: values[1],
            last_activity_ms: values[2],
            account_age_ms: values[3],
            engagement_score: values[4],
        }
    }

    /// Squared Euclidean distance to another vector.
    #[must_use]
    pub fn squared_distance(&self, other: &Self) -> f64 {
        self.as_array()
            .iter()
            .zip(other.as_array().iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Euclidean distance to another vector.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.squared_distance(other).sqrt()
    }

    /// Component-wise mean of a set of vectors. `None` when empty.
    #[must_use]
    pub fn mean(vectors: &[Self]) -> Option<Self> {
        if vectors.is_empty() {
            return None;
        }
        let n = vectors.len() as f64;
        let mut sums = [0.0; 5];
        for v in vectors {
            for (sum, component) in sums.iter_mut().zip(v.as_array().iter()) {
                *sum += component;
            }
        }
        for sum in &mut sums {
            *sum /= n;
        }
        Some(Self::from_array(sums))
    }
}

/// Extracts [`FeatureVector`]s from user records.
///
/// Missing numeric fields default to zero; missing timestamps default to
/// epoch 0, so their derived ages equal the reference time itself.
///
/// # Examples
///
/// ```
/// use agrolytics::features::FeatureExtractor;
/// use agrolytics::record::UserRecord;
///
/// let extractor = FeatureExtractor::new().with_reference_time(1_000_000);
/// let mut user = UserRecord::new("u-1");
/// user.total_orders = Some(4.0);
/// user.last_activity = Some(400_000);
///
/// let features = extractor.extract(&user);
/// assert_eq!(features.total_orders, 4.0);
/// assert_eq!(features.last_activity_ms, 600_000.0);
/// ```
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    reference_time_ms: i64,
}

impl FeatureExtractor {
    /// Create an extractor referenced to the current wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference_time_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Set the reference time (epoch milliseconds) for age computation.
    #[must_use]
    pub fn with_reference_time(mut self, epoch_ms: i64) -> Self {
        self.reference_time_ms = epoch_ms;
        self
    }

    /// Reference time in epoch milliseconds.
    #[must_use]
    pub fn reference_time(&self) -> i64 {
        self.reference_time_ms
    }

    /// Extract the five behavioral features from one record.
    #[must_use]
    pub fn extract(&self, user: &UserRecord) -> FeatureVector {
        FeatureVector {
            total_orders: user.total_orders.unwrap_or(0.0),
            total_spent: user.total_spent.unwrap_or(0.0),
            last_activity_ms: (self.reference_time_ms - user.last_activity.unwrap_or(0)) as f64,
            account_age_ms: (self.reference_time_ms - user.created_at.unwrap_or(0)) as f64,
            engagement_score: user.engagement_score.unwrap_or(0.0),
        }
    }

    /// Extract features for every record, preserving order.
    #[must_use]
    pub fn extract_all(&self, users: &[UserRecord]) -> Vec<FeatureVector> {
        users.iter().map(|u| self.extract(u)).collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
