//! Churn-risk scoring.
//!
//! A fixed-coefficient logistic model over recency, order volume, spend,
//! account age, and engagement. Coefficients were tuned offline against
//! marketplace retention data and are not re-fit at runtime.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::record::UserRecord;

const MS_PER_DAY: f64 = 86_400_000.0;

const INTERCEPT: f64 = -2.0;
const W_DAYS_SINCE_ACTIVITY: f64 = 0.1;
const W_TOTAL_ORDERS: f64 = -0.05;
const W_TOTAL_SPENT: f64 = -0.001;
const W_ACCOUNT_AGE_DAYS: f64 = -0.01;
const W_ENGAGEMENT: f64 = -0.5;
const W_RECENT_PURCHASE: f64 = -1.0;

/// A user is flagged at-risk above this churn probability.
const AT_RISK_THRESHOLD: f64 = 0.7;

/// Model inputs derived from one user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnFeatures {
    /// Days since last activity (missing dates count from epoch 0).
    pub days_since_last_activity: f64,
    /// Lifetime order count.
    pub total_orders: f64,
    /// Lifetime spend in rupees.
    pub total_spent: f64,
    /// Account age in days.
    pub account_age_days: f64,
    /// Engagement score in [0, 1].
    pub engagement_score: f64,
    /// Activity within the last 7 days.
    pub has_recent_purchase: bool,
}

/// Churn-risk band, strict thresholds on probability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// p <= 0.4
    #[default]
    Low,
    /// 0.4 < p <= 0.6
    Medium,
    /// 0.6 < p <= 0.8
    High,
    /// p > 0.8
    Critical,
}

impl RiskLevel {
    /// Classify a churn probability into its risk band.
    ///
    /// Comparisons are strict: 0.8 is `High`, anything above is `Critical`.
    #[must_use]
    pub fn for_probability(p: f64) -> Self {
        if p > 0.8 {
            RiskLevel::Critical
        } else if p > 0.6 {
            RiskLevel::High
        } else if p > 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Churn prediction for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnPrediction {
    /// The scored user's id.
    pub user_id: String,
    /// Churn probability in [0, 1].
    pub churn_probability: f64,
    /// Probability above 0.7.
    pub is_at_risk: bool,
    /// Risk band for the probability.
    pub risk_level: RiskLevel,
    /// Zero to two retention actions, strongest band first.
    pub recommendations: Vec<String>,
}

/// Fixed-coefficient churn predictor.
///
/// # Examples
///
/// ```
/// use agrolytics::churn::{ChurnPredictor, RiskLevel};
/// use agrolytics::record::UserRecord;
///
/// let reference = 1_700_000_000_000;
/// let predictor = ChurnPredictor::new().with_reference_time(reference);
///
/// let mut user = UserRecord::new("u-9");
/// user.last_activity = Some(reference);
/// user.created_at = Some(reference);
/// user.total_orders = Some(40.0);
/// user.engagement_score = Some(0.9);
///
/// let prediction = predictor.predict(&user).unwrap();
/// assert_eq!(prediction.risk_level, RiskLevel::Low);
/// assert!(!prediction.is_at_risk);
/// ```
#[derive(Debug, Clone)]
pub struct ChurnPredictor {
    reference_time_ms: i64,
}

impl ChurnPredictor {
    /// Create a predictor referenced to the current wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference_time_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Set the reference time (epoch milliseconds) for recency computation.
    #[must_use]
    pub fn with_reference_time(mut self, epoch_ms: i64) -> Self {
        self.reference_time_ms = epoch_ms;
        self
    }

    /// Derive model inputs from a user record.
    ///
    /// Missing dates default to epoch 0, so their day counts are huge and
    /// push the record firmly toward churn.
    #[must_use]
    pub fn features(&self, user: &UserRecord) -> ChurnFeatures {
        let days_since_last_activity =
            (self.reference_time_ms - user.last_activity.unwrap_or(0)) as f64 / MS_PER_DAY;
        let account_age_days =
            (self.reference_time_ms - user.created_at.unwrap_or(0)) as f64 / MS_PER_DAY;

        ChurnFeatures {
            days_since_last_activity,
            total_orders: user.total_orders.unwrap_or(0.0),
            total_spent: user.total_spent.unwrap_or(0.0),
            account_age_days,
            engagement_score: user.engagement_score.unwrap_or(0.0),
            has_recent_purchase: days_since_last_activity < 7.0,
        }
    }

    /// Score one user.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::MalformedRecord` when the record has no
    /// `_id`; a prediction without an owner cannot be acted on.
    pub fn predict(&self, user: &UserRecord) -> Result<ChurnPrediction> {
        if user.id.is_empty() {
            return Err(AnalyticsError::malformed_record(
                "churn prediction",
                "record has no _id",
            ));
        }

        let features = self.features(user);
        let probability = Self::probability(&features);

        Ok(ChurnPrediction {
            user_id: user.id.clone(),
            churn_probability: probability,
            is_at_risk: probability > AT_RISK_THRESHOLD,
            risk_level: RiskLevel::for_probability(probability),
            recommendations: recommendations_for(probability),
        })
    }

    /// Score one user, degrading to the neutral prediction on failure.
    ///
    /// The error is reported through the `log` facade and the returned
    /// prediction has an empty id, zero probability, and no
    /// recommendations.
    #[must_use]
    pub fn predict_or_default(&self, user: &UserRecord) -> ChurnPrediction {
        match self.predict(user) {
            Ok(prediction) => prediction,
            Err(err) => {
                log::warn!("churn prediction fell back to default: {err}");
                ChurnPrediction::default()
            }
        }
    }

    /// Churn probability for a feature set.
    fn probability(features: &ChurnFeatures) -> f64 {
        let recent = if features.has_recent_purchase { 1.0 } else { 0.0 };
        let logit = INTERCEPT
            + W_DAYS_SINCE_ACTIVITY * features.days_since_last_activity
            + W_TOTAL_ORDERS * features.total_orders
            + W_TOTAL_SPENT * features.total_spent
            + W_ACCOUNT_AGE_DAYS * features.account_age_days
            + W_ENGAGEMENT * features.engagement_score
            + W_RECENT_PURCHASE * recent;
        Self::sigmoid(logit)
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }
}

impl Default for ChurnPredictor {
    fn default() -> Self {
        Self::new()
    }
}

/// Retention actions for a probability band.
fn recommendations_for(p: f64) -> Vec<String> {
    if p > 0.8 {
        vec![
            "Call the customer with a win-back offer".to_string(),
            "Bundle a steep discount on their top category".to_string(),
        ]
    } else if p > 0.6 {
        vec![
            "Send a re-engagement SMS with seasonal picks".to_string(),
            "Highlight free delivery on the next order".to_string(),
        ]
    } else if p > 0.4 {
        vec!["Include the customer in the next seasonal campaign".to_string()]
    } else {
        Vec::new()
    }
}
