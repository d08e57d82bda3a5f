//! Campaign planning.
//!
//! Segments the audience, fills a per-type message template per segment,
//! and attaches fixed conversion economics. Message placeholders:
//! `{season}`, `{discount}`, `{category}`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::basket::BasketAnalysis;
use crate::features::FeatureExtractor;
use crate::offers::Season;
use crate::record::UserRecord;
use crate::segmentation::SegmentationEngine;

/// Per-user messaging cost in rupees.
const COST_PER_USER: f64 = 0.3;

/// Plan for one audience segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPlan {
    /// 1-based segment id.
    pub segment_id: usize,
    /// Segment display name.
    pub segment_name: String,
    /// Users in the segment.
    pub size: usize,
    /// Message with placeholders substituted.
    pub message: String,
    /// Hour of day (0-23) to send.
    pub send_hour: u32,
    /// Predicted conversion rate.
    pub conversion_rate: f64,
    /// Assumed average order value in rupees.
    pub average_order_value: f64,
    /// `size * conversion_rate * average_order_value`.
    pub expected_revenue: f64,
}

/// A complete campaign plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPlan {
    /// Requested campaign type, echoed back.
    pub campaign_type: String,
    /// Season at planning time, used for `{season}` substitution.
    pub season: Option<Season>,
    /// Per-segment plans, ordered by segment id.
    pub segments: Vec<SegmentPlan>,
    /// Total targeted users.
    pub total_users: usize,
    /// `total_users * 0.3` rupees.
    pub estimated_cost: f64,
    /// Sum of per-segment expected revenue.
    pub expected_revenue: f64,
}

/// Segmentation-driven campaign planner.
///
/// # Examples
///
/// ```
/// use agrolytics::campaign::CampaignOptimizer;
/// use agrolytics::record::UserRecord;
///
/// let users = vec![UserRecord::new("u-1"), UserRecord::new("u-2")];
/// let optimizer = CampaignOptimizer::new().with_random_state(7);
///
/// let plan = optimizer.optimize(&users, "promotional");
/// assert_eq!(plan.total_users, 2);
/// assert_eq!(plan.segments.len(), 3);
/// assert_eq!(plan.estimated_cost, 0.6);
/// ```
#[derive(Debug, Clone)]
pub struct CampaignOptimizer {
    reference_time_ms: i64,
    random_state: Option<u64>,
}

impl CampaignOptimizer {
    /// Create a planner referenced to the current wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference_time_ms: Utc::now().timestamp_millis(),
            random_state: None,
        }
    }

    /// Set the reference time (epoch milliseconds) for features and season.
    #[must_use]
    pub fn with_reference_time(mut self, epoch_ms: i64) -> Self {
        self.reference_time_ms = epoch_ms;
        self
    }

    /// Set the random seed for reproducible segmentation.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Plan a campaign for the given users.
    #[must_use]
    pub fn optimize(&self, users: &[UserRecord], campaign_type: &str) -> CampaignPlan {
        self.optimize_with_insights(users, campaign_type, None)
    }

    /// Plan a campaign, optionally steering `{category}` by the strongest
    /// cross-sell rule from a basket analysis.
    #[must_use]
    pub fn optimize_with_insights(
        &self,
        users: &[UserRecord],
        campaign_type: &str,
        insights: Option<&BasketAnalysis>,
    ) -> CampaignPlan {
        if users.is_empty() {
            return CampaignPlan {
                campaign_type: campaign_type.to_string(),
                season: Some(Season::for_epoch_ms(self.reference_time_ms)),
                ..CampaignPlan::default()
            };
        }

        let extractor = FeatureExtractor::new().with_reference_time(self.reference_time_ms);
        let features = extractor.extract_all(users);

        let mut engine = SegmentationEngine::new();
        if let Some(seed) = self.random_state {
            engine = engine.with_random_state(seed);
        }
        let segmentation = engine.segment(&features);

        let season = Season::for_epoch_ms(self.reference_time_ms);
        let template = message_template(campaign_type);
        let base = base_rate(campaign_type);

        let cross_sell: Option<String> = insights
            .and_then(|analysis| analysis.rules.first())
            .and_then(|rule| rule.consequent.first())
            .cloned();

        let mut segment_plans = Vec::with_capacity(segmentation.segments.len());
        let mut expected_revenue = 0.0;

        for segment in &segmentation.segments {
            let category = cross_sell
                .as_deref()
                .unwrap_or_else(|| segment_category(&segment.name));
            let discount = segment_discount(&segment.name);

            let message = template
                .replace("{season}", &season.to_string())
                .replace("{discount}", &discount.to_string())
                .replace("{category}", category);

            let conversion_rate = base * segment_multiplier(&segment.name);
            let average_order_value = segment_order_value(&segment.name);
            let revenue = segment.size as f64 * conversion_rate * average_order_value;
            expected_revenue += revenue;

            segment_plans.push(SegmentPlan {
                segment_id: segment.id,
                segment_name: segment.name.clone(),
                size: segment.size,
                message,
                send_hour: send_hour(&segment.name),
                conversion_rate,
                average_order_value,
                expected_revenue: revenue,
            });
        }

        CampaignPlan {
            campaign_type: campaign_type.to_string(),
            season: Some(season),
            segments: segment_plans,
            total_users: users.len(),
            estimated_cost: users.len() as f64 * COST_PER_USER,
            expected_revenue,
        }
    }
}

impl Default for CampaignOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Message template per campaign type; unknown types get the generic one.
fn message_template(campaign_type: &str) -> &'static str {
    match campaign_type {
        "promotional" => "Get {discount}% off on {category} this {season} season!",
        "seasonal" => "{season} season is here! Stock up on {category} now",
        "reengagement" => "We miss you! Here's {discount}% off to welcome you back",
        "loyalty" => "Thank you for staying with us! Enjoy {discount}% off on {category}",
        _ => "Check out our latest deals on {category}",
    }
}

/// Baseline conversion rate per campaign type.
fn base_rate(campaign_type: &str) -> f64 {
    match campaign_type {
        "promotional" => 0.05,
        "seasonal" => 0.06,
        "reengagement" => 0.03,
        "loyalty" => 0.08,
        _ => 0.04,
    }
}

fn segment_multiplier(segment_name: &str) -> f64 {
    match segment_name {
        "High Engagement" => 1.5,
        "Medium Engagement" => 1.0,
        "Low Engagement" => 0.5,
        _ => 1.0,
    }
}

fn send_hour(segment_name: &str) -> u32 {
    match segment_name {
        "High Engagement" => 9,
        "Medium Engagement" => 12,
        "Low Engagement" => 18,
        _ => 10,
    }
}

fn segment_order_value(segment_name: &str) -> f64 {
    match segment_name {
        "High Engagement" => 2500.0,
        "Medium Engagement" => 1200.0,
        "Low Engagement" => 500.0,
        _ => 800.0,
    }
}

fn segment_discount(segment_name: &str) -> f64 {
    match segment_name {
        "Low Engagement" => 20.0,
        "Medium Engagement" => 15.0,
        "High Engagement" => 10.0,
        _ => 15.0,
    }
}

fn segment_category(segment_name: &str) -> &'static str {
    match segment_name {
        "Low Engagement" => "seeds",
        "Medium Engagement" => "fertilizers",
        "High Engagement" => "farm equipment",
        _ => "farm supplies",
    }
}
