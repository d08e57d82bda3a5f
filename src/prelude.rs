//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use agrolytics::prelude::*;
//! ```

pub use crate::record::{HistoryRecord, OrderItem, OrderRecord, UserRecord};
pub use crate::features::{FeatureExtractor, FeatureVector};
pub use crate::segmentation::{Segment, Segmentation, SegmentationEngine};
pub use crate::churn::{ChurnFeatures, ChurnPrediction, ChurnPredictor, RiskLevel};
pub use crate::offers::{Offer, OfferGenerator, OfferKind, PurchasePreferences, Season};
pub use crate::basket::{AssociationRule, BasketAnalysis, BasketAnalyzer, FrequentItemset};
pub use crate::campaign::{CampaignOptimizer, CampaignPlan, SegmentPlan};
pub use crate::metrics::{inertia, silhouette_score};
pub use crate::error::{AnalyticsError, Result};
