//! Agrolytics: customer analytics for agricultural marketplaces in pure Rust.
//!
//! Agrolytics turns raw per-user activity and per-order history into
//! behavioral segments, churn-risk scores, personalized offers, cross-sell
//! rules, and campaign plans. Everything runs as in-memory batch
//! computation over fixed-coefficient heuristics; nothing trains or
//! persists.
//!
//! # Quick Start
//!
//! ```
//! use agrolytics::prelude::*;
//!
//! let reference = 1_700_000_000_000;
//!
//! let mut farmer = UserRecord::new("farmer-1");
//! farmer.total_orders = Some(14.0);
//! farmer.total_spent = Some(5200.0);
//! farmer.last_activity = Some(reference - 86_400_000);
//! farmer.created_at = Some(reference - 400 * 86_400_000);
//!
//! // Segment the audience.
//! let extractor = FeatureExtractor::new().with_reference_time(reference);
//! let features = extractor.extract_all(&[farmer.clone()]);
//! let segmentation = SegmentationEngine::new()
//!     .with_random_state(42)
//!     .segment(&features);
//! assert_eq!(segmentation.segments.len(), 3);
//!
//! // Score churn risk.
//! let predictor = ChurnPredictor::new().with_reference_time(reference);
//! let prediction = predictor.predict(&farmer).unwrap();
//! assert!(!prediction.is_at_risk);
//! ```
//!
//! # Modules
//!
//! - [`record`]: Typed input records and JSON ingestion
//! - [`features`]: Fixed-shape behavioral feature extraction
//! - [`segmentation`]: K-means behavioral segments
//! - [`churn`]: Fixed-coefficient churn-risk scoring
//! - [`offers`]: Engagement scoring, seasons, personalized offers
//! - [`basket`]: Frequent itemsets and association rules over orders
//! - [`campaign`]: Segment-targeted campaign planning
//! - [`metrics`]: Segmentation quality metrics
//! - [`error`]: Error types

pub mod basket;
pub mod campaign;
pub mod churn;
pub mod error;
pub mod features;
pub mod metrics;
pub mod offers;
pub mod prelude;
pub mod record;
pub mod segmentation;

pub use error::{AnalyticsError, Result};
pub use features::{FeatureExtractor, FeatureVector};
pub use record::{HistoryRecord, OrderRecord, UserRecord};
