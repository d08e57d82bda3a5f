//! Personalized offer generation.
//!
//! Scores a user's engagement from activity history, summarizes purchase
//! preferences, and evaluates independent offer rules. Several rules can
//! fire for the same user.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{HistoryRecord, UserRecord};

/// Indian agricultural season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Monsoon crop season, June through October.
    Kharif,
    /// Winter crop season, November through March.
    Rabi,
    /// April and May.
    Summer,
}

impl Season {
    /// Season for a calendar month (1 = January).
    ///
    /// # Panics
    ///
    /// Panics if `month` is outside `1..=12`.
    #[must_use]
    pub fn for_month(month: u32) -> Self {
        assert!((1..=12).contains(&month), "month must be 1..=12, got {month}");
        match month {
            6..=10 => Season::Kharif,
            11 | 12 | 1..=3 => Season::Rabi,
            _ => Season::Summer,
        }
    }

    /// Season at an epoch-millisecond timestamp.
    #[must_use]
    pub fn for_epoch_ms(epoch_ms: i64) -> Self {
        let month = DateTime::<Utc>::from_timestamp_millis(epoch_ms).map_or(1, |dt| dt.month());
        Self::for_month(month)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Summer => "Summer",
        };
        write!(f, "{name}")
    }
}

/// Offer rule that produced an [`Offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OfferKind {
    /// Discount on the user's favorite category.
    CategoryDiscount,
    /// Flat seasonal discount for the current season.
    Seasonal,
    /// Free delivery for highly engaged users.
    LoyaltyReward,
    /// Win-back discount for dormant users.
    ReEngagement,
}

/// One personalized offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Which rule fired.
    pub kind: OfferKind,
    /// Customer-facing headline.
    pub title: String,
    /// Discount percentage; 0 for non-discount perks.
    pub discount_percent: f64,
    /// Target category, for category-scoped offers.
    pub category: Option<String>,
    /// Season, for season-scoped offers.
    pub season: Option<Season>,
}

/// Per-category spending summary for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePreferences {
    /// Total spend per category.
    pub category_totals: BTreeMap<String, f64>,
    /// Categories by spend descending; ties broken by name ascending.
    pub favorite_categories: Vec<String>,
}

impl PurchasePreferences {
    /// The highest-spend category, if any history carried one.
    #[must_use]
    pub fn top_category(&self) -> Option<&str> {
        self.favorite_categories.first().map(String::as_str)
    }
}

/// Rule-based offer generator.
///
/// # Examples
///
/// ```
/// use agrolytics::offers::{OfferGenerator, OfferKind};
/// use agrolytics::record::UserRecord;
///
/// let generator = OfferGenerator::new();
/// let offers = generator.personalized_offers(&UserRecord::new("u-1"), &[]);
///
/// // A user with no history still gets the seasonal and win-back offers.
/// assert_eq!(offers.len(), 2);
/// assert_eq!(offers[0].kind, OfferKind::Seasonal);
/// assert_eq!(offers[1].kind, OfferKind::ReEngagement);
/// ```
#[derive(Debug, Clone)]
pub struct OfferGenerator {
    reference_time_ms: i64,
}

impl OfferGenerator {
    /// Create a generator referenced to the current wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference_time_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Set the reference time (epoch milliseconds) for recency and season.
    #[must_use]
    pub fn with_reference_time(mut self, epoch_ms: i64) -> Self {
        self.reference_time_ms = epoch_ms;
        self
    }

    /// Season at the generator's reference time.
    #[must_use]
    pub fn season(&self) -> Season {
        Season::for_epoch_ms(self.reference_time_ms)
    }

    /// Engagement score in [0, 1].
    ///
    /// Sub-scores: recency up to 30 points (a point per day under 30 days
    /// idle), frequency up to 25 (2 per order), monetary up to 25 (1 per
    /// 100 rupees), diversity up to 20 (5 per distinct activity type).
    /// The sum is clamped to [0, 100] and scaled down.
    #[must_use]
    pub fn engagement_score(&self, user: &UserRecord, history: &[HistoryRecord]) -> f64 {
        let days_idle =
            (self.reference_time_ms - user.last_activity.unwrap_or(0)) as f64 / 86_400_000.0;
        let recency = (30.0 - days_idle).max(0.0);
        let frequency = (user.total_orders.unwrap_or(0.0) * 2.0).min(25.0);
        let monetary = (user.total_spent.unwrap_or(0.0) / 100.0).min(25.0);

        let distinct_types: HashSet<&str> = history
            .iter()
            .filter_map(|h| h.activity_type.as_deref())
            .collect();
        let diversity = (distinct_types.len() as f64 * 5.0).min(20.0);

        (recency + frequency + monetary + diversity).clamp(0.0, 100.0) / 100.0
    }

    /// Summarize per-category spending from history entries.
    ///
    /// Entries without a category are skipped; missing amounts count as
    /// zero via record defaults.
    #[must_use]
    pub fn analyze_preferences(&self, history: &[HistoryRecord]) -> PurchasePreferences {
        let mut category_totals: BTreeMap<String, f64> = BTreeMap::new();
        for entry in history {
            let Some(category) = &entry.category else {
                continue;
            };
            *category_totals.entry(category.clone()).or_insert(0.0) += entry.amount;
        }

        let mut ranked: Vec<(&String, &f64)> = category_totals.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        let favorite_categories = ranked.into_iter().map(|(name, _)| name.clone()).collect();

        PurchasePreferences {
            category_totals,
            favorite_categories,
        }
    }

    /// Evaluate every offer rule for one user.
    ///
    /// Rules fire independently: favorite-category discount (15% above 0.7
    /// engagement, otherwise 10%), flat 12% seasonal discount, free
    /// delivery above 0.8 engagement, and a 20% win-back below 0.3.
    #[must_use]
    pub fn personalized_offers(&self, user: &UserRecord, history: &[HistoryRecord]) -> Vec<Offer> {
        let engagement = self.engagement_score(user, history);
        let preferences = self.analyze_preferences(history);
        let season = self.season();

        let mut offers = Vec::new();

        if let Some(category) = preferences.top_category() {
            let discount = if engagement > 0.7 { 15.0 } else { 10.0 };
            offers.push(Offer {
                kind: OfferKind::CategoryDiscount,
                title: format!("Special {discount}% off on {category}"),
                discount_percent: discount,
                category: Some(category.to_string()),
                season: None,
            });
        }

        offers.push(Offer {
            kind: OfferKind::Seasonal,
            title: format!("{season} season essentials at 12% off"),
            discount_percent: 12.0,
            category: None,
            season: Some(season),
        });

        if engagement > 0.8 {
            offers.push(Offer {
                kind: OfferKind::LoyaltyReward,
                title: "Free delivery on your next order".to_string(),
                discount_percent: 0.0,
                category: None,
                season: None,
            });
        }

        if engagement < 0.3 {
            offers.push(Offer {
                kind: OfferKind::ReEngagement,
                title: "We miss you! 20% off your next order".to_string(),
                discount_percent: 20.0,
                category: None,
                season: None,
            });
        }

        offers
    }
}

impl Default for OfferGenerator {
    fn default() -> Self {
        Self::new()
    }
}
