//! Property-based tests using proptest.
//!
//! These tests verify invariants of the analytics engines over arbitrary
//! marketplace records.

use agrolytics::prelude::*;
use proptest::prelude::*;

/// Reference time after every generated timestamp.
const REFERENCE: i64 = 1_800_000_000_000;
const DAY_MS: i64 = 86_400_000;

// Strategy for generating user records with any mix of missing fields
fn user_strategy() -> impl Strategy<Value = UserRecord> {
    (
        proptest::option::of(0.0f64..500.0),
        proptest::option::of(0.0f64..200_000.0),
        proptest::option::of(1_400_000_000_000i64..REFERENCE),
        proptest::option::of(1_300_000_000_000i64..REFERENCE),
        proptest::option::of(0.0f64..=1.0),
    )
        .prop_map(|(orders, spent, last, created, engagement)| UserRecord {
            id: "u-prop".to_string(),
            total_orders: orders,
            total_spent: spent,
            last_activity: last,
            created_at: created,
            engagement_score: engagement,
        })
}

// Strategy for generating activity history
fn history_strategy() -> impl Strategy<Value = Vec<HistoryRecord>> {
    let entry = (
        proptest::option::of(
            proptest::sample::select(vec!["seeds", "fertilizers", "tools", "irrigation"])
                .prop_map(String::from),
        ),
        0.0f64..5_000.0,
        proptest::option::of(
            proptest::sample::select(vec!["purchase", "browse", "inquiry"])
                .prop_map(String::from),
        ),
    )
        .prop_map(|(category, amount, activity_type)| HistoryRecord {
            category,
            amount,
            activity_type,
        });
    proptest::collection::vec(entry, 0..12)
}

// Strategy for generating order batches from a small product pool
fn orders_strategy() -> impl Strategy<Value = Vec<OrderRecord>> {
    let product = proptest::sample::select(vec![
        "wheat seed",
        "urea",
        "dap",
        "sprayer",
        "rope",
        "mulch film",
    ]);
    let order =
        proptest::collection::vec(product, 0..5).prop_map(|p| OrderRecord::from_products(&p));
    proptest::collection::vec(order, 0..15)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Churn properties
    #[test]
    fn churn_probability_is_a_probability(user in user_strategy()) {
        let predictor = ChurnPredictor::new().with_reference_time(REFERENCE);
        let prediction = predictor.predict(&user).unwrap();
        prop_assert!(prediction.churn_probability >= 0.0);
        prop_assert!(prediction.churn_probability <= 1.0);
    }

    #[test]
    fn churn_risk_level_matches_probability(user in user_strategy()) {
        let predictor = ChurnPredictor::new().with_reference_time(REFERENCE);
        let prediction = predictor.predict(&user).unwrap();
        let p = prediction.churn_probability;
        let expected = RiskLevel::for_probability(p);
        prop_assert_eq!(prediction.risk_level, expected);
        prop_assert_eq!(prediction.is_at_risk, p > 0.7);
    }

    #[test]
    fn churn_recommendation_count_tracks_band(user in user_strategy()) {
        let predictor = ChurnPredictor::new().with_reference_time(REFERENCE);
        let prediction = predictor.predict(&user).unwrap();
        let expected = match prediction.risk_level {
            RiskLevel::Critical | RiskLevel::High => 2,
            RiskLevel::Medium => 1,
            RiskLevel::Low => 0,
        };
        prop_assert_eq!(prediction.recommendations.len(), expected);
    }

    #[test]
    fn churn_grows_with_idle_days(days_a in 0i64..3650, days_b in 0i64..3650) {
        let (lo, hi) = if days_a <= days_b { (days_a, days_b) } else { (days_b, days_a) };
        let predictor = ChurnPredictor::new().with_reference_time(REFERENCE);

        let mut user = UserRecord::new("u-mono");
        user.created_at = Some(REFERENCE);
        user.total_orders = Some(5.0);
        user.total_spent = Some(800.0);

        user.last_activity = Some(REFERENCE - lo * DAY_MS);
        let p_lo = predictor.predict(&user).unwrap().churn_probability;

        user.last_activity = Some(REFERENCE - hi * DAY_MS);
        let p_hi = predictor.predict(&user).unwrap().churn_probability;

        prop_assert!(p_lo <= p_hi);
    }

    // Segmentation properties
    #[test]
    fn segmentation_partitions_any_audience(
        users in proptest::collection::vec(user_strategy(), 1..40),
        seed in proptest::num::u64::ANY,
    ) {
        let extractor = FeatureExtractor::new().with_reference_time(REFERENCE);
        let features = extractor.extract_all(&users);
        let result = SegmentationEngine::new().with_random_state(seed).segment(&features);

        prop_assert_eq!(result.segments.len(), 3);
        let total: usize = result.segments.iter().map(|s| s.size).sum();
        prop_assert_eq!(total, users.len());
        prop_assert_eq!(result.assignments.len(), users.len());
        for &assignment in &result.assignments {
            prop_assert!(assignment < 3);
        }
        for segment in &result.segments {
            prop_assert_eq!(segment.size, segment.members.len());
            prop_assert_eq!(segment.centroid.is_none(), segment.size == 0);
        }
    }

    #[test]
    fn segmentation_is_seed_deterministic(
        users in proptest::collection::vec(user_strategy(), 1..25),
        seed in proptest::num::u64::ANY,
    ) {
        let extractor = FeatureExtractor::new().with_reference_time(REFERENCE);
        let features = extractor.extract_all(&users);
        let a = SegmentationEngine::new().with_random_state(seed).segment(&features);
        let b = SegmentationEngine::new().with_random_state(seed).segment(&features);
        prop_assert_eq!(a, b);
    }

    // Offer properties
    #[test]
    fn engagement_score_stays_in_unit_interval(
        user in user_strategy(),
        history in history_strategy(),
    ) {
        let generator = OfferGenerator::new().with_reference_time(REFERENCE);
        let score = generator.engagement_score(&user, &history);
        prop_assert!(score >= 0.0);
        prop_assert!(score <= 1.0);
    }

    #[test]
    fn offer_discounts_come_from_fixed_menu(
        user in user_strategy(),
        history in history_strategy(),
    ) {
        let generator = OfferGenerator::new().with_reference_time(REFERENCE);
        let offers = generator.personalized_offers(&user, &history);
        prop_assert!(!offers.is_empty());
        for offer in &offers {
            let discount = offer.discount_percent;
            prop_assert!(
                discount == 0.0
                    || discount == 10.0
                    || discount == 12.0
                    || discount == 15.0
                    || discount == 20.0,
                "Unexpected discount {discount}"
            );
        }
    }

    #[test]
    fn favorite_categories_are_ranked_by_spend(history in history_strategy()) {
        let generator = OfferGenerator::new().with_reference_time(REFERENCE);
        let preferences = generator.analyze_preferences(&history);
        let totals = &preferences.category_totals;
        prop_assert_eq!(preferences.favorite_categories.len(), totals.len());
        for pair in preferences.favorite_categories.windows(2) {
            prop_assert!(totals[&pair[0]] >= totals[&pair[1]]);
        }
    }

    // Basket properties
    #[test]
    fn basket_supports_are_valid_fractions(orders in orders_strategy()) {
        let analysis = BasketAnalyzer::new().analyze(&orders);
        for pattern in &analysis.patterns {
            prop_assert!(pattern.support > 0.0);
            prop_assert!(pattern.support <= 1.0);
            prop_assert_eq!(pattern.items.len(), 1);
        }
        for pair in analysis.patterns.windows(2) {
            prop_assert!(pair[0].support >= pair[1].support);
        }
        prop_assert!(analysis.rules.is_empty());
        prop_assert!(analysis.average_basket_size >= 0.0);
    }

    // Campaign properties
    #[test]
    fn campaign_cost_is_thirty_paise_per_user(
        users in proptest::collection::vec(user_strategy(), 0..50),
        campaign_type in proptest::sample::select(vec![
            "promotional", "seasonal", "reengagement", "loyalty", "unheard-of",
        ]),
    ) {
        let plan = CampaignOptimizer::new()
            .with_reference_time(REFERENCE)
            .with_random_state(9)
            .optimize(&users, campaign_type);

        prop_assert_eq!(plan.total_users, users.len());
        prop_assert_eq!(plan.estimated_cost, users.len() as f64 * 0.3);

        let sizes: usize = plan.segments.iter().map(|s| s.size).sum();
        prop_assert_eq!(sizes, users.len());

        for segment in &plan.segments {
            prop_assert!(!segment.message.contains('{'), "message contains unreplaced placeholder");
            prop_assert!(segment.conversion_rate > 0.0);
            prop_assert!(segment.send_hour < 24);
        }
    }
}
