//! Market-basket analysis.
//!
//! Mines frequent itemsets and association rules from order line items.
//! Itemset generation stops at single items, so `analyze` reports item
//! popularity and the rule stage finds nothing to expand; callers with
//! multi-item itemsets can drive [`BasketAnalyzer::generate_rules`]
//! directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::OrderRecord;

const MAX_RULES: usize = 20;

/// A frequently purchased itemset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequentItemset {
    /// Product ids, sorted ascending.
    pub items: Vec<String>,
    /// Fraction of orders containing every item.
    pub support: f64,
}

/// An association rule: orders with the antecedent tend to contain the
/// consequent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRule {
    /// Items on the "if" side.
    pub antecedent: Vec<String>,
    /// Items on the "then" side.
    pub consequent: Vec<String>,
    /// Support of the full itemset.
    pub support: f64,
    /// P(consequent | antecedent).
    pub confidence: f64,
    /// Confidence relative to the consequent's base rate.
    pub lift: f64,
}

/// Result of a basket analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketAnalysis {
    /// Association rules, confidence descending, at most 20.
    pub rules: Vec<AssociationRule>,
    /// Frequent itemsets, support descending.
    pub patterns: Vec<FrequentItemset>,
    /// Number of orders analyzed.
    pub total_orders: usize,
    /// Mean number of distinct products per order.
    pub average_basket_size: f64,
}

/// Frequent-itemset and association-rule miner over orders.
///
/// # Examples
///
/// ```
/// use agrolytics::basket::BasketAnalyzer;
/// use agrolytics::record::OrderRecord;
///
/// let orders = vec![
///     OrderRecord::from_products(&["wheat seed", "urea"]),
///     OrderRecord::from_products(&["wheat seed"]),
/// ];
///
/// let analysis = BasketAnalyzer::new().analyze(&orders);
/// assert_eq!(analysis.total_orders, 2);
/// assert_eq!(analysis.patterns[0].items, vec!["wheat seed".to_string()]);
/// assert_eq!(analysis.patterns[0].support, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct BasketAnalyzer {
    min_support: f64,
    min_confidence: f64,
}

impl Default for BasketAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BasketAnalyzer {
    /// Creates an analyzer with `min_support` 0.01 and `min_confidence` 0.1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_support: 0.01,
            min_confidence: 0.1,
        }
    }

    /// Sets the minimum support threshold.
    ///
    /// # Panics
    ///
    /// Panics if `min_support` is not in `(0, 1]`.
    #[must_use]
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        assert!(
            min_support > 0.0 && min_support <= 1.0,
            "min_support must be in (0, 1], got {min_support}"
        );
        self.min_support = min_support;
        self
    }

    /// Sets the minimum confidence threshold.
    ///
    /// # Panics
    ///
    /// Panics if `min_confidence` is not in `[0, 1]`.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&min_confidence),
            "min_confidence must be in [0, 1], got {min_confidence}"
        );
        self.min_confidence = min_confidence;
        self
    }

    /// Minimum support threshold.
    #[must_use]
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Minimum confidence threshold.
    #[must_use]
    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Analyze a batch of orders.
    ///
    /// Empty input yields an empty analysis with zeroed counters.
    #[must_use]
    pub fn analyze(&self, orders: &[OrderRecord]) -> BasketAnalysis {
        if orders.is_empty() {
            return BasketAnalysis::default();
        }

        let transactions = Self::transactions(orders);
        let patterns = self.frequent_itemsets(&transactions);
        let rules = self.generate_rules(&patterns, &transactions);

        let total_orders = transactions.len();
        let item_count: usize = transactions.iter().map(Vec::len).sum();
        let average_basket_size = item_count as f64 / total_orders as f64;

        BasketAnalysis {
            rules,
            patterns,
            total_orders,
            average_basket_size,
        }
    }

    /// Generate association rules from multi-item itemsets.
    ///
    /// Every non-empty proper subset of an itemset becomes an antecedent;
    /// rules below the confidence threshold are dropped, survivors are
    /// sorted by confidence descending and capped at 20. Single-item
    /// itemsets produce nothing, so rules from [`analyze`](Self::analyze)
    /// are empty until itemset generation grows multi-item support.
    #[must_use]
    pub fn generate_rules(
        &self,
        itemsets: &[FrequentItemset],
        transactions: &[Vec<String>],
    ) -> Vec<AssociationRule> {
        let mut rules = Vec::new();

        for itemset in itemsets {
            let n = itemset.items.len();
            if n <= 1 {
                continue;
            }

            let full_mask = (1usize << n) - 1;
            for mask in 1..full_mask {
                let antecedent: Vec<String> = (0..n)
                    .filter(|i| mask & (1 << i) != 0)
                    .map(|i| itemset.items[i].clone())
                    .collect();
                let consequent: Vec<String> = (0..n)
                    .filter(|i| mask & (1 << i) == 0)
                    .map(|i| itemset.items[i].clone())
                    .collect();

                let antecedent_support = Self::calculate_support(&antecedent, transactions);
                let consequent_support = Self::calculate_support(&consequent, transactions);
                if antecedent_support <= 0.0 || consequent_support <= 0.0 {
                    continue;
                }

                let confidence = itemset.support / antecedent_support;
                if confidence < self.min_confidence {
                    continue;
                }

                rules.push(AssociationRule {
                    antecedent,
                    consequent,
                    support: itemset.support,
                    confidence,
                    lift: confidence / consequent_support,
                });
            }
        }

        rules.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.antecedent.cmp(&b.antecedent))
        });
        rules.truncate(MAX_RULES);
        rules
    }

    /// One transaction per order: distinct product ids, sorted.
    fn transactions(orders: &[OrderRecord]) -> Vec<Vec<String>> {
        orders
            .iter()
            .map(|order| {
                let mut items: Vec<String> = order
                    .items
                    .iter()
                    .filter(|item| !item.product.is_empty())
                    .map(|item| item.product.clone())
                    .collect();
                items.sort();
                items.dedup();
                items
            })
            .collect()
    }

    /// Frequent single items: occurrence count over the support threshold.
    fn frequent_itemsets(&self, transactions: &[Vec<String>]) -> Vec<FrequentItemset> {
        let total = transactions.len() as f64;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for transaction in transactions {
            for item in transaction {
                *counts.entry(item.as_str()).or_insert(0) += 1;
            }
        }

        let mut itemsets: Vec<FrequentItemset> = counts
            .into_iter()
            .filter_map(|(item, count)| {
                let support = count as f64 / total;
                (support >= self.min_support).then(|| FrequentItemset {
                    items: vec![item.to_string()],
                    support,
                })
            })
            .collect();

        itemsets.sort_by(|a, b| {
            b.support
                .partial_cmp(&a.support)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.items.cmp(&b.items))
        });
        itemsets
    }

    /// Fraction of transactions containing every item.
    fn calculate_support(items: &[String], transactions: &[Vec<String>]) -> f64 {
        if transactions.is_empty() {
            return 0.0;
        }
        let count = transactions
            .iter()
            .filter(|t| items.iter().all(|item| t.contains(item)))
            .count();
        count as f64 / transactions.len() as f64
    }
}
