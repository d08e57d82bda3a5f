//! Typed input records from the persistence collaborator.
//!
//! The marketplace stores users, activity history, and orders as loosely
//! shaped JSON documents. Deserialization applies per-field defaults so a
//! record with missing analytics fields is still usable; only payloads that
//! are not valid JSON at all are rejected. Unknown fields are ignored
//! (marketplace documents carry many that analytics never reads).

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A marketplace user document, reduced to the fields analytics reads.
///
/// All behavioral fields are optional; a fresh or sparsely filled account
/// deserializes cleanly and downstream extraction substitutes defaults.
/// Timestamps are epoch milliseconds, matching the store's date encoding.
///
/// # Examples
///
/// ```
/// use agrolytics::record::UserRecord;
///
/// let user: UserRecord = serde_json::from_str(
///     r#"{"_id": "u-17", "totalOrders": 12, "totalSpent": 4800.0}"#,
/// ).unwrap();
/// assert_eq!(user.id, "u-17");
/// assert_eq!(user.total_orders, Some(12.0));
/// assert_eq!(user.last_activity, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Store document id. Defaults to empty when absent; churn prediction
    /// treats an empty id as a malformed record.
    #[serde(rename = "_id", default)]
    pub id: String,

    /// Lifetime order count.
    #[serde(default)]
    pub total_orders: Option<f64>,

    /// Lifetime spend in rupees.
    #[serde(default)]
    pub total_spent: Option<f64>,

    /// Last activity timestamp, epoch milliseconds.
    #[serde(default)]
    pub last_activity: Option<i64>,

    /// Account creation timestamp, epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<i64>,

    /// Precomputed engagement score in [0, 1], when the store has one.
    #[serde(default)]
    pub engagement_score: Option<f64>,
}

impl UserRecord {
    /// Create a record with the given id and no behavioral fields.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

/// One purchase-history entry for a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Product category of the entry.
    #[serde(default)]
    pub category: Option<String>,

    /// Amount spent on the entry, rupees. Missing amounts count as zero.
    #[serde(default)]
    pub amount: f64,

    /// Activity kind ("purchase", "browse", "inquiry", ...).
    #[serde(rename = "type", default)]
    pub activity_type: Option<String>,
}

impl HistoryRecord {
    /// Create a purchase entry for a category and amount.
    #[must_use]
    pub fn purchase(category: &str, amount: f64) -> Self {
        Self {
            category: Some(category.to_string()),
            amount,
            activity_type: Some("purchase".to_string()),
        }
    }
}

/// One order document, reduced to its line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Line items; empty when the document has none.
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl OrderRecord {
    /// Build an order from product ids.
    #[must_use]
    pub fn from_products(products: &[&str]) -> Self {
        Self {
            items: products
                .iter()
                .map(|p| OrderItem {
                    product: (*p).to_string(),
                })
                .collect(),
        }
    }
}

/// A single line item inside an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product identifier. Defaults to empty when absent.
    #[serde(default)]
    pub product: String,
}

/// Parse an array of user documents from a JSON payload.
///
/// # Errors
///
/// Returns `AnalyticsError::Serialization` when the payload is not valid
/// JSON or not an array of objects. Missing fields never fail.
pub fn users_from_json(json: &str) -> Result<Vec<UserRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse an array of history entries from a JSON payload.
///
/// # Errors
///
/// Returns `AnalyticsError::Serialization` when the payload is not valid
/// JSON or not an array of objects.
pub fn history_from_json(json: &str) -> Result<Vec<HistoryRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse an array of order documents from a JSON payload.
///
/// # Errors
///
/// Returns `AnalyticsError::Serialization` when the payload is not valid
/// JSON or not an array of objects.
pub fn orders_from_json(json: &str) -> Result<Vec<OrderRecord>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_full_payload() {
        let json = r#"{
            "_id": "u-1",
            "totalOrders": 5,
            "totalSpent": 1200.5,
            "lastActivity": 1700000000000,
            "createdAt": 1650000000000,
            "engagementScore": 0.8
        }"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.total_orders, Some(5.0));
        assert_eq!(user.total_spent, Some(1200.5));
        assert_eq!(user.last_activity, Some(1_700_000_000_000));
        assert_eq!(user.created_at, Some(1_650_000_000_000));
        assert_eq!(user.engagement_score, Some(0.8));
    }

    #[test]
    fn test_user_record_missing_fields_default() {
        let user: UserRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(user.id, "");
        assert_eq!(user.total_orders, None);
        assert_eq!(user.total_spent, None);
        assert_eq!(user.last_activity, None);
        assert_eq!(user.created_at, None);
        assert_eq!(user.engagement_score, None);
    }

    #[test]
    fn test_user_record_ignores_unknown_fields() {
        let json = r#"{"_id": "u-2", "name": "Asha", "village": "Nashik", "phone": "x"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u-2");
    }

    #[test]
    fn test_user_record_serializes_camel_case() {
        let user = UserRecord {
            id: "u-3".to_string(),
            total_orders: Some(2.0),
            ..UserRecord::default()
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"_id\":\"u-3\""));
        assert!(json.contains("\"totalOrders\":2.0"));
        assert!(!json.contains("total_orders"));
    }

    #[test]
    fn test_user_record_round_trip() {
        let user = UserRecord {
            id: "u-4".to_string(),
            total_orders: Some(7.0),
            total_spent: Some(350.0),
            last_activity: Some(1_700_000_000_000),
            created_at: Some(1_600_000_000_000),
            engagement_score: Some(0.42),
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: UserRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_history_record_type_rename() {
        let json = r#"{"category": "seeds", "amount": 99.0, "type": "purchase"}"#;
        let entry: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(entry.category.as_deref(), Some("seeds"));
        assert_eq!(entry.amount, 99.0);
        assert_eq!(entry.activity_type.as_deref(), Some("purchase"));
    }

    #[test]
    fn test_history_record_missing_amount_is_zero() {
        let entry: HistoryRecord = serde_json::from_str(r#"{"category": "tools"}"#).unwrap();
        assert_eq!(entry.amount, 0.0);
        assert_eq!(entry.activity_type, None);
    }

    #[test]
    fn test_history_purchase_helper() {
        let entry = HistoryRecord::purchase("fertilizers", 450.0);
        assert_eq!(entry.category.as_deref(), Some("fertilizers"));
        assert_eq!(entry.amount, 450.0);
        assert_eq!(entry.activity_type.as_deref(), Some("purchase"));
    }

    #[test]
    fn test_order_record_items() {
        let json = r#"{"items": [{"product": "wheat seed"}, {"product": "urea"}]}"#;
        let order: OrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product, "wheat seed");
    }

    #[test]
    fn test_order_record_missing_items_is_empty() {
        let order: OrderRecord = serde_json::from_str("{}").unwrap();
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_order_from_products() {
        let order = OrderRecord::from_products(&["a", "b"]);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].product, "b");
    }

    #[test]
    fn test_users_from_json_array() {
        let json = r#"[{"_id": "u-1"}, {"_id": "u-2", "totalOrders": 3}]"#;
        let users = users_from_json(json).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].total_orders, Some(3.0));
    }

    #[test]
    fn test_users_from_json_rejects_malformed() {
        let err = users_from_json("not json at all").unwrap_err();
        assert!(err.to_string().contains("Serialization"));
    }

    #[test]
    fn test_history_from_json_array() {
        let json = r#"[{"category": "seeds", "amount": 10.0, "type": "purchase"}]"#;
        let history = history_from_json(json).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_orders_from_json_array() {
        let json = r#"[{"items": [{"product": "drip kit"}]}, {"items": []}]"#;
        let orders = orders_from_json(json).unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[1].items.is_empty());
    }

    #[test]
    fn test_orders_from_json_rejects_object_payload() {
        assert!(orders_from_json(r#"{"items": []}"#).is_err());
    }
}
