//! Wire types exchanged with the SDG Finance HTTP API.
//!
//! The backend is lenient about numeric encodings (ids, costs and scores may
//! arrive as JSON numbers or numeric strings), so the decoding helpers in
//! [`lenient`] accept both forms.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error body returned by the API. Different endpoints use different keys.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message).filter(|m| !m.trim().is_empty())
    }
}

/// Server-assigned identifier. Serialized as a string, decoded from either a
/// JSON string or a JSON number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(#[serde(deserialize_with = "lenient::string_or_number")] pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryRef {
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: RecordId,
        pub name: String,
        pub date: NaiveDate,
        pub cost: Decimal,
        #[serde(default)]
        pub category: Option<CategoryRef>,
        #[serde(default, deserialize_with = "lenient::opt_f64")]
        pub sustainability_score: Option<f64>,
    }

    /// Request body for creating or updating an expense.
    ///
    /// The category travels as a plain name, unlike [`ExpenseView`].
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpensePayload {
        pub name: String,
        pub date: NaiveDate,
        pub cost: Decimal,
        pub category: Option<String>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BudgetLimitView {
        pub category: String,
        pub limit: Decimal,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub month: u32,
        pub year: i32,
        pub budgets: Vec<BudgetLimitView>,
    }
}

pub mod profile {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GoalView {
        #[serde(default)]
        pub title: String,
        #[serde(default, deserialize_with = "lenient::string_or_number")]
        pub progress: String,
        #[serde(default)]
        pub achieved: bool,
    }

    /// User profile. The same shape is sent back on update.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfileView {
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub email: String,
        #[serde(default)]
        pub location: String,
        #[serde(default)]
        pub bio: String,
        #[serde(default)]
        pub avatar: Option<String>,
        #[serde(default, deserialize_with = "lenient::opt_datetime")]
        pub created_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub points: i64,
        /// Some backends store goals as a JSON-encoded string.
        #[serde(default, deserialize_with = "lenient::goals")]
        pub goals: Vec<GoalView>,
    }
}

pub mod reward {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct RewardView {
        pub id: RecordId,
        pub name: String,
        #[serde(default)]
        pub description: String,
        pub points: i64,
        #[serde(default)]
        pub image: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Redemption {
        pub new_points: i64,
        pub code: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RewardTotal {
        pub total: i64,
    }
}

pub mod chat {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ChatReply {
        pub reply: String,
    }
}

/// Deserializers tolerant to the encodings the backend actually emits.
pub mod lenient {
    use super::*;
    use serde::{Deserializer, de::Error as _};
    use serde_json::Value;

    use crate::profile::GoalView;

    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(D::Error::custom(format!(
                "expected string or number, got {other}"
            ))),
        }
    }

    /// `null`, missing, non-numeric strings and non-finite values all map to
    /// `None`.
    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let parsed = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(parsed.filter(|v| v.is_finite()))
    }

    pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        })
    }

    pub fn goals<'de, D>(deserializer: D) -> Result<Vec<GoalView>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(normalize_goals(value.unwrap_or(Value::Null)))
    }

    /// Accepts an array of goals or a JSON string holding one. Anything else,
    /// including malformed entries, yields an empty list.
    pub fn normalize_goals(value: Value) -> Vec<GoalView> {
        let array = match value {
            Value::Array(_) => value,
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(parsed @ Value::Array(_)) => parsed,
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };
        serde_json::from_value(array).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        budget::BudgetUpdate,
        expense::{ExpensePayload, ExpenseView},
        profile::ProfileView,
        *,
    };
    use serde_json::json;

    #[test]
    fn expense_accepts_numeric_id_and_string_cost() {
        let raw = json!({
            "id": 7,
            "name": "Groceries",
            "date": "2024-03-02",
            "cost": "12.50",
            "category": { "name": "Food & Dining" },
            "sustainabilityScore": "3.6"
        });
        let view: ExpenseView = serde_json::from_value(raw).unwrap();
        assert_eq!(view.id.as_str(), "7");
        assert_eq!(view.cost, Decimal::new(1250, 2));
        assert_eq!(view.category.unwrap().name, "Food & Dining");
        assert_eq!(view.sustainability_score, Some(3.6));
    }

    #[test]
    fn expense_tolerates_null_category_and_bad_score() {
        let raw = json!({
            "id": "abc",
            "name": "Bus",
            "date": "2024-03-02",
            "cost": 2,
            "category": null,
            "sustainabilityScore": "n/a"
        });
        let view: ExpenseView = serde_json::from_value(raw).unwrap();
        assert!(view.category.is_none());
        assert!(view.sustainability_score.is_none());
    }

    #[test]
    fn payload_sends_category_as_plain_name() {
        let payload = ExpensePayload {
            name: "Train".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            cost: Decimal::new(4200, 2),
            category: Some("Other".to_string()),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["category"], json!("Other"));
        assert_eq!(value["date"], json!("2024-05-01"));
    }

    #[test]
    fn profile_goals_decode_from_encoded_string() {
        let raw = json!({
            "name": "Ada",
            "points": 120,
            "goals": "[{\"title\":\"Bike to work\",\"progress\":\"50%\",\"achieved\":false}]"
        });
        let profile: ProfileView = serde_json::from_value(raw).unwrap();
        assert_eq!(profile.goals.len(), 1);
        assert_eq!(profile.goals[0].title, "Bike to work");
    }

    #[test]
    fn profile_goals_fall_back_to_empty() {
        for goals in [json!("not json"), json!({"a": 1}), json!(null), json!("{}")] {
            let profile: ProfileView =
                serde_json::from_value(json!({ "name": "Ada", "goals": goals })).unwrap();
            assert!(profile.goals.is_empty());
        }
    }

    #[test]
    fn budget_update_shape() {
        let update = BudgetUpdate {
            month: 4,
            year: 2025,
            budgets: vec![budget::BudgetLimitView {
                category: "Other".to_string(),
                limit: Decimal::new(100, 0),
            }],
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["month"], json!(4));
        assert_eq!(value["budgets"][0]["category"], json!("Other"));
    }

    #[test]
    fn error_response_prefers_error_key() {
        let err: ErrorResponse =
            serde_json::from_value(json!({ "error": "bad", "message": "worse" })).unwrap();
        assert_eq!(err.into_message().as_deref(), Some("bad"));
        let err: ErrorResponse = serde_json::from_value(json!({ "message": "m" })).unwrap();
        assert_eq!(err.into_message().as_deref(), Some("m"));
    }
}
