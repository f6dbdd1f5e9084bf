use chrono::NaiveDate;

/// A column value carried through dynamically built SQL.
///
/// Nullable integer and text columns get their own variants so the bound
/// parameter keeps a concrete SQL type even when the value is NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    OptInt(Option<i64>),
    Float(f64),
    Text(String),
    OptText(Option<String>),
    Date(NaiveDate),
}

impl SqlValue {
    /// JSON representation used by the in-memory gateway, matching how the
    /// same value serializes inside an entity row.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SqlValue::Int(v) => serde_json::json!(v),
            SqlValue::OptInt(v) => serde_json::json!(v),
            SqlValue::Float(v) => serde_json::json!(v),
            SqlValue::Text(v) => serde_json::json!(v),
            SqlValue::OptText(v) => serde_json::json!(v),
            SqlValue::Date(v) => serde_json::json!(v.format("%Y-%m-%d").to_string()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(v: Option<i64>) -> Self {
        SqlValue::OptInt(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::OptText(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}
