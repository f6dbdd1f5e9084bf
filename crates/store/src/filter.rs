use chrono::NaiveDate;

use crate::value::SqlValue;

/// A single predicate on one column.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: &'static str,
    pub op: FilterOp,
}

/// Supported predicate kinds.
#[derive(Debug, Clone)]
pub enum FilterOp {
    /// Exact equality, for ids and enumerated values.
    Eq(SqlValue),
    /// Membership in a set of ids.
    AnyOf(Vec<i64>),
    /// Case-insensitive substring match.
    Contains(String),
    /// Inclusive lower bound.
    AtLeast(f64),
    /// Inclusive upper bound.
    AtMost(f64),
    /// Exact calendar-date match.
    OnDate(NaiveDate),
}

/// A conjunctive set of filters: every predicate narrows the candidate set,
/// absent predicates impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    fn push(mut self, column: &'static str, op: FilterOp) -> Self {
        self.filters.push(Filter { column, op });
        self
    }

    pub fn eq(self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.push(column, FilterOp::Eq(value.into()))
    }

    pub fn any_of(self, column: &'static str, ids: Vec<i64>) -> Self {
        self.push(column, FilterOp::AnyOf(ids))
    }

    pub fn contains(self, column: &'static str, needle: impl Into<String>) -> Self {
        self.push(column, FilterOp::Contains(needle.into()))
    }

    pub fn at_least(self, column: &'static str, min: f64) -> Self {
        self.push(column, FilterOp::AtLeast(min))
    }

    pub fn at_most(self, column: &'static str, max: f64) -> Self {
        self.push(column, FilterOp::AtMost(max))
    }

    pub fn on_date(self, column: &'static str, date: NaiveDate) -> Self {
        self.push(column, FilterOp::OnDate(date))
    }

    pub fn maybe_eq(self, column: &'static str, value: Option<impl Into<SqlValue>>) -> Self {
        match value {
            Some(value) => self.eq(column, value),
            None => self,
        }
    }

    pub fn maybe_contains(self, column: &'static str, needle: Option<String>) -> Self {
        match needle {
            Some(needle) => self.contains(column, needle),
            None => self,
        }
    }

    pub fn maybe_at_least(self, column: &'static str, min: Option<f64>) -> Self {
        match min {
            Some(min) => self.at_least(column, min),
            None => self,
        }
    }

    pub fn maybe_at_most(self, column: &'static str, max: Option<f64>) -> Self {
        match max {
            Some(max) => self.at_most(column, max),
            None => self,
        }
    }
}

impl Filter {
    /// Evaluates the predicate against a JSON row, mirroring the SQL
    /// semantics used by the Postgres gateway. Missing or null columns never
    /// match.
    pub fn matches(&self, row: &serde_json::Value) -> bool {
        let field = &row[self.column];
        match &self.op {
            FilterOp::Eq(value) => !field.is_null() && *field == value.to_json(),
            FilterOp::AnyOf(ids) => field.as_i64().is_some_and(|v| ids.contains(&v)),
            FilterOp::Contains(needle) => field
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            FilterOp::AtLeast(min) => field.as_f64().is_some_and(|v| v >= *min),
            FilterOp::AtMost(max) => field.as_f64().is_some_and(|v| v <= *max),
            FilterOp::OnDate(date) => field
                .as_str()
                .is_some_and(|s| s == date.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Escapes LIKE pattern metacharacters so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Values bound by [`build_where`], in placeholder order.
#[derive(Debug, Clone)]
pub enum BoundValue {
    Value(SqlValue),
    IdList(Vec<i64>),
}

/// Renders a `FilterSet` as a ` WHERE ...` clause with `$n` placeholders
/// starting at 1, plus the values to bind in order. Returns an empty clause
/// for an empty set.
pub(crate) fn build_where(filters: &FilterSet) -> (String, Vec<BoundValue>) {
    let mut clause = String::new();
    let mut values = Vec::new();

    for filter in filters.iter() {
        clause.push_str(if values.is_empty() { " WHERE " } else { " AND " });
        let placeholder = values.len() + 1;
        match &filter.op {
            FilterOp::Eq(value) => {
                clause.push_str(&format!("{} = ${placeholder}", filter.column));
                values.push(BoundValue::Value(value.clone()));
            }
            FilterOp::AnyOf(ids) => {
                clause.push_str(&format!("{} = ANY(${placeholder})", filter.column));
                values.push(BoundValue::IdList(ids.clone()));
            }
            FilterOp::Contains(needle) => {
                clause.push_str(&format!("{} ILIKE ${placeholder}", filter.column));
                values.push(BoundValue::Value(SqlValue::Text(format!(
                    "%{}%",
                    escape_like(needle)
                ))));
            }
            FilterOp::AtLeast(min) => {
                clause.push_str(&format!("{} >= ${placeholder}", filter.column));
                values.push(BoundValue::Value(SqlValue::Float(*min)));
            }
            FilterOp::AtMost(max) => {
                clause.push_str(&format!("{} <= ${placeholder}", filter.column));
                values.push(BoundValue::Value(SqlValue::Float(*max)));
            }
            FilterOp::OnDate(date) => {
                clause.push_str(&format!("{} = ${placeholder}", filter.column));
                values.push(BoundValue::Value(SqlValue::Date(*date)));
            }
        }
    }

    (clause, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_set_renders_no_clause() {
        let (clause, values) = build_where(&FilterSet::new());
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn predicates_are_conjoined_in_order() {
        let filters = FilterSet::new()
            .eq("customer_id", 7i64)
            .contains("status", "ship")
            .at_least("total_value", 50.0)
            .at_most("total_value", 100.0);

        let (clause, values) = build_where(&filters);
        assert_eq!(
            clause,
            " WHERE customer_id = $1 AND status ILIKE $2 \
             AND total_value >= $3 AND total_value <= $4"
        );
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn contains_escapes_pattern_metacharacters() {
        let filters = FilterSet::new().contains("name", "50%_off");
        let (_, values) = build_where(&filters);
        match &values[0] {
            BoundValue::Value(SqlValue::Text(pattern)) => {
                assert_eq!(pattern, "%50\\%\\_off%");
            }
            other => panic!("unexpected bound value: {other:?}"),
        }
    }

    #[test]
    fn maybe_builders_skip_absent_values() {
        let filters = FilterSet::new()
            .maybe_eq("customer_id", None::<i64>)
            .maybe_contains("status", None)
            .maybe_at_least("total_value", Some(10.0));
        let (clause, _) = build_where(&filters);
        assert_eq!(clause, " WHERE total_value >= $1");
    }

    #[test]
    fn matches_substring_case_insensitively() {
        let filter = Filter {
            column: "status",
            op: FilterOp::Contains("SHIP".to_string()),
        };
        assert!(filter.matches(&json!({"status": "shipped"})));
        assert!(!filter.matches(&json!({"status": "pending"})));
        assert!(!filter.matches(&json!({"status": null})));
    }

    #[test]
    fn matches_inclusive_bounds() {
        let at_least = Filter {
            column: "price",
            op: FilterOp::AtLeast(10.0),
        };
        let at_most = Filter {
            column: "price",
            op: FilterOp::AtMost(10.0),
        };
        let row = json!({"price": 10.0});
        assert!(at_least.matches(&row));
        assert!(at_most.matches(&row));
    }

    #[test]
    fn matches_exact_date_string() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let filter = Filter {
            column: "order_date",
            op: FilterOp::OnDate(date),
        };
        assert!(filter.matches(&json!({"order_date": "2025-06-10"})));
        assert!(!filter.matches(&json!({"order_date": "2025-06-11"})));
    }

    #[test]
    fn matches_any_of_id_set() {
        let filter = Filter {
            column: "order_id",
            op: FilterOp::AnyOf(vec![1, 3]),
        };
        assert!(filter.matches(&json!({"order_id": 3})));
        assert!(!filter.matches(&json!({"order_id": 2})));
    }

    #[test]
    fn eq_never_matches_null_columns() {
        let filter = Filter {
            column: "customer_id",
            op: FilterOp::Eq(SqlValue::Int(1)),
        };
        assert!(!filter.matches(&json!({"customer_id": null})));
    }
}
