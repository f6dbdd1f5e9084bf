use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;

use crate::value::SqlValue;

/// Describes how an entity maps onto its table.
///
/// Every stored record kind implements this once; the gateway derives all
/// CRUD and query SQL from the description instead of a hand-written
/// repository per resource. Implementors carry their surrogate id as
/// `Option<i64>`, `None` until the store generates one.
pub trait Entity:
    Clone
    + Send
    + Sync
    + Unpin
    + Serialize
    + DeserializeOwned
    + for<'r> sqlx::FromRow<'r, PgRow>
    + 'static
{
    /// Table name.
    const TABLE: &'static str;

    /// Insert column list, excluding the generated `id`.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<i64>;

    fn with_id(self, id: i64) -> Self;

    /// Column values for insertion, aligned with [`Entity::COLUMNS`].
    fn insert_values(&self) -> Vec<SqlValue>;

    /// Entity-level validation applied before any insert.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Describes a pure association table: two foreign keys forming a composite
/// primary key, no independent lifecycle.
pub trait LinkTable: Send + Sync + 'static {
    const TABLE: &'static str;
    const LEFT: &'static str;
    const RIGHT: &'static str;
}

/// A partial update: only the listed columns are applied, everything else is
/// left untouched.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    sets: Vec<(&'static str, SqlValue)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.sets.push((column, value.into()));
        self
    }

    /// Adds the assignment only when a value was supplied.
    pub fn maybe(self, column: &'static str, value: Option<impl Into<SqlValue>>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &[(&'static str, SqlValue)] {
        &self.sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maybe_skips_absent_fields() {
        let patch = Patch::new()
            .maybe("status", Some("shipped"))
            .maybe("total_value", None::<f64>);

        assert_eq!(patch.sets().len(), 1);
        assert_eq!(patch.sets()[0].0, "status");
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(Patch::new().is_empty());
        assert!(!Patch::new().set("status", "new").is_empty());
    }
}
