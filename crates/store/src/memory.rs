use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Entity, FilterSet, Gateway, LinkTable, PageSlice, Patch, Result, StoreError};

/// Referential action applied to dependent rows when their parent is
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Restrict,
    Cascade,
    SetNull,
}

/// A declared foreign-key rule, mirroring a REFERENCES clause in the
/// migrations.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub references: &'static str,
    pub on_delete: OnDelete,
}

/// A declared single-column uniqueness rule.
#[derive(Debug, Clone)]
pub struct UniqueRule {
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Default)]
struct Tables {
    rows: HashMap<&'static str, Vec<serde_json::Value>>,
    next_id: HashMap<&'static str, i64>,
}

impl Tables {
    fn rows(&self, table: &'static str) -> &[serde_json::Value] {
        self.rows.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn rows_mut(&mut self, table: &'static str) -> &mut Vec<serde_json::Value> {
        self.rows.entry(table).or_default()
    }

    fn allocate_id(&mut self, table: &'static str) -> i64 {
        let next = self.next_id.entry(table).or_insert(0);
        *next += 1;
        *next
    }

    fn position(&self, table: &'static str, id: i64) -> Option<usize> {
        self.rows(table)
            .iter()
            .position(|row| row["id"].as_i64() == Some(id))
    }
}

/// In-memory gateway implementation for testing.
///
/// Rows are stored as JSON objects per table. Unique and foreign-key rules
/// are declared at construction so constraint behavior matches the real
/// schema instead of silently accepting anything.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    tables: Arc<RwLock<Tables>>,
    foreign_keys: Arc<Vec<ForeignKey>>,
    uniques: Arc<Vec<UniqueRule>>,
}

impl InMemoryGateway {
    /// Creates a new empty gateway with no declared constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a foreign-key rule.
    pub fn with_foreign_key(mut self, rule: ForeignKey) -> Self {
        Arc::make_mut(&mut self.foreign_keys).push(rule);
        self
    }

    /// Declares a uniqueness rule.
    pub fn with_unique(mut self, table: &'static str, column: &'static str) -> Self {
        Arc::make_mut(&mut self.uniques).push(UniqueRule { table, column });
        self
    }

    /// Total number of rows in a table.
    pub async fn row_count(&self, table: &'static str) -> usize {
        self.tables.read().await.rows(table).len()
    }

    fn as_object(table: &'static str, entity: &impl serde::Serialize) -> Result<serde_json::Value> {
        let row = serde_json::to_value(entity)?;
        if !row.is_object() {
            return Err(StoreError::InvalidRow {
                table,
                reason: "row did not serialize to a JSON object".to_string(),
            });
        }
        Ok(row)
    }

    /// Checks declared unique and foreign-key rules for a row about to be
    /// written. `exclude_id` skips the row itself during updates.
    fn check_constraints(
        &self,
        tables: &Tables,
        table: &'static str,
        row: &serde_json::Value,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        for rule in self.uniques.iter().filter(|u| u.table == table) {
            let value = &row[rule.column];
            if value.is_null() {
                continue;
            }
            let taken = tables.rows(table).iter().any(|existing| {
                existing["id"].as_i64() != exclude_id && existing[rule.column] == *value
            });
            if taken {
                return Err(StoreError::UniqueViolation { table });
            }
        }

        for rule in self.foreign_keys.iter().filter(|fk| fk.table == table) {
            if let Some(parent_id) = row[rule.column].as_i64() {
                let present = tables
                    .rows(rule.references)
                    .iter()
                    .any(|parent| parent["id"].as_i64() == Some(parent_id));
                if !present {
                    return Err(StoreError::ForeignKeyViolation { table });
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Gateway for InMemoryGateway {
    async fn insert<E: Entity>(&self, entity: E) -> Result<E> {
        entity.validate().map_err(|reason| StoreError::InvalidRow {
            table: E::TABLE,
            reason,
        })?;

        let mut tables = self.tables.write().await;
        let mut row = Self::as_object(E::TABLE, &entity)?;
        self.check_constraints(&tables, E::TABLE, &row, None)?;

        let id = tables.allocate_id(E::TABLE);
        row["id"] = serde_json::json!(id);
        tables.rows_mut(E::TABLE).push(row);
        Ok(entity.with_id(id))
    }

    async fn insert_linked<E: Entity, L: LinkTable>(
        &self,
        entity: E,
        related: &[i64],
    ) -> Result<E> {
        entity.validate().map_err(|reason| StoreError::InvalidRow {
            table: E::TABLE,
            reason,
        })?;

        let mut tables = self.tables.write().await;
        let mut row = Self::as_object(E::TABLE, &entity)?;

        // Validate everything before mutating anything, so a failed link
        // leaves no header behind.
        self.check_constraints(&tables, E::TABLE, &row, None)?;

        let mut seen = HashSet::new();
        for &right in related {
            if !seen.insert(right) {
                return Err(StoreError::UniqueViolation { table: L::TABLE });
            }
        }
        for rule in self
            .foreign_keys
            .iter()
            .filter(|fk| fk.table == L::TABLE && fk.column == L::RIGHT)
        {
            for &right in related {
                let present = tables
                    .rows(rule.references)
                    .iter()
                    .any(|parent| parent["id"].as_i64() == Some(right));
                if !present {
                    return Err(StoreError::ForeignKeyViolation { table: L::TABLE });
                }
            }
        }

        let id = tables.allocate_id(E::TABLE);
        row["id"] = serde_json::json!(id);
        tables.rows_mut(E::TABLE).push(row);
        for &right in related {
            let link = serde_json::json!({ L::LEFT: id, L::RIGHT: right });
            tables.rows_mut(L::TABLE).push(link);
        }
        Ok(entity.with_id(id))
    }

    async fn fetch<E: Entity>(&self, id: i64) -> Result<Option<E>> {
        let tables = self.tables.read().await;
        match tables
            .rows(E::TABLE)
            .iter()
            .find(|row| row["id"].as_i64() == Some(id))
        {
            Some(row) => Ok(Some(serde_json::from_value(row.clone())?)),
            None => Ok(None),
        }
    }

    async fn fetch_many<E: Entity>(&self, ids: &[i64]) -> Result<Vec<E>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&serde_json::Value> = tables
            .rows(E::TABLE)
            .iter()
            .filter(|row| row["id"].as_i64().is_some_and(|id| ids.contains(&id)))
            .collect();
        rows.sort_by_key(|row| row["id"].as_i64());
        rows.into_iter()
            .map(|row| serde_json::from_value(row.clone()).map_err(StoreError::from))
            .collect()
    }

    async fn exists<E: Entity>(&self, id: i64) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.position(E::TABLE, id).is_some())
    }

    async fn update<E: Entity>(&self, id: i64, patch: Patch) -> Result<Option<E>> {
        let mut tables = self.tables.write().await;
        let Some(position) = tables.position(E::TABLE, id) else {
            return Ok(None);
        };

        let mut updated = tables.rows(E::TABLE)[position].clone();
        let Some(map) = updated.as_object_mut() else {
            return Err(StoreError::InvalidRow {
                table: E::TABLE,
                reason: "stored row is not a JSON object".to_string(),
            });
        };
        for (column, value) in patch.sets() {
            map.insert((*column).to_string(), value.to_json());
        }

        self.check_constraints(&tables, E::TABLE, &updated, Some(id))?;
        let entity: E = serde_json::from_value(updated.clone())?;
        tables.rows_mut(E::TABLE)[position] = updated;
        Ok(Some(entity))
    }

    async fn delete<E: Entity>(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(position) = tables.position(E::TABLE, id) else {
            return Ok(false);
        };

        let dependents: Vec<ForeignKey> = self
            .foreign_keys
            .iter()
            .filter(|fk| fk.references == E::TABLE)
            .cloned()
            .collect();

        for rule in &dependents {
            if rule.on_delete != OnDelete::Restrict {
                continue;
            }
            let referenced = tables
                .rows(rule.table)
                .iter()
                .any(|row| row[rule.column].as_i64() == Some(id));
            if referenced {
                return Err(StoreError::DependencyConflict {
                    table: E::TABLE,
                    id,
                });
            }
        }

        for rule in &dependents {
            match rule.on_delete {
                OnDelete::Restrict => {}
                OnDelete::Cascade => {
                    tables
                        .rows_mut(rule.table)
                        .retain(|row| row[rule.column].as_i64() != Some(id));
                }
                OnDelete::SetNull => {
                    for row in tables.rows_mut(rule.table) {
                        if row[rule.column].as_i64() == Some(id) {
                            row[rule.column] = serde_json::Value::Null;
                        }
                    }
                }
            }
        }

        tables.rows_mut(E::TABLE).remove(position);
        Ok(true)
    }

    async fn count<E: Entity>(&self, filters: &FilterSet) -> Result<u64> {
        let tables = self.tables.read().await;
        let count = tables
            .rows(E::TABLE)
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .count();
        Ok(count as u64)
    }

    async fn find<E: Entity>(
        &self,
        filters: &FilterSet,
        slice: Option<PageSlice>,
    ) -> Result<Vec<E>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&serde_json::Value> = tables
            .rows(E::TABLE)
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .collect();
        rows.sort_by_key(|row| row["id"].as_i64());

        let selected: Vec<&serde_json::Value> = match slice {
            Some(slice) => rows
                .into_iter()
                .skip(usize::try_from(slice.offset).unwrap_or(0))
                .take(usize::try_from(slice.limit).unwrap_or(0))
                .collect(),
            None => rows,
        };

        selected
            .into_iter()
            .map(|row| serde_json::from_value(row.clone()).map_err(StoreError::from))
            .collect()
    }

    async fn linked_ids<L: LinkTable>(&self, left: i64) -> Result<Vec<i64>> {
        let tables = self.tables.read().await;
        let mut ids: Vec<i64> = tables
            .rows(L::TABLE)
            .iter()
            .filter(|row| row[L::LEFT].as_i64() == Some(left))
            .filter_map(|row| row[L::RIGHT].as_i64())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn linked_ids_many<L: LinkTable>(&self, lefts: &[i64]) -> Result<Vec<(i64, i64)>> {
        let tables = self.tables.read().await;
        let mut pairs: Vec<(i64, i64)> = tables
            .rows(L::TABLE)
            .iter()
            .filter_map(|row| {
                let left = row[L::LEFT].as_i64()?;
                let right = row[L::RIGHT].as_i64()?;
                lefts.contains(&left).then_some((left, right))
            })
            .collect();
        pairs.sort_unstable();
        Ok(pairs)
    }
}
