use async_trait::async_trait;

use crate::{Entity, FilterSet, LinkTable, Patch, Result};

/// LIMIT/OFFSET window into a filtered, stably-ordered result set.
#[derive(Debug, Clone, Copy)]
pub struct PageSlice {
    pub limit: i64,
    pub offset: i64,
}

/// Generic access to stored records of any entity kind.
///
/// All implementations must be thread-safe (Send + Sync). Query results are
/// stably ordered by primary key ascending, so the same filters with the
/// same slice always select the same window.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Inserts a new row and returns it with its generated id.
    ///
    /// Constraint violations are reported as their own error variants, never
    /// as raw database errors.
    async fn insert<E: Entity>(&self, entity: E) -> Result<E>;

    /// Inserts a row together with one association row per related id, as a
    /// single atomic unit: either the header and every link commit, or
    /// nothing does.
    async fn insert_linked<E: Entity, L: LinkTable>(&self, entity: E, related: &[i64])
    -> Result<E>;

    /// Fetches a row by id.
    async fn fetch<E: Entity>(&self, id: i64) -> Result<Option<E>>;

    /// Fetches all rows whose id is in `ids`, ordered by id ascending.
    async fn fetch_many<E: Entity>(&self, ids: &[i64]) -> Result<Vec<E>>;

    /// Checks whether a row with this id exists.
    async fn exists<E: Entity>(&self, id: i64) -> Result<bool>;

    /// Applies a partial update. Returns the updated row, or `None` when the
    /// id does not exist. An empty patch leaves the row untouched.
    async fn update<E: Entity>(&self, id: i64, patch: Patch) -> Result<Option<E>>;

    /// Deletes a row by id. Returns whether a row was deleted; fails with
    /// `DependencyConflict` when referential constraints block the removal.
    async fn delete<E: Entity>(&self, id: i64) -> Result<bool>;

    /// Counts all rows matching the filters, independent of paging.
    async fn count<E: Entity>(&self, filters: &FilterSet) -> Result<u64>;

    /// Returns rows matching the filters, ordered by id ascending, optionally
    /// windowed to one page. The same filters drive [`Gateway::count`], so a
    /// page and its total are always consistent.
    async fn find<E: Entity>(&self, filters: &FilterSet, slice: Option<PageSlice>)
    -> Result<Vec<E>>;

    /// Returns the right-hand ids associated with one left-hand id.
    async fn linked_ids<L: LinkTable>(&self, left: i64) -> Result<Vec<i64>>;

    /// Returns `(left, right)` pairs for a batch of left-hand ids, so a whole
    /// page can be resolved in one round trip.
    async fn linked_ids_many<L: LinkTable>(&self, lefts: &[i64]) -> Result<Vec<(i64, i64)>>;
}
