use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::{PgPool, Postgres};

use crate::filter::{BoundValue, build_where};
use crate::{
    Entity, FilterSet, Gateway, LinkTable, PageSlice, Patch, Result, SqlValue, StoreError,
};

/// PostgreSQL-backed gateway implementation.
#[derive(Clone)]
pub struct PostgresGateway {
    pool: PgPool,
}

type PgQueryAs<'q, O> = sqlx::query::QueryAs<'q, Postgres, O, PgArguments>;

fn bind_value<'q, O>(query: PgQueryAs<'q, O>, value: &SqlValue) -> PgQueryAs<'q, O> {
    match value {
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::OptInt(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::OptText(v) => query.bind(v.clone()),
        SqlValue::Date(v) => query.bind(*v),
    }
}

fn bind_bound<'q, O>(query: PgQueryAs<'q, O>, value: &BoundValue) -> PgQueryAs<'q, O> {
    match value {
        BoundValue::Value(v) => bind_value(query, v),
        BoundValue::IdList(ids) => query.bind(ids.clone()),
    }
}

fn insert_sql<E: Entity>() -> String {
    let placeholders: Vec<String> = (1..=E::COLUMNS.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        E::TABLE,
        E::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

/// Translates database errors raised by a write into gateway error variants
/// so raw store errors never leak to callers.
fn write_error(table: &'static str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation { table };
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::ForeignKeyViolation { table };
        }
        if db_err.is_check_violation() {
            return StoreError::CheckViolation { table };
        }
    }
    StoreError::Database(err)
}

impl PostgresGateway {
    /// Creates a gateway over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool to the given database URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

#[async_trait]
impl Gateway for PostgresGateway {
    async fn insert<E: Entity>(&self, entity: E) -> Result<E> {
        entity.validate().map_err(|reason| StoreError::InvalidRow {
            table: E::TABLE,
            reason,
        })?;

        let sql = insert_sql::<E>();
        let values = entity.insert_values();
        let mut query = sqlx::query_as::<_, E>(&sql);
        for value in &values {
            query = bind_value(query, value);
        }

        query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(E::TABLE, e))
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

        // Header first (its generated id keys the links), but inside one
        // transaction: a failed link insert rolls the header back too.
        let mut tx = self.pool.begin().await?;

        let sql = insert_sql::<E>();
        let values = entity.insert_values();
        let mut query = sqlx::query_as::<_, E>(&sql);
        for value in &values {
            query = bind_value(query, value);
        }
        let created: E = query
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| write_error(E::TABLE, e))?;

        let id = created.id().ok_or_else(|| StoreError::InvalidRow {
            table: E::TABLE,
            reason: "insert returned no generated id".to_string(),
        })?;

        let link_sql = format!(
            "INSERT INTO {} ({}, {}) VALUES ($1, $2)",
            L::TABLE,
            L::LEFT,
            L::RIGHT
        );
        for &right in related {
            sqlx::query(&link_sql)
                .bind(id)
                .bind(right)
                .execute(&mut *tx)
                .await
                .map_err(|e| write_error(L::TABLE, e))?;
        }

        tx.commit().await?;
        tracing::debug!(table = E::TABLE, id, links = related.len(), "linked insert committed");
        Ok(created)
    }

    async fn fetch<E: Entity>(&self, id: i64) -> Result<Option<E>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn fetch_many<E: Entity>(&self, ids: &[i64]) -> Result<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT * FROM {} WHERE id = ANY($1) ORDER BY id ASC",
            E::TABLE
        );
        let rows = sqlx::query_as::<_, E>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn exists<E: Entity>(&self, id: i64) -> Result<bool> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", E::TABLE);
        let present: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(present)
    }

    async fn update<E: Entity>(&self, id: i64, patch: Patch) -> Result<Option<E>> {
        if patch.is_empty() {
            return self.fetch::<E>(id).await;
        }

        let assignments: Vec<String> = patch
            .sets()
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ${}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING *",
            E::TABLE,
            assignments.join(", "),
            patch.sets().len() + 1
        );

        let mut query = sqlx::query_as::<_, E>(&sql);
        for (_, value) in patch.sets() {
            query = bind_value(query, value);
        }
        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(E::TABLE, e))
    }

    async fn delete<E: Entity>(&self, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        match sqlx::query(&sql).bind(id).execute(&self.pool).await {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(err) => {
                if let sqlx::Error::Database(db_err) = &err
                    && db_err.is_foreign_key_violation()
                {
                    return Err(StoreError::DependencyConflict {
                        table: E::TABLE,
                        id,
                    });
                }
                Err(StoreError::Database(err))
            }
        }
    }

    async fn count<E: Entity>(&self, filters: &FilterSet) -> Result<u64> {
        let (clause, values) = build_where(filters);
        let sql = format!("SELECT COUNT(*) FROM {}{}", E::TABLE, clause);

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for value in &values {
            query = bind_bound(query, value);
        }
        let (count,) = query.fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find<E: Entity>(
        &self,
        filters: &FilterSet,
        slice: Option<PageSlice>,
    ) -> Result<Vec<E>> {
        let (clause, values) = build_where(filters);
        let mut sql = format!("SELECT * FROM {}{} ORDER BY id ASC", E::TABLE, clause);
        if slice.is_some() {
            let base = values.len();
            sql.push_str(&format!(" LIMIT ${} OFFSET ${}", base + 1, base + 2));
        }

        let mut query = sqlx::query_as::<_, E>(&sql);
        for value in &values {
            query = bind_bound(query, value);
        }
        if let Some(slice) = slice {
            query = query.bind(slice.limit).bind(slice.offset);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn linked_ids<L: LinkTable>(&self, left: i64) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY {} ASC",
            L::RIGHT,
            L::TABLE,
            L::LEFT,
            L::RIGHT
        );
        let ids: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(left)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn linked_ids_many<L: LinkTable>(&self, lefts: &[i64]) -> Result<Vec<(i64, i64)>> {
        if lefts.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {}, {} FROM {} WHERE {} = ANY($1) ORDER BY {} ASC, {} ASC",
            L::LEFT,
            L::RIGHT,
            L::TABLE,
            L::LEFT,
            L::LEFT,
            L::RIGHT
        );
        let pairs = sqlx::query_as::<_, (i64, i64)>(&sql)
            .bind(lefts.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(pairs)
    }
}
