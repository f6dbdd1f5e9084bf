//! Generic catalog service.
//!
//! One parameterized component covers plain CRUD for every entity kind,
//! replacing a hand-written repository per resource.

use store::{Entity, FilterSet, Gateway, Patch, StoreError};

use crate::error::{DomainError, Result};

/// CRUD over any [`Entity`] through the persistence gateway, with store
/// failures translated into domain errors.
#[derive(Clone)]
pub struct Catalog<G> {
    gateway: G,
}

impl<G: Gateway> Catalog<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    #[tracing::instrument(skip(self, entity), fields(table = E::TABLE))]
    pub async fn create<E: Entity>(&self, entity: E) -> Result<E> {
        let created = self
            .gateway
            .insert(entity)
            .await
            .map_err(DomainError::from_write)?;
        tracing::info!(entity = E::TABLE, id = created.id(), "record created");
        Ok(created)
    }

    pub async fn get<E: Entity>(&self, id: i64) -> Result<E> {
        self.gateway
            .fetch::<E>(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: E::TABLE,
                id,
            })
    }

    #[tracing::instrument(skip(self, patch), fields(table = E::TABLE))]
    pub async fn update<E: Entity>(&self, id: i64, patch: Patch) -> Result<E> {
        match self.gateway.update::<E>(id, patch).await {
            Ok(Some(entity)) => Ok(entity),
            Ok(None) => Err(DomainError::NotFound {
                entity: E::TABLE,
                id,
            }),
            Err(err) => Err(DomainError::from_write(err)),
        }
    }

    #[tracing::instrument(skip(self), fields(table = E::TABLE))]
    pub async fn delete<E: Entity>(&self, id: i64) -> Result<()> {
        match self.gateway.delete::<E>(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::NotFound {
                entity: E::TABLE,
                id,
            }),
            Err(StoreError::DependencyConflict { .. }) => Err(DomainError::DependencyConflict {
                entity: E::TABLE,
                id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn count<E: Entity>(&self, filters: &FilterSet) -> Result<u64> {
        Ok(self.gateway.count::<E>(filters).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, CustomerPatch, Payment};
    use crate::schema::memory_gateway;
    use chrono::NaiveDate;

    fn customer(name: &str, tax_id: &str) -> Customer {
        Customer {
            id: None,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            tax_id: tax_id.to_string(),
            registration_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let catalog = Catalog::new(memory_gateway());
        let created = catalog.create(customer("ana", "111")).await.unwrap();
        let fetched: Customer = catalog.get(created.id.unwrap()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let catalog = Catalog::new(memory_gateway());
        let err = catalog.get::<Customer>(7).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id: 7, .. }));
    }

    #[tokio::test]
    async fn duplicate_tax_id_is_a_constraint_error() {
        let catalog = Catalog::new(memory_gateway());
        catalog.create(customer("ana", "111")).await.unwrap();
        let err = catalog.create(customer("bia", "111")).await.unwrap_err();
        assert!(matches!(err, DomainError::Constraint { .. }));
    }

    #[tokio::test]
    async fn update_applies_partial_patch() {
        let catalog = Catalog::new(memory_gateway());
        let created = catalog.create(customer("ana", "111")).await.unwrap();

        let patch = CustomerPatch {
            email: Some("new@example.com".to_string()),
            ..CustomerPatch::default()
        };
        let updated: Customer = catalog
            .update(created.id.unwrap(), patch.into_patch())
            .await
            .unwrap();

        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.name, "ana");
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let catalog = Catalog::new(memory_gateway());
        let err = catalog
            .update::<Customer>(3, CustomerPatch::default().into_patch())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let catalog = Catalog::new(memory_gateway());
        let err = catalog.delete::<Customer>(9).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn payment_for_missing_order_is_rejected() {
        let catalog = Catalog::new(memory_gateway());
        let err = catalog
            .create(Payment {
                id: None,
                order_id: 123,
                payment_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                amount: 10.0,
                payment_method: "card".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Constraint { .. }));
    }

    #[tokio::test]
    async fn count_reflects_inserted_rows() {
        let catalog = Catalog::new(memory_gateway());
        catalog.create(customer("ana", "111")).await.unwrap();
        catalog.create(customer("bia", "222")).await.unwrap();
        let total = catalog.count::<Customer>(&FilterSet::new()).await.unwrap();
        assert_eq!(total, 2);
    }
}
