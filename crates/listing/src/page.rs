use common::{Page, PageParams};
use store::{Entity, FilterSet, Gateway, PageSlice};

use crate::error::ListingError;

/// Runs a filtered, paginated query: the filtered total and one page of
/// records, both driven by the same predicate set so they can never
/// disagree. Zero matches yield an empty page with total 0 rather than an
/// error, uniformly across all resource types.
pub async fn paginate<E: Entity, G: Gateway>(
    gateway: &G,
    filters: &FilterSet,
    params: PageParams,
) -> Result<Page<E>, ListingError> {
    if !params.is_valid() {
        return Err(ListingError::InvalidPage);
    }

    let total = gateway.count::<E>(filters).await?;
    let items = gateway
        .find::<E>(
            filters,
            Some(PageSlice {
                limit: i64::from(params.limit),
                offset: params.offset(),
            }),
        )
        .await?;

    Ok(Page {
        page: params.page,
        limit: params.limit,
        total,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Book, memory_gateway};
    use store::InMemoryGateway;

    async fn seeded(n: u32) -> InMemoryGateway {
        let gw = memory_gateway();
        for i in 1..=n {
            gw.insert(Book {
                id: None,
                title: format!("book {i}"),
                price: f64::from(i),
                genre: "fiction".to_string(),
                author_id: None,
                publisher_id: None,
            })
            .await
            .unwrap();
        }
        gw
    }

    #[tokio::test]
    async fn page_length_is_bounded_by_total_and_limit() {
        let gw = seeded(12).await;
        let filters = FilterSet::new();

        for (page, limit) in [(1u32, 5u32), (2, 5), (3, 5), (4, 5), (1, 20)] {
            let result: Page<Book> =
                paginate(&gw, &filters, PageParams::new(page, limit)).await.unwrap();
            let expected = (12i64 - i64::from(page - 1) * i64::from(limit))
                .clamp(0, i64::from(limit)) as usize;
            assert_eq!(result.items.len(), expected, "page {page} limit {limit}");
            assert_eq!(result.total, 12);
        }
    }

    #[tokio::test]
    async fn zero_matches_yield_empty_page_not_an_error() {
        let gw = seeded(3).await;
        let filters = FilterSet::new().contains("title", "no such book");

        let result: Page<Book> = paginate(&gw, &filters, PageParams::default()).await.unwrap();
        assert_eq!(result.total, 0);
        assert!(result.items.is_empty());
    }

    #[tokio::test]
    async fn filters_apply_conjunctively() {
        let gw = seeded(10).await;
        let filters = FilterSet::new()
            .contains("title", "book 1") // matches "book 1" and "book 10"
            .at_least("price", 2.0);

        let result: Page<Book> = paginate(&gw, &filters, PageParams::default()).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].title, "book 10");
    }

    #[tokio::test]
    async fn invalid_page_params_are_rejected() {
        let gw = seeded(1).await;
        let err = paginate::<Book, _>(&gw, &FilterSet::new(), PageParams::new(0, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::InvalidPage));
    }

    #[tokio::test]
    async fn pages_are_stably_ordered_by_id() {
        let gw = seeded(4).await;
        let first: Page<Book> =
            paginate(&gw, &FilterSet::new(), PageParams::new(1, 2)).await.unwrap();
        let second: Page<Book> =
            paginate(&gw, &FilterSet::new(), PageParams::new(2, 2)).await.unwrap();

        let ids: Vec<i64> = first
            .items
            .iter()
            .chain(second.items.iter())
            .filter_map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
