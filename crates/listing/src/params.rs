//! Wire-level filter parameters, one set per resource.
//!
//! String filters are case-insensitive substring matches, id filters are
//! exact, `*_min`/`*_max` are inclusive bounds, and date filters require an
//! exact calendar-date match in the canonical `YYYY-MM-DD` format. A
//! malformed date fails the whole request instead of being ignored.

use chrono::NaiveDate;
use common::PageParams;
use serde::Deserialize;
use store::FilterSet;

use crate::error::ListingError;

/// Canonical wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a date filter value against [`DATE_FORMAT`].
pub fn parse_wire_date(raw: &str) -> Result<NaiveDate, ListingError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ListingError::InvalidDate {
        value: raw.to_string(),
    })
}

fn page_params(page: Option<u32>, limit: Option<u32>) -> Result<PageParams, ListingError> {
    let params = PageParams::new(
        page.unwrap_or(1),
        limit.unwrap_or(PageParams::DEFAULT_LIMIT),
    );
    if !params.is_valid() {
        return Err(ListingError::InvalidPage);
    }
    Ok(params)
}

/// Bare pagination for unfiltered listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListParams {
    pub fn page(&self) -> Result<PageParams, ListingError> {
        page_params(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorFilterParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl AuthorFilterParams {
    pub fn filters(&self) -> Result<FilterSet, ListingError> {
        let mut set = FilterSet::new()
            .maybe_contains("name", self.name.clone())
            .maybe_contains("email", self.email.clone())
            .maybe_contains("nationality", self.nationality.clone());
        if let Some(raw) = &self.birth_date {
            set = set.on_date("birth_date", parse_wire_date(raw)?);
        }
        Ok(set)
    }

    pub fn page(&self) -> Result<PageParams, ListingError> {
        page_params(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublisherFilterParams {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PublisherFilterParams {
    pub fn filters(&self) -> FilterSet {
        FilterSet::new()
            .maybe_contains("name", self.name.clone())
            .maybe_contains("address", self.address.clone())
            .maybe_contains("email", self.email.clone())
    }

    pub fn page(&self) -> Result<PageParams, ListingError> {
        page_params(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilterParams {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub author_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl BookFilterParams {
    pub fn filters(&self) -> FilterSet {
        FilterSet::new()
            .maybe_contains("title", self.title.clone())
            .maybe_contains("genre", self.genre.clone())
            .maybe_eq("author_id", self.author_id)
            .maybe_eq("publisher_id", self.publisher_id)
            .maybe_at_least("price", self.price_min)
            .maybe_at_most("price", self.price_max)
    }

    pub fn page(&self) -> Result<PageParams, ListingError> {
        page_params(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerFilterParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    pub registration_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CustomerFilterParams {
    pub fn filters(&self) -> Result<FilterSet, ListingError> {
        let mut set = FilterSet::new()
            .maybe_contains("name", self.name.clone())
            .maybe_contains("email", self.email.clone())
            .maybe_eq("tax_id", self.tax_id.clone());
        if let Some(raw) = &self.registration_date {
            set = set.on_date("registration_date", parse_wire_date(raw)?);
        }
        Ok(set)
    }

    pub fn page(&self) -> Result<PageParams, ListingError> {
        page_params(self.page, self.limit)
    }
}

/// Plain order listing: optional customer scope plus pagination.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListParams {
    pub customer_id: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl OrderListParams {
    pub fn filters(&self) -> FilterSet {
        FilterSet::new().maybe_eq("customer_id", self.customer_id)
    }

    pub fn page(&self) -> Result<PageParams, ListingError> {
        page_params(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilterParams {
    pub customer_id: Option<i64>,
    pub status: Option<String>,
    pub order_date: Option<String>,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl OrderFilterParams {
    pub fn filters(&self) -> Result<FilterSet, ListingError> {
        let mut set = FilterSet::new()
            .maybe_eq("customer_id", self.customer_id)
            .maybe_contains("status", self.status.clone())
            .maybe_at_least("total_value", self.value_min)
            .maybe_at_most("total_value", self.value_max);
        if let Some(raw) = &self.order_date {
            set = set.on_date("order_date", parse_wire_date(raw)?);
        }
        Ok(set)
    }

    pub fn page(&self) -> Result<PageParams, ListingError> {
        page_params(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilterParams {
    pub order_id: Option<i64>,
    pub payment_method: Option<String>,
    pub payment_date: Option<String>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaymentFilterParams {
    pub fn filters(&self) -> Result<FilterSet, ListingError> {
        let mut set = FilterSet::new()
            .maybe_eq("order_id", self.order_id)
            .maybe_contains("payment_method", self.payment_method.clone())
            .maybe_at_least("amount", self.amount_min)
            .maybe_at_most("amount", self.amount_max);
        if let Some(raw) = &self.payment_date {
            set = set.on_date("payment_date", parse_wire_date(raw)?);
        }
        Ok(set)
    }

    pub fn page(&self) -> Result<PageParams, ListingError> {
        page_params(self.page, self.limit)
    }
}
