//! Filtered, paginated read views over the bookstore (the query side).
//!
//! This crate translates optional wire-level filter parameters plus
//! page/limit into a filtered total and one page of matching records,
//! consistently:
//! - filters apply conjunctively, absent filters impose no constraint
//! - zero matches yield an empty page with total 0, never an error
//! - [`OrderDirectory`] assembles read-shaped order projections with
//!   customer, payment and book ids resolved for the whole page at once

pub mod error;
pub mod orders;
pub mod page;
pub mod params;

pub use error::ListingError;
pub use orders::{OrderDirectory, OrderView};
pub use page::paginate;
pub use params::{
    AuthorFilterParams, BookFilterParams, CustomerFilterParams, DATE_FORMAT, ListParams,
    OrderFilterParams, OrderListParams, PaymentFilterParams, PublisherFilterParams,
    parse_wire_date,
};
