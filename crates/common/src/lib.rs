pub mod types;

pub use types::{Page, PageParams};
