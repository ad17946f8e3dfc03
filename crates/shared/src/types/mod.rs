//! Common types used across the application.

pub mod date_range;
pub mod id;
pub mod money;
pub mod pagination;

pub use date_range::DateRange;
pub use id::*;
pub use money::{MAX_AMOUNT, MAX_QUANTITY, percentage_of, round_money};
pub use pagination::{PageMeta, PageRequest, PageResponse};
