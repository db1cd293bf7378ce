//! Common types used across the application.

pub mod days;
pub mod id;
pub mod pagination;

pub use days::{Days, DaysError};
pub use id::*;
pub use pagination::{PageMeta, PageRequest, PageResponse};
