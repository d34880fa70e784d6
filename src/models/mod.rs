//! Core data models for news queries, endpoints and results.

mod endpoint;
mod page;
mod query;

pub use endpoint::{Endpoint, EndpointSpec, SortBy};
pub use page::{Page, UnifiedResult, STATUS_OK};
pub use query::{ParamValue, QueryParams, RawParams, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
