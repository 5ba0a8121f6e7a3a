pub mod schema;
pub mod store;
pub(crate) mod store_internal;

pub use schema::COVERAGE_SCHEMA;
pub use store::{CoverageStore, RunGroup};
