//! Per-table implementation modules behind the `CoverageStore` facade.
//!
//! Every function takes a borrowed `Connection`; locking stays in the facade.

pub(crate) mod areas;
pub(crate) mod cascade;
pub(crate) mod features;
pub(crate) mod products;
pub(crate) mod test_runs;
pub(crate) mod time;
