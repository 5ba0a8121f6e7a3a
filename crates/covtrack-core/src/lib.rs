//! Test coverage tracking core.
//!
//! Stores products, areas, features, exploratory tests and automated test
//! runs in SQLite, and rolls the runs of a trailing window up into coverage
//! figures per area, feature and test file.
//!
//! ```text
//! request ──▶ CoverageService ──▶ CoverageStore::fetch_window (ordered rows)
//!                                        │
//!                                        ▼
//!                               reducer::reduce_coverage
//!                                        │
//!                                        ▼
//!              assembler (merge with areas/features + expl. test overview)
//! ```

pub mod assembler;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod model;
pub mod reducer;
pub mod service;
pub mod storage;
pub mod window;

pub use config::CoverageConfig;
pub use errors::CoverageError;
pub use service::CoverageService;
pub use storage::CoverageStore;
pub use window::{WindowQuery, WindowScope, DEFAULT_WINDOW_DAYS};
