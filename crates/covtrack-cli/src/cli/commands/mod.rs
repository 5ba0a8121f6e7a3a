use super::args::GlobalArgs;
use anyhow::Context;
use covtrack_core::config::load_config;
use covtrack_core::{CoverageConfig, CoverageService, CoverageStore};
use serde::Serialize;

pub mod catalog;
pub mod coverage;
pub mod dispatch;
pub mod init;
pub mod test_runs;
pub mod upload;

pub use dispatch::dispatch;

/// Config file, then environment, then `--db`.
pub(crate) fn resolve_config(global: &GlobalArgs) -> anyhow::Result<CoverageConfig> {
    let mut cfg = load_config(&global.config)?;
    if let Some(db) = &global.db {
        cfg.database = db.clone();
    }
    tracing::debug!(
        database = %cfg.database.display(),
        window_days = cfg.window_days,
        store_timeout_ms = cfg.store_timeout_ms,
        "Resolved config"
    );
    Ok(cfg)
}

pub(crate) fn open_service(global: &GlobalArgs) -> anyhow::Result<CoverageService> {
    let cfg = resolve_config(global)?;
    let store = CoverageStore::open(&cfg.database)
        .with_context(|| format!("failed to open database {}", cfg.database.display()))?;
    Ok(CoverageService::new(store, &cfg))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
