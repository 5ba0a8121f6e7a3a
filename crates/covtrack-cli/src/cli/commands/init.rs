use crate::cli::args::GlobalArgs;
use covtrack_core::config::write_sample_config;
use covtrack_core::CoverageStore;

pub async fn run(global: &GlobalArgs) -> anyhow::Result<()> {
    if global.config.exists() {
        eprintln!("Skipped {} (exists)", global.config.display());
    } else {
        write_sample_config(&global.config)?;
        eprintln!("Created {}", global.config.display());
    }

    let cfg = super::resolve_config(global)?;
    CoverageStore::open(&cfg.database)?;
    eprintln!("Initialized database {}", cfg.database.display());
    Ok(())
}
