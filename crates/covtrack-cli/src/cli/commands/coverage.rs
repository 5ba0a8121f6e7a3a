use super::{open_service, print_json};
use crate::cli::args::{CoverageCmd, GlobalArgs};

pub async fn run(global: &GlobalArgs, cmd: CoverageCmd) -> anyhow::Result<()> {
    let svc = open_service(global)?;
    match cmd {
        CoverageCmd::Product { id } => print_json(&svc.product_coverage(id).await?),
        CoverageCmd::Area { id } => print_json(&svc.area_coverage(id).await?),
    }
}

pub async fn components(global: &GlobalArgs) -> anyhow::Result<()> {
    let svc = open_service(global)?;
    print_json(&svc.components().await?)
}
