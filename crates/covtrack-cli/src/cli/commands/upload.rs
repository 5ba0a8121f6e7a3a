use super::{open_service, print_json};
use crate::cli::args::{GlobalArgs, UploadArgs};
use covtrack_core::ingest::{parse_mocha_report, ReportUpload};
use covtrack_core::CoverageError;

/// Prints one status per report entry: the new test run id,
/// "<uuid> already uploaded", or the error text.
pub async fn run(global: &GlobalArgs, args: UploadArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.report).map_err(|e| {
        CoverageError::validation(format!("cannot read {}: {e}", args.report.display()))
    })?;
    let entries = parse_mocha_report(&raw)?;

    let svc = open_service(global)?;
    let status = svc
        .ingest_report(
            ReportUpload {
                product_id: args.product,
                component: args.component,
                report_url: args.report_url,
            },
            entries,
        )
        .await?;
    print_json(&status)
}
