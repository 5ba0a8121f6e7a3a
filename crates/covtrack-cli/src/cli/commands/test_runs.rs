use super::{open_service, print_json};
use crate::cli::args::{GlobalArgs, TestsCmd};
use covtrack_core::storage::RunGroup;
use serde_json::json;

pub async fn run(global: &GlobalArgs, cmd: TestsCmd) -> anyhow::Result<()> {
    let svc = open_service(global)?;
    match cmd {
        TestsCmd::Feature { id } => print_json(&svc.feature_tests(id).await?),
        TestsCmd::Product { id } => print_json(&svc.product_tests(id).await?),
        TestsCmd::History { suite, file } => {
            print_json(&svc.suite_file_history(suite, file).await?)
        }
        TestsCmd::Delete { id } => {
            svc.delete_test_run(id).await?;
            print_json(&json!({ "deleted": id }))
        }
        TestsCmd::Purge {
            component,
            suite,
            file,
        } => {
            let removed = svc
                .purge_group(RunGroup::new(component, suite, file))
                .await?;
            print_json(&json!({ "removed": removed }))
        }
    }
}
