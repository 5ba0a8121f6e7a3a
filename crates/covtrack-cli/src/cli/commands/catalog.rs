//! Structural CRUD: products, areas, features, exploratory tests.

use super::{open_service, print_json};
use crate::cli::args::{AreaCmd, ExplCmd, FeatureCmd, GlobalArgs, ProductCmd};
use chrono::{DateTime, Utc};
use covtrack_core::model::{NewExplTest, NewFeature};
use covtrack_core::CoverageError;
use serde_json::json;

pub async fn product(global: &GlobalArgs, cmd: ProductCmd) -> anyhow::Result<()> {
    let svc = open_service(global)?;
    match cmd {
        ProductCmd::Add { name } => print_json(&svc.create_product(name).await?),
        ProductCmd::List => print_json(&svc.list_products().await?),
        ProductCmd::Rename { id, name } => print_json(&svc.rename_product(id, name).await?),
        ProductCmd::Delete { id } => {
            svc.delete_product(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

pub async fn area(global: &GlobalArgs, cmd: AreaCmd) -> anyhow::Result<()> {
    let svc = open_service(global)?;
    match cmd {
        AreaCmd::Add { product, name } => print_json(&svc.create_area(product, name).await?),
        AreaCmd::List { product } => print_json(&svc.list_areas(product).await?),
        AreaCmd::Rename { id, name } => print_json(&svc.rename_area(id, name).await?),
        AreaCmd::Delete { id } => {
            svc.delete_area(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

pub async fn feature(global: &GlobalArgs, cmd: FeatureCmd) -> anyhow::Result<()> {
    let svc = open_service(global)?;
    match cmd {
        FeatureCmd::Add {
            area,
            name,
            documentation,
            url,
            business_value,
        } => {
            let feature = svc
                .create_feature(NewFeature {
                    area_id: area,
                    name,
                    documentation,
                    url,
                    business_value,
                })
                .await?;
            print_json(&feature)
        }
        FeatureCmd::List { area } => print_json(&svc.list_features(area).await?),
        FeatureCmd::Update {
            id,
            name,
            documentation,
            url,
            business_value,
        } => {
            let mut feature = svc.get_feature(id).await?;
            if let Some(name) = name {
                feature.name = name;
            }
            if let Some(documentation) = documentation {
                feature.documentation = documentation;
            }
            if let Some(url) = url {
                feature.url = url;
            }
            if let Some(business_value) = business_value {
                feature.business_value = business_value;
            }
            print_json(&svc.update_feature(feature).await?)
        }
        FeatureCmd::Delete { id } => {
            svc.delete_feature(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

pub async fn expl(global: &GlobalArgs, cmd: ExplCmd) -> anyhow::Result<()> {
    let svc = open_service(global)?;
    match cmd {
        ExplCmd::Add {
            area,
            rating,
            tester,
            at,
            summary,
        } => {
            let test_run = match at {
                Some(raw) => parse_time(&raw)?,
                None => Utc::now(),
            };
            let test = svc
                .create_expl_test(NewExplTest {
                    area_id: area,
                    summary,
                    rating,
                    test_run,
                    tester,
                })
                .await?;
            print_json(&test)
        }
        ExplCmd::List { area } => print_json(&svc.list_expl_tests(area).await?),
        ExplCmd::Delete { id } => {
            svc.delete_expl_test(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, CoverageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CoverageError::validation(format!("invalid time '{raw}': {e}")))
}
