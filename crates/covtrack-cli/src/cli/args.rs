use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "covtrack",
    version,
    about = "Test coverage tracking: products, areas, features and windowed test run coverage"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (missing file means defaults)
    #[arg(long, global = true, default_value = "covtrack.yaml")]
    pub config: PathBuf,

    /// SQLite database file; overrides config and COVTRACK_DB
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a sample config and create the database schema
    Init,
    /// Manage products
    Product {
        #[command(subcommand)]
        cmd: ProductCmd,
    },
    /// Manage functional areas of a product
    Area {
        #[command(subcommand)]
        cmd: AreaCmd,
    },
    /// Manage features of an area
    Feature {
        #[command(subcommand)]
        cmd: FeatureCmd,
    },
    /// Manage exploratory test sessions
    Expl {
        #[command(subcommand)]
        cmd: ExplCmd,
    },
    /// Upload a mocha summary report
    Upload(UploadArgs),
    /// Windowed coverage per area or feature
    Coverage {
        #[command(subcommand)]
        cmd: CoverageCmd,
    },
    /// Test run listings and maintenance
    Tests {
        #[command(subcommand)]
        cmd: TestsCmd,
    },
    /// Components seen in the window with their latest-run sums
    Components,
}

#[derive(Subcommand, Debug)]
pub enum ProductCmd {
    Add {
        name: String,
    },
    List,
    Rename {
        id: i64,
        name: String,
    },
    /// Delete a product with everything below it
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum AreaCmd {
    Add {
        #[arg(long)]
        product: i64,
        name: String,
    },
    List {
        #[arg(long)]
        product: i64,
    },
    Rename {
        id: i64,
        name: String,
    },
    /// Delete an area, its features, their test runs and its exploratory tests
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum FeatureCmd {
    Add {
        #[arg(long)]
        area: i64,
        name: String,
        #[arg(long, default_value = "")]
        documentation: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        business_value: String,
    },
    List {
        #[arg(long)]
        area: i64,
    },
    /// Update the given fields; omitted fields keep their value
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        documentation: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        business_value: Option<String>,
    },
    /// Delete a feature and its test runs
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExplCmd {
    Add {
        #[arg(long)]
        area: i64,
        /// 1 (poor) to 5 (good)
        #[arg(long)]
        rating: i64,
        #[arg(long)]
        tester: Option<i64>,
        /// Session time, RFC 3339 (default: now)
        #[arg(long)]
        at: Option<String>,
        summary: String,
    },
    /// Sessions of an area inside the window
    List {
        #[arg(long)]
        area: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    #[arg(long)]
    pub product: i64,

    /// Component the report belongs to (e.g. ui, api)
    #[arg(long)]
    pub component: String,

    /// Link to the full test report
    #[arg(long, default_value = "")]
    pub report_url: String,

    /// Mocha summary JSON
    pub report: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum CoverageCmd {
    /// Coverage of every area of a product
    Product { id: i64 },
    /// Coverage of every feature of an area
    Area { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum TestsCmd {
    /// Latest run per test file of a feature
    Feature { id: i64 },
    /// Latest run per test file of a product
    Product { id: i64 },
    /// Every run of a suite/file pair, newest first
    History {
        #[arg(long)]
        suite: String,
        #[arg(long)]
        file: String,
    },
    /// Delete one test run
    Delete { id: i64 },
    /// Delete every run of a component/suite/file
    Purge {
        #[arg(long)]
        component: String,
        #[arg(long)]
        suite: String,
        #[arg(long)]
        file: String,
    },
}
