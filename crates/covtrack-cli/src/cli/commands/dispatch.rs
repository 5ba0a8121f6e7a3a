use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let global = cli.global;
    let result = match cli.cmd {
        Command::Init => super::init::run(&global).await,
        Command::Product { cmd } => super::catalog::product(&global, cmd).await,
        Command::Area { cmd } => super::catalog::area(&global, cmd).await,
        Command::Feature { cmd } => super::catalog::feature(&global, cmd).await,
        Command::Expl { cmd } => super::catalog::expl(&global, cmd).await,
        Command::Upload(args) => super::upload::run(&global, args).await,
        Command::Coverage { cmd } => super::coverage::run(&global, cmd).await,
        Command::Tests { cmd } => super::test_runs::run(&global, cmd).await,
        Command::Components => super::coverage::components(&global).await,
    };
    result.map(|()| SUCCESS)
}
