use crate::cli::SimulateArgs;
use crate::config::PartialRulesConfig;
use crate::error::{CliError, Result};
use crate::render;
use crate::utils::parser;
use shrineplan::workflows;
use tracing::info;

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = PartialRulesConfig::load(args.rules.rules.as_deref())?.merge_with_cli(&args.rules)?;

    let points = args
        .allocations
        .iter()
        .map(|arg| parser::parse_allocation(arg).map_err(|e| CliError::Argument(e.to_string())))
        .collect::<Result<Vec<_>>>()?;
    let allocation = workflows::simulate::classify(
        points.iter().map(|(name, value)| (name.as_str(), *value)),
        &config,
    );
    if allocation.len() != points.len() {
        return Err(CliError::Argument(
            "Each stat can only be allocated once.".to_string(),
        ));
    }

    info!("Invoking the core simulation workflow...");
    let result = workflows::simulate::run(&allocation, &config)?;
    println!("{}", render::simulation(&allocation, &result, args.format)?);

    Ok(())
}
