use crate::cli::OptimizeArgs;
use crate::config::PartialRulesConfig;
use crate::error::{CliError, Result};
use crate::input::{self, RequirementsFile};
use crate::render;
use crate::utils::progress::CliProgressHandler;
use shrineplan::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(args: OptimizeArgs) -> Result<()> {
    info!("Merging rules from file and CLI arguments...");
    let config = PartialRulesConfig::load(args.rules.rules.as_deref())?.merge_with_cli(&args.rules)?;

    let file = match &args.input {
        Some(path) => {
            info!("Loading requirements from {:?}", path);
            RequirementsFile::from_file(path)?
        }
        None => RequirementsFile::default(),
    };
    let desired = input::collect_requirements(file, &args.requirements)?;
    if desired.is_empty() {
        return Err(CliError::Argument(
            "No requirements given. Use --input or --require.".to_string(),
        ));
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core optimization workflow...");
    let result = workflows::optimize::run(&desired, &config, &reporter)?;

    if result.solution.is_none() {
        warn!("Workflow completed but found no feasible build.");
        eprintln!("Warning: no build satisfies every requirement within the rules.");
    }
    println!("{}", render::optimization(&result, &config, args.format)?);

    Ok(())
}
