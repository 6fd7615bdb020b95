//! Areas command handler
//!
//! Fetches the dataset and lists the areas passing a name/state filter.

use crate::area::filter::AreaFilter;
use crate::area::source::IpaService;
use crate::cli::{ctrl_c_token, emit, init_tracing, print_formats};
use crate::config::Config;
use crate::constants::search::ALL_STATES;
use crate::error::{Error, Result};
use crate::explorer::{load_dataset, Explorer, LoadOutcome};
use crate::format::{get_formatter, AreaReport};
use clap::Args;
use tracing::info;

/// Areas command arguments
#[derive(Args)]
pub struct AreasArgs {
    /// Case-insensitive substring of the area name
    #[arg(long)]
    pub name: Option<String>,

    /// State or territory code, e.g. NSW (default: all)
    #[arg(long, short = 's')]
    pub state: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List the states present in the dataset
    #[arg(short = 'S', long = "list-states")]
    pub list_states: bool,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the areas command
pub async fn run(args: AreasArgs) -> Result<()> {
    if args.list_formats {
        print_formats();
        return Ok(());
    }

    init_tracing("warn");
    let config = Config::load()?;

    let format_name = args.format.as_deref().unwrap_or(&config.output.format);
    let formatter =
        get_formatter(format_name).ok_or_else(|| Error::Config(format!("Unknown format: {}", format_name)))?;

    let source = IpaService::from_config(&config)?;
    let cancel = ctrl_c_token();

    let mut explorer = Explorer::new(config.search.nearby_count);
    explorer.set_filter(AreaFilter::new(
        args.name.unwrap_or_default(),
        args.state.unwrap_or_else(|| ALL_STATES.to_string()),
    ));

    let outcome = load_dataset(&source, config.search.centroid_fallback, &cancel).await;
    match &outcome {
        LoadOutcome::Failed(message) => return Err(Error::Dataset(message.clone())),
        LoadOutcome::Cancelled => return Ok(()),
        LoadOutcome::Loaded(_) => {}
    }
    explorer.apply_load(outcome);

    if args.list_states {
        for state in explorer.state_options() {
            println!("{}", state);
        }
        return Ok(());
    }

    let areas = explorer.filtered_areas();
    info!(matched = areas.len(), "Filtered areas");

    let output = formatter.format(&AreaReport::filtered(areas))?;
    emit(&output, args.output.as_deref())
}
