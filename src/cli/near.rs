//! Near command handler
//!
//! Geocodes a town and lists the nearest protected areas. The dataset fetch
//! and the geocode run concurrently.

use crate::area::filter::AreaFilter;
use crate::area::source::IpaService;
use crate::cli::{ctrl_c_token, emit, init_tracing, print_formats};
use crate::config::Config;
use crate::constants::search::ALL_STATES;
use crate::error::{Error, Result};
use crate::explorer::{load_dataset, run_town_search, Explorer, LoadOutcome};
use crate::format::{get_formatter, AreaReport};
use crate::geo::get_geocoder;
use clap::Args;

/// Near command arguments
#[derive(Args)]
pub struct NearArgs {
    /// Town name to search for
    pub town: Option<String>,

    /// Bias the search to a state or territory, e.g. NSW
    #[arg(long, short = 's')]
    pub state: Option<String>,

    /// Number of areas to list
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the near command
pub async fn run(args: NearArgs) -> Result<()> {
    if args.list_formats {
        print_formats();
        return Ok(());
    }

    init_tracing("warn");
    let config = Config::load()?;

    let format_name = args.format.as_deref().unwrap_or(&config.output.format);
    let formatter =
        get_formatter(format_name).ok_or_else(|| Error::Config(format!("Unknown format: {}", format_name)))?;

    let count = args.count.unwrap_or(config.search.nearby_count);
    if count == 0 {
        return Err(Error::Config("Count must be at least 1".to_string()));
    }

    let mut explorer = Explorer::new(count);
    explorer.set_filter(AreaFilter::new(
        "",
        args.state.unwrap_or_else(|| ALL_STATES.to_string()),
    ));
    explorer.set_town_query(args.town.unwrap_or_default());

    let Some(ticket) = explorer.begin_town_search() else {
        return Err(Error::Config("Enter a town name to search".to_string()));
    };

    let source = IpaService::from_config(&config)?;
    let geocoder = get_geocoder(&config)?;
    let cancel = ctrl_c_token();

    let (loaded, found) = tokio::join!(
        load_dataset(&source, config.search.centroid_fallback, &cancel),
        run_town_search(&geocoder, &ticket, &cancel),
    );

    if cancel.is_cancelled() {
        return Ok(());
    }
    if let LoadOutcome::Failed(message) = &loaded {
        return Err(Error::Dataset(message.clone()));
    }
    explorer.apply_load(loaded);

    explorer.finish_town_search(&ticket, found);

    let town = explorer.town();
    if let Some(message) = &town.error {
        return Err(Error::TownSearch(message.clone()));
    }
    let Some(place) = town.place.clone() else {
        return Ok(());
    };

    let report = AreaReport::nearby(place, explorer.nearby_areas());
    let output = formatter.format(&report)?;
    emit(&output, args.output.as_deref())
}
