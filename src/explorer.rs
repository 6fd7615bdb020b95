//! Explorer session state
//!
//! An [`Explorer`] is everything one user session sees: the dataset load
//! state, the name/state filter, the town-search panel and the selection.
//! Derived lists (filtered, nearby, markers) are recomputed from this state
//! on demand and never stored.
//!
//! Network work happens outside the explorer so callers can release any lock
//! while waiting:
//!
//! 1. [`load_dataset`] / [`run_town_search`] perform the request and classify
//!    the result into an outcome value. They never return an error.
//! 2. [`Explorer::apply_load`] / [`Explorer::finish_town_search`] fold the
//!    outcome into the session. Cancelled work and superseded town searches
//!    leave the results untouched.

use crate::area::filter::AreaFilter;
use crate::area::nearby::nearest;
use crate::area::source::AreaSource;
use crate::area::{state_options, AreaId, Dataset, ProtectedArea};
use crate::constants::search::TOWN_NOT_FOUND_MESSAGE;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, GeocodedPlace};
use crate::selection::{self, FocusToken, MapCamera, MapMarker, SelectionController};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Dataset load state for the session
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Failed(String),
    Loaded(Dataset),
}

/// Result of a dataset load attempt
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Dataset),
    Failed(String),
    Cancelled,
}

/// Result of a town search
#[derive(Debug, Clone, PartialEq)]
pub enum TownSearchOutcome {
    Found(GeocodedPlace),
    /// No result, or a result with unusable coordinates
    NotFound,
    /// The geocoder could not be reached or answered with an error
    Failed(String),
    Cancelled,
}

/// A pending town search, issued by [`Explorer::begin_town_search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownTicket {
    seq: u64,
    pub query: String,
    pub state: Option<String>,
}

/// The town-search panel
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TownPanel {
    pub query: String,
    /// Advisory: a search has been issued and not yet answered
    pub in_flight: bool,
    pub error: Option<String>,
    pub place: Option<GeocodedPlace>,
}

/// Fetch and normalise the dataset, unless cancelled first
pub async fn load_dataset<S: AreaSource>(
    source: &S,
    centroid_fallback: bool,
    cancel: &CancellationToken,
) -> LoadOutcome {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => LoadOutcome::Cancelled,
        result = source.fetch_all() => match result {
            Ok(collection) => {
                let dataset = Dataset::from_collection(collection, centroid_fallback);
                info!(areas = dataset.len(), located = dataset.located_count(), "Dataset loaded");
                LoadOutcome::Loaded(dataset)
            }
            Err(e) => {
                warn!(error = %e, "Dataset load failed");
                LoadOutcome::Failed(e.to_string())
            }
        },
    }
}

/// Geocode the ticket's town, unless cancelled first
pub async fn run_town_search<G: GeoBackend>(
    geocoder: &G,
    ticket: &TownTicket,
    cancel: &CancellationToken,
) -> TownSearchOutcome {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => TownSearchOutcome::Cancelled,
        result = geocoder.geocode_town(&ticket.query, ticket.state.as_deref()) => match result {
            Ok(Some(place)) => TownSearchOutcome::Found(place),
            Ok(None) => TownSearchOutcome::NotFound,
            Err(e) => {
                warn!(query = %ticket.query, error = %e, "Town search failed");
                TownSearchOutcome::Failed(e.to_string())
            }
        },
    }
}

/// One user's view of the protected areas
#[derive(Debug, Clone)]
pub struct Explorer {
    load: LoadState,
    filter: AreaFilter,
    town: TownPanel,
    selection: SelectionController,
    nearby_count: usize,
    search_seq: u64,
}

impl Explorer {
    /// A session waiting for its dataset
    pub fn new(nearby_count: usize) -> Self {
        Self {
            load: LoadState::Loading,
            filter: AreaFilter::default(),
            town: TownPanel::default(),
            selection: SelectionController::new(),
            nearby_count,
            search_seq: 0,
        }
    }

    /// A session with its dataset already loaded
    pub fn with_dataset(dataset: Dataset, nearby_count: usize) -> Self {
        let mut explorer = Self::new(nearby_count);
        explorer.load = LoadState::Loaded(dataset);
        explorer
    }

    /// Replace the selection controller, e.g. to install a focus hook
    pub fn with_selection(mut self, selection: SelectionController) -> Self {
        self.selection = selection;
        self
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match &self.load {
            LoadState::Loaded(dataset) => Some(dataset),
            _ => None,
        }
    }

    /// The loaded dataset, or `Error::Dataset` while loading or after a failure
    pub fn require_dataset(&self) -> Result<&Dataset> {
        match &self.load {
            LoadState::Loaded(dataset) => Ok(dataset),
            LoadState::Loading => Err(Error::Dataset("still loading".to_string())),
            LoadState::Failed(message) => Err(Error::Dataset(format!("failed to load: {}", message))),
        }
    }

    fn areas(&self) -> &[ProtectedArea] {
        self.dataset().map(Dataset::areas).unwrap_or_default()
    }

    /// Fold a load outcome into the session
    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded(dataset) => self.load = LoadState::Loaded(dataset),
            LoadOutcome::Failed(message) => self.load = LoadState::Failed(message),
            LoadOutcome::Cancelled => {}
        }
    }

    pub fn filter(&self) -> &AreaFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: AreaFilter) {
        self.filter = filter;
    }

    /// Areas passing the current filter, in source order
    pub fn filtered_areas(&self) -> Vec<ProtectedArea> {
        self.filter.apply(self.areas())
    }

    /// The filtered list, shown only once the user has set a filter
    pub fn visible_areas(&self) -> Option<Vec<ProtectedArea>> {
        self.filter.is_active().then(|| self.filtered_areas())
    }

    pub fn state_options(&self) -> Vec<String> {
        state_options(self.areas())
    }

    pub fn town(&self) -> &TownPanel {
        &self.town
    }

    pub fn set_town_query(&mut self, query: impl Into<String>) {
        self.town.query = query.into();
    }

    /// Start a town search for the current query
    ///
    /// A blank query clears the panel and returns `None`; no request should
    /// be made. Otherwise the panel is marked in flight and the returned
    /// ticket supersedes any earlier one.
    pub fn begin_town_search(&mut self) -> Option<TownTicket> {
        self.search_seq += 1;
        self.town.error = None;
        self.town.place = None;

        let query = self.town.query.trim();
        if query.is_empty() {
            self.town.in_flight = false;
            return None;
        }

        self.town.in_flight = true;
        Some(TownTicket {
            seq: self.search_seq,
            query: query.to_string(),
            state: self.filter.state_bias().map(str::to_string),
        })
    }

    /// Apply the outcome of a search started with `ticket`
    ///
    /// Returns false when the ticket has been superseded. A cancelled search
    /// only releases the in-flight flag.
    pub fn finish_town_search(&mut self, ticket: &TownTicket, outcome: TownSearchOutcome) -> bool {
        if ticket.seq != self.search_seq {
            return false;
        }
        self.town.in_flight = false;

        match outcome {
            TownSearchOutcome::Found(place) => {
                self.town.query = place.display_name.clone();
                self.town.place = Some(place);
            }
            TownSearchOutcome::NotFound => {
                self.town.error = Some(TOWN_NOT_FOUND_MESSAGE.to_string());
            }
            TownSearchOutcome::Failed(message) => {
                self.town.error = Some(message);
            }
            TownSearchOutcome::Cancelled => {}
        }
        true
    }

    /// Areas nearest the geocoded town, empty when there is no town
    pub fn nearby_areas(&self) -> Vec<ProtectedArea> {
        match &self.town.place {
            Some(place) => nearest(place, self.areas(), self.nearby_count),
            None => Vec::new(),
        }
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    fn check_area(&self, id: AreaId) -> Result<()> {
        if id < self.require_dataset()?.len() {
            Ok(())
        } else {
            Err(Error::UnknownArea(id))
        }
    }

    /// Select an area from either view
    pub fn select_area(&mut self, id: AreaId) -> Result<FocusToken> {
        self.check_area(id)?;
        Ok(self.selection.select_area(id))
    }

    /// Hover an area, or clear the hover with `None`
    pub fn hover_area(&mut self, id: Option<AreaId>) -> Result<()> {
        if let Some(id) = id {
            self.check_area(id)?;
        }
        self.selection.hover_area(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) -> FocusToken {
        self.selection.clear_selection()
    }

    pub fn selected_area(&self) -> Option<&ProtectedArea> {
        self.selection.selected().and_then(|id| self.dataset()?.get(id))
    }

    pub fn camera(&self) -> Option<MapCamera> {
        let dataset = self.dataset()?;
        Some(selection::camera(&self.selection, dataset, self.town.place.as_ref()))
    }

    pub fn markers(&self) -> Vec<MapMarker> {
        selection::markers(&self.selection, self.areas(), self.town.place.as_ref())
    }

    /// Everything the list and map views render
    pub fn view(&self) -> ExplorerView {
        let (status, error) = match &self.load {
            LoadState::Loading => ("loading", None),
            LoadState::Failed(message) => ("failed", Some(message.clone())),
            LoadState::Loaded(_) => ("loaded", None),
        };

        let selected_outline = self
            .dataset()
            .and_then(|dataset| selection::selected_outline(&self.selection, dataset))
            .and_then(|geometry| geometry.raw().cloned());

        ExplorerView {
            status,
            error,
            total_areas: self.areas().len(),
            state_options: self.state_options(),
            filter: self.filter.clone(),
            filter_active: self.filter.is_active(),
            filtered_areas: self.visible_areas(),
            town: self.town.clone(),
            nearby_areas: self.nearby_areas(),
            selected_area_id: self.selection.selected(),
            hovered_area_id: self.selection.hovered(),
            focus_token: self.selection.focus_token(),
            selected_area: self.selected_area().cloned(),
            camera: self.camera(),
            markers: self.markers(),
            selected_outline,
        }
    }
}

/// Snapshot of a session for rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerView {
    pub status: &'static str,
    pub error: Option<String>,
    pub total_areas: usize,
    pub state_options: Vec<String>,
    pub filter: AreaFilter,
    pub filter_active: bool,
    /// `None` until a filter is active
    pub filtered_areas: Option<Vec<ProtectedArea>>,
    pub town: TownPanel,
    pub nearby_areas: Vec<ProtectedArea>,
    pub selected_area_id: Option<AreaId>,
    pub hovered_area_id: Option<AreaId>,
    pub focus_token: FocusToken,
    pub selected_area: Option<ProtectedArea>,
    pub camera: Option<MapCamera>,
    pub markers: Vec<MapMarker>,
    pub selected_outline: Option<Value>,
}
