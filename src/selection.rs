//! Selection, hover and map framing
//!
//! One [`SelectionController`] owns which area is selected, which is hovered
//! and the focus token. The list view and the map view both read from it, so
//! they can never disagree about the selection.
//!
//! The focus token increases on every explicit select or clear, including
//! reselecting the area that is already selected. The map compares tokens to
//! decide when to re-frame; the token carries no other meaning.

use crate::area::{AreaId, Dataset, ProtectedArea};
use crate::constants::map::{DEFAULT_CENTER, DEFAULT_ZOOM, SELECTED_ZOOM, TOWN_ZOOM};
use crate::geo::centroid::AreaGeometry;
use crate::geo::{Coordinates, GeocodedPlace};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Monotonic version of the map focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FocusToken(pub u64);

impl FocusToken {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FocusToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presentation hook run when an area is explicitly selected
///
/// Typically scrolls the map into view.
pub trait FocusHook: Send + Sync {
    fn focus_map(&self, area: AreaId, token: FocusToken);
}

/// Selection state shared by list and map views
#[derive(Default, Clone)]
pub struct SelectionController {
    selected: Option<AreaId>,
    hovered: Option<AreaId>,
    focus: FocusToken,
    hook: Option<Arc<dyn FocusHook>>,
}

impl fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("selected", &self.selected)
            .field("hovered", &self.hovered)
            .field("focus", &self.focus)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the hook called after every `select_area`
    pub fn with_focus_hook(mut self, hook: Arc<dyn FocusHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn selected(&self) -> Option<AreaId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<AreaId> {
        self.hovered
    }

    pub fn focus_token(&self) -> FocusToken {
        self.focus
    }

    /// Select an area, clear hover and bump the focus token
    pub fn select_area(&mut self, id: AreaId) -> FocusToken {
        self.selected = Some(id);
        self.hovered = None;
        self.focus = self.focus.next();
        debug!(area = id, focus = %self.focus, "Area selected");

        if let Some(hook) = &self.hook {
            hook.focus_map(id, self.focus);
        }
        self.focus
    }

    /// Set or clear the hovered area; selection and focus are untouched
    pub fn hover_area(&mut self, id: Option<AreaId>) {
        self.hovered = id;
    }

    /// Clear selection and hover and bump the focus token
    pub fn clear_selection(&mut self) -> FocusToken {
        self.selected = None;
        self.hovered = None;
        self.focus = self.focus.next();
        debug!(focus = %self.focus, "Selection cleared");
        self.focus
    }

    pub fn is_selected(&self, id: AreaId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_hovered(&self, id: AreaId) -> bool {
        self.hovered == Some(id)
    }
}

/// Where the map should look
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCamera {
    pub center: Coordinates,
    pub zoom: u8,
    /// Focus token this framing was computed for
    pub version: FocusToken,
}

/// Frame the map: selected area first, then the geocoded town, then Australia
///
/// A selected area without coordinates falls through to the next rule.
pub fn camera(
    selection: &SelectionController,
    dataset: &Dataset,
    town: Option<&GeocodedPlace>,
) -> MapCamera {
    let selected = selection
        .selected()
        .and_then(|id| dataset.get(id))
        .and_then(ProtectedArea::coords);

    let (center, zoom) = match (selected, town) {
        (Some(coords), _) => (coords, SELECTED_ZOOM),
        (None, Some(town)) => (town.coords(), TOWN_ZOOM),
        (None, None) => (Coordinates::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1), DEFAULT_ZOOM),
    };

    MapCamera {
        center,
        zoom,
        version: selection.focus_token(),
    }
}

/// Visual emphasis of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerEmphasis {
    Selected,
    Hovered,
    Normal,
    Town,
}

/// Circle marker paint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub radius: f64,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl MarkerEmphasis {
    pub fn style(self) -> MarkerStyle {
        match self {
            Self::Selected => MarkerStyle { color: "#0ea5e9", radius: 7.0, weight: 3.0, fill_opacity: 0.9 },
            Self::Hovered => MarkerStyle { color: "#fde047", radius: 6.0, weight: 2.0, fill_opacity: 0.85 },
            Self::Normal => MarkerStyle { color: "#f97316", radius: 4.0, weight: 1.5, fill_opacity: 0.7 },
            Self::Town => MarkerStyle { color: "#22c55e", radius: 6.0, weight: 2.0, fill_opacity: 0.9 },
        }
    }
}

/// A marker to draw on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// Area id; `None` for the town marker
    pub area_id: Option<AreaId>,
    pub label: String,
    pub position: Coordinates,
    pub emphasis: MarkerEmphasis,
    pub style: MarkerStyle,
}

fn marker(area_id: Option<AreaId>, label: String, position: Coordinates, emphasis: MarkerEmphasis) -> MapMarker {
    MapMarker {
        area_id,
        label,
        position,
        emphasis,
        style: emphasis.style(),
    }
}

/// Markers for every located area, plus the town when one is known
///
/// Selected beats hovered when an area is both.
pub fn markers(
    selection: &SelectionController,
    areas: &[ProtectedArea],
    town: Option<&GeocodedPlace>,
) -> Vec<MapMarker> {
    let mut out: Vec<MapMarker> = town
        .map(|t| marker(None, t.display_name.clone(), t.coords(), MarkerEmphasis::Town))
        .into_iter()
        .collect();

    out.extend(areas.iter().filter_map(|area| {
        let position = area.coords()?;
        let emphasis = if selection.is_selected(area.id) {
            MarkerEmphasis::Selected
        } else if selection.is_hovered(area.id) {
            MarkerEmphasis::Hovered
        } else {
            MarkerEmphasis::Normal
        };
        Some(marker(Some(area.id), area.name.clone(), position, emphasis))
    }));

    out
}

/// Geometry of the selected area for drawing its outline
pub fn selected_outline<'a>(selection: &SelectionController, dataset: &'a Dataset) -> Option<&'a AreaGeometry> {
    selection.selected().and_then(|id| dataset.geometry(id))
}
