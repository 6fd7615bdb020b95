//! HTTP API routes
//!
//! Read-only dataset endpoints plus the endpoints driving the shared
//! explorer session. Every session endpoint answers with the updated view.

use crate::area::filter::{filter, AreaFilter};
use crate::area::nearby::nearest;
use crate::area::{AreaId, ProtectedArea};
use crate::constants::search::{ALL_STATES, TOWN_NOT_FOUND_MESSAGE};
use crate::error::Error;
use crate::explorer::{run_town_search, ExplorerView, LoadState};
use crate::geo::{GeoBackend, GeocodedPlace};
use crate::server::state::AppState;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Create the API router
pub fn create_router<G: GeoBackend + 'static>(state: Arc<AppState<G>>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler::<G>))
        .route("/api/states", get(states_handler::<G>))
        .route("/api/areas", get(areas_handler::<G>))
        .route("/api/areas/:id", get(area_handler::<G>))
        .route("/api/nearby", get(nearby_handler::<G>))
        .route("/api/view", get(view_handler::<G>))
        .route("/api/filter", put(filter_handler::<G>))
        .route("/api/town", post(town_handler::<G>))
        .route("/api/selection", delete(clear_selection_handler::<G>))
        .route("/api/selection/:id", post(select_handler::<G>))
        .route("/api/hover", put(hover_handler::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::Network { .. } | Error::Http(_) => "NETWORK_ERROR",
            Error::UnknownArea(_) => "UNKNOWN_AREA",
            Error::TownSearch(_) => "NOT_FOUND",
            Error::Dataset(_) => "DATASET_UNAVAILABLE",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

fn error_response(err: Error) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        Error::Network { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
        Error::UnknownArea(_) | Error::TownSearch(_) => StatusCode::NOT_FOUND,
        Error::Dataset(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiError::from(err)))
}

fn bad_request(message: &str) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: message.to_string(),
            code: "INVALID_REQUEST".to_string(),
        }),
    )
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    /// `loading`, `failed` or `loaded`
    pub dataset: String,
    pub total_areas: usize,
    pub located_areas: usize,
    pub loaded_at: Option<String>,
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<G: GeoBackend>(State(state): State<Arc<AppState<G>>>) -> Json<StatusResponse> {
    let explorer = state.explorer.read().await;
    let dataset = explorer.dataset();
    let load = match explorer.load_state() {
        LoadState::Loading => "loading",
        LoadState::Failed(_) => "failed",
        LoadState::Loaded(_) => "loaded",
    };

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset: load.to_string(),
        total_areas: dataset.map_or(0, |d| d.len()),
        located_areas: dataset.map_or(0, |d| d.located_count()),
        loaded_at: dataset.map(|d| d.loaded_at().to_rfc3339()),
        uptime_secs: state.uptime_secs(),
    })
}

/// States list response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatesResponse {
    pub states: Vec<String>,
}

/// Distinct states present in the dataset, sorted
///
/// GET /api/states
async fn states_handler<G: GeoBackend>(State(state): State<Arc<AppState<G>>>) -> ApiResult<StatesResponse> {
    let explorer = state.explorer.read().await;
    explorer.require_dataset().map_err(error_response)?;
    Ok(Json(StatesResponse {
        states: explorer.state_options(),
    }))
}

/// Query parameters for `/api/areas`
#[derive(Debug, Default, Deserialize)]
pub struct AreasQuery {
    pub name: Option<String>,
    pub state: Option<String>,
}

/// Area list response
#[derive(Debug, Serialize, Deserialize)]
pub struct AreasResponse {
    pub areas: Vec<ProtectedArea>,
    pub count: usize,
}

/// Filter the dataset without touching the session
///
/// GET /api/areas?name=&state=
async fn areas_handler<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Query(query): Query<AreasQuery>,
) -> ApiResult<AreasResponse> {
    let explorer = state.explorer.read().await;
    let dataset = explorer.require_dataset().map_err(error_response)?;

    let areas = filter(
        dataset.areas(),
        query.name.as_deref().unwrap_or_default(),
        query.state.as_deref().unwrap_or(ALL_STATES),
    );
    Ok(Json(AreasResponse {
        count: areas.len(),
        areas,
    }))
}

/// A single area
///
/// GET /api/areas/:id
async fn area_handler<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<AreaId>,
) -> ApiResult<ProtectedArea> {
    let explorer = state.explorer.read().await;
    let dataset = explorer.require_dataset().map_err(error_response)?;

    dataset
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error_response(Error::UnknownArea(id)))
}

/// Query parameters for `/api/nearby`
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub town: String,
    pub state: Option<String>,
    pub count: Option<usize>,
}

/// Nearby areas response
#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub town: GeocodedPlace,
    pub areas: Vec<ProtectedArea>,
}

/// Geocode a town and list the nearest areas without touching the session
///
/// GET /api/nearby?town=&state=&count=
async fn nearby_handler<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Query(query): Query<NearbyQuery>,
) -> ApiResult<NearbyResponse> {
    if query.count == Some(0) {
        return Err(bad_request("count must be at least 1"));
    }
    state.explorer.read().await.require_dataset().map_err(error_response)?;

    let bias = query.state.as_deref().filter(|s| *s != ALL_STATES);
    let town = state
        .geocoder
        .geocode_town(&query.town, bias)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(Error::TownSearch(TOWN_NOT_FOUND_MESSAGE.to_string())))?;

    let count = query.count.unwrap_or(state.config.search.nearby_count);
    let explorer = state.explorer.read().await;
    let areas = nearest(&town, explorer.dataset().map(|d| d.areas()).unwrap_or_default(), count);

    Ok(Json(NearbyResponse { town, areas }))
}

/// Current session view
///
/// GET /api/view
async fn view_handler<G: GeoBackend>(State(state): State<Arc<AppState<G>>>) -> Json<ExplorerView> {
    Json(state.explorer.read().await.view())
}

/// Replace the session filter
///
/// PUT /api/filter
async fn filter_handler<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<AreaFilter>,
) -> Json<ExplorerView> {
    let mut explorer = state.explorer.write().await;
    explorer.set_filter(req);
    Json(explorer.view())
}

/// Town search request body
#[derive(Debug, Deserialize)]
pub struct TownRequest {
    pub query: String,
}

/// Run a town search for the session
///
/// The geocode happens without holding the session lock. If another search
/// is issued meanwhile, this one's result is dropped.
///
/// POST /api/town
async fn town_handler<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<TownRequest>,
) -> Json<ExplorerView> {
    let ticket = {
        let mut explorer = state.explorer.write().await;
        explorer.set_town_query(req.query);
        explorer.begin_town_search()
    };

    if let Some(ticket) = ticket {
        let cancel = state.shutdown.child_token();
        let outcome = run_town_search(&state.geocoder, &ticket, &cancel).await;

        let applied = state.explorer.write().await.finish_town_search(&ticket, outcome);
        if !applied {
            debug!(query = %ticket.query, "Discarded superseded town search");
        }
    }

    Json(state.explorer.read().await.view())
}

/// Select an area
///
/// POST /api/selection/:id
async fn select_handler<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<AreaId>,
) -> ApiResult<ExplorerView> {
    let mut explorer = state.explorer.write().await;
    explorer.select_area(id).map_err(error_response)?;
    Ok(Json(explorer.view()))
}

/// Clear the selection
///
/// DELETE /api/selection
async fn clear_selection_handler<G: GeoBackend>(State(state): State<Arc<AppState<G>>>) -> Json<ExplorerView> {
    let mut explorer = state.explorer.write().await;
    explorer.clear_selection();
    Json(explorer.view())
}

/// Hover request body, `null` clears the hover
#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    pub id: Option<AreaId>,
}

/// Set or clear the hovered area
///
/// PUT /api/hover
async fn hover_handler<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<HoverRequest>,
) -> ApiResult<ExplorerView> {
    let mut explorer = state.explorer.write().await;
    explorer.hover_area(req.id).map_err(error_response)?;
    Ok(Json(explorer.view()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::source::IpaFeatureCollection;
    use crate::area::Dataset;
    use crate::config::Config;
    use crate::error::Result;
    use crate::explorer::{Explorer, LoadOutcome};
    use crate::geo::town_search_text;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    /// Knows Ballina, fails for "Offline", finds nothing else
    struct FakeGeocoder;

    impl GeoBackend for FakeGeocoder {
        async fn geocode_town(&self, query: &str, state: Option<&str>) -> Result<Option<GeocodedPlace>> {
            let Some(text) = town_search_text(query, state) else {
                return Ok(None);
            };
            if text.starts_with("Offline") {
                return Err(Error::Network {
                    service: "Geocoder",
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                });
            }
            Ok(text.starts_with("Ballina").then(|| GeocodedPlace {
                display_name: "Ballina, New South Wales, Australia".to_string(),
                lat: -28.8667,
                lng: 153.5667,
            }))
        }
    }

    fn dataset() -> Dataset {
        let collection: IpaFeatureCollection = serde_json::from_value(json!({
            "features": [
                { "id": 11,
                  "properties": { "NAME": "Ngunya Jargoon IPA", "STATE": "NSW", "TYPE": "Dedicated",
                                  "AUTHORITY": "LALC", "LATITUDE": -28.95, "LONGITUDE": 153.4 },
                  "geometry": { "type": "Polygon",
                                "coordinates": [[[153.3, -28.9], [153.5, -28.9], [153.5, -29.0], [153.3, -28.9]]] } },
                { "properties": { "NAME": "Warddeken IPA", "STATE": "NT", "LATITUDE": -12.8, "LONGITUDE": 133.6 } },
                { "properties": { "NAME": "Minyumai IPA", "STATE": "NSW", "LATITUDE": -29.1, "LONGITUDE": 153.3 } },
                { "properties": { "NAME": "Unlocated IPA", "STATE": "QLD" } }
            ]
        }))
        .unwrap();
        Dataset::from_collection(collection, false)
    }

    fn create_app(explorer: Explorer) -> Router {
        let state = AppState::new(Config::default(), explorer, FakeGeocoder, CancellationToken::new());
        create_router(Arc::new(state))
    }

    fn loaded_app() -> Router {
        create_app(Explorer::with_dataset(dataset(), 5))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = loaded_app();
        let (status, body) = send(&app, "GET", "/api/status", None).await;

        assert_eq!(status, StatusCode::OK);
        let status: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert_eq!(status.dataset, "loaded");
        assert_eq!(status.total_areas, 4);
        assert_eq!(status.located_areas, 3);
        assert!(status.loaded_at.is_some());
    }

    #[tokio::test]
    async fn test_states_endpoint() {
        let app = loaded_app();
        let (status, body) = send(&app, "GET", "/api/states", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["states"], json!(["NSW", "NT", "QLD"]));
    }

    #[tokio::test]
    async fn test_endpoints_unavailable_while_loading() {
        let app = create_app(Explorer::new(5));

        let (status, body) = send(&app, "GET", "/api/areas", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "DATASET_UNAVAILABLE");

        let (status, body) = send(&app, "GET", "/api/view", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "loading");
        assert_eq!(body["totalAreas"], 0);
    }

    #[tokio::test]
    async fn test_selection_unavailable_without_dataset() {
        let mut failed = Explorer::new(5);
        failed.apply_load(LoadOutcome::Failed("IPA feature service returned status: 500".to_string()));

        for explorer in [Explorer::new(5), failed] {
            let app = create_app(explorer);

            let (status, body) = send(&app, "POST", "/api/selection/0", None).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body["code"], "DATASET_UNAVAILABLE");

            let (status, body) = send(&app, "PUT", "/api/hover", Some(json!({ "id": 0 }))).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body["code"], "DATASET_UNAVAILABLE");

            let (status, _) = send(&app, "PUT", "/api/hover", Some(json!({ "id": null }))).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_nearby_rejects_zero_count() {
        let app = loaded_app();
        let (status, body) = send(&app, "GET", "/api/nearby?town=Ballina&count=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_areas_endpoint_filters() {
        let app = loaded_app();

        let (status, body) = send(&app, "GET", "/api/areas?name=NGU", None).await;
        assert_eq!(status, StatusCode::OK);
        let areas: AreasResponse = serde_json::from_value(body).unwrap();
        assert_eq!(areas.count, 1);
        assert_eq!(areas.areas[0].name, "Ngunya Jargoon IPA");

        let (_, body) = send(&app, "GET", "/api/areas?state=NSW", None).await;
        let areas: AreasResponse = serde_json::from_value(body).unwrap();
        let ids: Vec<AreaId> = areas.areas.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![0, 2]);

        let (_, body) = send(&app, "GET", "/api/areas", None).await;
        assert_eq!(body["count"], 4);
    }

    #[tokio::test]
    async fn test_area_endpoint() {
        let app = loaded_app();

        let (status, body) = send(&app, "GET", "/api/areas/0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ngunya Jargoon IPA");
        assert_eq!(body["featureId"], 11);

        let (status, body) = send(&app, "GET", "/api/areas/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "UNKNOWN_AREA");
    }

    #[tokio::test]
    async fn test_nearby_endpoint() {
        let app = loaded_app();

        let (status, body) = send(&app, "GET", "/api/nearby?town=Ballina&count=2", None).await;
        assert_eq!(status, StatusCode::OK);
        let nearby: NearbyResponse = serde_json::from_value(body).unwrap();
        assert_eq!(nearby.town.display_name, "Ballina, New South Wales, Australia");
        let names: Vec<&str> = nearby.areas.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ngunya Jargoon IPA", "Minyumai IPA"]);

        let (status, body) = send(&app, "GET", "/api/nearby?town=Atlantis", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, body) = send(&app, "GET", "/api/nearby?town=Offline", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "NETWORK_ERROR");
    }

    #[tokio::test]
    async fn test_filter_controls_visible_list() {
        let app = loaded_app();

        let (_, body) = send(&app, "GET", "/api/view", None).await;
        assert_eq!(body["filterActive"], false);
        assert!(body["filteredAreas"].is_null());

        let (status, body) = send(&app, "PUT", "/api/filter", Some(json!({ "name": "", "state": "NSW" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filterActive"], true);
        assert_eq!(body["filteredAreas"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_town_search_found() {
        let app = loaded_app();
        let (status, body) = send(&app, "POST", "/api/town", Some(json!({ "query": "Ballina" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["town"]["inFlight"], false);
        assert_eq!(body["town"]["query"], "Ballina, New South Wales, Australia");
        assert!(body["town"]["error"].is_null());

        let nearby = body["nearbyAreas"].as_array().unwrap();
        assert_eq!(nearby.len(), 3);
        assert_eq!(nearby[0]["name"], "Ngunya Jargoon IPA");
        assert!(nearby[0]["distanceKm"].as_f64().unwrap() < 20.0);

        assert_eq!(body["camera"]["zoom"], 6);
    }

    #[tokio::test]
    async fn test_town_search_not_found_and_failed() {
        let app = loaded_app();

        let (_, body) = send(&app, "POST", "/api/town", Some(json!({ "query": "Atlantis" }))).await;
        assert_eq!(body["town"]["error"], TOWN_NOT_FOUND_MESSAGE);
        assert!(body["nearbyAreas"].as_array().unwrap().is_empty());

        let (status, body) = send(&app, "POST", "/api/town", Some(json!({ "query": "Offline" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["town"]["error"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_blank_town_query_clears_panel() {
        let app = loaded_app();
        send(&app, "POST", "/api/town", Some(json!({ "query": "Ballina" }))).await;

        let (_, body) = send(&app, "POST", "/api/town", Some(json!({ "query": "   " }))).await;
        assert!(body["town"]["place"].is_null());
        assert!(body["town"]["error"].is_null());
        assert!(body["nearbyAreas"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_selection_and_hover() {
        let app = loaded_app();

        let (status, body) = send(&app, "POST", "/api/selection/0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selectedAreaId"], 0);
        assert_eq!(body["selectedArea"]["name"], "Ngunya Jargoon IPA");
        assert_eq!(body["camera"]["zoom"], 7);
        assert_eq!(body["selectedOutline"]["type"], "Polygon");

        let (status, body) = send(&app, "PUT", "/api/hover", Some(json!({ "id": 2 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hoveredAreaId"], 2);

        let (_, body) = send(&app, "PUT", "/api/hover", Some(json!({ "id": null }))).await;
        assert!(body["hoveredAreaId"].is_null());

        let (status, body) = send(&app, "DELETE", "/api/selection", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["selectedAreaId"].is_null());
        assert!(body["selectedOutline"].is_null());
    }

    #[tokio::test]
    async fn test_select_unknown_area() {
        let app = loaded_app();

        let (status, body) = send(&app, "POST", "/api/selection/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "UNKNOWN_AREA");

        let (status, _) = send(&app, "PUT", "/api/hover", Some(json!({ "id": 42 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
