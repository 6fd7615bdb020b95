//! Nearest protected areas to a town

use crate::area::ProtectedArea;
use crate::geo::distance::distance_between;
use crate::geo::GeocodedPlace;

/// The `k` areas closest to `town`, each annotated with `distance_km`
///
/// Areas without both coordinates are skipped. The sort is stable, so areas
/// at equal distance keep their source order.
pub fn nearest(town: &GeocodedPlace, areas: &[ProtectedArea], k: usize) -> Vec<ProtectedArea> {
    let mut candidates: Vec<ProtectedArea> = areas
        .iter()
        .filter_map(|area| {
            let distance = distance_between(town.coords(), area.coords()?);
            Some(area.with_distance(distance))
        })
        .collect();

    candidates.sort_by(|a, b| {
        let a = a.distance_km.unwrap_or(f64::INFINITY);
        let b = b.distance_km.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    candidates.truncate(k);
    candidates
}
