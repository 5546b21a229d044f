use serde::Serialize;

use super::model::{LaunchDataset, Outcome, PayloadRange, SiteFilter};

// ---------------------------------------------------------------------------
// Payload / site filter (scatter chart data)
// ---------------------------------------------------------------------------

/// Return indices of launches inside `range` (inclusive) at a matching site.
///
/// Indices are ascending, so the output preserves file order. An inverted
/// range or a site with no launches gives an empty vector.
pub fn filter_launches(dataset: &LaunchDataset, range: PayloadRange, site: &SiteFilter) -> Vec<usize> {
    if range.is_empty() {
        return Vec::new();
    }
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| range.contains(rec.payload_mass_kg) && site.matches(&rec.launch_site))
        .map(|(i, _)| i)
        .collect()
}

/// A single point of the payload vs. outcome scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
    pub launch_site: String,
}

/// Project filtered rows onto the fields the scatter chart needs.
pub fn scatter_points(dataset: &LaunchDataset, indices: &[usize]) -> Vec<ScatterPoint> {
    indices
        .iter()
        .filter_map(|&i| dataset.records.get(i))
        .map(|rec| ScatterPoint {
            payload_mass_kg: rec.payload_mass_kg,
            outcome: rec.outcome,
            booster_version_category: rec.booster_version_category.clone(),
            launch_site: rec.launch_site.clone(),
        })
        .collect()
}
