use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::config::SliderConfig;
use crate::data::filter::filter_launches;
use crate::data::model::{LaunchDataset, PayloadRange, SiteFilter};
use crate::data::summary::{outcome_summary, OutcomeSummary};
use crate::report::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded launch table. Replaced wholesale on File → Open, never mutated.
    pub dataset: LaunchDataset,

    /// Where `dataset` came from.
    pub source_path: PathBuf,

    /// Dropdown selection.
    pub site: SiteFilter,

    /// Range slider selection.
    pub payload_range: PayloadRange,

    /// Text typed into the dropdown's search box.
    pub site_query: String,

    /// Slider layout, widened to the data if necessary.
    pub slider: SliderConfig,
    base_slider: SliderConfig,

    /// Slider tick labels, rebuilt with `slider`.
    pub slider_marks: Vec<(f64, String)>,

    /// Pie chart data for `site`.
    pub pie: OutcomeSummary,

    /// Indices of launches passing the site and payload filters.
    pub visible_indices: Vec<usize>,

    /// Scatter colours by booster version category.
    pub booster_colors: ColorMap,

    /// Pie colours by launch site.
    pub site_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: LaunchDataset, source_path: &Path, slider: SliderConfig) -> Self {
        let mut state = AppState {
            dataset: LaunchDataset::from_records(Vec::new()),
            source_path: PathBuf::new(),
            site: SiteFilter::All,
            payload_range: PayloadRange::new(0.0, 0.0),
            site_query: String::new(),
            slider,
            base_slider: slider,
            slider_marks: Vec::new(),
            pie: OutcomeSummary {
                title: String::new(),
                groups: Vec::new(),
            },
            visible_indices: Vec::new(),
            booster_colors: ColorMap::default(),
            site_colors: ColorMap::default(),
            status_message: None,
        };
        state.set_dataset(dataset, source_path);
        state
    }

    /// Ingest a newly loaded dataset, reset the selection and colours.
    pub fn set_dataset(&mut self, dataset: LaunchDataset, source_path: &Path) {
        self.slider = self.base_slider.fitted_to(dataset.full_range().high);
        self.slider_marks = self.slider.marks();
        self.booster_colors = ColorMap::new(&dataset.booster_categories);
        self.site_colors = ColorMap::from_ordered(dataset.sites.iter());
        self.site = SiteFilter::All;
        self.site_query.clear();
        self.payload_range = dataset.full_range();
        self.dataset = dataset;
        self.source_path = source_path.to_path_buf();
        self.status_message = None;
        self.recompute();
    }

    /// Re-run both derived views from scratch.
    pub fn recompute(&mut self) {
        self.pie = outcome_summary(&self.dataset, &self.site);
        self.visible_indices = filter_launches(&self.dataset, self.payload_range, &self.site);
    }

    pub fn select_site(&mut self, site: SiteFilter) {
        if self.site != site {
            self.site = site;
            self.recompute();
        }
    }

    pub fn set_payload_range(&mut self, range: PayloadRange) {
        if self.payload_range != range {
            self.payload_range = range;
            self.recompute();
        }
    }

    /// Back to "All Sites" and the observed payload range.
    pub fn reset_selection(&mut self) {
        self.site = SiteFilter::All;
        self.payload_range = self.dataset.full_range();
        self.recompute();
    }

    /// Sites whose name contains the search text (case-insensitive).
    pub fn matching_sites(&self) -> Vec<String> {
        let query = self.site_query.trim().to_lowercase();
        self.dataset
            .sites
            .iter()
            .filter(|s| query.is_empty() || s.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Snapshot of the current selection for export.
    pub fn view(&self) -> DashboardView {
        DashboardView::compute(&self.dataset, &self.site, self.payload_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{record, small_dataset};

    fn state() -> AppState {
        AppState::new(small_dataset(), Path::new("launches.csv"), SliderConfig::default())
    }

    #[test]
    fn starts_with_everything_selected() {
        let s = state();
        assert_eq!(s.site, SiteFilter::All);
        assert_eq!(s.payload_range, PayloadRange::new(0.0, 9600.0));
        assert_eq!(s.visible_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(s.pie.total(), 2);
    }

    #[test]
    fn selecting_a_site_updates_both_views() {
        let mut s = state();
        s.select_site(SiteFilter::Site("B".into()));
        assert_eq!(s.visible_indices, vec![1, 4]);
        assert_eq!(s.pie.count_for("Failed"), Some(2));

        s.set_payload_range(PayloadRange::new(3000.0, 5000.0));
        assert_eq!(s.visible_indices, vec![4]);
        // Pie ignores the payload slider.
        assert_eq!(s.pie.total(), 2);
    }

    #[test]
    fn reset_restores_observed_range() {
        let mut s = state();
        s.select_site(SiteFilter::Site("A".into()));
        s.set_payload_range(PayloadRange::new(1.0, 2.0));
        assert!(s.visible_indices.is_empty());

        s.reset_selection();
        assert_eq!(s.site, SiteFilter::All);
        assert_eq!(s.visible_indices.len(), 5);
    }

    #[test]
    fn new_dataset_replaces_selection_and_widens_slider() {
        let mut s = state();
        s.select_site(SiteFilter::Site("A".into()));

        let heavy = LaunchDataset::from_records(vec![
            record("KSC LC-39A", 15_600.0, true, "B5"),
            record("KSC LC-39A", 3_000.0, false, "B5"),
        ]);
        s.set_dataset(heavy, Path::new("heavy.csv"));

        assert_eq!(s.site, SiteFilter::All);
        assert_eq!(s.slider.max, 16_000.0);
        assert_eq!(s.slider_marks.len(), 17);
        assert_eq!(s.payload_range, PayloadRange::new(3_000.0, 15_600.0));
        assert_eq!(s.visible_indices, vec![0, 1]);
        assert_eq!(s.source_path, PathBuf::from("heavy.csv"));
    }

    #[test]
    fn site_search_is_case_insensitive() {
        let mut s = state();
        assert_eq!(s.matching_sites(), vec!["A", "B"]);
        s.site_query = " b".into();
        assert_eq!(s.matching_sites(), vec!["B"]);
        s.site_query = "zzz".into();
        assert!(s.matching_sites().is_empty());
    }

    #[test]
    fn view_reflects_current_selection() {
        let mut s = state();
        s.select_site(SiteFilter::Site("A".into()));
        let view = s.view();
        assert_eq!(view.site, "A");
        assert_eq!(view.scatter.len(), 3);
    }
}
