use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::filter::{filter_launches, scatter_points, ScatterPoint};
use crate::data::model::{LaunchDataset, PayloadRange, SiteFilter};
use crate::data::summary::{outcome_summary, OutcomeSummary};

/// Snapshot of both derived views for one selection, as exported to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub site: String,
    pub payload_range: PayloadRange,
    pub pie: OutcomeSummary,
    pub scatter: Vec<ScatterPoint>,
}

impl DashboardView {
    pub fn compute(dataset: &LaunchDataset, site: &SiteFilter, range: PayloadRange) -> Self {
        let indices = filter_launches(dataset, range, site);
        DashboardView {
            site: site.to_string(),
            payload_range: range,
            pie: outcome_summary(dataset, site),
            scatter: scatter_points(dataset, &indices),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing dashboard view")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let text = self.to_json()?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }
}
