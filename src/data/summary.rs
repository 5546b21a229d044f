use serde::Serialize;

use super::model::{LaunchDataset, Outcome, SiteFilter};

// ---------------------------------------------------------------------------
// Outcome aggregation (pie chart data)
// ---------------------------------------------------------------------------

/// One slice of the outcome pie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeGroup {
    pub label: String,
    pub count: usize,
}

/// Grouped launch counts for the pie chart.
///
/// An empty `groups` vector means "no data" for the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeSummary {
    pub title: String,
    pub groups: Vec<OutcomeGroup>,
}

impl OutcomeSummary {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum over all groups.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }

    pub fn count_for(&self, label: &str) -> Option<usize> {
        self.groups.iter().find(|g| g.label == label).map(|g| g.count)
    }
}

/// Count launch outcomes for the current site selection.
///
/// * [`SiteFilter::All`] → successful launches per site, every site listed
///   (sites without a success get a zero count).
/// * [`SiteFilter::Site`] → `Success` and `Failure` counts for that site, or
///   no groups at all if the site never appears in the data.
pub fn outcome_summary(dataset: &LaunchDataset, site: &SiteFilter) -> OutcomeSummary {
    match site {
        SiteFilter::All => {
            let groups = dataset
                .sites
                .iter()
                .map(|s| OutcomeGroup {
                    label: s.clone(),
                    count: dataset
                        .records
                        .iter()
                        .filter(|r| &r.launch_site == s && r.outcome.is_success())
                        .count(),
                })
                .collect();
            OutcomeSummary {
                title: "Total Success Launches by Site".to_string(),
                groups,
            }
        }
        SiteFilter::Site(name) => {
            let (mut success, mut failure) = (0usize, 0usize);
            for rec in dataset.records.iter().filter(|r| &r.launch_site == name) {
                match rec.outcome {
                    Outcome::Success => success += 1,
                    Outcome::Failure => failure += 1,
                }
            }
            let groups = if success + failure == 0 {
                Vec::new()
            } else {
                vec![
                    OutcomeGroup {
                        label: Outcome::Success.to_string(),
                        count: success,
                    },
                    OutcomeGroup {
                        label: Outcome::Failure.to_string(),
                        count: failure,
                    },
                ]
            };
            OutcomeSummary {
                title: format!("Success vs Failed Launches for {name}"),
                groups,
            }
        }
    }
}
