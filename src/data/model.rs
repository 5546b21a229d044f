use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Outcome – the `class` column
// ---------------------------------------------------------------------------

/// Launch outcome as recorded in the `class` column (`1` success, `0` failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Decode the numeric `class` value. Anything other than 0/1 is rejected.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    /// Numeric value used on the scatter chart's y axis.
    pub fn as_class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Failure => write!(f, "Failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub flight_number: Option<u32>,
    pub launch_site: String,
    /// Always finite and non-negative; the loader rejects anything else.
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version: Option<String>,
    pub booster_version_category: String,
}

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

/// Dropdown value: every site, or one exact site name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteFilter {
    #[default]
    All,
    Site(String),
}

impl SiteFilter {
    /// Value of the "all sites" dropdown entry.
    pub const ALL_VALUE: &'static str = "ALL";

    /// Parse a dropdown / command-line value. `ALL` (any case) selects every site.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case(Self::ALL_VALUE) {
            SiteFilter::All
        } else {
            SiteFilter::Site(value.to_string())
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteFilter::All => true,
            SiteFilter::Site(s) => s == site,
        }
    }

    /// Label shown in the dropdown.
    pub fn label(&self) -> &str {
        match self {
            SiteFilter::All => "All Sites",
            SiteFilter::Site(s) => s,
        }
    }
}

impl fmt::Display for SiteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteFilter::All => write!(f, "{}", Self::ALL_VALUE),
            SiteFilter::Site(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// PayloadRange – inclusive kilogram interval
// ---------------------------------------------------------------------------

/// Inclusive payload interval `[low, high]` in kilograms.
///
/// `low > high` is allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        PayloadRange { low, high }
    }

    pub fn contains(&self, payload_kg: f64) -> bool {
        self.low <= payload_kg && payload_kg <= self.high
    }

    /// True when `low > high` or either bound is NaN.
    pub fn is_empty(&self) -> bool {
        !matches!(
            self.low.partial_cmp(&self.high),
            Some(Ordering::Less | Ordering::Equal)
        )
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category indices.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    /// All launches, in file order.
    pub records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    pub sites: Vec<String>,
    /// Sorted distinct booster version categories.
    pub booster_categories: BTreeSet<String>,
    /// Observed `[min, max]` payload, `None` only for an empty table.
    pub payload_bounds: Option<PayloadRange>,
}

impl LaunchDataset {
    /// Build category indices and payload bounds from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories = BTreeSet::new();
        let mut payload_bounds: Option<PayloadRange> = None;

        for rec in &records {
            if !sites.iter().any(|s| s == &rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            booster_categories.insert(rec.booster_version_category.clone());

            let kg = rec.payload_mass_kg;
            payload_bounds = Some(match payload_bounds {
                None => PayloadRange::new(kg, kg),
                Some(b) => PayloadRange::new(b.low.min(kg), b.high.max(kg)),
            });
        }

        LaunchDataset {
            records,
            sites,
            booster_categories,
            payload_bounds,
        }
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed payload range, or `[0, 0]` for an empty table.
    pub fn full_range(&self) -> PayloadRange {
        self.payload_bounds.unwrap_or(PayloadRange::new(0.0, 0.0))
    }
}
