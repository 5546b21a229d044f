use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::data::model::{PayloadRange, SiteFilter};

/// SpaceX launch records dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "launch-dash", version, about)]
pub struct Cli {
    /// Launch table to load (.csv, .json or .parquet)
    #[arg(long, env = "LAUNCH_DASH_DATA", default_value = "spacex_launch_dash.csv")]
    pub data: PathBuf,

    /// Initially selected launch site, or ALL
    #[arg(long, default_value = SiteFilter::ALL_VALUE)]
    pub site: String,

    /// Lower payload bound in kg (defaults to the observed minimum)
    #[arg(long)]
    pub payload_min: Option<f64>,

    /// Upper payload bound in kg (defaults to the observed maximum)
    #[arg(long)]
    pub payload_max: Option<f64>,

    /// Upper end of the payload slider in kg
    #[arg(long, default_value_t = 10_000.0, value_parser = parse_slider_max)]
    pub slider_max: f64,

    /// Payload slider step in kg
    #[arg(long, default_value_t = 1_000.0, value_parser = parse_step)]
    pub slider_step: f64,

    /// Print the selected view as JSON and exit instead of opening a window
    #[arg(long)]
    pub report: bool,
}

fn parse_step(s: &str) -> Result<f64, String> {
    let step: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(format!("slider step must be positive, got {s}"))
    }
}

fn parse_slider_max(s: &str) -> Result<f64, String> {
    let max: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if max.is_finite() && max > 0.0 {
        Ok(max)
    } else {
        Err(format!("slider max must be a positive number, got {s}"))
    }
}

impl Cli {
    /// Parse the process arguments, exiting with a usage error on bad input.
    pub fn parse_validated() -> Self {
        let cli = Self::parse();
        if let Err(e) = cli.validate() {
            e.exit();
        }
        cli
    }

    /// Like [`Cli::try_parse_from`], plus the cross-flag checks.
    pub fn try_parse_validated_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Self::try_parse_from(args)?;
        cli.validate()?;
        Ok(cli)
    }

    /// Reject slider layouts with more than [`MAX_SLIDER_MARKS`] ticks.
    pub fn validate(&self) -> Result<(), clap::Error> {
        let ticks = self.slider_max / self.slider_step;
        if ticks > MAX_SLIDER_MARKS as f64 {
            return Err(Self::command().error(
                ErrorKind::ValueValidation,
                format!(
                    "--slider-max / --slider-step gives {ticks:.0} ticks, at most {MAX_SLIDER_MARKS} allowed"
                ),
            ));
        }
        Ok(())
    }

    pub fn site_filter(&self) -> SiteFilter {
        SiteFilter::parse(&self.site)
    }

    /// Starting payload range: explicit bounds win over the observed ones.
    pub fn payload_range(&self, observed: PayloadRange) -> PayloadRange {
        PayloadRange::new(
            self.payload_min.unwrap_or(observed.low),
            self.payload_max.unwrap_or(observed.high),
        )
    }

    pub fn slider(&self) -> SliderConfig {
        SliderConfig {
            max: self.slider_max,
            step: self.slider_step,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload slider bounds
// ---------------------------------------------------------------------------

/// Upper bound on slider ticks, `max / step`.
pub const MAX_SLIDER_MARKS: usize = 1000;

/// Range slider layout. The lower end is always 0 kg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub max: f64,
    pub step: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        SliderConfig {
            max: 10_000.0,
            step: 1_000.0,
        }
    }
}

impl SliderConfig {
    /// Widen the upper end to the next step above `observed_max` if needed.
    /// The step grows too when the widened slider would exceed [`MAX_SLIDER_MARKS`].
    pub fn fitted_to(self, observed_max: f64) -> Self {
        if observed_max.is_nan() || observed_max <= self.max {
            return self;
        }
        let mut step = self.step;
        if observed_max / step > MAX_SLIDER_MARKS as f64 {
            step = (observed_max / MAX_SLIDER_MARKS as f64).ceil();
        }
        SliderConfig {
            max: (observed_max / step).ceil() * step,
            step,
        }
    }

    /// Tick marks every `step`, labelled like `3000 Kg`.
    pub fn marks(&self) -> Vec<(f64, String)> {
        let n = ((self.max / self.step).floor() as usize).min(MAX_SLIDER_MARKS);
        (0..=n)
            .map(|i| {
                let kg = i as f64 * self.step;
                (kg, format!("{kg:.0} Kg"))
            })
            .collect()
    }
}
