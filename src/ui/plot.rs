use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::data::filter::scatter_points;
use crate::data::model::{Outcome, SiteFilter};
use crate::data::summary::OutcomeSummary;
use crate::state::AppState;

const SUCCESS_COLOR: Color32 = Color32::from_rgb(99, 190, 123);
const FAILURE_COLOR: Color32 = Color32::from_rgb(229, 90, 90);

// ---------------------------------------------------------------------------
// Pie geometry
// ---------------------------------------------------------------------------

/// One pie slice in polar coordinates. Angles are radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Wedge {
    /// Outline of the slice on a circle of radius `r` around the origin.
    pub fn outline(&self, r: f64) -> Vec<[f64; 2]> {
        let steps = ((self.fraction * 128.0).ceil() as usize).max(2);
        let mut pts = Vec::with_capacity(steps + 2);
        if self.fraction < 1.0 {
            pts.push([0.0, 0.0]);
        }
        for i in 0..=steps {
            let a = self.start_angle + (self.end_angle - self.start_angle) * i as f64 / steps as f64;
            pts.push([r * a.cos(), r * a.sin()]);
        }
        pts
    }

    /// Point halfway along the slice at radius `r`, for its label.
    pub fn label_anchor(&self, r: f64) -> [f64; 2] {
        let mid = (self.start_angle + self.end_angle) / 2.0;
        [r * mid.cos(), r * mid.sin()]
    }
}

/// Lay out the non-empty groups of a summary as pie wedges.
pub fn pie_wedges(summary: &OutcomeSummary) -> Vec<Wedge> {
    let total = summary.total();
    if total == 0 {
        return Vec::new();
    }
    let mut angle = FRAC_PI_2;
    summary
        .groups
        .iter()
        .filter(|g| g.count > 0)
        .map(|g| {
            let fraction = g.count as f64 / total as f64;
            let start_angle = angle;
            angle -= fraction * TAU;
            Wedge {
                label: g.label.clone(),
                count: g.count,
                fraction,
                start_angle,
                end_angle: angle,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Outcome pie chart
// ---------------------------------------------------------------------------

/// Placeholder shown instead of a pie with nothing to draw.
pub fn empty_pie_message(site: &SiteFilter) -> &'static str {
    match site {
        SiteFilter::All => "No successful launches",
        SiteFilter::Site(_) => "No data for the selected site",
    }
}

pub fn outcome_pie(ui: &mut Ui, state: &AppState) {
    ui.heading(&state.pie.title);

    if state.pie.is_empty() || state.pie.total() == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(empty_pie_message(&state.site));
        });
        return;
    }

    let by_site = state.site == SiteFilter::All;
    if !by_site {
        if let Some(success) = state.pie.count_for(&Outcome::Success.to_string()) {
            ui.label(format!(
                "{success} of {} launches succeeded",
                state.pie.total()
            ));
        }
    }

    let wedges = pie_wedges(&state.pie);

    Plot::new("outcome_pie")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .include_x(-1.2)
        .include_x(1.2)
        .include_y(-1.2)
        .include_y(1.2)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for wedge in &wedges {
                let color = if by_site {
                    state.site_colors.color_for(&wedge.label)
                } else if wedge.label == Outcome::Success.to_string() {
                    SUCCESS_COLOR
                } else {
                    FAILURE_COLOR
                };

                let outline: PlotPoints = wedge.outline(1.0).into();
                plot_ui.polygon(
                    Polygon::new(outline)
                        .name(&wedge.label)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );

                let [x, y] = wedge.label_anchor(0.65);
                plot_ui.text(
                    Text::new(PlotPoint::new(x, y), format!("{:.1}%", wedge.fraction * 100.0))
                        .color(Color32::BLACK),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Payload vs. outcome scatter chart
// ---------------------------------------------------------------------------

pub fn payload_scatter(ui: &mut Ui, state: &AppState) {
    ui.heading("Correlation between Payload and Success");

    let points = scatter_points(&state.dataset, &state.visible_indices);

    // One series per booster category so the legend doubles as a colour key.
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &points {
        series
            .entry(p.booster_version_category.as_str())
            .or_default()
            .push([p.payload_mass_kg, p.outcome.as_class() as f64]);
    }

    Plot::new("payload_scatter")
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("Launch Outcome")
        .include_x(0.0)
        .include_x(state.slider.max)
        .include_y(-0.25)
        .include_y(1.25)
        .y_axis_formatter(|mark, _range| match mark.value {
            v if v == 0.0 => Outcome::Failure.to_string(),
            v if v == 1.0 => Outcome::Success.to_string(),
            _ => String::new(),
        })
        .label_formatter(|name, value| {
            let outcome = if value.y >= 0.5 {
                Outcome::Success
            } else {
                Outcome::Failure
            };
            if name.is_empty() {
                format!("{:.0} kg", value.x)
            } else {
                format!("{name}\n{:.0} kg, {outcome}", value.x)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, pts) in series {
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .name(category)
                        .color(state.booster_colors.color_for(category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::summary::OutcomeGroup;

    fn summary(counts: &[(&str, usize)]) -> OutcomeSummary {
        OutcomeSummary {
            title: String::new(),
            groups: counts
                .iter()
                .map(|(l, c)| OutcomeGroup {
                    label: l.to_string(),
                    count: *c,
                })
                .collect(),
        }
    }

    #[test]
    fn wedges_cover_the_full_circle() {
        let wedges = pie_wedges(&summary(&[("A", 2), ("B", 1), ("C", 1)]));
        assert_eq!(wedges.len(), 3);
        assert!((wedges[0].fraction - 0.5).abs() < 1e-12);
        assert!((wedges[0].start_angle - FRAC_PI_2).abs() < 1e-12);
        let swept = wedges[0].start_angle - wedges[2].end_angle;
        assert!((swept - TAU).abs() < 1e-9);
    }

    #[test]
    fn zero_count_groups_get_no_wedge() {
        let wedges = pie_wedges(&summary(&[("A", 2), ("B", 0)]));
        assert_eq!(wedges.len(), 1);
        assert_eq!(wedges[0].label, "A");
        assert_eq!(wedges[0].fraction, 1.0);
        // A whole disc has no centre vertex.
        assert_ne!(wedges[0].outline(1.0)[0], [0.0, 0.0]);
    }

    #[test]
    fn empty_summary_has_no_wedges() {
        assert!(pie_wedges(&summary(&[])).is_empty());
        assert!(pie_wedges(&summary(&[("A", 0)])).is_empty());
    }

    #[test]
    fn empty_pie_message_fits_the_selection() {
        assert_eq!(empty_pie_message(&SiteFilter::All), "No successful launches");
        assert_eq!(
            empty_pie_message(&SiteFilter::Site("KSC LC-39A".into())),
            "No data for the selected site"
        );
    }

    #[test]
    fn outline_stays_on_the_circle() {
        let wedges = pie_wedges(&summary(&[("Success", 1), ("Failed", 3)]));
        for p in wedges[1].outline(2.0).iter().skip(1) {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!((r - 2.0).abs() < 1e-9);
        }
    }
}
