use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Filtered launches in file order, the rows behind the scatter chart.
pub fn launch_table(ui: &mut Ui, state: &AppState) {
    ui.strong(format!("Launches in selection ({})", state.visible_indices.len()));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in [
                "Flight",
                "Launch Site",
                "Payload Mass (kg)",
                "Outcome",
                "Booster Version",
                "Category",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let Some(rec) = state
                    .visible_indices
                    .get(row.index())
                    .and_then(|&i| state.dataset.records.get(i))
                else {
                    return;
                };

                row.col(|ui| {
                    ui.label(rec.flight_number.map(|n| n.to_string()).unwrap_or_default());
                });
                row.col(|ui| {
                    ui.label(&rec.launch_site);
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", rec.payload_mass_kg));
                });
                row.col(|ui| {
                    let text = RichText::new(rec.outcome.to_string());
                    ui.label(if rec.outcome.is_success() { text.strong() } else { text.weak() });
                });
                row.col(|ui| {
                    ui.label(rec.booster_version.as_deref().unwrap_or("-"));
                });
                row.col(|ui| {
                    ui.label(
                        RichText::new(&rec.booster_version_category)
                            .color(state.booster_colors.color_for(&rec.booster_version_category)),
                    );
                });
            });
        });
}
