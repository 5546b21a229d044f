use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{PayloadRange, SiteFilter};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left panel: site dropdown, payload range slider, legend.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Launch Site");
    ui.separator();

    site_dropdown(ui, state);
    ui.add_space(12.0);

    ui.heading("Payload range (Kg):");
    ui.separator();
    payload_slider(ui, state);
    ui.add_space(8.0);

    if ui.button("Reset selection").clicked() {
        state.reset_selection();
    }
    ui.add_space(12.0);

    ui.heading("Booster Version Category");
    ui.separator();
    ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for (category, color) in state.booster_colors.legend_entries() {
                ui.label(RichText::new(format!("● {category}")).color(color));
            }
        });
}

fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    ui.add(
        egui::TextEdit::singleline(&mut state.site_query)
            .hint_text("Select a Launch Site"),
    );

    let sites = state.matching_sites();
    let mut selected = state.site.clone();

    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(selected.label().to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut selected, SiteFilter::All, SiteFilter::All.label());
            for site in sites {
                let label = site.clone();
                ui.selectable_value(&mut selected, SiteFilter::Site(site), label);
            }
        });

    state.select_site(selected);
}

fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    let slider = state.slider;
    let PayloadRange { mut low, mut high } = state.payload_range;

    // Snap to the step only while the user drags; data-derived bounds stay exact.
    ui.add(
        egui::Slider::new(&mut low, 0.0..=slider.max)
            .step_by(slider.step)
            .clamping(egui::SliderClamping::Edits)
            .text("min"),
    );
    ui.add(
        egui::Slider::new(&mut high, 0.0..=slider.max)
            .step_by(slider.step)
            .clamping(egui::SliderClamping::Edits)
            .text("max"),
    );

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (_, label) in &state.slider_marks {
            ui.small(label.as_str());
        }
    });

    if low > high {
        ui.label(RichText::new("Lower bound exceeds upper bound: nothing selected.").color(Color32::YELLOW));
    }

    state.set_payload_range(PayloadRange::new(low, high));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export view…").clicked() {
                export_view_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("SpaceX Launch Records Dashboard");
        ui.separator();

        ui.label(format!(
            "{} launches loaded from {}, {} in payload range",
            state.dataset.len(),
            state.source_path.display(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} launches from {} sites",
                    dataset.len(),
                    dataset.sites.len()
                );
                state.set_dataset(dataset, &path);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn export_view_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export current view")
        .set_file_name("launch_view.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.view().write_json(&path) {
            Ok(()) => {
                log::info!("Exported view to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::warn!("Export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SliderConfig;
    use crate::data::model::tests::record;
    use crate::data::model::LaunchDataset;
    use std::path::Path;

    fn run_frame(state: &mut AppState) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| side_panel(ui, state));
        });
    }

    #[test]
    fn rendering_keeps_off_step_payload_range() {
        let ds = LaunchDataset::from_records(vec![
            record("A", 362.0, true, "v1.1"),
            record("A", 2600.0, false, "FT"),
            record("B", 9600.0, true, "FT"),
        ]);
        let mut state = AppState::new(ds, Path::new("launches.csv"), SliderConfig::default());
        state.set_payload_range(PayloadRange::new(2500.0, 9600.0));
        assert_eq!(state.visible_indices, vec![1, 2]);

        run_frame(&mut state);

        assert_eq!(state.payload_range, PayloadRange::new(2500.0, 9600.0));
        assert_eq!(state.visible_indices, vec![1, 2]);
    }

    #[test]
    fn rendering_keeps_observed_bounds_after_load() {
        let ds = LaunchDataset::from_records(vec![
            record("A", 362.0, true, "v1.1"),
            record("B", 9600.0, false, "FT"),
        ]);
        let mut state = AppState::new(ds, Path::new("launches.csv"), SliderConfig::default());

        run_frame(&mut state);

        assert_eq!(state.payload_range, PayloadRange::new(362.0, 9600.0));
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
