mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use eframe::egui;

use app::LaunchDashApp;
use config::Cli;
use report::DashboardView;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse_validated();

    // A missing or malformed launch table is fatal.
    let dataset = data::loader::load_file(&cli.data)
        .with_context(|| format!("loading launch records from {}", cli.data.display()))?;
    log::info!(
        "Loaded {} launches from {} sites ({} booster categories)",
        dataset.len(),
        dataset.sites.len(),
        dataset.booster_categories.len()
    );

    let site = cli.site_filter();
    let range = cli.payload_range(dataset.full_range());

    if cli.report {
        let view = DashboardView::compute(&dataset, &site, range);
        println!("{}", view.to_json()?);
        return Ok(());
    }

    let mut state = AppState::new(dataset, &cli.data, cli.slider());
    state.select_site(site);
    state.set_payload_range(range);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
