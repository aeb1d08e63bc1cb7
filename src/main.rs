use energy_dashboard::dashboard::store::DashboardStore;
use energy_dashboard::gui::DashboardApp;
use energy_dashboard::logging;
use energy_dashboard::settings::Settings;

use eframe::egui;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging);

    let store = DashboardStore::load(settings.storage());
    let (width, height) = settings.window_size.unwrap_or((1440.0, 900.0));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    tracing::info!("starting dashboard");
    eframe::run_native(
        "Energy Dashboard",
        native_options,
        Box::new(move |_cc| Box::new(DashboardApp::new(store, &settings, SETTINGS_FILE))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
