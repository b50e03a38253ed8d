use anyhow::anyhow;
use beamview::{app::ConsoleApp, logging, settings::Settings};

fn main() -> anyhow::Result<()> {
    let settings_path = Settings::default_path();
    let settings = match Settings::load(&settings_path.to_string_lossy()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to read settings, using defaults: {err:#}");
            Settings::default()
        }
    };
    logging::init(settings.debug_logging);

    let app = ConsoleApp::new(settings)?;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([720.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native("beamview", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|err| anyhow!("window loop failed: {err}"))
}
