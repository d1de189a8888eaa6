use std::sync::Arc;

use anyhow::Result;
use eframe::egui;

use app_inspector::bundles::BundleRegistry;
use app_inspector::config::Config;
use app_inspector::ui::AppInspectorApp;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load_or_default()?;
    log::info!("scanning {:?}", config.scan_dirs);
    let registry = Arc::new(BundleRegistry::from_config(&config));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "App Inspector",
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(AppInspectorApp::new(
                &config,
                registry.clone(),
                registry,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))?;
    Ok(())
}
