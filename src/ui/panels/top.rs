use eframe::egui;

use crate::ui::{AppInspectorApp, tasks};

/// Render the header: title, search field, system toggle and refresh.
pub fn show(ctx: &egui::Context, app: &AppInspectorApp) {
    let services = &app.services;
    let snapshot = services.store.snapshot();

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading(format!("🔎 App Inspector v{}", env!("CARGO_PKG_VERSION")));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // a click while scanning starts a new scan; the older one is discarded
                if ui.button("Refresh").clicked() {
                    tasks::spawn_refresh_apps(services);
                }
                if snapshot.is_loading() {
                    ui.spinner();
                }
            });
        });
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let mut s = app.state.lock().unwrap();
            let search = ui.add(
                egui::TextEdit::singleline(&mut s.query)
                    .hint_text("Search apps")
                    .desired_width(280.0),
            );
            if search.changed() {
                services.store.set_query(&s.query);
            }
            drop(s);

            let mut include = snapshot.include_system_packages;
            if ui.checkbox(&mut include, "Show system apps").changed() {
                services.store.set_include_system_packages(include);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{} apps", services.store.snapshot().filtered_view.len()));
            });
        });
        ui.add_space(6.0);
    });
}
