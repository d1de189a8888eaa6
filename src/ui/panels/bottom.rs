use crate::ui::AppInspectorApp;
use eframe::egui;
use eframe::epaint::Color32;

/// Render the bottom status bar.
pub fn show(ctx: &egui::Context, app: &AppInspectorApp) {
    egui::TopBottomPanel::bottom("bottom_status")
        .resizable(false)
        .show(ctx, |ui| {
            let snapshot = app.services.store.snapshot();
            let (message, running) = {
                let s = app.state.lock().unwrap();
                let msg = if s.task_running {
                    s.current_message.clone()
                } else {
                    s.last_status().unwrap_or_default().to_string()
                };
                (msg, s.task_running)
            };

            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "Applications: {}  •  Visible: {}  •  System: {}",
                        snapshot.full_catalog.len(),
                        snapshot.filtered_view.len(),
                        snapshot.system_count(),
                    ))
                    .color(Color32::BLACK)
                    .monospace(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(message);
                    if running {
                        ui.spinner();
                    }
                });
            });
        });
}
