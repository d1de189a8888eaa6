use eframe::egui;

use crate::store::LoadPhase;
use crate::style::{ERROR, MUTED};
use crate::types::StateColors;
use crate::ui::{AppInspectorApp, list, tasks};

use egui::Color32;

/// Render the left sidebar with the filtered app list.
pub fn show(ctx: &egui::Context, app: &AppInspectorApp) {
    let services = &app.services;
    egui::SidePanel::left("sidebar")
        .resizable(false)
        .exact_width(300.0)
        .show(ctx, |ui| {
            let snapshot = services.store.snapshot();
            ui.add_space(4.0);
            ui.label(egui::RichText::new("INSTALLED APPS").strong().size(16.0));
            ui.separator();

            if snapshot.phase == LoadPhase::Errored {
                if let Some(err) = &snapshot.last_error {
                    ui.colored_label(ERROR, err.as_str());
                }
                if ui.button("Retry").clicked() {
                    tasks::spawn_refresh_apps(services);
                }
                ui.separator();
            }

            if snapshot.is_loading() && snapshot.full_catalog.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            }

            if snapshot.filtered_view.is_empty() {
                ui.colored_label(MUTED, "No apps found");
                return;
            }

            let selected_id = services.detail.view().package_id().map(str::to_string);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for record in &snapshot.filtered_view {
                        let selected = selected_id.as_deref() == Some(record.package_id.as_str());
                        let resp = list::list_item(
                            ui,
                            &record.display_name,
                            &record.package_id,
                            record.is_system_package.then_some("system"),
                            selected,
                            StateColors {
                                default: Color32::from_rgb(247, 248, 250),
                                hover: Color32::WHITE,
                                selected: Some(Color32::from_rgb(58, 128, 246)),
                            },
                        );
                        if resp.clicked() && !selected {
                            {
                                let mut s = app.state.lock().unwrap();
                                s.show_all_permissions = false;
                                s.show_all_activities = false;
                            }
                            tasks::spawn_load_detail(services, &record.package_id);
                        }
                    }
                });
        });
}
