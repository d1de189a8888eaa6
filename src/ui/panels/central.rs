use crate::format::{format_file_size, format_timestamp, short_name};
use crate::store::DetailView;
use crate::style::{ERROR, MUTED};
use crate::types::AppDetailRecord;
use crate::ui::{AppInspectorApp, tasks};
use eframe::egui;

/// Lists longer than this are collapsed until expanded.
const COLLAPSE_OVER: usize = 10;
const COLLAPSED_ROWS: usize = 9;

/// Render the central panel with the selected app's details.
pub fn show(ctx: &egui::Context, app: &AppInspectorApp) {
    egui::CentralPanel::default().show(ctx, |ui| match app.services.detail.view() {
        DetailView::Empty => {
            ui.centered_and_justified(|ui| {
                ui.label("Select an application from the left to see details.");
            });
        }
        DetailView::Loading(_) => {
            ui.centered_and_justified(|ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading app details...");
                });
            });
        }
        DetailView::Missing(id) => {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.colored_label(ERROR, "Failed to load app details");
                ui.label(egui::RichText::new(&id).monospace());
                if ui.button("Retry").clicked() {
                    tasks::spawn_load_detail(&app.services, &id);
                }
            });
        }
        DetailView::Ready(detail) => {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| details(ui, app, &detail));
        }
    });
}

fn details(ui: &mut egui::Ui, app: &AppInspectorApp, d: &AppDetailRecord) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(egui::RichText::new(&d.app.display_name).strong().size(20.0));
            ui.colored_label(MUTED, d.app.package_id.as_str());
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
            if ui.button("✕ Close").clicked() {
                tasks::close_detail(app);
            }
            if ui.button("▶ Launch").clicked() {
                tasks::spawn_launch(&app.services, &d.app.package_id);
            }
        });
    });
    ui.add_space(8.0);
    ui.separator();

    section(ui, "Basic Information", |ui| {
        row(ui, "Package Name", &d.app.package_id);
        row(ui, "Version", &d.app.version_name);
        row(ui, "Version Code", &d.app.version_code.to_string());
        row(ui, "System App", if d.app.is_system_package { "Yes" } else { "No" });
    });

    section(ui, "File Information", |ui| {
        row(ui, "Package Path", &d.app.file_path.display().to_string());
        row(ui, "File Size", &format_file_size(d.file_size_bytes));
        match &d.app.icon {
            Some(icon) => row(ui, "Icon", &icon.path().display().to_string()),
            None => row(ui, "Icon", "None"),
        }
        ui.label("SHA-256 Checksum");
        ui.horizontal(|ui| {
            let text = d.checksum.to_string();
            if d.checksum.is_available() {
                ui.label(egui::RichText::new(&text).monospace());
                if ui.small_button("Copy").clicked() {
                    ui.ctx().copy_text(text);
                }
            } else {
                ui.colored_label(ERROR, text);
            }
        });
        ui.end_row();
    });

    section(ui, "Install Information", |ui| {
        row(ui, "Install Date", &format_timestamp(d.app.installed_at));
        row(ui, "Update Date", &format_timestamp(d.app.updated_at));
    });

    let mut s = app.state.lock().unwrap();
    name_list(ui, "Activities", "activities", &d.activities, &mut s.show_all_activities);
    name_list(ui, "Permissions", "permissions", &d.permissions, &mut s.show_all_permissions);
}

fn section(ui: &mut egui::Ui, title: &str, add_rows: impl FnOnce(&mut egui::Ui)) {
    ui.add_space(12.0);
    ui.label(egui::RichText::new(title).strong().size(16.0));
    ui.add_space(4.0);
    egui::Grid::new(title)
        .num_columns(2)
        .striped(true)
        .spacing([24.0, 6.0])
        .show(ui, add_rows);
}

fn row(ui: &mut egui::Ui, key: &str, value: &str) {
    ui.label(key);
    ui.label(value);
    ui.end_row();
}

fn name_list(ui: &mut egui::Ui, title: &str, noun: &str, names: &[String], show_all: &mut bool) {
    if names.is_empty() {
        return;
    }
    ui.add_space(12.0);
    ui.label(egui::RichText::new(format!("{} ({})", title, names.len())).strong().size(16.0));
    ui.add_space(4.0);

    let collapsible = names.len() > COLLAPSE_OVER;
    let shown = if collapsible && !*show_all { COLLAPSED_ROWS } else { names.len() };
    for name in &names[..shown] {
        ui.label(format!("• {}", short_name(name))).on_hover_text(name.as_str());
    }
    if collapsible {
        let toggle = if *show_all {
            "Show less".to_string()
        } else {
            format!("Show all {} {}", names.len(), noun)
        };
        if ui.link(toggle).clicked() {
            *show_all = !*show_all;
        }
    }
}
