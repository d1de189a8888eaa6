//! Light theme for the inspector window.

use eframe::{egui, epaint};

pub const ACCENT: epaint::Color32 = epaint::Color32::from_rgb(0, 122, 255);
pub const ERROR: epaint::Color32 = epaint::Color32::from_rgb(200, 70, 70);
pub const MUTED: epaint::Color32 = epaint::Color32::from_rgb(110, 110, 115);

/// Apply the inspector's light theme to the current egui Context.
pub fn set_inspector_style(ctx: &egui::Context) {
    use egui::{FontId, TextStyle, Visuals};

    let mut visuals = Visuals::light();
    visuals.window_fill = epaint::Color32::from_rgb(242, 242, 247);
    visuals.panel_fill = epaint::Color32::from_rgb(255, 255, 255);
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.fg_stroke = epaint::Stroke::new(1.0, epaint::Color32::WHITE);
    visuals.widgets.hovered.bg_fill = epaint::Color32::from_rgb(245, 245, 247);
    visuals.selection.bg_fill = ACCENT;
    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style
        .text_styles
        .insert(TextStyle::Monospace, FontId::monospace(12.0));
    ctx.set_style(style);
}
