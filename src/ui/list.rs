use crate::types::StateColors;
use eframe::emath::{Align2, Vec2};
use eframe::epaint::{Color32, FontId, StrokeKind};
use egui::{Response, Sense, Ui};

pub const ROW_HEIGHT: f32 = 38.0;

/// Two-line selectable row: name on top, package id below, optional badge on the right.
pub fn list_item(
    ui: &mut Ui,
    title: &str,
    subtitle: &str,
    badge: Option<&str>,
    selected: bool,
    colors: StateColors,
) -> Response {
    let size = Vec2::new(ui.available_width(), ROW_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let mut visuals = ui.style().interact_selectable(&response, selected);

        visuals.bg_fill = if selected {
            colors.selected.unwrap_or(visuals.bg_fill)
        } else if response.hovered() {
            colors.hover
        } else {
            colors.default
        };

        let border_radius = 2.0;
        let painter = ui.painter();
        painter.rect_filled(rect, border_radius, visuals.bg_fill);
        painter.rect_stroke(rect, border_radius, visuals.bg_stroke, StrokeKind::Middle);

        let text_color = if selected { Color32::WHITE } else { visuals.text_color() };
        painter.text(
            rect.left_top() + Vec2::new(10.0, 4.0),
            Align2::LEFT_TOP,
            title,
            FontId::proportional(14.0),
            text_color,
        );
        painter.text(
            rect.left_bottom() + Vec2::new(10.0, -4.0),
            Align2::LEFT_BOTTOM,
            subtitle,
            FontId::monospace(10.0),
            text_color.gamma_multiply(0.7),
        );
        if let Some(badge) = badge {
            painter.text(
                rect.right_center() - Vec2::new(10.0, 0.0),
                Align2::RIGHT_CENTER,
                badge,
                FontId::proportional(11.0),
                text_color.gamma_multiply(0.8),
            );
        }
    }

    response
}
