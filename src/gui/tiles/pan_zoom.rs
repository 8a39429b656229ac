//! Pan and zoom for the split preview

use eframe::egui::Color32;
use eframe::egui::Pos2;
use eframe::egui::Rect;
use eframe::egui::TextureHandle;
use eframe::egui::Vec2;
use eframe::egui::{self};

/// State for pan and zoom on an image preview
#[derive(Clone, Debug, Default)]
pub struct PanZoomState {
    /// Zoom factor (1.0 = 100%)
    pub zoom: f32,
    /// Offset in screen pixels
    pub offset: Vec2,
    /// Whether the zoom has been fitted to the available space
    initialized: bool,
}

impl PanZoomState {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
            initialized: false,
        }
    }

    /// Refit the image on the next draw
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.offset = Vec2::ZERO;
        self.initialized = false;
    }

    /// Zoom by `factor` while keeping the point `anchor` (relative to the view centre) fixed
    fn zoom_about(&mut self, factor: f32, anchor: Vec2) {
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * factor).clamp(0.1, 10.0);
        let scale_change = self.zoom / old_zoom;
        self.offset = self.offset * scale_change + anchor * (1.0 - scale_change);
    }
}

/// Draw a texture with pan and zoom support
pub fn draw_pan_zoom_image(ui: &mut egui::Ui, texture: &TextureHandle, state: &mut PanZoomState) {
    let available = ui.available_size();
    let tex_size = texture.size_vec2();

    // Start at fit or 100%, whichever is smaller
    if !state.initialized && tex_size.x > 0.0 && tex_size.y > 0.0 {
        let fit_scale = (available.x / tex_size.x).min(available.y / tex_size.y);
        state.zoom = fit_scale.min(1.0);
        state.offset = Vec2::ZERO;
        state.initialized = true;
    }

    let (rect, response) = ui.allocate_exact_size(available, egui::Sense::click_and_drag());

    if response.dragged() {
        state.offset += response.drag_delta();
    }

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            let anchor = response
                .hover_pos()
                .map_or(Vec2::ZERO, |pos| pos - rect.center());
            state.zoom_about(1.0 + scroll * 0.001, anchor);
        }
    }

    if response.double_clicked() || response.secondary_clicked() {
        state.reset();
    }

    let image_rect = Rect::from_center_size(rect.center() + state.offset, tex_size * state.zoom);
    let painter = ui.painter().with_clip_rect(rect);
    painter.image(
        texture.id(),
        image_rect,
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );
    painter.rect_stroke(
        rect,
        0.0,
        egui::Stroke::new(1.0, Color32::from_gray(60)),
        egui::epaint::StrokeKind::Inside,
    );

    if response.hovered() {
        let zoom_percent = (state.zoom * 100.0).round();
        response.on_hover_text(format!(
            "{zoom_percent}% - Scroll to zoom, drag to pan, double-click to reset"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut state = PanZoomState::new();
        state.zoom_about(1000.0, Vec2::ZERO);
        assert!((state.zoom - 10.0).abs() < f32::EPSILON);
        state.zoom_about(0.0001, Vec2::ZERO);
        assert!((state.zoom - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn zooming_about_centre_keeps_offset() {
        let mut state = PanZoomState::new();
        state.zoom_about(2.0, Vec2::ZERO);
        assert_eq!(state.offset, Vec2::ZERO);

        state.reset();
        assert!((state.zoom - 1.0).abs() < f32::EPSILON);
    }
}
