//! Split preview tile - the source image with the grid drawn over it

use crate::gui::state::AppState;
use crate::gui::tiles::pan_zoom::draw_pan_zoom_image;
use eframe::egui::TextureOptions;
use eframe::egui::{self};

/// Draw the split preview tile UI
pub fn draw_split_preview_tile(ui: &mut egui::Ui, state: &mut AppState) {
    let splitter = &mut state.splitter;

    if splitter.source.is_none() {
        if splitter.source_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading image...");
            });
        } else {
            ui.centered_and_justified(|ui| {
                ui.label("Select an image to preview the grid");
            });
        }
        return;
    }

    // Redraw the overlay when the grid or line width changed
    if let Some(annotated) = splitter.take_stale_preview() {
        let size = [annotated.width() as usize, annotated.height() as usize];
        let color_image =
            egui::ColorImage::from_rgba_unmultiplied(size, annotated.as_flat_samples().as_slice());
        match &mut splitter.preview_texture {
            Some(texture) => texture.set(color_image, TextureOptions::default()),
            None => {
                splitter.preview_texture = Some(ui.ctx().load_texture(
                    "split_preview",
                    color_image,
                    TextureOptions::default(),
                ));
            }
        }
    }

    if splitter.grid().is_err() {
        ui.colored_label(
            ui.visuals().error_fg_color,
            "Rows and columns must be at least 1",
        );
    }

    if let Some(texture) = &splitter.preview_texture {
        draw_pan_zoom_image(ui, texture, &mut splitter.pan_zoom);
    }
}
