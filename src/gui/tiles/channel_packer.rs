//! Channel packer tile - assign grayscale images to R, G and B and save the packed PNG

use crate::channels::Channel;
use crate::gui::state::AppState;
use crate::image_io::SUPPORTED_EXTENSIONS;
use eframe::egui::Color32;
use eframe::egui::{self};

const THUMBNAIL_SIZE: f32 = 96.0;

/// Draw the channel packer tile UI
pub fn draw_channel_packer_tile(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        if ui.button("🗑 Clear All").clicked() {
            state.clear_packer();
        }
        ui.label("Drag & drop images onto a channel");
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("channel_packer_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                for channel in Channel::ALL {
                    draw_slot(ui, state, channel);
                }
            });

            ui.add_space(8.0);
            ui.label(state.packer.status_text());
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Output file:");
                ui.add(
                    egui::TextEdit::singleline(&mut state.packer.output_path)
                        .hint_text("packed.png")
                        .desired_width(260.0),
                );
                if ui.button("Browse…").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .set_title("Save packed image")
                        .add_filter("PNG", &["png"])
                        .set_file_name("packed.png")
                        .save_file()
                {
                    state.packer.output_path = path.display().to_string();
                }
            });

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let running = state.packer.running;
                ui.add_enabled_ui(!running, |ui| {
                    if ui.button("🎨 Pack Channels").clicked() {
                        state.start_pack();
                    }
                });
                if running {
                    ui.spinner();
                    ui.label("Packing...");
                }
            });

            if let Some(result) = &state.packer.last_result {
                ui.label(result);
            }
        });
}

fn draw_slot(ui: &mut egui::Ui, state: &mut AppState, channel: Channel) {
    let response = ui
        .group(|ui| {
            ui.set_width(THUMBNAIL_SIZE + 24.0);
            ui.vertical_centered(|ui| {
                ui.colored_label(channel_color(channel), format!("{channel} Channel"));

                let slot = state.packer.slot_mut(channel);
                match &slot.path {
                    Some(path) => {
                        ui.add(
                            egui::Image::new(format!("file://{}", path.display()))
                                .max_size(egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE))
                                .maintain_aspect_ratio(true),
                        );
                        let name = path
                            .file_name()
                            .map_or_else(|| path.display().to_string(), |n| {
                                n.to_string_lossy().into_owned()
                            });
                        ui.add(egui::Label::new(name).truncate())
                            .on_hover_text(path.display().to_string());
                    }
                    None => {
                        ui.allocate_ui(egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE), |ui| {
                            ui.centered_and_justified(|ui| {
                                ui.weak("No image");
                            });
                        });
                    }
                }

                ui.horizontal(|ui| {
                    if ui.small_button("Browse…").clicked()
                        && let Some(path) = rfd::FileDialog::new()
                            .set_title(format!("Select image for {channel} channel"))
                            .add_filter("Images", SUPPORTED_EXTENSIONS)
                            .pick_file()
                    {
                        slot.path = Some(path);
                    }
                    if ui.small_button("Clear").clicked() {
                        slot.path = None;
                    }
                });
            });
        })
        .response;

    if response.contains_pointer() {
        state.packer.hovered_slot = Some(channel);
    }
}

fn channel_color(channel: Channel) -> Color32 {
    match channel {
        Channel::Red => Color32::from_rgb(220, 80, 80),
        Channel::Green => Color32::from_rgb(80, 180, 80),
        Channel::Blue => Color32::from_rgb(90, 130, 230),
    }
}
