//! imgtools GUI using egui_tiles for layout management

mod behavior;
mod state;
mod tiles;

use behavior::ImgToolsBehavior;
use behavior::ImgToolsPane;
use behavior::create_default_tree;
use state::AppState;
use state::DropTarget;

use crate::image_io;
use eframe::egui::Align2;
use eframe::egui::Color32;
use eframe::egui::Id;
use eframe::egui::LayerId;
use eframe::egui::Order;
use eframe::egui::TextStyle;
use eframe::egui::{self};
use egui_toast::Toast;
use egui_toast::ToastKind;
use egui_toast::ToastOptions;
use egui_toast::ToastStyle;
use egui_toast::Toasts;
use eyre::eyre;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Run the GUI. This is async so the caller can create a runtime; the function will
/// block in place on the eframe app using `tokio::task::block_in_place`.
pub async fn run_gui() -> eyre::Result<()> {
    info!("Starting imgtools GUI");
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Image Utilities")
            .with_inner_size([1200.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let res = tokio::task::block_in_place(move || {
        eframe::run_native(
            "Image Utilities",
            native_options,
            Box::new(|cc| Ok(Box::new(ImgToolsApp::new(cc)))),
        )
        .map_err(|e| eyre!("Failed to run eframe: {}", e))
    });

    res?;
    info!("GUI exited");
    Ok(())
}

struct ImgToolsApp {
    tree: egui_tiles::Tree<ImgToolsPane>,
    state: AppState,
    toasts: Toasts,
}

impl ImgToolsApp {
    fn new(cc: &eframe::CreationContext) -> Self {
        // Thumbnails in the packer are shown through file:// URIs
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let toasts = Toasts::new()
            .anchor(Align2::RIGHT_BOTTOM, (-10.0, -10.0))
            .direction(egui::Direction::BottomUp);

        ImgToolsApp {
            tree: create_default_tree(),
            state: AppState::default(),
            toasts,
        }
    }
}

impl eframe::App for ImgToolsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_background_tasks();
        if self.state.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // Top menu bar
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button("About").clicked() {
                    self.state.about_open = !self.state.about_open;
                }

                egui::widgets::global_theme_preference_switch(ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Main tile panel
        self.state.hovered_pane = None;
        self.state.packer.hovered_slot = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut behavior = ImgToolsBehavior {
                state: &mut self.state,
            };
            self.tree.ui(&mut behavior, ui);
        });

        // About window
        if self.state.about_open {
            egui::Window::new("About")
                .resizable(false)
                .collapsible(false)
                .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                .open(&mut self.state.about_open)
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Image Utilities");
                        ui.add_space(10.0);
                        ui.label(format!("Version: {}", env!("CARGO_PKG_VERSION")));
                        ui.label(format!(
                            "Revision: {}",
                            option_env!("GIT_REVISION").unwrap_or("unknown")
                        ));
                        ui.add_space(10.0);
                        ui.label("Split images into grids and pack grayscale images into RGB channels.");
                    });
                });
        }

        // Blocking error dialog
        if let Some(dialog) = self.state.error_dialog.clone() {
            let modal = egui::Modal::new(Id::new("error_dialog")).show(ctx, |ui| {
                ui.set_max_width(420.0);
                ui.heading(&dialog.title);
                ui.separator();
                ui.label(&dialog.message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.state.error_dialog = None;
                    }
                });
            });
            if modal.should_close() {
                self.state.error_dialog = None;
            }
        }

        // Success toasts
        for text in self.state.notifications.drain(..) {
            self.toasts.add(Toast {
                kind: ToastKind::Success,
                text: text.into(),
                options: ToastOptions::default()
                    .duration_in_seconds(5.0)
                    .show_progress(true),
                style: ToastStyle::default(),
            });
        }
        self.toasts.show(ctx);

        // Global hover preview for files being dragged over the app
        let hovered_files = ctx.input(|i| i.raw.hovered_files.clone());
        if !hovered_files.is_empty() {
            let mut text = match self.state.hovered_pane {
                Some(DropTarget::Packer) => "Drop to assign channels:\n".to_owned(),
                _ => "Drop to open in the splitter:\n".to_owned(),
            };
            for file in &hovered_files {
                if let Some(path) = &file.path {
                    text.push_str(&format!("\n{}", path.display()));
                } else if !file.mime.is_empty() {
                    text.push_str(&format!("\n{}", file.mime));
                } else {
                    text.push_str("\n???");
                }
            }

            let painter =
                ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
            let content_rect = ctx.content_rect();
            painter.rect_filled(content_rect, 0.0, Color32::from_black_alpha(192));
            painter.text(
                content_rect.center(),
                Align2::CENTER_CENTER,
                text,
                TextStyle::Heading.resolve(&ctx.style()),
                Color32::WHITE,
            );
        }

        // Dropped files go to the pane under the pointer
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        let dropped: Vec<PathBuf> = dropped_files
            .into_iter()
            .filter_map(|file| file.path)
            .map(|path| dunce::canonicalize(&path).unwrap_or(path))
            .collect();
        if !dropped.is_empty() {
            self.handle_dropped(dropped);
        }
    }
}

impl ImgToolsApp {
    fn handle_dropped(&mut self, paths: Vec<PathBuf>) {
        info!("Dropped {} file(s)", paths.len());
        match self.state.hovered_pane {
            Some(DropTarget::Packer) => {
                if self.state.packer.assign_dropped(&paths) == 0 {
                    self.state.show_error(
                        "Unsupported format",
                        "None of the dropped files is a supported image.",
                    );
                }
            }
            Some(DropTarget::Splitter) | None => {
                match paths.into_iter().find(|p| image_io::is_supported_image(p)) {
                    Some(path) => self.state.select_source(path),
                    None => self.state.show_error(
                        "Unsupported format",
                        "None of the dropped files is a supported image.",
                    ),
                }
            }
        }
    }
}
