//! Splitter tile - pick a source image, choose the grid and write the pieces

use crate::gui::state::AppState;
use crate::image_io::SUPPORTED_EXTENSIONS;
use eframe::egui::{self};

/// Draw the splitter tile UI
pub fn draw_splitter_tile(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        if ui.button("📂 Select Image…").clicked()
            && let Some(path) = rfd::FileDialog::new()
                .set_title("Select an image to split")
                .add_filter("Images", SUPPORTED_EXTENSIONS)
                .pick_file()
        {
            state.select_source(path);
        }
        if ui.button("🗑 Clear All").clicked() {
            state.clear_splitter();
        }
    });

    let splitter = &mut state.splitter;
    match (&splitter.source_path, &splitter.source) {
        (None, _) => {
            ui.label("(no image - select one or drag it onto the window)");
        }
        (Some(path), None) => {
            ui.horizontal(|ui| {
                if splitter.source_loading {
                    ui.spinner();
                }
                ui.add(
                    egui::Label::new(path.display().to_string())
                        .wrap_mode(egui::TextWrapMode::Truncate),
                );
            });
        }
        (Some(path), Some(source)) => {
            ui.add(
                egui::Label::new(path.display().to_string())
                    .wrap_mode(egui::TextWrapMode::Truncate),
            )
            .on_hover_text(path.display().to_string());
            ui.label(format!(
                "{} × {} px",
                source.image.width(),
                source.image.height()
            ));
        }
    }

    ui.separator();

    egui::Grid::new("splitter_settings")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Rows:");
            ui.add(egui::DragValue::new(&mut splitter.rows).range(0..=256));
            ui.end_row();

            ui.label("Columns:");
            ui.add(egui::DragValue::new(&mut splitter.cols).range(0..=256));
            ui.end_row();

            ui.label("Preview lines:");
            ui.add(egui::Slider::new(&mut splitter.line_width, 1..=10).suffix(" px"));
            ui.end_row();

            ui.label("Output folder:");
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut splitter.output_dir)
                        .hint_text("Select output folder")
                        .desired_width(220.0),
                );
                if ui.button("Browse…").clicked()
                    && let Some(dir) = rfd::FileDialog::new()
                        .set_title("Select output folder")
                        .pick_folder()
                {
                    splitter.output_dir = dir.display().to_string();
                }
            });
            ui.end_row();

            ui.label("Base name:");
            let hint = splitter
                .source_path
                .as_deref()
                .map(crate::split::default_base_name)
                .unwrap_or_else(|| "image".to_string());
            ui.add(
                egui::TextEdit::singleline(&mut splitter.base_name)
                    .hint_text(hint)
                    .desired_width(220.0),
            );
            ui.end_row();
        });

    ui.add_space(4.0);
    match splitter.grid() {
        Ok(grid) => {
            ui.label(format!(
                "This will create {} images ({} rows × {} columns)",
                grid.tile_count(),
                grid.rows(),
                grid.cols()
            ));
            if let Some(source) = &splitter.source
                && let Err(e) = grid.ensure_fits(source.image.width(), source.image.height())
            {
                ui.colored_label(ui.visuals().warn_fg_color, e.to_string());
            }
        }
        Err(e) => {
            ui.colored_label(ui.visuals().error_fg_color, e.to_string());
        }
    }

    ui.separator();

    let running = splitter.running;
    ui.add_enabled_ui(!running, |ui| {
        if ui.button("✂ Split Image").clicked() {
            state.start_split();
        }
    });

    let splitter = &state.splitter;
    if let Some((current, total)) = splitter.progress {
        ui.add(
            egui::ProgressBar::new(progress_fraction(current, total))
                .text(format!("{current} / {total}"))
                .animate(true),
        );
    } else if let Some(result) = &splitter.last_result {
        ui.label(result);
    }
}

/// Share of pieces written, in `0.0..=1.0`
#[expect(
    clippy::cast_precision_loss,
    reason = "piece counts are far below f64's exact integer range"
)]
#[expect(
    clippy::cast_possible_truncation,
    reason = "the ratio is within 0..=1"
)]
fn progress_fraction(current: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (current.min(total) as f64 / total as f64) as f32
}
