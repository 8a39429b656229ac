//! Grid splitter: write one PNG per tile, or draw the grid onto a preview copy

use crate::error::Error;
use crate::error::Result;
use crate::grid::GridSpec;
use crate::grid::Tile;
use crate::image_io;
use image::DynamicImage;
use image::GenericImageView;
use image::Rgba;
use image::RgbaImage;
use image::imageops::FilterType;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing::info;

/// Called after each tile is written with `(completed, total, written_path)`
pub type ProgressCallback<'a> = &'a dyn Fn(usize, usize, &Path);

/// One tile and the file it would be written to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedTile {
    pub tile: Tile,
    pub path: PathBuf,
}

/// Compute the tiles and output paths a split would produce, without touching the disk.
///
/// # Errors
///
/// Returns [`Error::GridExceedsImage`] if some tile would be empty.
pub fn plan(
    width: u32,
    height: u32,
    grid: GridSpec,
    output_dir: &Path,
    base_name: &str,
) -> Result<Vec<PlannedTile>> {
    grid.ensure_fits(width, height)?;
    Ok(grid
        .tiles(width, height)
        .into_iter()
        .map(|tile| PlannedTile {
            path: output_dir.join(tile.file_name(base_name)),
            tile,
        })
        .collect())
}

/// Split `image` into `grid` tiles and write each as `{base_name}_piece_{row}_{col}.png`
/// under `output_dir`, in row-major order.
///
/// The output directory is created if needed. A failed write aborts the split; tiles
/// written before it stay on disk.
///
/// # Errors
///
/// Returns [`Error::GridExceedsImage`] before any I/O if the grid is finer than the image,
/// [`Error::Io`] if the directory or a tile cannot be written, and [`Error::Encode`] if the
/// PNG encoder rejects a tile.
pub fn split(
    image: &DynamicImage,
    grid: GridSpec,
    output_dir: &Path,
    base_name: &str,
    progress: Option<ProgressCallback<'_>>,
) -> Result<Vec<PathBuf>> {
    let (width, height) = image.dimensions();
    let planned = plan(width, height, grid, output_dir, base_name)?;
    let total = planned.len();
    let start = Instant::now();

    info!(
        grid = %grid,
        width,
        height,
        output_dir = %output_dir.display(),
        "Splitting image into {total} pieces"
    );

    std::fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;

    let mut written = Vec::with_capacity(total);
    for (i, PlannedTile { tile, path }) in planned.into_iter().enumerate() {
        let piece = image.crop_imm(tile.x0, tile.y0, tile.width(), tile.height());
        image_io::save_png(&piece, &path)?;
        debug!(row = tile.row, col = tile.col, path = %path.display(), "Wrote piece");

        if let Some(cb) = progress {
            cb(i + 1, total, &path);
        }
        written.push(path);
    }

    info!(
        "Split into {} pieces in {}",
        written.len(),
        humantime::format_duration(start.elapsed())
    );
    Ok(written)
}

/// Base name used for pieces when the caller does not choose one: the source file stem
#[must_use]
pub fn default_base_name(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string())
}

/// How grid lines are drawn on a preview
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewStyle {
    pub color: Rgba<u8>,
    /// Line thickness in preview pixels
    pub line_width: u32,
    /// Downscale the preview so neither side exceeds this
    pub max_dimension: Option<u32>,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            color: Rgba([255, 0, 0, 255]),
            line_width: 2,
            max_dimension: None,
        }
    }
}

/// Produce an annotated copy of `image` with the interior grid boundaries drawn on it.
///
/// When the style limits the preview size, the image is scaled down first and the
/// boundaries are mapped onto the scaled copy.
///
/// # Errors
///
/// Returns [`Error::GridExceedsImage`] if some tile would be empty.
pub fn preview(image: &DynamicImage, grid: GridSpec, style: &PreviewStyle) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    grid.ensure_fits(width, height)?;
    let mut canvas = preview_canvas(image, style.max_dimension);
    draw_grid(&mut canvas, (width, height), grid, style);
    Ok(canvas)
}

/// RGBA copy of `image`, scaled down (aspect preserved) if a side exceeds `max_dimension`
#[must_use]
pub fn preview_canvas(image: &DynamicImage, max_dimension: Option<u32>) -> RgbaImage {
    let (width, height) = image.dimensions();
    match max_dimension {
        Some(max) if max > 0 && (width > max || height > max) => {
            image.resize(max, max, FilterType::Lanczos3).to_rgba8()
        }
        _ => image.to_rgba8(),
    }
}

/// Draw the interior boundaries of `grid` over a `source_size` image onto `canvas`,
/// which may be a scaled copy of that image. Draws nothing if the grid does not fit.
pub fn draw_grid(
    canvas: &mut RgbaImage,
    source_size: (u32, u32),
    grid: GridSpec,
    style: &PreviewStyle,
) {
    let (width, height) = source_size;
    if !grid.fits(width, height) {
        return;
    }
    let (cw, ch) = canvas.dimensions();
    let xs = grid.column_boundaries(width);
    let ys = grid.row_boundaries(height);

    for &x in interior(&xs) {
        let x = scale_coordinate(x, width, cw);
        if let Some((x0, x1)) = line_span(x, style.line_width, cw) {
            for px in x0..x1 {
                for py in 0..ch {
                    canvas.put_pixel(px, py, style.color);
                }
            }
        }
    }
    for &y in interior(&ys) {
        let y = scale_coordinate(y, height, ch);
        if let Some((y0, y1)) = line_span(y, style.line_width, ch) {
            for py in y0..y1 {
                for px in 0..cw {
                    canvas.put_pixel(px, py, style.color);
                }
            }
        }
    }
}

/// Boundaries without the first and last (the image edges)
fn interior(bounds: &[u32]) -> &[u32] {
    bounds
        .get(1..bounds.len().saturating_sub(1))
        .unwrap_or_default()
}

fn scale_coordinate(value: u32, from: u32, to: u32) -> u32 {
    if from == to || from == 0 {
        return value;
    }
    u32::try_from(u64::from(value) * u64::from(to) / u64::from(from)).unwrap_or(to)
}

/// Pixel range of a line of `width` pixels centred on `at`, clamped to `[0, limit)`
fn line_span(at: u32, width: u32, limit: u32) -> Option<(u32, u32)> {
    let width = width.max(1);
    let start = at.saturating_sub(width / 2);
    let end = start.saturating_add(width).min(limit);
    (start < end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;
    use image::Luma;
    use std::cell::RefCell;
    use tempfile::tempdir;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, y| {
            Luma([u8::try_from((x + y) % 256).unwrap_or(0)])
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn writes_every_piece_in_row_major_order() -> eyre::Result<()> {
        let td = tempdir()?;
        let out = td.path().join("pieces");
        let grid = GridSpec::new(2, 3)?;

        let written = split(&gradient(30, 20), grid, &out, "grad", None)?;

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "grad_piece_1_1.png",
                "grad_piece_1_2.png",
                "grad_piece_1_3.png",
                "grad_piece_2_1.png",
                "grad_piece_2_2.png",
                "grad_piece_2_3.png",
            ]
        );
        for p in &written {
            let piece = image::open(p)?;
            assert_eq!(piece.dimensions(), (10, 10));
        }
        Ok(())
    }

    #[test]
    fn piece_pixels_match_source() -> eyre::Result<()> {
        let td = tempdir()?;
        let source = gradient(101, 7);
        let written = split(&source, GridSpec::new(1, 3)?, td.path(), "g", None)?;

        let last = image::open(&written[2])?.to_luma8();
        assert_eq!(last.dimensions(), (34, 7));
        // Third column starts at x = 67.
        assert_eq!(last.get_pixel(0, 0), &Luma([67]));
        assert_eq!(last.get_pixel(5, 3), &Luma([75]));
        Ok(())
    }

    #[test]
    fn progress_is_reported_after_each_write() -> eyre::Result<()> {
        let td = tempdir()?;
        let seen = RefCell::new(Vec::new());
        let cb = |done: usize, total: usize, path: &Path| {
            assert!(path.exists());
            seen.borrow_mut().push((done, total));
        };

        split(&gradient(8, 8), GridSpec::new(2, 2)?, td.path(), "p", Some(&cb))?;

        assert_eq!(seen.into_inner(), vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
        Ok(())
    }

    #[test]
    fn grid_finer_than_image_fails_before_io() -> eyre::Result<()> {
        let td = tempdir()?;
        let out = td.path().join("never_created");
        let err = split(&gradient(3, 3), GridSpec::new(1, 4)?, &out, "x", None).unwrap_err();
        assert!(matches!(err, Error::GridExceedsImage { .. }), "{err}");
        assert!(!out.exists());
        Ok(())
    }

    #[test]
    fn unwritable_output_dir_is_io_error() -> eyre::Result<()> {
        let td = tempdir()?;
        let blocker = td.path().join("file");
        std::fs::write(&blocker, b"")?;
        let err = split(&gradient(4, 4), GridSpec::new(1, 1)?, &blocker, "x", None).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "{err}");
        Ok(())
    }

    #[test]
    fn plan_does_not_touch_disk() -> eyre::Result<()> {
        let td = tempdir()?;
        let out = td.path().join("planned");
        let planned = plan(100, 100, GridSpec::new(2, 4)?, &out, "img")?;
        assert_eq!(planned.len(), 8);
        assert_eq!(planned[7].path, out.join("img_piece_2_4.png"));
        assert!(!out.exists());
        Ok(())
    }

    #[test]
    fn base_name_defaults_to_stem() {
        assert_eq!(default_base_name(Path::new("/tmp/holiday.photo.jpg")), "holiday.photo");
        assert_eq!(default_base_name(Path::new("")), "image");
    }

    #[test]
    fn preview_draws_interior_lines_only() -> eyre::Result<()> {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255])));
        let style = PreviewStyle {
            line_width: 1,
            ..PreviewStyle::default()
        };
        let annotated = preview(&source, GridSpec::new(2, 4)?, &style)?;
        let red = Rgba([255, 0, 0, 255]);

        assert_eq!(annotated.dimensions(), (100, 100));
        for x in [25, 50, 75] {
            assert_eq!(annotated.get_pixel(x, 10), &red);
        }
        assert_eq!(annotated.get_pixel(10, 50), &red);
        assert_ne!(annotated.get_pixel(0, 10), &red);
        assert_ne!(annotated.get_pixel(10, 0), &red);
        assert_ne!(annotated.get_pixel(10, 10), &red);
        Ok(())
    }

    #[test]
    fn preview_leaves_source_untouched() -> eyre::Result<()> {
        let source = gradient(20, 20);
        let before = source.to_luma8();
        let _ = preview(&source, GridSpec::new(2, 2)?, &PreviewStyle::default())?;
        assert_eq!(source.to_luma8(), before);
        Ok(())
    }

    #[test]
    fn scaled_preview_maps_boundaries() -> eyre::Result<()> {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(800, 400, Rgba([0, 0, 0, 255])));
        let style = PreviewStyle {
            line_width: 1,
            max_dimension: Some(200),
            ..PreviewStyle::default()
        };
        let annotated = preview(&source, GridSpec::new(1, 2)?, &style)?;
        assert_eq!(annotated.dimensions(), (200, 100));
        assert_eq!(annotated.get_pixel(100, 50), &Rgba([255, 0, 0, 255]));
        Ok(())
    }

    #[test]
    fn grid_is_mapped_onto_scaled_canvas() -> eyre::Result<()> {
        let mut canvas = RgbaImage::new(50, 50);
        let style = PreviewStyle {
            line_width: 1,
            ..PreviewStyle::default()
        };
        // Source is 100x100; its boundary at x = 50 lands on x = 25 of the canvas.
        draw_grid(&mut canvas, (100, 100), GridSpec::new(1, 2)?, &style);
        assert_eq!(canvas.get_pixel(25, 0), &style.color);
        assert_eq!(canvas.get_pixel(24, 0), &Rgba([0, 0, 0, 0]));
        Ok(())
    }

    #[test]
    fn single_tile_grid_draws_nothing() -> eyre::Result<()> {
        let mut canvas = RgbaImage::new(10, 10);
        draw_grid(&mut canvas, (10, 10), GridSpec::new(1, 1)?, &PreviewStyle::default());
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
        Ok(())
    }

    #[test]
    fn preview_rejects_grid_finer_than_image() -> eyre::Result<()> {
        let source = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let err = preview(&source, GridSpec::new(1, 5)?, &PreviewStyle::default()).unwrap_err();
        assert!(
            matches!(err, Error::GridExceedsImage { rows: 1, cols: 5, width: 4, height: 4 }),
            "{err}"
        );

        // Column count alone must not drive allocation.
        let err = preview(&source, GridSpec::new(1, u32::MAX)?, &PreviewStyle::default())
            .unwrap_err();
        assert!(matches!(err, Error::GridExceedsImage { .. }), "{err}");
        Ok(())
    }

    #[test]
    fn draw_grid_skips_grid_finer_than_image() -> eyre::Result<()> {
        let mut canvas = RgbaImage::new(4, 4);
        draw_grid(&mut canvas, (4, 4), GridSpec::new(u32::MAX, 2)?, &PreviewStyle::default());
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
        Ok(())
    }

    #[test]
    fn line_span_clamps_to_edges() {
        assert_eq!(line_span(0, 4, 10), Some((0, 4)));
        assert_eq!(line_span(9, 4, 10), Some((7, 10)));
        assert_eq!(line_span(5, 0, 10), Some((5, 6)));
        assert_eq!(line_span(10, 1, 10), None);
    }
}
