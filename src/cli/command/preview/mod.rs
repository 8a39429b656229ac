use crate::cli::to_args::ToArgs;
use crate::grid::GridSpec;
use crate::image_io;
use crate::split;
use crate::split::PreviewStyle;
use arbitrary::Arbitrary;
use clap::Args;
use image::DynamicImage;
use std::ffi::OsString;
use std::path::PathBuf;

/// Draw the split grid onto a copy of an image, without writing any pieces
#[derive(Args, Arbitrary, Clone, PartialEq, Debug)]
pub struct PreviewArgs {
    /// Image to preview
    pub image: String,

    /// Number of rows
    #[clap(long, default_value_t = 2)]
    pub rows: u32,

    /// Number of columns
    #[clap(long, default_value_t = 2)]
    pub cols: u32,

    /// Where to write the annotated PNG
    #[clap(long, short = 'o')]
    pub output: String,

    /// Grid line thickness in pixels
    #[clap(long, default_value_t = 2)]
    pub line_width: u32,

    /// Scale the preview down so neither side exceeds this many pixels
    #[clap(long)]
    pub max_size: Option<u32>,
}

impl PreviewArgs {
    /// # Errors
    ///
    /// Returns an error if the grid is invalid, the image cannot be loaded, or the preview
    /// cannot be written.
    pub fn invoke(self) -> eyre::Result<()> {
        let grid = GridSpec::new(self.rows, self.cols)?;
        let image = image_io::load_image(&PathBuf::from(&self.image))?;
        let style = PreviewStyle {
            line_width: self.line_width,
            max_dimension: self.max_size,
            ..PreviewStyle::default()
        };

        let annotated = split::preview(&image, grid, &style)?;
        let output = image_io::png_output_path(&PathBuf::from(&self.output));
        image_io::save_png(&DynamicImage::ImageRgba8(annotated), &output)?;
        println!(
            "Wrote {grid} grid preview ({} pieces) to {}",
            grid.tile_count(),
            output.display()
        );
        Ok(())
    }
}

impl ToArgs for PreviewArgs {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = vec![
            OsString::from(self.image.clone()),
            "--rows".into(),
            self.rows.to_string().into(),
            "--cols".into(),
            self.cols.to_string().into(),
            "--output".into(),
            OsString::from(self.output.clone()),
            "--line-width".into(),
            self.line_width.to_string().into(),
        ];
        if let Some(max_size) = self.max_size {
            args.push("--max-size".into());
            args.push(max_size.to_string().into());
        }
        args
    }
}
