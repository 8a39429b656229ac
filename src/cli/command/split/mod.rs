use crate::cli::to_args::ToArgs;
use crate::grid::GridSpec;
use crate::image_io;
use crate::split;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

/// Split an image into `rows` x `cols` PNG pieces named `{base}_piece_{row}_{col}.png`
#[derive(Args, Arbitrary, Clone, PartialEq, Debug)]
pub struct SplitArgs {
    /// Image to split (png, jpg, jpeg, gif, bmp, tif, tiff)
    pub image: String,

    /// Number of rows
    #[clap(long, default_value_t = 2)]
    pub rows: u32,

    /// Number of columns
    #[clap(long, default_value_t = 2)]
    pub cols: u32,

    /// Directory to write the pieces to (created if missing)
    #[clap(long, short = 'o')]
    pub output_dir: String,

    /// Prefix for piece file names (defaults to the image file stem)
    #[clap(long)]
    pub base_name: Option<String>,

    /// Show the pieces that would be written without writing them
    #[clap(long)]
    pub dry_run: bool,
}

impl SplitArgs {
    /// # Errors
    ///
    /// Returns an error if the grid is invalid, the image cannot be loaded, or a piece
    /// cannot be written.
    pub fn invoke(self) -> eyre::Result<()> {
        // Validate before touching the file system
        let grid = GridSpec::new(self.rows, self.cols)?;
        let source = PathBuf::from(&self.image);
        let output_dir = PathBuf::from(&self.output_dir);
        let base_name = self
            .base_name
            .unwrap_or_else(|| split::default_base_name(&source));

        let image = image_io::load_image(&source)?;

        if self.dry_run {
            let planned = split::plan(image.width(), image.height(), grid, &output_dir, &base_name)?;
            for p in &planned {
                println!(
                    "Would write: {} ({}x{} at {},{})",
                    p.path.display(),
                    p.tile.width(),
                    p.tile.height(),
                    p.tile.x0,
                    p.tile.y0
                );
            }
            println!("\nWould write {} pieces", planned.len());
            return Ok(());
        }

        let progress = |done: usize, total: usize, path: &Path| {
            println!("[{done}/{total}] {}", path.display());
        };
        let written = split::split(&image, grid, &output_dir, &base_name, Some(&progress))?;
        println!(
            "Image split into {} pieces successfully! Saved to: {}",
            written.len(),
            output_dir.display()
        );
        Ok(())
    }
}

impl ToArgs for SplitArgs {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = vec![
            OsString::from(self.image.clone()),
            "--rows".into(),
            self.rows.to_string().into(),
            "--cols".into(),
            self.cols.to_string().into(),
            "--output-dir".into(),
            OsString::from(self.output_dir.clone()),
        ];
        if let Some(base_name) = &self.base_name {
            args.push("--base-name".into());
            args.push(base_name.into());
        }
        if self.dry_run {
            args.push("--dry-run".into());
        }
        args
    }
}
