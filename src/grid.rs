//! Grid geometry: tile boundaries and tile naming

use crate::error::Error;
use crate::error::Result;
use std::num::NonZeroU32;

/// Number of rows and columns to split an image into. Both are at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSpec {
    rows: NonZeroU32,
    cols: NonZeroU32,
}

impl GridSpec {
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] if either count is zero.
    pub fn new(rows: u32, cols: u32) -> Result<GridSpec> {
        match (NonZeroU32::new(rows), NonZeroU32::new(cols)) {
            (Some(rows), Some(cols)) => Ok(GridSpec { rows, cols }),
            _ => Err(Error::InvalidGrid { rows, cols }),
        }
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows.get()
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols.get()
    }

    /// Total number of tiles (rows × cols)
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.rows() as usize * self.cols() as usize
    }

    /// Whether every tile of this grid over a `width`×`height` image is non-empty
    #[must_use]
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.cols() <= width && self.rows() <= height
    }

    /// # Errors
    ///
    /// Returns [`Error::GridExceedsImage`] when some tile would be empty.
    pub fn ensure_fits(&self, width: u32, height: u32) -> Result<()> {
        if self.fits(width, height) {
            Ok(())
        } else {
            Err(Error::GridExceedsImage {
                rows: self.rows(),
                cols: self.cols(),
                width,
                height,
            })
        }
    }

    /// Column boundaries `x = 0 ..= width`, `cols + 1` entries
    #[must_use]
    pub fn column_boundaries(&self, width: u32) -> Vec<u32> {
        axis_boundaries(width, self.cols)
    }

    /// Row boundaries `y = 0 ..= height`, `rows + 1` entries
    #[must_use]
    pub fn row_boundaries(&self, height: u32) -> Vec<u32> {
        axis_boundaries(height, self.rows)
    }

    /// All tiles of a `width`×`height` image in row-major order
    #[must_use]
    pub fn tiles(&self, width: u32, height: u32) -> Vec<Tile> {
        let xs = self.column_boundaries(width);
        let ys = self.row_boundaries(height);
        let mut tiles = Vec::with_capacity(self.tile_count());
        for (r, y) in ys.windows(2).enumerate() {
            for (c, x) in xs.windows(2).enumerate() {
                tiles.push(Tile {
                    row: index_to_label(r),
                    col: index_to_label(c),
                    x0: x[0],
                    y0: y[0],
                    x1: x[1],
                    y1: y[1],
                });
            }
        }
        tiles
    }
}

impl std::fmt::Display for GridSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Splits `[0, length)` into `parts` spans; span `i` is
/// `[floor(i*length/parts), floor((i+1)*length/parts))`.
#[must_use]
pub fn axis_boundaries(length: u32, parts: NonZeroU32) -> Vec<u32> {
    let parts = u64::from(parts.get());
    let length64 = u64::from(length);
    (0..=parts)
        .map(|i| u32::try_from(i * length64 / parts).unwrap_or(length))
        .collect()
}

fn index_to_label(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// A rectangular region `[x0, x1) × [y0, y1)` of the source image.
/// `row` and `col` are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Tile {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Output file name for this tile
    #[must_use]
    pub fn file_name(&self, base_name: &str) -> String {
        piece_file_name(base_name, self.row, self.col)
    }
}

/// `{base_name}_piece_{row}_{col}.png`
#[must_use]
pub fn piece_file_name(base_name: &str, row: u32, col: u32) -> String {
    format!("{base_name}_piece_{row}_{col}.png")
}
