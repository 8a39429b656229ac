//! Channel packer: combine up to three grayscale images into the R, G and B planes of one image

use crate::error::Error;
use crate::error::Result;
use crate::image_io;
use image::GrayImage;
use image::Rgb;
use image::RgbImage;
use image::imageops::FilterType;
use std::borrow::Cow;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// One of the three colour planes of an RGB image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "Red",
            Channel::Green => "Green",
            Channel::Blue => "Blue",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Grayscale image per channel; a missing entry packs as an all-black plane
#[derive(Clone, Debug, Default)]
pub struct ChannelAssignment {
    pub red: Option<GrayImage>,
    pub green: Option<GrayImage>,
    pub blue: Option<GrayImage>,
}

impl ChannelAssignment {
    /// Load the given files as grayscale channel images. `None` leaves the channel empty.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be loaded; see [`image_io::load_image`].
    pub fn from_paths(
        red: Option<&Path>,
        green: Option<&Path>,
        blue: Option<&Path>,
    ) -> Result<ChannelAssignment> {
        let load = |p: Option<&Path>| p.map(image_io::load_grayscale).transpose();
        Ok(ChannelAssignment {
            red: load(red)?,
            green: load(green)?,
            blue: load(blue)?,
        })
    }

    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<&GrayImage> {
        match channel {
            Channel::Red => self.red.as_ref(),
            Channel::Green => self.green.as_ref(),
            Channel::Blue => self.blue.as_ref(),
        }
    }

    pub fn set(&mut self, channel: Channel, image: Option<GrayImage>) {
        let slot = match channel {
            Channel::Red => &mut self.red,
            Channel::Green => &mut self.green,
            Channel::Blue => &mut self.blue,
        };
        *slot = image;
    }

    /// Channels that have an image, in R, G, B order
    #[must_use]
    pub fn provided(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|c| self.get(*c).is_some())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provided().is_empty()
    }

    /// Largest width and largest height over the provided images
    #[must_use]
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        Channel::ALL
            .into_iter()
            .filter_map(|c| self.get(c))
            .map(GrayImage::dimensions)
            .reduce(|(w, h), (iw, ih)| (w.max(iw), h.max(ih)))
    }
}

/// Pack the assigned channels into one RGB image of the canvas size.
///
/// Every provided image is stretched to the canvas; missing channels are zero.
///
/// # Errors
///
/// Returns [`Error::NoChannels`] if no channel has an image.
pub fn pack(assignment: &ChannelAssignment) -> Result<RgbImage> {
    let (width, height) = assignment.canvas_size().ok_or(Error::NoChannels)?;
    let start = Instant::now();

    let red = stretched_plane(assignment, Channel::Red, width, height);
    let green = stretched_plane(assignment, Channel::Green, width, height);
    let blue = stretched_plane(assignment, Channel::Blue, width, height);

    let packed = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            red.get_pixel(x, y).0[0],
            green.get_pixel(x, y).0[0],
            blue.get_pixel(x, y).0[0],
        ])
    });

    info!(
        width,
        height,
        channels = %assignment.provided().into_iter().map(Channel::name).collect::<Vec<_>>().join(","),
        "Packed channels in {}",
        humantime::format_duration(start.elapsed())
    );
    Ok(packed)
}

fn stretched_plane(
    assignment: &ChannelAssignment,
    channel: Channel,
    width: u32,
    height: u32,
) -> Cow<'_, GrayImage> {
    match assignment.get(channel) {
        Some(img) if img.dimensions() == (width, height) => Cow::Borrowed(img),
        Some(img) => Cow::Owned(image::imageops::resize(
            img,
            width,
            height,
            FilterType::Lanczos3,
        )),
        None => Cow::Owned(GrayImage::new(width, height)),
    }
}

/// Save a packed image as PNG, creating parent directories. Returns the path written.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory or file cannot be written and [`Error::Encode`]
/// if encoding fails.
pub fn save_packed(packed: &RgbImage, path: &Path) -> Result<PathBuf> {
    let path = image_io::png_output_path(path);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    packed
        .save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| image_io::save_error(&path, e))?;
    info!(path = %path.display(), "Saved packed image");
    Ok(path)
}

/// Status line describing which channels are ready
#[must_use]
pub fn readiness_summary(provided: &[Channel]) -> String {
    match provided.len() {
        0 => "Load at least one image to begin".to_string(),
        3 => "Ready to pack all 3 channels!".to_string(),
        n => format!(
            "Ready to pack {n} channel(s): {} (missing channels will be black)",
            provided
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
