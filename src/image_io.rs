//! Loading and saving images on disk

use crate::error::Error;
use crate::error::Result;
use image::DynamicImage;
use image::GrayImage;
use image::ImageError;
use image::ImageFormat;
use image::ImageReader;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// File extensions accepted as input images (lowercase)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff"];

/// Check if a path has one of the supported image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Load an image, rejecting extensions and contents the backend cannot decode.
///
/// Float-sample images are narrowed to 16 bits so they can always be written back as PNG.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for unknown extensions or undecodable content, and
/// [`Error::Io`] when the file cannot be read.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !is_supported_image(path) {
        let reason = match path.extension() {
            Some(ext) => format!(
                "extension `{}` is not one of {}",
                ext.to_string_lossy(),
                SUPPORTED_EXTENSIONS.join(", ")
            ),
            None => "file has no extension".to_string(),
        };
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason,
        });
    }

    let reader = ImageReader::open(path)
        .map_err(|e| Error::io(path, e))?
        .with_guessed_format()
        .map_err(|e| Error::io(path, e))?;
    let img = reader.decode().map_err(|e| match e {
        ImageError::IoError(source) => Error::io(path, source),
        other => Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;

    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Loaded image"
    );
    Ok(png_compatible(img))
}

/// Load an image and convert it to 8-bit grayscale
///
/// # Errors
///
/// Same as [`load_image`].
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    Ok(load_image(path)?.to_luma8())
}

/// Encode an image as PNG at `path`
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written and [`Error::Encode`] if the encoder
/// rejects the image.
pub fn save_png(img: &DynamicImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| save_error(path, e))
}

/// `path` with `.png` appended unless it already ends in `.png` (any case)
#[must_use]
pub fn png_output_path(path: &Path) -> PathBuf {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png {
        path.to_path_buf()
    } else {
        let mut s = path.as_os_str().to_owned();
        s.push(".png");
        PathBuf::from(s)
    }
}

pub(crate) fn save_error(path: &Path, err: ImageError) -> Error {
    match err {
        ImageError::IoError(source) => Error::io(path, source),
        other => Error::Encode {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

fn png_compatible(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(img.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(img.to_rgba16()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb32FImage;
    use image::RgbImage;
    use tempfile::tempdir;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_image(Path::new("a/b/photo.PNG")));
        assert!(is_supported_image(Path::new("scan.Tiff")));
        assert!(is_supported_image(Path::new("x.jpeg")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("photo.webp")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn unsupported_extension_is_rejected_before_reading() {
        // The file does not exist; the extension check must fire first.
        let err = load_image(Path::new("missing.webm")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let td = tempdir().unwrap();
        let err = load_image(&td.path().join("absent.png")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "{err}");
    }

    #[test]
    fn garbage_content_is_unsupported() -> eyre::Result<()> {
        let td = tempdir()?;
        let path = td.path().join("fake.png");
        std::fs::write(&path, b"definitely not an image")?;
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }), "{err}");
        Ok(())
    }

    #[test]
    fn saved_png_loads_back_as_grayscale() -> eyre::Result<()> {
        let td = tempdir()?;
        let path = td.path().join("rgb.png");
        let img = RgbImage::from_pixel(3, 2, image::Rgb([255, 255, 255]));
        save_png(&DynamicImage::ImageRgb8(img), &path)?;

        let gray = load_grayscale(&path)?;
        assert_eq!(gray.dimensions(), (3, 2));
        assert!(gray.pixels().all(|p| p.0[0] == 255));
        Ok(())
    }

    #[test]
    fn png_extension_is_appended_once() {
        assert_eq!(png_output_path(Path::new("out.png")), PathBuf::from("out.png"));
        assert_eq!(png_output_path(Path::new("out.PNG")), PathBuf::from("out.PNG"));
        assert_eq!(png_output_path(Path::new("out")), PathBuf::from("out.png"));
        assert_eq!(png_output_path(Path::new("out.jpg")), PathBuf::from("out.jpg.png"));
    }

    #[test]
    fn float_images_become_sixteen_bit() {
        let img = DynamicImage::ImageRgb32F(Rgb32FImage::new(2, 2));
        assert!(matches!(png_compatible(img), DynamicImage::ImageRgb16(_)));
    }
}
