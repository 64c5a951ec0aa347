//! Image decoding, scaling, grayscale rendering and encoding.

use crate::error::{Error, Result};
use crate::luma::{PixelGrid, Rgba16Grid, luminance, premultiply};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, Luma, Rgba};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Quality used for every JPEG written by [`save`].
pub const JPEG_QUALITY: u8 = 100;

/// Container format chosen from an output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

/// Decodes the image at `path`, detecting the format from its contents.
pub fn load<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let load_error = |source: image::ImageError| Error::Load {
        path: path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| load_error(image::ImageError::IoError(e)))?
        .decode()
        .map_err(load_error)?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded image"
    );
    Ok(image)
}

/// Composites `image` over opaque black, premultiplying every channel by its
/// alpha. The result is fully opaque.
pub fn flatten_over_black(image: &DynamicImage) -> Rgba16Grid {
    let mut rgba = image.to_rgba16();
    for pixel in rgba.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        *pixel = Rgba([
            premultiply(r, a),
            premultiply(g, a),
            premultiply(b, a),
            u16::MAX,
        ]);
    }
    rgba
}

/// Resamples `image` to exactly `side` x `side` pixels with a bilinear filter.
pub fn scale_to_square(image: &DynamicImage, side: u32) -> Result<DynamicImage> {
    if side == 0 {
        return Err(Error::InvalidSide(side));
    }
    Ok(image.resize_exact(side, side, FilterType::Triangle))
}

/// Renders a single-channel copy of `image` using the fingerprint luma weights.
///
/// Transparent pixels render as black. Unlike fingerprinting, any width and
/// height are accepted.
pub fn render_gray(image: &DynamicImage) -> GrayImage {
    let rgba = image.to_rgba16();
    GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b] = rgba.rgb(x, y);
        Luma([luminance(r, g, b)])
    })
}

/// Picks the container for `path`, appending `.jpg` to unknown extensions.
pub fn resolve_output(path: &Path) -> (PathBuf, OutputFormat) {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => (path.to_path_buf(), OutputFormat::Jpeg),
        Some("png") => (path.to_path_buf(), OutputFormat::Png),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".jpg");
            (PathBuf::from(name), OutputFormat::Jpeg)
        }
    }
}

/// Encodes `image` to the path resolved by [`resolve_output`], overwriting
/// any existing file. Returns the path that was written.
pub fn save<P: AsRef<Path>>(image: &DynamicImage, path: P) -> Result<PathBuf> {
    let requested = path.as_ref();
    let (path, format) = resolve_output(requested);
    if path != requested {
        warn!(
            requested = %requested.display(),
            actual = %path.display(),
            "Unrecognized output extension, writing JPEG"
        );
    }

    let io_error = |source: std::io::Error| Error::Io {
        path: path.clone(),
        source,
    };
    let file = File::create(&path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);

    let prepared = prepare_for(image, format);
    let encoded = match format {
        OutputFormat::Jpeg => {
            prepared.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))
        }
        OutputFormat::Png => prepared.write_to(&mut writer, ImageFormat::Png),
    };
    encoded.map_err(|source| Error::Encode {
        path: path.clone(),
        source,
    })?;
    writer.flush().map_err(io_error)?;

    debug!(path = %path.display(), ?format, "Saved image");
    Ok(path)
}

// JPEG carries no alpha; single-channel sources stay single-channel.
fn prepare_for(image: &DynamicImage, format: OutputFormat) -> DynamicImage {
    if !image.color().has_color() {
        return DynamicImage::ImageLuma8(image.to_luma8());
    }
    match format {
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        OutputFormat::Png => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}
