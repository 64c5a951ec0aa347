//! End-to-end operations over image files.
//!
//! Hashing: load -> flatten over black -> scale to a square -> luminance -> mean threshold -> pack.
//! Comparison runs the same steps for two images and scores the fingerprints.

use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;
use crate::imaging;
use crate::luma::LuminanceMap;
use crate::similarity::similarity;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Side length images are scaled to before fingerprinting. `8 * 8` bits fill
/// a 64-bit code exactly.
pub const DEFAULT_SIDE: u32 = 8;

/// Result of hashing one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHash {
    /// Packed fingerprint; `0` unless the fingerprint has exactly 64 bits.
    pub code: u64,
    /// `0`/`1` rendering of the fingerprint.
    pub binary: String,
    pub fingerprint: Fingerprint,
}

impl From<Fingerprint> for ImageHash {
    fn from(fingerprint: Fingerprint) -> Self {
        Self {
            code: fingerprint.to_code(),
            binary: fingerprint.to_string(),
            fingerprint,
        }
    }
}

/// Builds fingerprints at a fixed square resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher {
    side: u32,
}

impl Default for Hasher {
    fn default() -> Self {
        Self { side: DEFAULT_SIDE }
    }
}

impl Hasher {
    pub fn new(side: u32) -> Result<Self> {
        if side == 0 {
            return Err(Error::InvalidSide(side));
        }
        Ok(Self { side })
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    /// Fingerprint of an already decoded image.
    ///
    /// Transparent areas are composited over black before scaling, and the
    /// scaled square is quantized to 8 bits per channel before luminance.
    pub fn fingerprint(&self, image: &DynamicImage) -> Result<Fingerprint> {
        let flattened = DynamicImage::ImageRgba16(imaging::flatten_over_black(image));
        let scaled = imaging::scale_to_square(&flattened, self.side)?.to_rgba8();
        let map = LuminanceMap::from_grid(&scaled)?;
        Ok(Fingerprint::from_luminance(&map))
    }

    pub fn fingerprint_file<P: AsRef<Path>>(&self, path: P) -> Result<Fingerprint> {
        let image = imaging::load(path)?;
        self.fingerprint(&image)
    }

    /// Hashes the image file at `path`.
    pub fn hash_file<P: AsRef<Path>>(&self, path: P) -> Result<ImageHash> {
        let path = path.as_ref();
        let hash = ImageHash::from(self.fingerprint_file(path)?);
        debug!(path = %path.display(), code = hash.code, "Hashed image");
        Ok(hash)
    }

    /// Similarity of two image files in `[0.0, 1.0]`.
    ///
    /// Fails if either image cannot be loaded.
    pub fn compare_files<P, Q>(&self, src: P, dst: Q) -> Result<f32>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let src_fp = self.fingerprint_file(src.as_ref())?;
        let dst_fp = self.fingerprint_file(dst.as_ref())?;
        let score = similarity(&src_fp, &dst_fp);
        debug!(
            src = %src.as_ref().display(),
            dst = %dst.as_ref().display(),
            score,
            "Compared images"
        );
        Ok(score)
    }
}

/// Scales the image at `input` to a `side` x `side` square and saves it.
///
/// The container follows the extension of `output`; see
/// [`imaging::resolve_output`]. Returns the path written.
pub fn scale_and_save<P, Q>(input: P, output: Q, side: u32) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let image = imaging::load(input.as_ref())?;
    let scaled = imaging::scale_to_square(&image, side)?;
    let written = imaging::save(&scaled, output)?;
    info!(
        input = %input.as_ref().display(),
        output = %written.display(),
        side,
        "Scaled image"
    );
    Ok(written)
}

/// Renders the image at `input` in grayscale and saves it.
pub fn gray_and_save<P, Q>(input: P, output: Q) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let image = imaging::load(input.as_ref())?;
    let gray = DynamicImage::ImageLuma8(imaging::render_gray(&image));
    let written = imaging::save(&gray, output)?;
    info!(
        input = %input.as_ref().display(),
        output = %written.display(),
        "Rendered grayscale image"
    );
    Ok(written)
}
