//! Average-hash (aHash) fingerprints for images.
//!
//! An image is scaled to a small square, reduced to 8-bit luminance and
//! thresholded against its mean luminance. The resulting bit vector can be
//! packed into a 64-bit code, rendered as a `0`/`1` string, or compared with
//! another fingerprint to estimate how similar two images look.
//!
//! ```no_run
//! use avghash::Hasher;
//!
//! let hasher = Hasher::default();
//! let hash = hasher.hash_file("a.png")?;
//! println!("{} {}", hash.code, hash.binary);
//!
//! let score = hasher.compare_files("a.png", "b.jpg")?;
//! println!("{:.4}", score);
//! # Ok::<(), avghash::Error>(())
//! ```

pub mod code;
pub mod error;
pub mod fingerprint;
pub mod imaging;
pub mod luma;
pub mod pipeline;
pub mod similarity;

pub use code::FingerprintCode;
pub use error::{Error, Result};
pub use fingerprint::Fingerprint;
pub use luma::{LuminanceMap, PixelGrid};
pub use pipeline::{DEFAULT_SIDE, Hasher, ImageHash, gray_and_save, scale_and_save};
pub use similarity::{similarity, try_similarity};
