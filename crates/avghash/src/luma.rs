//! Luminance reduction.
//!
//! Converts a square pixel grid into a row-major map of 8-bit luminance
//! values using fixed luma weights (0.299, 0.587, 0.114) applied to 16-bit
//! channel intensities.

use crate::error::{Error, Result};
use image::{ImageBuffer, Rgba};
use std::ops::Deref;

const RED_WEIGHT: f32 = 0.299;
const GREEN_WEIGHT: f32 = 0.587;
const BLUE_WEIGHT: f32 = 0.114;

/// Owned RGBA grid with 16-bit channels.
pub type Rgba16Grid = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Read-only view over a grid of pixels with 16-bit color channels.
///
/// Colors are premultiplied by alpha, so a fully transparent pixel reads as
/// black. Sources with 8-bit channels widen each sample by `x * 257` so that
/// `255` maps to `65535`.
pub trait PixelGrid {
    /// Returns `(width, height)`.
    fn extent(&self) -> (u32, u32);

    /// Returns the premultiplied red, green and blue intensities of the pixel
    /// at `(x, y)`.
    fn rgb(&self, x: u32, y: u32) -> [u16; 3];
}

impl<C> PixelGrid for ImageBuffer<Rgba<u16>, C>
where
    C: Deref<Target = [u16]>,
{
    fn extent(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn rgb(&self, x: u32, y: u32) -> [u16; 3] {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        [premultiply(r, a), premultiply(g, a), premultiply(b, a)]
    }
}

impl<C> PixelGrid for ImageBuffer<Rgba<u8>, C>
where
    C: Deref<Target = [u8]>,
{
    fn extent(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn rgb(&self, x: u32, y: u32) -> [u16; 3] {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        let a = widen(a);
        [
            premultiply(widen(r), a),
            premultiply(widen(g), a),
            premultiply(widen(b), a),
        ]
    }
}

fn widen(sample: u8) -> u16 {
    u16::from(sample) * 257
}

/// Scales a 16-bit channel by a 16-bit alpha.
pub fn premultiply(channel: u16, alpha: u16) -> u16 {
    (u32::from(channel) * u32::from(alpha) / u32::from(u16::MAX)) as u16
}

/// Luminance of a single pixel given 16-bit channel intensities.
///
/// Each weighted channel is truncated on its own before the sum is scaled
/// down to eight bits.
pub fn luminance(r: u16, g: u16, b: u16) -> u8 {
    let r = (f32::from(r) * RED_WEIGHT) as u32;
    let g = (f32::from(g) * GREEN_WEIGHT) as u32;
    let b = (f32::from(b) * BLUE_WEIGHT) as u32;
    ((r + g + b) / 256) as u8
}

/// Row-major 8-bit luminance values of a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LuminanceMap {
    values: Vec<u8>,
}

impl LuminanceMap {
    /// Reduces a square grid to its luminance map.
    ///
    /// Fails with [`Error::NonSquareGrid`] when width and height differ and
    /// with [`Error::EmptyGrid`] when the grid has no pixels.
    pub fn from_grid<G>(grid: &G) -> Result<Self>
    where
        G: PixelGrid + ?Sized,
    {
        let (width, height) = grid.extent();
        if width != height {
            return Err(Error::NonSquareGrid { width, height });
        }
        if width == 0 {
            return Err(Error::EmptyGrid);
        }

        let stride = width as usize;
        let mut values = vec![0u8; stride * height as usize];
        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = grid.rgb(x, y);
                values[y as usize * stride + x as usize] = luminance(r, g, b);
            }
        }

        Ok(Self { values })
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean luminance using truncating integer division, `None` when empty.
    pub fn mean(&self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let total: u64 = self.values.iter().map(|&v| u64::from(v)).sum();
        Some((total / self.len() as u64) as u8)
    }
}

impl From<Vec<u8>> for LuminanceMap {
    fn from(values: Vec<u8>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn gray8(side: u32, levels: &[u8]) -> RgbaImage {
        RgbaImage::from_fn(side, side, |x, y| {
            let v = levels[(y * side + x) as usize];
            Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(luminance(0, 0, 0), 0);
        assert_eq!(luminance(u16::MAX, u16::MAX, u16::MAX), 255);
    }

    #[test]
    fn test_luminance_primary_weights() {
        // 65535 * 0.299 = 19594, / 256 = 76
        assert_eq!(luminance(u16::MAX, 0, 0), 76);
        // 65535 * 0.587 = 38469, / 256 = 150
        assert_eq!(luminance(0, u16::MAX, 0), 150);
        // 65535 * 0.114 = 7470, / 256 = 29
        assert_eq!(luminance(0, 0, u16::MAX), 29);
    }

    #[test]
    fn test_map_is_row_major() {
        let grid = gray8(2, &[0, 50, 100, 200]);
        let map = LuminanceMap::from_grid(&grid).unwrap();
        assert_eq!(map.values(), &[0, 50, 100, 200]);
    }

    #[test]
    fn test_u8_and_u16_grids_agree() {
        let narrow = gray8(2, &[10, 50, 100, 200]);
        let wide = Rgba16Grid::from_fn(2, 2, |x, y| {
            let [r, g, b, a] = narrow.get_pixel(x, y).0;
            Rgba([widen(r), widen(g), widen(b), widen(a)])
        });
        assert_eq!(
            LuminanceMap::from_grid(&narrow).unwrap(),
            LuminanceMap::from_grid(&wide).unwrap()
        );
    }

    #[test]
    fn test_colors_are_premultiplied_by_alpha() {
        let clear = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 0]));
        assert_eq!(clear.rgb(1, 1), [0, 0, 0]);
        assert_eq!(LuminanceMap::from_grid(&clear).unwrap().values(), &[0; 9]);

        let opaque = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
        assert_eq!(opaque.rgb(1, 1), [u16::MAX; 3]);

        let half = Rgba16Grid::from_pixel(1, 1, Rgba([u16::MAX, 40_000, 0, 32_768]));
        assert_eq!(half.rgb(0, 0), [32_768, 20_000, 0]);
    }

    #[test]
    fn test_premultiply() {
        assert_eq!(premultiply(u16::MAX, u16::MAX), u16::MAX);
        assert_eq!(premultiply(u16::MAX, 0), 0);
        assert_eq!(premultiply(1234, u16::MAX), 1234);
        assert_eq!(premultiply(0, 12_345), 0);
    }

    #[test]
    fn test_non_square_grid_is_rejected() {
        let grid = RgbaImage::new(4, 2);
        match LuminanceMap::from_grid(&grid) {
            Err(Error::NonSquareGrid { width, height }) => {
                assert_eq!((width, height), (4, 2));
            }
            other => panic!("expected NonSquareGrid, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let grid = RgbaImage::new(0, 0);
        assert!(matches!(
            LuminanceMap::from_grid(&grid),
            Err(Error::EmptyGrid)
        ));
    }

    #[test]
    fn test_mean_truncates() {
        assert_eq!(LuminanceMap::from(vec![0, 100]).mean(), Some(50));
        assert_eq!(LuminanceMap::from(vec![1, 2]).mean(), Some(1));
        assert_eq!(LuminanceMap::from(vec![255; 64]).mean(), Some(255));
        assert_eq!(LuminanceMap::default().mean(), None);
    }
}
