//! Scanline jitter for the fuzzy-text title.
//!
//! The text is rasterized once into an [`AlphaBitmap`]. Every frame each
//! scanline is shifted horizontally by a random offset whose bound grows
//! with the current intensity, which is higher while the pointer hovers the
//! text. Front ends either blit the bitmap ([`blit_jittered`]) or paint the
//! glyphs once per scanline with the offsets from [`ScanlineJitter`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Intensity while nothing hovers the text.
    pub base_intensity: f64,
    /// Intensity while hovered or touched.
    pub hover_intensity: f64,
    /// Full jitter span in pixels at intensity 1.0.
    pub fuzz_range: f64,
    /// Blank space added on both sides so shifted rows are not clipped.
    pub margin: usize,
    pub enable_hover: bool,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            base_intensity: 0.18,
            hover_intensity: 0.5,
            fuzz_range: 30.0,
            margin: 50,
            enable_hover: true,
        }
    }
}

impl FuzzyConfig {
    pub fn intensity(&self, hovered: bool) -> f64 {
        if hovered && self.enable_hover {
            self.hover_intensity
        } else {
            self.base_intensity
        }
    }

    /// Largest absolute offset a scanline can receive at this intensity.
    pub fn max_offset(&self, hovered: bool) -> i32 {
        (self.intensity(hovered) * self.fuzz_range / 2.0).ceil() as i32
    }
}

/// Pixel rectangle inside an [`AlphaBitmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// 8-bit coverage raster, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaBitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl AlphaBitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Build from rows of text where any non-space character is full
    /// coverage. Short rows are padded.
    pub fn from_mask<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let mut bitmap = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.as_ref().chars().enumerate() {
                if c != ' ' {
                    bitmap.set(x, y, u8::MAX);
                }
            }
        }
        bitmap
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            0
        }
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, alpha: u8) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = alpha;
        }
    }

    pub fn row(&self, y: usize) -> &[u8] {
        if y < self.height {
            &self.data[y * self.width..(y + 1) * self.width]
        } else {
            &[]
        }
    }

    /// Smallest rectangle holding every non-zero pixel, `None` when blank.
    pub fn tight_bounds(&self) -> Option<PixelBounds> {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut any = false;
        for y in 0..self.height {
            for (x, &a) in self.row(y).iter().enumerate() {
                if a > 0 {
                    any = true;
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }
        any.then(|| PixelBounds {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    /// Copy of `bounds`, clamped to the bitmap.
    pub fn crop(&self, bounds: PixelBounds) -> Self {
        let x0 = bounds.x.min(self.width);
        let y0 = bounds.y.min(self.height);
        let w = bounds.width.min(self.width - x0);
        let h = bounds.height.min(self.height - y0);
        let mut out = Self::new(w, h);
        for y in 0..h {
            let src = &self.row(y0 + y)[x0..x0 + w];
            out.data[y * w..(y + 1) * w].copy_from_slice(src);
        }
        out
    }

    /// Crop to the tight bounds, or an empty bitmap when blank.
    pub fn trimmed(&self) -> Self {
        match self.tight_bounds() {
            Some(b) => self.crop(b),
            None => Self::new(0, 0),
        }
    }
}

/// Per-frame scanline offsets.
#[derive(Debug, Clone)]
pub struct ScanlineJitter<R: Rng> {
    rng: R,
    config: FuzzyConfig,
    hovered: bool,
}

impl<R: Rng> ScanlineJitter<R> {
    pub fn new(rng: R, config: FuzzyConfig) -> Self {
        Self {
            rng,
            config,
            hovered: false,
        }
    }

    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    /// Hover or touch state. Ignored when hover is disabled.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered && self.config.enable_hover;
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    pub fn intensity(&self) -> f64 {
        self.config.intensity(self.hovered)
    }

    pub fn max_offset(&self) -> i32 {
        self.config.max_offset(self.hovered)
    }

    /// Fresh offsets for one frame, one per scanline.
    pub fn frame(&mut self, rows: usize) -> Vec<i32> {
        let span = self.intensity() * self.config.fuzz_range;
        (0..rows)
            .map(|_| (span * self.rng.gen_range(-0.5..0.5)).floor() as i32)
            .collect()
    }
}

impl ScanlineJitter<SmallRng> {
    pub fn from_entropy(config: FuzzyConfig) -> Self {
        Self::new(SmallRng::from_entropy(), config)
    }

    pub fn seeded(seed: u64, config: FuzzyConfig) -> Self {
        Self::new(SmallRng::seed_from_u64(seed), config)
    }
}

/// Copy `src` into a bitmap `margin` pixels wider on each side, shifting
/// scanline `y` by `offsets[y]` (missing offsets count as zero). Pixels
/// pushed past the widened edges are dropped.
pub fn blit_jittered(src: &AlphaBitmap, offsets: &[i32], margin: usize) -> AlphaBitmap {
    let mut dst = AlphaBitmap::new(src.width + margin * 2, src.height);
    for y in 0..src.height {
        let dx = offsets.get(y).copied().unwrap_or(0) as isize;
        for (x, &a) in src.row(y).iter().enumerate() {
            if a == 0 {
                continue;
            }
            let tx = (margin + x) as isize + dx;
            if tx >= 0 {
                dst.set(tx as usize, y, a);
            }
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph() -> AlphaBitmap {
        AlphaBitmap::from_mask(&["      ", "  ##  ", " #  # ", "  ##  ", "      "])
    }

    #[test]
    fn tight_bounds_and_crop() {
        let b = glyph();
        let bounds = b.tight_bounds().unwrap();
        assert_eq!(
            bounds,
            PixelBounds {
                x: 1,
                y: 1,
                width: 4,
                height: 3
            }
        );
        let cropped = b.crop(bounds);
        assert_eq!(cropped.width(), 4);
        assert_eq!(cropped.row(0), &[0, 255, 255, 0]);
        assert_eq!(AlphaBitmap::new(3, 3).tight_bounds(), None);
        assert_eq!(AlphaBitmap::new(3, 3).trimmed().width(), 0);
    }

    #[test]
    fn crop_clamps_to_bitmap() {
        let b = glyph();
        let c = b.crop(PixelBounds {
            x: 4,
            y: 3,
            width: 10,
            height: 10,
        });
        assert_eq!((c.width(), c.height()), (2, 2));
    }

    #[test]
    fn offsets_stay_within_bound() {
        let config = FuzzyConfig::default();
        let mut jitter = ScanlineJitter::seeded(7, config);
        for _ in 0..50 {
            for dx in jitter.frame(40) {
                assert!(dx.abs() <= jitter.max_offset(), "{dx}");
            }
        }
        jitter.set_hovered(true);
        assert!(jitter.max_offset() > config.max_offset(false));
        for dx in jitter.frame(40) {
            assert!(dx.abs() <= jitter.max_offset());
        }
    }

    #[test]
    fn hover_disabled_keeps_base_intensity() {
        let config = FuzzyConfig {
            enable_hover: false,
            ..FuzzyConfig::default()
        };
        let mut jitter = ScanlineJitter::seeded(1, config);
        jitter.set_hovered(true);
        assert!(!jitter.hovered());
        assert_eq!(jitter.intensity(), config.base_intensity);
    }

    #[test]
    fn zero_intensity_is_still() {
        let config = FuzzyConfig {
            base_intensity: 0.0,
            ..FuzzyConfig::default()
        };
        let mut jitter = ScanlineJitter::seeded(3, config);
        assert!(jitter.frame(10).iter().all(|&d| d == 0));
    }

    #[test]
    fn blit_shifts_each_row() {
        let src = AlphaBitmap::from_mask(&["#", "#", "#"]);
        let out = blit_jittered(&src, &[-2, 0, 3], 4);
        assert_eq!(out.width(), 9);
        assert_eq!(out.get(2, 0), 255);
        assert_eq!(out.get(4, 1), 255);
        assert_eq!(out.get(7, 2), 255);
        // Missing offsets count as zero and overflow is dropped.
        let clipped = blit_jittered(&src, &[-10], 1);
        assert_eq!(clipped.row(0), &[0, 0, 0]);
        assert_eq!(clipped.get(1, 2), 255);
    }
}
