//! Fuzzy title banner: the display name set in a 3×5 block font, with each
//! scanline jittered per frame.

use questlog_core::fuzzy::{AlphaBitmap, FuzzyConfig, ScanlineJitter, blit_jittered};
use rand::rngs::SmallRng;

const GLYPH_ROWS: usize = 5;

fn glyph(c: char) -> [&'static str; GLYPH_ROWS] {
    match c.to_ascii_uppercase() {
        'A' => [" # ", "# #", "###", "# #", "# #"],
        'B' => ["## ", "# #", "## ", "# #", "## "],
        'C' => [" ##", "#  ", "#  ", "#  ", " ##"],
        'D' => ["## ", "# #", "# #", "# #", "## "],
        'E' => ["###", "#  ", "## ", "#  ", "###"],
        'F' => ["###", "#  ", "## ", "#  ", "#  "],
        'G' => [" ##", "#  ", "# #", "# #", " ##"],
        'H' => ["# #", "# #", "###", "# #", "# #"],
        'I' => ["###", " # ", " # ", " # ", "###"],
        'J' => ["  #", "  #", "  #", "# #", " # "],
        'K' => ["# #", "# #", "## ", "# #", "# #"],
        'L' => ["#  ", "#  ", "#  ", "#  ", "###"],
        'M' => ["# #", "###", "###", "# #", "# #"],
        'N' => ["## ", "# #", "# #", "# #", "# #"],
        'O' => [" # ", "# #", "# #", "# #", " # "],
        'P' => ["## ", "# #", "## ", "#  ", "#  "],
        'Q' => [" # ", "# #", "# #", "## ", " ##"],
        'R' => ["## ", "# #", "## ", "# #", "# #"],
        'S' => [" ##", "#  ", " # ", "  #", "## "],
        'T' => ["###", " # ", " # ", " # ", " # "],
        'U' => ["# #", "# #", "# #", "# #", "###"],
        'V' => ["# #", "# #", "# #", "# #", " # "],
        'W' => ["# #", "# #", "###", "###", "# #"],
        'X' => ["# #", "# #", " # ", "# #", "# #"],
        'Y' => ["# #", "# #", " # ", " # ", " # "],
        'Z' => ["###", "  #", " # ", "#  ", "###"],
        '0' => ["###", "# #", "# #", "# #", "###"],
        '1' => [" # ", "## ", " # ", " # ", "###"],
        '2' => ["## ", "  #", " # ", "#  ", "###"],
        '3' => ["## ", "  #", " # ", "  #", "## "],
        '4' => ["# #", "# #", "###", "  #", "  #"],
        '5' => ["###", "#  ", "## ", "  #", "## "],
        '6' => [" ##", "#  ", "###", "# #", "###"],
        '7' => ["###", "  #", " # ", " # ", " # "],
        '8' => ["###", "# #", "###", "# #", "###"],
        '9' => ["###", "# #", "###", "  #", "## "],
        '-' => ["   ", "   ", "###", "   ", "   "],
        '.' => ["   ", "   ", "   ", "   ", " # "],
        ' ' => ["   "; GLYPH_ROWS],
        _ => ["###", "# #", "# #", "# #", "###"],
    }
}

/// Rasterize `text` with one blank column between glyphs, trimmed to its
/// inked pixels.
pub fn rasterize(text: &str) -> AlphaBitmap {
    let mut rows = vec![String::new(); GLYPH_ROWS];
    for (i, c) in text.chars().enumerate() {
        for (row, line) in rows.iter_mut().zip(glyph(c)) {
            if i > 0 {
                row.push(' ');
            }
            row.push_str(line);
        }
    }
    AlphaBitmap::from_mask(&rows).trimmed()
}

/// Jitter settings in terminal cells rather than pixels.
pub fn terminal_config() -> FuzzyConfig {
    FuzzyConfig {
        base_intensity: 0.3,
        hover_intensity: 0.3,
        fuzz_range: 6.0,
        margin: 2,
        enable_hover: false,
    }
}

pub struct Banner {
    bitmap: AlphaBitmap,
    jitter: ScanlineJitter<SmallRng>,
}

impl Banner {
    pub fn new(text: &str, config: FuzzyConfig) -> Self {
        Self {
            bitmap: rasterize(text),
            jitter: ScanlineJitter::from_entropy(config),
        }
    }

    pub fn height(&self) -> usize {
        self.bitmap.height()
    }

    /// Lines for the next frame. Each pixel is two cells wide so the glyphs
    /// keep their proportions.
    pub fn frame_lines(&mut self) -> Vec<String> {
        let offsets = self.jitter.frame(self.bitmap.height());
        let margin = self.jitter.config().margin;
        to_lines(&blit_jittered(&self.bitmap, &offsets, margin))
    }
}

fn to_lines(bitmap: &AlphaBitmap) -> Vec<String> {
    (0..bitmap.height())
        .map(|y| {
            bitmap
                .row(y)
                .iter()
                .map(|&a| if a > 0 { "██" } else { "  " })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}
