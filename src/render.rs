use crate::grid::Grid;

/// Characters used to draw a cell
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Glyphs {
    pub alive: char,
    pub dead: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            alive: '•',
            dead: ' ',
        }
    }
}

/// How a grid is turned into text
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Style {
    /// One glyph per cell, one line per row
    Glyphs(Glyphs),

    /// Eight cells per braille character, see [`braille`]
    Braille,
}

impl Default for Style {
    fn default() -> Self {
        Style::Glyphs(Glyphs::default())
    }
}

/// Render `grid` in the given style. Every line, the last included, ends with `\n`.
pub fn render(grid: &Grid, style: &Style) -> String {
    match style {
        Style::Glyphs(glyphs) => frame(grid, glyphs),
        Style::Braille => braille(grid),
    }
}

/// One glyph per cell, one line per row
pub fn frame(grid: &Grid, glyphs: &Glyphs) -> String {
    let mut fb = String::with_capacity(grid.rows() * (grid.cols() + 1));

    for row in grid.iter_rows() {
        fb.extend(row.iter().map(|c| {
            if c.is_alive() {
                glyphs.alive
            } else {
                glyphs.dead
            }
        }));
        fb.push('\n');
    }

    fb
}

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// Pack each 2x4 block of cells into a single braille character, so a `rows x cols` grid takes
/// `ceil(rows / 4)` lines of `ceil(cols / 2)` characters.
pub fn braille(grid: &Grid) -> String {
    let (bw, bh) = (grid.cols().div_ceil(2), grid.rows().div_ceil(4));

    let mut cp = vec![0u32; bw * bh];

    for (y, row) in grid.iter_rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if cell.is_alive() {
                cp[(y / 4) * bw + (x / 2)] += dot(x, y);
            }
        }
    }

    // Each braille character is 3 bytes in UTF-8, plus one newline per line
    let mut fb = String::with_capacity(3 * bw * bh + bh);

    for line in cp.chunks_exact(bw) {
        for &dots in line {
            // dots <= 0xFF, so this stays within the braille block
            fb.push(char::from_u32(BRAILLE_EMPTY + dots).unwrap_or(' '));
        }
        fb.push('\n');
    }

    fb
}

fn dot(x: usize, y: usize) -> u32 {
    match (x % 2, y % 4) {
        (0, 0) => 0x1,
        (1, 0) => 0x8,
        (0, 1) => 0x2,
        (1, 1) => 0x10,
        (0, 2) => 0x4,
        (1, 2) => 0x20,
        (0, 3) => 0x40,
        (1, 3) => 0x80,
        _ => unreachable!(),
    }
}
