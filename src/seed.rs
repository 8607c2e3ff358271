use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::debug;

use crate::cell::Cell;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::parse_rle;
use crate::parse_rle::RleError;

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 42;

/// Probability of a cell starting out alive when none is given
pub const DEFAULT_DENSITY: f64 = 1.0 / 3.0;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Failed to read pattern: {0}")]
    Rle(#[from] RleError),

    #[error("Density must be between 0 and 1, got {got}")]
    InvalidDensity { got: f64 },

    #[error("Pattern has more live cells than the {rows}x{cols} grid")]
    TooManyCells { rows: usize, cols: usize },

    #[error("Pattern cell ({row}, {col}) falls outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },
}

/// Fill a `rows x cols` grid at random, each cell being alive with probability `density`.
///
/// The same `seed` always gives the same grid.
pub fn random(rows: usize, cols: usize, density: f64, seed: u64) -> Result<Grid, SeedError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(SeedError::InvalidDensity { got: density });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let grid = Grid::from_fn(rows, cols, |_, _| Cell::from(rng.gen_bool(density)))?;

    debug!(rows, cols, seed, population = grid.population(), "seeded grid");

    Ok(grid)
}

/// Place the RLE pattern in `bytes` on an empty `rows x cols` grid.
///
/// The pattern goes wherever its `#P` line says. Without one, it is centred.
pub fn from_rle(rows: usize, cols: usize, bytes: &[u8]) -> Result<Grid, SeedError> {
    let mut grid = Grid::new(rows, cols)?;

    // Cells come out in order without repeats, so a pattern with more live cells than the grid
    // has room for can't fit wherever it goes
    let capacity = rows * cols;
    let mut live = Vec::new();
    let mut overflowed = false;
    let file = parse_rle::read_rle(bytes, |x, y| {
        if live.len() < capacity {
            live.push((x, y));
        } else {
            overflowed = true;
        }
    })?;

    if overflowed {
        return Err(SeedError::TooManyCells { rows, cols });
    }

    let (width, height) = file.size.unwrap_or_else(|| {
        let w = live.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
        let h = live.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);

        (w, h)
    });

    let (dx, dy) = file.offset.unwrap_or_else(|| {
        let dx = (cols as i64 - width as i64) / 2;
        let dy = (rows as i64 - height as i64) / 2;

        (dx, dy)
    });

    for (x, y) in live {
        // x, y < MAX_EXTENT, but the offset can be anything
        let (row, col) = (dy.saturating_add(y as i64), dx.saturating_add(x as i64));

        let (Ok(r), Ok(c)) = (usize::try_from(row), usize::try_from(col)) else {
            return Err(SeedError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        };

        if !grid.contains(r, c) {
            return Err(SeedError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        }

        grid.set(r, c, Cell::Alive);
    }

    debug!(
        name = file.name.as_deref().unwrap_or("unnamed"),
        width,
        height,
        population = grid.population(),
        "placed pattern"
    );

    Ok(grid)
}
