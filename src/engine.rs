use crate::cell::Cell;
use crate::grid::Grid;
use crate::rules::Transition;

/// Offsets `(d_row, d_col)` of the eight neighbours of a cell
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Count the live neighbours of `(row, col)`. Neighbours that fall off the grid don't count.
///
/// # Panics
///
/// If `(row, col)` itself is off the grid.
pub fn count_live_neighbours(grid: &Grid, row: usize, col: usize) -> u8 {
    assert!(
        grid.contains(row, col),
        "({row}, {col}) is out of bounds for a {}x{} grid",
        grid.rows(),
        grid.cols()
    );

    let mut n = 0;

    for (dr, dc) in NEIGHBOURS {
        // `checked_add_signed` handles the top and left edges, `get_checked` the others
        let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
            continue;
        };

        if let Some(Cell::Alive) = grid.get_checked(r, c) {
            n += 1;
        }
    }

    n
}

/// What happened to the population over one tick
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Census {
    /// Dead cells that came alive
    pub births: usize,

    /// Live cells that died, from either under or overpopulation
    pub deaths: usize,
}

/// Advance `grid` by one generation, also reporting births and deaths.
///
/// Every neighbour count is taken from `grid` as it was before the tick. The result is written to
/// a fresh buffer, so no cell ever sees a neighbour's updated state.
pub fn step(grid: &Grid) -> (Grid, Census) {
    let mut census = Census::default();

    let next = grid.map(|row, col| {
        let n = count_live_neighbours(grid, row, col);
        let transition = Transition::classify(grid.get(row, col), n);

        match transition {
            Transition::Reproduction => census.births += 1,
            Transition::Underpopulation | Transition::Overpopulation => census.deaths += 1,
            Transition::Survival | Transition::Unchanged => {}
        }

        transition.outcome()
    });

    (next, census)
}

/// Advance `grid` by one generation
pub fn advance_generation(grid: &Grid) -> Grid {
    step(grid).0
}
