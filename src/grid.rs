use std::str::FromStr;

use thiserror::Error;

use crate::cell::Cell;

/// A fixed size `rows x cols` board of [`Cell`]s.
///
/// The dimensions are set once at construction and never change. Cells are stored row-major in a
/// single buffer, so `(row, col)` lives at `row * cols + col`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyDimensions { rows: usize, cols: usize },

    #[error("Row {row} has {got} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid cell '{got}' at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, got: char },
}

impl Grid {
    /// Create a grid where every cell is dead
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyDimensions { rows, cols });
        }

        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Dead; rows * cols],
        })
    }

    /// Build a grid from a list of rows. Every row must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let n = rows.len();
        let cols = rows.first().map_or(0, Vec::len);

        if n == 0 || cols == 0 {
            return Err(GridError::EmptyDimensions { rows: n, cols });
        }

        let mut cells = Vec::with_capacity(n * cols);

        for (row, line) in rows.into_iter().enumerate() {
            if line.len() != cols {
                return Err(GridError::Ragged {
                    row,
                    expected: cols,
                    got: line.len(),
                });
            }

            cells.extend(line);
        }

        Ok(Self {
            rows: n,
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether `(row, col)` lies on the grid
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Read the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// If `(row, col)` is off the grid. Use [`Grid::get_checked`] when that is expected.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(
            self.contains(row, col),
            "({row}, {col}) is out of bounds for a {}x{} grid",
            self.rows,
            self.cols
        );

        self.cells[self.index(row, col)]
    }

    pub fn get_checked(&self, row: usize, col: usize) -> Option<Cell> {
        self.contains(row, col)
            .then(|| self.cells[self.index(row, col)])
    }

    /// Overwrite a single cell. Only meant for building an initial grid.
    ///
    /// # Panics
    ///
    /// If `(row, col)` is off the grid.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        assert!(
            self.contains(row, col),
            "({row}, {col}) is out of bounds for a {}x{} grid",
            self.rows,
            self.cols
        );

        let i = self.index(row, col);
        self.cells[i] = cell;
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Iterate over the rows of the grid, top to bottom
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.cols)
    }

    /// Build a `rows x cols` grid where each cell is `f(row, col)`, filled row-major.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self, GridError>
    where
        F: FnMut(usize, usize) -> Cell,
    {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyDimensions { rows, cols });
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col));
            }
        }

        Ok(Self { rows, cols, cells })
    }

    /// Build a new grid of the same dimensions where each cell is `f(row, col)`. `self` is only
    /// read, never written.
    pub(crate) fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Cell,
    {
        let cells = (0..self.cells.len())
            .map(|i| f(i / self.cols, i % self.cols))
            .collect();

        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

/// Parse a picture of the grid, one line per row.
///
/// Surrounding whitespace on each line is ignored, as are blank lines before the first row and
/// after the last. See [`Cell::from_byte`] for the accepted characters.
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines: Vec<&str> = s.lines().map(str::trim).collect();

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let start = lines.iter().take_while(|l| l.is_empty()).count();

        let mut rows = Vec::with_capacity(lines.len() - start);

        for (row, line) in lines[start..].iter().enumerate() {
            let cells = line
                .bytes()
                .enumerate()
                .map(|(col, b)| {
                    Cell::from_byte(b).ok_or(GridError::InvalidCell {
                        row,
                        col,
                        got: b as char,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            rows.push(cells);
        }

        Self::from_rows(rows)
    }
}
