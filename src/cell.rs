/// State of a single square of the [`Grid`](crate::grid::Grid).
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    /// Parse a cell from its picture byte.
    ///
    /// `.` is dead. `O`, `o`, `#` and `*` are alive.
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'.' => Some(Cell::Dead),
            b'O' | b'o' | b'#' | b'*' => Some(Cell::Alive),
            _ => None,
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}
