use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cell::Cell;

/// A rulestring as found in pattern files.
///
/// Only Conway's rules ([`B3S23`]) can be simulated. Other rulestrings are still parsed so that
/// pattern readers can reject them by name.
///
/// # Representation
/// Bit `i` of `births` (resp. `survivals`) is set when `i` live neighbours give birth to (resp.
/// keep alive) a cell.
/// ```notrust
/// b3s23:  births = 0b0_0000_1000, survivals = 0b0_0000_1100
/// ```
///
/// # Format
///
/// Either `B3/S23` (the slash and letter case are optional) or the older `23/3`, which lists
/// survivals first.
///
/// See: https://conwaylife.com/wiki/Rulestring
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RuleString {
    births: u16,
    survivals: u16,
}

/// Rules of Conway's Game of Life.
pub const B3S23: RuleString = RuleString::new(0b1000, 0b1100);

impl Default for RuleString {
    fn default() -> Self {
        B3S23
    }
}

impl RuleString {
    /// Any bit past the 8th is ignored
    pub const fn new(births: u16, survivals: u16) -> Self {
        Self {
            births: births & 0x1FF,
            survivals: survivals & 0x1FF,
        }
    }

    pub fn births(&self) -> u16 {
        self.births
    }

    pub fn survivals(&self) -> u16 {
        self.survivals
    }

    pub fn is_life(&self) -> bool {
        *self == B3S23
    }
}

impl fmt::Display for RuleString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |set: u16| -> String {
            (0..=8u8)
                .filter(|n| set & (1 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births), digits(self.survivals))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Invalid character '{got}' in rulestring")]
    InvalidChar { got: char },

    #[error("Neighbour count {got} is larger than 8")]
    CountTooLarge { got: u32 },

    #[error("Neighbour count found before 'B' or 'S'")]
    MissingPrefix,

    #[error("Expected a '/' between survivals and births")]
    MissingSlash,
}

impl FromStr for RuleString {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum State {
            Birth,
            Survival,
        }

        let s = s.trim();

        // Digits only: survivals first
        if !s.bytes().any(|b| b.is_ascii_alphabetic()) {
            let (s, b) = s.split_once('/').ok_or(RuleError::MissingSlash)?;

            return Ok(RuleString::new(counts(b)?, counts(s)?));
        }

        let mut state = None;
        let (mut births, mut survivals) = (0, 0);

        for c in s.chars() {
            match c {
                'b' | 'B' => state = Some(State::Birth),
                's' | 'S' => state = Some(State::Survival),
                '/' => {}
                c => {
                    let n = count(c)?;

                    match state {
                        Some(State::Birth) => births |= 1 << n,
                        Some(State::Survival) => survivals |= 1 << n,
                        None => return Err(RuleError::MissingPrefix),
                    }
                }
            }
        }

        Ok(RuleString::new(births, survivals))
    }
}

fn count(c: char) -> Result<u32, RuleError> {
    let n = c.to_digit(10).ok_or(RuleError::InvalidChar { got: c })?;

    if n > 8 {
        return Err(RuleError::CountTooLarge { got: n });
    }

    Ok(n)
}

/// Convert a run of neighbour counts like `23` to its packed bit representation
fn counts(s: &str) -> Result<u16, RuleError> {
    s.chars()
        .try_fold(0u16, |set, c| Ok(set | 1 << count(c)?))
}

/// Why a cell ends up in the state it does after a tick.
///
/// The rules of Conway's Game of Life (B3/S23) only: a live cell survives with two or three live
/// neighbours, a dead cell is born with exactly three.
///
/// See: https://conwaylife.com/wiki/Conway%27s_Game_of_Life
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Transition {
    /// Live cell with fewer than two live neighbours dies
    Underpopulation,

    /// Live cell with two or three live neighbours lives on
    Survival,

    /// Live cell with more than three live neighbours dies
    Overpopulation,

    /// Dead cell with exactly three live neighbours comes alive
    Reproduction,

    /// Dead cell stays dead
    Unchanged,
}

impl Transition {
    pub const fn classify(cell: Cell, live_neighbours: u8) -> Self {
        match (cell, live_neighbours) {
            (Cell::Alive, 0..=1) => Transition::Underpopulation,
            (Cell::Alive, 2..=3) => Transition::Survival,
            (Cell::Alive, _) => Transition::Overpopulation,
            (Cell::Dead, 3) => Transition::Reproduction,
            (Cell::Dead, _) => Transition::Unchanged,
        }
    }

    /// The state of the cell after this transition
    pub const fn outcome(self) -> Cell {
        match self {
            Transition::Survival | Transition::Reproduction => Cell::Alive,
            Transition::Underpopulation | Transition::Overpopulation | Transition::Unchanged => {
                Cell::Dead
            }
        }
    }
}

/// Next state of `cell`, given how many of its neighbours are alive
pub const fn next_state(cell: Cell, live_neighbours: u8) -> Cell {
    Transition::classify(cell, live_neighbours).outcome()
}

#[cfg(test)]
mod test {
    use super::B3S23;
    use super::RuleError;
    use super::RuleString;
    use super::Transition;
    use super::next_state;
    use crate::cell::Cell;

    #[test]
    fn parse_life() {
        for s in ["B3/S23", "b3s23", "B3S23", " b3/s23 ", "S23/B3", "23/3"] {
            let rule: RuleString = s.parse().unwrap();

            assert!(rule.is_life(), "{s:?} should parse as Life, got {rule}");
        }
    }

    #[test]
    fn parse_other_rules() {
        let highlife: RuleString = "B36/S23".parse().unwrap();

        assert!(!highlife.is_life());
        assert_eq!(highlife.births(), 0b100_1000);
        assert_eq!(highlife.to_string(), "B36/S23");

        let seeds: RuleString = "B2/S".parse().unwrap();

        assert_eq!(seeds.survivals(), 0);
        assert_eq!(seeds.to_string(), "B2/S");
    }

    #[test]
    fn parse_invalid_rules() {
        assert_eq!("B9/S23".parse::<RuleString>(), Err(RuleError::CountTooLarge { got: 9 }));
        assert_eq!("3/S23".parse::<RuleString>(), Err(RuleError::MissingPrefix));
        assert_eq!("233".parse::<RuleString>(), Err(RuleError::MissingSlash));
        assert_eq!(
            "B3/S2x".parse::<RuleString>(),
            Err(RuleError::InvalidChar { got: 'x' })
        );
    }

    #[test]
    fn display_life() {
        assert_eq!(B3S23.to_string(), "B3/S23");
    }

    #[test]
    fn rule_table() {
        let cases = [
            (Cell::Alive, 0, Cell::Dead),
            (Cell::Alive, 1, Cell::Dead),
            (Cell::Alive, 2, Cell::Alive),
            (Cell::Alive, 3, Cell::Alive),
            (Cell::Alive, 4, Cell::Dead),
            (Cell::Alive, 8, Cell::Dead),
            (Cell::Dead, 0, Cell::Dead),
            (Cell::Dead, 2, Cell::Dead),
            (Cell::Dead, 3, Cell::Alive),
            (Cell::Dead, 4, Cell::Dead),
            (Cell::Dead, 8, Cell::Dead),
        ];

        for (cell, n, want) in cases {
            let have = next_state(cell, n);

            assert_eq!(have, want, "expected {want:?} for {cell:?} with {n} neighbours");
        }
    }

    #[test]
    fn labels() {
        assert_eq!(Transition::classify(Cell::Alive, 1), Transition::Underpopulation);
        assert_eq!(Transition::classify(Cell::Alive, 3), Transition::Survival);
        assert_eq!(Transition::classify(Cell::Alive, 5), Transition::Overpopulation);
        assert_eq!(Transition::classify(Cell::Dead, 3), Transition::Reproduction);
        assert_eq!(Transition::classify(Cell::Dead, 6), Transition::Unchanged);
    }
}
