use tracing::debug;
use tracing::info;

use crate::engine;
use crate::grid::Grid;

/// What the caller of [`run`] wants after seeing a generation
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Control {
    Continue,
    Quit,
}

/// Why [`run`] stopped
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Outcome {
    /// The last generation equals the one before it
    FixedPoint { generations: u64, grid: Grid },

    /// The generation limit was reached
    Limit { generations: u64, grid: Grid },

    /// The caller asked to stop
    Quit { generations: u64, grid: Grid },
}

impl Outcome {
    /// Number of generations computed
    pub fn generations(&self) -> u64 {
        match self {
            Outcome::FixedPoint { generations, .. }
            | Outcome::Limit { generations, .. }
            | Outcome::Quit { generations, .. } => *generations,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Outcome::FixedPoint { .. } => "fixed point",
            Outcome::Limit { .. } => "generation limit",
            Outcome::Quit { .. } => "quit",
        }
    }

    /// The last generation computed
    pub fn grid(&self) -> &Grid {
        match self {
            Outcome::FixedPoint { grid, .. }
            | Outcome::Limit { grid, .. }
            | Outcome::Quit { grid, .. } => grid,
        }
    }
}

/// Advance `initial` until it stops changing.
///
/// Every new generation is passed to `on_generation`, along with its number (starting at `1`), so
/// it can be drawn. `initial` itself is not. The run also ends once `limit` generations have been
/// computed, or when `on_generation` returns [`Control::Quit`].
///
/// Only period 1 fixed points are detected. Oscillators and spaceships run until `limit`.
pub fn run<F>(initial: Grid, limit: Option<u64>, mut on_generation: F) -> anyhow::Result<Outcome>
where
    F: FnMut(u64, &Grid) -> anyhow::Result<Control>,
{
    let mut prev = initial;
    let mut generation: u64 = 0;

    loop {
        let (next, census) = engine::step(&prev);
        generation += 1;

        debug!(
            generation,
            population = next.population(),
            births = census.births,
            deaths = census.deaths,
            "tick"
        );

        let control = on_generation(generation, &next)?;

        let outcome = if next == prev {
            Some(Outcome::FixedPoint {
                generations: generation,
                grid: next,
            })
        } else if control == Control::Quit {
            Some(Outcome::Quit {
                generations: generation,
                grid: next,
            })
        } else if limit.is_some_and(|limit| generation >= limit) {
            Some(Outcome::Limit {
                generations: generation,
                grid: next,
            })
        } else {
            prev = next;
            None
        };

        if let Some(outcome) = outcome {
            info!(generations = generation, reason = outcome.reason(), "simulation stopped");

            return Ok(outcome);
        }
    }
}

#[cfg(test)]
mod test {
    use super::Control;
    use super::Outcome;
    use super::run;
    use crate::grid::Grid;

    #[test]
    fn empty_grid_is_a_fixed_point() {
        let grid = Grid::new(3, 3).unwrap();
        let mut seen = Vec::new();

        let outcome = run(grid.clone(), None, |n, g| {
            seen.push((n, g.clone()));
            Ok(Control::Continue)
        })
        .unwrap();

        assert_eq!(
            outcome,
            Outcome::FixedPoint {
                generations: 1,
                grid: grid.clone()
            }
        );
        assert_eq!(seen, [(1, grid)]);
    }

    #[test]
    fn limit_stops_blinker() {
        let blinker: Grid = "
            ...
            OOO
            ...
        "
        .parse()
        .unwrap();

        let outcome = run(blinker.clone(), Some(5), |_, _| Ok(Control::Continue)).unwrap();

        assert!(matches!(outcome, Outcome::Limit { generations: 5, .. }));
        assert_ne!(outcome.grid(), &blinker);
    }

    #[test]
    fn quit_from_callback() {
        let blinker: Grid = "
            ...
            OOO
            ...
        "
        .parse()
        .unwrap();

        let outcome = run(blinker, None, |n, _| {
            Ok(if n == 3 { Control::Quit } else { Control::Continue })
        })
        .unwrap();

        assert_eq!(outcome.generations(), 3);
        assert!(matches!(outcome, Outcome::Quit { .. }));
    }

    #[test]
    fn callback_error_propagates() {
        let grid = Grid::new(2, 2).unwrap();

        let res = run(grid, None, |_, _| anyhow::bail!("screen went away"));

        assert!(res.is_err());
    }
}
