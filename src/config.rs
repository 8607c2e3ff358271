use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::render::Glyphs;
use crate::render::Style;
use crate::screen::Mode;
use crate::seed::DEFAULT_DENSITY;
use crate::seed::DEFAULT_SEED;

/// Conway's Game of Life on a fixed size grid, drawn in the terminal until it settles.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Number of rows in the grid
    #[arg(long, default_value_t = 10)]
    pub rows: usize,

    /// Number of columns in the grid
    #[arg(long, default_value_t = 50)]
    pub cols: usize,

    /// Seed for the random initial grid
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Probability of a cell starting out alive
    #[arg(long, default_value_t = DEFAULT_DENSITY)]
    pub density: f64,

    /// Pause between generations, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Stop after this many generations (at least 1), even if the grid is still changing
    #[arg(long)]
    pub max_generations: Option<u64>,

    /// Start from an RLE pattern file instead of a random grid
    #[arg(long, value_name = "FILE")]
    pub pattern: Option<PathBuf>,

    /// Glyph for live cells
    #[arg(long, default_value_t = '•')]
    pub alive: char,

    /// Glyph for dead cells
    #[arg(long, default_value_t = ' ')]
    pub dead: char,

    /// Pack 2x4 cells into each braille character
    #[arg(long, conflicts_with_all = ["alive", "dead"])]
    pub braille: bool,

    /// Print every generation below the last instead of animating in place
    #[arg(long)]
    pub plain: bool,
}

/// Where the first generation comes from
#[derive(Debug, PartialEq, Clone)]
pub enum Source {
    Random { seed: u64, density: f64 },
    Pattern(PathBuf),
}

/// Everything the simulation needs to know, checked
#[derive(Debug, PartialEq, Clone)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub source: Source,
    pub delay: Duration,
    pub max_generations: Option<u64>,
    pub style: Style,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 50,
            source: Source::Random {
                seed: DEFAULT_SEED,
                density: DEFAULT_DENSITY,
            },
            delay: Duration::from_millis(50),
            max_generations: None,
            style: Style::default(),
            mode: Mode::Animate,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("The grid needs at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("Density must be between 0 and 1, got {got}")]
    InvalidDensity { got: f64 },

    #[error("The grid is too tall for the terminal: {rows} rows")]
    TooManyRows { rows: usize },

    #[error("At least one generation has to run, got --max-generations=0")]
    NoGenerations,
}

impl Cli {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let Cli {
            rows,
            cols,
            seed,
            density,
            delay_ms,
            max_generations,
            pattern,
            alive,
            dead,
            braille,
            plain,
        } = self;

        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyGrid { rows, cols });
        }

        // The cursor moves back over a frame by its line count, a `u16`
        if rows > u16::MAX as usize {
            return Err(ConfigError::TooManyRows { rows });
        }

        if !(0.0..=1.0).contains(&density) {
            return Err(ConfigError::InvalidDensity { got: density });
        }

        // The first generation is computed and drawn before the limit is looked at
        if max_generations == Some(0) {
            return Err(ConfigError::NoGenerations);
        }

        let source = match pattern {
            Some(path) => Source::Pattern(path),
            None => Source::Random { seed, density },
        };

        let style = if braille {
            Style::Braille
        } else {
            Style::Glyphs(Glyphs { alive, dead })
        };

        let mode = if plain { Mode::Plain } else { Mode::Animate };

        Ok(Config {
            rows,
            cols,
            source,
            delay: Duration::from_millis(delay_ms),
            max_generations,
            style,
            mode,
        })
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;
    use std::time::Duration;

    use clap::CommandFactory;
    use clap::Parser;

    use super::Cli;
    use super::Config;
    use super::ConfigError;
    use super::Source;
    use crate::render::Glyphs;
    use crate::render::Style;
    use crate::screen::Mode;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        let args = std::iter::once("gridlife").chain(args.iter().copied());

        Cli::try_parse_from(args).unwrap().into_config()
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(&[]).unwrap(), Config::default());
    }

    #[test]
    fn all_flags() {
        let config = parse(&[
            "--rows=20",
            "--cols=30",
            "--delay-ms=0",
            "--max-generations=100",
            "--pattern=glider.rle",
            "--alive=#",
            "--dead=.",
            "--plain",
        ])
        .unwrap();

        assert_eq!(config.rows, 20);
        assert_eq!(config.cols, 30);
        assert_eq!(config.delay, Duration::ZERO);
        assert_eq!(config.max_generations, Some(100));
        assert_eq!(config.source, Source::Pattern(PathBuf::from("glider.rle")));
        assert_eq!(
            config.style,
            Style::Glyphs(Glyphs {
                alive: '#',
                dead: '.'
            })
        );
        assert_eq!(config.mode, Mode::Plain);
    }

    #[test]
    fn random_source() {
        let config = parse(&["--seed=7", "--density=0.5", "--braille"]).unwrap();

        assert_eq!(
            config.source,
            Source::Random {
                seed: 7,
                density: 0.5
            }
        );
        assert_eq!(config.style, Style::Braille);
    }

    #[test]
    fn invalid() {
        assert_eq!(
            parse(&["--rows=0"]),
            Err(ConfigError::EmptyGrid { rows: 0, cols: 50 })
        );
        assert_eq!(
            parse(&["--density=1.5"]),
            Err(ConfigError::InvalidDensity { got: 1.5 })
        );
        assert_eq!(
            parse(&["--rows=70000"]),
            Err(ConfigError::TooManyRows { rows: 70000 })
        );
        assert_eq!(
            parse(&["--max-generations=0"]),
            Err(ConfigError::NoGenerations)
        );
        assert_eq!(parse(&["--max-generations=1"]).unwrap().max_generations, Some(1));
    }

    #[test]
    fn braille_conflicts_with_glyphs() {
        let res = Cli::try_parse_from(["gridlife", "--braille", "--alive=#"]);

        assert!(res.is_err());
    }
}
