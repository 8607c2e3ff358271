use std::borrow::Cow;

use thiserror::Error;
use tracing::warn;

use crate::parse_util;
use crate::parse_util::ConvertError;
use crate::parse_util::ParseError;
use crate::rules::RuleError;
use crate::rules::RuleString;

/// Metadata of an RLE pattern. The live cells themselves are handed to the callback of
/// [`read_rle`].
#[derive(Debug, Default)]
pub struct RleFile<'a> {
    pub name: Option<Cow<'a, str>>,
    pub author: Option<Cow<'a, str>>,

    /// Where the top left corner of the pattern goes, as `(x, y)`
    pub offset: Option<(i64, i64)>,

    /// Pattern width and height from the header line
    pub size: Option<(usize, usize)>,

    pub rule: RuleString,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),

    #[error("Unsupported rule {rule}, only B3/S23 can be simulated")]
    UnsupportedRule { rule: RuleString },
}

/// Largest pattern width or height accepted
pub const MAX_EXTENT: usize = 1 << 16;

/// Parse the RLE file format. Live cells are reported to `f` as `(x, y)`, with `x` growing to the
/// right and `y` growing downwards from the top left corner of the pattern.
///
/// Every cell must lie within the header's `x` by `y` box, or within [`MAX_EXTENT`] on each side
/// when there is no header.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &'_ [u8], f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(usize, usize),
{
    let mut file = RleFile::default();

    // Parse as many comment lines as possible
    loop {
        bytes = parse_util::take_ws(bytes);

        let (Some(line), rest) = read_line_comment(bytes)? else {
            break;
        };

        match line {
            RleCommentLine::Comment => {}
            RleCommentLine::Name { name } => {
                if file.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                file.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if file.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                file.author = Some(author);
            }
            RleCommentLine::Offset { x, y } => {
                if file.offset.is_some() {
                    warn!("RLE offset already defined. Using latest");
                }

                file.offset = Some((x, y));
            }
            RleCommentLine::Rule { rule } => {
                file.rule = rule;
            }
        }

        bytes = rest;
    }

    // Parse header line, if it's present
    if let (Some(header), rest) = read_line_header(bytes)? {
        let RleHeaderLine {
            width,
            height,
            rule,
        } = header;

        file.size = Some((width, height));

        if let Some(rule) = rule {
            file.rule = rule;
        }

        bytes = rest;
    }

    if !file.rule.is_life() {
        return Err(RleError::UnsupportedRule { rule: file.rule });
    }

    let bounds = file.size.unwrap_or((MAX_EXTENT, MAX_EXTENT));
    read_encoding(bytes, bounds, f)?;

    Ok(file)
}

enum RleCommentLine<'a> {
    Comment,
    Name { name: Cow<'a, str> },
    Author { author: Cow<'a, str> },
    Offset { x: i64, y: i64 },
    Rule { rule: RuleString },
}

#[derive(Debug, Error)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoord(#[from] RleCoordError),

    #[error("Invalid comment type, found '{got}'")]
    InvalidType { got: char },
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(
    bytes: &'_ [u8],
) -> Result<(Option<RleCommentLine<'_>>, &'_ [u8]), RleCommentLineError> {
    let Ok(after_hash) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), after_type) = parse_util::take_1(after_hash) else {
        return Err(RleCommentLineError::NoType);
    };

    let (line, rest) = parse_util::take_line(after_type);
    let text = line.trim_ascii();

    let line = match b {
        b'C' | b'c' => RleCommentLine::Comment,

        b'N' => {
            if text.is_empty() {
                return Err(RleCommentLineError::EmptyName);
            }

            RleCommentLine::Name {
                name: String::from_utf8_lossy(text),
            }
        }

        b'O' => {
            if text.is_empty() {
                return Err(RleCommentLineError::EmptyAuthor);
            }

            RleCommentLine::Author {
                author: String::from_utf8_lossy(text),
            }
        }

        b'P' | b'R' => {
            let (x, y) = read_offset(text)?;

            RleCommentLine::Offset { x, y }
        }

        b'r' => {
            let rule = String::from_utf8_lossy(text).parse::<RuleString>()?;

            RleCommentLine::Rule { rule }
        }

        b => return Err(RleCommentLineError::InvalidType { got: b as char }),
    };

    Ok((Some(line), rest))
}

#[derive(Debug, Error)]
pub enum RleCoordError {
    #[error("Expected x coordinate, found end of line")]
    NoX,

    #[error("Failed to parse x coordinate: {0}")]
    ParseX(#[source] ConvertError),

    #[error("Expected y coordinate, found end of line")]
    NoY,

    #[error("Failed to parse y coordinate: {0}")]
    ParseY(#[source] ConvertError),
}

/// Parse the `x y` pair of a `#P` line
fn read_offset(bytes: &[u8]) -> Result<(i64, i64), RleCoordError> {
    let (Some(x), bytes) = parse_util::take_until_ws(bytes) else {
        return Err(RleCoordError::NoX);
    };
    let x = parse_util::convert(x).map_err(RleCoordError::ParseX)?;

    let bytes = parse_util::take_blank(bytes);
    let (Some(y), _) = parse_util::take_until_ws(bytes) else {
        return Err(RleCoordError::NoY);
    };
    let y = parse_util::convert(y).map_err(RleCoordError::ParseY)?;

    Ok((x, y))
}

struct RleHeaderLine {
    width: usize,
    height: usize,
    rule: Option<RuleString>,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Missing value for '{key}'")]
    MissingValue { key: char },

    #[error("Failed to parse '{key}': {source}")]
    Convert {
        key: char,
        #[source]
        source: ConvertError,
    },

    #[error("Invalid token: expected ',' or end of line, found '{got}'")]
    InvalidToken { got: char },

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("'{key}' is {got}, larger than the maximum of {max}", max = MAX_EXTENT)]
    TooLarge { key: char, got: usize },
}

/// Attempt to parse a header line, otherwise leaves `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<(Option<RleHeaderLine>, &[u8]), RleHeaderLineError> {
    if parse_util::peek_1(bytes) != Some(b'x') {
        return Ok((None, bytes));
    }

    let (line, rest) = parse_util::take_line(bytes);

    let (width, line) = read_assignment(b"x", line)?;
    let width = parse_util::convert::<usize>(width)
        .map_err(|source| RleHeaderLineError::Convert { key: 'x', source })?;
    if width > MAX_EXTENT {
        return Err(RleHeaderLineError::TooLarge {
            key: 'x',
            got: width,
        });
    }

    let line = parse_util::expect(b',', line)?;

    let (height, line) = read_assignment(b"y", line)?;
    let height = parse_util::convert::<usize>(height)
        .map_err(|source| RleHeaderLineError::Convert { key: 'y', source })?;
    if height > MAX_EXTENT {
        return Err(RleHeaderLineError::TooLarge {
            key: 'y',
            got: height,
        });
    }

    let rule = match parse_util::take_1(line) {
        (None, _) => None,
        (Some(b','), line) => {
            let (rule, line) = read_assignment(b"rule", line)?;

            if let (Some(b), _) = parse_util::take_1(line) {
                return Err(RleHeaderLineError::InvalidToken { got: b as char });
            }

            Some(String::from_utf8_lossy(rule).parse::<RuleString>()?)
        }
        (Some(b), _) => return Err(RleHeaderLineError::InvalidToken { got: b as char }),
    };

    let header = RleHeaderLine {
        width,
        height,
        rule,
    };

    Ok((Some(header), rest))
}

/// Parse `key = value` up to the next `,` or the end of the line. The value is trimmed.
fn read_assignment<'a>(
    key: &[u8],
    bytes: &'a [u8],
) -> Result<(&'a [u8], &'a [u8]), RleHeaderLineError> {
    let bytes = parse_util::take_blank(bytes);
    let bytes = parse_util::expect_slice(key, bytes)?;
    let bytes = parse_util::take_blank(bytes);
    let bytes = parse_util::expect(b'=', bytes)?;

    let missing = || RleHeaderLineError::MissingValue {
        key: key.first().map_or('?', |&b| b as char),
    };

    let (Some(value), bytes) = parse_util::take_until(b',', bytes) else {
        return Err(missing());
    };

    let value = value.trim_ascii();
    if value.is_empty() {
        return Err(missing());
    }

    Ok((value, bytes))
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Unexpected EOF, the pattern must end with '!'")]
    UnexpectedEof,

    #[error("Failed to convert run length: {0}")]
    RunLength(#[from] ConvertError),

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },

    #[error("Run of {run} at ({x}, {y}) leaves the {width}x{height} pattern")]
    OutOfBounds {
        x: usize,
        y: usize,
        run: usize,
        width: usize,
        height: usize,
    },
}

/// Decode the pattern body. Runs are checked against `(width, height)` before any cell is
/// reported, so a huge run count fails instead of looping.
fn read_encoding<F>(
    mut bytes: &[u8],
    (width, height): (usize, usize),
    mut f: F,
) -> Result<(), RleEncodingError>
where
    F: FnMut(usize, usize),
{
    let out_of_bounds = |x, y, run| RleEncodingError::OutOfBounds {
        x,
        y,
        run,
        width,
        height,
    };

    let mut rep: usize = 1;

    let (mut x, mut y): (usize, usize) = (0, 0);

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            w if w.is_ascii_whitespace() => {
                bytes = parse_util::take_ws(bytes);
            }

            // End of input
            b'!' => break,

            // Dead cells
            b'b' => {
                bytes = &bytes[1..];

                x = x
                    .checked_add(rep)
                    .filter(|&end| end <= width)
                    .ok_or_else(|| out_of_bounds(x, y, rep))?;
                rep = 1;
            }

            // Live cells
            b'o' => {
                bytes = &bytes[1..];

                let end = x
                    .checked_add(rep)
                    .filter(|&end| end <= width && y < height)
                    .ok_or_else(|| out_of_bounds(x, y, rep))?;

                for i in x..end {
                    f(i, y);
                }

                x = end;
                rep = 1;
            }

            // End of row
            b'$' => {
                bytes = &bytes[1..];

                y = y
                    .checked_add(rep)
                    .filter(|&end| end <= height)
                    .ok_or_else(|| out_of_bounds(x, y, rep))?;
                x = 0;
                rep = 1;
            }

            n if n.is_ascii_digit() => {
                let (Some(n), rest) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes)
                else {
                    unreachable!("We peeked and found a digit")
                };
                bytes = rest;

                rep = parse_util::convert(n)?;
            }

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::RleEncodingError;
    use super::RleError;
    use super::RleHeaderLineError;
    use super::read_rle;

    fn cells(bytes: &[u8]) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        read_rle(bytes, |x, y| cells.push((x, y))).unwrap();

        cells
    }

    #[test]
    fn read_offset() {
        assert_eq!(super::read_offset(b"-3 4").unwrap(), (-3, 4));
        assert!(super::read_offset(b"3").is_err());
        assert!(super::read_offset(b"").is_err());
    }

    #[test]
    fn glider() {
        let bytes = b"#N Glider\n#O Richard K. Guy\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n";

        let mut live = Vec::new();
        let file = read_rle(bytes, |x, y| live.push((x, y))).unwrap();

        assert_eq!(file.name.as_deref(), Some("Glider"));
        assert_eq!(file.author.as_deref(), Some("Richard K. Guy"));
        assert_eq!(file.size, Some((3, 3)));
        assert_eq!(file.offset, None);
        assert_eq!(live, [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn header_without_rule() {
        assert_eq!(cells(b"x = 2, y = 2\n2o$2o!"), [(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn no_header() {
        assert_eq!(cells(b"o$bo!"), [(0, 0), (1, 1)]);
    }

    #[test]
    fn run_of_rows() {
        assert_eq!(cells(b"x = 1, y = 4\no3$o!"), [(0, 0), (0, 3)]);
    }

    #[test]
    fn body_across_lines() {
        assert_eq!(cells(b"x = 3, y = 1\no\r\nbo!"), [(0, 0), (2, 0)]);
    }

    #[test]
    fn offset_comment() {
        let file = read_rle(b"#P -1 2\nx = 1, y = 1\no!", |_, _| {}).unwrap();

        assert_eq!(file.offset, Some((-1, 2)));
    }

    #[test]
    fn unsupported_rule() {
        let res = read_rle(b"x = 1, y = 1, rule = B36/S23\no!", |_, _| {});

        assert!(matches!(res, Err(RleError::UnsupportedRule { .. })));

        let res = read_rle(b"#r 23/36\nx = 1, y = 1\no!", |_, _| {});

        assert!(matches!(res, Err(RleError::UnsupportedRule { .. })));
    }

    #[test]
    fn old_style_life_rule() {
        let res = read_rle(b"#r 23/3\nx = 1, y = 1\no!", |_, _| {});

        assert!(res.is_ok());
    }

    #[test]
    fn missing_terminator() {
        let res = read_rle(b"x = 1, y = 1\no", |_, _| {});

        assert!(matches!(
            res,
            Err(RleError::Encoding(RleEncodingError::UnexpectedEof))
        ));
    }

    #[test]
    fn unknown_tag() {
        let res = read_rle(b"x = 1, y = 1\nq!", |_, _| {});

        assert!(matches!(
            res,
            Err(RleError::Encoding(RleEncodingError::UnrecognizedByte { got: b'q' }))
        ));
    }

    #[test]
    fn huge_runs_are_rejected() {
        let inputs: [&[u8]; 4] = [
            b"x = 1, y = 1\n18446744073709551615b2b!",
            b"x = 1, y = 1\n18446744073709551615o!",
            b"x = 1, y = 1\n18446744073709551615$o!",
            b"18446744073709551615o!",
        ];

        for bytes in inputs {
            let mut n = 0;
            let res = read_rle(bytes, |_, _| n += 1);

            assert!(
                matches!(
                    res,
                    Err(RleError::Encoding(RleEncodingError::OutOfBounds { .. }))
                ),
                "{:?}",
                String::from_utf8_lossy(bytes)
            );
            assert_eq!(n, 0);
        }
    }

    #[test]
    fn run_count_overflowing_usize() {
        let res = read_rle(b"x = 1, y = 1\n99999999999999999999999o!", |_, _| {});

        assert!(matches!(
            res,
            Err(RleError::Encoding(RleEncodingError::RunLength(_)))
        ));
    }

    #[test]
    fn cells_past_the_header() {
        assert!(read_rle(b"x = 2, y = 1\n3o!", |_, _| {}).is_err());
        assert!(read_rle(b"x = 2, y = 1\no$o!", |_, _| {}).is_err());

        // trailing dead cells and row ends up to the edge are fine
        assert!(read_rle(b"x = 2, y = 2\no1b$!", |_, _| {}).is_ok());
    }

    #[test]
    fn header_too_large() {
        let res = read_rle(b"x = 18446744073709551615, y = 1\no!", |_, _| {});

        assert!(matches!(
            res,
            Err(RleError::HeaderLine(RleHeaderLineError::TooLarge { key: 'x', .. }))
        ));
    }

    #[test]
    fn bad_header() {
        assert!(read_rle(b"x = a, y = 1\no!", |_, _| {}).is_err());
        assert!(read_rle(b"x = 1 y = 1\no!", |_, _| {}).is_err());
        assert!(read_rle(b"x = 1, y = \no!", |_, _| {}).is_err());
    }
}
