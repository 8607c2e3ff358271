use std::str::FromStr;
use std::str::Utf8Error;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unexpected end of file, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },

    #[error("Expected \"{exp}\", but got \"{got}\"")]
    UnexpectedSlice { exp: String, got: String },
}

/// Consumes every leading ascii whitespace byte, newlines included.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let n = bytes
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();

    &bytes[n..]
}

/// Like `take_ws`, but only consumes spaces and tabs, so it never leaves the current line.
pub fn take_blank(bytes: &[u8]) -> &[u8] {
    let n = bytes
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();

    &bytes[n..]
}

/// Splits off the current line. The line excludes its terminator (`\n` or `\r\n`), which is
/// consumed. The last line of the input does not need a terminator.
pub fn take_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    let (line, rest) = match bytes.iter().position(|&b| b == b'\n') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    };

    let line = line.strip_suffix(b"\r").unwrap_or(line);

    (line, rest)
}

/// Takes the next byte from the slice. If there is none, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Like `take_1`, but doesn't consume the byte
pub const fn peek_1(bytes: &[u8]) -> Option<u8> {
    let [b, ..] = bytes else { return None };

    Some(*b)
}

/// Expects the next byte in `bytes` to be `b` and consumes it.
pub fn expect(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

/// Expects `bytes` to start with `bs` and consumes it.
pub fn expect_slice<'a>(bs: &[u8], bytes: &'a [u8]) -> ParseResult<&'a [u8]> {
    if let Some(rest) = bytes.strip_prefix(bs) {
        return Ok(rest);
    }

    let n = bs.len().min(bytes.len());

    Err(ParseError::UnexpectedSlice {
        exp: String::from_utf8_lossy(bs).to_string(),
        got: String::from_utf8_lossy(&bytes[..n]).to_string(),
    })
}

/// Advance the slice until `p` is satisfied or the input ends, without consuming the byte that
/// satisfied `p`.
///
/// Returns `None`, leaving `bytes` as-is, if nothing was taken.
pub fn take_until_fn<P>(p: P, bytes: &[u8]) -> (Option<&[u8]>, &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&b| p(b)).unwrap_or(bytes.len());

    if i == 0 {
        return (None, bytes);
    }

    let (res, bytes) = bytes.split_at(i);

    (Some(res), bytes)
}

/// Like `take_until_fn`, stopping at byte `b`.
pub fn take_until(b: u8, bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    take_until_fn(|a| a == b, bytes)
}

/// Like `take_until_fn`, stopping at the first ascii whitespace byte.
pub fn take_until_ws(bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    take_until_fn(|a| a.is_ascii_whitespace(), bytes)
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error parsing bytes from UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let str = std::str::from_utf8(bytes)?;

    str.parse::<T>().map_err(|_| ConvertError::ParseError {
        str: str.to_string(),
    })
}
