//! Line requests and the line scanner behind `gets`.
//!
//! A line read takes an optional separator and an optional byte limit. The
//! scanner works on the raw buffer and only computes the span of the next
//! line; the stream owns the cursor bookkeeping.
//!
//! Separator policy
//! - `Default`: the stream's record separator (`"\n"` unless configured).
//! - `Bytes(sep)`: one byte is matched with a byte search, several bytes with
//!   a substring search. The match is included in the line.
//! - `Paragraph` (or an empty `Bytes`): leading newlines are skipped, then the
//!   line runs through the first blank line (`"\n\n"`).
//! - `None`: the rest of the buffer.
//!
//! Limits
//! - The search range is capped to `limit` bytes before searching. In text
//!   mode a cap that would split a UTF-8 sequence is moved forward to the end
//!   of that sequence.
//! - In paragraph mode the limit counts from the first non-newline byte.

use bstr::{BString, ByteSlice};

/// Which separator a line read uses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Separator {
    /// The stream's configured record separator.
    #[default]
    Default,
    /// An explicit separator. An empty one means paragraph mode.
    Bytes(BString),
    /// Split on blank lines.
    Paragraph,
    /// No separator: read to the end of the buffer.
    None,
}

/// Arguments of a line read: which separator to stop at and how many bytes
/// to consume at most.
///
/// The `From` conversions mirror the usual call forms:
///
/// ```rust
/// use strio::{LineRequest, Separator};
///
/// assert_eq!(LineRequest::from(()), LineRequest::new());
/// assert_eq!(LineRequest::from(">").separator, Separator::Bytes(">".into()));
/// assert_eq!(LineRequest::from(2usize).limit, Some(2));
/// assert_eq!(LineRequest::from(None::<&str>).separator, Separator::None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRequest {
    /// Separator to stop at.
    pub separator: Separator,
    /// Upper bound on the bytes consumed; `Some(0)` yields an empty line.
    pub limit: Option<usize>,
}

impl LineRequest {
    /// Default separator, no limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops at `sep`; an empty separator selects paragraph mode.
    #[must_use]
    pub fn separator(sep: impl Into<BString>) -> Self {
        Self {
            separator: Separator::Bytes(sep.into()),
            limit: None,
        }
    }

    /// Splits on blank lines.
    #[must_use]
    pub fn paragraph() -> Self {
        Self {
            separator: Separator::Paragraph,
            limit: None,
        }
    }

    /// Reads to the end of the buffer.
    #[must_use]
    pub fn to_end() -> Self {
        Self {
            separator: Separator::None,
            limit: None,
        }
    }

    /// Default separator with a byte limit.
    #[must_use]
    pub fn limited(limit: usize) -> Self {
        Self::new().with_limit(limit)
    }

    /// Sets the byte limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl From<()> for LineRequest {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl From<Separator> for LineRequest {
    fn from(separator: Separator) -> Self {
        Self {
            separator,
            limit: None,
        }
    }
}

impl From<&str> for LineRequest {
    fn from(sep: &str) -> Self {
        Self::separator(sep)
    }
}

impl From<&[u8]> for LineRequest {
    fn from(sep: &[u8]) -> Self {
        Self::separator(sep)
    }
}

impl From<usize> for LineRequest {
    fn from(limit: usize) -> Self {
        Self::limited(limit)
    }
}

impl From<Option<&str>> for LineRequest {
    fn from(sep: Option<&str>) -> Self {
        sep.map_or_else(Self::to_end, Self::separator)
    }
}

impl<S: Into<LineRequest>> From<(S, usize)> for LineRequest {
    fn from((sep, limit): (S, usize)) -> Self {
        sep.into().with_limit(limit)
    }
}

impl<S: Into<LineRequest>> From<(S, Option<usize>)> for LineRequest {
    fn from((sep, limit): (S, Option<usize>)) -> Self {
        let mut request = sep.into();
        request.limit = limit;
        request
    }
}

/// A separator after the stream's default has been substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolved<'a> {
    Paragraph,
    Byte(u8),
    Bytes(&'a [u8]),
    ToEnd,
}

impl<'a> Resolved<'a> {
    pub(crate) fn new(separator: &'a Separator, default: &'a [u8]) -> Self {
        let bytes = match separator {
            Separator::Default => default,
            Separator::Bytes(sep) => sep.as_slice(),
            Separator::Paragraph => return Resolved::Paragraph,
            Separator::None => return Resolved::ToEnd,
        };
        match bytes {
            [] => Resolved::Paragraph,
            [b] => Resolved::Byte(*b),
            _ => Resolved::Bytes(bytes),
        }
    }
}

/// Byte range `[start, end)` of the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// End of the search range starting at `from`.
fn scan_end(buf: &[u8], from: usize, limit: Option<usize>, binary: bool) -> usize {
    let len = buf.len();
    match limit {
        Some(limit) if limit < len - from => {
            let mut end = from + limit;
            if !binary {
                while end < len && is_continuation(buf[end]) {
                    end += 1;
                }
            }
            end
        }
        _ => len,
    }
}

/// Finds the next line at or after `pos`. `None` means end of stream.
pub(crate) fn scan(
    buf: &[u8],
    pos: usize,
    sep: Resolved<'_>,
    limit: Option<usize>,
    binary: bool,
) -> Option<Span> {
    if pos >= buf.len() {
        return None;
    }

    if let Resolved::Paragraph = sep {
        let start = pos + buf[pos..].iter().position(|&b| b != b'\n')?;
        let end = scan_end(buf, start, limit, binary);
        let stop = buf[start..end].find(b"\n\n").map_or(end, |i| start + i + 2);
        return Some(Span { start, end: stop });
    }

    let end = scan_end(buf, pos, limit, binary);
    let hay = &buf[pos..end];
    let stop = match sep {
        Resolved::Byte(b) => hay.find_byte(b).map_or(end, |i| pos + i + 1),
        Resolved::Bytes(sep) => hay.find(sep).map_or(end, |i| pos + i + sep.len()),
        Resolved::ToEnd | Resolved::Paragraph => end,
    };
    Some(Span { start: pos, end: stop })
}
