use bstr::BString;

/// Configuration for a [`StringStream`](crate::StringStream).
///
/// # Examples
///
/// ```rust
/// use strio::{LineRequest, SharedBuffer, StreamOptions, StringStream};
///
/// let options = StreamOptions {
///     record_separator: ";".into(),
/// };
/// let mut io = StringStream::with_options(SharedBuffer::from("a;b"), "r", options).unwrap();
/// assert_eq!(io.gets(LineRequest::new()).unwrap().unwrap(), "a;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamOptions {
    /// Separator used when a line read asks for the default separator.
    ///
    /// An empty separator puts default line reads in paragraph mode.
    ///
    /// # Default
    ///
    /// `"\n"`
    pub record_separator: BString,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            record_separator: BString::from("\n"),
        }
    }
}

/// Behaviour of the non-blocking read variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonBlock {
    /// Report end of stream as [`StreamError::EndOfStream`](crate::StreamError::EndOfStream)
    /// rather than `Ok(None)`.
    ///
    /// # Default
    ///
    /// `true`
    pub exception: bool,
}

impl Default for NonBlock {
    fn default() -> Self {
        Self { exception: true }
    }
}
