use alloc::string::String;

use thiserror::Error;

/// Errors returned by [`StringStream`](crate::StringStream) operations.
///
/// A failed operation never changes the stream: position, line number and
/// buffer contents are exactly as they were before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The stream has been closed for both reading and writing.
    #[error("closed stream")]
    Closed,
    /// The stream was not opened for reading, or its read side was closed.
    #[error("not opened for reading")]
    NotReadable,
    /// The stream was not opened for writing, or its write side was closed.
    #[error("not opened for writing")]
    NotWritable,
    /// The mode descriptor could not be parsed.
    #[error("invalid access mode {0}")]
    InvalidMode(String),
    /// A seek would have moved the cursor before the start of the buffer.
    #[error("invalid seek offset {0}")]
    InvalidOffset(i64),
    /// The `whence` value is not one of START, CURRENT or END.
    #[error("invalid whence {0}")]
    InvalidWhence(i32),
    /// `ungetc` was asked to push back more bytes than precede the cursor.
    #[error("cannot push back {len} bytes at position {pos}")]
    UnreadTooLong {
        /// Bytes requested.
        len: usize,
        /// Cursor position at the time of the call.
        pos: usize,
    },
    /// Iterating lines with a limit of zero would never advance.
    #[error("invalid limit: 0 for each_line")]
    ZeroLimit,
    /// `close_read`/`close_write` on a stream that is not open in both
    /// directions.
    #[error("closing non-duplex IO for {0}")]
    NotDuplex(&'static str),
    /// End of stream reached by an operation that treats it as a failure.
    #[error("end of file reached")]
    EndOfStream,
    /// The backing buffer is frozen and cannot be mutated.
    #[error("can't modify frozen buffer")]
    Frozen,
    /// The stream's buffer has been detached.
    #[error("uninitialized stream")]
    Detached,
    /// Growing the buffer to the cursor position would exceed the address
    /// space or fail to allocate.
    #[error("buffer cannot grow to the requested size")]
    CapacityOverflow,
    /// A [`SharedBuffer::borrow`](crate::SharedBuffer::borrow) guard is
    /// still alive, so the buffer cannot be mutated.
    #[error("buffer is borrowed")]
    Borrowed,
}

/// Coarse classification of a [`StreamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`StreamError::Closed`].
    Closed,
    /// See [`StreamError::NotReadable`].
    NotReadable,
    /// See [`StreamError::NotWritable`].
    NotWritable,
    /// Malformed mode, bad seek target or whence, oversized push-back, a
    /// position the buffer cannot grow to.
    InvalidArgument,
    /// See [`StreamError::EndOfStream`].
    EndOfStream,
    /// See [`StreamError::Frozen`] and [`StreamError::Borrowed`].
    ImmutableBuffer,
    /// See [`StreamError::Detached`].
    Detached,
}

impl StreamError {
    /// Returns the [`ErrorKind`] this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Closed => ErrorKind::Closed,
            StreamError::NotReadable => ErrorKind::NotReadable,
            StreamError::NotWritable => ErrorKind::NotWritable,
            StreamError::InvalidMode(_)
            | StreamError::InvalidOffset(_)
            | StreamError::InvalidWhence(_)
            | StreamError::ZeroLimit
            | StreamError::CapacityOverflow
            | StreamError::UnreadTooLong { .. }
            | StreamError::NotDuplex(_) => ErrorKind::InvalidArgument,
            StreamError::EndOfStream => ErrorKind::EndOfStream,
            StreamError::Frozen | StreamError::Borrowed => ErrorKind::ImmutableBuffer,
            StreamError::Detached => ErrorKind::Detached,
        }
    }
}

#[cfg(feature = "std")]
impl From<StreamError> for std::io::Error {
    fn from(err: StreamError) -> Self {
        use std::io::ErrorKind as Io;

        let kind = match err.kind() {
            ErrorKind::Closed | ErrorKind::Detached => Io::NotConnected,
            ErrorKind::NotReadable | ErrorKind::NotWritable | ErrorKind::ImmutableBuffer => {
                Io::PermissionDenied
            }
            ErrorKind::InvalidArgument => Io::InvalidInput,
            ErrorKind::EndOfStream => Io::UnexpectedEof,
        };
        std::io::Error::new(kind, err)
    }
}
