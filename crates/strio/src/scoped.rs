use core::ops::{Deref, DerefMut};

use tracing::debug;

use crate::{SharedBuffer, StreamError, StringStream};

/// A [`StringStream`] that is closed and detached from its buffer when it
/// goes out of scope, whether the scope ends normally, through `?`, or by
/// unwinding.
///
/// # Examples
///
/// ```rust
/// use strio::{ScopedStream, SharedBuffer};
///
/// let buffer = SharedBuffer::from("foo");
/// let mut io = ScopedStream::new(buffer.clone(), "r+").unwrap();
/// io.write("b").unwrap();
/// let io = io.finish();
/// assert!(io.is_closed());
/// assert!(io.buffer().is_none());
/// assert_eq!(buffer, "boo");
/// ```
#[derive(Debug)]
pub struct ScopedStream {
    stream: StringStream,
}

impl ScopedStream {
    /// Opens a guarded stream; see [`StringStream::new`].
    ///
    /// # Errors
    ///
    /// As for [`StringStream::new`].
    pub fn new(buffer: impl Into<SharedBuffer>, mode: &str) -> Result<Self, StreamError> {
        Ok(Self::from(StringStream::new(buffer, mode)?))
    }

    /// Releases the stream now and returns it, closed and detached.
    #[must_use]
    pub fn finish(mut self) -> StringStream {
        release(&mut self.stream);
        core::mem::replace(&mut self.stream, StringStream::released())
    }
}

impl From<StringStream> for ScopedStream {
    fn from(stream: StringStream) -> Self {
        Self { stream }
    }
}

fn release(stream: &mut StringStream) {
    let detached = stream.take_buffer().is_some();
    let closed = stream.shut();
    if detached || closed {
        debug!(detached, closed, "scoped stream released");
    }
}

impl Drop for ScopedStream {
    fn drop(&mut self) {
        release(&mut self.stream);
    }
}

impl Deref for ScopedStream {
    type Target = StringStream;

    fn deref(&self) -> &StringStream {
        &self.stream
    }
}

impl DerefMut for ScopedStream {
    fn deref_mut(&mut self) -> &mut StringStream {
        &mut self.stream
    }
}

impl StringStream {
    /// Runs `body` with a stream over `buffer`, then detaches and closes the
    /// stream on every exit path. Returns what `body` returned.
    ///
    /// ```rust
    /// use strio::{SharedBuffer, StringStream};
    ///
    /// let buffer = SharedBuffer::from("line\n");
    /// let line = StringStream::open(buffer.clone(), "r", |io| io.gets(())).unwrap();
    /// assert_eq!(line.unwrap().unwrap(), "line\n");
    /// assert_eq!(buffer.handle_count(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// As for [`StringStream::new`]; errors from `body` are part of its
    /// return value.
    pub fn open<R>(
        buffer: impl Into<SharedBuffer>,
        mode: &str,
        body: impl FnOnce(&mut StringStream) -> R,
    ) -> Result<R, StreamError> {
        let mut scoped = ScopedStream::new(buffer, mode)?;
        Ok(body(&mut scoped))
    }
}
