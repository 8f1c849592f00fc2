//! The stream cursor over a [`SharedBuffer`].
//!
//! State
//! - `buffer`: shared with the caller and with every duplicate. `None` once
//!   detached.
//! - `pos`: byte offset of the next read or write. It may lie past the end of
//!   the buffer; a write there pads the gap with NUL bytes.
//! - `lineno`: number of lines returned by `gets` since the last rewind.
//! - `flags`: fixed at construction, except that closing clears the
//!   READABLE/WRITABLE bits.
//!
//! Every operation checks permissions first and only then touches the
//! buffer, so a failed call leaves the stream and the buffer as they were.

use alloc::{string::ToString, vec::Vec};

use bstr::BString;
use tracing::{debug, trace};

use crate::{
    LineRequest, ModeFlags, NonBlock, SharedBuffer, StreamError, StreamOptions,
    buffer::resize_to,
    line::{self, Resolved},
    lines::Lines,
};

/// Reference point of a [`StringStream::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Offset from the start of the buffer.
    Start = 0,
    /// Offset from the current position.
    Current = 1,
    /// Offset from the end of the buffer.
    End = 2,
}

impl TryFrom<i32> for Whence {
    type Error = StreamError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Whence::Start),
            1 => Ok(Whence::Current),
            2 => Ok(Whence::End),
            _ => Err(StreamError::InvalidWhence(value)),
        }
    }
}

/// A file-like cursor over an in-memory byte buffer.
///
/// `Clone` duplicates the cursor: the copy shares the buffer but keeps its
/// own position, line number and open state.
///
/// # Examples
///
/// ```rust
/// use strio::{SharedBuffer, StringStream};
///
/// let buffer = SharedBuffer::new();
/// let mut io = StringStream::new(buffer.clone(), "w+").unwrap();
/// io.puts(["hello", "world"]).unwrap();
/// assert_eq!(buffer, "hello\nworld\n");
///
/// io.rewind();
/// assert_eq!(io.gets(()).unwrap().unwrap(), "hello\n");
/// assert_eq!(io.lineno(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StringStream {
    buffer: Option<SharedBuffer>,
    pos: usize,
    lineno: usize,
    flags: ModeFlags,
    options: StreamOptions,
}

impl Default for StringStream {
    /// An empty buffer opened `r+`.
    fn default() -> Self {
        Self {
            buffer: Some(SharedBuffer::new()),
            pos: 0,
            lineno: 0,
            flags: ModeFlags::default(),
            options: StreamOptions::default(),
        }
    }
}

fn truncate_on_open(buffer: &SharedBuffer) -> Result<(), StreamError> {
    buffer.modify(|bytes| {
        if !bytes.is_empty() {
            debug!(len = bytes.len(), "truncating buffer on open");
        }
        bytes.clear();
    })
}

/// The buffer if reads are permitted.
fn readable(flags: ModeFlags, buffer: Option<&SharedBuffer>) -> Result<&SharedBuffer, StreamError> {
    if !flags.is_readable() {
        return Err(if flags.is_closed() {
            StreamError::Closed
        } else {
            StreamError::NotReadable
        });
    }
    buffer.ok_or(StreamError::Detached)
}

/// The buffer if writes are permitted.
fn writable(flags: ModeFlags, buffer: Option<&SharedBuffer>) -> Result<&SharedBuffer, StreamError> {
    if !flags.is_writable() {
        return Err(if flags.is_closed() {
            StreamError::Closed
        } else {
            StreamError::NotWritable
        });
    }
    buffer.ok_or(StreamError::Detached)
}

impl StringStream {
    /// Opens `buffer` with a mode descriptor (see [`ModeFlags::parse`]).
    ///
    /// Modes that truncate (`w`, `w+`) clear the buffer immediately.
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidMode`] for a malformed descriptor, or
    /// [`StreamError::Frozen`] when a truncating mode meets a frozen buffer.
    pub fn new(buffer: impl Into<SharedBuffer>, mode: &str) -> Result<Self, StreamError> {
        Self::with_options(buffer, mode, StreamOptions::default())
    }

    /// Like [`new`](Self::new), with explicit options.
    ///
    /// # Errors
    ///
    /// As for [`new`](Self::new).
    pub fn with_options(
        buffer: impl Into<SharedBuffer>,
        mode: &str,
        options: StreamOptions,
    ) -> Result<Self, StreamError> {
        Self::from_mode(buffer, ModeFlags::parse(mode)?, options)
    }

    /// Opens `buffer` with already parsed flags.
    ///
    /// # Errors
    ///
    /// [`StreamError::Frozen`] when `flags` truncate a frozen buffer.
    pub fn from_mode(
        buffer: impl Into<SharedBuffer>,
        flags: ModeFlags,
        options: StreamOptions,
    ) -> Result<Self, StreamError> {
        let buffer = buffer.into();
        if flags.is_truncate() {
            truncate_on_open(&buffer)?;
        }
        Ok(Self {
            buffer: Some(buffer),
            pos: 0,
            lineno: 0,
            flags,
            options,
        })
    }

    /// A closed stream without a buffer.
    pub(crate) fn released() -> Self {
        Self {
            buffer: None,
            pos: 0,
            lineno: 0,
            flags: ModeFlags::empty(),
            options: StreamOptions::default(),
        }
    }

    // --------------------------------------------------------------------------------------------
    // Open state
    // --------------------------------------------------------------------------------------------

    /// Closes both directions.
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] if the stream is already closed.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.is_closed() {
            return Err(StreamError::Closed);
        }
        self.shut();
        Ok(())
    }

    /// Clears both permission bits; returns whether the stream was open.
    pub(crate) fn shut(&mut self) -> bool {
        let was_open = !self.is_closed();
        self.flags.remove(ModeFlags::READWRITE);
        if was_open {
            debug!(pos = self.pos, lineno = self.lineno, "stream closed");
        }
        was_open
    }

    /// Closes the read side.
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] if already closed, [`StreamError::NotDuplex`]
    /// if the read side is not open.
    pub fn close_read(&mut self) -> Result<(), StreamError> {
        self.close_side(ModeFlags::READABLE, "reading")
    }

    /// Closes the write side.
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] if already closed, [`StreamError::NotDuplex`]
    /// if the write side is not open.
    pub fn close_write(&mut self) -> Result<(), StreamError> {
        self.close_side(ModeFlags::WRITABLE, "writing")
    }

    fn close_side(&mut self, side: ModeFlags, name: &'static str) -> Result<(), StreamError> {
        if self.is_closed() {
            return Err(StreamError::Closed);
        }
        if !self.flags.contains(side) {
            return Err(StreamError::NotDuplex(name));
        }
        self.flags.remove(side);
        if self.is_closed() {
            debug!(side = name, "stream closed");
        }
        Ok(())
    }

    /// Neither direction is open.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.flags.is_closed()
    }

    /// The read side is not open.
    #[must_use]
    pub fn is_closed_read(&self) -> bool {
        !self.flags.is_readable()
    }

    /// The write side is not open.
    #[must_use]
    pub fn is_closed_write(&self) -> bool {
        !self.flags.is_writable()
    }

    /// Current mode flags.
    #[must_use]
    pub fn mode(&self) -> ModeFlags {
        self.flags
    }

    /// Options this stream was opened with.
    #[must_use]
    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    // --------------------------------------------------------------------------------------------
    // Buffer handle
    // --------------------------------------------------------------------------------------------

    /// The buffer, unless detached.
    #[must_use]
    pub fn buffer(&self) -> Option<&SharedBuffer> {
        self.buffer.as_ref()
    }

    /// Detaches the buffer. Later operations fail with
    /// [`StreamError::Detached`].
    pub fn take_buffer(&mut self) -> Option<SharedBuffer> {
        self.buffer.take()
    }

    /// Swaps in a new buffer, resets the cursor and reopens for reading and
    /// writing (reading only if the buffer is frozen).
    pub fn set_buffer(&mut self, buffer: impl Into<SharedBuffer>) {
        let buffer = buffer.into();
        self.flags = if buffer.is_frozen() {
            ModeFlags::READABLE
        } else {
            ModeFlags::READWRITE
        };
        self.buffer = Some(buffer);
        self.pos = 0;
        self.lineno = 0;
    }

    /// Reopens over another buffer with a new mode and resets the cursor.
    ///
    /// # Errors
    ///
    /// As for [`new`](Self::new); on error the stream is unchanged.
    pub fn reopen(&mut self, buffer: impl Into<SharedBuffer>, mode: &str) -> Result<(), StreamError> {
        let flags = ModeFlags::parse(mode)?;
        let buffer = buffer.into();
        if flags.is_truncate() {
            truncate_on_open(&buffer)?;
        }
        debug!(mode, "stream reopened");
        self.buffer = Some(buffer);
        self.flags = flags;
        self.pos = 0;
        self.lineno = 0;
        Ok(())
    }

    /// Adopts `other`'s buffer, mode and options and resets the cursor.
    pub fn reopen_from(&mut self, other: &StringStream) {
        debug!(mode = ?other.flags, "stream reopened from another stream");
        self.buffer.clone_from(&other.buffer);
        self.flags = other.flags;
        self.options.clone_from(&other.options);
        self.pos = 0;
        self.lineno = 0;
    }

    // --------------------------------------------------------------------------------------------
    // Position
    // --------------------------------------------------------------------------------------------

    /// Moves the cursor and returns the new position.
    ///
    /// There is no upper bound: seeking past the end is allowed and a later
    /// write pads the gap with NUL bytes.
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] on a closed stream, [`StreamError::InvalidOffset`]
    /// if the target would be negative, [`StreamError::Detached`] when seeking
    /// from the end of a detached buffer.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize, StreamError> {
        if self.is_closed() {
            return Err(StreamError::Closed);
        }
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.pos,
            Whence::End => self.size()?,
        };
        let target = isize::try_from(offset)
            .ok()
            .and_then(|offset| base.checked_add_signed(offset))
            .ok_or(StreamError::InvalidOffset(offset))?;

        if self.buffer.as_ref().is_some_and(|b| target > b.len()) {
            trace!(pos = target, "seek beyond end of buffer");
        }
        self.pos = target;
        Ok(target)
    }

    /// Resets position and line number to zero.
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.lineno = 0;
    }

    /// Current byte offset.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Alias of [`pos`](Self::pos).
    #[must_use]
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to an absolute offset.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Lines read since the last rewind.
    #[must_use]
    pub fn lineno(&self) -> usize {
        self.lineno
    }

    /// Overrides the line counter.
    pub fn set_lineno(&mut self, lineno: usize) {
        self.lineno = lineno;
    }

    /// Length of the buffer.
    ///
    /// # Errors
    ///
    /// [`StreamError::Detached`] if the buffer was detached.
    pub fn size(&self) -> Result<usize, StreamError> {
        self.buffer
            .as_ref()
            .map(SharedBuffer::len)
            .ok_or(StreamError::Detached)
    }

    /// Alias of [`size`](Self::size).
    ///
    /// # Errors
    ///
    /// As for [`size`](Self::size).
    pub fn length(&self) -> Result<usize, StreamError> {
        self.size()
    }

    /// The cursor is at or past the end of the buffer.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.pos >= self.buffer.as_ref().map_or(0, SharedBuffer::len)
    }

    // --------------------------------------------------------------------------------------------
    // Writing
    // --------------------------------------------------------------------------------------------

    /// Writes `data` at the cursor, overwriting what is there and growing
    /// the buffer only as needed. Returns the number of bytes written.
    ///
    /// In append mode the cursor first moves to the end of the buffer.
    ///
    /// # Errors
    ///
    /// [`StreamError::NotWritable`] / [`StreamError::Closed`] without write
    /// permission, [`StreamError::Frozen`] for a frozen buffer,
    /// [`StreamError::CapacityOverflow`] if the buffer cannot grow to the
    /// end of the write.
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> Result<usize, StreamError> {
        let data = data.as_ref();
        let buffer = writable(self.flags, self.buffer.as_ref())?;
        if data.is_empty() {
            buffer.ensure_mutable()?;
            return Ok(0);
        }

        let append = self.flags.is_append();
        let pos = self.pos;
        let end = buffer.try_modify(|bytes| {
            let start = if append { bytes.len() } else { pos };
            let end = start
                .checked_add(data.len())
                .ok_or(StreamError::CapacityOverflow)?;
            let gap = start.saturating_sub(bytes.len());
            if end > bytes.len() {
                resize_to(bytes, end)?;
            }
            if gap > 0 {
                trace!(gap, "padded buffer with NUL bytes");
            }
            bytes[start..end].copy_from_slice(data);
            Ok(end)
        })?;

        self.pos = end;
        Ok(data.len())
    }

    /// Writes each value's `Display` output with no separator.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    pub fn print<I>(&mut self, values: I) -> Result<(), StreamError>
    where
        I: IntoIterator,
        I::Item: core::fmt::Display,
    {
        for value in values {
            self.write(value.to_string())?;
        }
        Ok(())
    }

    /// Writes each value followed by a newline unless it already ends with
    /// one. With no values, writes a single newline.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    pub fn puts<I>(&mut self, values: I) -> Result<(), StreamError>
    where
        I: IntoIterator,
        I::Item: core::fmt::Display,
    {
        let mut any = false;
        for value in values {
            any = true;
            let mut line = value.to_string();
            if !line.ends_with('\n') {
                line.push('\n');
            }
            self.write(line)?;
        }
        if !any {
            self.write("\n")?;
        }
        Ok(())
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    pub fn putc(&mut self, byte: u8) -> Result<(), StreamError> {
        self.write([byte]).map(drop)
    }

    /// Resizes the buffer to `len` bytes, padding with NUL when growing. The
    /// cursor does not move.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    pub fn truncate(&mut self, len: usize) -> Result<(), StreamError> {
        writable(self.flags, self.buffer.as_ref())?.try_modify(|bytes| resize_to(bytes, len))
    }

    // --------------------------------------------------------------------------------------------
    // Reading
    // --------------------------------------------------------------------------------------------

    /// Reads up to `length` bytes, or everything up to the end for `None`.
    ///
    /// At the end of the buffer an explicit non-zero length yields
    /// `Ok(None)`, while `None` yields an empty string. A length of zero
    /// always yields an empty string.
    ///
    /// # Errors
    ///
    /// [`StreamError::NotReadable`] / [`StreamError::Closed`] without read
    /// permission.
    pub fn read(&mut self, length: Option<usize>) -> Result<Option<BString>, StreamError> {
        let mut out = Vec::new();
        Ok(self.read_into(length, &mut out)?.map(|_| BString::from(out)))
    }

    /// Like [`read`](Self::read), but replaces the contents of `out` and
    /// returns the number of bytes read. `out` is cleared at end of stream.
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read).
    pub fn read_into(
        &mut self,
        length: Option<usize>,
        out: &mut Vec<u8>,
    ) -> Result<Option<usize>, StreamError> {
        let buffer = readable(self.flags, self.buffer.as_ref())?;
        let bytes = buffer.borrow();
        out.clear();

        let remaining = bytes.len().saturating_sub(self.pos);
        let n = match length {
            Some(0) => 0,
            Some(_) if remaining == 0 => return Ok(None),
            Some(len) => len.min(remaining),
            None => remaining,
        };
        if n > 0 {
            out.extend_from_slice(&bytes[self.pos..self.pos + n]);
            self.pos += n;
        }
        Ok(Some(n))
    }

    /// Copies into `out` without allocating; `0` at end of stream.
    #[cfg(feature = "std")]
    pub(crate) fn read_slice(&mut self, out: &mut [u8]) -> Result<usize, StreamError> {
        let buffer = readable(self.flags, self.buffer.as_ref())?;
        let bytes = buffer.borrow();
        let n = out.len().min(bytes.len().saturating_sub(self.pos));
        if n > 0 {
            out[..n].copy_from_slice(&bytes[self.pos..self.pos + n]);
            self.pos += n;
        }
        Ok(n)
    }

    /// Like [`read`](Self::read), but end of stream is an error.
    ///
    /// # Errors
    ///
    /// [`StreamError::EndOfStream`] where `read` would return `Ok(None)`,
    /// otherwise as for [`read`](Self::read).
    pub fn sysread(&mut self, length: Option<usize>) -> Result<BString, StreamError> {
        self.read(length)?.ok_or(StreamError::EndOfStream)
    }

    /// Alias of [`sysread`](Self::sysread).
    ///
    /// # Errors
    ///
    /// As for [`sysread`](Self::sysread).
    pub fn readpartial(&mut self, length: Option<usize>) -> Result<BString, StreamError> {
        self.sysread(length)
    }

    /// Reads up to `length` bytes. Never blocks; `opts` selects whether end
    /// of stream is an error or `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`StreamError::EndOfStream`] at end of stream when `opts.exception`
    /// is set, otherwise as for [`read`](Self::read).
    pub fn read_nonblock(
        &mut self,
        length: usize,
        opts: NonBlock,
    ) -> Result<Option<BString>, StreamError> {
        match self.read(Some(length))? {
            None if opts.exception => Err(StreamError::EndOfStream),
            read => Ok(read),
        }
    }

    /// Reads one character: a single byte in binary mode, otherwise one
    /// UTF-8 sequence (or one byte of an invalid sequence).
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read).
    pub fn getc(&mut self) -> Result<Option<BString>, StreamError> {
        let buffer = readable(self.flags, self.buffer.as_ref())?;
        let bytes = buffer.borrow();
        let Some(rest) = bytes.get(self.pos..).filter(|rest| !rest.is_empty()) else {
            return Ok(None);
        };
        let width = if self.flags.is_binary() {
            1
        } else {
            bstr::decode_utf8(rest).1.max(1)
        };
        let ch = BString::from(&rest[..width]);
        self.pos += width;
        Ok(Some(ch))
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read).
    pub fn getbyte(&mut self) -> Result<Option<u8>, StreamError> {
        let buffer = readable(self.flags, self.buffer.as_ref())?;
        let byte = buffer.borrow().get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    /// Like [`getc`](Self::getc), but end of stream is an error.
    ///
    /// # Errors
    ///
    /// [`StreamError::EndOfStream`] at end of stream.
    pub fn readchar(&mut self) -> Result<BString, StreamError> {
        self.getc()?.ok_or(StreamError::EndOfStream)
    }

    /// Like [`getbyte`](Self::getbyte), but end of stream is an error.
    ///
    /// # Errors
    ///
    /// [`StreamError::EndOfStream`] at end of stream.
    pub fn readbyte(&mut self) -> Result<u8, StreamError> {
        self.getbyte()?.ok_or(StreamError::EndOfStream)
    }

    /// Pushes `data` back: the bytes just before the cursor are overwritten
    /// with `data` and the cursor moves back by its length.
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read); [`StreamError::Frozen`] for a frozen
    /// buffer; [`StreamError::UnreadTooLong`] if `data` is longer than the
    /// cursor position; [`StreamError::CapacityOverflow`] if the cursor lies
    /// further past the end than the buffer can grow.
    pub fn ungetc(&mut self, data: impl AsRef<[u8]>) -> Result<(), StreamError> {
        let data = data.as_ref();
        let buffer = readable(self.flags, self.buffer.as_ref())?;
        buffer.ensure_mutable()?;
        if data.is_empty() {
            return Ok(());
        }
        let pos = self.pos;
        let Some(start) = pos.checked_sub(data.len()) else {
            return Err(StreamError::UnreadTooLong {
                len: data.len(),
                pos,
            });
        };

        buffer.try_modify(|bytes| {
            if bytes.len() < pos {
                resize_to(bytes, pos)?;
            }
            bytes[start..pos].copy_from_slice(data);
            Ok(())
        })?;
        self.pos = start;
        Ok(())
    }

    /// Pushes back a single byte.
    ///
    /// # Errors
    ///
    /// As for [`ungetc`](Self::ungetc).
    pub fn ungetbyte(&mut self, byte: u8) -> Result<(), StreamError> {
        self.ungetc([byte])
    }

    // --------------------------------------------------------------------------------------------
    // Lines
    // --------------------------------------------------------------------------------------------

    /// Reads the next line.
    ///
    /// Returns `Ok(None)` at end of stream. A limit of zero returns an empty
    /// line without moving. See [`LineRequest`] for the separator forms.
    ///
    /// ```rust
    /// use strio::{LineRequest, StringStream};
    ///
    /// let mut io = StringStream::new("abc\n\ndef\n", "r").unwrap();
    /// assert_eq!(io.gets(LineRequest::paragraph()).unwrap().unwrap(), "abc\n\n");
    /// assert_eq!(io.gets(("e", 5usize)).unwrap().unwrap(), "de");
    /// assert_eq!(io.gets(None::<&str>).unwrap().unwrap(), "f\n");
    /// assert_eq!(io.gets(()).unwrap(), None);
    /// ```
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read).
    pub fn gets(&mut self, request: impl Into<LineRequest>) -> Result<Option<BString>, StreamError> {
        self.gets_by(&request.into())
    }

    pub(crate) fn gets_by(&mut self, request: &LineRequest) -> Result<Option<BString>, StreamError> {
        let buffer = readable(self.flags, self.buffer.as_ref())?;
        if request.limit == Some(0) {
            return Ok(Some(BString::default()));
        }

        let bytes = buffer.borrow();
        let sep = Resolved::new(&request.separator, &self.options.record_separator);
        let Some(span) = line::scan(&bytes, self.pos, sep, request.limit, self.flags.is_binary())
        else {
            return Ok(None);
        };

        let line = BString::from(&bytes[span.start..span.end]);
        self.pos = span.end;
        self.lineno += 1;
        Ok(Some(line))
    }

    /// Like [`gets`](Self::gets), but end of stream is an error.
    ///
    /// # Errors
    ///
    /// [`StreamError::EndOfStream`] at end of stream.
    pub fn readline(&mut self, request: impl Into<LineRequest>) -> Result<BString, StreamError> {
        self.gets(request)?.ok_or(StreamError::EndOfStream)
    }

    /// Iterates over the remaining lines. Each step has the effects of
    /// [`gets`](Self::gets).
    ///
    /// # Errors
    ///
    /// [`StreamError::ZeroLimit`] for a limit of zero, which would never
    /// advance.
    pub fn each_line(&mut self, request: impl Into<LineRequest>) -> Result<Lines<'_>, StreamError> {
        let request = request.into();
        if request.limit == Some(0) {
            return Err(StreamError::ZeroLimit);
        }
        Ok(Lines::new(self, request))
    }

    /// Collects the remaining lines.
    ///
    /// # Errors
    ///
    /// As for [`each_line`](Self::each_line) and [`gets`](Self::gets).
    pub fn readlines(&mut self, request: impl Into<LineRequest>) -> Result<Vec<BString>, StreamError> {
        self.each_line(request)?.collect()
    }
}

/// Capabilities a real file handle has that a memory buffer answers with
/// fixed values.
#[allow(clippy::unused_self)]
impl StringStream {
    /// Always `None`: there is no file descriptor.
    #[must_use]
    pub fn fileno(&self) -> Option<i32> {
        None
    }

    /// Always `false`.
    #[must_use]
    pub fn isatty(&self) -> bool {
        false
    }

    /// Alias of [`isatty`](Self::isatty).
    #[must_use]
    pub fn is_tty(&self) -> bool {
        self.isatty()
    }

    /// Always `true`.
    #[must_use]
    pub fn sync(&self) -> bool {
        true
    }

    /// Accepts and returns `sync` without storing it.
    pub fn set_sync(&mut self, sync: bool) -> bool {
        sync
    }

    /// Always `0`.
    pub fn fsync(&mut self) -> i32 {
        0
    }

    /// Nothing to flush.
    pub fn flush(&mut self) -> &mut Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use super::*;

    #[test]
    fn whence_from_raw() {
        assert_eq!(Whence::try_from(0), Ok(Whence::Start));
        assert_eq!(Whence::try_from(2), Ok(Whence::End));
        assert_eq!(Whence::try_from(3), Err(StreamError::InvalidWhence(3)));
        assert_eq!(Whence::try_from(-1), Err(StreamError::InvalidWhence(-1)));
    }

    #[test]
    fn write_overwrites_in_place() {
        let buffer = SharedBuffer::from("abcdef");
        let mut io = StringStream::new(buffer.clone(), "r+").unwrap();
        io.seek(2, Whence::Start).unwrap();
        assert_eq!(io.write("XY").unwrap(), 2);
        assert_eq!(buffer, "abXYef");
        assert_eq!(io.pos(), 4);
        io.write("1234").unwrap();
        assert_eq!(buffer, "abXY1234");
    }

    #[test]
    fn append_mode_writes_at_end() {
        let buffer = SharedBuffer::from("foo");
        let mut io = StringStream::new(buffer.clone(), "a").unwrap();
        io.set_pos(1);
        io.write("bar").unwrap();
        assert_eq!(buffer, "foobar");
        assert_eq!(io.pos(), 6);
    }

    #[test]
    fn read_into_replaces_and_clears() {
        let mut io = StringStream::new("test", "r").unwrap();
        let mut out = b"0123456789".to_vec();
        assert_eq!(io.read_into(None, &mut out), Ok(Some(4)));
        assert_eq!(out, b"test");
        assert_eq!(io.read_into(Some(3), &mut out), Ok(None));
        assert!(out.is_empty());
    }

    #[test]
    fn read_past_end_after_seek() {
        let mut io = StringStream::new("abc", "r").unwrap();
        io.seek(10, Whence::Start).unwrap();
        assert_eq!(io.read(None).unwrap().unwrap(), "");
        assert_eq!(io.read(Some(1)).unwrap(), None);
        assert_eq!(io.read(Some(0)).unwrap().unwrap(), "");
        assert_eq!(io.pos(), 10);
    }

    #[test]
    fn getc_reads_utf8_sequences_in_text_mode() {
        let mut text = StringStream::new("é!", "r").unwrap();
        assert_eq!(text.getc().unwrap().unwrap(), "é");
        assert_eq!(text.getc().unwrap().unwrap(), "!");

        let mut binary = StringStream::new("é", "rb").unwrap();
        assert_eq!(binary.getc().unwrap().unwrap(), &b"\xC3"[..]);
        assert_eq!(binary.getbyte().unwrap(), Some(0xA9));
        assert_eq!(binary.getbyte().unwrap(), None);
    }

    #[test]
    fn ungetc_overwrites_before_cursor() {
        let buffer = SharedBuffer::from("abc");
        let mut io = StringStream::new(buffer.clone(), "r").unwrap();
        io.read(Some(2)).unwrap();
        io.ungetc("XY").unwrap();
        assert_eq!(io.pos(), 0);
        assert_eq!(buffer, "XYc");
        assert_eq!(
            io.ungetc("Z"),
            Err(StreamError::UnreadTooLong { len: 1, pos: 0 })
        );
    }

    #[test]
    fn ungetc_past_end_pads() {
        let buffer = SharedBuffer::from("ab");
        let mut io = StringStream::new(buffer.clone(), "r").unwrap();
        io.set_pos(4);
        io.ungetbyte(b'!').unwrap();
        assert_eq!(buffer, &b"ab\0!"[..]);
        assert_eq!(io.pos(), 3);
    }

    #[test]
    fn frozen_buffer_rejects_mutation_but_allows_reads() {
        let buffer = SharedBuffer::frozen("abc");
        assert_eq!(
            StringStream::new(buffer.clone(), "w").unwrap_err(),
            StreamError::Frozen
        );

        let mut io = StringStream::new(buffer.clone(), "r+").unwrap();
        assert_eq!(io.write("x"), Err(StreamError::Frozen));
        assert_eq!(io.write(""), Err(StreamError::Frozen));
        assert_eq!(io.truncate(0), Err(StreamError::Frozen));
        assert_eq!(io.getc().unwrap().unwrap(), "a");
        assert_eq!(io.ungetc("a"), Err(StreamError::Frozen));
        assert_eq!(io.pos(), 1);
        assert_eq!(buffer, "abc");
    }

    #[test]
    fn truncate_keeps_cursor() {
        let buffer = SharedBuffer::from("abcdef");
        let mut io = StringStream::new(buffer.clone(), "r+").unwrap();
        io.set_pos(5);
        io.truncate(2).unwrap();
        assert_eq!(buffer, "ab");
        assert_eq!(io.pos(), 5);
        io.truncate(4).unwrap();
        assert_eq!(buffer, &b"ab\0\0"[..]);
    }

    #[test]
    fn close_read_and_close_write() {
        let mut io = StringStream::new("abc", "r+").unwrap();
        io.close_read().unwrap();
        assert!(io.is_closed_read() && !io.is_closed());
        assert_eq!(io.read(None), Err(StreamError::NotReadable));
        io.close_write().unwrap();
        assert!(io.is_closed());
        assert_eq!(io.close_write(), Err(StreamError::Closed));

        let mut read_only = StringStream::new("abc", "r").unwrap();
        assert_eq!(read_only.close_write(), Err(StreamError::NotDuplex("writing")));
        read_only.close_read().unwrap();
        assert!(read_only.is_closed());
    }

    #[test]
    fn reopen_is_all_or_nothing() {
        let mut io = StringStream::new("abc", "r").unwrap();
        io.read(Some(2)).unwrap();
        assert!(io.reopen("xyz", "q").is_err());
        assert_eq!(io.pos(), 2);
        assert_eq!(io.buffer().unwrap(), "abc");

        let other = SharedBuffer::from("data");
        io.reopen(other.clone(), "w").unwrap();
        assert_eq!(other, "");
        assert_eq!(io.pos(), 0);
        assert!(io.mode().is_truncate());
    }

    #[test]
    fn set_buffer_reopens_read_write() {
        let mut io = StringStream::new("abc", "r").unwrap();
        io.close().unwrap();
        io.set_buffer("xyz");
        assert!(!io.is_closed());
        assert_eq!(io.mode(), ModeFlags::READWRITE);

        io.set_buffer(SharedBuffer::frozen("frozen"));
        assert_eq!(io.mode(), ModeFlags::READABLE);
    }

    #[test]
    fn detached_stream() {
        let mut io = StringStream::new("abc", "r+").unwrap();
        let buffer = io.take_buffer().unwrap();
        assert_eq!(buffer, "abc");
        assert_eq!(io.size(), Err(StreamError::Detached));
        assert_eq!(io.read(None), Err(StreamError::Detached));
        assert_eq!(io.write("x"), Err(StreamError::Detached));
        assert!(io.eof());
    }

    #[test]
    fn each_line_rejects_zero_limit() {
        let mut io = StringStream::new("a\nb\n", "r").unwrap();
        assert_eq!(io.each_line(0usize).err(), Some(StreamError::ZeroLimit));
        assert_eq!(io.gets(0usize).unwrap().unwrap(), "");
        assert_eq!(io.pos(), 0);
        assert_eq!(io.lineno(), 0);
    }

    #[test]
    fn readlines_collects_rest() {
        let mut io = StringStream::new("a\nb\nc", "r").unwrap();
        io.gets(()).unwrap();
        let rest: Vec<BString> = io.readlines(()).unwrap();
        assert_eq!(rest, vec!["b\n", "c"]);
        assert_eq!(io.lineno(), 3);
        assert_eq!(io.readline(()), Err(StreamError::EndOfStream));
    }

    #[test]
    fn custom_record_separator() {
        let options = StreamOptions {
            record_separator: "\r\n".into(),
        };
        let mut io = StringStream::with_options("a\r\nb\nc\r\n", "r", options).unwrap();
        assert_eq!(io.gets(()).unwrap().unwrap(), "a\r\n");
        assert_eq!(io.gets(()).unwrap().unwrap(), "b\nc\r\n");
        assert_eq!(io.gets(()).unwrap(), None);
    }

    #[test]
    fn unreachable_positions_fail_without_effect() {
        let buffer = SharedBuffer::from("abc");
        let mut io = StringStream::new(buffer.clone(), "r+").unwrap();

        let far = io.seek(i64::MAX, Whence::Start).unwrap();
        assert_eq!(io.write("x"), Err(StreamError::CapacityOverflow));
        assert_eq!(io.pos(), far);

        io.set_pos(usize::MAX);
        assert_eq!(io.write("x"), Err(StreamError::CapacityOverflow));
        assert_eq!(io.ungetc("x"), Err(StreamError::CapacityOverflow));
        assert_eq!(io.pos(), usize::MAX);
        assert_eq!(io.truncate(usize::MAX), Err(StreamError::CapacityOverflow));
        assert_eq!(buffer, "abc");

        io.set_pos(1);
        io.write("Z").unwrap();
        assert_eq!(buffer, "aZc");
    }

    #[test]
    fn live_borrow_fails_mutation_not_reads() {
        let buffer = SharedBuffer::from("abc");
        let mut io = StringStream::new(buffer.clone(), "r+").unwrap();
        let guard = buffer.borrow();
        assert_eq!(io.write("x"), Err(StreamError::Borrowed));
        assert_eq!(io.truncate(0), Err(StreamError::Borrowed));
        assert_eq!(io.getc().unwrap().unwrap(), "a");
        assert_eq!(io.ungetc("a"), Err(StreamError::Borrowed));
        drop(guard);
        assert_eq!(io.pos(), 1);
        io.write("!").unwrap();
        assert_eq!(buffer, "a!c");
    }

    #[test]
    fn length_is_size() {
        let mut io = StringStream::new("1234", "r").unwrap();
        assert_eq!(io.length(), Ok(4));
        io.take_buffer();
        assert_eq!(io.length(), Err(StreamError::Detached));
    }

    #[test]
    fn stubs_have_fixed_answers() {
        let mut io = StringStream::default();
        assert_eq!(io.fileno(), None);
        assert!(!io.isatty() && !io.is_tty());
        assert!(io.sync());
        assert!(!io.set_sync(false));
        assert!(io.sync());
        assert_eq!(io.fsync(), 0);
        assert_eq!(io.flush().pos(), 0);
    }
}
