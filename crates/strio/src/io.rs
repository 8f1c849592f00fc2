//! `std::io` adapters, so a [`StringStream`] can stand in wherever a reader,
//! writer or seekable handle is expected.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::{StreamError, StringStream, Whence};

impl Read for StringStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_slice(buf)?)
    }
}

impl Write for StringStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(StringStream::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Offsets are signed internally. A `SeekFrom::Start` offset above
/// `i64::MAX` fails with `InvalidOffset(i64::MAX)`, the saturated value,
/// and leaves the cursor where it was.
impl Seek for StringStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(offset) => (
                i64::try_from(offset).map_err(|_| StreamError::InvalidOffset(i64::MAX))?,
                Whence::Start,
            ),
            SeekFrom::Current(offset) => (offset, Whence::Current),
            SeekFrom::End(offset) => (offset, Whence::End),
        };
        let pos = StringStream::seek(self, offset, whence)?;
        Ok(pos as u64)
    }
}
