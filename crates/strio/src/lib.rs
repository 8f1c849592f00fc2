//! An in-memory, file-like byte stream.
//!
//! [`StringStream`] gives a growable byte buffer the interface of an open
//! file: a cursor, an access mode, line-oriented reads with configurable
//! separators, character and byte reads, push-back, and seeking past the
//! end (later writes pad the gap with NUL bytes).
//!
//! The buffer is a [`SharedBuffer`]. The caller keeps a handle to it and
//! observes every write immediately; cloning a stream duplicates the cursor
//! while sharing the bytes.
//!
//! ```rust
//! use strio::{SharedBuffer, StringStream, Whence};
//!
//! let buffer = SharedBuffer::from("hello\nworld\n");
//! let mut io = StringStream::new(buffer.clone(), "r+").unwrap();
//! assert_eq!(io.gets(()).unwrap().unwrap(), "hello\n");
//! io.write("WORLD").unwrap();
//! assert_eq!(buffer, "hello\nWORLD\n");
//!
//! io.seek(2, Whence::End).unwrap();
//! io.write("!").unwrap();
//! assert_eq!(buffer, &b"hello\nWORLD\n\0\0!"[..]);
//! ```
//!
//! The crate is `no_std` + `alloc`. The default `std` feature adds the
//! `std::io::{Read, Write, Seek}` implementations and the
//! `From<StreamError> for std::io::Error` conversion; the `serde` feature
//! derives serialization for the option and mode types.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod error;
mod line;
mod lines;
mod mode;
mod options;
mod scoped;
mod stream;

#[cfg(feature = "std")]
mod io;


pub use bstr::{BStr, BString};
pub use buffer::SharedBuffer;
pub use error::{ErrorKind, StreamError};
pub use line::{LineRequest, Separator};
pub use lines::Lines;
pub use mode::ModeFlags;
pub use options::{NonBlock, StreamOptions};
pub use scoped::ScopedStream;
pub use stream::{StringStream, Whence};
