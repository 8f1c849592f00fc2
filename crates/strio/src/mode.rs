//! Access-mode descriptors.
//!
//! ```text
//! mode ::= [rwa][b+]*
//! ```
//!
//! - `r`: read only
//! - `w`: write only, truncating the buffer
//! - `a`: write only, every write lands at the end of the buffer
//! - `b`: binary; characters are single bytes instead of UTF-8 sequences
//! - `+`: read and write

use alloc::string::ToString;
use core::str::FromStr;

use crate::StreamError;

bitflags::bitflags! {
    /// Permission and behaviour bits of a [`StringStream`](crate::StringStream).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ModeFlags: u16 {
        /// Reads are permitted.
        const READABLE = 0x0001;
        /// Writes are permitted.
        const WRITABLE = 0x0002;
        /// Both directions.
        const READWRITE = Self::READABLE.bits() | Self::WRITABLE.bits();
        /// Characters are bytes.
        const BINARY = 0x0004;
        /// Writes always go to the end of the buffer.
        const APPEND = 0x0040;
        /// Opened with a creating mode (`w` or `a`).
        const CREATE = 0x0080;
        /// The buffer is emptied on open.
        const TRUNCATE = 0x0800;
    }
}

impl Default for ModeFlags {
    /// `r+`
    fn default() -> Self {
        Self::READWRITE
    }
}

impl ModeFlags {
    /// Parses a mode descriptor such as `"r"`, `"w+"` or `"ab"`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidMode`] if the descriptor is empty, does
    /// not start with `r`, `w` or `a`, or contains anything other than `b`
    /// and `+` after the first character.
    pub fn parse(mode: &str) -> Result<Self, StreamError> {
        let invalid = || StreamError::InvalidMode(mode.to_string());

        let mut bytes = mode.bytes();
        let mut flags = match bytes.next() {
            Some(b'r') => ModeFlags::READABLE,
            Some(b'w') => ModeFlags::WRITABLE | ModeFlags::CREATE | ModeFlags::TRUNCATE,
            Some(b'a') => ModeFlags::WRITABLE | ModeFlags::APPEND | ModeFlags::CREATE,
            _ => return Err(invalid()),
        };

        for b in bytes {
            match b {
                b'b' => flags |= ModeFlags::BINARY,
                b'+' => flags |= ModeFlags::READWRITE,
                _ => return Err(invalid()),
            }
        }

        Ok(flags)
    }

    /// Whether the READABLE bit is set.
    #[inline]
    #[must_use]
    pub fn is_readable(self) -> bool {
        self.contains(ModeFlags::READABLE)
    }

    /// Whether the WRITABLE bit is set.
    #[inline]
    #[must_use]
    pub fn is_writable(self) -> bool {
        self.contains(ModeFlags::WRITABLE)
    }

    /// Whether the APPEND bit is set.
    #[inline]
    #[must_use]
    pub fn is_append(self) -> bool {
        self.contains(ModeFlags::APPEND)
    }

    /// Whether the BINARY bit is set.
    #[inline]
    #[must_use]
    pub fn is_binary(self) -> bool {
        self.contains(ModeFlags::BINARY)
    }

    /// Whether the TRUNCATE bit is set.
    #[inline]
    #[must_use]
    pub fn is_truncate(self) -> bool {
        self.contains(ModeFlags::TRUNCATE)
    }

    /// Neither READABLE nor WRITABLE is set.
    #[inline]
    #[must_use]
    pub fn is_closed(self) -> bool {
        !self.intersects(ModeFlags::READWRITE)
    }
}

impl FromStr for ModeFlags {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
