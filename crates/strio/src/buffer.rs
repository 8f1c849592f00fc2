use alloc::{rc::Rc, vec::Vec};
use core::{
    cell::{Ref, RefCell},
    fmt,
};

use bstr::{BStr, BString, ByteSlice};

use crate::StreamError;

#[derive(Default)]
struct Cell {
    bytes: BString,
    frozen: bool,
}

/// A shared, growable byte buffer backing one or more
/// [`StringStream`](crate::StringStream)s.
///
/// Cloning a `SharedBuffer` yields another handle to the *same* bytes. The
/// caller keeps a handle to observe what streams write, and duplicated
/// streams see each other's writes.
///
/// A buffer can be frozen; afterwards every mutating stream operation fails
/// with [`StreamError::Frozen`].
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Cell>>);

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer that rejects all mutation.
    #[must_use]
    pub fn frozen(bytes: impl Into<Vec<u8>>) -> Self {
        let buffer = Self::from(bytes.into());
        buffer.freeze();
        buffer
    }

    /// Marks the buffer immutable. There is no way back.
    ///
    /// # Panics
    ///
    /// Panics if a [`borrow`](Self::borrow) guard is alive.
    pub fn freeze(&self) {
        self.0.borrow_mut().frozen = true;
    }

    /// Whether [`freeze`](Self::freeze) has been called.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.0.borrow().frozen
    }

    /// Current length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().bytes.len()
    }

    /// Whether the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the current contents.
    ///
    /// While the guard is alive, mutating stream operations on this buffer
    /// fail with [`StreamError::Borrowed`]; reads still succeed.
    ///
    /// # Panics
    ///
    /// Never in practice: streams only borrow mutably inside their own
    /// methods and release the borrow before returning.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, BStr> {
        Ref::map(self.0.borrow(), |cell| cell.bytes.as_bstr())
    }

    /// Copies the current contents out.
    #[must_use]
    pub fn to_bstring(&self) -> BString {
        self.0.borrow().bytes.clone()
    }

    /// Replaces the contents wholesale.
    ///
    /// # Errors
    ///
    /// [`StreamError::Frozen`] if the buffer is frozen.
    pub fn replace(&self, bytes: impl Into<Vec<u8>>) -> Result<(), StreamError> {
        self.modify(|buf| *buf = BString::from(bytes.into()))
    }

    /// Whether both handles point at the same buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &SharedBuffer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles, streams included.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Runs `f` against the bytes unless the buffer is frozen or borrowed.
    pub(crate) fn modify<R>(&self, f: impl FnOnce(&mut BString) -> R) -> Result<R, StreamError> {
        let mut cell = self.0.try_borrow_mut().map_err(|_| StreamError::Borrowed)?;
        if cell.frozen {
            return Err(StreamError::Frozen);
        }
        Ok(f(&mut cell.bytes))
    }

    /// Like [`modify`](Self::modify) for closures that can fail themselves.
    pub(crate) fn try_modify<R>(
        &self,
        f: impl FnOnce(&mut BString) -> Result<R, StreamError>,
    ) -> Result<R, StreamError> {
        self.modify(f)?
    }

    pub(crate) fn ensure_mutable(&self) -> Result<(), StreamError> {
        self.modify(|_| ())
    }
}

/// Resizes `bytes` to `len`, padding with NUL. Fails without touching
/// `bytes` if the allocation cannot be made.
pub(crate) fn resize_to(bytes: &mut BString, len: usize) -> Result<(), StreamError> {
    if let Some(additional) = len.checked_sub(bytes.len()).filter(|&n| n > 0) {
        bytes
            .try_reserve(additional)
            .map_err(|_| StreamError::CapacityOverflow)?;
    }
    bytes.resize(len, 0);
    Ok(())
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.0.borrow();
        f.debug_struct("SharedBuffer")
            .field("bytes", &cell.bytes)
            .field("frozen", &cell.frozen)
            .finish()
    }
}

impl From<Vec<u8>> for SharedBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Rc::new(RefCell::new(Cell {
            bytes: BString::from(bytes),
            frozen: false,
        })))
    }
}

impl From<&[u8]> for SharedBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from(bytes.to_vec())
    }
}

impl From<&str> for SharedBuffer {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}

impl From<alloc::string::String> for SharedBuffer {
    fn from(s: alloc::string::String) -> Self {
        Self::from(s.into_bytes())
    }
}

impl From<BString> for SharedBuffer {
    fn from(s: BString) -> Self {
        Self::from(Vec::from(s))
    }
}

impl PartialEq<str> for SharedBuffer {
    fn eq(&self, other: &str) -> bool {
        self.0.borrow().bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for SharedBuffer {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<[u8]> for SharedBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.borrow().bytes == other
    }
}

impl PartialEq<&[u8]> for SharedBuffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let a = SharedBuffer::from("foo");
        let b = a.clone();
        b.replace("bar").unwrap();
        assert_eq!(a, "bar");
        assert!(a.ptr_eq(&b));
        assert_eq!(a.handle_count(), 2);
    }

    #[test]
    fn frozen_buffer_rejects_replace() {
        let buf = SharedBuffer::frozen("abc");
        assert_eq!(buf.replace("x"), Err(StreamError::Frozen));
        assert_eq!(buf, "abc");
        assert!(buf.is_frozen());
    }

    #[test]
    fn live_borrow_blocks_mutation() {
        let buf = SharedBuffer::from("abc");
        let guard = buf.borrow();
        assert_eq!(buf.replace("x"), Err(StreamError::Borrowed));
        assert_eq!(buf.ensure_mutable(), Err(StreamError::Borrowed));
        assert_eq!(&*guard, "abc");
        drop(guard);
        buf.replace("x").unwrap();
        assert_eq!(buf, "x");
    }

    #[test]
    fn resize_to_reports_impossible_growth() {
        let mut bytes = BString::from("ab");
        assert_eq!(resize_to(&mut bytes, usize::MAX), Err(StreamError::CapacityOverflow));
        assert_eq!(bytes, "ab");
        resize_to(&mut bytes, 4).unwrap();
        assert_eq!(bytes, &b"ab\0\0"[..]);
        resize_to(&mut bytes, 1).unwrap();
        assert_eq!(bytes, "a");
    }

    #[test]
    fn debug_shows_bytes_as_text() {
        let buf = SharedBuffer::from("a\nb");
        assert_eq!(
            alloc::format!("{buf:?}"),
            r#"SharedBuffer { bytes: "a\nb", frozen: false }"#
        );
    }
}
