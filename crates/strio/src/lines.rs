use core::iter::FusedIterator;

use bstr::BString;

use crate::{LineRequest, StreamError, StringStream};

/// Lazy iterator over the remaining lines of a [`StringStream`].
///
/// Created by [`StringStream::each_line`]. Every step is a `gets` call with
/// the same request: the cursor and line number advance as lines are
/// produced. Iteration stops at end of stream, or after yielding the first
/// error.
#[derive(Debug)]
pub struct Lines<'a> {
    stream: &'a mut StringStream,
    request: LineRequest,
    done: bool,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(stream: &'a mut StringStream, request: LineRequest) -> Self {
        Self {
            stream,
            request,
            done: false,
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = Result<BString, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.gets_by(&self.request) {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Lines<'_> {}
