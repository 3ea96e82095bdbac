use std::io::{self, Read};

/// Sequential read cursor over one fuzz input.
///
/// Yields the bytes of the wrapped slice in order, exactly once. There is
/// no internal buffer and no look-ahead: the decoder gets precisely the
/// bytes it asks for, so `position()` always equals the number of bytes
/// the decoder has consumed.
#[derive(Clone, Debug)]
pub struct InputStream<'a> {
    data: &'a [u8],
    pos: usize,
}

/// Wrap a raw fuzz input as a readable stream positioned at 0.
///
/// Any slice is accepted; an empty one is exhausted from the start.
#[must_use]
pub fn wrap(data: &[u8]) -> InputStream<'_> {
    InputStream { data, pos: 0 }
}

impl InputStream<'_> {
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}

impl Read for InputStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = &self.data[self.pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}
