//! [`IoVec`]: a borrowed-or-owned byte buffer, so a response header and a zero-copy payload
//! (e.g. a READ result) can be shipped as separate segments without an intermediate copy.

use std::borrow::Cow;

#[derive(Debug, Clone)]
pub enum IoVec<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

impl IoVec<'_> {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            IoVec::Borrowed(b) => b,
            IoVec::Owned(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_owned(self) -> Vec<u8> {
        match self {
            IoVec::Borrowed(b) => b.to_vec(),
            IoVec::Owned(v) => v,
        }
    }
}

impl<'a> From<&'a [u8]> for IoVec<'a> {
    fn from(value: &'a [u8]) -> Self {
        IoVec::Borrowed(value)
    }
}

impl From<Vec<u8>> for IoVec<'static> {
    fn from(value: Vec<u8>) -> Self {
        IoVec::Owned(value)
    }
}

/// Concatenates a sequence of segments into one contiguous buffer (the send path's
/// fallback when the underlying transport can't write a vectored message directly).
pub fn concat(segments: &[Cow<[u8]>]) -> Vec<u8> {
    let total = segments.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(total);
    for s in segments {
        out.extend_from_slice(s);
    }
    out
}
