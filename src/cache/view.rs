//! Byte View Module
//!
//! Immutable wrapper around cached byte values.

use std::fmt;

use bytes::Bytes;

// == Byte View ==
/// An immutable view of a cached value.
///
/// Cloning is cheap (reference-counted), and the underlying bytes can
/// never be mutated once stored. The length in bytes is the unit of cost
/// for cache capacity accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    // == Constructors ==
    /// Creates a view by copying the given slice.
    ///
    /// Use this at trust boundaries where the caller may retain the
    /// original buffer (e.g. bytes returned by a user loader).
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    // == Length ==
    /// Returns the length of the value in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the value is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == Accessors ==
    /// Returns an owned copy of the value bytes.
    ///
    /// The copy is the caller's to mutate; the stored value is unaffected.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Borrows the value bytes immutably.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the underlying shared buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl From<Vec<u8>> for ByteView {
    /// Takes ownership of an existing buffer without copying.
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(bytes),
        }
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}
