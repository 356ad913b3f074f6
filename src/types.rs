//! Immutable byte strings.

use core::{borrow, cmp, fmt, hash, ops, str};
use core::ops::RangeBounds;
use std::string::String;
use std::vec::Vec;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use crate::octets::ByteSequence;


//------------ ByteString ----------------------------------------------------

/// An immutable sequence of bytes.
///
/// A byte string never changes after it has been created and is therefore
/// safe to share between threads. It is backed by a reference counted
/// buffer, so cloning it and taking sub-sequences are cheap and never copy
/// the content.
///
/// Equality, ordering, and hashing are defined over the content only. Bytes
/// are ordered as unsigned values. A `Hasher` is fed the content the same
/// way as for `[u8]`, so maps keyed by byte strings can be queried with
/// plain slices. The sum-of-bytes hash code used by stored indexes is
/// available via [`ByteSequence::hash_code`].
#[derive(Clone, Default)]
pub struct ByteString(Bytes);

impl ByteString {
    /// Returns the empty byte string.
    pub const fn empty() -> Self {
        ByteString(Bytes::new())
    }

    /// Creates a byte string referring to static data.
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        ByteString(Bytes::from_static(bytes))
    }

    /// Creates a byte string holding a copy of `bytes`.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        ByteString(Bytes::copy_from_slice(bytes))
    }

    /// Creates a byte string holding the UTF-8 encoding of `s`.
    pub fn from_utf8_str(s: &str) -> Self {
        Self::copy_from_slice(s.as_bytes())
    }

    /// Creates a four byte string holding `value` in big-endian order.
    pub fn from_i32(value: i32) -> Self {
        Self::copy_from_slice(&value.to_be_bytes())
    }

    /// Creates an eight byte string holding `value` in big-endian order.
    pub fn from_i64(value: i64) -> Self {
        Self::copy_from_slice(&value.to_be_bytes())
    }

    /// Decodes a byte string from its standard base64 encoding.
    pub fn from_base64(
        encoded: impl AsRef<[u8]>
    ) -> Result<Self, base64::DecodeError> {
        BASE64.decode(encoded).map(Self::from)
    }

    /// Returns the content as a slice.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns the underlying shared buffer.
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Converts the byte string into the underlying shared buffer.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns the number of bytes in the string.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the content as a string of lower case hex digits.
    pub fn to_hex_string(&self) -> String {
        hex::encode(self.as_slice())
    }
}


//--- From

impl From<Bytes> for ByteString {
    fn from(bytes: Bytes) -> Self {
        ByteString(bytes)
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(vec: Vec<u8>) -> Self {
        ByteString(vec.into())
    }
}

impl From<String> for ByteString {
    fn from(s: String) -> Self {
        ByteString(s.into())
    }
}

impl<'a> From<&'a [u8]> for ByteString {
    fn from(bytes: &'a [u8]) -> Self {
        Self::copy_from_slice(bytes)
    }
}

impl<'a> From<&'a str> for ByteString {
    fn from(s: &'a str) -> Self {
        Self::from_utf8_str(s)
    }
}


//--- ByteSequence

impl ByteSequence for ByteString {
    type Range<'a> = ByteString;

    fn range(&self, range: impl RangeBounds<usize>) -> Self::Range<'_> {
        ByteString(self.0.slice(range))
    }

    fn to_byte_string(&self) -> ByteString {
        self.clone()
    }
}


//--- Deref, AsRef, Borrow

impl ops::Deref for ByteString {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl borrow::Borrow<[u8]> for ByteString {
    fn borrow(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]> + ?Sized> PartialEq<T> for ByteString {
    fn eq(&self, other: &T) -> bool {
        self.as_slice().eq(other.as_ref())
    }
}

impl Eq for ByteString { }


//--- PartialOrd and Ord

impl<T: AsRef<[u8]> + ?Sized> PartialOrd<T> for ByteString {
    fn partial_cmp(&self, other: &T) -> Option<cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_ref())
    }
}

impl Ord for ByteString {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}


//--- Hash

impl hash::Hash for ByteString {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        hash::Hash::hash(self.as_slice(), state)
    }
}


//--- Display and Debug

/// Formats the content decoded as UTF-8.
///
/// Invalid sequences are shown as `U+FFFD REPLACEMENT CHARACTER`.
impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match str::from_utf8(self.as_slice()) {
            Ok(s) => f.write_str(s),
            Err(_) => f.write_str(&self.to_utf8_lossy()),
        }
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ByteString")
            .field(&self.0)
            .finish()
    }
}


//============ Testing =======================================================
