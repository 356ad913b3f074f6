//! Byte Sequences
//!
//! A byte sequence is a fixed, read-only run of octets. In its most simple
//! form, any type that implements `AsRef<[u8]>` can serve as a byte
//! sequence. The trait [`ByteSequence`] adds what the directory server
//! needs on top of that: content comparison with unsigned byte ordering,
//! the sum-of-bytes hash code that stored indexes were built with, export
//! helpers, and – most importantly – taking a sub-sequence, called a
//! ‘range’, out of the sequence in the cheapest way possible.
//!
//! For most types, ranges will be octet slices `&[u8]` that borrow from the
//! sequence. Shareable types such as [`ByteString`] and `bytes::Bytes` hand
//! out owned ranges instead, avoiding the lifetime limitations a slice would
//! bring. A range taken from a [`ByteStringBuilder`] is always a borrow, so
//! the builder cannot be cleared or otherwise modified while the range is
//! alive.
//!
//! [`ByteString`]: crate::types::ByteString
//! [`ByteStringBuilder`]: crate::builder::ByteStringBuilder

use core::cmp::Ordering;
use core::ops::{Index, RangeBounds};
use std::borrow::Cow;
use std::string::String;
use std::vec::Vec;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use crate::parse::ByteSequenceReader;
use crate::types::ByteString;


//------------ ByteSequence --------------------------------------------------

/// A type representing an immutable byte sequence.
///
/// The primary purpose of the trait is to allow access to a sub-sequence,
/// called a ‘range.’ The type of this range is given via the `Range`
/// associated type. For most types it will be a `&[u8]` with a lifetime
/// equal to that of a reference. Only if an owned range can be created
/// cheaply, it should be that type.
///
/// All other methods are provided and operate on the content returned by
/// `AsRef<[u8]>`. Two sequences are equal if and only if they have the same
/// length and identical content, irregardless of their concrete type.
pub trait ByteSequence: AsRef<[u8]> {
    type Range<'a>: ByteSequence where Self: 'a;

    /// Returns a sub-sequence or ‘range’ of the sequence.
    ///
    /// # Panics
    ///
    /// The method should panic if `start` or `end` are greater than the
    /// length of the sequence or if `start` is greater than `end`.
    fn range(&self, range: impl RangeBounds<usize>) -> Self::Range<'_>;

    /// Returns the number of bytes in the sequence.
    fn length(&self) -> usize {
        self.as_ref().len()
    }

    /// Returns the byte at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not within `0..self.length()`.
    fn byte_at(&self, index: usize) -> u8 {
        self.as_ref()[index]
    }

    /// Returns the sub-sequence covering `start..end`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > self.length()`.
    fn sub_sequence(&self, start: usize, end: usize) -> Self::Range<'_> {
        let len = self.length();
        assert!(
            start <= end && end <= len,
            "sub-sequence {}..{} out of bounds for length {}",
            start, end, len
        );
        self.range(start..end)
    }

    /// Compares the content with some other octets.
    ///
    /// Bytes are compared as unsigned values, lexicographically, with a
    /// shorter sequence ordered before any longer sequence it is a prefix
    /// of.
    fn compare_to<Other: AsRef<[u8]> + ?Sized>(
        &self, other: &Other
    ) -> Ordering {
        self.as_ref().cmp(other.as_ref())
    }

    /// Returns whether the content equals some other octets.
    fn content_eq<Other: AsRef<[u8]> + ?Sized>(&self, other: &Other) -> bool {
        self.as_ref() == other.as_ref()
    }

    /// Returns whether the sequence starts with the given prefix.
    fn has_prefix<Other: AsRef<[u8]> + ?Sized>(&self, prefix: &Other) -> bool {
        self.as_ref().starts_with(prefix.as_ref())
    }

    /// Returns the hash code of the content.
    ///
    /// See [`hash_code`] for the exact definition.
    fn hash_code(&self) -> i32 {
        hash_code(self.as_ref())
    }

    /// Copies as much of the content as fits into `target`.
    ///
    /// Returns the number of bytes copied.
    fn copy_to(&self, target: &mut [u8]) -> usize {
        let src = self.as_ref();
        let len = src.len().min(target.len());
        target[..len].copy_from_slice(&src[..len]);
        len
    }

    /// Returns a newly allocated copy of the content.
    fn to_byte_array(&self) -> Vec<u8> {
        self.as_ref().to_vec()
    }

    /// Returns the content as an immutable byte string.
    ///
    /// The result never shares storage with a mutable owner.
    fn to_byte_string(&self) -> ByteString {
        ByteString::copy_from_slice(self.as_ref())
    }

    /// Returns the standard base64 encoding of the content.
    fn to_base64_string(&self) -> String {
        BASE64.encode(self.as_ref())
    }

    /// Decodes the content as UTF-8.
    ///
    /// Invalid sequences are replaced with `U+FFFD REPLACEMENT CHARACTER`.
    fn to_utf8_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_ref())
    }

    /// Returns a reader positioned at the start of the sequence.
    fn as_reader(&self) -> ByteSequenceReader<'_, Self> {
        ByteSequenceReader::from_ref(self)
    }
}

impl<'t, T: ByteSequence + ?Sized> ByteSequence for &'t T {
    type Range<'a> = <T as ByteSequence>::Range<'a> where Self: 'a;

    fn range(&self, range: impl RangeBounds<usize>) -> Self::Range<'_> {
        (*self).range(range)
    }
}

impl ByteSequence for [u8] {
    type Range<'a> = &'a [u8];

    fn range(&self, range: impl RangeBounds<usize>) -> Self::Range<'_> {
        self.index(
            (range.start_bound().cloned(), range.end_bound().cloned())
        )
    }
}

impl ByteSequence for str {
    type Range<'a> = &'a [u8];

    fn range(&self, range: impl RangeBounds<usize>) -> Self::Range<'_> {
        self.as_bytes().range(range)
    }
}

impl ByteSequence for Vec<u8> {
    type Range<'a> = &'a [u8];

    fn range(&self, range: impl RangeBounds<usize>) -> Self::Range<'_> {
        self.as_slice().range(range)
    }
}

impl ByteSequence for Bytes {
    type Range<'a> = Bytes;

    fn range(&self, range: impl RangeBounds<usize>) -> Self::Range<'_> {
        self.slice(range)
    }

    fn to_byte_string(&self) -> ByteString {
        ByteString::from(self.clone())
    }
}


//------------ hash_code -----------------------------------------------------

/// Returns the hash code for the given content.
///
/// The hash code is the wrapping sum of all bytes interpreted as signed
/// values. Existing hash-based indexes were built with this function, so
/// it must not change.
pub fn hash_code(bytes: &[u8]) -> i32 {
    bytes.iter().fold(0i32, |sum, &b| sum.wrapping_add(i32::from(b as i8)))
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sub_sequence() {
        let seq = b"0123456789".as_ref();
        assert_eq!(seq.sub_sequence(2, 5), b"234");
        assert_eq!(seq.sub_sequence(0, 0), b"");
        assert_eq!(seq.sub_sequence(10, 10), b"");

        let bytes = Bytes::from_static(b"0123456789");
        assert_eq!(bytes.sub_sequence(8, 10), Bytes::from_static(b"89"));
    }

    #[test]
    #[should_panic]
    fn sub_sequence_start_after_end() {
        let _ = b"0123456789".as_ref().sub_sequence(5, 4);
    }

    #[test]
    #[should_panic]
    fn sub_sequence_end_out_of_bounds() {
        let _ = b"0123456789".as_ref().sub_sequence(0, 11);
    }

    #[test]
    #[should_panic]
    fn byte_at_out_of_bounds() {
        let _ = b"01".as_ref().byte_at(2);
    }

    #[test]
    fn compare_unsigned() {
        let low = b"\x7f".as_ref();
        let high = b"\x80".as_ref();
        assert_eq!(low.compare_to(high), Ordering::Less);
        assert_eq!(high.compare_to(low), Ordering::Greater);
        assert_eq!(b"ab".as_ref().compare_to(b"abc"), Ordering::Less);
        assert_eq!(b"abc".as_ref().compare_to("abc"), Ordering::Equal);
    }

    #[test]
    fn hash_code_sums_signed_bytes() {
        assert_eq!(hash_code(b""), 0);
        assert_eq!(hash_code(b"\x01\x02\x03"), 6);
        assert_eq!(hash_code(b"\xff"), -1);
        assert_eq!(hash_code(b"\x80\x7f"), -1);
        assert_eq!(b"ab".as_ref().hash_code(), b"ba".as_ref().hash_code());
    }

    #[test]
    fn copy_to() {
        let mut buf = [0u8; 4];
        assert_eq!(b"0123456789".as_ref().copy_to(&mut buf), 4);
        assert_eq!(&buf, b"0123");
        let mut buf = [0u8; 4];
        assert_eq!(b"01".as_ref().copy_to(&mut buf), 2);
        assert_eq!(&buf, b"01\0\0");
    }

    #[test]
    fn export() {
        let seq = b"hello".as_ref();
        assert_eq!(seq.to_base64_string(), "aGVsbG8=");
        assert_eq!(seq.to_byte_array(), b"hello".to_vec());
        assert_eq!(seq.to_utf8_lossy(), "hello");
        assert_eq!(b"a\xffb".as_ref().to_utf8_lossy(), "a\u{fffd}b");
        assert!(seq.has_prefix("he"));
        assert!(!seq.has_prefix("hello!"));
    }
}
