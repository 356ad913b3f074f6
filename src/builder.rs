//! Byte String Builders
//!
//! A [`ByteStringBuilder`] is a growable buffer to which bytes can be
//! appended. Besides raw octets it knows how to append fixed width integers
//! in network byte order, text, ASN.1 BER length octets, and a compact,
//! order-preserving encoding for unsigned integers that is used for index
//! keys.
//!
//! The assembled content can be looked at via the [`ByteSequence`] trait.
//! Sub-sequences taken this way borrow from the builder, so the builder
//! can’t be cleared or appended to for as long as they are around. Use
//! [`to_byte_string`](ByteStringBuilder::to_byte_string) to take a copy
//! that outlives further modifications.

use core::{cmp, fmt, hash, ops};
use core::ops::RangeBounds;
use std::io;
use std::vec::Vec;
use crate::octets::ByteSequence;
use crate::parse::{ByteSequenceReader, ShortInput};
use crate::types::ByteString;


//------------ Constants -----------------------------------------------------

/// The capacity of a builder created via [`ByteStringBuilder::new`].
pub const DEFAULT_CAPACITY: usize = 32;

/// The largest value that can be stored in compact form.
pub const COMPACTED_MAX_VALUE: u64 = 0x00ff_ffff_ffff_ffff;

/// The bits to set in the lead byte of a compact value of a given size.
///
/// The eight byte form uses a fixed marker byte instead, see
/// [`ByteStringBuilder::append_compact_unsigned`].
const COMPACT_LEAD: [u8; 8] = [0, 0x00, 0x80, 0xc0, 0xe0, 0xf0, 0xf8, 0xfc];

/// The lead byte of the eight byte compact form.
const COMPACT_MARKER: u8 = 0xfe;


//------------ ByteStringBuilder ---------------------------------------------

/// A growable buffer for assembling byte strings.
///
/// The builder owns a buffer of a certain capacity of which the first
/// [`len`](Self::len) bytes are the assembled content. When appending
/// needs more room than is available, the buffer grows to twice its
/// capacity or to the required size, whichever is larger. It never shrinks
/// unless asked to via [`trim_to_size`](Self::trim_to_size) or
/// [`clear_and_truncate`](Self::clear_and_truncate).
///
/// All appending methods return a mutable reference to the builder so calls
/// can be chained. Fixed width integers are always appended in big-endian
/// byte order.
///
/// The builder is not synchronized. Sharing it between threads for
/// mutation requires external locking.
#[derive(Clone)]
pub struct ByteStringBuilder {
    /// The buffer. Its length is the capacity of the builder.
    buffer: Box<[u8]>,

    /// The number of bytes assembled so far.
    length: usize,
}

impl ByteStringBuilder {
    /// Creates a new, empty builder with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new, empty builder with exactly the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteStringBuilder {
            buffer: vec![0; capacity].into_boxed_slice(),
            length: 0,
        }
    }

    /// Creates a new builder holding a copy of some octets.
    ///
    /// The capacity of the builder will be equal to the length of the
    /// octets.
    pub fn from_sequence<S: AsRef<[u8]> + ?Sized>(seq: &S) -> Self {
        let mut res = Self::with_capacity(seq.as_ref().len());
        res.append_slice(seq.as_ref());
        res
    }

    /// Returns the current capacity of the builder.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of bytes assembled so far.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns whether the builder is empty.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the assembled content as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.length]
    }

    /// Returns the assembled content as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buffer[..self.length]
    }

    /// Makes sure there is room for at least `size` more bytes.
    ///
    /// If the current capacity doesn’t suffice, the buffer is replaced by
    /// one of twice the capacity or exactly the required size, whichever is
    /// larger. Calling this repeatedly with the same argument will grow the
    /// buffer at most once.
    ///
    /// # Panics
    ///
    /// Panics if the required capacity overflows `usize`.
    pub fn ensure_additional_capacity(&mut self, size: usize) -> &mut Self {
        let required = match self.length.checked_add(size) {
            Some(required) => required,
            None => panic!("capacity overflow"),
        };
        if required > self.buffer.len() {
            let new_capacity = cmp::max(
                self.buffer.len().saturating_mul(2), required
            );
            let mut buffer = vec![0; new_capacity].into_boxed_slice();
            buffer[..self.length].copy_from_slice(self.as_slice());
            self.buffer = buffer;
        }
        self
    }

    /// Returns the room for the next `size` bytes and advances the length.
    fn reserve_tail(&mut self, size: usize) -> &mut [u8] {
        self.ensure_additional_capacity(size);
        let start = self.length;
        self.length += size;
        &mut self.buffer[start..self.length]
    }
}


/// # Appending Data
///
impl ByteStringBuilder {
    /// Appends a single byte.
    pub fn append_u8(&mut self, b: u8) -> &mut Self {
        self.reserve_tail(1)[0] = b;
        self
    }

    /// Appends the content of a slice.
    pub fn append_slice(&mut self, slice: &[u8]) -> &mut Self {
        if !slice.is_empty() {
            self.reserve_tail(slice.len()).copy_from_slice(slice);
        }
        self
    }

    /// Appends the content of a byte sequence.
    pub fn append_sequence<S: ByteSequence + ?Sized>(
        &mut self, seq: &S
    ) -> &mut Self {
        self.append_slice(seq.as_ref())
    }

    /// Appends the next `len` bytes taken from a reader.
    ///
    /// Advances the reader by `len` bytes. If there aren’t that many bytes
    /// left, leaves both the reader and the builder untouched and returns
    /// an error instead.
    pub fn append_reader<S: AsRef<[u8]> + ?Sized>(
        &mut self, reader: &mut ByteSequenceReader<'_, S>, len: usize
    ) -> Result<&mut Self, ShortInput> {
        reader.check_len(len)?;
        if len != 0 {
            let start = self.length;
            self.ensure_additional_capacity(len);
            reader.parse_buf(&mut self.buffer[start..start + len])?;
            self.length += len;
        }
        Ok(self)
    }

    /// Appends the UTF-8 encoding of a sequence of characters.
    pub fn append_chars(&mut self, chars: &[char]) -> &mut Self {
        // Most characters are ASCII, so this is usually exact.
        self.ensure_additional_capacity(chars.len());
        let mut buf = [0u8; 4];
        for ch in chars {
            self.append_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
        self
    }

    /// Appends the UTF-8 encoding of a string.
    pub fn append_str(&mut self, s: &str) -> &mut Self {
        self.append_slice(s.as_bytes())
    }

    /// Appends the UTF-8 encoded string representation of a value.
    ///
    /// This always uses the `Display` implementation of the value. In
    /// particular, integers are appended as decimal text. Use
    /// [`append_i32`](Self::append_i32) and friends for their binary form.
    ///
    /// # Panics
    ///
    /// Panics if the `Display` implementation of the value returns an
    /// error, just like `ToString::to_string` does.
    pub fn append_display<T: fmt::Display + ?Sized>(
        &mut self, value: &T
    ) -> &mut Self {
        if fmt::write(self, format_args!("{}", value)).is_err() {
            panic!("a Display implementation returned an error unexpectedly");
        }
        self
    }

    /// Appends a big-endian `i16`.
    pub fn append_i16(&mut self, value: i16) -> &mut Self {
        self.append_slice(&value.to_be_bytes())
    }

    /// Appends a big-endian `i32`.
    pub fn append_i32(&mut self, value: i32) -> &mut Self {
        self.append_slice(&value.to_be_bytes())
    }

    /// Appends a big-endian `i64`.
    pub fn append_i64(&mut self, value: i64) -> &mut Self {
        self.append_slice(&value.to_be_bytes())
    }

    /// Appends an unsigned integer in compact form.
    ///
    /// The compact form uses between one and eight bytes. The number of
    /// leading one bits of the first byte states how many bytes follow it,
    /// the remaining bits of the first byte and all following bytes carry
    /// the value, most significant byte first:
    ///
    /// | value below          | bytes | first byte  |
    /// |----------------------|-------|-------------|
    /// | `0x80`               | 1     | `0xxxxxxx`  |
    /// | `0x4000`             | 2     | `10xxxxxx`  |
    /// | `0x20_0000`          | 3     | `110xxxxx`  |
    /// | `0x1000_0000`        | 4     | `1110xxxx`  |
    /// | `0x8_0000_0000`      | 5     | `11110xxx`  |
    /// | `0x400_0000_0000`    | 6     | `111110xx`  |
    /// | `0x2_0000_0000_0000` | 7     | `1111110x`  |
    /// | `0x100_0000_0000_0000` | 8   | `11111110`  |
    ///
    /// The eight byte form has no value bits left in its first byte, which
    /// is therefore the fixed marker `0xfe`.
    ///
    /// Because shorter forms always have fewer leading one bits, comparing
    /// two encoded values byte by byte orders them like the numbers they
    /// encode.
    ///
    /// Values larger than [`COMPACTED_MAX_VALUE`] can’t be encoded and
    /// result in an error. The builder is left untouched in this case.
    pub fn append_compact_unsigned(
        &mut self, value: u64
    ) -> Result<&mut Self, ValueOutOfRange> {
        let size = compact_unsigned_len(value).ok_or(ValueOutOfRange(value))?;
        let bytes = value.to_be_bytes();
        let target = self.reserve_tail(size);
        if size == 8 {
            target[0] = COMPACT_MARKER;
            target[1..].copy_from_slice(&bytes[1..]);
        }
        else {
            target.copy_from_slice(&bytes[8 - size..]);
            target[0] |= COMPACT_LEAD[size];
        }
        Ok(self)
    }

    /// Appends ASN.1 BER length octets.
    ///
    /// Lengths up to 127 use the single octet short form. Longer lengths
    /// use the shortest long form, i.e., one of `0x81` to `0x84` followed
    /// by one to four big-endian length octets.
    pub fn append_ber_length(&mut self, length: u32) -> &mut Self {
        let bytes = length.to_be_bytes();
        if length < 0x80 {
            self.append_u8(bytes[3])
        }
        else {
            let skip = length.leading_zeros() as usize / 8;
            self.append_u8(0x80 | (4 - skip) as u8);
            self.append_slice(&bytes[skip..])
        }
    }

    /// Appends up to `len` bytes from a reader with a single read.
    ///
    /// Returns the number of bytes actually appended. This is zero if the
    /// reader has reached its end.
    pub fn append_from_read<R: io::Read + ?Sized>(
        &mut self, source: &mut R, len: usize
    ) -> Result<usize, io::Error> {
        self.ensure_additional_capacity(len);
        let start = self.length;
        let read = source.read(&mut self.buffer[start..start + len])?;
        self.length += read;
        Ok(read)
    }

    /// Appends exactly `len` bytes from a reader.
    ///
    /// If the reader can’t provide that many bytes, the builder’s length
    /// is not changed.
    pub fn append_read_exact<R: io::Read + ?Sized>(
        &mut self, source: &mut R, len: usize
    ) -> Result<&mut Self, io::Error> {
        self.ensure_additional_capacity(len);
        let start = self.length;
        source.read_exact(&mut self.buffer[start..start + len])?;
        self.length += len;
        Ok(self)
    }
}


/// # Modifying and Exporting
///
impl ByteStringBuilder {
    /// Sets the byte at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not within the assembled content.
    pub fn set_byte(&mut self, index: usize, b: u8) {
        self.as_mut_slice()[index] = b
    }

    /// Sets the length of the assembled content.
    ///
    /// If `new_len` is larger than the current length, the content is
    /// padded with zeros.
    pub fn set_length(&mut self, new_len: usize) -> &mut Self {
        if new_len > self.length {
            let extra = new_len - self.length;
            self.reserve_tail(extra).fill(0);
        }
        self.length = new_len;
        self
    }

    /// Clears the builder.
    ///
    /// The capacity of the builder is kept.
    pub fn clear(&mut self) -> &mut Self {
        self.length = 0;
        self
    }

    /// Clears the builder and releases an oversized buffer.
    ///
    /// If the current capacity is larger than `threshold_capacity`, the
    /// buffer is replaced by a new one of `new_capacity`. It is an error if
    /// `new_capacity` is larger than `threshold_capacity`. In this case the
    /// builder is left untouched.
    pub fn clear_and_truncate(
        &mut self, threshold_capacity: usize, new_capacity: usize
    ) -> Result<&mut Self, CapacityError> {
        if new_capacity > threshold_capacity {
            return Err(CapacityError {
                new_capacity, threshold_capacity
            })
        }
        if self.buffer.len() > threshold_capacity {
            tracing::trace!(
                capacity = self.buffer.len(), new_capacity,
                "releasing oversized buffer"
            );
            self.buffer = vec![0; new_capacity].into_boxed_slice();
        }
        self.length = 0;
        Ok(self)
    }

    /// Shrinks the capacity to the length of the assembled content.
    pub fn trim_to_size(&mut self) -> &mut Self {
        if self.buffer.len() > self.length {
            self.buffer = self.as_slice().into();
        }
        self
    }

    /// Writes the assembled content to a writer.
    pub fn copy_to_writer<W: io::Write + ?Sized>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self.as_slice())
    }

    /// Converts the builder into an immutable byte string without copying.
    pub fn into_byte_string(self) -> ByteString {
        let mut vec = Vec::from(self.buffer);
        vec.truncate(self.length);
        ByteString::from(vec)
    }
}


//--- Default

impl Default for ByteStringBuilder {
    fn default() -> Self {
        Self::new()
    }
}


//--- ByteSequence

impl ByteSequence for ByteStringBuilder {
    type Range<'a> = &'a [u8];

    fn range(&self, range: impl RangeBounds<usize>) -> Self::Range<'_> {
        self.as_slice().range(range)
    }
}


//--- Deref, AsRef, AsMut

impl ops::Deref for ByteStringBuilder {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for ByteStringBuilder {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for ByteStringBuilder {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}


//--- io::Write and fmt::Write

impl io::Write for ByteStringBuilder {
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        self.append_slice(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), io::Error> {
        self.append_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}

impl fmt::Write for ByteStringBuilder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]> + ?Sized> PartialEq<T> for ByteStringBuilder {
    fn eq(&self, other: &T) -> bool {
        self.as_slice().eq(other.as_ref())
    }
}

impl Eq for ByteStringBuilder { }


//--- PartialOrd and Ord

impl<T: AsRef<[u8]> + ?Sized> PartialOrd<T> for ByteStringBuilder {
    fn partial_cmp(&self, other: &T) -> Option<cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_ref())
    }
}

impl Ord for ByteStringBuilder {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}


//--- Hash

impl hash::Hash for ByteStringBuilder {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code())
    }
}


//--- Debug

impl fmt::Debug for ByteStringBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ByteStringBuilder")
            .field("content", &self.as_slice())
            .field("capacity", &self.capacity())
            .finish()
    }
}


//------------ compact_unsigned_len ------------------------------------------

/// Returns the number of bytes of the compact form of `value`.
///
/// Returns `None` if the value is too large for the compact form.
pub fn compact_unsigned_len(value: u64) -> Option<usize> {
    match value {
        0..=0x7f => Some(1),
        0x80..=0x3fff => Some(2),
        0x4000..=0x1f_ffff => Some(3),
        0x20_0000..=0x0fff_ffff => Some(4),
        0x1000_0000..=0x7_ffff_ffff => Some(5),
        0x8_0000_0000..=0x3ff_ffff_ffff => Some(6),
        0x400_0000_0000..=0x1_ffff_ffff_ffff => Some(7),
        0x2_0000_0000_0000..=COMPACTED_MAX_VALUE => Some(8),
        _ => None,
    }
}


//============ Error Types ===================================================

//------------ ValueOutOfRange -----------------------------------------------

/// A value was too large to be appended in compact form.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValueOutOfRange(pub u64);

impl fmt::Display for ValueOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "value out of range: {}", self.0)
    }
}

impl std::error::Error for ValueOutOfRange {}


//------------ CapacityError -------------------------------------------------

/// The arguments for truncating a builder’s buffer were inconsistent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CapacityError {
    pub new_capacity: usize,
    pub threshold_capacity: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "new capacity '{}' cannot be bigger than threshold \
                capacity '{}'",
            self.new_capacity, self.threshold_capacity
        )
    }
}

impl std::error::Error for CapacityError {}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;

    fn compact(value: u64) -> ByteStringBuilder {
        let mut builder = ByteStringBuilder::new();
        builder.append_compact_unsigned(value).unwrap();
        builder
    }

    #[test]
    fn growth_policy() {
        let mut builder = ByteStringBuilder::with_capacity(4);
        assert_eq!(builder.capacity(), 4);
        builder.append_slice(b"0123");
        assert_eq!(builder.capacity(), 4);
        builder.append_u8(b'4');
        assert_eq!(builder.capacity(), 8);
        builder.append_slice(b"0123456789");
        assert_eq!(builder.capacity(), 16);
        builder.append_slice(&[0; 20]);
        assert_eq!(builder.capacity(), 35);
        builder.ensure_additional_capacity(0);
        assert_eq!(builder.capacity(), 35);

        let mut builder = ByteStringBuilder::with_capacity(0);
        builder.ensure_additional_capacity(3);
        builder.ensure_additional_capacity(3);
        assert_eq!(builder.capacity(), 3);
        assert_eq!(ByteStringBuilder::new().capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn content_survives_reallocation() {
        let mut builder = ByteStringBuilder::with_capacity(1);
        let mut expected = std::vec::Vec::new();
        for i in 0..1000u32 {
            let chunk = i.to_be_bytes();
            builder.append_slice(&chunk[(i % 4) as usize..]);
            expected.extend_from_slice(&chunk[(i % 4) as usize..]);
        }
        assert_eq!(builder.len(), expected.len());
        assert_eq!(builder, expected);
    }

    #[test]
    fn fixed_width_integers() {
        let mut builder = ByteStringBuilder::new();
        builder
            .append_i16(0x1234)
            .append_i32(-2)
            .append_i64(0x0102030405060708)
            .append_u8(0xff);
        assert_eq!(
            builder,
            b"\x12\x34\xff\xff\xff\xfe\x01\x02\x03\x04\x05\x06\x07\x08\xff"
        );
    }

    #[test]
    fn text() {
        let mut builder = ByteStringBuilder::new();
        builder.append_str("a").append_chars(&['é', 'b']).append_str("€");
        assert_eq!(builder, "aéb€");
    }

    #[test]
    fn display_writes_integers_as_text() {
        let mut builder = ByteStringBuilder::new();
        builder.append_display(&1234).append_display("!");
        assert_eq!(builder, b"1234!");

        let mut binary = ByteStringBuilder::new();
        binary.append_i32(1234);
        assert_eq!(binary, b"\x00\x00\x04\xd2");
    }

    #[test]
    fn compact_lengths() {
        let table: &[(u64, usize)] = &[
            (0, 1), (0x7f, 1),
            (0x80, 2), (0x3fff, 2),
            (0x4000, 3), (0x1f_ffff, 3),
            (0x20_0000, 4), (0x0fff_ffff, 4),
            (0x1000_0000, 5), (0x7_ffff_ffff, 5),
            (0x8_0000_0000, 6), (0x3ff_ffff_ffff, 6),
            (0x400_0000_0000, 7), (0x1_ffff_ffff_ffff, 7),
            (0x2_0000_0000_0000, 8), (COMPACTED_MAX_VALUE, 8),
        ];
        for &(value, len) in table {
            assert_eq!(compact_unsigned_len(value), Some(len), "{:x}", value);
            assert_eq!(compact(value).len(), len, "{:x}", value);
        }
        assert_eq!(compact_unsigned_len(COMPACTED_MAX_VALUE + 1), None);
    }

    #[test]
    fn compact_bit_patterns() {
        assert_eq!(compact(0x05), b"\x05");
        assert_eq!(compact(0x80), b"\x80\x80");
        assert_eq!(compact(0x3fff), b"\xbf\xff");
        assert_eq!(compact(0x4000), b"\xc0\x40\x00");
        assert_eq!(compact(0x12_3456), b"\xd2\x34\x56");
        assert_eq!(compact(0x0123_4567), b"\xe1\x23\x45\x67");
        assert_eq!(compact(0x1000_0000), b"\xf0\x10\x00\x00\x00");
        assert_eq!(compact(0x3ff_ffff_ffff), b"\xfb\xff\xff\xff\xff\xff");
        assert_eq!(
            compact(0x1_0203_0405_0607), b"\xfd\x02\x03\x04\x05\x06\x07"
        );
    }

    #[test]
    fn compact_eight_byte_marker() {
        assert_eq!(
            compact(0x2_0000_0000_0000),
            b"\xfe\x02\x00\x00\x00\x00\x00\x00"
        );
        assert_eq!(
            compact(COMPACTED_MAX_VALUE),
            b"\xfe\xff\xff\xff\xff\xff\xff\xff"
        );
    }

    #[test]
    fn compact_out_of_range() {
        let mut builder = ByteStringBuilder::new();
        builder.append_u8(1);
        assert_eq!(
            builder.append_compact_unsigned(COMPACTED_MAX_VALUE + 1)
                .unwrap_err(),
            ValueOutOfRange(COMPACTED_MAX_VALUE + 1)
        );
        assert!(builder.append_compact_unsigned(u64::MAX).is_err());
        assert_eq!(builder, b"\x01");
    }

    #[test]
    fn compact_preserves_order() {
        let mut values = std::vec::Vec::new();
        for shift in 0..56 {
            let base = 1u64 << shift;
            values.extend_from_slice(&[base - 1, base, base + 1]);
        }
        values.push(COMPACTED_MAX_VALUE - 1);
        values.push(COMPACTED_MAX_VALUE);
        values.sort_unstable();
        values.dedup();
        for pair in values.windows(2) {
            let (a, b) = (compact(pair[0]), compact(pair[1]));
            assert!(
                a.as_slice() < b.as_slice(),
                "{:x} vs {:x}", pair[0], pair[1]
            );
        }
    }

    #[test]
    fn ber_length() {
        fn ber(len: u32) -> ByteStringBuilder {
            let mut builder = ByteStringBuilder::new();
            builder.append_ber_length(len);
            builder
        }

        assert_eq!(ber(0), b"\x00");
        assert_eq!(ber(0x7f), b"\x7f");
        assert_eq!(ber(0x80), b"\x81\x80");
        assert_eq!(ber(0xff), b"\x81\xff");
        assert_eq!(ber(0x100), b"\x82\x01\x00");
        assert_eq!(ber(0xffff), b"\x82\xff\xff");
        assert_eq!(ber(0x1_0000), b"\x83\x01\x00\x00");
        assert_eq!(ber(0xff_ffff), b"\x83\xff\xff\xff");
        assert_eq!(ber(0x100_0000), b"\x84\x01\x00\x00\x00");
        assert_eq!(ber(u32::MAX), b"\x84\xff\xff\xff\xff");
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut builder = ByteStringBuilder::with_capacity(8);
        builder.append_slice(b"0123456789");
        let capacity = builder.capacity();
        builder.clear();
        assert!(builder.is_empty());
        assert_eq!(builder.capacity(), capacity);
    }

    #[test]
    fn clear_and_truncate() {
        let mut builder = ByteStringBuilder::with_capacity(100);
        builder.append_slice(b"data");
        assert_eq!(
            builder.clear_and_truncate(10, 20).unwrap_err(),
            CapacityError { new_capacity: 20, threshold_capacity: 10 }
        );
        assert_eq!(builder, b"data");

        builder.clear_and_truncate(200, 10).unwrap();
        assert!(builder.is_empty());
        assert_eq!(builder.capacity(), 100);

        builder.append_slice(b"data");
        builder.clear_and_truncate(50, 10).unwrap();
        assert!(builder.is_empty());
        assert_eq!(builder.capacity(), 10);
    }

    #[test]
    fn byte_string_is_a_copy() {
        let mut builder = ByteStringBuilder::new();
        builder.append_str("first");
        let copy = builder.to_byte_string();
        builder.clear();
        builder.append_str("other");
        assert_eq!(copy, "first");
        assert_eq!(builder.into_byte_string(), "other");
    }

    #[test]
    fn sub_sequence_views() {
        let mut builder = ByteStringBuilder::new();
        builder.append_str("cn=Jane Doe");
        {
            let view = builder.sub_sequence(3, 7);
            assert_eq!(view, b"Jane");
            assert_eq!(view.sub_sequence(1, 3), b"an");
        }
        builder.clear();
        builder.append_str("x");
        assert_eq!(builder.sub_sequence(0, 1), b"x");
    }

    #[test]
    #[should_panic]
    fn sub_sequence_beyond_length() {
        let mut builder = ByteStringBuilder::with_capacity(16);
        builder.append_str("abc");
        let _ = builder.sub_sequence(0, 4);
    }

    #[test]
    fn set_byte_and_length() {
        let mut builder = ByteStringBuilder::with_capacity(2);
        builder.append_str("abc");
        builder.set_byte(1, b'X');
        assert_eq!(builder, b"aXc");
        builder.set_length(5);
        assert_eq!(builder, b"aXc\0\0");
        builder.set_length(1);
        assert_eq!(builder, b"a");
        builder.trim_to_size();
        assert_eq!(builder.capacity(), 1);
    }

    #[test]
    #[should_panic]
    fn set_byte_out_of_bounds() {
        let mut builder = ByteStringBuilder::new();
        builder.append_str("abc");
        builder.set_byte(3, 0);
    }

    #[test]
    fn from_readers() {
        let mut builder = ByteStringBuilder::new();
        let mut reader = ByteSequenceReader::from_static(b"0123456789");
        builder.append_reader(&mut reader, 4).unwrap();
        assert_eq!(reader.position(), 4);
        assert!(builder.append_reader(&mut reader, 7).is_err());
        assert_eq!(reader.position(), 4);
        assert_eq!(builder, b"0123");

        let mut source: &[u8] = b"abcdef";
        assert_eq!(builder.append_from_read(&mut source, 4).unwrap(), 4);
        builder.append_read_exact(&mut source, 2).unwrap();
        assert_eq!(builder, b"0123abcdef");
        assert_eq!(builder.append_from_read(&mut source, 4).unwrap(), 0);

        let mut source: &[u8] = b"xy";
        assert!(builder.append_read_exact(&mut source, 3).is_err());
        assert_eq!(builder, b"0123abcdef");
    }

    #[test]
    fn writers() {
        let mut builder = ByteStringBuilder::new();
        write!(builder, "{}-{}", 1, "two").unwrap();
        assert_eq!(builder, b"1-two");

        let mut out = std::vec::Vec::new();
        builder.copy_to_writer(&mut out).unwrap();
        assert_eq!(out, b"1-two");
    }

    #[test]
    fn equality_and_hash_follow_content() {
        let mut small = ByteStringBuilder::with_capacity(3);
        let mut large = ByteStringBuilder::with_capacity(300);
        small.append_str("abc");
        large.append_str("abc");
        assert_eq!(small, large);
        assert_eq!(small.hash_code(), ByteString::from("abc").hash_code());
        assert_eq!(ByteStringBuilder::from_sequence("abc"), small);
    }
}
