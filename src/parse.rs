//! Reading data from a byte sequence.
//!
//! Reading is a little more complicated than building since encoded data
//! may very well be broken. The type [`ByteSequenceReader`] wraps a
//! reference to a byte sequence and allows to take values from it one after
//! another. It understands everything a
//! [`ByteStringBuilder`][crate::builder::ByteStringBuilder] can append.
//!
//! Since the reader holds a shared reference to its sequence, the sequence
//! can’t change underneath it. In particular, a builder can’t be cleared
//! while a reader over it is around.

use core::fmt;
use std::string::String;
use crate::octets::ByteSequence;
use crate::types::ByteString;


//------------ ByteSequenceReader --------------------------------------------

/// A reader for sequentially extracting data from a byte sequence.
///
/// The reader wraps a reference to a byte sequence and remembers the read
/// position within it. The position is always between zero and the length
/// of the sequence. Methods allow reading out data and progressing the
/// position beyond processed data, as well as moving the position back and
/// forth.
///
/// Whenever there isn’t enough data left for an operation, the reader stays
/// where it was and an error is returned.
#[derive(Debug)]
pub struct ByteSequenceReader<'a, Octs: ?Sized> {
    /// The underlying byte sequence.
    octets: &'a Octs,

    /// The current position of the reader from the beginning of `octets`.
    pos: usize,

    /// The length of the sequence available to the reader.
    ///
    /// This starts out as the length of the underlying sequence and is
    /// shorter for readers created via `get_reader`.
    len: usize,
}

impl<'a, Octs: ?Sized> ByteSequenceReader<'a, Octs> {
    /// Creates a new reader atop a reference to a byte sequence.
    pub fn from_ref(octets: &'a Octs) -> Self
    where
        Octs: AsRef<[u8]>,
    {
        ByteSequenceReader {
            pos: 0,
            len: octets.as_ref().len(),
            octets,
        }
    }

    /// Returns the wrapped reference to the underlying sequence.
    pub fn octets_ref(&self) -> &'a Octs {
        self.octets
    }

    /// Returns the current read position as an index into the sequence.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the length of the sequence available to the reader.
    ///
    /// This is _not_ the number of bytes left for reading. Use
    /// [`remaining`](Self::remaining) for that.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the available sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.len - self.pos
    }

    /// Moves the position back to the start of the sequence.
    pub fn rewind(&mut self) {
        self.pos = 0
    }

    /// Moves the position to the end of the sequence.
    pub fn skip_to_end(&mut self) {
        self.pos = self.len
    }

    /// Moves the position to the given index.
    ///
    /// It is okay to move anywhere within the sequence, including its very
    /// end. If `pos` is beyond the end, an error is returned.
    pub fn set_position(&mut self, pos: usize) -> Result<(), ShortInput> {
        if pos > self.len {
            Err(ShortInput(()))
        }
        else {
            self.pos = pos;
            Ok(())
        }
    }

    /// Moves the position relative to the current one.
    ///
    /// A negative `delta` moves backwards. If the new position would lie
    /// outside the sequence, an error is returned.
    pub fn skip(&mut self, delta: isize) -> Result<(), ShortInput> {
        match self.pos.checked_add_signed(delta) {
            Some(pos) => self.set_position(pos),
            None => Err(ShortInput(())),
        }
    }

    /// Checks that there are `len` bytes left to read.
    pub fn check_len(&self, len: usize) -> Result<(), ShortInput> {
        if self.remaining() < len {
            Err(ShortInput(()))
        }
        else {
            Ok(())
        }
    }
}

impl ByteSequenceReader<'static, [u8]> {
    /// Creates a new reader atop a static byte slice.
    ///
    /// This function is most useful for testing.
    pub fn from_static(slice: &'static [u8]) -> Self {
        Self::from_ref(slice)
    }
}

impl<'a, Octs: AsRef<[u8]> + ?Sized> ByteSequenceReader<'a, Octs> {
    /// Returns the available part of the sequence as a slice.
    ///
    /// The slice covers the entire sequence, not just the remaining data.
    /// You can use [`peek_all`](Self::peek_all) for that.
    pub fn as_slice(&self) -> &'a [u8] {
        &self.octets.as_ref()[..self.len]
    }

    /// Returns a slice of the next `len` bytes without advancing.
    pub fn peek(&self, len: usize) -> Result<&'a [u8], ShortInput> {
        self.check_len(len)?;
        Ok(&self.peek_all()[..len])
    }

    /// Returns the next byte without advancing, if there is one.
    pub fn peek_u8(&self) -> Option<u8> {
        self.peek_all().first().copied()
    }

    /// Returns a slice of the data left to read.
    pub fn peek_all(&self) -> &'a [u8] {
        &self.as_slice()[self.pos..]
    }

    /// Takes and returns the next `len` bytes as a slice.
    pub fn get_bytes(&mut self, len: usize) -> Result<&'a [u8], ShortInput> {
        let res = self.peek(len)?;
        self.pos += len;
        Ok(res)
    }

    /// Takes and returns the next `len` bytes as a range of the sequence.
    ///
    /// For shareable sequences such as
    /// [`ByteString`] the range refers to the same storage.
    pub fn get_range(
        &mut self, len: usize
    ) -> Result<Octs::Range<'a>, ShortInput>
    where
        Octs: ByteSequence,
    {
        self.check_len(len)?;
        let res = self.octets.range(self.pos..self.pos + len);
        self.pos += len;
        Ok(res)
    }

    /// Takes the next `len` bytes as an immutable byte string.
    pub fn get_byte_string(
        &mut self, len: usize
    ) -> Result<ByteString, ShortInput>
    where
        Octs: ByteSequence,
    {
        self.get_range(len).map(|range| range.to_byte_string())
    }

    /// Takes the next `len` bytes and decodes them as UTF-8.
    ///
    /// Invalid sequences are replaced with `U+FFFD REPLACEMENT CHARACTER`.
    pub fn get_string(&mut self, len: usize) -> Result<String, ShortInput> {
        self.get_bytes(len)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Fills the provided buffer by taking bytes from the reader.
    pub fn parse_buf(&mut self, buf: &mut [u8]) -> Result<(), ShortInput> {
        buf.copy_from_slice(self.get_bytes(buf.len())?);
        Ok(())
    }

    /// Takes as many bytes as requested and returns a reader for them.
    ///
    /// The returned reader is limited to the requested bytes and positioned
    /// at wherever `self` was positioned. The `self` reader is advanced
    /// past them.
    pub fn get_reader(&mut self, len: usize) -> Result<Self, ShortInput> {
        self.check_len(len)?;
        let mut res = *self;
        res.len = res.pos + len;
        self.pos += len;
        Ok(res)
    }

    /// Takes a `u8`.
    pub fn get_u8(&mut self) -> Result<u8, ShortInput> {
        let res = self.peek(1)?[0];
        self.pos += 1;
        Ok(res)
    }

    /// Takes an `i8`.
    pub fn get_i8(&mut self) -> Result<i8, ShortInput> {
        self.get_u8().map(|b| b as i8)
    }

    /// Takes a big-endian `i16`.
    pub fn get_i16(&mut self) -> Result<i16, ShortInput> {
        let mut res = [0; 2];
        self.parse_buf(&mut res)?;
        Ok(i16::from_be_bytes(res))
    }

    /// Takes a big-endian `u16`.
    pub fn get_u16(&mut self) -> Result<u16, ShortInput> {
        let mut res = [0; 2];
        self.parse_buf(&mut res)?;
        Ok(u16::from_be_bytes(res))
    }

    /// Takes a big-endian `i32`.
    pub fn get_i32(&mut self) -> Result<i32, ShortInput> {
        let mut res = [0; 4];
        self.parse_buf(&mut res)?;
        Ok(i32::from_be_bytes(res))
    }

    /// Takes a big-endian `u32`.
    pub fn get_u32(&mut self) -> Result<u32, ShortInput> {
        let mut res = [0; 4];
        self.parse_buf(&mut res)?;
        Ok(u32::from_be_bytes(res))
    }

    /// Takes a big-endian `i64`.
    pub fn get_i64(&mut self) -> Result<i64, ShortInput> {
        let mut res = [0; 8];
        self.parse_buf(&mut res)?;
        Ok(i64::from_be_bytes(res))
    }

    /// Takes a big-endian `u64`.
    pub fn get_u64(&mut self) -> Result<u64, ShortInput> {
        let mut res = [0; 8];
        self.parse_buf(&mut res)?;
        Ok(u64::from_be_bytes(res))
    }

    /// Takes an unsigned integer in compact form.
    ///
    /// See
    /// [`ByteStringBuilder::append_compact_unsigned`][crate::builder::ByteStringBuilder::append_compact_unsigned]
    /// for a description of the encoding. A lead byte of `0xff` is never
    /// produced by the encoder and results in a form error.
    pub fn get_compact_unsigned(&mut self) -> Result<u64, ParseError> {
        let lead = self.peek(1)?[0];
        let extra = lead.leading_ones() as usize;
        let mut value = match extra {
            0 => {
                self.pos += 1;
                return Ok(u64::from(lead))
            }
            1..=6 => u64::from(lead & (0xff >> (extra + 1))),
            7 => 0,
            _ => return Err(ParseError::form("invalid compact integer")),
        };
        let bytes = self.peek(extra + 1)?;
        for &b in &bytes[1..] {
            value = (value << 8) | u64::from(b);
        }
        self.pos += extra + 1;
        Ok(value)
    }

    /// Takes ASN.1 BER length octets.
    ///
    /// Supports the short form and the long form with up to four length
    /// octets. The indefinite form and longer forms result in a form error.
    pub fn get_ber_length(&mut self) -> Result<u32, ParseError> {
        let first = self.peek(1)?[0];
        if first & 0x80 == 0 {
            self.pos += 1;
            return Ok(u32::from(first))
        }
        let count = usize::from(first & 0x7f);
        match count {
            0 => Err(ParseError::form("indefinite BER length")),
            1..=4 => {
                let bytes = self.peek(count + 1)?;
                let mut res = [0u8; 4];
                res[4 - count..].copy_from_slice(&bytes[1..]);
                self.pos += count + 1;
                Ok(u32::from_be_bytes(res))
            }
            _ => Err(ParseError::form("BER length too large")),
        }
    }
}


//--- Clone and Copy

impl<'a, Octs: ?Sized> Clone for ByteSequenceReader<'a, Octs> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, Octs: ?Sized> Copy for ByteSequenceReader<'a, Octs> { }


//--------- ShortInput -------------------------------------------------------

/// An attempt was made to go beyond the end of the reader.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ShortInput(());

//--- Display and Error

impl fmt::Display for ShortInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("unexpected end of input")
    }
}

impl std::error::Error for ShortInput {}


//--------- ParseError -------------------------------------------------------

/// An error happened while decoding an encoded value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The data ended before the value was complete.
    ShortInput,

    /// The data was not correctly encoded.
    Form(&'static str),
}

impl ParseError {
    /// Creates a form error with the given message.
    pub fn form(msg: &'static str) -> Self {
        ParseError::Form(msg)
    }
}

//--- From

impl From<ShortInput> for ParseError {
    fn from(_: ShortInput) -> Self {
        ParseError::ShortInput
    }
}

//--- Display and Error

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::ShortInput => f.write_str("unexpected end of input"),
            ParseError::Form(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}


//============ Testing =======================================================
