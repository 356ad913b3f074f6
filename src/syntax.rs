//! The string representation of distinguished names.
//!
//! This module contains the one grammar for DNs as described in RFC 4514.
//! It works on a byte cursor, so DNs given as text and DNs given as raw
//! octets, e.g., straight off the wire, are decoded by the very same code.
//!
//! It also contains the inverse: escaping attribute values when writing
//! DNs out as text.

use core::fmt;
use std::borrow::Cow;
use std::string::String;
use std::sync::Arc;
use std::vec::Vec;
use crate::parse::ByteSequenceReader;
use crate::rdn::Rdn;
use crate::schema::{AttributeType, Schema};
use crate::types::ByteString;


//------------ DecodeOptions -------------------------------------------------

/// Options for decoding DNs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DecodeOptions {
    /// Whether to accept attribute names violating the strict grammar.
    ///
    /// If enabled, attribute names may start with a digit and may contain
    /// underscores, although not as their first character. Some older
    /// directory data depends on this.
    pub allow_attribute_name_exceptions: bool,
}

impl DecodeOptions {
    /// Returns the options with attribute name exceptions allowed.
    pub fn allowing_exceptions() -> Self {
        DecodeOptions { allow_attribute_name_exceptions: true }
    }
}


//------------ DnCursor ------------------------------------------------------

/// A source of bytes for the DN grammar.
pub(crate) trait DnCursor {
    /// Returns the next byte without consuming it.
    fn peek_byte(&self) -> Option<u8>;

    /// Consumes and returns the next byte.
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns the offset of the next byte from the start of the input.
    fn offset(&self) -> usize;

    /// Returns the complete input as text for error messages.
    fn source(&self) -> Cow<'_, str>;
}

impl<Octs: AsRef<[u8]> + ?Sized> DnCursor for ByteSequenceReader<'_, Octs> {
    fn peek_byte(&self) -> Option<u8> {
        self.peek_u8()
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.get_u8().ok()
    }

    fn offset(&self) -> usize {
        self.position()
    }

    fn source(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_slice())
    }
}


//------------ Decoding ------------------------------------------------------

/// Decodes the sequence of RDNs of a DN, outermost RDN first.
///
/// An empty input or one consisting of spaces only is the root DN and
/// results in an empty vector.
pub(crate) fn decode_rdns<C: DnCursor>(
    cursor: C, schema: &dyn Schema, options: DecodeOptions
) -> Result<Vec<Rdn>, DnSyntaxError> {
    let mut parser = DnParser { cursor, schema, options };
    let res = parser.rdn_sequence();
    parser.finish(res)
}

/// Decodes a single RDN that must make up the entire input.
pub(crate) fn decode_rdn<C: DnCursor>(
    cursor: C, schema: &dyn Schema, options: DecodeOptions
) -> Result<Rdn, DnSyntaxError> {
    let mut parser = DnParser { cursor, schema, options };
    let res = parser.single_rdn();
    parser.finish(res)
}

struct DnParser<'s, C> {
    cursor: C,
    schema: &'s dyn Schema,
    options: DecodeOptions,
}

impl<C: DnCursor> DnParser<'_, C> {
    fn finish<T>(
        &self, res: Result<T, DnErrorKind>
    ) -> Result<T, DnSyntaxError> {
        res.map_err(|kind| {
            let err = DnSyntaxError {
                dn: self.cursor.source().into_owned(),
                kind
            };
            tracing::debug!(dn = %err.dn, error = %err, "rejected DN");
            err
        })
    }

    fn rdn_sequence(&mut self) -> Result<Vec<Rdn>, DnErrorKind> {
        let mut rdns = Vec::new();
        self.skip_spaces();
        if self.cursor.peek_byte().is_none() {
            return Ok(rdns)
        }
        loop {
            rdns.push(self.rdn()?);
            match self.cursor.next_byte() {
                None => return Ok(rdns),
                // `rdn` only returns on end of input or a separator.
                Some(_) => self.expect_more()?,
            }
        }
    }

    fn single_rdn(&mut self) -> Result<Rdn, DnErrorKind> {
        let rdn = self.rdn()?;
        let pos = self.cursor.offset();
        match self.cursor.peek_byte() {
            None => Ok(rdn),
            Some(ch) => Err(DnErrorKind::IllegalCharacter { ch, pos }),
        }
    }

    /// Parses an RDN up to the separator following it.
    ///
    /// Leaves the separator in place. Returns on end of input, too.
    fn rdn(&mut self) -> Result<Rdn, DnErrorKind> {
        let (name, attr_type, value) = self.ava()?;
        let mut rdn = Rdn::new(attr_type, name, value);
        while self.cursor.peek_byte() == Some(b'+') {
            self.cursor.next_byte();
            self.expect_more()?;
            let (name, attr_type, value) = self.ava()?;
            if !rdn.add_value(attr_type, name.as_str(), value) {
                return Err(DnErrorKind::DuplicateAttributeType { name })
            }
        }
        let pos = self.cursor.offset();
        match self.cursor.peek_byte() {
            None | Some(b',') | Some(b';') => Ok(rdn),
            Some(ch) => Err(DnErrorKind::IllegalCharacter { ch, pos }),
        }
    }

    /// Parses an attribute value assertion and the spaces following it.
    fn ava(
        &mut self
    ) -> Result<(String, Arc<AttributeType>, ByteString), DnErrorKind> {
        let (name, attr_type) = self.attribute_name()?;
        let value = self.attribute_value()?;
        self.skip_spaces();
        Ok((name, attr_type, value))
    }

    /// Skips spaces after a separator and checks that something follows.
    fn expect_more(&mut self) -> Result<(), DnErrorKind> {
        self.skip_spaces();
        match self.cursor.peek_byte() {
            None => Err(DnErrorKind::EndsWithSeparator),
            Some(_) => Ok(()),
        }
    }

    fn skip_spaces(&mut self) {
        while self.cursor.peek_byte() == Some(b' ') {
            self.cursor.next_byte();
        }
    }

    /// Parses an attribute name including the following equals sign.
    fn attribute_name(
        &mut self
    ) -> Result<(String, Arc<AttributeType>), DnErrorKind> {
        let allow = self.options.allow_attribute_name_exceptions;
        self.skip_spaces();
        let mut name = String::new();
        let mut check_oid = false;
        loop {
            let pos = self.cursor.offset();
            let ch = match self.cursor.peek_byte() {
                Some(b' ') | Some(b'=') => break,
                Some(ch) => ch,
                None if name.is_empty() => return Err(DnErrorKind::NoName),
                None => {
                    return Err(DnErrorKind::EndsWithAttributeName { name })
                }
            };
            match ch {
                b'-' if name.is_empty() => {
                    return Err(DnErrorKind::IllegalInitialDash)
                }
                b'_' if name.is_empty() => {
                    return Err(DnErrorKind::IllegalInitialUnderscore)
                }
                b'_' if !allow => {
                    return Err(DnErrorKind::IllegalUnderscore)
                }
                b'.' => check_oid = true,
                b'-' | b'_' => { }
                ch if ch.is_ascii_alphanumeric() => { }
                ch => {
                    return Err(DnErrorKind::AttributeIllegalCharacter {
                        ch, pos
                    })
                }
            }
            name.push(char::from(ch));
            self.cursor.next_byte();
        }

        if name.is_empty() {
            return Err(DnErrorKind::NoName)
        }
        if check_oid {
            name = numeric_oid(name)?;
        }
        else if name.as_bytes()[0].is_ascii_digit() && !allow {
            return Err(DnErrorKind::IllegalInitialDigit { name })
        }

        self.skip_spaces();
        let pos = self.cursor.offset();
        match self.cursor.next_byte() {
            Some(b'=') => { }
            Some(ch) => return Err(DnErrorKind::NoEquals { name, ch, pos }),
            None => {
                return Err(DnErrorKind::EndsWithAttributeName { name })
            }
        }
        self.skip_spaces();

        let attr_type = self.schema.resolve(&name);
        Ok((name, attr_type))
    }

    fn attribute_value(&mut self) -> Result<ByteString, DnErrorKind> {
        let pos = self.cursor.offset();
        match self.cursor.peek_byte() {
            None => Ok(ByteString::empty()),
            Some(b'#') => {
                self.cursor.next_byte();
                self.hex_value()
            }
            Some(b'"') => {
                self.cursor.next_byte();
                self.quoted_value()
            }
            Some(ch @ (b'+' | b',')) => {
                Err(DnErrorKind::RequiresEscape { ch, pos })
            }
            Some(_) => self.unquoted_value(),
        }
    }

    /// Parses the hex digits of a value that started with `#`.
    fn hex_value(&mut self) -> Result<ByteString, DnErrorKind> {
        let mut res = Vec::new();
        loop {
            let pos = self.cursor.offset();
            let high = match self.cursor.peek_byte() {
                None | Some(b' ' | b',' | b';' | b'+') => break,
                Some(ch) => hex_digit(ch).ok_or(
                    DnErrorKind::InvalidHexDigit { ch, pos }
                )?,
            };
            self.cursor.next_byte();
            let pos = self.cursor.offset();
            let low = match self.cursor.next_byte() {
                Some(ch) => hex_digit(ch).ok_or(
                    DnErrorKind::InvalidHexDigit { ch, pos }
                )?,
                None => return Err(DnErrorKind::InvalidHexLength),
            };
            res.push(high << 4 | low);
        }
        if res.is_empty() {
            return Err(DnErrorKind::InvalidHexLength)
        }
        Ok(res.into())
    }

    /// Parses a value after its opening quote up to the closing quote.
    fn quoted_value(&mut self) -> Result<ByteString, DnErrorKind> {
        let mut value = ValueBuf::default();
        loop {
            match self.cursor.next_byte() {
                None => return Err(DnErrorKind::UnmatchedQuote),
                Some(b'"') => break,
                Some(b'\\') => self.escape(&mut value)?,
                Some(ch) => value.push(ch, true),
            }
        }
        Ok(value.finish())
    }

    /// Parses a value up to the next unescaped separator.
    ///
    /// Unescaped trailing spaces are not part of the value.
    fn unquoted_value(&mut self) -> Result<ByteString, DnErrorKind> {
        let mut value = ValueBuf::default();
        loop {
            match self.cursor.peek_byte() {
                None | Some(b',' | b';' | b'+') => break,
                Some(b'\\') => {
                    self.cursor.next_byte();
                    self.escape(&mut value)?;
                }
                Some(ch) => {
                    self.cursor.next_byte();
                    value.push(ch, ch != b' ');
                }
            }
        }
        Ok(value.finish())
    }

    /// Processes an escape sequence after its backslash.
    fn escape(&mut self, value: &mut ValueBuf) -> Result<(), DnErrorKind> {
        let pos = self.cursor.offset();
        let ch = match self.cursor.next_byte() {
            Some(ch) => ch,
            None => return Err(DnErrorKind::InvalidEscape { pos }),
        };
        match hex_digit(ch) {
            Some(high) => {
                let low = self.cursor.next_byte().and_then(hex_digit).ok_or(
                    DnErrorKind::InvalidEscape { pos }
                )?;
                value.push_hex(high << 4 | low);
            }
            None => value.push(ch, true),
        }
        Ok(())
    }
}

fn hex_digit(ch: u8) -> Option<u8> {
    char::from(ch).to_digit(16).map(|digit| digit as u8)
}

/// Checks a dotted attribute name and strips an `oid.` prefix.
fn numeric_oid(name: String) -> Result<String, DnErrorKind> {
    let digits = match name.as_bytes()[0] {
        b'o' | b'O' => {
            if name.len() > 4 && name[..4].eq_ignore_ascii_case("oid.") {
                &name[4..]
            }
            else {
                return Err(DnErrorKind::IllegalPeriod { name })
            }
        }
        _ => name.as_str(),
    };
    let valid = digits.split('.').all(|part| {
        !part.is_empty() && part.bytes().all(|ch| ch.is_ascii_digit())
    });
    if valid {
        Ok(String::from(digits))
    }
    else {
        Err(DnErrorKind::IllegalPeriod { name })
    }
}


//------------ ValueBuf ------------------------------------------------------

/// The content of an attribute value while it is being parsed.
///
/// Bytes given as hex escapes are collected separately and decoded as
/// UTF-8 once the run of hex escapes ends, so that multi-byte characters
/// can be escaped byte by byte.
#[derive(Default)]
struct ValueBuf {
    bytes: Vec<u8>,
    hex: Vec<u8>,

    /// The length up to and including the last significant byte.
    keep: usize,
}

impl ValueBuf {
    fn push(&mut self, ch: u8, significant: bool) {
        self.flush_hex();
        self.bytes.push(ch);
        if significant {
            self.keep = self.bytes.len();
        }
    }

    fn push_hex(&mut self, ch: u8) {
        self.hex.push(ch);
    }

    fn flush_hex(&mut self) {
        if !self.hex.is_empty() {
            self.bytes.extend_from_slice(
                String::from_utf8_lossy(&self.hex).as_bytes()
            );
            self.hex.clear();
            self.keep = self.bytes.len();
        }
    }

    fn finish(mut self) -> ByteString {
        self.flush_hex();
        self.bytes.truncate(self.keep);
        self.bytes.into()
    }
}


//------------ Encoding ------------------------------------------------------

/// Appends an attribute value escaped for use in a DN string.
///
/// Values that are valid UTF-8 are escaped as required by RFC 4514. All
/// other values are written in their `#` hex form.
pub(crate) fn escape_value(value: &[u8], target: &mut String) {
    let text = match core::str::from_utf8(value) {
        Ok(text) => text,
        Err(_) => {
            target.push('#');
            target.push_str(&hex::encode(value));
            return
        }
    };
    let last = text.len().saturating_sub(1);
    for (idx, ch) in text.char_indices() {
        match ch {
            '"' | '+' | ',' | ';' | '<' | '>' | '\\' => {
                target.push('\\');
                target.push(ch);
            }
            '#' if idx == 0 => target.push_str("\\#"),
            ' ' if idx == 0 || idx == last => target.push_str("\\ "),
            '\0'..='\x1f' | '\x7f' => {
                target.push('\\');
                target.push_str(&hex::encode([ch as u8]));
            }
            _ => target.push(ch),
        }
    }
}


//============ Error Types ===================================================

//------------ DnSyntaxError -------------------------------------------------

/// A DN could not be decoded.
///
/// The error keeps the complete DN that was attempted and the reason why
/// it was rejected. Its `Display` output is suitable for the diagnostic
/// message of an LDAP result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DnSyntaxError {
    dn: String,
    kind: DnErrorKind,
}

impl DnSyntaxError {
    /// The LDAP result code for an invalid DN syntax.
    pub const RESULT_CODE: u32 = 34;

    /// Returns the DN that was rejected.
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// Returns what went wrong.
    pub fn kind(&self) -> &DnErrorKind {
        &self.kind
    }

    /// Returns the LDAP result code to report for this error.
    pub fn result_code(&self) -> u32 {
        Self::RESULT_CODE
    }
}

impl fmt::Display for DnSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "the value \"{}\" is not a valid distinguished name: {}",
            self.dn, self.kind
        )
    }
}

impl std::error::Error for DnSyntaxError {}


//------------ DnErrorKind ---------------------------------------------------

/// The reason a DN was rejected.
///
/// Positions are byte offsets into the DN.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum DnErrorKind {
    /// An RDN component has no attribute name.
    NoName,

    /// The DN ended within or right after an attribute name.
    EndsWithAttributeName { name: String },

    /// An attribute name is followed by something other than `=`.
    NoEquals { name: String, ch: u8, pos: usize },

    /// An attribute name contains a character not allowed there.
    AttributeIllegalCharacter { ch: u8, pos: usize },

    /// An attribute name starts with a dash.
    IllegalInitialDash,

    /// An attribute name starts with an underscore.
    IllegalInitialUnderscore,

    /// An attribute name contains an underscore.
    IllegalUnderscore,

    /// An attribute name starts with a digit but isn’t an OID.
    IllegalInitialDigit { name: String },

    /// An attribute name contains a period but isn’t a valid OID.
    IllegalPeriod { name: String },

    /// A value is followed by an unexpected character.
    IllegalCharacter { ch: u8, pos: usize },

    /// The DN ends with a separator.
    EndsWithSeparator,

    /// A value starts with a character that needs to be escaped.
    RequiresEscape { ch: u8, pos: usize },

    /// A hex value contains something other than hex digits.
    InvalidHexDigit { ch: u8, pos: usize },

    /// A hex value is empty or has an odd number of digits.
    InvalidHexLength,

    /// A quoted value lacks its closing quote.
    UnmatchedQuote,

    /// A backslash is not followed by a character or two hex digits.
    InvalidEscape { pos: usize },

    /// An attribute type appears twice in the same RDN.
    DuplicateAttributeType { name: String },
}

/// Formats a byte from the input for an error message.
struct ShowByte(u8);

impl fmt::Display for ShowByte {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_ascii_graphic() || self.0 == b' ' {
            write!(f, "'{}'", char::from(self.0))
        }
        else {
            write!(f, "0x{:02x}", self.0)
        }
    }
}

impl fmt::Display for DnErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use DnErrorKind::*;

        match *self {
            NoName => f.write_str("an RDN component has no attribute name"),
            EndsWithAttributeName { ref name } => {
                write!(f, "it ends with the attribute name '{}'", name)
            }
            NoEquals { ref name, ch, pos } => {
                write!(
                    f, "attribute name '{}' is followed by {} at position \
                        {} rather than an equal sign",
                    name, ShowByte(ch), pos
                )
            }
            AttributeIllegalCharacter { ch, pos } => {
                write!(
                    f, "the character {} at position {} is not allowed in \
                        an attribute name",
                    ShowByte(ch), pos
                )
            }
            IllegalInitialDash => {
                f.write_str("an attribute name starts with a dash")
            }
            IllegalInitialUnderscore => {
                f.write_str("an attribute name starts with an underscore")
            }
            IllegalUnderscore => {
                f.write_str(
                    "an attribute name contains an underscore, which is \
                     only allowed if attribute name exceptions are enabled"
                )
            }
            IllegalInitialDigit { ref name } => {
                write!(
                    f, "the attribute name '{}' starts with a digit but \
                        is not a valid OID",
                    name
                )
            }
            IllegalPeriod { ref name } => {
                write!(
                    f, "the attribute name '{}' contains a period but is \
                        not a valid OID",
                    name
                )
            }
            IllegalCharacter { ch, pos } => {
                write!(
                    f, "the character {} at position {} is not allowed \
                        after an attribute value",
                    ShowByte(ch), pos
                )
            }
            EndsWithSeparator => {
                f.write_str("it ends with a separator")
            }
            RequiresEscape { ch, pos } => {
                write!(
                    f, "the value at position {} starts with {}, which \
                        must be escaped",
                    pos, ShowByte(ch)
                )
            }
            InvalidHexDigit { ch, pos } => {
                write!(
                    f, "the character {} at position {} is not a valid \
                        hex digit",
                    ShowByte(ch), pos
                )
            }
            InvalidHexLength => {
                f.write_str(
                    "a hex value is empty or has an odd number of digits"
                )
            }
            UnmatchedQuote => {
                f.write_str("a quoted value has no closing quote")
            }
            InvalidEscape { pos } => {
                write!(f, "the escape sequence at position {} is invalid", pos)
            }
            DuplicateAttributeType { ref name } => {
                write!(
                    f, "the attribute type '{}' appears more than once in \
                        an RDN",
                    name
                )
            }
        }
    }
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::octets::ByteSequence;
    use crate::schema::CoreSchema;

    fn rdns(s: &str) -> Result<Vec<Rdn>, DnErrorKind> {
        decode_rdns(
            ByteSequenceReader::from_ref(s), CoreSchema::global(),
            DecodeOptions::default()
        ).map_err(|err| err.kind().clone())
    }

    fn rdns_lenient(s: &str) -> Result<Vec<Rdn>, DnErrorKind> {
        decode_rdns(
            ByteSequenceReader::from_ref(s), CoreSchema::global(),
            DecodeOptions::allowing_exceptions()
        ).map_err(|err| err.kind().clone())
    }

    fn value(s: &str) -> ByteString {
        let rdns = rdns(s).unwrap();
        assert_eq!(rdns.len(), 1, "{}", s);
        rdns[0].attribute_value(0).clone()
    }

    fn escaped(value: &[u8]) -> String {
        let mut res = String::new();
        escape_value(value, &mut res);
        res
    }

    #[test]
    fn empty_is_root() {
        assert!(rdns("").unwrap().is_empty());
        assert!(rdns("   ").unwrap().is_empty());
    }

    #[test]
    fn spaces_around_components() {
        let rdns = rdns("  cn = John Smith  ,  ou=people ;dc=example").unwrap();
        assert_eq!(rdns.len(), 3);
        assert_eq!(rdns[0].attribute_name(0), "cn");
        assert_eq!(rdns[0].attribute_value(0), "John Smith");
        assert_eq!(rdns[1].attribute_value(0), "people");
        assert_eq!(rdns[2].attribute_value(0), "example");
    }

    #[test]
    fn multi_valued() {
        let rdns = rdns("cn=John + sn=Smith,dc=com").unwrap();
        assert_eq!(rdns.len(), 2);
        assert!(rdns[0].is_multi_valued());
        assert_eq!(rdns[0].attribute_name(1), "sn");
        assert_eq!(rdns[0].attribute_value(1), "Smith");
        assert_eq!(
            self::rdns("cn=a+cn=b"),
            Err(DnErrorKind::DuplicateAttributeType { name: "cn".into() })
        );
    }

    #[test]
    fn escapes() {
        assert_eq!(value("cn=Jane\\, Doe"), "Jane, Doe");
        assert_eq!(value("cn=a\\+b\\;c\\\\d"), "a+b;c\\d");
        assert_eq!(value("cn=\\#1"), "#1");
        assert_eq!(value("cn=Lu\\C4\\8Di\\C4\\87"), "Lučić");
        assert_eq!(value("cn=\\4a\\4F"), "JO");
        assert_eq!(value("cn=\\ff"), "\u{fffd}");
        assert_eq!(
            rdns("cn=a\\"), Err(DnErrorKind::InvalidEscape { pos: 5 })
        );
        assert_eq!(
            rdns("cn=a\\4"), Err(DnErrorKind::InvalidEscape { pos: 5 })
        );
        assert_eq!(
            rdns("cn=a\\4x"), Err(DnErrorKind::InvalidEscape { pos: 5 })
        );
    }

    #[test]
    fn trailing_spaces() {
        assert_eq!(value("cn=a b   "), "a b");
        assert_eq!(value("cn=a\\  "), "a ");
        assert_eq!(value("cn=a\\20 "), "a ");
        assert_eq!(value("cn=\\ a"), " a");
        assert_eq!(value("cn="), "");
        assert_eq!(value("cn=   "), "");
    }

    #[test]
    fn quoted() {
        assert_eq!(value("cn=\"Doe, Jane\""), "Doe, Jane");
        assert_eq!(value("cn=\" a+b \"  "), " a+b ");
        assert_eq!(value("cn=\"say \\\"hi\\\"\""), "say \"hi\"");
        assert_eq!(rdns("cn=\"open"), Err(DnErrorKind::UnmatchedQuote));
        assert_eq!(
            rdns("cn=\"a\"b"),
            Err(DnErrorKind::IllegalCharacter { ch: b'b', pos: 6 })
        );
    }

    #[test]
    fn hex() {
        assert_eq!(value("cn=#04024869"), b"\x04\x02Hi");
        assert_eq!(value("cn=#0A0b "), b"\x0a\x0b");
        assert_eq!(rdns("cn=#0A0b+sn=x").unwrap()[0].num_values(), 2);
        assert_eq!(rdns("cn=#"), Err(DnErrorKind::InvalidHexLength));
        assert_eq!(rdns("cn=#123"), Err(DnErrorKind::InvalidHexLength));
        assert_eq!(
            rdns("cn=#1g"),
            Err(DnErrorKind::InvalidHexDigit { ch: b'g', pos: 5 })
        );
        assert_eq!(
            rdns("cn=#1,"),
            Err(DnErrorKind::InvalidHexDigit { ch: b',', pos: 5 })
        );
    }

    #[test]
    fn value_separators() {
        assert_eq!(
            rdns("cn=,dc=com"),
            Err(DnErrorKind::RequiresEscape { ch: b',', pos: 3 })
        );
        assert_eq!(
            rdns("cn=+b"),
            Err(DnErrorKind::RequiresEscape { ch: b'+', pos: 3 })
        );
        assert_eq!(rdns("cn=foo,"), Err(DnErrorKind::EndsWithSeparator));
        assert_eq!(rdns("cn=foo,  "), Err(DnErrorKind::EndsWithSeparator));
        assert_eq!(rdns("cn=foo+"), Err(DnErrorKind::EndsWithSeparator));
        assert_eq!(rdns(",cn=foo"), Err(
            DnErrorKind::AttributeIllegalCharacter { ch: b',', pos: 0 }
        ));
    }

    #[test]
    fn attribute_names() {
        assert_eq!(rdns("=x"), Err(DnErrorKind::NoName));
        assert_eq!(
            rdns("cn"),
            Err(DnErrorKind::EndsWithAttributeName { name: "cn".into() })
        );
        assert_eq!(
            rdns("cn "),
            Err(DnErrorKind::EndsWithAttributeName { name: "cn".into() })
        );
        assert_eq!(
            rdns("cn x=y"),
            Err(DnErrorKind::NoEquals {
                name: "cn".into(), ch: b'x', pos: 3
            })
        );
        assert_eq!(
            rdns("c:n=x"),
            Err(DnErrorKind::AttributeIllegalCharacter { ch: b':', pos: 1 })
        );
        assert_eq!(rdns("-cn=x"), Err(DnErrorKind::IllegalInitialDash));
        assert_eq!(rdns("_cn=x"), Err(DnErrorKind::IllegalInitialUnderscore));
        assert_eq!(rdns("c_n=x"), Err(DnErrorKind::IllegalUnderscore));
        assert_eq!(rdns("c-n=x").unwrap()[0].attribute_name(0), "c-n");
        assert_eq!(
            rdns("1cn=x"),
            Err(DnErrorKind::IllegalInitialDigit { name: "1cn".into() })
        );
    }

    #[test]
    fn attribute_name_exceptions() {
        assert_eq!(rdns_lenient("c_n=x").unwrap()[0].attribute_name(0), "c_n");
        assert_eq!(rdns_lenient("1cn=x").unwrap()[0].attribute_name(0), "1cn");
        assert_eq!(
            rdns_lenient("_cn=x"), Err(DnErrorKind::IllegalInitialUnderscore)
        );
    }

    #[test]
    fn oid_names() {
        let rdns = rdns("2.5.4.3=John,OID.2.5.4.11=people").unwrap();
        assert_eq!(rdns[0].attribute_name(0), "2.5.4.3");
        assert_eq!(rdns[0].attribute_type(0).primary_name(), "cn");
        assert_eq!(rdns[1].attribute_name(0), "2.5.4.11");
        assert_eq!(rdns[1].attribute_type(0).primary_name(), "ou");
        assert_eq!(
            self::rdns("oid=x.y").unwrap()[0].attribute_value(0), "x.y"
        );

        for bad in ["2.5.=x", ".2.5=x", "2..5=x", "oid.=x", "o.5=x", "cn.x=y"] {
            assert!(
                matches!(self::rdns(bad), Err(DnErrorKind::IllegalPeriod { .. })),
                "{}", bad
            );
        }
    }

    #[test]
    fn binary_input() {
        let octets = ByteString::from_static(b"cn=caf\xc3\xa9,dc=\xff");
        let rdns = decode_rdns(
            octets.as_reader(), CoreSchema::global(), DecodeOptions::default()
        ).unwrap();
        assert_eq!(rdns[0].attribute_value(0), "café");
        assert_eq!(rdns[1].attribute_value(0), b"\xff");
    }

    #[test]
    fn single_rdn() {
        let rdn = decode_rdn(
            ByteSequenceReader::from_ref("uid=x + cn=y"),
            CoreSchema::global(), DecodeOptions::default()
        ).unwrap();
        assert_eq!(rdn.num_values(), 2);

        let err = decode_rdn(
            ByteSequenceReader::from_ref("uid=x,dc=com"),
            CoreSchema::global(), DecodeOptions::default()
        ).unwrap_err();
        assert_eq!(
            err.kind(), &DnErrorKind::IllegalCharacter { ch: b',', pos: 5 }
        );
        assert!(decode_rdn(
            ByteSequenceReader::from_ref(""),
            CoreSchema::global(), DecodeOptions::default()
        ).is_err());
    }

    #[test]
    fn error_reporting() {
        let err = decode_rdns(
            ByteSequenceReader::from_ref("cn=foo,"), CoreSchema::global(),
            DecodeOptions::default()
        ).unwrap_err();
        assert_eq!(err.dn(), "cn=foo,");
        assert_eq!(err.result_code(), 34);
        assert_eq!(
            err.to_string(),
            "the value \"cn=foo,\" is not a valid distinguished name: \
             it ends with a separator"
        );
    }

    #[test]
    fn escape_values() {
        assert_eq!(escaped(b"Jane, Doe"), "Jane\\, Doe");
        assert_eq!(escaped(b"a+b;c\\d\"e<f>"), "a\\+b\\;c\\\\d\\\"e\\<f\\>");
        assert_eq!(escaped(b"#1 # "), "\\#1 #\\ ");
        assert_eq!(escaped(b" "), "\\ ");
        assert_eq!(escaped(b"a\nb"), "a\\0ab");
        assert_eq!(escaped(b"caf\xc3\xa9"), "café");
        assert_eq!(escaped(b"\x04\xff"), "#04ff");
        assert_eq!(escaped(b""), "");
    }

    #[test]
    fn escaped_values_decode_again() {
        let values: &[&[u8]] = &[
            b"Jane, Doe", b" lead", b"trail ", b"#hash", b"a+b", b"q\"q",
            b"back\\slash", b"\x01ctl", b"\x04\xff", b"caf\xc3\xa9", b"  ",
        ];
        for &raw in values {
            let dn = format!("cn={}", escaped(raw));
            assert_eq!(value(&dn), raw, "{}", dn);
        }
    }
}
