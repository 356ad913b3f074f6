//! Relative distinguished names.

use core::{cmp, fmt, hash};
use core::str::FromStr;
use std::string::String;
use std::sync::Arc;
use smallvec::SmallVec;
use crate::parse::ByteSequenceReader;
use crate::schema::{AttributeType, CoreSchema, Schema};
use crate::syntax::{self, DecodeOptions, DnSyntaxError};
use crate::types::ByteString;


//------------ Ava -----------------------------------------------------------

/// An attribute value assertion: one `name=value` pair of an RDN.
///
/// Besides the attribute type, the assertion keeps the attribute name as it
/// was given and the value as well as its normalized form.
#[derive(Clone, Debug)]
pub struct Ava {
    attr_type: Arc<AttributeType>,
    name: String,
    value: ByteString,

    /// The lowercase primary name of the attribute type.
    norm_name: String,

    /// The value normalized per the type’s equality rule.
    norm_value: ByteString,
}

impl Ava {
    /// Creates a new assertion.
    pub fn new(
        attr_type: Arc<AttributeType>,
        name: impl Into<String>,
        value: impl Into<ByteString>,
    ) -> Self {
        let value = value.into();
        Ava {
            norm_name: attr_type.normalized_name(),
            norm_value: attr_type.normalize_value(value.as_slice()),
            attr_type,
            name: name.into(),
            value,
        }
    }

    pub fn attribute_type(&self) -> &Arc<AttributeType> {
        &self.attr_type
    }

    /// Returns the attribute name as it was given.
    pub fn attribute_name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ByteString {
        &self.value
    }

    pub fn normalized_value(&self) -> &ByteString {
        &self.norm_value
    }

    /// Returns the key used to compare assertions.
    fn key(&self) -> (&str, &[u8]) {
        (&self.norm_name, self.norm_value.as_slice())
    }

    fn write_original(&self, target: &mut String) {
        target.push_str(&self.name);
        target.push('=');
        syntax::escape_value(self.value.as_slice(), target);
    }

    fn write_normalized(&self, target: &mut String) {
        target.push_str(&self.norm_name);
        target.push('=');
        syntax::escape_value(self.norm_value.as_slice(), target);
    }
}


//------------ Rdn -----------------------------------------------------------

/// A relative distinguished name.
///
/// An RDN consists of one or more attribute value assertions, each for a
/// different attribute type. RDNs with more than one are called
/// multi-valued.
///
/// The order of the assertions is kept for display. It is not significant
/// for comparison, though: two RDNs are equal if they contain the same
/// set of normalized types and values. RDNs are ordered by comparing their
/// assertions sorted by lowercase attribute type name and then normalized
/// value.
#[derive(Clone)]
pub struct Rdn {
    avas: SmallVec<[Ava; 1]>,
}

impl Rdn {
    /// Creates a single-valued RDN.
    pub fn new(
        attr_type: Arc<AttributeType>,
        name: impl Into<String>,
        value: impl Into<ByteString>,
    ) -> Self {
        Self::from_ava(Ava::new(attr_type, name, value))
    }

    /// Creates a single-valued RDN from an assertion.
    pub fn from_ava(ava: Ava) -> Self {
        let mut avas = SmallVec::new();
        avas.push(ava);
        Rdn { avas }
    }

    /// Decodes an RDN from its string representation.
    ///
    /// Attribute types are taken from [`CoreSchema::global`].
    pub fn decode(s: &str) -> Result<Self, DnSyntaxError> {
        Self::decode_with(s, CoreSchema::global(), DecodeOptions::default())
    }

    /// Decodes an RDN using the given schema and options.
    pub fn decode_with(
        s: &str, schema: &dyn Schema, options: DecodeOptions
    ) -> Result<Self, DnSyntaxError> {
        syntax::decode_rdn(ByteSequenceReader::from_ref(s), schema, options)
    }

    /// Adds another assertion to the RDN.
    ///
    /// Returns `false` and leaves the RDN unchanged if it already has a
    /// value for the attribute type.
    pub fn add_value(
        &mut self,
        attr_type: Arc<AttributeType>,
        name: impl Into<String>,
        value: impl Into<ByteString>,
    ) -> bool {
        if self.has_attribute_type(&attr_type) {
            return false
        }
        self.avas.push(Ava::new(attr_type, name, value));
        true
    }

    /// Returns the number of assertions.
    pub fn num_values(&self) -> usize {
        self.avas.len()
    }

    pub fn is_multi_valued(&self) -> bool {
        self.avas.len() > 1
    }

    /// Returns the assertions in their original order.
    pub fn avas(&self) -> &[Ava] {
        &self.avas
    }

    /// Returns the attribute type of the assertion at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than `self.num_values()`. The same
    /// holds for the other accessors by index.
    pub fn attribute_type(&self, index: usize) -> &Arc<AttributeType> {
        self.avas[index].attribute_type()
    }

    pub fn attribute_name(&self, index: usize) -> &str {
        self.avas[index].attribute_name()
    }

    pub fn attribute_value(&self, index: usize) -> &ByteString {
        self.avas[index].value()
    }

    /// Returns whether the RDN has a value for the attribute type.
    pub fn has_attribute_type(&self, attr_type: &AttributeType) -> bool {
        self.value_for(attr_type).is_some()
    }

    /// Returns the value for an attribute type if there is one.
    pub fn value_for(&self, attr_type: &AttributeType) -> Option<&ByteString> {
        self.avas.iter().find(|ava| {
            ava.attr_type.as_ref() == attr_type
        }).map(Ava::value)
    }

    /// Returns the string representation using normalized names and values.
    pub fn to_normalized_string(&self) -> String {
        let mut res = String::new();
        self.write_normalized(&mut res);
        res
    }

    pub(crate) fn write_original(&self, target: &mut String) {
        for (idx, ava) in self.avas.iter().enumerate() {
            if idx > 0 {
                target.push('+');
            }
            ava.write_original(target);
        }
    }

    pub(crate) fn write_normalized(&self, target: &mut String) {
        for (idx, ava) in self.sorted().iter().enumerate() {
            if idx > 0 {
                target.push('+');
            }
            ava.write_normalized(target);
        }
    }

    /// Returns the assertions in canonical order.
    fn sorted(&self) -> SmallVec<[&Ava; 1]> {
        let mut res: SmallVec<[&Ava; 1]> = self.avas.iter().collect();
        if res.len() > 1 {
            res.sort_by(|left, right| left.key().cmp(&right.key()));
        }
        res
    }
}


//--- FromStr

impl FromStr for Rdn {
    type Err = DnSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}


//--- PartialEq and Eq

impl PartialEq for Rdn {
    fn eq(&self, other: &Self) -> bool {
        self.avas.len() == other.avas.len()
            && self.sorted().iter().zip(other.sorted().iter()).all(
                |(left, right)| left.key() == right.key()
            )
    }
}

impl Eq for Rdn { }


//--- PartialOrd and Ord

impl PartialOrd for Rdn {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rdn {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.sorted().iter().map(|ava| ava.key()).cmp(
            other.sorted().iter().map(|ava| ava.key())
        )
    }
}


//--- Hash

impl hash::Hash for Rdn {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for ava in self.sorted() {
            hash::Hash::hash(&ava.key(), state)
        }
    }
}


//--- Display and Debug

impl fmt::Display for Rdn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut res = String::new();
        self.write_original(&mut res);
        f.write_str(&res)
    }
}

impl fmt::Debug for Rdn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Rdn").field(&format_args!("{}", self)).finish()
    }
}


//============ Testing =======================================================
