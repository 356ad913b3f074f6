//! Attribute types and the schema lookup used while decoding DNs.
//!
//! Decoding a DN needs to know a little about the attribute types named in
//! it: mostly how values of the type are compared. The [`Schema`] trait
//! provides this lookup. [`CoreSchema`] is a ready-made implementation
//! that knows the naming attributes of RFC 4519 and can be extended with
//! further types.
//!
//! Names that a schema doesn’t know are never an error. Instead, a
//! placeholder type is made up for them via
//! [`Schema::default_attribute_type`].

use core::{fmt, hash};
use std::collections::HashMap;
use std::string::String;
use std::sync::{Arc, OnceLock};
use std::vec::Vec;
use crate::types::ByteString;


//------------ MatchingRule --------------------------------------------------

/// The equality matching rule of an attribute type.
///
/// The rule determines the normalized form of a value. Two values are
/// considered equal if their normalized forms are identical.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchingRule {
    /// Case-insensitive comparison with insignificant spaces removed.
    CaseIgnore,

    /// Case-sensitive comparison with insignificant spaces removed.
    CaseExact,

    /// Byte-wise comparison.
    OctetString,

    /// Comparison of digits with all spaces removed.
    NumericString,
}

impl MatchingRule {
    /// Returns the normalized form of a value.
    ///
    /// Values that aren’t valid UTF-8 are left as they are by the string
    /// rules.
    pub fn normalize(self, value: &[u8]) -> ByteString {
        let text = match core::str::from_utf8(value) {
            Ok(text) if self != MatchingRule::OctetString => text,
            _ => return ByteString::copy_from_slice(value),
        };
        ByteString::from(match self {
            MatchingRule::CaseExact => collapse_spaces(text),
            MatchingRule::NumericString => {
                text.chars().filter(|ch| *ch != ' ').collect()
            }
            _ => collapse_spaces(text).to_lowercase(),
        })
    }
}

/// Trims leading and trailing spaces and collapses inner runs of spaces.
fn collapse_spaces(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    for word in text.split(' ').filter(|word| !word.is_empty()) {
        if !res.is_empty() {
            res.push(' ');
        }
        res.push_str(word);
    }
    res
}


//------------ AttributeType -------------------------------------------------

/// The definition of an attribute type as far as DNs are concerned.
///
/// Attribute types are identified by their OID. Two attribute types are
/// equal if their OIDs are equal.
#[derive(Clone)]
pub struct AttributeType {
    /// The numeric OID.
    oid: String,

    /// The names of the type, primary name first.
    names: Vec<String>,

    /// The equality matching rule.
    equality: MatchingRule,

    /// Whether the type was made up for a name the schema didn’t know.
    placeholder: bool,
}

impl AttributeType {
    /// Creates a new attribute type.
    pub fn new(
        oid: impl Into<String>,
        names: &[&str],
        equality: MatchingRule,
    ) -> Self {
        AttributeType {
            oid: oid.into(),
            names: names.iter().map(|name| String::from(*name)).collect(),
            equality,
            placeholder: false,
        }
    }

    /// Creates a placeholder type for an unknown attribute name.
    ///
    /// The OID of the placeholder is the lowercase name followed by `-oid`.
    /// Values are compared ignoring case.
    pub fn placeholder(name: &str) -> Self {
        AttributeType {
            oid: format!("{}-oid", name.to_ascii_lowercase()),
            names: vec![String::from(name)],
            equality: MatchingRule::CaseIgnore,
            placeholder: true,
        }
    }

    /// Returns the OID of the type.
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Returns all names of the type.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the primary name of the type or its OID if it has no name.
    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.oid)
    }

    /// Returns the name used in normalized DN strings.
    pub fn normalized_name(&self) -> String {
        self.primary_name().to_ascii_lowercase()
    }

    /// Returns whether `name` is one of the names of the type.
    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|item| item.eq_ignore_ascii_case(name))
    }

    /// Returns the equality matching rule of the type.
    pub fn equality(&self) -> MatchingRule {
        self.equality
    }

    /// Returns whether the type is a placeholder for an unknown name.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Returns the normalized form of a value of this type.
    pub fn normalize_value(&self, value: &[u8]) -> ByteString {
        self.equality.normalize(value)
    }
}

//--- PartialEq, Eq, and Hash

impl PartialEq for AttributeType {
    fn eq(&self, other: &Self) -> bool {
        self.oid.eq_ignore_ascii_case(&other.oid)
    }
}

impl Eq for AttributeType { }

impl hash::Hash for AttributeType {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        hash::Hash::hash(&self.oid.to_ascii_lowercase(), state)
    }
}

//--- Display and Debug

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.primary_name())
    }
}

impl fmt::Debug for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AttributeType")
            .field("oid", &self.oid)
            .field("names", &self.names)
            .field("equality", &self.equality)
            .field("placeholder", &self.placeholder)
            .finish()
    }
}


//------------ Schema --------------------------------------------------------

/// Looking up attribute types by name.
///
/// Lookups must not have side effects. They can happen concurrently from
/// many threads decoding DNs.
pub trait Schema {
    /// Returns the attribute type for a lowercase name or OID.
    fn attribute_type(&self, lower_name: &str) -> Option<Arc<AttributeType>>;

    /// Returns a placeholder type for a name the schema doesn’t know.
    fn default_attribute_type(&self, name: &str) -> Arc<AttributeType> {
        tracing::trace!(name, "using default attribute type");
        Arc::new(AttributeType::placeholder(name))
    }

    /// Returns the attribute type for a name in any case.
    ///
    /// Falls back to the default type if the name is unknown.
    fn resolve(&self, name: &str) -> Arc<AttributeType> {
        match self.attribute_type(&name.to_ascii_lowercase()) {
            Some(attr_type) => attr_type,
            None => self.default_attribute_type(name),
        }
    }
}

impl<S: Schema + ?Sized> Schema for &S {
    fn attribute_type(&self, lower_name: &str) -> Option<Arc<AttributeType>> {
        (**self).attribute_type(lower_name)
    }

    fn default_attribute_type(&self, name: &str) -> Arc<AttributeType> {
        (**self).default_attribute_type(name)
    }
}


//------------ CoreSchema ----------------------------------------------------

/// A schema holding a fixed set of attribute types.
///
/// Types are found by each of their names in lowercase and by their OID.
#[derive(Clone, Debug, Default)]
pub struct CoreSchema {
    types: HashMap<String, Arc<AttributeType>>,
}

/// The naming attributes of RFC 4519 and a few common friends.
const CORE_TYPES: &[(&str, &[&str], MatchingRule)] = &[
    ("2.5.4.0", &["objectClass"], MatchingRule::CaseIgnore),
    ("2.5.4.3", &["cn", "commonName"], MatchingRule::CaseIgnore),
    ("2.5.4.4", &["sn", "surname"], MatchingRule::CaseIgnore),
    ("2.5.4.5", &["serialNumber"], MatchingRule::CaseIgnore),
    ("2.5.4.6", &["c", "countryName"], MatchingRule::CaseIgnore),
    ("2.5.4.7", &["l", "localityName"], MatchingRule::CaseIgnore),
    ("2.5.4.8", &["st", "stateOrProvinceName"], MatchingRule::CaseIgnore),
    ("2.5.4.9", &["street", "streetAddress"], MatchingRule::CaseIgnore),
    ("2.5.4.10", &["o", "organizationName"], MatchingRule::CaseIgnore),
    ("2.5.4.11", &["ou", "organizationalUnitName"], MatchingRule::CaseIgnore),
    ("2.5.4.12", &["title"], MatchingRule::CaseIgnore),
    ("2.5.4.13", &["description"], MatchingRule::CaseIgnore),
    ("2.5.4.20", &["telephoneNumber"], MatchingRule::CaseIgnore),
    ("2.5.4.31", &["member"], MatchingRule::CaseIgnore),
    ("2.5.4.35", &["userPassword"], MatchingRule::OctetString),
    ("2.5.4.42", &["givenName", "gn"], MatchingRule::CaseIgnore),
    ("0.9.2342.19200300.100.1.1", &["uid", "userid"], MatchingRule::CaseIgnore),
    ("0.9.2342.19200300.100.1.3", &["mail", "rfc822Mailbox"], MatchingRule::CaseIgnore),
    ("0.9.2342.19200300.100.1.25", &["dc", "domainComponent"], MatchingRule::CaseIgnore),
];

impl CoreSchema {
    /// Creates an empty schema.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a schema with the core attribute types.
    pub fn new() -> Self {
        let mut res = Self::empty();
        for &(oid, names, equality) in CORE_TYPES {
            res.insert(AttributeType::new(oid, names, equality));
        }
        res
    }

    /// Returns a shared schema with the core attribute types.
    pub fn global() -> &'static CoreSchema {
        static GLOBAL: OnceLock<CoreSchema> = OnceLock::new();
        GLOBAL.get_or_init(CoreSchema::new)
    }

    /// Adds an attribute type to the schema.
    ///
    /// Existing entries with the same names or OID are replaced.
    pub fn insert(&mut self, attr_type: AttributeType) -> Arc<AttributeType> {
        let attr_type = Arc::new(attr_type);
        self.types.insert(
            attr_type.oid().to_ascii_lowercase(), attr_type.clone()
        );
        for name in attr_type.names() {
            self.types.insert(name.to_ascii_lowercase(), attr_type.clone());
        }
        attr_type
    }
}

impl Schema for CoreSchema {
    fn attribute_type(&self, lower_name: &str) -> Option<Arc<AttributeType>> {
        self.types.get(lower_name).cloned()
    }
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn core_lookup() {
        let schema = CoreSchema::new();
        let cn = schema.attribute_type("cn").unwrap();
        assert_eq!(cn.oid(), "2.5.4.3");
        assert_eq!(schema.attribute_type("commonname").unwrap(), cn);
        assert_eq!(schema.attribute_type("2.5.4.3").unwrap(), cn);
        assert!(schema.attribute_type("CN").is_none());
        assert_eq!(schema.resolve("CN"), cn);
        assert!(cn.has_name("COMMONNAME"));
        assert_eq!(cn.normalized_name(), "cn");
        assert_eq!(
            schema.resolve("givenName").normalized_name(), "givenname"
        );
    }

    #[test]
    fn unknown_names_get_placeholders() {
        let schema = CoreSchema::global();
        let unknown = schema.resolve("myAttr");
        assert!(unknown.is_placeholder());
        assert_eq!(unknown.oid(), "myattr-oid");
        assert_eq!(unknown.primary_name(), "myAttr");
        assert_eq!(unknown, schema.resolve("MYATTR"));
        assert!(!schema.resolve("uid").is_placeholder());
    }

    #[test]
    fn insert() {
        let mut schema = CoreSchema::empty();
        assert!(schema.resolve("employeeNumber").is_placeholder());
        schema.insert(AttributeType::new(
            "2.16.840.1.113730.3.1.3", &["employeeNumber"],
            MatchingRule::NumericString
        ));
        let attr = schema.resolve("EmployeeNumber");
        assert!(!attr.is_placeholder());
        assert_eq!(attr.normalize_value(b" 12 34 "), "1234");
    }

    #[test]
    fn normalize() {
        assert_eq!(
            MatchingRule::CaseIgnore.normalize(b"  John   SMITH "),
            "john smith"
        );
        assert_eq!(
            MatchingRule::CaseExact.normalize(b"  John   SMITH "),
            "John SMITH"
        );
        assert_eq!(MatchingRule::OctetString.normalize(b" A "), " A ");
        assert_eq!(MatchingRule::NumericString.normalize(b"1 2 3"), "123");
        assert_eq!(MatchingRule::CaseIgnore.normalize(b"\xffA"), b"\xffA");
        assert_eq!(MatchingRule::CaseIgnore.normalize(b"   "), "");
    }
}
