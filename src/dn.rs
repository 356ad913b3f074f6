//! Distinguished names.
//!
//! A [`Dn`] names an entry in the directory tree. It is a sequence of
//! [`Rdn`]s starting with the RDN of the entry itself and ending with the
//! RDN closest to the root of the tree. The DN without any RDNs is the root
//! DN.
//!
//! DNs are immutable and cheap to clone. They can be decoded from their
//! string representation as described in RFC 4514 or from the same
//! representation given as raw octets.

use core::{cmp, fmt, hash};
use core::str::FromStr;
use std::collections::HashSet;
use std::string::String;
use std::sync::{Arc, OnceLock};
use std::vec::Vec;
use crate::parse::ByteSequenceReader;
use crate::rdn::Rdn;
use crate::schema::{CoreSchema, Schema};
use crate::syntax::{self, DecodeOptions, DnSyntaxError};


//------------ Dn ------------------------------------------------------------

/// A distinguished name.
///
/// Two DNs are equal if their normalized string representations are equal,
/// i.e., if they consist of equal RDNs. The original spelling of attribute
/// names and values is kept for display.
///
/// DNs are ordered hierarchically: the root DN comes first, an ancestor
/// comes before all of its descendants, and otherwise the RDNs are compared
/// starting from the one closest to the root.
#[derive(Clone)]
pub struct Dn(Arc<DnInner>);

struct DnInner {
    /// The RDNs, the RDN of the named entry first.
    rdns: Vec<Rdn>,

    /// The string representation using the original spelling.
    string: OnceLock<String>,

    /// The normalized string representation.
    normalized: OnceLock<String>,
}

/// # Creation
///
impl Dn {
    /// Returns the root DN.
    ///
    /// All root DNs share the same value.
    pub fn root() -> Self {
        static ROOT: OnceLock<Dn> = OnceLock::new();
        ROOT.get_or_init(|| Dn::from_vec(Vec::new())).clone()
    }

    /// Creates a DN from its RDNs, the RDN of the named entry first.
    pub fn new(rdns: Vec<Rdn>) -> Self {
        if rdns.is_empty() {
            Self::root()
        }
        else {
            Self::from_vec(rdns)
        }
    }

    fn from_vec(rdns: Vec<Rdn>) -> Self {
        Dn(Arc::new(DnInner {
            rdns,
            string: OnceLock::new(),
            normalized: OnceLock::new(),
        }))
    }

    /// Decodes a DN from its string representation.
    ///
    /// Attribute types are taken from [`CoreSchema::global`]. An empty
    /// string or one of only spaces is the root DN.
    pub fn decode(s: &str) -> Result<Self, DnSyntaxError> {
        Self::decode_with(s, CoreSchema::global(), DecodeOptions::default())
    }

    /// Decodes a DN using the given schema and options.
    pub fn decode_with(
        s: &str, schema: &dyn Schema, options: DecodeOptions
    ) -> Result<Self, DnSyntaxError> {
        Self::decode_bytes_with(s, schema, options)
    }

    /// Decodes a DN from its string representation given as octets.
    ///
    /// The octets are expected to be UTF-8. Any other bytes in attribute
    /// values are taken as they are.
    pub fn decode_bytes<S: AsRef<[u8]> + ?Sized>(
        octets: &S
    ) -> Result<Self, DnSyntaxError> {
        Self::decode_bytes_with(
            octets, CoreSchema::global(), DecodeOptions::default()
        )
    }

    /// Decodes a DN given as octets using the given schema and options.
    pub fn decode_bytes_with<S: AsRef<[u8]> + ?Sized>(
        octets: &S, schema: &dyn Schema, options: DecodeOptions
    ) -> Result<Self, DnSyntaxError> {
        syntax::decode_rdns(
            ByteSequenceReader::from_ref(octets), schema, options
        ).map(Self::new)
    }

    /// Returns the DN of a child entry with the given RDN.
    pub fn child(&self, rdn: Rdn) -> Self {
        let mut rdns = Vec::with_capacity(self.num_components() + 1);
        rdns.push(rdn);
        rdns.extend_from_slice(self.rdns());
        Self::from_vec(rdns)
    }

    /// Returns a descendant DN by putting `rdns` in front of this DN.
    pub fn concat_rdns(&self, rdns: &[Rdn]) -> Self {
        let mut res = Vec::with_capacity(self.num_components() + rdns.len());
        res.extend_from_slice(rdns);
        res.extend_from_slice(self.rdns());
        Self::new(res)
    }

    /// Returns a descendant DN using `relative` as a relative DN.
    pub fn concat(&self, relative: &Dn) -> Self {
        if relative.is_root() {
            self.clone()
        }
        else {
            self.concat_rdns(relative.rdns())
        }
    }
}

/// # Access to Components
///
impl Dn {
    /// Returns whether this is the root DN.
    pub fn is_root(&self) -> bool {
        self.0.rdns.is_empty()
    }

    pub fn num_components(&self) -> usize {
        self.0.rdns.len()
    }

    /// Returns all RDNs, the RDN of the named entry first.
    pub fn rdns(&self) -> &[Rdn] {
        &self.0.rdns
    }

    /// Returns the RDN of the named entry or `None` for the root DN.
    pub fn rdn(&self) -> Option<&Rdn> {
        self.0.rdns.first()
    }

    /// Returns the RDN at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than `self.num_components()`.
    pub fn rdn_at(&self, index: usize) -> &Rdn {
        &self.0.rdns[index]
    }

    /// Returns the string representation using normalized names and values.
    pub fn to_normalized_string(&self) -> &str {
        self.0.normalized.get_or_init(|| {
            let mut res = String::new();
            for (idx, rdn) in self.rdns().iter().enumerate() {
                if idx > 0 {
                    res.push(',');
                }
                rdn.write_normalized(&mut res);
            }
            res
        })
    }

    /// Returns the string representation using the original spelling.
    pub fn as_str(&self) -> &str {
        self.0.string.get_or_init(|| {
            let mut res = String::new();
            for (idx, rdn) in self.rdns().iter().enumerate() {
                if idx > 0 {
                    res.push(',');
                }
                rdn.write_original(&mut res);
            }
            res
        })
    }
}

/// # Hierarchy
///
impl Dn {
    /// Returns the DN of the parent entry.
    ///
    /// Returns `None` for the root DN and for DNs with a single RDN.
    pub fn parent(&self) -> Option<Dn> {
        if self.num_components() <= 1 {
            None
        }
        else {
            Some(Self::from_vec(self.rdns()[1..].to_vec()))
        }
    }

    /// Returns the DN of the parent entry within its naming context.
    ///
    /// Like [`parent`](Self::parent) but also returns `None` if this DN is
    /// itself one of the given naming contexts.
    pub fn parent_in_suffix<C: NamingContexts + ?Sized>(
        &self, contexts: &C
    ) -> Option<Dn> {
        if contexts.is_naming_context(self) {
            None
        }
        else {
            self.parent()
        }
    }

    /// Returns whether this DN is equal to or below `other`.
    pub fn is_descendant_of(&self, other: &Dn) -> bool {
        let len = other.num_components();
        let own = self.num_components();
        own >= len && self.rdns()[own - len..] == *other.rdns()
    }

    /// Returns whether this DN is equal to or above `other`.
    pub fn is_ancestor_of(&self, other: &Dn) -> bool {
        other.is_descendant_of(self)
    }

    /// Returns whether this DN is within the scope of a search.
    ///
    /// For [`SearchScope::SingleLevel`], this is true if the parent of this
    /// DN as returned by [`parent`](Self::parent) is `base`.
    pub fn matches_base_and_scope(
        &self, base: &Dn, scope: SearchScope
    ) -> bool {
        match scope {
            SearchScope::BaseObject => self == base,
            SearchScope::SingleLevel => {
                self.num_components() > 1
                    && self.num_components() == base.num_components() + 1
                    && self.is_descendant_of(base)
            }
            SearchScope::WholeSubtree => self.is_descendant_of(base),
            SearchScope::SubordinateSubtree => {
                self.num_components() > base.num_components()
                    && self.is_descendant_of(base)
            }
        }
    }
}


//--- Default

impl Default for Dn {
    fn default() -> Self {
        Self::root()
    }
}


//--- FromStr

impl FromStr for Dn {
    type Err = DnSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}


//--- PartialEq and Eq

impl PartialEq for Dn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || self.to_normalized_string() == other.to_normalized_string()
    }
}

impl Eq for Dn { }


//--- PartialOrd and Ord

impl PartialOrd for Dn {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dn {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        if self == other {
            return cmp::Ordering::Equal
        }
        self.rdns().iter().rev().cmp(other.rdns().iter().rev())
    }
}


//--- Hash

impl hash::Hash for Dn {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        hash::Hash::hash(&self.to_normalized_string(), state)
    }
}


//--- Display and Debug

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Dn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Dn").field(&self.as_str()).finish()
    }
}


//------------ SearchScope ---------------------------------------------------

/// The scope of an LDAP search.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SearchScope {
    /// Only the base entry itself.
    BaseObject,

    /// Only the immediate children of the base entry.
    SingleLevel,

    /// The base entry and all entries below it.
    WholeSubtree,

    /// All entries below the base entry but not the base entry itself.
    SubordinateSubtree,
}

impl SearchScope {
    /// Returns the value used for the scope in LDAP messages.
    pub fn to_u8(self) -> u8 {
        match self {
            SearchScope::BaseObject => 0,
            SearchScope::SingleLevel => 1,
            SearchScope::WholeSubtree => 2,
            SearchScope::SubordinateSubtree => 3,
        }
    }
}

impl TryFrom<u8> for SearchScope {
    type Error = UnknownScope;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SearchScope::BaseObject),
            1 => Ok(SearchScope::SingleLevel),
            2 => Ok(SearchScope::WholeSubtree),
            3 => Ok(SearchScope::SubordinateSubtree),
            _ => Err(UnknownScope(value)),
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            SearchScope::BaseObject => "baseObject",
            SearchScope::SingleLevel => "singleLevel",
            SearchScope::WholeSubtree => "wholeSubtree",
            SearchScope::SubordinateSubtree => "subordinateSubtree",
        })
    }
}


//------------ UnknownScope --------------------------------------------------

/// A search scope value was not one of the known scopes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownScope(pub u8);

impl fmt::Display for UnknownScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown search scope {}", self.0)
    }
}

impl std::error::Error for UnknownScope {}


//------------ NamingContexts ------------------------------------------------

/// The set of DNs at which the naming contexts of a server start.
pub trait NamingContexts {
    /// Returns whether `dn` is the base DN of a naming context.
    fn is_naming_context(&self, dn: &Dn) -> bool;
}

impl NamingContexts for [Dn] {
    fn is_naming_context(&self, dn: &Dn) -> bool {
        self.contains(dn)
    }
}

impl NamingContexts for Vec<Dn> {
    fn is_naming_context(&self, dn: &Dn) -> bool {
        self.as_slice().is_naming_context(dn)
    }
}

impl<S: hash::BuildHasher> NamingContexts for HashSet<Dn, S> {
    fn is_naming_context(&self, dn: &Dn) -> bool {
        self.contains(dn)
    }
}


//============ Testing =======================================================
