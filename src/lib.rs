//! Byte strings and distinguished names for LDAP servers.
//!
//! This crate provides the low-level value types an LDAP server passes
//! around: immutable byte strings, a growable builder for producing them,
//! and a reader for consuming them again. On top of those, it implements
//! distinguished names as defined by RFC 4514, including parsing,
//! normalization, comparison, and the hierarchy relations needed to
//! evaluate search scopes.
//!
//! The byte-level types live in the [_octets_], [_types_], [_builder_],
//! and [_parse_] modules. The [`ByteSequence`] trait defined in
//! [_octets_] is the common read-only view shared by all of them.
//!
//! Distinguished names are provided by [`Dn`] in the [_dn_] module, built
//! from the [`Rdn`]s of the [_rdn_] module. Decoding needs to look up
//! attribute types which is done through the [`Schema`] trait of the
//! [_schema_] module. [`CoreSchema::global`] provides a schema with the
//! usual core attribute types and is used whenever no other schema is
//! given.
//!
//! # Feature flags
//!
//! * `serde`: enables serialization and deserialization of [`ByteString`]
//!   and [`Dn`] through the [serde](https://serde.rs/) crate.
//!
//! [_octets_]: crate::octets
//! [_types_]: crate::types
//! [_builder_]: crate::builder
//! [_parse_]: crate::parse
//! [_dn_]: crate::dn
//! [_rdn_]: crate::rdn
//! [_schema_]: crate::schema

#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use self::builder::{ByteStringBuilder, CapacityError, ValueOutOfRange};
pub use self::dn::{Dn, NamingContexts, SearchScope, UnknownScope};
pub use self::octets::ByteSequence;
pub use self::parse::{ByteSequenceReader, ParseError, ShortInput};
pub use self::rdn::{Ava, Rdn};
pub use self::schema::{AttributeType, CoreSchema, MatchingRule, Schema};
pub use self::syntax::{DecodeOptions, DnErrorKind, DnSyntaxError};
pub use self::types::ByteString;

pub mod builder;
pub mod dn;
pub mod octets;
pub mod parse;
pub mod rdn;
pub mod schema;
pub mod serde;
pub mod syntax;
pub mod types;

