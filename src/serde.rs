//! Serde support.
//!
//! [Serde](https://serde.rs/) support is available if the crate is built
//! with the `serde` feature enabled.
//!
//! A [`ByteString`] serializes as a byte sequence and deserializes from
//! either bytes or a sequence of `u8`s, so it works with binary as well as
//! self-describing formats. A [`Dn`] serializes as its string
//! representation using the original spelling and is decoded again
//! with the global schema when deserialized.
#![cfg(feature = "serde")]

use core::fmt;
use std::vec::Vec;
use serde::de::{SeqAccess, Visitor};
use crate::dn::Dn;
use crate::types::ByteString;


//------------ ByteString ----------------------------------------------------

impl serde::Serialize for ByteString {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_slice())
    }
}

impl<'de> serde::Deserialize<'de> for ByteString {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        deserializer.deserialize_byte_buf(ByteStringVisitor)
    }
}

struct ByteStringVisitor;

impl<'de> Visitor<'de> for ByteStringVisitor {
    type Value = ByteString;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a byte string")
    }

    fn visit_bytes<E: serde::de::Error>(
        self,
        value: &[u8],
    ) -> Result<Self::Value, E> {
        Ok(ByteString::copy_from_slice(value))
    }

    fn visit_byte_buf<E: serde::de::Error>(
        self,
        value: Vec<u8>,
    ) -> Result<Self::Value, E> {
        Ok(value.into())
    }

    fn visit_seq<A: SeqAccess<'de>>(
        self,
        mut seq: A,
    ) -> Result<Self::Value, A::Error> {
        let mut res = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(b) = seq.next_element::<u8>()? {
            res.push(b);
        }
        Ok(res.into())
    }
}


//------------ Dn ------------------------------------------------------------

impl serde::Serialize for Dn {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Dn {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        deserializer.deserialize_str(DnVisitor)
    }
}

struct DnVisitor;

impl<'de> Visitor<'de> for DnVisitor {
    type Value = Dn;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a distinguished name")
    }

    fn visit_str<E: serde::de::Error>(
        self,
        value: &str,
    ) -> Result<Self::Value, E> {
        Dn::decode(value).map_err(E::custom)
    }

    fn visit_bytes<E: serde::de::Error>(
        self,
        value: &[u8],
    ) -> Result<Self::Value, E> {
        Dn::decode_bytes(value).map_err(E::custom)
    }
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use serde::de::value::{
        BytesDeserializer, Error as ValueError, SeqDeserializer,
        StrDeserializer,
    };
    use serde::Deserialize;

    #[test]
    fn byte_string_from_bytes_and_seq() {
        let bytes = BytesDeserializer::<ValueError>::new(b"\x00\xff");
        assert_eq!(ByteString::deserialize(bytes).unwrap(), b"\x00\xff");

        let seq = SeqDeserializer::<_, ValueError>::new(
            [1u8, 2, 3].into_iter()
        );
        assert_eq!(ByteString::deserialize(seq).unwrap(), b"\x01\x02\x03");
    }

    #[test]
    fn dn_from_str() {
        let de = StrDeserializer::<ValueError>::new("UID=x,dc=com");
        let dn = Dn::deserialize(de).unwrap();
        assert_eq!(dn, Dn::decode("uid=X,DC=com").unwrap());
        assert_eq!(dn.to_string(), "UID=x,dc=com");

        let de = StrDeserializer::<ValueError>::new("cn=foo,");
        let err = Dn::deserialize(de).unwrap_err();
        assert!(err.to_string().contains("cn=foo,"));
    }
}
