//! Key resolution
//!
//! A caller hands the engine either the key itself or a [`Keystore`] plus a key
//! identifier. Keystore lookups never fall back to an arbitrary entry.

use crate::algorithms::{AlgorithmDescriptor, KeyKind};
use crate::codec;
use crate::error::{JoseError, JoseResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use zeroize::Zeroizing;

/// Mapping from key identifier to key material
///
/// Symmetric entries are base64 (standard alphabet) encoded raw bytes;
/// asymmetric entries are PEM text. Deserializes from a flat JSON object.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keystore {
    entries: HashMap<String, String>,
}

impl Keystore {
    /// Create an empty keystore
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, returning the previous material
    pub fn insert(
        &mut self,
        kid: impl Into<String>,
        material: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(kid.into(), material.into())
    }

    /// Remove an entry
    pub fn remove(&mut self, kid: &str) -> Option<String> {
        self.entries.remove(kid)
    }

    /// Material stored under `kid`
    #[must_use]
    pub fn get(&self, kid: &str) -> Option<&str> {
        self.entries.get(kid).map(String::as_str)
    }

    /// Whether `kid` has an entry
    #[must_use]
    pub fn contains(&self, kid: &str) -> bool {
        self.entries.contains_key(kid)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the keystore has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key identifiers in arbitrary order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl fmt::Debug for Keystore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Keystore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Keystore {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Where key material comes from for one generate or verify call
#[derive(Clone, Copy)]
pub enum KeySource<'a> {
    /// The key itself: raw bytes for symmetric algorithms, PEM or DER otherwise
    Key(&'a [u8]),
    /// A keystore searched by the header `kid`
    Keystore(&'a Keystore),
}

impl fmt::Debug for KeySource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Key(key) => write!(f, "Key({} bytes)", key.len()),
            KeySource::Keystore(store) => f.debug_tuple("Keystore").field(store).finish(),
        }
    }
}

impl<'a> From<&'a [u8]> for KeySource<'a> {
    fn from(key: &'a [u8]) -> Self {
        KeySource::Key(key)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for KeySource<'a> {
    fn from(key: &'a [u8; N]) -> Self {
        KeySource::Key(key.as_slice())
    }
}

impl<'a> From<&'a Vec<u8>> for KeySource<'a> {
    fn from(key: &'a Vec<u8>) -> Self {
        KeySource::Key(key.as_slice())
    }
}

impl<'a> From<&'a str> for KeySource<'a> {
    fn from(pem: &'a str) -> Self {
        KeySource::Key(pem.as_bytes())
    }
}

impl<'a> From<&'a String> for KeySource<'a> {
    fn from(pem: &'a String) -> Self {
        KeySource::Key(pem.as_bytes())
    }
}

impl<'a> From<&'a Keystore> for KeySource<'a> {
    fn from(store: &'a Keystore) -> Self {
        KeySource::Keystore(store)
    }
}

/// Resolve the concrete key for `descriptor`
///
/// A single key is used as given and `kid` is ignored. With a keystore, a
/// missing `kid` or a missing entry is `KeyNotFound`.
pub(crate) fn resolve_key(
    descriptor: &AlgorithmDescriptor,
    kid: Option<&str>,
    source: KeySource<'_>,
) -> JoseResult<Zeroizing<Vec<u8>>> {
    match source {
        KeySource::Key(key) => Ok(Zeroizing::new(key.to_vec())),
        KeySource::Keystore(store) => {
            let kid = kid.ok_or_else(|| {
                JoseError::key_not_found("a keystore was supplied but the token names no kid")
            })?;
            let material = store
                .get(kid)
                .ok_or_else(|| JoseError::key_not_found(format!("no entry for kid {kid:?}")))?;

            match descriptor.key_kind {
                KeyKind::Symmetric => codec::decode_standard(material)
                    .map(Zeroizing::new)
                    .map_err(|_| {
                        JoseError::invalid_key(format!("keystore entry {kid:?} is not base64"))
                    }),
                KeyKind::Asymmetric => Ok(Zeroizing::new(material.as_bytes().to_vec())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::resolve;
    use crate::error::ErrorKind;

    fn keystore() -> Keystore {
        Keystore::from([
            (
                "e5739df2261c8a0ed41715e7f62cc295",
                "SATKcp7AMnCg0YdEBPIcgknBplYttePtQoRddpJjyVak9F5vEp/7pL0Q1236MkVQd7nIXGoaPt4w1dlrpEmY4A==",
            ),
            (
                "f0fd89c4abe83811ee9afa92d0d687f7",
                "6Bzisgmhj9LGJDNjx/WBNRUsnZA8pXRpVxB7Pf8ar29XI158V4+t1GEqkCl5MYZhcOMTi5fa3yYr0Vcya6vUkA==",
            ),
        ])
    }

    #[test]
    fn single_key_is_used_directly() {
        let hs = resolve("HS256").unwrap();
        let key = resolve_key(hs, Some("ignored"), KeySource::from(&[1u8; 32])).unwrap();
        assert_eq!(key.as_slice(), &[1u8; 32]);
    }

    #[test]
    fn keystore_symmetric_entries_are_base64_decoded() {
        let store = keystore();
        let hs = resolve("HS512").unwrap();
        let key =
            resolve_key(hs, Some("f0fd89c4abe83811ee9afa92d0d687f7"), (&store).into()).unwrap();
        assert_eq!(key.len(), 64);
        assert_eq!(key[0], 0xe8);
    }

    #[test]
    fn keystore_miss_is_key_not_found() {
        let store = keystore();
        let hs = resolve("HS512").unwrap();
        let err = resolve_key(hs, Some("unknown"), (&store).into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    }

    #[test]
    fn keystore_without_kid_never_guesses() {
        let store: Keystore = [("only", "AAAA")].into();
        let hs = resolve("HS256").unwrap();
        let err = resolve_key(hs, None, (&store).into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    }

    #[test]
    fn asymmetric_entries_are_passed_through() {
        let store: Keystore = [("rsa", "-----BEGIN PUBLIC KEY-----")].into();
        let rs = resolve("RS256").unwrap();
        let key = resolve_key(rs, Some("rsa"), (&store).into()).unwrap();
        assert_eq!(key.as_slice(), b"-----BEGIN PUBLIC KEY-----");
    }

    #[test]
    fn keystore_deserializes_from_json_and_redacts_debug() {
        let store: Keystore = serde_json::from_str(r#"{"k1":"c2VjcmV0"}"#).unwrap();
        assert_eq!(store.get("k1"), Some("c2VjcmV0"));
        assert!(!format!("{store:?}").contains("c2VjcmV0"));
    }
}
