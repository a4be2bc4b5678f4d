//! Token type definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Application claims carried by a token
pub type Claims = Map<String, Value>;

/// `typ` written by the generator
pub const TOKEN_TYPE: &str = "JWT";

/// Which compact serialization a token uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Signed token: header.payload.signature
    Jws,
    /// Encrypted token: header.encrypted_key.iv.ciphertext.tag
    Jwe,
}

/// JOSE header
///
/// Kept as the full JSON object so members the engine does not interpret
/// survive parsing untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    pub(crate) fn for_signature(alg: &str, kid: Option<&str>) -> Self {
        let mut header = Map::new();
        header.insert("alg".to_string(), Value::from(alg));
        header.insert("typ".to_string(), Value::from(TOKEN_TYPE));
        if let Some(kid) = kid {
            header.insert("kid".to_string(), Value::from(kid));
        }
        Self(header)
    }

    pub(crate) fn for_encryption(alg: &str, enc: &str, kid: Option<&str>) -> Self {
        let mut header = Self::for_signature(alg, kid);
        header.0.insert("enc".to_string(), Value::from(enc));
        header
    }

    /// `alg` member, if present and a string
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.string("alg")
    }

    /// `enc` member, if present and a string
    #[must_use]
    pub fn enc(&self) -> Option<&str> {
        self.string("enc")
    }

    /// `kid` member, if present and a string
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.string("kid")
    }

    /// `typ` member, if present and a string
    #[must_use]
    pub fn typ(&self) -> Option<&str> {
        self.string("typ")
    }

    /// Any header member by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether the header names a member, whatever its type
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The underlying JSON object
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn string(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Header {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
