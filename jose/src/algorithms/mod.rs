//! Algorithm registry
//!
//! Each supported algorithm is one static [`AlgorithmDescriptor`] holding its
//! family, key constraints and the function pointers that implement it. The
//! generator and verifier dispatch through descriptors only, so adding an
//! algorithm means adding a descriptor to one of the family modules and listing
//! it in the table below.
//!
//! Verification-side functions never report *why* a check failed: they return
//! `false` or `None`, and the verifier turns that into a single
//! `IntegrityCheckFailed`.

mod aes_gcm;
mod aes_kw;
mod ecdsa;
mod hmac;
mod rsa;

use crate::error::{JoseError, JoseResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use zeroize::Zeroizing;

/// Authentication tag length of every registered content cipher
pub(crate) const TAG_LEN: usize = 16;

/// Cryptographic family of an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// HMAC with SHA-2
    Hmac,
    /// RSASSA-PKCS1-v1_5 with SHA-2
    RsaPkcs1,
    /// RSASSA-PSS with SHA-2 and MGF1
    RsaPss,
    /// ECDSA over the NIST curves
    Ecdsa,
    /// RFC 3394 AES key wrap
    AesKeyWrap,
    /// AES-GCM content encryption
    AesGcm,
}

/// Kind of key material an algorithm consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Shared secret bytes, used for both directions
    Symmetric,
    /// PEM or DER key pair: private to sign, public to verify
    Asymmetric,
}

/// Key-length constraint of an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyLength {
    /// At least this many bytes
    AtLeast(usize),
    /// Exactly this many bytes
    Exactly(usize),
    /// RSA modulus of at least this many bits
    ModulusBits(usize),
    /// Fixed by the named curve
    Curve,
}

impl KeyLength {
    /// Whether a symmetric key of `len` bytes satisfies the constraint
    ///
    /// Asymmetric constraints are checked when the key is decoded.
    #[must_use]
    pub const fn accepts(self, len: usize) -> bool {
        match self {
            KeyLength::AtLeast(min) => len >= min,
            KeyLength::Exactly(exact) => len == exact,
            KeyLength::ModulusBits(_) | KeyLength::Curve => true,
        }
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyLength::AtLeast(min) => write!(f, "at least {min} bytes"),
            KeyLength::Exactly(exact) => write!(f, "exactly {exact} bytes"),
            KeyLength::ModulusBits(bits) => write!(f, "an RSA modulus of at least {bits} bits"),
            KeyLength::Curve => f.write_str("a key on the algorithm's curve"),
        }
    }
}

pub(crate) type SignFn = fn(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>>;
pub(crate) type VerifyFn = fn(key: &[u8], message: &[u8], signature: &[u8]) -> bool;
pub(crate) type WrapFn = fn(kek: &[u8], cek: &[u8]) -> JoseResult<Vec<u8>>;
pub(crate) type UnwrapFn = fn(kek: &[u8], wrapped: &[u8]) -> Option<Zeroizing<Vec<u8>>>;
pub(crate) type SealFn =
    fn(cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> JoseResult<Sealed>;
pub(crate) type OpenFn =
    fn(cek: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Option<Vec<u8>>;

/// Ciphertext and detached tag produced by a content cipher
pub(crate) struct Sealed {
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) tag: Vec<u8>,
}

#[derive(Clone, Copy)]
pub(crate) enum Operations {
    Signature { sign: SignFn, verify: VerifyFn },
    KeyWrap { wrap: WrapFn, unwrap: UnwrapFn },
    ContentEncryption { key_len: usize, iv_len: usize, seal: SealFn, open: OpenFn },
}

impl fmt::Debug for Operations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operations::Signature { .. } => "Signature",
            Operations::KeyWrap { .. } => "KeyWrap",
            Operations::ContentEncryption { .. } => "ContentEncryption",
        })
    }
}

/// Static description of one registered algorithm
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmDescriptor {
    /// Identifier as it appears in the `alg` or `enc` header member
    pub name: &'static str,
    /// Cryptographic family
    pub family: AlgorithmFamily,
    /// Expected key kind
    pub key_kind: KeyKind,
    /// Key-length constraint
    pub key_length: KeyLength,
    pub(crate) operations: Operations,
}

impl AlgorithmDescriptor {
    /// Whether this algorithm produces JWS signatures
    #[must_use]
    pub const fn is_signature(&self) -> bool {
        matches!(self.operations, Operations::Signature { .. })
    }

    /// Whether this algorithm wraps JWE content keys
    #[must_use]
    pub const fn is_key_management(&self) -> bool {
        matches!(self.operations, Operations::KeyWrap { .. })
    }

    /// Whether this algorithm encrypts JWE content
    #[must_use]
    pub const fn is_content_encryption(&self) -> bool {
        matches!(self.operations, Operations::ContentEncryption { .. })
    }

    pub(crate) fn check_key_length(&self, key: &[u8]) -> JoseResult<()> {
        if self.key_length.accepts(key.len()) {
            Ok(())
        } else {
            Err(JoseError::invalid_key(format!(
                "{} requires a key of {}, got {} bytes",
                self.name,
                self.key_length,
                key.len()
            )))
        }
    }

    pub(crate) fn sign(&self, key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
        match self.operations {
            Operations::Signature { sign, .. } => {
                self.check_key_length(key)?;
                sign(key, message)
            }
            _ => Err(JoseError::unrecognized_algorithm(format!(
                "{} is not a signature algorithm",
                self.name
            ))),
        }
    }

    pub(crate) fn verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        match self.operations {
            Operations::Signature { verify, .. } => {
                self.key_length.accepts(key.len()) && verify(key, message, signature)
            }
            _ => false,
        }
    }

    pub(crate) fn wrap_key(&self, kek: &[u8], cek: &[u8]) -> JoseResult<Vec<u8>> {
        match self.operations {
            Operations::KeyWrap { wrap, .. } => {
                self.check_key_length(kek)?;
                wrap(kek, cek)
            }
            _ => Err(JoseError::unrecognized_algorithm(format!(
                "{} is not a key management algorithm",
                self.name
            ))),
        }
    }

    pub(crate) fn unwrap_key(&self, kek: &[u8], wrapped: &[u8]) -> Option<Zeroizing<Vec<u8>>> {
        match self.operations {
            Operations::KeyWrap { unwrap, .. } if self.key_length.accepts(kek.len()) => {
                unwrap(kek, wrapped)
            }
            _ => None,
        }
    }

    /// Content key and IV lengths of a content cipher
    pub(crate) fn content_parameters(&self) -> Option<(usize, usize)> {
        match self.operations {
            Operations::ContentEncryption { key_len, iv_len, .. } => Some((key_len, iv_len)),
            _ => None,
        }
    }

    pub(crate) fn seal(
        &self,
        cek: &[u8],
        iv: &[u8],
        aad: &[u8],
        plaintext: &[u8],
    ) -> JoseResult<Sealed> {
        match self.operations {
            Operations::ContentEncryption { seal, .. } => seal(cek, iv, aad, plaintext),
            _ => Err(JoseError::unrecognized_algorithm(format!(
                "{} is not a content encryption algorithm",
                self.name
            ))),
        }
    }

    pub(crate) fn open(
        &self,
        cek: &[u8],
        iv: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
    ) -> Option<Vec<u8>> {
        match self.operations {
            Operations::ContentEncryption { key_len, iv_len, open, .. }
                if cek.len() == key_len && iv.len() == iv_len && tag.len() == TAG_LEN =>
            {
                open(cek, iv, aad, ciphertext, tag)
            }
            _ => None,
        }
    }
}

type Table = HashMap<&'static str, AlgorithmDescriptor>;

fn table(descriptors: &[AlgorithmDescriptor]) -> Table {
    descriptors.iter().map(|d| (d.name, *d)).collect()
}

// `alg` values: signatures and key management
static ALGORITHMS: Lazy<Table> = Lazy::new(|| {
    table(&[
        hmac::HS256,
        hmac::HS384,
        hmac::HS512,
        rsa::RS256,
        rsa::RS384,
        rsa::RS512,
        rsa::PS256,
        rsa::PS384,
        rsa::PS512,
        ecdsa::ES256,
        ecdsa::ES384,
        ecdsa::ES512,
        aes_kw::A128KW,
        aes_kw::A192KW,
        aes_kw::A256KW,
    ])
});

// `enc` values
static CONTENT_ENCRYPTION: Lazy<Table> =
    Lazy::new(|| table(&[aes_gcm::A128GCM, aes_gcm::A192GCM, aes_gcm::A256GCM]));

/// Look up an `alg` identifier
///
/// # Errors
/// `UnrecognizedAlgorithm` when the name is not registered
pub fn resolve(name: &str) -> JoseResult<&'static AlgorithmDescriptor> {
    ALGORITHMS
        .get(name)
        .ok_or_else(|| JoseError::unrecognized_algorithm(name))
}

/// Look up an `enc` identifier
///
/// # Errors
/// `UnrecognizedAlgorithm` when the name is not registered
pub fn resolve_content_encryption(name: &str) -> JoseResult<&'static AlgorithmDescriptor> {
    CONTENT_ENCRYPTION
        .get(name)
        .ok_or_else(|| JoseError::unrecognized_algorithm(name))
}

/// Registered `alg` identifiers, sorted
#[must_use]
pub fn algorithm_names() -> Vec<&'static str> {
    let mut names: Vec<_> = ALGORITHMS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Registered `enc` identifiers, sorted
#[must_use]
pub fn content_encryption_names() -> Vec<&'static str> {
    let mut names: Vec<_> = CONTENT_ENCRYPTION.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Read an asymmetric key given either as PEM text or raw DER
pub(crate) enum KeyEncoding<'a> {
    Pem(&'a str),
    Der(&'a [u8]),
}

impl<'a> KeyEncoding<'a> {
    pub(crate) fn detect(key: &'a [u8]) -> Self {
        match std::str::from_utf8(key) {
            Ok(text) if text.trim_start().starts_with("-----BEGIN") => KeyEncoding::Pem(text),
            _ => KeyEncoding::Der(key),
        }
    }
}
