//! Token generation
//!
//! A JWS is `b64(header).b64(payload).b64(signature)`; a JWE is
//! `b64(header).b64(wrapped key).b64(iv).b64(ciphertext).b64(tag)` with the
//! encoded header as AAD. Every input check happens before any key is used.

use crate::algorithms::{self, AlgorithmDescriptor};
use crate::codec;
use crate::error::{JoseError, JoseResult};
use crate::keys::{self, KeySource, Keystore};
use crate::types::{Claims, Header, TokenKind};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use zeroize::Zeroizing;

/// Builder for a single token
///
/// ```
/// use cryypt_jose::{Generator, parse};
/// use serde_json::json;
///
/// let key = [7u8; 32];
/// let token = Generator::sign("HS256")
///     .with_key(&key)
///     .with_key_id("k1")
///     .generate(&json!({"sub": "x"}))?;
///
/// let mut parsed = parse(&token)?;
/// assert!(parsed.verify(&key).valid());
/// # Ok::<(), cryypt_jose::JoseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Generator<'k> {
    alg: String,
    enc: Option<String>,
    key: Option<KeySource<'k>>,
    kid: Option<String>,
    issued_at: bool,
}

impl<'k> Generator<'k> {
    /// Produce a JWS signed with `alg`
    #[must_use]
    pub fn sign(alg: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            enc: None,
            key: None,
            kid: None,
            issued_at: true,
        }
    }

    /// Produce a JWE whose content key is wrapped with `alg` and whose
    /// payload is encrypted with `enc`
    #[must_use]
    pub fn encrypt(alg: impl Into<String>, enc: impl Into<String>) -> Self {
        Self {
            enc: Some(enc.into()),
            ..Self::sign(alg)
        }
    }

    /// Use this key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<KeySource<'k>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Look the key up in `store` under `kid`, which is also written to the header
    #[must_use]
    pub fn with_keystore(mut self, store: &'k Keystore, kid: impl Into<String>) -> Self {
        self.key = Some(KeySource::Keystore(store));
        self.kid = Some(kid.into());
        self
    }

    /// Write a `kid` header member
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Do not add an `iat` claim
    #[must_use]
    pub fn without_issued_at(mut self) -> Self {
        self.issued_at = false;
        self
    }

    /// Serialize `payload` into a compact token
    ///
    /// # Errors
    /// `UnrecognizedAlgorithm` for unknown names or a family that does not fit
    /// the token kind, `Serialization` unless the payload is a JSON object,
    /// `KeyNotFound` or `InvalidKey` when no usable key resolves, `Crypto` if
    /// a primitive fails.
    pub fn generate<T: Serialize + ?Sized>(&self, payload: &T) -> JoseResult<String> {
        let source = self
            .key
            .ok_or_else(|| JoseError::key_not_found("no key or keystore was supplied"))?;
        let claims = self.claims(payload)?;
        let kid = self.kid.as_deref();

        let token = match &self.enc {
            None => {
                let descriptor = signature_algorithm(&self.alg)?;
                let key = keys::resolve_key(descriptor, kid, source)?;
                sign(descriptor, &key, kid, &claims)?
            }
            Some(enc) => {
                let descriptor = key_management_algorithm(&self.alg)?;
                let content = algorithms::resolve_content_encryption(enc)?;
                let key = keys::resolve_key(descriptor, kid, source)?;
                encrypt(descriptor, content, &key, kid, &claims)?
            }
        };

        tracing::debug!(
            alg = %self.alg,
            enc = self.enc.as_deref(),
            kind = ?self.kind(),
            "token generated"
        );
        Ok(token)
    }

    fn kind(&self) -> TokenKind {
        if self.enc.is_some() {
            TokenKind::Jwe
        } else {
            TokenKind::Jws
        }
    }

    fn claims<T: Serialize + ?Sized>(&self, payload: &T) -> JoseResult<Claims> {
        let Value::Object(mut claims) = serde_json::to_value(payload)? else {
            return Err(JoseError::Serialization(
                "payload must serialize to a JSON object".to_string(),
            ));
        };
        if self.issued_at && !claims.contains_key("iat") {
            claims.insert("iat".to_string(), Value::from(Utc::now().timestamp()));
        }
        Ok(claims)
    }
}

fn signature_algorithm(alg: &str) -> JoseResult<&'static AlgorithmDescriptor> {
    let descriptor = algorithms::resolve(alg)?;
    if descriptor.is_signature() {
        Ok(descriptor)
    } else {
        Err(JoseError::unrecognized_algorithm(alg))
    }
}

fn key_management_algorithm(alg: &str) -> JoseResult<&'static AlgorithmDescriptor> {
    let descriptor = algorithms::resolve(alg)?;
    if descriptor.is_key_management() {
        Ok(descriptor)
    } else {
        Err(JoseError::unrecognized_algorithm(alg))
    }
}

fn sign(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    kid: Option<&str>,
    claims: &Claims,
) -> JoseResult<String> {
    let header = codec::encode_json(&Header::for_signature(descriptor.name, kid))?;
    let payload = codec::encode_json(claims)?;
    let signing_input = format!("{header}.{payload}");
    let signature = descriptor.sign(key, signing_input.as_bytes())?;
    Ok(codec::join(&[signing_input, codec::encode(signature)]))
}

fn encrypt(
    descriptor: &AlgorithmDescriptor,
    content: &AlgorithmDescriptor,
    key: &[u8],
    kid: Option<&str>,
    claims: &Claims,
) -> JoseResult<String> {
    let (key_len, iv_len) = content
        .content_parameters()
        .ok_or_else(|| JoseError::unrecognized_algorithm(content.name))?;
    descriptor.check_key_length(key)?;

    let mut rng = rand::rng();
    let mut cek = Zeroizing::new(vec![0u8; key_len]);
    rng.fill(&mut cek[..]);
    let mut iv = vec![0u8; iv_len];
    rng.fill(&mut iv[..]);

    let wrapped = descriptor.wrap_key(key, &cek)?;
    let header = codec::encode_json(&Header::for_encryption(descriptor.name, content.name, kid))?;
    let plaintext = Zeroizing::new(serde_json::to_vec(claims)?);
    let sealed = content.seal(&cek, &iv, header.as_bytes(), &plaintext)?;

    Ok(codec::join(&[
        header,
        codec::encode(wrapped),
        codec::encode(iv),
        codec::encode(sealed.ciphertext),
        codec::encode(sealed.tag),
    ]))
}

/// Generate a JWS
///
/// # Errors
/// As [`Generator::generate`]
pub fn generate<'k, T: Serialize + ?Sized>(
    alg: &str,
    payload: &T,
    key: impl Into<KeySource<'k>>,
    kid: Option<&str>,
) -> JoseResult<String> {
    let mut generator = Generator::sign(alg).with_key(key);
    if let Some(kid) = kid {
        generator = generator.with_key_id(kid);
    }
    generator.generate(payload)
}

/// Generate a JWE
///
/// # Errors
/// As [`Generator::generate`]
pub fn generate_encrypted<'k, T: Serialize + ?Sized>(
    alg: &str,
    enc: &str,
    payload: &T,
    key: impl Into<KeySource<'k>>,
    kid: Option<&str>,
) -> JoseResult<String> {
    let mut generator = Generator::encrypt(alg, enc).with_key(key);
    if let Some(kid) = kid {
        generator = generator.with_key_id(kid);
    }
    generator.generate(payload)
}
