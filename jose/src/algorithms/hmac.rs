//! HMAC-SHA2 signatures (HS256, HS384, HS512)
//!
//! Keys must be at least as long as the digest output.

use super::{AlgorithmDescriptor, AlgorithmFamily, KeyKind, KeyLength, Operations};
use crate::error::{JoseError, JoseResult};
use hmac::{Hmac, Mac, digest::KeyInit};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

pub(super) const HS256: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "HS256",
    family: AlgorithmFamily::Hmac,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::AtLeast(32),
    operations: Operations::Signature { sign: sign_hs256, verify: verify_hs256 },
};

pub(super) const HS384: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "HS384",
    family: AlgorithmFamily::Hmac,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::AtLeast(48),
    operations: Operations::Signature { sign: sign_hs384, verify: verify_hs384 },
};

pub(super) const HS512: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "HS512",
    family: AlgorithmFamily::Hmac,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::AtLeast(64),
    operations: Operations::Signature { sign: sign_hs512, verify: verify_hs512 },
};

fn compute<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|_| JoseError::invalid_key("HMAC key rejected"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[inline]
fn tag_matches<M: Mac + KeyInit>(secret: &[u8], message: &[u8], signature: &[u8]) -> bool {
    compute::<M>(secret, message)
        .map(|expected| bool::from(expected.as_slice().ct_eq(signature)))
        .unwrap_or(false)
}

fn sign_hs256(secret: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    compute::<Hmac<Sha256>>(secret, message)
}

fn verify_hs256(secret: &[u8], message: &[u8], signature: &[u8]) -> bool {
    tag_matches::<Hmac<Sha256>>(secret, message, signature)
}

fn sign_hs384(secret: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    compute::<Hmac<Sha384>>(secret, message)
}

fn verify_hs384(secret: &[u8], message: &[u8], signature: &[u8]) -> bool {
    tag_matches::<Hmac<Sha384>>(secret, message, signature)
}

fn sign_hs512(secret: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    compute::<Hmac<Sha512>>(secret, message)
}

fn verify_hs512(secret: &[u8], message: &[u8], signature: &[u8]) -> bool {
    tag_matches::<Hmac<Sha512>>(secret, message, signature)
}
