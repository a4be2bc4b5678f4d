//! RSA signatures: RSASSA-PKCS1-v1_5 (RS256, RS384, RS512) and RSASSA-PSS
//! (PS256, PS384, PS512, salt length equal to the digest size)
//!
//! Private keys are accepted as PKCS#8 or PKCS#1, public keys as SPKI or
//! PKCS#1, each either PEM or DER encoded.

use super::{AlgorithmDescriptor, AlgorithmFamily, KeyEncoding, KeyKind, KeyLength, Operations};
use crate::error::{JoseError, JoseResult};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{AssociatedOid, DecodePrivateKey, DecodePublicKey};
use rsa::rand_core::OsRng;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey, pkcs1v15, pss};
use sha2::digest::FixedOutputReset;
use sha2::{Digest, Sha256, Sha384, Sha512};

const MIN_MODULUS_BITS: usize = 2048;

pub(super) const RS256: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "RS256",
    family: AlgorithmFamily::RsaPkcs1,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::ModulusBits(MIN_MODULUS_BITS),
    operations: Operations::Signature { sign: sign_rs256, verify: verify_rs256 },
};

pub(super) const RS384: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "RS384",
    family: AlgorithmFamily::RsaPkcs1,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::ModulusBits(MIN_MODULUS_BITS),
    operations: Operations::Signature { sign: sign_rs384, verify: verify_rs384 },
};

pub(super) const RS512: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "RS512",
    family: AlgorithmFamily::RsaPkcs1,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::ModulusBits(MIN_MODULUS_BITS),
    operations: Operations::Signature { sign: sign_rs512, verify: verify_rs512 },
};

pub(super) const PS256: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "PS256",
    family: AlgorithmFamily::RsaPss,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::ModulusBits(MIN_MODULUS_BITS),
    operations: Operations::Signature { sign: sign_ps256, verify: verify_ps256 },
};

pub(super) const PS384: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "PS384",
    family: AlgorithmFamily::RsaPss,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::ModulusBits(MIN_MODULUS_BITS),
    operations: Operations::Signature { sign: sign_ps384, verify: verify_ps384 },
};

pub(super) const PS512: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "PS512",
    family: AlgorithmFamily::RsaPss,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::ModulusBits(MIN_MODULUS_BITS),
    operations: Operations::Signature { sign: sign_ps512, verify: verify_ps512 },
};

fn private_key(key: &[u8]) -> JoseResult<RsaPrivateKey> {
    let decoded = match KeyEncoding::detect(key) {
        KeyEncoding::Pem(pem) => RsaPrivateKey::from_pkcs8_pem(pem)
            .ok()
            .or_else(|| RsaPrivateKey::from_pkcs1_pem(pem).ok()),
        KeyEncoding::Der(der) => RsaPrivateKey::from_pkcs8_der(der)
            .ok()
            .or_else(|| RsaPrivateKey::from_pkcs1_der(der).ok()),
    };
    let private_key =
        decoded.ok_or_else(|| JoseError::invalid_key("expected an RSA private key"))?;

    let bits = private_key.size() * 8;
    if bits < MIN_MODULUS_BITS {
        return Err(JoseError::invalid_key(format!(
            "RSA modulus of {bits} bits is below {MIN_MODULUS_BITS}"
        )));
    }
    Ok(private_key)
}

fn public_key(key: &[u8]) -> Option<RsaPublicKey> {
    let public_key = match KeyEncoding::detect(key) {
        KeyEncoding::Pem(pem) => RsaPublicKey::from_public_key_pem(pem)
            .ok()
            .or_else(|| RsaPublicKey::from_pkcs1_pem(pem).ok()),
        KeyEncoding::Der(der) => RsaPublicKey::from_public_key_der(der)
            .ok()
            .or_else(|| RsaPublicKey::from_pkcs1_der(der).ok()),
    }?;
    (public_key.size() * 8 >= MIN_MODULUS_BITS).then_some(public_key)
}

fn sign<D: Digest + AssociatedOid>(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    let signing_key = pkcs1v15::SigningKey::<D>::new(private_key(key)?);
    let signature = signing_key.sign(message);
    Ok(signature.to_vec())
}

fn verify<D: Digest + AssociatedOid>(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Some(public_key) = public_key(key) else {
        return false;
    };
    let Ok(signature) = pkcs1v15::Signature::try_from(signature) else {
        return false;
    };
    pkcs1v15::VerifyingKey::<D>::new(public_key)
        .verify(message, &signature)
        .is_ok()
}

fn sign_rs256(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    sign::<Sha256>(key, message)
}

fn verify_rs256(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    verify::<Sha256>(key, message, signature)
}

fn sign_rs384(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    sign::<Sha384>(key, message)
}

fn verify_rs384(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    verify::<Sha384>(key, message, signature)
}

fn sign_rs512(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    sign::<Sha512>(key, message)
}

fn verify_rs512(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    verify::<Sha512>(key, message, signature)
}

// PSS salts come from the OS generator re-exported by `rsa`.
fn sign_pss<D: Digest + FixedOutputReset>(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    let signing_key = pss::BlindedSigningKey::<D>::new(private_key(key)?);
    let signature = signing_key
        .try_sign_with_rng(&mut OsRng, message)
        .map_err(|e| JoseError::crypto(format!("PSS signing failed: {e}")))?;
    Ok(signature.to_vec())
}

fn verify_pss<D: Digest + FixedOutputReset>(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Some(public_key) = public_key(key) else {
        return false;
    };
    let Ok(signature) = pss::Signature::try_from(signature) else {
        return false;
    };
    pss::VerifyingKey::<D>::new(public_key)
        .verify(message, &signature)
        .is_ok()
}

fn sign_ps256(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    sign_pss::<Sha256>(key, message)
}

fn verify_ps256(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    verify_pss::<Sha256>(key, message, signature)
}

fn sign_ps384(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    sign_pss::<Sha384>(key, message)
}

fn verify_ps384(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    verify_pss::<Sha384>(key, message, signature)
}

fn sign_ps512(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    sign_pss::<Sha512>(key, message)
}

fn verify_ps512(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    verify_pss::<Sha512>(key, message, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE: &str = include_str!("../../tests/keys/rsa_private.pem");
    const PRIVATE_PKCS1: &str = include_str!("../../tests/keys/rsa_private_pkcs1.pem");
    const PUBLIC: &str = include_str!("../../tests/keys/rsa_public.pem");
    const SHORT_PRIVATE: &str = include_str!("../../tests/keys/rsa1024_private.pem");

    #[test]
    fn pkcs8_and_pkcs1_private_keys_sign_identically() {
        // PKCS#1 v1.5 is deterministic
        let a = sign_rs256(PRIVATE.as_bytes(), b"message").unwrap();
        let b = sign_rs256(PRIVATE_PKCS1.as_bytes(), b"message").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 256);
        assert!(verify_rs256(PUBLIC.as_bytes(), b"message", &a));
    }

    #[test]
    fn key_kinds_are_not_interchangeable() {
        let err = sign_rs384(PUBLIC.as_bytes(), b"message").unwrap_err();
        assert!(matches!(err, JoseError::InvalidKey(_)));

        let signature = sign_rs384(PRIVATE.as_bytes(), b"message").unwrap();
        assert!(!verify_rs384(PRIVATE.as_bytes(), b"message", &signature));
    }

    #[test]
    fn short_modulus_is_rejected() {
        let err = sign_rs512(SHORT_PRIVATE.as_bytes(), b"message").unwrap_err();
        assert!(matches!(err, JoseError::InvalidKey(_)));
    }

    #[test]
    fn digest_is_bound_into_signature() {
        let signature = sign_rs256(PRIVATE.as_bytes(), b"message").unwrap();
        assert!(!verify_rs512(PUBLIC.as_bytes(), b"message", &signature));
        assert!(!verify_rs256(PUBLIC.as_bytes(), b"messagf", &signature));
    }

    #[test]
    fn pss_signatures_are_randomized_and_verify() {
        let a = sign_ps256(PRIVATE.as_bytes(), b"message").unwrap();
        let b = sign_ps256(PRIVATE.as_bytes(), b"message").unwrap();
        assert_ne!(a, b);
        assert!(verify_ps256(PUBLIC.as_bytes(), b"message", &a));
        assert!(verify_ps256(PUBLIC.as_bytes(), b"message", &b));
        assert!(!verify_ps256(PUBLIC.as_bytes(), b"messagf", &a));
    }

    #[test]
    fn pss_and_pkcs1_do_not_cross() {
        let pss = sign_ps384(PRIVATE.as_bytes(), b"message").unwrap();
        let pkcs1 = sign_rs384(PRIVATE.as_bytes(), b"message").unwrap();
        assert!(!verify_rs384(PUBLIC.as_bytes(), b"message", &pss));
        assert!(!verify_ps384(PUBLIC.as_bytes(), b"message", &pkcs1));
        assert!(!verify_ps512(PUBLIC.as_bytes(), b"message", &pss));
        assert!(sign_ps512(SHORT_PRIVATE.as_bytes(), b"message").is_err());
    }
}
