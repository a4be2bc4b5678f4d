//! ECDSA signatures (ES256, ES384, ES512)
//!
//! Signatures use the fixed-width `R || S` encoding required by RFC 7518
//! section 3.4, not ASN.1 DER. Keys are PKCS#8 (private) or SPKI (public),
//! PEM or DER.

use super::{AlgorithmDescriptor, AlgorithmFamily, KeyEncoding, KeyKind, KeyLength, Operations};
use crate::error::{JoseError, JoseResult};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use p521::elliptic_curve::sec1::ToEncodedPoint;

pub(super) const ES256: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "ES256",
    family: AlgorithmFamily::Ecdsa,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::Curve,
    operations: Operations::Signature { sign: sign_es256, verify: verify_es256 },
};

pub(super) const ES384: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "ES384",
    family: AlgorithmFamily::Ecdsa,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::Curve,
    operations: Operations::Signature { sign: sign_es384, verify: verify_es384 },
};

pub(super) const ES512: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "ES512",
    family: AlgorithmFamily::Ecdsa,
    key_kind: KeyKind::Asymmetric,
    key_length: KeyLength::Curve,
    operations: Operations::Signature { sign: sign_es512, verify: verify_es512 },
};

fn decode_private<K: DecodePrivateKey>(key: &[u8], curve: &str) -> JoseResult<K> {
    let decoded = match KeyEncoding::detect(key) {
        KeyEncoding::Pem(pem) => K::from_pkcs8_pem(pem).ok(),
        KeyEncoding::Der(der) => K::from_pkcs8_der(der).ok(),
    };
    decoded.ok_or_else(|| JoseError::invalid_key(format!("expected a {curve} private key")))
}

fn decode_public<K: DecodePublicKey>(key: &[u8]) -> Option<K> {
    match KeyEncoding::detect(key) {
        KeyEncoding::Pem(pem) => K::from_public_key_pem(pem).ok(),
        KeyEncoding::Der(der) => K::from_public_key_der(der).ok(),
    }
}

fn sign_es256(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    use p256::ecdsa::{Signature, SigningKey, signature::Signer};

    let signing_key: SigningKey = decode_private(key, "P-256")?;
    let signature: Signature = signing_key.sign(message);
    Ok(signature.to_bytes().to_vec())
}

fn verify_es256(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    use p256::ecdsa::{Signature, VerifyingKey, signature::Verifier};

    let Some(verifying_key) = decode_public::<VerifyingKey>(key) else {
        return false;
    };
    Signature::from_slice(signature)
        .is_ok_and(|signature| verifying_key.verify(message, &signature).is_ok())
}

fn sign_es384(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    use p384::ecdsa::{Signature, SigningKey, signature::Signer};

    let signing_key: SigningKey = decode_private(key, "P-384")?;
    let signature: Signature = signing_key.sign(message);
    Ok(signature.to_bytes().to_vec())
}

fn verify_es384(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    use p384::ecdsa::{Signature, VerifyingKey, signature::Verifier};

    let Some(verifying_key) = decode_public::<VerifyingKey>(key) else {
        return false;
    };
    Signature::from_slice(signature)
        .is_ok_and(|signature| verifying_key.verify(message, &signature).is_ok())
}

// P-521 signing keys are decoded through the curve's SecretKey/PublicKey
// types, which carry the PKCS#8/SPKI support.
fn sign_es512(key: &[u8], message: &[u8]) -> JoseResult<Vec<u8>> {
    use p521::ecdsa::{Signature, SigningKey, signature::Signer};

    let secret: p521::SecretKey = decode_private(key, "P-521")?;
    let signing_key = SigningKey::from_bytes(&secret.to_bytes())
        .map_err(|_| JoseError::invalid_key("expected a P-521 private key"))?;
    let signature: Signature = signing_key.sign(message);
    Ok(signature.to_bytes().to_vec())
}

fn verify_es512(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    use p521::ecdsa::{Signature, VerifyingKey, signature::Verifier};

    let Some(public) = decode_public::<p521::PublicKey>(key) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public.to_encoded_point(false).as_bytes())
    else {
        return false;
    };
    Signature::from_slice(signature)
        .is_ok_and(|signature| verifying_key.verify(message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EC256_PRIVATE: &str = include_str!("../../tests/keys/ec256_private.pem");
    const EC256_PUBLIC: &str = include_str!("../../tests/keys/ec256_public.pem");
    const EC384_PRIVATE: &str = include_str!("../../tests/keys/ec384_private.pem");
    const EC384_PUBLIC: &str = include_str!("../../tests/keys/ec384_public.pem");
    const EC521_PRIVATE: &str = include_str!("../../tests/keys/ec521_private.pem");
    const EC521_PUBLIC: &str = include_str!("../../tests/keys/ec521_public.pem");

    #[test]
    fn signatures_are_fixed_width() {
        assert_eq!(sign_es256(EC256_PRIVATE.as_bytes(), b"m").unwrap().len(), 64);
        assert_eq!(sign_es384(EC384_PRIVATE.as_bytes(), b"m").unwrap().len(), 96);
        assert_eq!(sign_es512(EC521_PRIVATE.as_bytes(), b"m").unwrap().len(), 132);
    }

    #[test]
    fn each_curve_verifies_its_own_signatures() {
        let cases: [(super::super::SignFn, super::super::VerifyFn, &str, &str); 3] = [
            (sign_es256, verify_es256, EC256_PRIVATE, EC256_PUBLIC),
            (sign_es384, verify_es384, EC384_PRIVATE, EC384_PUBLIC),
            (sign_es512, verify_es512, EC521_PRIVATE, EC521_PUBLIC),
        ];
        for (sign, verify, private, public) in cases {
            let signature = sign(private.as_bytes(), b"header.payload").unwrap();
            assert!(verify(public.as_bytes(), b"header.payload", &signature));
            assert!(!verify(public.as_bytes(), b"header.payloae", &signature));
        }
    }

    #[test]
    fn curves_do_not_cross() {
        let signature = sign_es256(EC256_PRIVATE.as_bytes(), b"m").unwrap();
        assert!(!verify_es384(EC384_PUBLIC.as_bytes(), b"m", &signature));
        assert!(sign_es384(EC256_PRIVATE.as_bytes(), b"m").is_err());
    }

    #[test]
    fn private_key_cannot_verify() {
        let signature = sign_es256(EC256_PRIVATE.as_bytes(), b"m").unwrap();
        assert!(!verify_es256(EC256_PRIVATE.as_bytes(), b"m", &signature));
    }
}
