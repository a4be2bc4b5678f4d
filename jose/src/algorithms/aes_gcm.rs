//! AES-GCM content encryption (A128GCM, A192GCM, A256GCM)
//!
//! 96-bit IV, 128-bit detached tag. The protected header is bound in as AAD.

use super::{AlgorithmDescriptor, AlgorithmFamily, KeyKind, KeyLength, Operations, Sealed, TAG_LEN};
use crate::error::{JoseError, JoseResult};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit};

type Aes192Gcm = AesGcm<aes::Aes192, U12>;

const IV_LEN: usize = 12;

pub(super) const A128GCM: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "A128GCM",
    family: AlgorithmFamily::AesGcm,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::Exactly(16),
    operations: Operations::ContentEncryption {
        key_len: 16,
        iv_len: IV_LEN,
        seal: seal_a128,
        open: open_a128,
    },
};

pub(super) const A192GCM: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "A192GCM",
    family: AlgorithmFamily::AesGcm,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::Exactly(24),
    operations: Operations::ContentEncryption {
        key_len: 24,
        iv_len: IV_LEN,
        seal: seal_a192,
        open: open_a192,
    },
};

pub(super) const A256GCM: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "A256GCM",
    family: AlgorithmFamily::AesGcm,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::Exactly(32),
    operations: Operations::ContentEncryption {
        key_len: 32,
        iv_len: IV_LEN,
        seal: seal_a256,
        open: open_a256,
    },
};

macro_rules! content_cipher {
    ($seal:ident, $open:ident, $cipher:ty) => {
        fn $seal(cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> JoseResult<Sealed> {
            if iv.len() != IV_LEN {
                return Err(JoseError::crypto(format!(
                    "IV must be {IV_LEN} bytes, got {}",
                    iv.len()
                )));
            }
            let cipher = <$cipher>::new_from_slice(cek)
                .map_err(|_| JoseError::invalid_key("content key has the wrong length"))?;
            let mut ciphertext = cipher
                .encrypt(GenericArray::from_slice(iv), Payload { msg: plaintext, aad })
                .map_err(|_| JoseError::crypto("content encryption failed"))?;
            let tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);
            Ok(Sealed { ciphertext, tag })
        }

        fn $open(
            cek: &[u8],
            iv: &[u8],
            aad: &[u8],
            ciphertext: &[u8],
            tag: &[u8],
        ) -> Option<Vec<u8>> {
            if iv.len() != IV_LEN || tag.len() != TAG_LEN {
                return None;
            }
            let cipher = <$cipher>::new_from_slice(cek).ok()?;
            let mut combined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
            combined.extend_from_slice(ciphertext);
            combined.extend_from_slice(tag);
            cipher
                .decrypt(GenericArray::from_slice(iv), Payload { msg: &combined, aad })
                .ok()
        }
    };
}

content_cipher!(seal_a128, open_a128, Aes128Gcm);
content_cipher!(seal_a192, open_a192, Aes192Gcm);
content_cipher!(seal_a256, open_a256, Aes256Gcm);
