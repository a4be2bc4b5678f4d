//! AES key wrap (A128KW, A192KW, A256KW, RFC 3394)
//!
//! The key-encryption key must be at least the AES key size. Longer keys are
//! accepted and their leading bytes form the AES key.

use super::{AlgorithmDescriptor, AlgorithmFamily, KeyKind, KeyLength, Operations};
use crate::error::{JoseError, JoseResult};
use aes_gcm::aead::generic_array::GenericArray;
use aes_kw::{KekAes128, KekAes192, KekAes256};
use zeroize::Zeroizing;

pub(super) const A128KW: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "A128KW",
    family: AlgorithmFamily::AesKeyWrap,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::AtLeast(16),
    operations: Operations::KeyWrap { wrap: wrap_a128, unwrap: unwrap_a128 },
};

pub(super) const A192KW: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "A192KW",
    family: AlgorithmFamily::AesKeyWrap,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::AtLeast(24),
    operations: Operations::KeyWrap { wrap: wrap_a192, unwrap: unwrap_a192 },
};

pub(super) const A256KW: AlgorithmDescriptor = AlgorithmDescriptor {
    name: "A256KW",
    family: AlgorithmFamily::AesKeyWrap,
    key_kind: KeyKind::Symmetric,
    key_length: KeyLength::AtLeast(32),
    operations: Operations::KeyWrap { wrap: wrap_a256, unwrap: unwrap_a256 },
};

macro_rules! key_wrap {
    ($wrap:ident, $unwrap:ident, $kek:ty, $len:expr) => {
        fn $wrap(kek: &[u8], cek: &[u8]) -> JoseResult<Vec<u8>> {
            if kek.len() < $len {
                return Err(JoseError::invalid_key(format!(
                    "key wrap needs at least {} bytes, got {}",
                    $len,
                    kek.len()
                )));
            }
            <$kek>::new(GenericArray::from_slice(&kek[..$len]))
                .wrap_vec(cek)
                .map_err(|e| JoseError::crypto(format!("key wrap failed: {e}")))
        }

        fn $unwrap(kek: &[u8], wrapped: &[u8]) -> Option<Zeroizing<Vec<u8>>> {
            if kek.len() < $len {
                return None;
            }
            <$kek>::new(GenericArray::from_slice(&kek[..$len]))
                .unwrap_vec(wrapped)
                .ok()
                .map(Zeroizing::new)
        }
    };
}

key_wrap!(wrap_a128, unwrap_a128, KekAes128, 16);
key_wrap!(wrap_a192, unwrap_a192, KekAes192, 24);
key_wrap!(wrap_a256, unwrap_a256, KekAes256, 32);
