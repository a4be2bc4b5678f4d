//! Shared fixtures for the integration tests

#![allow(dead_code)]

use cryypt_jose::Keystore;

pub const RSA_PRIVATE: &str = include_str!("../keys/rsa_private.pem");
pub const RSA_PRIVATE_PKCS1: &str = include_str!("../keys/rsa_private_pkcs1.pem");
pub const RSA_PUBLIC: &str = include_str!("../keys/rsa_public.pem");
pub const RSA_OTHER_PUBLIC: &str = include_str!("../keys/rsa_other_public.pem");
pub const RSA1024_PRIVATE: &str = include_str!("../keys/rsa1024_private.pem");
pub const EC256_PRIVATE: &str = include_str!("../keys/ec256_private.pem");
pub const EC256_PUBLIC: &str = include_str!("../keys/ec256_public.pem");
pub const EC384_PRIVATE: &str = include_str!("../keys/ec384_private.pem");
pub const EC384_PUBLIC: &str = include_str!("../keys/ec384_public.pem");
pub const EC521_PRIVATE: &str = include_str!("../keys/ec521_private.pem");
pub const EC521_PUBLIC: &str = include_str!("../keys/ec521_public.pem");
pub const EC256_OTHER_PUBLIC: &str = include_str!("../keys/ec256_other_public.pem");
pub const EC384_OTHER_PUBLIC: &str = include_str!("../keys/ec384_other_public.pem");
pub const EC521_OTHER_PUBLIC: &str = include_str!("../keys/ec521_other_public.pem");

/// 64-byte HMAC key, long enough for every HS variant
pub const HMAC_KEY: [u8; 64] = [
    0x4b, 0x1f, 0x93, 0x2a, 0xd0, 0x65, 0x7e, 0x11, 0xc8, 0x39, 0x04, 0xaf, 0x5d, 0xe2, 0x76, 0x98,
    0x21, 0xbb, 0x6c, 0x0e, 0xf4, 0x87, 0x3a, 0x52, 0x9d, 0x10, 0xe6, 0x47, 0xb8, 0x2c, 0x71, 0xd3,
    0x08, 0x5f, 0xa1, 0x36, 0xcb, 0x94, 0x7d, 0x22, 0xe9, 0x40, 0x1b, 0x68, 0xf7, 0x83, 0x0a, 0xbc,
    0x55, 0xde, 0x31, 0x9a, 0x67, 0x0c, 0xf2, 0x48, 0xa5, 0x1e, 0xd9, 0x73, 0x86, 0x2f, 0xc4, 0x5b,
];

pub const KID_A: &str = "e5739df2261c8a0ed41715e7f62cc295";
pub const KID_B: &str = "f0fd89c4abe83811ee9afa92d0d687f7";

/// Two 64-byte symmetric keys, base64 encoded
pub fn keystore() -> Keystore {
    Keystore::from([
        (
            KID_A,
            "SATKcp7AMnCg0YdEBPIcgknBplYttePtQoRddpJjyVak9F5vEp/7pL0Q1236MkVQd7nIXGoaPt4w1dlrpEmY4A==",
        ),
        (
            KID_B,
            "6Bzisgmhj9LGJDNjx/WBNRUsnZA8pXRpVxB7Pf8ar29XI158V4+t1GEqkCl5MYZhcOMTi5fa3yYr0Vcya6vUkA==",
        ),
    ])
}

/// Signing key and verification key for an `alg`
pub fn signature_keys(alg: &str) -> (Vec<u8>, Vec<u8>) {
    let pair = |private: &str, public: &str| {
        (private.as_bytes().to_vec(), public.as_bytes().to_vec())
    };
    match alg {
        "HS256" | "HS384" | "HS512" => (HMAC_KEY.to_vec(), HMAC_KEY.to_vec()),
        "RS256" | "RS384" | "RS512" | "PS256" | "PS384" | "PS512" => pair(RSA_PRIVATE, RSA_PUBLIC),
        "ES256" => pair(EC256_PRIVATE, EC256_PUBLIC),
        "ES384" => pair(EC384_PRIVATE, EC384_PUBLIC),
        "ES512" => pair(EC521_PRIVATE, EC521_PUBLIC),
        other => panic!("no fixture for {other}"),
    }
}

/// A well-formed verification key for `alg` that did not sign anything
pub fn other_verification_key(alg: &str) -> Vec<u8> {
    match alg {
        "HS256" | "HS384" | "HS512" => {
            let mut key = HMAC_KEY;
            key[0] ^= 0x01;
            key.to_vec()
        }
        "RS256" | "RS384" | "RS512" | "PS256" | "PS384" | "PS512" => {
            RSA_OTHER_PUBLIC.as_bytes().to_vec()
        }
        "ES256" => EC256_OTHER_PUBLIC.as_bytes().to_vec(),
        "ES384" => EC384_OTHER_PUBLIC.as_bytes().to_vec(),
        "ES512" => EC521_OTHER_PUBLIC.as_bytes().to_vec(),
        other => panic!("no fixture for {other}"),
    }
}

/// Key-encryption key sized for a key wrap `alg`
pub fn wrap_key(alg: &str) -> Vec<u8> {
    match alg {
        "A128KW" => vec![0x3c; 16],
        "A192KW" => vec![0x3c; 24],
        "A256KW" => vec![0x3c; 32],
        other => panic!("no fixture for {other}"),
    }
}

pub const SIGNATURE_ALGORITHMS: [&str; 12] = [
    "HS256", "HS384", "HS512", "RS256", "RS384", "RS512", "PS256", "PS384", "PS512", "ES256",
    "ES384", "ES512",
];

pub const KEY_WRAP_ALGORITHMS: [&str; 3] = ["A128KW", "A192KW", "A256KW"];

pub const CONTENT_ALGORITHMS: [&str; 3] = ["A128GCM", "A192GCM", "A256GCM"];

/// Flip one bit in the decoded form of segment `index`
pub fn tamper_segment(token: &str, index: usize) -> String {
    let mut segments: Vec<String> = token.split('.').map(str::to_owned).collect();
    let mut bytes = cryypt_jose::codec::decode(&segments[index]).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    segments[index] = cryypt_jose::codec::encode(bytes);
    segments.join(".")
}

/// Replace segment `index` with the encoding of `json`
pub fn replace_segment(token: &str, index: usize, json: &str) -> String {
    let mut segments: Vec<String> = token.split('.').map(str::to_owned).collect();
    segments[index] = cryypt_jose::codec::encode(json);
    segments.join(".")
}

/// Add an `extra` member to the JSON object in segment `index`
pub fn add_member(token: &str, index: usize) -> String {
    let mut segments: Vec<String> = token.split('.').map(str::to_owned).collect();
    let bytes = cryypt_jose::codec::decode(&segments[index]).unwrap();
    let mut object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(&bytes).unwrap();
    object.insert("extra".to_string(), serde_json::Value::Bool(true));
    segments[index] = cryypt_jose::codec::encode(serde_json::to_vec(&object).unwrap());
    segments.join(".")
}
