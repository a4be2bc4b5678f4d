//! Compact JWS and JWE tokens
//!
//! This crate provides:
//! - HMAC, RSASSA-PKCS1-v1_5, RSASSA-PSS and ECDSA signed tokens (JWS)
//! - AES key wrap with AES-GCM encrypted tokens (JWE)
//! - Keystore lookup by `kid`
//! - Algorithm allow-lists, token lifetimes and expiry evaluation
//!
//! ```
//! use cryypt_jose::{ErrorKind, generate, parse};
//! use serde_json::json;
//!
//! let key = [0x5a; 64];
//! let token = generate("HS512", &json!({"sub": "x"}), &key, None)?;
//!
//! let mut parsed = parse(&token)?;
//! parsed.set_algorithm_list(["HS512"]).set_token_lifetime(600);
//! let result = parsed.verify(&key);
//! assert!(result.valid());
//! assert!(!result.expired());
//! assert_eq!(result.payload().unwrap()["sub"], "x");
//!
//! let mut parsed = parse(&token)?;
//! parsed.set_algorithm_list(["HS256"]);
//! assert_eq!(parsed.verify(&key).error_kind(), Some(ErrorKind::UnwantedAlgorithm));
//! # Ok::<(), cryypt_jose::JoseError>(())
//! ```

pub mod algorithms;
pub mod codec;
mod error;
mod generator;
mod keys;
mod parser;
mod types;
mod validation;
mod verifier;

pub use algorithms::{AlgorithmDescriptor, AlgorithmFamily, KeyKind, KeyLength};
pub use error::{ErrorKind, JoseError, JoseResult};
pub use generator::{Generator, generate, generate_encrypted};
pub use keys::{KeySource, Keystore};
pub use parser::{ParsedToken, VerificationState, parse};
pub use types::{Claims, Header, TOKEN_TYPE, TokenKind};
pub use validation::VerificationOptions;
pub use verifier::VerificationResult;
