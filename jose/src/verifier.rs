//! Token verification
//!
//! Checks run in a fixed order: algorithm, key, integrity, then time claims.
//! Every cryptographic failure, including an unusable key, is reported as the
//! same `IntegrityCheckFailed` so a caller cannot tell which part was wrong.

use crate::algorithms::{self, AlgorithmDescriptor};
use crate::codec;
use crate::error::{ErrorKind, JoseError, JoseResult};
use crate::keys::{self, KeySource};
use crate::parser::{ParsedToken, VerificationState};
use crate::types::{Claims, Header, TokenKind};
use crate::validation::{self, VerificationOptions};
use zeroize::Zeroizing;

/// Outcome of [`ParsedToken::verify`]
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    valid: bool,
    expired: bool,
    error: Option<JoseError>,
    header: Option<Header>,
    payload: Option<Claims>,
}

impl VerificationResult {
    fn verified(header: Header, payload: Claims, expired: bool) -> Self {
        Self {
            valid: true,
            expired,
            error: None,
            header: Some(header),
            payload: Some(payload),
        }
    }

    fn failed(error: JoseError) -> Self {
        Self {
            valid: false,
            expired: false,
            error: Some(error),
            header: None,
            payload: None,
        }
    }

    /// Whether the algorithm, key and integrity checks all passed
    ///
    /// Independent of expiry.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Whether the time claims place the token outside its validity window
    ///
    /// Only evaluated when the integrity check passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expired
    }

    /// Valid and not expired
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.valid && !self.expired
    }

    /// The failure, if any
    #[must_use]
    pub fn error(&self) -> Option<&JoseError> {
        self.error.as_ref()
    }

    /// Discriminant of the failure, if any
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(JoseError::kind)
    }

    /// Verified header
    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Verified claims, decrypted for a JWE
    #[must_use]
    pub fn payload(&self) -> Option<&Claims> {
        self.payload.as_ref()
    }

    /// Take the verified claims
    #[must_use]
    pub fn into_payload(self) -> Option<Claims> {
        self.payload
    }
}

impl ParsedToken {
    /// Restrict the accepted `alg` values. An empty list accepts any
    /// registered algorithm.
    pub fn set_algorithm_list<I, S>(&mut self, algorithms: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let algorithms: Vec<String> = algorithms.into_iter().map(Into::into).collect();
        self.configure("algorithm list", |options| options.allowed_algorithms = algorithms)
    }

    /// Treat the token as expired once `now - iat` exceeds `seconds`
    pub fn set_token_lifetime(&mut self, seconds: u64) -> &mut Self {
        self.configure("token lifetime", |options| options.lifetime = Some(seconds))
    }

    /// Evaluate time claims at a fixed instant instead of the system clock
    pub fn set_current_time(&mut self, seconds: i64) -> &mut Self {
        self.configure("current time", |options| options.now = Some(seconds))
    }

    /// Leeway applied to `exp`, `nbf` and the lifetime
    pub fn set_clock_skew(&mut self, seconds: u64) -> &mut Self {
        self.configure("clock skew", |options| options.clock_skew = seconds)
    }

    /// Replace every verification option at once
    pub fn with_options(&mut self, options: VerificationOptions) -> &mut Self {
        self.configure("options", |current| *current = options)
    }

    fn configure(
        &mut self,
        setting: &str,
        apply: impl FnOnce(&mut VerificationOptions),
    ) -> &mut Self {
        if self.state == VerificationState::Verified {
            tracing::warn!(setting, "token already verified, ignoring configuration change");
            return self;
        }
        apply(&mut self.options);
        self.state = VerificationState::Configured;
        self
    }

    /// Verify the token against a key or keystore
    ///
    /// Never fails outright: problems are reported in the result. On success a
    /// JWE's decrypted claims also become visible through
    /// [`payload`](Self::payload).
    pub fn verify<'k>(&mut self, key: impl Into<KeySource<'k>>) -> VerificationResult {
        let outcome = self.check(key.into());
        self.state = VerificationState::Verified;

        match outcome {
            Ok(claims) => {
                let expired = validation::is_expired(&claims, &self.options);
                tracing::debug!(alg = self.header.alg(), expired, "token verified");
                if self.kind == TokenKind::Jwe {
                    self.payload = Some(claims.clone());
                }
                VerificationResult::verified(self.header.clone(), claims, expired)
            }
            Err(error) => {
                tracing::debug!(alg = self.header.alg(), kind = %error.kind(), "token rejected");
                VerificationResult::failed(error)
            }
        }
    }

    fn check(&self, source: KeySource<'_>) -> JoseResult<Claims> {
        let alg = self.header.alg().ok_or(JoseError::MissingAlgClaim)?;
        let descriptor = algorithms::resolve(alg)?;
        let fits = match self.kind {
            TokenKind::Jws => descriptor.is_signature(),
            TokenKind::Jwe => descriptor.is_key_management(),
        };
        if !fits {
            return Err(JoseError::unrecognized_algorithm(alg));
        }
        if !self.options.permits(alg) {
            return Err(JoseError::UnwantedAlgorithm(alg.to_string()));
        }
        let content = match self.kind {
            TokenKind::Jws => None,
            TokenKind::Jwe => {
                let enc = self.header.enc().ok_or(JoseError::MissingAlgClaim)?;
                Some(algorithms::resolve_content_encryption(enc)?)
            }
        };

        let key = match keys::resolve_key(descriptor, self.header.kid(), source) {
            Ok(key) => key,
            Err(error) if error.kind() == ErrorKind::KeyNotFound => return Err(error),
            Err(_) => return Err(JoseError::IntegrityCheckFailed),
        };

        match content {
            None => self.check_signature(descriptor, &key),
            Some(content) => self.decrypt(descriptor, content, &key),
        }
    }

    fn check_signature(&self, descriptor: &AlgorithmDescriptor, key: &[u8]) -> JoseResult<Claims> {
        let signing_input = format!("{}.{}", self.segments[0], self.segments[1]);
        if !descriptor.verify(key, signing_input.as_bytes(), &self.decoded[2]) {
            return Err(JoseError::IntegrityCheckFailed);
        }
        self.payload.clone().ok_or(JoseError::IntegrityCheckFailed)
    }

    fn decrypt(
        &self,
        descriptor: &AlgorithmDescriptor,
        content: &AlgorithmDescriptor,
        key: &[u8],
    ) -> JoseResult<Claims> {
        let cek = descriptor
            .unwrap_key(key, &self.decoded[1])
            .ok_or(JoseError::IntegrityCheckFailed)?;
        let plaintext = content
            .open(
                &cek,
                &self.decoded[2],
                self.segments[0].as_bytes(),
                &self.decoded[3],
                &self.decoded[4],
            )
            .map(Zeroizing::new)
            .ok_or(JoseError::IntegrityCheckFailed)?;
        codec::json_object(&plaintext)
    }
}
