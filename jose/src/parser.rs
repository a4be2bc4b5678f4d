//! Structural token parsing
//!
//! [`parse`] only checks that a token is well formed. Signatures, tags and
//! claims are left to [`ParsedToken::verify`].

use crate::codec::{self, JWE_SEGMENTS, JWS_SEGMENTS};
use crate::error::{JoseError, JoseResult};
use crate::types::{Claims, Header, TokenKind};
use crate::validation::VerificationOptions;
use std::str::FromStr;

/// Lifecycle of a [`ParsedToken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationState {
    /// Decoded, nothing configured yet
    Parsed,
    /// At least one verification option has been set
    Configured,
    /// `verify` has run; options are frozen
    Verified,
}

/// A structurally valid token awaiting verification
#[derive(Debug, Clone)]
pub struct ParsedToken {
    pub(crate) kind: TokenKind,
    pub(crate) segments: Vec<String>,
    pub(crate) decoded: Vec<Vec<u8>>,
    pub(crate) header: Header,
    pub(crate) payload: Option<Claims>,
    pub(crate) options: VerificationOptions,
    pub(crate) state: VerificationState,
}

/// Parse a compact JWS or JWE
///
/// # Errors
/// `MalformedToken` on a wrong segment count, an empty or undecodable
/// segment, a header or JWS payload that is not a JSON object, an `enc` member
/// on a three-segment token, or a five-segment token without a string `enc`.
pub fn parse(token: &str) -> JoseResult<ParsedToken> {
    let segments = codec::split(token)?;
    let decoded = segments
        .iter()
        .map(|segment| codec::decode(segment))
        .collect::<JoseResult<Vec<_>>>()?;
    let header = Header::from(codec::json_object(&decoded[0])?);

    let (kind, payload) = match segments.len() {
        JWS_SEGMENTS => {
            if header.contains("enc") {
                return Err(JoseError::malformed("signed token carries an enc header"));
            }
            (TokenKind::Jws, Some(codec::json_object(&decoded[1])?))
        }
        JWE_SEGMENTS => {
            if header.enc().is_none() {
                return Err(JoseError::malformed("encrypted token lacks a string enc header"));
            }
            (TokenKind::Jwe, None)
        }
        n => return Err(JoseError::malformed(format!("unexpected segment count {n}"))),
    };

    Ok(ParsedToken {
        kind,
        segments: segments.into_iter().map(str::to_owned).collect(),
        decoded,
        header,
        payload,
        options: VerificationOptions::default(),
        state: VerificationState::Parsed,
    })
}

impl ParsedToken {
    /// Compact serialization family
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Decoded header, readable before verification
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Claims
    ///
    /// For a JWS these are the unverified claims. For a JWE this is `None`
    /// until a successful [`verify`](Self::verify).
    #[must_use]
    pub fn payload(&self) -> Option<&Claims> {
        self.payload.as_ref()
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> VerificationState {
        self.state
    }

    /// Options the next verification will apply
    #[must_use]
    pub fn options(&self) -> &VerificationOptions {
        &self.options
    }

    /// The compact serialization as received
    #[must_use]
    pub fn to_compact(&self) -> String {
        codec::join(&self.segments)
    }
}

impl FromStr for ParsedToken {
    type Err = JoseError;

    fn from_str(token: &str) -> JoseResult<Self> {
        parse(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn segment(json: &str) -> String {
        codec::encode(json)
    }

    #[test]
    fn jws_exposes_header_and_payload() {
        let token = format!(
            "{}.{}.{}",
            segment(r#"{"alg":"HS256","typ":"JWT"}"#),
            segment(r#"{"sub":"x"}"#),
            codec::encode([1u8, 2, 3])
        );
        let parsed = parse(&token).unwrap();
        assert_eq!(parsed.kind(), TokenKind::Jws);
        assert_eq!(parsed.header().alg(), Some("HS256"));
        assert_eq!(parsed.payload().unwrap()["sub"], "x");
        assert_eq!(parsed.state(), VerificationState::Parsed);
        assert_eq!(parsed.to_compact(), token);
    }

    #[test]
    fn jwe_hides_payload() {
        let token = format!(
            "{}.AAAA.AAAA.AAAA.AAAA",
            segment(r#"{"alg":"A256KW","enc":"A256GCM"}"#)
        );
        let parsed: ParsedToken = token.parse().unwrap();
        assert_eq!(parsed.kind(), TokenKind::Jwe);
        assert!(parsed.payload().is_none());
    }

    #[test]
    fn parse_does_not_check_algorithms() {
        let token = format!("{}.{}.AAAA", segment(r#"{"alg":"dummy"}"#), segment("{}"));
        assert!(parse(&token).is_ok());
        let token = format!("{}.{}.AAAA", segment(r#"{"typ":"JWT"}"#), segment("{}"));
        assert!(parse(&token).is_ok());
    }

    #[test]
    fn structural_problems_are_malformed() {
        let header = segment(r#"{"alg":"HS256"}"#);
        let jwe_header = segment(r#"{"alg":"A128KW","enc":"A128GCM"}"#);
        let cases = [
            format!("{header}.{}", segment("{}")),
            format!("{header}.{}.AAAA.AAAA", segment("{}")),
            format!("{header}.{}.", segment("{}")),
            format!("{header}.{}.AA==", segment("{}")),
            format!("{header}.{}.AAAA", segment("[1]")),
            format!("{}.{}.AAAA", segment("not json"), segment("{}")),
            format!("{jwe_header}.{}.AAAA", segment("{}")),
            format!("{header}.AAAA.AAAA.AAAA.AAAA"),
            format!("{}.AAAA.AAAA.AAAA.AAAA", segment(r#"{"alg":"A128KW","enc":7}"#)),
        ];
        for token in cases {
            assert_eq!(parse(&token).unwrap_err().kind(), ErrorKind::MalformedToken, "{token}");
        }
    }
}
