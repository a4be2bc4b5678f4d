//! Verification options and time-based claim evaluation.

use crate::types::Claims;
use chrono::Utc;
use serde_json::Value;

/// Verification options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationOptions {
    /// Accepted `alg` values. Empty accepts every registered algorithm.
    pub allowed_algorithms: Vec<String>,
    /// Maximum age in seconds, measured from `iat`.
    pub lifetime: Option<u64>,
    /// Leeway in seconds applied to `exp`, `nbf` and the lifetime.
    pub clock_skew: u64,
    /// Evaluation time in seconds since the epoch. `None` reads the system clock.
    pub now: Option<i64>,
}

impl VerificationOptions {
    /// Restrict accepted algorithms.
    #[must_use]
    pub fn allowed_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_algorithms = algorithms.into_iter().map(Into::into).collect();
        self
    }

    /// Set the maximum token age.
    #[must_use]
    pub fn with_lifetime(mut self, seconds: u64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    /// Set the clock leeway.
    #[must_use]
    pub fn with_clock_skew(mut self, seconds: u64) -> Self {
        self.clock_skew = seconds;
        self
    }

    /// Evaluate time claims at a fixed instant.
    #[must_use]
    pub fn at_time(mut self, seconds: i64) -> Self {
        self.now = Some(seconds);
        self
    }

    /// Whether `alg` passes the allow-list.
    #[must_use]
    pub fn permits(&self, alg: &str) -> bool {
        self.allowed_algorithms.is_empty() || self.allowed_algorithms.iter().any(|a| a == alg)
    }

    pub(crate) fn current_time(&self) -> i64 {
        self.now.unwrap_or_else(|| Utc::now().timestamp())
    }
}

fn seconds(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f.floor() as i64))
}

/// Whether the claims are outside their validity window.
///
/// `exp` expires at `now >= exp`, `nbf` holds until `now >= nbf`, and a
/// configured lifetime expires once `now - iat > lifetime`. A present but
/// non-numeric time claim, or a lifetime without `iat`, counts as expired.
pub(crate) fn is_expired(claims: &Claims, options: &VerificationOptions) -> bool {
    let now = options.current_time();
    let skew = i64::try_from(options.clock_skew).unwrap_or(i64::MAX);

    let past_expiry = claims
        .get("exp")
        .is_some_and(|exp| seconds(exp).map_or(true, |exp| now >= exp.saturating_add(skew)));

    let before_not_before = claims
        .get("nbf")
        .is_some_and(|nbf| seconds(nbf).map_or(true, |nbf| now < nbf.saturating_sub(skew)));

    let past_lifetime = options.lifetime.is_some_and(|lifetime| {
        let lifetime = i64::try_from(lifetime).unwrap_or(i64::MAX);
        claims.get("iat").and_then(seconds).map_or(true, |iat| {
            now.saturating_sub(iat) > lifetime.saturating_add(skew)
        })
    });

    past_expiry || before_not_before || past_lifetime
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn no_time_claims_never_expire() {
        let options = VerificationOptions::default().at_time(1_000);
        assert!(!is_expired(&claims(json!({"sub": "x"})), &options));
    }

    #[test]
    fn exp_boundary() {
        let c = claims(json!({"exp": 1_000}));
        assert!(!is_expired(&c, &VerificationOptions::default().at_time(999)));
        assert!(is_expired(&c, &VerificationOptions::default().at_time(1_000)));
        assert!(!is_expired(&c, &VerificationOptions::default().at_time(1_000).with_clock_skew(5)));
    }

    #[test]
    fn nbf_boundary() {
        let c = claims(json!({"nbf": 1_000}));
        assert!(is_expired(&c, &VerificationOptions::default().at_time(999)));
        assert!(!is_expired(&c, &VerificationOptions::default().at_time(1_000)));
    }

    #[test]
    fn lifetime_measured_from_iat() {
        let c = claims(json!({"iat": 1_000}));
        let options = VerificationOptions::default().with_lifetime(3);
        assert!(!is_expired(&c, &options.clone().at_time(1_003)));
        assert!(is_expired(&c, &options.at_time(1_004)));
    }

    #[test]
    fn stricter_of_exp_and_lifetime_governs() {
        let c = claims(json!({"iat": 1_000, "exp": 2_000}));
        let options = VerificationOptions::default().with_lifetime(600).at_time(1_700);
        assert!(is_expired(&c, &options));

        let c = claims(json!({"iat": 1_000, "exp": 1_100}));
        let options = VerificationOptions::default().with_lifetime(600).at_time(1_200);
        assert!(is_expired(&c, &options));
    }

    #[test]
    fn lifetime_without_iat_is_expired() {
        let options = VerificationOptions::default().with_lifetime(600).at_time(0);
        assert!(is_expired(&claims(json!({"sub": "x"})), &options));
    }

    #[test]
    fn non_numeric_time_claims_are_expired() {
        let options = VerificationOptions::default().at_time(0);
        assert!(is_expired(&claims(json!({"exp": "tomorrow"})), &options));
        assert!(is_expired(&claims(json!({"nbf": null})), &options));
    }

    #[test]
    fn allow_list() {
        let options = VerificationOptions::default();
        assert!(options.permits("HS256"));
        let options = options.allowed_algorithms(["HS384", "HS512"]);
        assert!(!options.permits("HS256"));
        assert!(options.permits("HS512"));
    }
}
