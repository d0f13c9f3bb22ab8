//! Stripe webhook signature verification.
//!
//! HMAC-SHA256 over `"{t}.{raw body}"` with the endpoint's signing secret,
//! plus a timestamp window against replays.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

/// Maximum allowed age for webhook events (5 minutes).
pub const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
pub const MAX_CLOCK_SKEW_SECS: i64 = 60;

type HmacSha256 = Hmac<Sha256>;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signatures. Stripe sends several while a secret is being rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=...][,v0=<legacy>]`.
    /// Unknown keys, including `v0`, are skipped.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .trim()
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::ParseError("missing v1 signature".to_string()));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    secret: SecretString,
}

impl StripeWebhookVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies the webhook signature and parses the event.
    ///
    /// Order: header, timestamp window, signature (constant-time), JSON.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, WebhookError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    fn verify_at(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<StripeEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        validate_timestamp(header.timestamp, now)?;

        let expected = compute_signature(self.secret.expose_secret(), header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }
}

/// Builds a `Stripe-Signature` header value for `payload`.
///
/// Used by tests and local tooling that replay events against the endpoint.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    match compute_signature(secret, timestamp, payload) {
        Ok(sig) => format!("t={},v1={}", timestamp, hex::encode(sig)),
        Err(_) => format!("t={}", timestamp),
    }
}

fn validate_timestamp(timestamp: i64, now: i64) -> Result<(), WebhookError> {
    let age = now
        .checked_sub(timestamp)
        .ok_or(WebhookError::TimestampOutOfRange)?;

    if age > MAX_EVENT_AGE_SECS {
        return Err(WebhookError::TimestampOutOfRange);
    }

    if age < -MAX_CLOCK_SKEW_SECS {
        return Err(WebhookError::InvalidTimestamp);
    }

    Ok(())
}

fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";

    fn verifier(secret: &str) -> StripeWebhookVerifier {
        StripeWebhookVerifier::new(SecretString::new(secret.to_string()))
    }

    fn payload() -> &'static str {
        r#"{"id":"evt_test123","type":"checkout.session.completed","created":1704067200,"data":{"object":{}},"livemode":false}"#
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_v1_only() {
        let header = SignatureHeader::parse(&format!("t=1234567890,v1={}", "a".repeat(64))).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures.len(), 1);
        assert_eq!(header.v1_signatures[0].len(), 32);
    }

    #[test]
    fn parse_header_collects_every_v1_and_skips_v0() {
        let header = SignatureHeader::parse(&format!(
            "t=1,v1={},v1={},v0={},scheme=hmac",
            "a".repeat(64),
            "b".repeat(64),
            "c".repeat(64)
        ))
        .unwrap();

        assert_eq!(header.v1_signatures.len(), 2);
    }

    #[test]
    fn parse_header_rejects_malformed_input() {
        for bad in [
            format!("v1={}", "a".repeat(64)),
            "t=1234567890".to_string(),
            format!("t=soon,v1={}", "a".repeat(64)),
            "t=1234567890,v1=not_valid_hex".to_string(),
            "t1234567890".to_string(),
            String::new(),
        ] {
            assert!(
                matches!(SignatureHeader::parse(&bad), Err(WebhookError::ParseError(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let now = chrono::Utc::now().timestamp();
        let header = signature_header(TEST_SECRET, now, payload().as_bytes());

        let event = verifier(TEST_SECRET)
            .verify_and_parse(payload().as_bytes(), &header)
            .unwrap();

        assert_eq!(event.id, "evt_test123");
    }

    #[test]
    fn verify_accepts_any_matching_v1() {
        let now = chrono::Utc::now().timestamp();
        let good = signature_header(TEST_SECRET, now, payload().as_bytes());
        let good_sig = good.split("v1=").nth(1).unwrap();
        let header = format!("t={},v1={},v1={}", now, "0".repeat(64), good_sig);

        assert!(verifier(TEST_SECRET)
            .verify_and_parse(payload().as_bytes(), &header)
            .is_ok());
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let now = chrono::Utc::now().timestamp();
        let header = signature_header(TEST_SECRET, now, payload().as_bytes());

        let result = verifier("whsec_other").verify_and_parse(payload().as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let now = chrono::Utc::now().timestamp();
        let header = signature_header(TEST_SECRET, now, payload().as_bytes());
        let tampered = payload().replace("evt_test123", "evt_hacked");

        let result = verifier(TEST_SECRET).verify_and_parse(tampered.as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_invalid_json_fails_after_signature_check() {
        let now = chrono::Utc::now().timestamp();
        let body = b"not valid json";
        let header = signature_header(TEST_SECRET, now, body);

        let result = verifier(TEST_SECRET).verify_and_parse(body, &header);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Timestamp Validation Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn timestamp_window_boundaries() {
        let now = 1_704_067_200;
        assert!(validate_timestamp(now - 120, now).is_ok());
        assert!(validate_timestamp(now - MAX_EVENT_AGE_SECS, now).is_ok());
        assert!(matches!(
            validate_timestamp(now - MAX_EVENT_AGE_SECS - 1, now),
            Err(WebhookError::TimestampOutOfRange)
        ));
        assert!(validate_timestamp(now + 30, now).is_ok());
        assert!(matches!(
            validate_timestamp(now + 120, now),
            Err(WebhookError::InvalidTimestamp)
        ));
    }

    #[test]
    fn extreme_timestamps_are_out_of_range() {
        let now = 1_704_067_200;
        assert!(matches!(
            validate_timestamp(i64::MIN, now),
            Err(WebhookError::TimestampOutOfRange)
        ));
        assert!(matches!(
            validate_timestamp(i64::MAX, -now),
            Err(WebhookError::TimestampOutOfRange)
        ));
        assert!(validate_timestamp(i64::MAX, now).is_err());
    }

    #[test]
    fn extreme_header_timestamp_is_rejected_without_panicking() {
        let result =
            verifier(TEST_SECRET).verify_and_parse(b"{}", "t=-9223372036854775808,v1=00");

        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn stale_signed_event_is_rejected() {
        let signed_at = 1_704_067_200;
        let header = signature_header(TEST_SECRET, signed_at, payload().as_bytes());

        let result =
            verifier(TEST_SECRET).verify_at(payload().as_bytes(), &header, signed_at + 600);

        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_behaves_like_equality() {
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 4]));
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
        assert!(constant_time_compare(&[], &[]));
    }
}
