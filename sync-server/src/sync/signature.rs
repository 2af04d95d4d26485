//! Webhook signature verification
//!
//! The commerce platform signs every delivery with
//! `base64(HMAC-SHA256(key, notification_url + raw_body))` and sends the
//! result in the `x-webhook-signature` header. Verification must run over
//! the raw request bytes, before any JSON parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook delivery signature. Comparison is constant-time.
pub fn verify_signature(
    key: &str,
    notification_url: &str,
    body: &[u8],
    signature: &str,
) -> Result<(), &'static str> {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| "invalid signature key")?;
    mac.update(notification_url.as_bytes());
    mac.update(body);

    let supplied = STANDARD
        .decode(signature)
        .map_err(|_| "signature is not valid base64")?;

    mac.verify_slice(&supplied).map_err(|_| "signature mismatch")
}

/// Compute the signature the way the sender does (tests, local tooling)
pub fn sign(key: &str, notification_url: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(notification_url.as_bytes());
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}
