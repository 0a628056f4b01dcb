//! Webhook signature verification.

use {
    base64::Engine,
    hmac::{Hmac, Mac},
    sha2::Sha256,
    tracing::warn,
};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature on every webhook delivery.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verify a webhook signature from the LINE platform.
///
/// LINE signs the raw request body with HMAC-SHA256 keyed by the channel
/// secret and sends the Base64 digest in `X-Line-Signature`.
pub fn verify(channel_secret: &str, body: &[u8], signature_header: &str) -> bool {
    let claimed = match base64::engine::general_purpose::STANDARD.decode(signature_header.trim()) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!("signature header is not valid base64");
            return false;
        },
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("failed to create HMAC");
            return false;
        },
    };

    mac.update(body);
    // verify_slice compares in constant time.
    mac.verify_slice(&claimed).is_ok()
}
