//! VAPID application server key decoding.
//!
//! Keys are distributed base64url-encoded without padding. Push services
//! compare the decoded bytes, so the transform has to match the browser-side
//! `atob` conversion exactly: pad to a multiple of four with `=`, map `-`/`_`
//! to `+`/`/`, then decode with the standard alphabet.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::services::errors::VapidKeyError;

/// Standard alphabet, tolerant of non-zero trailing bits like `atob`.
const ATOB: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode a base64url VAPID key into the raw `applicationServerKey` bytes.
pub fn url_base64_to_bytes(key: &str) -> Result<Vec<u8>, VapidKeyError> {
    let padding = (4 - key.len() % 4) % 4;
    let mut padded = String::with_capacity(key.len() + padding);
    padded.push_str(key);
    padded.extend(std::iter::repeat('=').take(padding));

    let standard = padded.replace('-', "+").replace('_', "/");

    ATOB.decode(standard.as_bytes())
        .map_err(|e| VapidKeyError::Decode(e.to_string()))
}

/// Encode raw key bytes in the unpadded base64url form keys are published in.
pub fn bytes_to_url_base64(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
