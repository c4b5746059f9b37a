//! Obfuscated email decoding.
//!
//! The source site hides addresses behind Cloudflare-style email
//! protection: an element carrying a `data-cfemail` attribute whose
//! value is a hex string. The first byte is a one-byte XOR key; each
//! remaining byte XORed with the key yields one character of the
//! plaintext address.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CfEmailError {
    #[error("cfemail payload is empty")]
    Empty,

    #[error("cfemail payload has odd length")]
    OddLength,

    #[error("cfemail payload is not valid hex")]
    InvalidHex,
}

/// Decode a `data-cfemail` hex payload into a plaintext address.
///
/// Well-formed source data never fails here; a malformed payload is a
/// non-fatal extraction failure for the email field of that one card.
pub fn decode_cfemail(payload: &str) -> Result<String, CfEmailError> {
    if payload.is_empty() {
        return Err(CfEmailError::Empty);
    }
    // Reject non-hex (including non-ASCII) up front so byte slicing
    // below stays on char boundaries.
    if !payload.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CfEmailError::InvalidHex);
    }
    if payload.len() % 2 != 0 {
        return Err(CfEmailError::OddLength);
    }

    let mut bytes = Vec::with_capacity(payload.len() / 2);
    for i in (0..payload.len()).step_by(2) {
        let byte = u8::from_str_radix(&payload[i..i + 2], 16)
            .map_err(|_| CfEmailError::InvalidHex)?;
        bytes.push(byte);
    }

    let key = bytes[0];
    Ok(bytes[1..].iter().map(|&b| (b ^ key) as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Apply the site's obfuscation scheme to a plaintext address.
    fn encode_cfemail(plain: &str, key: u8) -> String {
        let mut out = format!("{key:02x}");
        for b in plain.bytes() {
            out.push_str(&format!("{:02x}", b ^ key));
        }
        out
    }

    #[test]
    fn test_known_vector() {
        let payload = encode_cfemail("info@asha.org", 0x5a);
        assert_eq!(payload, "5a33343c351a3b29323b7435283d");
        assert_eq!(decode_cfemail(&payload).unwrap(), "info@asha.org");
    }

    #[test]
    fn test_roundtrip_all_keys() {
        let plain = "contact@example-ngo.org.in";
        for key in 0..=255u8 {
            let payload = encode_cfemail(plain, key);
            assert_eq!(
                decode_cfemail(&payload).unwrap(),
                plain,
                "roundtrip failed for key {key:#04x}"
            );
        }
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(decode_cfemail(""), Err(CfEmailError::Empty));
    }

    #[test]
    fn test_odd_length_payload() {
        assert_eq!(decode_cfemail("5a3"), Err(CfEmailError::OddLength));
    }

    #[test]
    fn test_invalid_hex_payload() {
        assert_eq!(decode_cfemail("5agz"), Err(CfEmailError::InvalidHex));
    }

    #[test]
    fn test_non_ascii_payload_does_not_panic() {
        assert_eq!(decode_cfemail("5aé3"), Err(CfEmailError::InvalidHex));
    }

    #[test]
    fn test_key_only_payload_decodes_empty() {
        assert_eq!(decode_cfemail("5a").unwrap(), "");
    }
}
