/*
 * Responsibility
 * - Authorization ヘッダ値からの bearer token 取り出しと payload デコード
 * - base64url → JSON → Claims
 * - 署名・exp・aud は一切検証しない (この方式の仕様。resolver 側の policy gate のみ)
 */
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::services::auth::claims::Claims;

// "Bearer " (the scheme token plus one space).
const SCHEME_PREFIX_LEN: usize = 7;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token does not have three dot-separated segments")]
    Malformed,
    #[error("payload segment is not valid base64url")]
    PayloadEncoding,
    #[error("payload segment is not valid JSON")]
    PayloadJson,
}

/// Decode the claims out of a raw `Authorization` header value.
///
/// The first 7 characters (the scheme token) are stripped without being
/// inspected, matching the plugin this service replaces.
pub fn decode_bearer(header_value: &str) -> Result<Claims, TokenError> {
    let token = header_value
        .get(SCHEME_PREFIX_LEN..)
        .ok_or(TokenError::Malformed)?
        .trim();

    decode_compact(token)
}

/// Decode the payload of a compact-serialized token (`header.payload.signature`).
///
/// The header and signature segments are split out but never decoded or
/// checked; the payload is trusted as-is. Segments past the third are
/// ignored rather than rejected.
pub fn decode_compact(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() < 3 {
        return Err(TokenError::Malformed);
    }

    let payload = decode_base64url(segments[1]).map_err(|_| TokenError::PayloadEncoding)?;

    serde_json::from_slice(&payload).map_err(|_| TokenError::PayloadJson)
}

// base64url to standard base64: swap the url-safe alphabet back and restore
// `=` padding before handing it to the standard decoder.
fn decode_base64url(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut normalized = segment.replace('-', "+").replace('_', "/");
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    STANDARD.decode(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;

    fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("{header}.{body}.sig-not-checked")
    }

    #[test]
    fn decodes_payload_without_touching_signature() {
        let token = token_with_payload(&json!({
            "iss": "https://idp.example",
            "preferred_username": "alice",
            "email": "alice@example.com",
        }));

        let claims = decode_bearer(&format!("Bearer {token}")).unwrap();
        assert_eq!(claims.preferred_username.as_deref(), Some("alice"));
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn decode_is_lossless_for_well_formed_payloads() {
        let payload = json!({
            "iss": "X",
            "sub": "Y",
            "nonce": "Z",
            "email": "a@example.com",
            "custom_claim": "value",
        });
        let expected: Claims = serde_json::from_value(payload.clone()).unwrap();

        let claims = decode_compact(&token_with_payload(&payload)).unwrap();
        assert_eq!(claims, expected);
    }

    #[test]
    fn two_segments_is_malformed_not_a_panic() {
        let err = decode_compact("only.two").unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[test]
    fn header_shorter_than_scheme_is_malformed() {
        let err = decode_bearer("Bear").unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[test]
    fn extra_segments_are_tolerated() {
        let token = token_with_payload(&json!({ "sub": "s" }));
        let claims = decode_compact(&format!("{token}.extra")).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("s"));
    }

    #[test]
    fn garbage_payload_encoding_is_rejected() {
        let err = decode_compact("aGVhZGVy.!!!not-base64!!!.c2ln").unwrap_err();
        assert!(matches!(err, TokenError::PayloadEncoding));
    }

    #[test]
    fn non_json_payload_is_rejected() {
        let body = URL_SAFE_NO_PAD.encode(b"plain text, not json");
        let err = decode_compact(&format!("aGVhZGVy.{body}.c2ln")).unwrap_err();
        assert!(matches!(err, TokenError::PayloadJson));
    }

    #[test]
    fn unpadded_base64url_payload_decodes() {
        // "{"a":"b"}" encodes to a length that needs two padding chars.
        let body = URL_SAFE_NO_PAD.encode(br#"{"sub":"abc"}"#);
        assert_ne!(body.len() % 4, 0);

        let claims = decode_compact(&format!("h.{body}.s")).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("abc"));
    }
}
