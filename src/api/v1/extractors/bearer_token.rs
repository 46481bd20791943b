/*
 * Responsibility
 * - Authorization ヘッダ値の取り出し (gateway が付け替える変種ヘッダも見る)
 * - 値の解釈 (prefix 除去・decode) は services/auth/token 側
 */
use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderName, header, request::Parts},
};

// Some gateways consume `Authorization` for their own auth and forward the
// original value under this name.
const FORWARDED_AUTHORIZATION: HeaderName = HeaderName::from_static("x-forwarded-authorization");

/// Raw `Authorization` header value, if any. Never rejects: an absent header
/// is a normal login-page visit, not an error.
#[derive(Debug, Clone)]
pub struct BearerHeader(pub Option<String>);

impl<S> FromRequestParts<S> for BearerHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(authorization_value(&parts.headers)))
    }
}

pub fn authorization_value(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .or_else(|| headers.get(&FORWARDED_AUTHORIZATION))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn standard_header_wins_over_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer a"));
        headers.insert(
            FORWARDED_AUTHORIZATION,
            HeaderValue::from_static("Bearer b"),
        );

        assert_eq!(authorization_value(&headers).as_deref(), Some("Bearer a"));
    }

    #[test]
    fn forwarded_header_is_a_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_AUTHORIZATION,
            HeaderValue::from_static("Bearer b"),
        );

        assert_eq!(authorization_value(&headers).as_deref(), Some("Bearer b"));
    }

    #[test]
    fn absent_header_is_none() {
        assert_eq!(authorization_value(&HeaderMap::new()), None);
    }
}
