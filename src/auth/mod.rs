use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::envelope::ApiError;

/// Caller-supplied upstream access token, forwarded verbatim.
///
/// Only lives for the request it was extracted from.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Pull `Authorization: Bearer <token>` out of the headers.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<BearerToken> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(BearerToken(token.to_string()))
}

/// Reject requests without a usable bearer token before any upstream work.
pub async fn require_bearer_token(mut request: Request, next: Next) -> Response {
    match extract_bearer_token(request.headers()) {
        Some(token) => {
            request.extensions_mut().insert(token);
            next.run(request).await
        }
        None => {
            let uri = request.uri().to_string();
            ApiError::unauthorized(uri).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let token = extract_bearer_token(&headers("Bearer cb1da22a")).unwrap();
        assert_eq!(token.as_str(), "cb1da22a");

        let token = extract_bearer_token(&headers("bearer   abc ")).unwrap();
        assert_eq!(token.as_str(), "abc");
    }

    #[test]
    fn rejects_missing_or_foreign_credentials() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_none());
        assert!(extract_bearer_token(&headers("Basic dXNlcjpwYXNz")).is_none());
        assert!(extract_bearer_token(&headers("Bearer ")).is_none());
        assert!(extract_bearer_token(&headers("abc")).is_none());
    }

    #[test]
    fn debug_output_hides_token() {
        let token = extract_bearer_token(&headers("Bearer secret")).unwrap();
        assert!(!format!("{token:?}").contains("secret"));
    }
}
