//! Small helpers for token and client-address extraction.

use axum::extract::ConnectInfo;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use std::net::SocketAddr;

/// Pull a bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve the client IP: proxy headers first, then the socket peer address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if real_ip.is_some() {
        return real_ip.map(str::to_string);
    }
    peer.map(|addr| addr.ip().to_string())
}

/// Same resolution for extractors that only hold request parts.
pub(crate) fn client_ip_from_parts(parts: &Parts) -> Option<String> {
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    client_ip(&parts.headers, peer)
}

/// Lockout records need a key even when no address could be resolved.
pub fn lockout_key(ip: Option<&str>) -> String {
    ip.unwrap_or("unknown").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_strips_prefix_and_whitespace() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123 "));
        assert_eq!(bearer_token(&headers), Some("abc123".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_empties() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        let peer = "127.0.0.1:9000".parse().ok();
        assert_eq!(client_ip(&headers, peer), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn client_ip_falls_back_to_real_ip_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(client_ip(&headers, None), Some("9.9.9.9".to_string()));

        let headers = HeaderMap::new();
        let peer = "10.0.0.5:1234".parse().ok();
        assert_eq!(client_ip(&headers, peer), Some("10.0.0.5".to_string()));
        assert_eq!(client_ip(&headers, None), None);
    }

    #[test]
    fn lockout_key_defaults_unresolved_clients() {
        assert_eq!(lockout_key(Some("1.2.3.4")), "1.2.3.4");
        assert_eq!(lockout_key(None), "unknown");
    }
}
