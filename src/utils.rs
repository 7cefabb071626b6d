use axum::http::HeaderMap;

pub const FALLBACK_IP: &str = "127.0.0.1";

const FORWARDED_FOR: &str = "x-forwarded-for";

/// First hop of `X-Forwarded-For`, or loopback when the header is missing or
/// unreadable.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_IP.to_string())
}
