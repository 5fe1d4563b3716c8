//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Extract the client address as reported by the proxy chain.
///
/// Precedence:
/// 1. first entry of `X-Forwarded-For`
/// 2. `X-Real-IP`
/// 3. the direct connection address
///
/// Header values are taken verbatim (trimmed); proxies are trusted to send
/// well-formed addresses.
///
/// ## Returns
/// The client address, or `None` if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<String> {
    if let Some(first) = header_str(headers, "x-forwarded-for")
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return Some(first.to_string());
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip")
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return Some(real_ip.to_string());
    }

    direct_ip.map(|ip| ip.to_string())
}

/// Extract the trimmed `User-Agent`, treating a blank header as absent
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .map(str::to_string)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_xff_wins_over_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.11, 10.0.0.3"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("192.0.2.7"));

        let ip = extract_client_ip(&headers, Some("127.0.0.1".parse().unwrap()));
        assert_eq!(ip.as_deref(), Some("198.51.100.11"));
    }

    #[test]
    fn test_real_ip_when_xff_missing_or_blank() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static(" 203.0.113.45 "));
        assert_eq!(
            extract_client_ip(&headers, None).as_deref(),
            Some("203.0.113.45")
        );

        headers.insert("x-forwarded-for", HeaderValue::from_static(" , 10.0.0.1"));
        assert_eq!(
            extract_client_ip(&headers, None).as_deref(),
            Some("203.0.113.45")
        );
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(extract_client_ip(&headers, None), None);
    }

    #[test]
    fn test_extract_user_agent() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_user_agent(&headers), None);

        headers.insert(header::USER_AGENT, HeaderValue::from_static("   "));
        assert_eq!(extract_user_agent(&headers), None);

        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(" Mozilla/5.0 Test Browser "),
        );
        assert_eq!(
            extract_user_agent(&headers).as_deref(),
            Some("Mozilla/5.0 Test Browser")
        );
    }
}
