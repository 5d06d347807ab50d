//! Hostname classification and canonical forms

use std::net::Ipv6Addr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::UriError;
use crate::Result;

// 333.444.555.666 matches as well; only the shape is checked
#[allow(clippy::expect_used)]
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").expect("IPv4 regex is valid")
});

/// Registered default port of a scheme
pub fn default_port(scheme: &str) -> Option<&'static str> {
    match scheme.to_ascii_lowercase().as_str() {
        "http" => Some("80"),
        "https" => Some("443"),
        "ftp" => Some("21"),
        _ => None,
    }
}

/// Only `[A-Za-z0-9.-]` survive in plain (non-IDN) hostnames
pub fn has_invalid_hostname_chars(host: &str) -> bool {
    host.chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'))
}

pub fn is_ipv4(host: &str) -> bool {
    IPV4_PATTERN.is_match(host)
}

/// IPv6 literal without brackets, optionally carrying a `%zone` suffix
pub fn is_ipv6(host: &str) -> bool {
    split_zone(host.trim()).0.parse::<Ipv6Addr>().is_ok()
}

pub fn is_ip(host: &str) -> bool {
    is_ipv4(host) || is_ipv6(host)
}

/// Registered name containing characters outside `[A-Za-z0-9.-]`
pub fn is_idn(host: &str) -> bool {
    !is_ip(host) && has_invalid_hostname_chars(host)
}

pub fn is_punycode(host: &str) -> bool {
    !is_ip(host) && host.to_ascii_lowercase().contains("xn--")
}

/// Accept `[A-Za-z0-9.-]` names and anything IDNA can turn into one
pub fn ensure_valid_hostname(host: &str) -> Result<()> {
    if !has_invalid_hostname_chars(host) {
        return Ok(());
    }

    match idna::domain_to_ascii(host) {
        Ok(ascii) if !has_invalid_hostname_chars(&ascii) => Ok(()),
        _ => Err(UriError::InvalidHostname(host.to_string())),
    }
}

/// ASCII-compatible (punycode) form of an internationalized name
pub fn to_ascii(host: &str) -> Option<String> {
    idna::domain_to_ascii(host).ok()
}

/// Unicode form of a punycode name; labels that fail to decode stay as-is
pub fn to_unicode(host: &str) -> String {
    let (unicode, result) = idna::domain_to_unicode(host);
    if result.is_err() {
        tracing::warn!(host, "Hostname is not valid punycode");
        return host.to_string();
    }
    unicode
}

/// Shortest textual form of an IPv6 address (RFC 5952)
pub fn compress_ipv6(host: &str) -> String {
    let (addr, zone) = split_zone(host.trim());
    match addr.parse::<Ipv6Addr>() {
        Ok(parsed) => match zone {
            Some(zone) => format!("{}%{}", parsed, zone),
            None => parsed.to_string(),
        },
        Err(_) => host.to_string(),
    }
}

fn split_zone(host: &str) -> (&str, Option<&str>) {
    match host.split_once('%') {
        Some((addr, zone)) if !zone.is_empty() => (addr, Some(zone)),
        _ => (host, None),
    }
}
