//! Splitting URL strings into components and joining them back
//!
//! ```text
//! [scheme ":"] ["//" [username [":" password] "@"] hostname [":" port]] path ["?" query] ["#" fragment]
//! ```
//!
//! The parser is lenient: it never fails, and anything it cannot place ends
//! up in the path.

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::host;

/// Components of a URL.
///
/// `username` and `password` are kept decoded, `path` and `query` encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parts {
    pub scheme: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<String>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
    /// Opaque value without authority (`mailto:`, `urn:`)
    pub urn: bool,
}

impl Parts {
    pub(crate) fn clear_authority(&mut self) {
        self.scheme = None;
        self.username = None;
        self.password = None;
        self.hostname = None;
        self.port = None;
    }
}

pub fn parse(input: &str, codec: &Codec) -> Parts {
    let mut parts = Parts::default();
    let mut rest = input;

    if let Some((before, fragment)) = rest.split_once('#') {
        parts.fragment = non_empty(fragment);
        rest = before;
    }

    if let Some((before, query)) = rest.split_once('?') {
        parts.query = non_empty(query);
        rest = before;
    }

    let path = if let Some(authority) = rest.strip_prefix("//") {
        // scheme-relative
        parse_authority(authority, &mut parts, codec)
    } else if let Some((scheme, after)) = split_scheme(rest) {
        parts.scheme = Some(scheme.to_string());
        match after.strip_prefix("//") {
            Some(authority) => parse_authority(authority, &mut parts, codec),
            None => {
                parts.urn = true;
                after.to_string()
            }
        }
    } else {
        rest.to_string()
    };
    parts.path = path;

    tracing::trace!(input, ?parts, "Parsed URL");
    parts
}

/// `scheme ":" rest` when the text before the first colon is a valid scheme
fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = input.split_once(':')?;
    is_valid_scheme(scheme).then_some((scheme, rest))
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub(crate) fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Consume `userinfo@host:port`, returning the remaining path
pub(crate) fn parse_authority(input: &str, parts: &mut Parts, codec: &Codec) -> String {
    let rest = parse_userinfo(input, parts, codec);
    parse_host(rest, parts)
}

/// Consume `username:password@` if it precedes the first `/`
pub(crate) fn parse_userinfo<'a>(input: &'a str, parts: &mut Parts, codec: &Codec) -> &'a str {
    let at = input.find('@');
    let slash = input.find('/');

    match at {
        Some(at) if slash.map_or(true, |slash| at < slash) => {
            let (username, password) = match input[..at].split_once(':') {
                Some((user, pass)) => (user, Some(pass)),
                None => (&input[..at], None),
            };
            parts.username = non_empty(username).map(|u| codec.decode(&u));
            parts.password = password.and_then(non_empty).map(|p| codec.decode(&p));
            &input[at + 1..]
        }
        _ => {
            parts.username = None;
            parts.password = None;
            input
        }
    }
}

/// Consume `hostname[:port]` (IPv6 in brackets), returning the remaining path
pub(crate) fn parse_host(input: &str, parts: &mut Parts) -> String {
    let end = input.find('/').unwrap_or(input.len());
    let authority = &input[..end];

    if let Some(bracketed) = authority.strip_prefix('[') {
        match bracketed.split_once(']') {
            Some((hostname, after)) => {
                parts.hostname = non_empty(hostname);
                parts.port = after.strip_prefix(':').and_then(non_empty);
            }
            None => {
                parts.hostname = non_empty(bracketed);
                parts.port = None;
            }
        }
    } else if authority.matches(':').count() > 1 {
        // bare IPv6 without port, not allowed by RFC 3986 but accepted
        parts.hostname = non_empty(authority);
        parts.port = None;
    } else {
        let (hostname, port) = match authority.split_once(':') {
            Some((hostname, port)) => (hostname, Some(port)),
            None => (authority, None),
        };
        parts.hostname = non_empty(hostname);
        parts.port = port.and_then(non_empty);
    }

    let path = &input[end..];
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

pub fn build(parts: &Parts, codec: &Codec) -> String {
    let mut out = String::new();

    if let Some(scheme) = parts.scheme.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(scheme);
        out.push(':');
    }

    if !parts.urn && (!out.is_empty() || parts.hostname.is_some()) {
        out.push_str("//");
    }

    out.push_str(&build_authority(parts, codec));

    if parts.hostname.is_some() && !parts.path.starts_with('/') {
        out.push('/');
    }
    out.push_str(&parts.path);

    if let Some(query) = &parts.query {
        out.push('?');
        out.push_str(query);
    }

    if let Some(fragment) = &parts.fragment {
        out.push('#');
        out.push_str(fragment);
    }

    tracing::trace!(url = %out, "Built URL");
    out
}

pub(crate) fn build_authority(parts: &Parts, codec: &Codec) -> String {
    let mut out = build_userinfo(parts, codec);
    out.push_str(&build_host(parts));
    out
}

/// `username[:password]@`, or nothing without a username
pub(crate) fn build_userinfo(parts: &Parts, codec: &Codec) -> String {
    let Some(username) = &parts.username else {
        return String::new();
    };

    let mut out = codec.encode(username);
    if let Some(password) = &parts.password {
        out.push(':');
        out.push_str(&codec.encode(password));
    }
    out.push('@');
    out
}

/// `hostname[:port]`; the port is left out when it is the scheme's default
pub(crate) fn build_host(parts: &Parts) -> String {
    let Some(hostname) = &parts.hostname else {
        return String::new();
    };

    let mut out = if host::is_ipv6(hostname) {
        format!("[{}]", hostname)
    } else {
        hostname.clone()
    };

    let default = parts.scheme.as_deref().and_then(host::default_port);
    if let Some(port) = parts.port.as_deref().filter(|p| Some(*p) != default) {
        out.push(':');
        out.push_str(port);
    }

    out
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
