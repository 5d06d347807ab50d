//! Mutable URL value
//!
//! A [`Uri`] holds its [`Parts`] plus the [`Codec`] used to encode them. Every
//! setter re-encodes its input and marks the serialized form dirty; the string
//! is rebuilt once, on the next [`Uri::as_str`] or `Display`, so a chain of
//! mutations only pays for one rebuild.

use std::cell::OnceCell;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{Charset, Codec};
use crate::error::UriError;
use crate::host;
use crate::parts::{self, Parts};
use crate::path;
use crate::query::{QueryMap, QueryValue};
use crate::Result;

#[derive(Debug, Clone)]
pub struct Uri {
    pub(crate) parts: Parts,
    pub(crate) codec: Codec,
    /// Serialized form, empty while dirty
    serialized: OnceCell<String>,
}

impl Uri {
    pub fn parse(input: &str) -> Self {
        Self::parse_with(input, Codec::default())
    }

    pub fn parse_with(input: &str, codec: Codec) -> Self {
        Self {
            parts: parts::parse(input, &codec),
            codec,
            serialized: OnceCell::new(),
        }
    }

    /// Parse `input` and resolve it against `base`
    pub fn with_base(input: &str, base: &Uri) -> Result<Self> {
        Self::parse_with(input, base.codec).absolute_to(base)
    }

    /// Build from components; a hostname or a path is required
    pub fn from_parts(parts: Parts) -> Result<Self> {
        if parts.hostname.is_none() && parts.path.is_empty() {
            return Err(UriError::InvalidInput(
                "components need a hostname or a path".to_string(),
            ));
        }

        Ok(Self {
            parts,
            codec: Codec::default(),
            serialized: OnceCell::new(),
        })
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self.touch();
        self
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    pub fn into_parts(self) -> Parts {
        self.parts
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn set_codec(&mut self, codec: Codec) -> &mut Self {
        self.codec = codec;
        self.touch()
    }

    /// Serialized form, rebuilt if a mutation happened since the last call
    pub fn as_str(&self) -> &str {
        self.serialized
            .get_or_init(|| parts::build(&self.parts, &self.codec))
    }

    /// True when the cached string is stale
    pub fn is_dirty(&self) -> bool {
        self.serialized.get().is_none()
    }

    pub fn href(&self) -> String {
        self.as_str().to_string()
    }

    /// Replace the whole value by a freshly parsed string
    pub fn set_href(&mut self, input: &str) -> &mut Self {
        self.parts = parts::parse(input, &self.codec);
        self.touch()
    }

    pub(crate) fn touch(&mut self) -> &mut Self {
        self.serialized = OnceCell::new();
        self
    }

    pub(crate) fn ensure_hierarchical(&self, operation: &'static str) -> Result<()> {
        if self.parts.urn {
            return Err(UriError::Urn(operation));
        }
        Ok(())
    }

    // Simple components

    pub fn scheme(&self) -> &str {
        self.parts.scheme.as_deref().unwrap_or("")
    }

    pub fn protocol(&self) -> &str {
        self.scheme()
    }

    /// Accepts a trailing `:` or `://`
    pub fn set_scheme(&mut self, scheme: &str) -> Result<&mut Self> {
        let scheme = scheme
            .strip_suffix("://")
            .or_else(|| scheme.strip_suffix(':'))
            .unwrap_or(scheme);

        if !scheme.is_empty() && !parts::is_valid_scheme(scheme) {
            return Err(UriError::InvalidScheme(scheme.to_string()));
        }

        self.parts.scheme = non_empty(scheme);
        Ok(self.touch())
    }

    pub fn username(&self) -> &str {
        self.parts.username.as_deref().unwrap_or("")
    }

    pub fn set_username(&mut self, username: &str) -> &mut Self {
        self.parts.username = non_empty(username);
        self.touch()
    }

    pub fn password(&self) -> &str {
        self.parts.password.as_deref().unwrap_or("")
    }

    pub fn set_password(&mut self, password: &str) -> &mut Self {
        self.parts.password = non_empty(password);
        self.touch()
    }

    pub fn hostname(&self) -> &str {
        self.parts.hostname.as_deref().unwrap_or("")
    }

    /// Set the hostname; a port or path in the input is ignored
    pub fn set_hostname(&mut self, hostname: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("hostname")?;

        let mut scratch = Parts::default();
        parts::parse_host(hostname, &mut scratch);
        validate_hostname(scratch.hostname.as_deref())?;

        self.parts.hostname = scratch.hostname;
        Ok(self.touch())
    }

    pub fn port(&self) -> &str {
        self.parts.port.as_deref().unwrap_or("")
    }

    /// Accepts a leading `:`; an empty value removes the port
    pub fn set_port(&mut self, port: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("port")?;

        let port = port.strip_prefix(':').unwrap_or(port);
        if !port.chars().all(|c| c.is_ascii_digit()) {
            return Err(UriError::InvalidPort(port.to_string()));
        }

        self.parts.port = non_empty(port);
        Ok(self.touch())
    }

    pub fn path(&self) -> &str {
        match (self.parts.path.is_empty(), self.parts.urn) {
            (false, _) => &self.parts.path,
            (true, true) => "",
            (true, false) => "/",
        }
    }

    pub fn path_decoded(&self) -> String {
        self.codec.decode_path(self.path())
    }

    pub fn set_path(&mut self, path: &str) -> &mut Self {
        self.parts.path = if !path.is_empty() {
            self.codec.recode_path(path)
        } else if self.parts.urn {
            String::new()
        } else {
            "/".to_string()
        };
        self.touch()
    }

    pub fn query(&self) -> &str {
        self.parts.query.as_deref().unwrap_or("")
    }

    /// Query with its leading `?`, or empty
    pub fn search(&self) -> String {
        prefixed('?', self.query())
    }

    /// Set the raw query; a leading `?` is dropped and empty input removes it
    pub fn set_query(&mut self, query: &str) -> &mut Self {
        self.parts.query = non_empty(query.strip_prefix('?').unwrap_or(query));
        self.touch()
    }

    pub fn fragment(&self) -> &str {
        self.parts.fragment.as_deref().unwrap_or("")
    }

    /// Fragment with its leading `#`, or empty
    pub fn hash(&self) -> String {
        prefixed('#', self.fragment())
    }

    pub fn set_fragment(&mut self, fragment: &str) -> &mut Self {
        self.parts.fragment = non_empty(fragment.strip_prefix('#').unwrap_or(fragment));
        self.touch()
    }

    // Compound components

    /// `hostname[:port]`, IPv6 in brackets
    pub fn host(&self) -> String {
        parts::build_host(&self.parts)
    }

    pub fn set_host(&mut self, host: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("host")?;

        let mut scratch = Parts::default();
        parts::parse_host(host, &mut scratch);
        validate_hostname(scratch.hostname.as_deref())?;
        validate_port(scratch.port.as_deref())?;

        self.parts.hostname = scratch.hostname;
        self.parts.port = scratch.port;
        Ok(self.touch())
    }

    /// `userinfo@hostname:port`, empty without a hostname
    pub fn authority(&self) -> String {
        if self.parts.hostname.is_none() {
            return String::new();
        }
        parts::build_authority(&self.parts, &self.codec)
    }

    pub fn set_authority(&mut self, authority: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("authority")?;

        let mut scratch = Parts::default();
        parts::parse_authority(authority, &mut scratch, &self.codec);
        validate_hostname(scratch.hostname.as_deref())?;
        validate_port(scratch.port.as_deref())?;

        self.parts.username = scratch.username;
        self.parts.password = scratch.password;
        self.parts.hostname = scratch.hostname;
        self.parts.port = scratch.port;
        Ok(self.touch())
    }

    /// `username[:password]`, encoded
    pub fn userinfo(&self) -> String {
        let mut userinfo = parts::build_userinfo(&self.parts, &self.codec);
        userinfo.pop();
        userinfo
    }

    pub fn set_userinfo(&mut self, userinfo: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("userinfo")?;

        let userinfo = if userinfo.ends_with('@') {
            userinfo.to_string()
        } else {
            format!("{}@", userinfo)
        };
        parts::parse_userinfo(&userinfo, &mut self.parts, &self.codec);
        Ok(self.touch())
    }

    // Hostname fractions

    fn domain_host(&self) -> Option<&str> {
        self.parts
            .hostname
            .as_deref()
            .filter(|hostname| !host::is_ip(hostname))
    }

    /// `www` of `www.example.org`
    pub fn subdomain(&self) -> String {
        let Some(hostname) = self.domain_host() else {
            return String::new();
        };
        let end = (hostname.len() - self.domain().len()).saturating_sub(1);
        hostname[..end].to_string()
    }

    pub fn set_subdomain(&mut self, subdomain: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("subdomain")?;
        let Some(hostname) = self.domain_host() else {
            return Err(UriError::NonDomainHost);
        };

        let mut subdomain = subdomain.to_string();
        if !subdomain.is_empty() {
            if !subdomain.ends_with('.') {
                subdomain.push('.');
            }
            host::ensure_valid_hostname(&subdomain)?;
        }

        let keep = hostname.len() - self.domain().len();
        let hostname = format!("{}{}", subdomain, &hostname[keep..]);
        self.parts.hostname = Some(hostname);
        Ok(self.touch())
    }

    /// `example.org` of `www.example.org`
    pub fn domain(&self) -> String {
        let Some(hostname) = self.domain_host() else {
            return String::new();
        };

        if hostname.matches('.').count() < 2 {
            return hostname.to_string();
        }

        let end = hostname.len() - self.tld().len() - 1;
        let start = hostname[..end].rfind('.').map_or(0, |pos| pos + 1);
        hostname[start..].to_string()
    }

    pub fn set_domain(&mut self, domain: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("domain")?;
        if domain.is_empty() {
            return Err(UriError::InvalidInput("cannot set domain empty".to_string()));
        }
        host::ensure_valid_hostname(domain)?;

        let hostname = match self.domain_host() {
            Some(hostname) => {
                let keep = hostname.len() - self.domain().len();
                format!("{}{}", &hostname[..keep], domain)
            }
            None => domain.to_string(),
        };
        self.parts.hostname = Some(hostname);
        Ok(self.touch())
    }

    /// `org` of `www.example.org`
    pub fn tld(&self) -> String {
        let Some(hostname) = self.domain_host() else {
            return String::new();
        };
        match hostname.rfind('.') {
            Some(pos) => hostname[pos + 1..].to_string(),
            None => hostname.to_string(),
        }
    }

    pub fn set_tld(&mut self, tld: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("tld")?;
        if tld.is_empty() {
            return Err(UriError::InvalidInput("cannot set TLD empty".to_string()));
        }
        if tld.chars().any(|c| !(c.is_ascii_alphanumeric() || c == '-')) {
            return Err(UriError::InvalidTld(tld.to_string()));
        }
        let Some(hostname) = self.domain_host() else {
            return Err(UriError::NonDomainHost);
        };

        let keep = hostname.len() - self.tld().len();
        let hostname = format!("{}{}", &hostname[..keep], tld);
        self.parts.hostname = Some(hostname);
        Ok(self.touch())
    }

    // Path fractions

    /// Path without its last segment
    pub fn directory(&self) -> Result<String> {
        self.ensure_hierarchical("directory")?;

        let path = &self.parts.path;
        if path.is_empty() && self.parts.hostname.is_none() {
            return Ok(String::new());
        }
        if path == "/" {
            return Ok("/".to_string());
        }

        let filename = self.filename()?;
        let directory = path
            .len()
            .checked_sub(filename.len() + 1)
            .map_or("", |end| &path[..end]);

        if directory.is_empty() && self.parts.hostname.is_some() {
            Ok("/".to_string())
        } else {
            Ok(directory.to_string())
        }
    }

    pub fn directory_decoded(&self) -> Result<String> {
        Ok(self.codec.decode_path(&self.directory()?))
    }

    pub fn set_directory(&mut self, directory: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("directory")?;

        let filename_start = self.parts.path.len() - self.filename()?.len();
        let mut directory = directory.to_string();

        if !self.is_relative() && !directory.starts_with('/') {
            directory.insert(0, '/');
        }
        if !directory.is_empty() && !directory.ends_with('/') {
            directory.push('/');
        }

        let directory = self.codec.recode_path(&directory);
        self.parts.path = format!("{}{}", directory, &self.parts.path[filename_start..]);
        Ok(self.touch())
    }

    /// Last path segment
    pub fn filename(&self) -> Result<String> {
        self.ensure_hierarchical("filename")?;

        let path = &self.parts.path;
        if path.is_empty() || path == "/" {
            return Ok(String::new());
        }

        Ok(match path.rfind('/') {
            Some(pos) => path[pos + 1..].to_string(),
            None => path.clone(),
        })
    }

    pub fn filename_decoded(&self) -> Result<String> {
        Ok(self.codec.decode_path_segment(&self.filename()?))
    }

    /// Replace the last segment; a filename containing `/` re-normalizes the path
    pub fn set_filename(&mut self, filename: &str) -> Result<&mut Self> {
        self.ensure_hierarchical("filename")?;

        let filename = filename.strip_prefix('/').unwrap_or(filename);
        let moves_directory = filename.contains('/');

        let keep = self.parts.path.len() - self.filename()?.len();
        let recoded = self.codec.recode_path(filename);
        self.parts.path.truncate(keep);
        self.parts.path.push_str(&recoded);

        if moves_directory {
            self.normalize_path();
        }
        Ok(self.touch())
    }

    /// Extension of the filename; only `[A-Za-z0-9%]` extensions count
    pub fn suffix(&self) -> Result<String> {
        let filename = self.filename()?;
        let Some(pos) = filename.rfind('.') else {
            return Ok(String::new());
        };

        let suffix = &filename[pos + 1..];
        let plausible =
            !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '%');
        Ok(if plausible {
            suffix.to_string()
        } else {
            String::new()
        })
    }

    /// Replace, add or (with an empty value) remove the filename extension
    pub fn set_suffix(&mut self, suffix: &str) -> Result<&mut Self> {
        let suffix = suffix.strip_prefix('.').unwrap_or(suffix);
        let current = self.suffix()?;

        if current.is_empty() {
            if suffix.is_empty() {
                return Ok(self);
            }
            let recoded = self.codec.recode_path(suffix);
            self.parts.path.push('.');
            self.parts.path.push_str(&recoded);
        } else {
            let len = self.parts.path.len();
            if suffix.is_empty() {
                self.parts.path.truncate(len - current.len() - 1);
            } else {
                let recoded = self.codec.recode_path(suffix);
                self.parts.path.truncate(len - current.len());
                self.parts.path.push_str(&recoded);
            }
        }

        Ok(self.touch())
    }

    fn separator(&self) -> char {
        if self.parts.urn {
            ':'
        } else {
            '/'
        }
    }

    /// Path split on `/` (`:` for URNs), without the empty root segment
    pub fn segments(&self) -> Vec<String> {
        let path = self.path();
        let mut segments: Vec<String> = path.split(self.separator()).map(String::from).collect();
        if path.starts_with('/') {
            segments.remove(0);
        }
        segments
    }

    /// Segment at `index`; negative indices count from the end
    pub fn segment(&self, index: isize) -> Option<String> {
        let segments = self.segments();
        let index = resolve_index(index, segments.len());
        segments.get(index).cloned()
    }

    /// Replace the segment at `index`; an empty value removes it and an index
    /// past the end appends
    pub fn set_segment(&mut self, index: isize, value: &str) -> &mut Self {
        let mut segments = self.segments();
        let index = resolve_index(index, segments.len());

        if index < segments.len() {
            if value.is_empty() {
                segments.remove(index);
            } else {
                segments[index] = value.to_string();
            }
        } else if !value.is_empty() {
            append_segment(&mut segments, value);
        }

        self.write_segments(segments)
    }

    pub fn push_segment(&mut self, value: &str) -> &mut Self {
        let mut segments = self.segments();
        if !value.is_empty() {
            append_segment(&mut segments, value);
        }
        self.write_segments(segments)
    }

    pub fn set_segments<S: AsRef<str>>(&mut self, segments: &[S]) -> &mut Self {
        let segments = segments.iter().map(|s| s.as_ref().to_string()).collect();
        self.write_segments(segments)
    }

    fn write_segments(&mut self, mut segments: Vec<String>) -> &mut Self {
        if self.path().starts_with('/') {
            segments.insert(0, String::new());
        }
        let separator = self.separator().to_string();
        let joined = segments.join(separator.as_str());
        self.set_path(&joined)
    }

    // Query parameters

    pub fn query_map(&self) -> QueryMap {
        QueryMap::parse(self.query(), &self.codec)
    }

    pub fn set_query_map(&mut self, map: &QueryMap) -> &mut Self {
        self.parts.query = non_empty(&map.build(&self.codec, false));
        self.touch()
    }

    pub fn add_query(&mut self, name: &str, value: impl Into<QueryValue>) -> &mut Self {
        let mut map = self.query_map();
        map.add(name, value);
        self.set_query_map(&map)
    }

    /// Add every parameter of `params`, promoting repeated names to lists
    pub fn extend_query(&mut self, params: QueryMap) -> &mut Self {
        let mut map = self.query_map();
        map.extend(params);
        self.set_query_map(&map)
    }

    pub fn remove_query(&mut self, name: &str) -> &mut Self {
        let mut map = self.query_map();
        map.remove(name);
        self.set_query_map(&map)
    }

    pub fn remove_query_values(&mut self, name: &str, value: &QueryValue) -> &mut Self {
        let mut map = self.query_map();
        map.remove_values(name, value);
        self.set_query_map(&map)
    }

    // Identification

    /// No authority and not a URN
    pub fn is_relative(&self) -> bool {
        !self.parts.urn && self.parts.hostname.is_none()
    }

    pub fn is_absolute(&self) -> bool {
        !self.is_relative()
    }

    /// Hostname is a registered name rather than an IP literal
    pub fn is_name(&self) -> bool {
        self.domain_host().is_some()
    }

    pub fn is_ip(&self) -> bool {
        self.parts.hostname.as_deref().is_some_and(host::is_ip)
    }

    pub fn is_ipv4(&self) -> bool {
        self.parts.hostname.as_deref().is_some_and(host::is_ipv4)
    }

    pub fn is_ipv6(&self) -> bool {
        self.parts.hostname.as_deref().is_some_and(host::is_ipv6)
    }

    pub fn is_idn(&self) -> bool {
        self.parts.hostname.as_deref().is_some_and(host::is_idn)
    }

    pub fn is_punycode(&self) -> bool {
        self.parts.hostname.as_deref().is_some_and(host::is_punycode)
    }

    pub fn is_url(&self) -> bool {
        !self.parts.urn
    }

    pub fn is_urn(&self) -> bool {
        self.parts.urn
    }

    // Normalization

    pub fn normalize(&mut self) -> &mut Self {
        self.normalize_scheme();
        if !self.parts.urn {
            self.normalize_hostname();
            self.normalize_port();
            self.normalize_path();
        }
        self.normalize_query();
        self.normalize_fragment();

        tracing::debug!(url = self.as_str(), "Normalized URL");
        self
    }

    pub fn normalize_scheme(&mut self) -> &mut Self {
        if let Some(scheme) = &mut self.parts.scheme {
            scheme.make_ascii_lowercase();
        }
        self.touch()
    }

    /// Punycode for IDNs, compressed IPv6, lowercase
    pub fn normalize_hostname(&mut self) -> &mut Self {
        if let Some(hostname) = self.parts.hostname.take() {
            let hostname = if host::is_idn(&hostname) {
                host::to_ascii(&hostname).unwrap_or(hostname)
            } else if host::is_ipv6(&hostname) {
                host::compress_ipv6(&hostname)
            } else {
                hostname
            };
            self.parts.hostname = Some(hostname.to_lowercase());
        }
        self.touch()
    }

    /// Drop the port when it is the scheme's default
    pub fn normalize_port(&mut self) -> &mut Self {
        let default = self.parts.scheme.as_deref().and_then(host::default_port);
        if default.is_some() && self.parts.port.as_deref() == default {
            self.parts.port = None;
        }
        self.touch()
    }

    pub fn normalize_path(&mut self) -> &mut Self {
        if self.parts.urn || self.parts.path.is_empty() || self.parts.path == "/" {
            return self;
        }

        // `%2E` decodes to `.` so recoding comes before dot-segment removal
        let recoded = self.codec.recode_path(&self.parts.path);
        self.parts.path = path::remove_dot_segments(&recoded, self.is_relative());
        self.touch()
    }

    /// Re-escape the query through its parameter map; empty queries vanish
    pub fn normalize_query(&mut self) -> &mut Self {
        if let Some(query) = self.parts.query.take() {
            let map = QueryMap::recoded(&query, &self.codec);
            self.parts.query = non_empty(&map.build_encoded(false));
        }
        self.touch()
    }

    pub fn normalize_fragment(&mut self) -> &mut Self {
        if self.parts.fragment.as_deref() == Some("") {
            self.parts.fragment = None;
        }
        self.touch()
    }

    /// Normalize expecting Unicode input and producing Latin-1 escapes
    pub fn iso8859(&mut self) -> &mut Self {
        self.recode_with(Codec {
            encoder: Charset::Iso8859,
            decoder: Charset::Unicode,
        })
    }

    /// Normalize expecting Latin-1 escapes and producing Unicode escapes
    pub fn unicode(&mut self) -> &mut Self {
        self.recode_with(Codec {
            encoder: Charset::Unicode,
            decoder: Charset::Iso8859,
        })
    }

    fn recode_with(&mut self, codec: Codec) -> &mut Self {
        let saved = std::mem::replace(&mut self.codec, codec);
        tracing::debug!(?codec, ?saved, "Recoding URL");

        self.normalize();
        // the string must be built while the alternate codec is installed
        let _ = self.as_str();

        self.codec = saved;
        self
    }

    /// Display form: no credentials, Unicode hostname, decoded path and query
    pub fn readable(&self) -> String {
        let mut uri = self.clone();
        uri.parts.username = None;
        uri.parts.password = None;
        uri.normalize();

        let mut out = String::new();
        if let Some(scheme) = uri.parts.scheme.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(scheme);
            out.push_str(if uri.parts.urn { ":" } else { "://" });
        } else if uri.parts.hostname.is_some() {
            out.push_str("//");
        }

        if let Some(hostname) = uri.parts.hostname.as_deref() {
            if host::is_punycode(hostname) {
                out.push_str(&host::to_unicode(hostname));
                if let Some(port) = uri.parts.port.as_deref() {
                    out.push(':');
                    out.push_str(port);
                }
            } else {
                out.push_str(&uri.host());
            }

            if !uri.parts.path.is_empty() && !uri.parts.path.starts_with('/') {
                out.push('/');
            }
        }

        out.push_str(&uri.path_decoded());

        if let Some(query) = uri.parts.query.as_deref() {
            let params: Vec<String> = query
                .split('&')
                .map(|pair| {
                    let readable = |s: &str| uri.codec.decode_query(s).replace('&', "%26");
                    match pair.split_once('=') {
                        Some((name, value)) => format!("{}={}", readable(name), readable(value)),
                        None => readable(pair),
                    }
                })
                .collect();
            out.push('?');
            out.push_str(&params.join("&"));
        }

        out.push_str(&uri.hash());
        out
    }

    /// Convert into the `url` crate's type for consumers built on it
    pub fn to_url(&self) -> Result<url::Url> {
        Ok(url::Url::parse(self.as_str())?)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn prefixed(prefix: char, value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, value)
    }
}

fn validate_hostname(hostname: Option<&str>) -> Result<()> {
    match hostname {
        Some(hostname) if !host::is_ipv6(hostname) => host::ensure_valid_hostname(hostname),
        _ => Ok(()),
    }
}

fn validate_port(port: Option<&str>) -> Result<()> {
    match port {
        Some(port) if !port.chars().all(|c| c.is_ascii_digit()) => {
            Err(UriError::InvalidPort(port.to_string()))
        }
        _ => Ok(()),
    }
}

fn resolve_index(index: isize, len: usize) -> usize {
    if index < 0 {
        (len as isize + index).max(0) as usize
    } else {
        index as usize
    }
}

/// Append, reusing a trailing empty segment so `/foo/` + `bar` is `/foo/bar`
fn append_segment(segments: &mut Vec<String>, value: &str) {
    match segments.last_mut() {
        Some(last) if last.is_empty() => *last = value.to_string(),
        _ => segments.push(value.to_string()),
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Uri {}

impl FromStr for Uri {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Uri::parse(s))
    }
}

impl From<&str> for Uri {
    fn from(input: &str) -> Self {
        Uri::parse(input)
    }
}

impl From<String> for Uri {
    fn from(input: String) -> Self {
        Uri::parse(&input)
    }
}

impl From<&url::Url> for Uri {
    fn from(url: &url::Url) -> Self {
        Uri::parse(url.as_str())
    }
}

impl Serialize for Uri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Uri::parse(&s))
    }
}
