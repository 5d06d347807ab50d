//! URL work under one configuration
//!
//! The linker parses with the configured charset, resolves against the
//! configured base, and normalizes what it hands out unless told not to.

use serde::Serialize;

use hrefkit_uri::{within_string, Codec, QueryMap, Uri};

use crate::config::{check_base, Config};
use crate::error::CoreError;
use crate::Result;

/// Component breakdown of a URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlReport {
    pub href: String,
    pub scheme: String,
    pub username: String,
    pub hostname: String,
    pub port: String,
    pub path: String,
    pub query: QueryMap,
    pub fragment: String,
    pub subdomain: String,
    pub domain: String,
    pub tld: String,
    /// Absent for URNs
    pub directory: Option<String>,
    pub filename: Option<String>,
    pub suffix: Option<String>,
    pub segments: Vec<String>,
    pub relative: bool,
    pub urn: bool,
    pub ip: bool,
    pub idn: bool,
    pub punycode: bool,
    pub readable: String,
}

pub struct Linker {
    config: Config,
    /// Parsed form of `config.base_url`
    base: Option<Uri>,
}

impl Linker {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let codec = Codec::new(config.charset);
        let base = config
            .base_url
            .as_deref()
            .map(|base| Uri::parse_with(base, codec));

        Ok(Self { config, base })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base(&self) -> Option<&Uri> {
        self.base.as_ref()
    }

    pub fn set_base(&mut self, base: &str) -> Result<()> {
        check_base(base)?;
        self.base = Some(Uri::parse_with(base, self.codec()));
        self.config.base_url = Some(base.to_string());
        Ok(())
    }

    fn codec(&self) -> Codec {
        Codec::new(self.config.charset)
    }

    fn finish(&self, mut uri: Uri) -> Uri {
        if self.config.normalize {
            uri.normalize();
        }
        uri
    }

    fn require_base(&self) -> Result<&Uri> {
        self.base.as_ref().ok_or(CoreError::MissingBase)
    }

    pub fn parse(&self, input: &str) -> Uri {
        self.finish(Uri::parse_with(input.trim(), self.codec()))
    }

    /// Resolve `input` against the configured base
    pub fn resolve(&self, input: &str) -> Result<Uri> {
        self.resolve_against(input, self.require_base()?)
    }

    pub fn resolve_against(&self, input: &str, base: &Uri) -> Result<Uri> {
        let resolved = Uri::parse_with(input.trim(), self.codec()).absolute_to(base)?;
        Ok(self.finish(resolved))
    }

    /// Express `target` relative to the configured base
    pub fn relativize(&self, target: &str) -> Result<Uri> {
        let base = self.require_base()?;
        let mut target = Uri::parse_with(target.trim(), self.codec());
        target.normalize();
        Ok(target.relative_to(base)?)
    }

    /// Whether two references name the same resource once both are resolved
    /// against the base (when one is configured) and normalized
    pub fn same_target(&self, one: &str, two: &str) -> Result<bool> {
        let one = self.anchor(one)?;
        let two = self.anchor(two)?;
        Ok(one.equals(&two))
    }

    fn anchor(&self, input: &str) -> Result<Uri> {
        let uri = Uri::parse_with(input.trim(), self.codec());
        match &self.base {
            Some(base) if uri.is_relative() => Ok(uri.absolute_to(base)?),
            _ => Ok(uri),
        }
    }

    pub fn readable(&self, input: &str) -> String {
        Uri::parse_with(input.trim(), self.codec()).readable()
    }

    pub fn describe(&self, input: &str) -> UrlReport {
        let uri = self.parse(input);

        UrlReport {
            href: uri.href(),
            scheme: uri.scheme().to_string(),
            username: uri.username().to_string(),
            hostname: uri.hostname().to_string(),
            port: uri.port().to_string(),
            path: uri.path().to_string(),
            query: uri.query_map(),
            fragment: uri.fragment().to_string(),
            subdomain: uri.subdomain(),
            domain: uri.domain(),
            tld: uri.tld(),
            directory: uri.directory().ok(),
            filename: uri.filename().ok(),
            suffix: uri.suffix().ok(),
            segments: uri.segments(),
            relative: uri.is_relative(),
            urn: uri.is_urn(),
            ip: uri.is_ip(),
            idn: uri.is_idn(),
            punycode: uri.is_punycode(),
            readable: uri.readable(),
        }
    }

    /// Replace every URL in `text` by its canonical form.
    ///
    /// Matches without a scheme (`www.example.org/x`) are taken as host-first
    /// references and get the base's scheme, or `http` without a base.
    pub fn rewrite_links(&self, text: &str) -> String {
        let mut rewritten = 0usize;
        let out = within_string(text, |found| match self.link_target(found) {
            Ok(uri) => {
                rewritten += 1;
                uri.href()
            }
            Err(e) => {
                tracing::warn!(link = found, error = %e, "Leaving link unchanged");
                found.to_string()
            }
        });

        tracing::debug!(rewritten, "Rewrote links");
        out
    }

    fn link_target(&self, found: &str) -> Result<Uri> {
        let mut uri = Uri::parse_with(found, self.codec());
        if uri.is_relative() {
            uri = Uri::parse_with(&format!("//{}", found), self.codec());
            let scheme = self
                .base
                .as_ref()
                .map(Uri::scheme)
                .filter(|s| !s.is_empty())
                .unwrap_or("http");
            uri.set_scheme(scheme)?;
        }
        Ok(self.finish(uri))
    }

    /// Add query parameters; repeated names become lists.
    ///
    /// The query is written after normalization so duplicate values survive
    /// when the configuration keeps them.
    pub fn with_query(&self, input: &str, params: QueryMap) -> Result<Uri> {
        let mut uri = self.finish(self.anchor(input)?);
        let mut map = uri.query_map();
        map.extend(params);
        self.write_query(&mut uri, &map);
        Ok(uri)
    }

    /// Remove query parameters by name
    pub fn without_query<S: AsRef<str>>(&self, input: &str, names: &[S]) -> Result<Uri> {
        let mut uri = self.finish(self.anchor(input)?);
        let mut map = uri.query_map();
        for name in names {
            map.remove(name.as_ref());
        }
        self.write_query(&mut uri, &map);
        Ok(uri)
    }

    fn write_query(&self, uri: &mut Uri, map: &QueryMap) {
        let query = map.build(&uri.codec(), self.config.keep_duplicate_query_values);
        uri.set_query(&query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrefkit_uri::{Charset, QueryValue};

    fn linker(base: &str) -> Linker {
        Linker::new(Config::with_base(base)).unwrap()
    }

    #[test]
    fn test_parse_normalizes() {
        let linker = Linker::new(Config::default()).unwrap();
        assert_eq!(
            linker.parse("  HTTP://Example.COM:80/a/./b/../c ").as_str(),
            "http://example.com/a/c"
        );

        let raw = Linker::new(Config {
            normalize: false,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(raw.parse("HTTP://Example.COM:80/").as_str(), "HTTP://Example.COM/");
    }

    #[test]
    fn test_resolve() {
        let linker = linker("http://a.com/b/c/d");
        assert_eq!(linker.resolve("g/h").unwrap().as_str(), "http://a.com/b/c/g/h");
        assert_eq!(linker.resolve("../G").unwrap().as_str(), "http://a.com/b/G");

        let other = Uri::parse("https://x.org/1/2");
        assert_eq!(
            linker.resolve_against("3", &other).unwrap().as_str(),
            "https://x.org/1/3"
        );
    }

    #[test]
    fn test_missing_base() {
        let linker = Linker::new(Config::default()).unwrap();
        assert!(matches!(linker.resolve("g"), Err(CoreError::MissingBase)));
        assert!(matches!(linker.relativize("/g"), Err(CoreError::MissingBase)));
    }

    #[test]
    fn test_set_base() {
        let mut linker = Linker::new(Config::default()).unwrap();
        assert!(linker.set_base("relative/only").is_err());
        linker.set_base("https://example.org/docs/").unwrap();
        assert_eq!(linker.config().base_url.as_deref(), Some("https://example.org/docs/"));
        assert_eq!(linker.resolve("a").unwrap().as_str(), "https://example.org/docs/a");
    }

    #[test]
    fn test_relativize() {
        let linker = linker("http://a.com/a/b/c/d");
        assert_eq!(linker.relativize("http://a.com/a/b/e/f").unwrap().as_str(), "../e/f");
        assert_eq!(linker.relativize("/a/b/./c/x").unwrap().as_str(), "./x");
    }

    #[test]
    fn test_same_target() {
        let linker = linker("http://example.org/docs/");
        assert!(linker
            .same_target("guide?b=2&a=1", "HTTP://EXAMPLE.ORG:80/docs/guide?a=1&b=2")
            .unwrap());
        assert!(!linker.same_target("guide", "http://example.org/guide").unwrap());
    }

    #[test]
    fn test_describe() {
        let linker = Linker::new(Config::default()).unwrap();
        let report = linker.describe("http://user@www.example.org/a/b.html?x=1&x=2");
        assert_eq!(report.hostname, "www.example.org");
        assert_eq!(report.subdomain, "www");
        assert_eq!(report.directory.as_deref(), Some("/a"));
        assert_eq!(report.suffix.as_deref(), Some("html"));
        assert_eq!(report.query.get("x"), Some(&QueryValue::from(vec!["1", "2"])));
        assert_eq!(report.readable, "http://www.example.org/a/b.html?x=1&x=2");

        let urn = linker.describe("urn:isbn:0451450523");
        assert!(urn.urn);
        assert_eq!(urn.directory, None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["query"]["x"], serde_json::json!(["1", "2"]));
    }

    #[test]
    fn test_rewrite_links() {
        let linker = linker("https://example.org/");
        let text = "See HTTP://Example.ORG:80/a/../b and www.Example.net/x.";
        assert_eq!(
            linker.rewrite_links(text),
            "See http://example.org/b and https://www.example.net/x."
        );
    }

    #[test]
    fn test_with_query() {
        let linker = Linker::new(Config::default()).unwrap();
        let params: QueryMap = [("a", "1"), ("b", "x y")].into_iter().collect();
        let uri = linker.with_query("http://example.org/?a=1", params).unwrap();
        assert_eq!(uri.as_str(), "http://example.org/?a=1&b=x+y");

        let keep = Linker::new(Config {
            keep_duplicate_query_values: true,
            ..Config::default()
        })
        .unwrap();
        let params: QueryMap = [("a", "1")].into_iter().collect();
        let uri = keep.with_query("http://example.org/?a=1", params).unwrap();
        assert_eq!(uri.as_str(), "http://example.org/?a=1&a=1");

        let uri = linker
            .without_query("http://example.org/?a=1&b=2&c=3", &["a", "c"])
            .unwrap();
        assert_eq!(uri.as_str(), "http://example.org/?b=2");
    }

    #[test]
    fn test_iso8859_charset() {
        let linker = Linker::new(Config {
            charset: Charset::Iso8859,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(linker.parse("/ä.html").as_str(), "/%E4.html");
        assert_eq!(linker.readable("/%E4.html"), "/ä.html");
    }
}
