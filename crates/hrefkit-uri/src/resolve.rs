//! Resolution of relative references and URL equivalence

use crate::error::UriError;
use crate::path;
use crate::query::{QueryMap, QueryValue};
use crate::uri::Uri;
use crate::Result;

impl Uri {
    /// Resolve this reference against `base`.
    ///
    /// A reference that already carries a hostname is returned unchanged.
    /// Otherwise the authority is taken from `base`, as are the query and
    /// path when this reference has none, and a relative path is joined onto
    /// the base directory and normalized.
    pub fn absolute_to(&self, base: &Uri) -> Result<Uri> {
        self.ensure_hierarchical("absolute_to")?;

        let mut resolved = self.clone();
        if self.parts.hostname.is_some() {
            return Ok(resolved);
        }

        resolved.parts.scheme = base.parts.scheme.clone();
        resolved.parts.username = base.parts.username.clone();
        resolved.parts.password = base.parts.password.clone();
        resolved.parts.hostname = base.parts.hostname.clone();
        resolved.parts.port = base.parts.port.clone();

        if resolved.parts.query.is_none() {
            resolved.parts.query = base.parts.query.clone();
        }
        if resolved.parts.path.is_empty() {
            resolved.parts.path = base.parts.path.clone();
        }

        if !resolved.path().starts_with('/') {
            let directory = base.directory()?;
            let joined = if directory.is_empty() {
                resolved.parts.path.clone()
            } else {
                format!("{}/{}", directory, resolved.parts.path)
            };
            resolved.parts.path = joined;
            resolved.normalize_path();
        }
        resolved.touch();

        tracing::debug!(
            reference = self.as_str(),
            base = base.as_str(),
            resolved = resolved.as_str(),
            "Resolved reference"
        );
        Ok(resolved)
    }

    /// Express this URL relative to `base`.
    ///
    /// Both paths must be absolute. The result has no scheme or authority and
    /// keeps this URL's query and fragment.
    pub fn relative_to(&self, base: &Uri) -> Result<Uri> {
        self.ensure_hierarchical("relative_to")?;

        let target = self.path();
        let base_path = base.path();
        if !target.starts_with('/') || !base_path.starts_with('/') {
            return Err(UriError::RelativePath);
        }

        let common = path::common_path(target, base_path);
        let base_dir = base.directory()?;

        let mut relative = self.clone();
        relative.parts.clear_authority();
        relative.touch();

        if common.is_empty() || common == "/" {
            return Ok(relative);
        }

        let dir_prefix = if base_dir.ends_with('/') {
            base_dir
        } else {
            format!("{}/", base_dir)
        };

        relative.parts.path = if common.starts_with(&dir_prefix) {
            format!("./{}", &target[dir_prefix.len()..])
        } else {
            let levels = dir_prefix[common.len()..].matches('/').count();
            format!("{}{}", "../".repeat(levels), &target[common.len()..])
        };

        tracing::debug!(
            url = self.as_str(),
            base = base.as_str(),
            relative = relative.as_str(),
            "Relativized URL"
        );
        Ok(relative)
    }

    /// Equivalence after normalization.
    ///
    /// Query parameters may appear in any order, as may the values of a
    /// repeated parameter; the multiset of values must match.
    pub fn equals(&self, other: &Uri) -> bool {
        let mut one = self.clone();
        let mut two = other.clone();
        one.normalize();
        two.normalize();

        if one.as_str() == two.as_str() {
            return true;
        }

        let one_query = one.parts.query.take().unwrap_or_default();
        let two_query = two.parts.query.take().unwrap_or_default();
        one.touch();
        two.touch();

        if one.as_str() != two.as_str() || one_query.len() != two_query.len() {
            return false;
        }

        same_parameters(
            &QueryMap::recoded(&one_query, &one.codec),
            &QueryMap::recoded(&two_query, &two.codec),
        )
    }
}

fn same_parameters(one: &QueryMap, two: &QueryMap) -> bool {
    if one.len() != two.len() {
        return false;
    }

    one.iter().all(|(name, value)| match (value, two.get(name)) {
        (QueryValue::One(a), Some(QueryValue::One(b))) => a == b,
        (QueryValue::Many(a), Some(QueryValue::Many(b))) => {
            let mut a = a.clone();
            let mut b = b.clone();
            a.sort();
            b.sort();
            a == b
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn resolve(reference: &str, base: &str) -> String {
        Uri::parse(reference)
            .absolute_to(&Uri::parse(base))
            .unwrap()
            .href()
    }

    fn relativize(target: &str, base: &str) -> String {
        Uri::parse(target)
            .relative_to(&Uri::parse(base))
            .unwrap()
            .href()
    }

    #[test]
    fn test_absolute_to() {
        let base = "http://a.com/b/c/d";
        assert_eq!(resolve("g/h", base), "http://a.com/b/c/g/h");
        assert_eq!(resolve("./g", base), "http://a.com/b/c/g");
        assert_eq!(resolve("../g", base), "http://a.com/b/g");
        assert_eq!(resolve("../../../../g", base), "http://a.com/g");
        assert_eq!(resolve("/g", base), "http://a.com/g");
        assert_eq!(resolve("?q", base), "http://a.com/b/c/d?q");
        assert_eq!(resolve("#f", base), "http://a.com/b/c/d#f");
        assert_eq!(resolve("g", "http://a.com/"), "http://a.com/g");
        assert_eq!(resolve("//other.org/x", base), "//other.org/x");
    }

    #[test]
    fn test_absolute_to_inherits_query() {
        assert_eq!(resolve("g", "http://a.com/b?x=1"), "http://a.com/g?x=1");
        assert_eq!(resolve("g?y=2", "http://a.com/b?x=1"), "http://a.com/g?y=2");
    }

    #[test]
    fn test_with_base() {
        let base = Uri::parse("https://user@example.org:8443/docs/index.html");
        let uri = Uri::with_base("../img/logo.png", &base).unwrap();
        assert_eq!(uri.as_str(), "https://user@example.org:8443/img/logo.png");
    }

    #[test]
    fn test_absolute_to_urn() {
        let err = Uri::parse("urn:x:y")
            .absolute_to(&Uri::parse("http://a.com/"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(relativize("/a/b/e/f", "/a/b/c/d"), "../e/f");
        assert_eq!(relativize("/a/b/c/e", "/a/b/c/d"), "./e");
        assert_eq!(relativize("/a/x/y", "/a/b/c/d"), "../../x/y");
        assert_eq!(
            relativize("http://a.com/a/b/e?q#f", "http://a.com/a/b/c/d"),
            "../e?q#f"
        );
        // nothing shared beyond the root
        assert_eq!(relativize("http://a.com/x/y", "http://a.com/a/b"), "/x/y");
    }

    #[test]
    fn test_relative_to_round_trips() {
        let base = Uri::parse("http://a.com/a/b/c/d");
        for target in ["http://a.com/a/b/e/f", "http://a.com/a/b/c/e", "http://a.com/a/x/y"] {
            let target = Uri::parse(target);
            let relative = target.relative_to(&base).unwrap();
            assert_eq!(relative.absolute_to(&base).unwrap(), target);
        }
    }

    #[test]
    fn test_relative_to_errors() {
        let err = Uri::parse("a/b").relative_to(&Uri::parse("/a/c")).unwrap_err();
        assert_eq!(err, UriError::RelativePath);
        assert_eq!(err.kind(), ErrorKind::Structural);

        let err = Uri::parse("urn:a:b").relative_to(&Uri::parse("/a")).unwrap_err();
        assert_eq!(err, UriError::Urn("relative_to"));
    }

    #[test]
    fn test_equals() {
        let one = Uri::parse("http://example.org/foo/../bar?a=1&b=2&c=3&c=4");
        let two = Uri::parse("HTTP://EXAMPLE.org:80/bar?c=4&b=2&a=1&c=3");
        assert!(one.equals(&two));
        assert!(two.equals(&one));

        assert!(!one.equals(&Uri::parse("http://example.org/bar?a=1&b=2&c=3")));
        assert!(!one.equals(&Uri::parse("http://example.org/baz?a=1&b=2&c=3&c=4")));
        assert!(!Uri::parse("/x?a=1&b=2").equals(&Uri::parse("/x?a=1&c=2")));
        assert!(Uri::parse("/x?").equals(&Uri::parse("/x")));
    }

    #[test]
    fn test_equals_undecodable_query() {
        let raw = Uri::parse("http://a.com/?q=%E4");
        assert!(!raw.equals(&Uri::parse("http://a.com/?q=%25E4")));
        assert!(Uri::parse("/x?q=%7E&a").equals(&Uri::parse("/x?a&q=~")));
    }

    #[test]
    fn test_equals_repeated_parameter_order() {
        let one = Uri::parse("http://example.com/a?x=1&x=2");
        let two = Uri::parse("http://example.com/a?x=2&x=1");
        assert!(one.equals(&two));

        // a list never equals a single value
        assert!(!Uri::parse("/a?x=1&x=2").equals(&Uri::parse("/a?x=1&y=2")));
        assert!(!Uri::parse("/a?x=1&x=2").equals(&Uri::parse("/a?x=1&x=3")));
    }
}
