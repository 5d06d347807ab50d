//! Path dot-segment removal and common prefixes

use std::sync::LazyLock;

use regex::Regex;

// "/./", "/././" and runs of slashes all collapse into one slash
#[allow(clippy::expect_used)]
static SIMPLE_SEGMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/(\./)+)|/{2,}").expect("segment regex is valid"));

/// Remove `.` and `..` segments.
///
/// Relative paths are processed as if rooted at `/`. When `keep_relative` is
/// set the synthetic root is taken off again and the leading `./` or `../`
/// segments are kept; otherwise the result stays rooted. A `..` that would
/// climb above the root of an absolute path is dropped.
pub fn remove_dot_segments(path: &str, keep_relative: bool) -> String {
    if path.is_empty() || path == "/" {
        return path.to_string();
    }

    let relative = keep_relative && !path.starts_with('/');
    let mut ups = 0usize;
    let mut dot = false;
    let mut rest = path;

    if relative {
        loop {
            if let Some(r) = rest.strip_prefix("../") {
                ups += 1;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("./") {
                dot = true;
                rest = r;
            } else {
                break;
            }
        }
    }

    let mut rooted = if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{}", rest)
    };

    if rooted.ends_with("/.") || rooted.ends_with("/..") {
        rooted.push('/');
    }

    let mut rooted = SIMPLE_SEGMENTS.replace_all(&rooted, "/").into_owned();

    while let Some(parent) = rooted.find("/../") {
        if parent == 0 {
            rooted.replace_range(..3, "");
            if relative {
                ups += 1;
            }
            continue;
        }

        let start = rooted[..parent].rfind('/').unwrap_or(parent);
        rooted.replace_range(start..parent + 3, "");
    }

    if !relative {
        return rooted;
    }

    let prefix = if ups > 0 {
        "../".repeat(ups)
    } else if dot {
        "./".to_string()
    } else {
        String::new()
    };

    let out = format!("{}{}", prefix, &rooted[1..]);
    if out.is_empty() {
        "./".to_string()
    } else {
        out
    }
}

/// Longest shared directory prefix of two paths, ending in `/`
pub fn common_path(one: &str, two: &str) -> String {
    let (a, b) = (one.as_bytes(), two.as_bytes());
    let length = a.len().min(b.len());

    // index of the last matching byte, or the full length when one is a prefix
    let last = match (0..length).find(|&i| a[i] != b[i]) {
        Some(mismatch) => mismatch.saturating_sub(1),
        None => length,
    };

    if last < 1 {
        return if a.first() == Some(&b'/') && b.first() == Some(&b'/') {
            "/".to_string()
        } else {
            String::new()
        };
    }

    let end = if a.get(last) == Some(&b'/') {
        last
    } else {
        match a[..last].iter().rposition(|&c| c == b'/') {
            Some(pos) => pos,
            None => return String::new(),
        }
    };

    one[..=end].to_string()
}
