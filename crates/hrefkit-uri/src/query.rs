//! Query string as an ordered parameter map
//!
//! Query strings are treated as `application/x-www-form-urlencoded`: pairs
//! are separated by `&`, names and values use `+` for spaces. A name without
//! `=` carries no value (`None`), which is different from an empty value.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::codec::Codec;

/// Value of a single query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    One(Option<String>),
    Many(Vec<Option<String>>),
}

impl QueryValue {
    /// All values, whether single or repeated
    pub fn values(&self) -> Vec<Option<&str>> {
        match self {
            QueryValue::One(v) => vec![v.as_deref()],
            QueryValue::Many(vs) => vs.iter().map(|v| v.as_deref()).collect(),
        }
    }

    /// First value, if the parameter has one
    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::One(v) => v.as_deref(),
            QueryValue::Many(vs) => vs.first().and_then(|v| v.as_deref()),
        }
    }

    fn into_list(self) -> Vec<Option<String>> {
        match self {
            QueryValue::One(v) => vec![v],
            QueryValue::Many(vs) => vs,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(Some(value.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(Some(value))
    }
}

impl From<Option<&str>> for QueryValue {
    fn from(value: Option<&str>) -> Self {
        QueryValue::One(value.map(str::to_string))
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Many(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Many(values.into_iter().map(Some).collect())
    }
}

/// Insertion-ordered mapping from parameter name to value(s)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, QueryValue)>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (a leading `?` is tolerated)
    pub fn parse(query: &str, codec: &Codec) -> Self {
        Self::split(query, |raw| codec.decode_query(raw))
    }

    /// Parameters in canonical encoded form rather than decoded.
    ///
    /// Escapes that do not decode under `codec` stay as written, so two
    /// queries that only differ in such escapes never compare equal.
    pub(crate) fn recoded(query: &str, codec: &Codec) -> Self {
        Self::split(query, |raw| codec.recode_query(raw))
    }

    fn split(query: &str, convert: impl Fn(&str) -> String) -> Self {
        let mut map = Self::new();

        let pairs = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty());

        for pair in pairs {
            let (name, value) = match pair.split_once('=') {
                Some((name, value)) => (name, Some(convert(value))),
                None => (pair, None),
            };
            map.push_value(convert(name), value);
        }

        map
    }

    /// Serialize back to a query string.
    ///
    /// Identical values of a repeated parameter are emitted once unless
    /// `duplicates` is set. Parameters with an empty name are skipped.
    pub fn build(&self, codec: &Codec, duplicates: bool) -> String {
        self.join(duplicates, |raw| codec.encode_query(raw))
    }

    /// Counterpart of [`QueryMap::recoded`]: names and values are written as held
    pub(crate) fn build_encoded(&self, duplicates: bool) -> String {
        self.join(duplicates, str::to_string)
    }

    fn join(&self, duplicates: bool, convert: impl Fn(&str) -> String) -> String {
        let parameter = |name: &str, value: Option<&str>| match value {
            Some(v) => format!("{}={}", convert(name), convert(v)),
            None => convert(name),
        };
        let mut params = Vec::new();

        for (name, value) in &self.entries {
            if name.is_empty() {
                continue;
            }

            match value {
                QueryValue::One(v) => params.push(parameter(name, v.as_deref())),
                QueryValue::Many(vs) => {
                    let mut seen: Vec<Option<&str>> = Vec::new();
                    for v in vs {
                        let v = v.as_deref();
                        if seen.contains(&v) {
                            continue;
                        }
                        params.push(parameter(name, v));
                        if !duplicates {
                            seen.push(v);
                        }
                    }
                }
            }
        }

        params.join("&")
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Replace the value of `name`, keeping its position if present
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Add value(s) to `name`; a second value turns the parameter into a list
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            None => self.entries.push((name, value)),
            Some((_, existing)) => {
                let mut list = std::mem::replace(existing, QueryValue::Many(Vec::new())).into_list();
                list.extend(value.into_list());
                *existing = QueryValue::Many(list);
            }
        }
    }

    /// Add every parameter of `other`
    pub fn extend(&mut self, other: QueryMap) {
        for (name, value) in other.entries {
            self.add(name, value);
        }
    }

    /// Remove a parameter entirely
    pub fn remove(&mut self, name: &str) -> Option<QueryValue> {
        let pos = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Remove specific values of a parameter.
    ///
    /// A single-valued parameter is removed when it equals `value`; a list
    /// loses every element found in `value`. Empty lists are dropped.
    pub fn remove_values(&mut self, name: &str, value: &QueryValue) {
        let Some(pos) = self.entries.iter().position(|(key, _)| key == name) else {
            return;
        };

        let drop_entry = match &mut self.entries[pos].1 {
            QueryValue::Many(list) => {
                let unwanted = value.values();
                list.retain(|v| !unwanted.contains(&v.as_deref()));
                list.is_empty()
            }
            single => *single == *value,
        };

        if drop_entry {
            self.entries.remove(pos);
        }
    }

    fn push_value(&mut self, name: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            None => self.entries.push((name, QueryValue::One(value))),
            Some((_, existing)) => match existing {
                QueryValue::Many(list) => list.push(value),
                QueryValue::One(first) => {
                    let first = first.take();
                    *existing = QueryValue::Many(vec![first, value]);
                }
            },
        }
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (name, value) in iter {
            map.add(name, value);
        }
        map
    }
}

impl IntoIterator for QueryMap {
    type Item = (String, QueryValue);
    type IntoIter = std::vec::IntoIter<(String, QueryValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for QueryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> QueryMap {
        QueryMap::parse(query, &Codec::UNICODE)
    }

    #[test]
    fn test_parse() {
        let map = parse("?a=1&a=2&b&c=x+y&&d=e=f&");
        assert_eq!(map.len(), 4);
        assert_eq!(
            map.get("a"),
            Some(&QueryValue::Many(vec![Some("1".into()), Some("2".into())]))
        );
        assert_eq!(map.get("b"), Some(&QueryValue::One(None)));
        assert_eq!(map.get("c"), Some(&QueryValue::from("x y")));
        assert_eq!(map.get("d"), Some(&QueryValue::from("e=f")));
        assert_eq!(map.names().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
        assert!(parse("?&&").is_empty());
    }

    #[test]
    fn test_repeated_empty_value_is_kept() {
        let map = parse("a=&a=1");
        assert_eq!(
            map.get("a"),
            Some(&QueryValue::Many(vec![Some(String::new()), Some("1".into())]))
        );
    }

    #[test]
    fn test_build() {
        let mut map = QueryMap::new();
        map.insert("name", "a b");
        map.insert("flag", None::<&str>);
        map.insert("list", vec!["1", "2", "1"]);
        map.insert("", "skipped");

        let codec = Codec::UNICODE;
        assert_eq!(map.build(&codec, false), "name=a+b&flag&list=1&list=2");
        assert_eq!(map.build(&codec, true), "name=a+b&flag&list=1&list=2&list=1");
    }

    #[test]
    fn test_parse_build_round_trip() {
        let codec = Codec::UNICODE;
        let mut map = QueryMap::new();
        map.insert("q", "rust & serde");
        map.insert("tags", vec!["a", "b"]);
        map.insert("empty", "");

        assert_eq!(QueryMap::parse(&map.build(&codec, false), &codec), map);
    }

    #[test]
    fn test_add_promotes_to_list() {
        let mut map = QueryMap::new();
        map.add("a", "1");
        assert_eq!(map.get("a"), Some(&QueryValue::from("1")));

        map.add("a", "2");
        map.add("a", vec!["3", "4"]);
        assert_eq!(map.get("a"), Some(&QueryValue::from(vec!["1", "2", "3", "4"])));
    }

    #[test]
    fn test_remove() {
        let mut map = parse("a=1&a=2&a=3&b=x&c=y");

        map.remove_values("a", &QueryValue::from(vec!["1", "3"]));
        assert_eq!(map.get("a"), Some(&QueryValue::from(vec!["2"])));

        map.remove_values("b", &QueryValue::from("nope"));
        assert!(map.contains("b"));
        map.remove_values("b", &QueryValue::from("x"));
        assert!(!map.contains("b"));

        assert_eq!(map.remove("c"), Some(QueryValue::from("y")));
        assert_eq!(map.remove("c"), None);

        map.remove_values("a", &QueryValue::from("2"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_serialize_as_object() {
        let map = parse("a=1&a=2&b");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a":["1","2"],"b":null}"#);
    }
}
