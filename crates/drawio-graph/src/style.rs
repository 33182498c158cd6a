// crates/drawio-graph/src/style.rs
//
// The `style` attribute of an `mxCell`.
//
// draw.io stores cell styling as a flat list of declarations:
// `rounded=1;whiteSpace=wrap;html=1;` where a declaration without `=` is a
// bare flag (`ellipse;`). `Style` keeps those declarations as a map and
// converts to and from the attribute text at the serialization boundary.
//
// No escaping exists in the format. Keys or values containing `;` or `=`
// do not survive a round trip.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const DECLARATION_SEPARATOR: char = ';';
const KEY_VALUE_SEPARATOR: char = '=';

/// Key/value style declarations of a cell.
///
/// An empty value means the key is present as a bare flag. Keys are kept
/// sorted, so [`Style::encode`] is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Style {
    entries: BTreeMap<String, String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode as attribute text: `key=value;` per entry, `key;` for flags.
    ///
    /// Every entry is terminated by `;`, including the last one. An empty
    /// style encodes to the empty string.
    pub fn encode(&self) -> String {
        let mut text = String::new();
        for (key, value) in &self.entries {
            text.push_str(key);
            if !value.is_empty() {
                text.push(KEY_VALUE_SEPARATOR);
                text.push_str(value);
            }
            text.push(DECLARATION_SEPARATOR);
        }
        text
    }

    /// Decode attribute text. Never fails.
    ///
    /// Each declaration is split at its first `=`; a declaration without one
    /// becomes a flag. Empty declarations (`""`, `";;"`, a trailing `;`) are
    /// skipped. When a key repeats, the last declaration wins.
    pub fn decode(text: &str) -> Self {
        let mut style = Self::new();
        for declaration in text.split(DECLARATION_SEPARATOR) {
            if declaration.is_empty() {
                continue;
            }
            let (key, value) = declaration
                .split_once(KEY_VALUE_SEPARATOR)
                .unwrap_or((declaration, ""));
            style.entries.insert(key.to_string(), value.to_string());
        }
        style
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Set `key` as a bare flag (encoded without `=`).
    pub fn insert_flag(&mut self, key: impl Into<String>) -> Option<String> {
        self.insert(key, String::new())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

/// Iterator over `(key, value)` pairs of a [`Style`], in key order.
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Style {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Style {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Self::new();
        style.extend(iter);
        style
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Style {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Style {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Style {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::decode(s))
    }
}

impl Serialize for Style {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(d)?;
        Ok(Self::decode(&text))
    }
}
