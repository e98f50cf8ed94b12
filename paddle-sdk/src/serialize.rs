//! PHP `serialize()` compatible canonical encoding.
//!
//! Paddle signs webhook payloads on a PHP backend by calling
//! `serialize()` on the key-sorted field array. Verifying such a signature
//! means reproducing those bytes exactly, so this module implements the
//! subset of the format that webhook payloads can contain:
//!
//! ```text
//! N;                          null
//! b:1;                        boolean
//! i:42;                       integer
//! d:0.5;                      float
//! s:3:"abc";                  string (length in UTF-8 bytes)
//! a:1:{s:1:"k";i:1;}          associative array
//! ```
//!
//! Sequential arrays are deliberately unsupported and rejected with
//! [`UnsupportedValueError`] when converting from JSON.

use std::fmt::Write as _;

/// A value that can be encoded by [`serialize`].
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Map(PhpMap),
}

/// An ordered associative array with string keys.
///
/// Iteration (and therefore serialization) follows insertion order.
/// Replacing the value of an existing key keeps its original position,
/// which mirrors how PHP arrays behave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhpMap {
    entries: Vec<(String, PhpValue)>,
}

/// Raised when a value outside the supported domain is converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported value for php serialization: {kind}")]
pub struct UnsupportedValueError {
    kind: &'static str,
}

impl UnsupportedValueError {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self { kind }
    }

    /// Short description of the rejected value shape.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl PhpMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PhpValue>,
    ) -> Option<PhpValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PhpValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<PhpValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PhpValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Sort the top-level entries by key, byte-wise ascending.
    ///
    /// Nested maps are left untouched.
    pub fn sort_keys(&mut self) {
        self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    pub fn sorted(mut self) -> Self {
        self.sort_keys();
        self
    }
}

impl<K, V> FromIterator<(K, V)> for PhpMap
where
    K: Into<String>,
    V: Into<PhpValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PhpMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for PhpMap {
    type Item = (String, PhpValue);
    type IntoIter = std::vec::IntoIter<(String, PhpValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<bool> for PhpValue {
    fn from(value: bool) -> Self {
        PhpValue::Bool(value)
    }
}

impl From<i64> for PhpValue {
    fn from(value: i64) -> Self {
        PhpValue::Int(value)
    }
}

impl From<i32> for PhpValue {
    fn from(value: i32) -> Self {
        PhpValue::Int(value.into())
    }
}

impl From<u32> for PhpValue {
    fn from(value: u32) -> Self {
        PhpValue::Int(value.into())
    }
}

impl From<f64> for PhpValue {
    fn from(value: f64) -> Self {
        PhpValue::Float(value)
    }
}

impl From<&str> for PhpValue {
    fn from(value: &str) -> Self {
        PhpValue::String(value.to_owned())
    }
}

impl From<String> for PhpValue {
    fn from(value: String) -> Self {
        PhpValue::String(value)
    }
}

impl From<PhpMap> for PhpValue {
    fn from(value: PhpMap) -> Self {
        PhpValue::Map(value)
    }
}

impl<T: Into<PhpValue>> From<Option<T>> for PhpValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PhpValue::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// JSON boundary
// ---------------------------------------------------------------------------

impl TryFrom<serde_json::Value> for PhpValue {
    type Error = UnsupportedValueError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => PhpValue::Null,
            Value::Bool(b) => PhpValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PhpValue::Int(i),
                // PHP promotes integers past PHP_INT_MAX to float.
                None => PhpValue::Float(
                    n.as_f64()
                        .ok_or(UnsupportedValueError::new("non-finite number"))?,
                ),
            },
            Value::String(s) => PhpValue::String(s),
            Value::Array(_) => return Err(UnsupportedValueError::new("sequence")),
            Value::Object(map) => PhpValue::Map(PhpMap::try_from(map)?),
        })
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for PhpMap {
    type Error = UnsupportedValueError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut out = PhpMap::new();
        for (key, value) in map {
            out.insert(key, PhpValue::try_from(value)?);
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a value in PHP `serialize()` format.
pub fn serialize(value: &PhpValue) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(&mut out, value);
    out
}

/// Sort the map's keys ascending, then encode it as an associative array.
pub fn serialize_sorted(map: PhpMap) -> Vec<u8> {
    let mut out = Vec::new();
    write_map(&mut out, &map.sorted());
    out
}

fn write_value(out: &mut Vec<u8>, value: &PhpValue) {
    match value {
        PhpValue::Null => out.extend_from_slice(b"N;"),
        PhpValue::Bool(b) => out.extend_from_slice(if *b { b"b:1;" } else { b"b:0;" }),
        PhpValue::Int(i) => out.extend_from_slice(format!("i:{i};").as_bytes()),
        PhpValue::Float(f) => out.extend_from_slice(format!("d:{};", format_float(*f)).as_bytes()),
        PhpValue::String(s) => write_str(out, s),
        PhpValue::Map(map) => write_map(out, map),
    }
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(format!("s:{}:\"", s.len()).as_bytes());
    out.extend_from_slice(s.as_bytes());
    out.extend_from_slice(b"\";");
}

fn write_map(out: &mut Vec<u8>, map: &PhpMap) {
    out.extend_from_slice(format!("a:{}:{{", map.len()).as_bytes());
    for (key, value) in map.iter() {
        write_str(out, key);
        write_value(out, value);
    }
    out.push(b'}');
}

/// Largest decimal exponent PHP prints without switching to `E` notation
/// (`serialize_precision = -1` formats with 17 significant digits).
const MAX_PLAIN_DECPT: i32 = 17;
const MIN_PLAIN_DECPT: i32 = -3;

/// Format a float the way PHP does with `serialize_precision = -1`.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    // `{:e}` yields the shortest round-trippable digits, e.g. `-1.25e-7`.
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let decpt = exponent + 1;

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }

    if !(MIN_PLAIN_DECPT..=MAX_PLAIN_DECPT).contains(&decpt) {
        let (first, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "{first}.{rest}E{sign}{}", exponent.abs());
    } else if decpt <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', decpt.unsigned_abs() as usize));
        out.push_str(&digits);
    } else {
        let decpt = decpt as usize;
        if digits.len() <= decpt {
            out.push_str(&digits);
            out.extend(std::iter::repeat_n('0', decpt - digits.len()));
        } else {
            let (int_part, frac_part) = digits.split_at(decpt);
            let _ = write!(out, "{int_part}.{frac_part}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ser(value: impl Into<PhpValue>) -> String {
        String::from_utf8(serialize(&value.into())).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(ser(PhpValue::Null), "N;");
        assert_eq!(ser(true), "b:1;");
        assert_eq!(ser(false), "b:0;");
        assert_eq!(ser(42), "i:42;");
        assert_eq!(ser(-7i64), "i:-7;");
        assert_eq!(ser("abc"), r#"s:3:"abc";"#);
        assert_eq!(ser(""), r#"s:0:"";"#);
        assert_eq!(ser(None::<i64>), "N;");
    }

    #[test]
    fn test_string_length_counts_utf8_bytes() {
        assert_eq!(ser("Zoë"), "s:4:\"Zoë\";");
        assert_eq!(ser("say \"hi\""), r#"s:8:"say "hi"";"#);
    }

    #[test]
    fn test_floats() {
        assert_eq!(ser(0.5), "d:0.5;");
        assert_eq!(ser(1.0), "d:1;");
        assert_eq!(ser(-2.25), "d:-2.25;");
        assert_eq!(ser(0.1), "d:0.1;");
        assert_eq!(ser(11.99), "d:11.99;");
        assert_eq!(ser(0.0001), "d:0.0001;");
        assert_eq!(ser(0.00001), "d:1.0E-5;");
        assert_eq!(ser(1.5e-7), "d:1.5E-7;");
        assert_eq!(ser(1e15), "d:1000000000000000;");
        assert_eq!(ser(1e25), "d:1.0E+25;");
        assert_eq!(ser(-1.25e30), "d:-1.25E+30;");
        assert_eq!(ser(0.0), "d:0;");
        assert_eq!(ser(-0.0), "d:-0;");
        assert_eq!(ser(f64::NAN), "d:NAN;");
        assert_eq!(ser(f64::INFINITY), "d:INF;");
        assert_eq!(ser(f64::NEG_INFINITY), "d:-INF;");
    }

    #[test]
    fn test_map() {
        let map: PhpMap = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(ser(map), r#"a:2:{s:1:"a";i:1;s:1:"b";i:2;}"#);
        assert_eq!(ser(PhpMap::new()), "a:0:{}");
    }

    #[test]
    fn test_nested_map_keeps_inner_order() {
        let inner: PhpMap = [("z", PhpValue::Null), ("y", PhpValue::Bool(true))]
            .into_iter()
            .collect();
        let mut outer = PhpMap::new();
        outer.insert("b", inner);
        outer.insert("a", "x");

        let bytes = serialize_sorted(outer);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"a:2:{s:1:"a";s:1:"x";s:1:"b";a:2:{s:1:"z";N;s:1:"y";b:1;}}"#
        );
    }

    #[test]
    fn test_sorted_is_key_order_independent() {
        let forward: PhpMap = [("a", 1), ("b", 2)].into_iter().collect();
        let backward: PhpMap = [("b", 2), ("a", 1)].into_iter().collect();

        assert_ne!(serialize(&forward.clone().into()), serialize(&backward.clone().into()));
        assert_eq!(serialize_sorted(forward.clone()), serialize_sorted(backward));
        assert_eq!(serialize_sorted(forward.clone()), serialize(&forward.into()));
    }

    #[test]
    fn test_sort_is_bytewise() {
        let map: PhpMap = [("b", 1), ("B", 2), ("a_b", 3), ("a", 4), ("ab", 5)]
            .into_iter()
            .collect();
        let keys: Vec<_> = map.sorted().keys().map(str::to_owned).collect();
        assert_eq!(keys, ["B", "a", "a_b", "ab", "b"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map: PhpMap = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(map.insert("a", 3), Some(PhpValue::Int(1)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(map.remove("a"), Some(PhpValue::Int(3)));
        assert_eq!(map.remove("a"), None);
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "id": 7,
            "big": 18446744073709551615u64,
            "ratio": 0.25,
            "ok": true,
            "none": null,
            "name": "x",
            "nested": { "k": "v" }
        });
        let value = PhpValue::try_from(json).unwrap();
        let PhpValue::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map.get("id"), Some(&PhpValue::Int(7)));
        assert_eq!(map.get("big"), Some(&PhpValue::Float(18446744073709551615u64 as f64)));
        assert_eq!(map.get("ratio"), Some(&PhpValue::Float(0.25)));
        assert_eq!(map.get("none"), Some(&PhpValue::Null));
        assert!(matches!(map.get("nested"), Some(PhpValue::Map(_))));
    }

    #[test]
    fn test_from_json_keeps_object_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"z":{"b":1,"a":2},"y":"x"}"#).unwrap();
        let PhpValue::Map(map) = PhpValue::try_from(json).unwrap() else {
            panic!("expected map");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), ["z", "y"]);

        assert_eq!(
            String::from_utf8(serialize_sorted(map)).unwrap(),
            r#"a:2:{s:1:"y";s:1:"x";s:1:"z";a:2:{s:1:"b";i:1;s:1:"a";i:2;}}"#
        );
    }

    #[test]
    fn test_from_json_rejects_sequences() {
        let err = PhpValue::try_from(serde_json::json!({ "prices": ["USD:1"] })).unwrap_err();
        assert_eq!(err.kind(), "sequence");
    }
}
