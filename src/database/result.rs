//! Query result types shared by both backends.
//!
//! Backends convert their native values into [`CellValue`] before anything is
//! rendered. 64-bit and wider integers serialize as exact decimal strings so
//! they survive JSON consumers that parse every number as a double.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Materialized query result: column metadata plus rows in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Converts rows into column-name keyed maps.
    pub fn into_row_maps(self) -> Vec<RowMap> {
        let names: Vec<String> = self.columns.into_iter().map(|c| c.name).collect();
        self.rows
            .into_iter()
            .map(|row| names.iter().cloned().zip(row).collect())
            .collect()
    }
}

/// Column metadata as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// One result row keyed by column name. Keys serialize in sorted order.
pub type RowMap = BTreeMap<String, CellValue>;

/// Cell value produced by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    /// Integers of 32 bits or fewer, signed or unsigned.
    Int(i64),
    BigInt(i64),
    UBigInt(u64),
    HugeInt(i128),
    Float(f64),
    /// Fixed-point decimal kept in its exact textual form.
    Decimal(String),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<CellValue>),
    Struct(Vec<(String, CellValue)>),
    /// Map entries in backend order; keys need not be strings.
    Map(Vec<(CellValue, CellValue)>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Interprets booleans and case-insensitive `"true"`/`"false"` strings.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::UBigInt(n) => write!(f, "{n}"),
            Self::HugeInt(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Decimal(s) | Self::Text(s) => f.write_str(s),
            Self::Bytes(bytes) => f.write_str(&escape_bytes(bytes)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Struct(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{key}': {value}")?;
                }
                f.write_str("}")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::BigInt(n) => serializer.collect_str(n),
            Self::UBigInt(n) => serializer.collect_str(n),
            Self::HugeInt(n) => serializer.collect_str(n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Decimal(s) | Self::Text(s) => serializer.serialize_str(s),
            Self::Bytes(bytes) => serializer.serialize_str(&escape_bytes(bytes)),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key.to_string(), value)?;
                }
                map.end()
            }
        }
    }
}

/// Printable ASCII is kept, everything else becomes `\xHH`.
fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{b:02X}"));
        }
    }
    out
}

impl From<()> for CellValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        Self::BigInt(v)
    }
}

impl From<u64> for CellValue {
    fn from(v: u64) -> Self {
        Self::UBigInt(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_query_result_creation() {
        let columns = vec![Column::new("id", "INTEGER"), Column::new("name", "VARCHAR")];
        let rows = vec![vec![CellValue::Int(1), CellValue::from("test")]];

        let result = QueryResult::new(columns, rows);
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.columns.len(), 2);
    }

    #[test]
    fn test_cell_value_conversions() {
        let null: CellValue = ().into();
        assert!(null.is_null());

        let missing: CellValue = Option::<String>::None.into();
        assert!(missing.is_null());

        let string: CellValue = "hello".into();
        assert_eq!(string.as_str(), Some("hello"));

        assert_eq!(CellValue::from(7i32), CellValue::Int(7));
        assert_eq!(CellValue::from(7i64), CellValue::BigInt(7));
    }

    #[rstest]
    #[case(CellValue::BigInt(9_007_199_254_740_993), "\"9007199254740993\"")]
    #[case(CellValue::UBigInt(u64::MAX), "\"18446744073709551615\"")]
    #[case(CellValue::BigInt(-9_007_199_254_740_993), "\"-9007199254740993\"")]
    #[case(CellValue::HugeInt(170_141_183_460_469_231_731_687_303_715_884_105_727), "\"170141183460469231731687303715884105727\"")]
    fn test_wide_integers_serialize_exactly(#[case] value: CellValue, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&value).unwrap(), expected);
    }

    #[test]
    fn test_narrow_integers_stay_numeric() {
        assert_eq!(serde_json::to_string(&CellValue::Int(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&CellValue::Null).unwrap(), "null");
    }

    #[test]
    fn test_bigint_normalized_inside_nested_values() {
        let value = CellValue::Struct(vec![
            ("id".into(), CellValue::BigInt(9_007_199_254_740_993)),
            (
                "tags".into(),
                CellValue::List(vec![CellValue::UBigInt(1), CellValue::Null]),
            ),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["id"], "9007199254740993");
        assert_eq!(json["tags"][0], "1");
        assert!(json["tags"][1].is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Null.to_string(), "NULL");
        assert_eq!(CellValue::BigInt(9_007_199_254_740_993).to_string(), "9007199254740993");
        assert_eq!(
            CellValue::List(vec![CellValue::Int(1), CellValue::Null]).to_string(),
            "[1, NULL]"
        );
        assert_eq!(
            CellValue::Struct(vec![("a".into(), CellValue::from("x"))]).to_string(),
            "{'a': x}"
        );
        assert_eq!(CellValue::Bytes(vec![b'a', 0x00]).to_string(), "a\\x00");
    }

    #[rstest]
    #[case(CellValue::Bool(true), Some(true))]
    #[case(CellValue::from("TRUE"), Some(true))]
    #[case(CellValue::from("True"), Some(true))]
    #[case(CellValue::from("false"), Some(false))]
    #[case(CellValue::from("yes"), None)]
    #[case(CellValue::Null, None)]
    fn test_as_flag(#[case] value: CellValue, #[case] expected: Option<bool>) {
        assert_eq!(value.as_flag(), expected);
    }

    #[test]
    fn test_into_row_maps() {
        let result = QueryResult::new(
            vec![Column::new("b", "INT64"), Column::new("a", "STRING")],
            vec![vec![CellValue::BigInt(5), CellValue::from("x")]],
        );
        let maps = result.into_row_maps();
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0]["b"], CellValue::BigInt(5));
        let keys: Vec<_> = maps[0].keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_map_display_and_json() {
        let map = CellValue::Map(vec![
            (CellValue::from("a"), CellValue::Int(1)),
            (CellValue::Int(2), CellValue::BigInt(9_007_199_254_740_993)),
        ]);
        assert_eq!(map.to_string(), "{a=1, 2=9007199254740993}");
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            serde_json::json!({"a": 1, "2": "9007199254740993"})
        );
    }
}
