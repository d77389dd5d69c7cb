//! YAML output with sorted mapping keys.
//!
//! Mappings are emitted with their keys sorted numerically when every key is
//! a number, and by the text of the keys otherwise. Nested mappings and
//! sequences are sorted the same way.

use std::cmp::Ordering;

use itertools::Itertools;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::Result;

/// Serializes `value` to YAML with sorted mapping keys.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as YAML.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value = sort_value(serde_yaml::to_value(value)?);
    Ok(serde_yaml::to_string(&value)?)
}

/// Returns `value` with the keys of every mapping in it sorted.
pub fn sort_value(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(sort_mapping(mapping)),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(sort_value).collect()),
        other => other,
    }
}

fn sort_mapping(mapping: Mapping) -> Mapping {
    let numeric = mapping.keys().all(Value::is_number);
    let entries = mapping
        .into_iter()
        .map(|(key, value)| (key, sort_value(value)));

    if numeric {
        entries
            .sorted_by(|(left, _), (right, _)| compare_numbers(left, right))
            .collect()
    } else {
        entries.sorted_by_key(|(key, _)| key_text(key)).collect()
    }
}

fn integer(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

fn compare_numbers(left: &Value, right: &Value) -> Ordering {
    if let (Some(left), Some(right)) = (integer(left), integer(right)) {
        return left.cmp(&right);
    }

    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

fn key_text(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_numeric_keys_sorted_numerically() {
        let table: HashMap<i64, i64> = HashMap::from([(2, 2), (4, 4), (11, 1), (33, 3)]);
        assert_eq!(to_string(&table).unwrap(), "2: 2\n4: 4\n11: 1\n33: 3\n");
    }

    #[test]
    fn test_large_integer_keys_sorted_exactly() {
        let table: HashMap<u64, &str> = HashMap::from([
            (9_007_199_254_740_993, "b"),
            (9_007_199_254_740_992, "a"),
            (u64::MAX, "c"),
            (1, "z"),
        ]);
        assert_eq!(
            to_string(&table).unwrap(),
            "1: z\n9007199254740992: a\n9007199254740993: b\n18446744073709551615: c\n"
        );
    }

    #[test]
    fn test_float_keys_sorted_numerically() {
        let mut mapping = Mapping::new();
        mapping.insert(Value::from(2.5), Value::from("b"));
        mapping.insert(Value::from(-1), Value::from("a"));
        mapping.insert(Value::from(10), Value::from("c"));
        assert_eq!(to_string(&mapping).unwrap(), "-1: a\n2.5: b\n10: c\n");
    }

    #[test]
    fn test_mixed_keys_sorted_lexicographically() {
        let mut mapping = Mapping::new();
        mapping.insert(Value::from("11"), Value::from(1));
        mapping.insert(Value::from(2), Value::from(2));
        mapping.insert(Value::from(33), Value::from(3));
        mapping.insert(Value::from(4), Value::from(4));
        assert_eq!(
            to_string(&mapping).unwrap(),
            "'11': 1\n2: 2\n33: 3\n4: 4\n"
        );
    }

    #[test]
    fn test_nested_mappings_sorted() {
        let table: HashMap<&str, HashMap<&str, i32>> = HashMap::from([
            ("b", HashMap::from([("y", 1), ("x", 2)])),
            ("a", HashMap::from([("z", 3)])),
        ]);
        assert_eq!(
            to_string(&table).unwrap(),
            "a:\n  z: 3\nb:\n  x: 2\n  y: 1\n"
        );
    }

    #[test]
    fn test_sequences_keep_order() {
        let items = vec![HashMap::from([("b", 1), ("a", 2)])];
        assert_eq!(to_string(&items).unwrap(), "- a: 2\n  b: 1\n");
    }
}
