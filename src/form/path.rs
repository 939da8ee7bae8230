//! Dot-path addressing into the form values record
//!
//! `object_element.obj1` names a key inside a nested object and
//! `array_element.0.input` names a key inside the first entry of a list.

use super::errors::FormError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Parsed dot path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, FormError> {
        if path.is_empty() {
            return Err(FormError::InvalidPath(path.to_string()));
        }
        let segments = path
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    Err(FormError::InvalidPath(path.to_string()))
                } else if let Ok(index) = part.parse::<usize>() {
                    Ok(Segment::Index(index))
                } else {
                    Ok(Segment::Key(part.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Append a segment, producing a child path
    pub fn join(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Look up the value at this path
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key),
                (Segment::Index(index), Value::Array(items)) => items.get(*index),
                (Segment::Index(index), Value::Object(map)) => map.get(&index.to_string()),
                _ => None,
            })
    }

    /// Store a value at this path, creating intermediate objects on the way.
    ///
    /// An index equal to the list length appends; anything further is an
    /// error, as is descending through a scalar.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), FormError> {
        let mut current = root;
        let last = self.segments.len() - 1;
        for (position, segment) in self.segments.iter().enumerate() {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            let is_last = position == last;
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => {
                    if is_last {
                        map.insert(key.clone(), value);
                        return Ok(());
                    }
                    map.entry(key.clone()).or_insert(Value::Null)
                }
                (Segment::Index(index), Value::Object(map)) => {
                    let key = index.to_string();
                    if is_last {
                        map.insert(key, value);
                        return Ok(());
                    }
                    map.entry(key).or_insert(Value::Null)
                }
                (Segment::Index(index), Value::Array(items)) => {
                    let len = items.len();
                    if *index > len {
                        return Err(FormError::IndexOutOfBounds {
                            path: self.to_string(),
                            index: *index,
                            len,
                        });
                    }
                    if *index == len {
                        items.push(Value::Null);
                    }
                    if is_last {
                        items[*index] = value;
                        return Ok(());
                    }
                    &mut items[*index]
                }
                _ => return Err(FormError::InvalidPath(self.to_string())),
            };
        }
        Ok(())
    }

    /// Mutable access to the list stored at this path
    pub fn list_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Vec<Value>, FormError> {
        let mut current = root;
        for segment in &self.segments {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get_mut(key),
                (Segment::Index(index), Value::Array(items)) => items.get_mut(*index),
                (Segment::Index(index), Value::Object(map)) => map.get_mut(&index.to_string()),
                _ => None,
            }
            .ok_or_else(|| FormError::NotAList {
                path: self.to_string(),
            })?;
        }
        match current {
            Value::Array(items) => Ok(items),
            _ => Err(FormError::NotAList {
                path: self.to_string(),
            }),
        }
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Join a prefix and a field name with a dot, skipping an empty prefix
pub fn join_path(prefix: &str, name: impl fmt::Display) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Re-address a path after the entry at `removed` was taken out of the list
/// at `list`. Paths inside the removed entry map to `None`; paths in later
/// entries move down by one.
pub fn shift_after_remove(path: &str, list: &str, removed: usize) -> Option<String> {
    let Some(rest) = path
        .strip_prefix(list)
        .and_then(|rest| rest.strip_prefix('.'))
    else {
        return Some(path.to_string());
    };
    let (index_part, tail) = match rest.split_once('.') {
        Some((index, tail)) => (index, Some(tail)),
        None => (rest, None),
    };
    let Ok(index) = index_part.parse::<usize>() else {
        return Some(path.to_string());
    };
    if index == removed {
        return None;
    }
    let new_index = if index > removed { index - 1 } else { index };
    let shifted = join_path(list, new_index);
    Some(match tail {
        Some(tail) => format!("{shifted}.{tail}"),
        None => shifted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod parsing {
        use super::*;

        #[test]
        fn test_parse_simple_key() {
            let path = FieldPath::parse("select").unwrap();
            assert_eq!(path.segments(), &[Segment::Key("select".to_string())]);
        }

        #[test]
        fn test_parse_nested_with_index() {
            let path = FieldPath::parse("array_element.2.input").unwrap();
            assert_eq!(
                path.segments(),
                &[
                    Segment::Key("array_element".to_string()),
                    Segment::Index(2),
                    Segment::Key("input".to_string()),
                ]
            );
        }

        #[test]
        fn test_parse_rejects_empty_segments() {
            assert!(FieldPath::parse("").is_err());
            assert!(FieldPath::parse("a..b").is_err());
            assert!(FieldPath::parse(".a").is_err());
        }

        #[test]
        fn test_display_round_trips() {
            let path: FieldPath = "object_element.obj1".parse().unwrap();
            assert_eq!(path.to_string(), "object_element.obj1");
        }
    }

    mod access {
        use super::*;

        #[test]
        fn test_get_nested_value() {
            let values = json!({"object_element": {"obj1": "a"}, "list": [{"x": 1}]});
            let path = FieldPath::parse("object_element.obj1").unwrap();
            assert_eq!(path.get(&values), Some(&json!("a")));
            let path = FieldPath::parse("list.0.x").unwrap();
            assert_eq!(path.get(&values), Some(&json!(1)));
        }

        #[test]
        fn test_get_missing_returns_none() {
            let values = json!({"a": "b"});
            assert!(FieldPath::parse("a.b").unwrap().get(&values).is_none());
            assert!(FieldPath::parse("missing").unwrap().get(&values).is_none());
        }

        #[test]
        fn test_set_creates_intermediate_objects() {
            let mut values = json!({});
            FieldPath::parse("a.b.c")
                .unwrap()
                .set(&mut values, json!(true))
                .unwrap();
            assert_eq!(values, json!({"a": {"b": {"c": true}}}));
        }

        #[test]
        fn test_set_inside_list_entry() {
            let mut values = json!({"list": [{"input": ""}]});
            FieldPath::parse("list.0.input")
                .unwrap()
                .set(&mut values, json!("hi"))
                .unwrap();
            assert_eq!(values, json!({"list": [{"input": "hi"}]}));
        }

        #[test]
        fn test_set_at_list_end_appends() {
            let mut values = json!({"list": []});
            FieldPath::parse("list.0")
                .unwrap()
                .set(&mut values, json!(1))
                .unwrap();
            assert_eq!(values, json!({"list": [1]}));
        }

        #[test]
        fn test_set_past_list_end_fails() {
            let mut values = json!({"list": []});
            let result = FieldPath::parse("list.3").unwrap().set(&mut values, json!(1));
            assert!(matches!(
                result,
                Err(FormError::IndexOutOfBounds { index: 3, len: 0, .. })
            ));
        }

        #[test]
        fn test_set_through_scalar_fails() {
            let mut values = json!({"a": "text"});
            let result = FieldPath::parse("a.b").unwrap().set(&mut values, json!(1));
            assert!(matches!(result, Err(FormError::InvalidPath(_))));
        }

        #[test]
        fn test_list_mut_requires_array() {
            let mut values = json!({"a": "text", "list": [1, 2]});
            assert!(FieldPath::parse("a").unwrap().list_mut(&mut values).is_err());
            assert!(FieldPath::parse("nope").unwrap().list_mut(&mut values).is_err());
            let list = FieldPath::parse("list").unwrap().list_mut(&mut values).unwrap();
            assert_eq!(list.len(), 2);
        }
    }

    mod shifting {
        use super::*;

        #[test]
        fn test_paths_in_removed_entry_are_dropped() {
            assert_eq!(shift_after_remove("items.1.name", "items", 1), None);
            assert_eq!(shift_after_remove("items.1", "items", 1), None);
        }

        #[test]
        fn test_later_entries_move_down() {
            assert_eq!(
                shift_after_remove("items.3.name", "items", 1),
                Some("items.2.name".to_string())
            );
        }

        #[test]
        fn test_earlier_entries_and_other_paths_are_kept() {
            assert_eq!(
                shift_after_remove("items.0.name", "items", 1),
                Some("items.0.name".to_string())
            );
            assert_eq!(
                shift_after_remove("itemsx.3", "items", 1),
                Some("itemsx.3".to_string())
            );
            assert_eq!(shift_after_remove("other", "items", 0), Some("other".to_string()));
        }
    }
}
