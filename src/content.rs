//! Building file content from `key:value` lines or an existing JSON document.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Split `key:value` on the first `:`, trimming both halves.
///
/// ```
/// assert_eq!(
///     ghup::parse_pair(" env : dev:eu ").unwrap(),
///     ("env".to_string(), "dev:eu".to_string())
/// );
/// ```
pub fn parse_pair(line: &str) -> Result<(String, String)> {
    let (k, v) = line
        .split_once(':')
        .ok_or_else(|| Error::InvalidInput(format!("'{}' is not in key:value form", line)))?;
    let key = k.trim();
    if key.is_empty() {
        return Err(Error::InvalidInput(format!("'{}' has an empty key", line)));
    }
    Ok((key.to_string(), v.trim().to_string()))
}

/// Collect pairs into a JSON object of strings, in the order given.
/// A repeated key keeps its first position and takes the last value.
pub fn object_from_pairs<I>(pairs: I) -> Value
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert(k, Value::String(v));
    }
    Value::Object(map)
}

/// Parse `bytes` as JSON, so that a file read from disk is validated before upload.
pub fn parse_json(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::InvalidInput(format!("content is not valid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn pair_splits_on_first_colon() {
        let (k, v) = parse_pair("url:https://example.com").unwrap();
        assert_eq!(k, "url");
        assert_eq!(v, "https://example.com");
    }

    #[test]
    fn pair_allows_empty_value() {
        assert_eq!(parse_pair("flag:").unwrap(), ("flag".into(), String::new()));
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        for line in ["novalue", ":value", "  : x", ""] {
            assert_eq!(
                parse_pair(line).unwrap_err().kind(),
                ErrorKind::InvalidInput,
                "{:?}",
                line
            );
        }
    }

    #[test]
    fn object_keeps_insertion_order() {
        let v = object_from_pairs(vec![
            ("zeta".to_string(), "1".to_string()),
            ("alpha".to_string(), "2".to_string()),
            ("zeta".to_string(), "3".to_string()),
        ]);
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(v["zeta"], "3");
    }

    #[test]
    fn parse_json_reports_invalid_input() {
        assert!(parse_json(br#"{"a": [1, 2]}"#).is_ok());
        assert_eq!(
            parse_json(b"{not json").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }
}
