//! Entry-by-entry decoding for stored lists.
//!
//! One unreadable entry is logged and skipped. The rest of the list loads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode each value on its own, dropping the ones that fail.
pub fn parse_entries<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|v| match serde_json::from_value(v.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("ignoring stored entry {}: {}", v, e);
                None
            }
        })
        .collect()
}

/// `deserialize_with` helper. A missing or null list is empty.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(parse_entries(raw.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Doc {
        #[serde(default, deserialize_with = "lenient_vec")]
        colors: Vec<Color>,
    }

    #[test]
    fn test_bad_entries_skipped() {
        let colors: Vec<Color> = parse_entries(vec![json!("#ff0000"), json!("navy"), json!(7), json!("#00ff00")]);
        assert_eq!(colors, vec![Color::from_rgb(255, 0, 0), Color::from_rgb(0, 255, 0)]);
    }

    #[test]
    fn test_null_and_missing_lists() {
        let doc: Doc = serde_json::from_value(json!({"colors": null})).unwrap();
        assert!(doc.colors.is_empty());
        let doc: Doc = serde_json::from_value(json!({})).unwrap();
        assert!(doc.colors.is_empty());
        let doc: Doc = serde_json::from_value(json!({"colors": ["#3366cc", "nope"]})).unwrap();
        assert_eq!(doc.colors, vec![Color::from_rgb(51, 102, 204)]);
    }
}
