/// Store <-> JSON tree conversion
///
/// Export keeps each record's own key order (records changed by column
/// mutation or joins may not match the header). Import takes the header from
/// the first object and stores later objects as they are.
use crate::data::error::TreeError;
use crate::data::record::{Header, Record};
use crate::data::store::{Store, META_SOURCE_PATH, META_SOURCE_TYPE};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value as JsonValue};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// One JSON object per record, values as strings
pub fn to_tree(store: &Store) -> Vec<JsonValue> {
    store
        .records
        .iter()
        .map(|record| {
            let object: Map<String, JsonValue> = record
                .iter()
                .map(|(k, v)| (k.to_string(), JsonValue::String(v.to_string())))
                .collect();
            JsonValue::Object(object)
        })
        .collect()
}

/// Build a Store from a sequence of JSON objects
pub fn from_tree(elements: &[JsonValue]) -> Result<Store, TreeError> {
    let mut store = Store::new("json");
    store
        .metadata
        .insert(META_SOURCE_TYPE.to_string(), "json".to_string());

    for (index, element) in elements.iter().enumerate() {
        let object = element
            .as_object()
            .ok_or(TreeError::NotAnObject { index })?;
        let record: Record = object
            .iter()
            .map(|(k, v)| (k.as_str(), scalar_text(v)))
            .collect();
        store.push(record);
    }

    if let Some(first) = store.records.first() {
        // JSON object keys are already unique
        store.header = Header::new(first.keys()).unwrap_or_default();
    }
    Ok(store)
}

/// Text form of a JSON value as stored in a cell
fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}

impl Store {
    /// Replace header and records with the contents of a JSON tree.
    ///
    /// The store's name is kept. On error the store is left untouched.
    pub fn replace_from_tree(&mut self, elements: &[JsonValue]) -> Result<(), TreeError> {
        let loaded = from_tree(elements)?;
        self.header = loaded.header;
        self.records = loaded.records;
        self.metadata
            .insert(META_SOURCE_TYPE.to_string(), "json".to_string());
        Ok(())
    }
}

/// Pretty-print the store as a JSON array using `indent` spaces per level
pub fn to_json_string(store: &Store, indent: usize) -> Result<String, TreeError> {
    let indent = vec![b' '; indent];
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&indent));
    store.records.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the store to `path` as a JSON array, returning the record count
pub fn export_json<P: AsRef<Path>>(
    store: &Store,
    path: P,
    indent: usize,
) -> Result<usize, TreeError> {
    let path = path.as_ref();
    let text = to_json_string(store, indent)?;
    fs::write(path, text).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Data exported to JSON: {} ({} rows)", path.display(), store.len());
    Ok(store.len())
}

/// Load a JSON array of objects from `path`.
///
/// Like the CSV loader this never fails: unreadable or malformed input gives
/// an empty Store and a warning.
pub fn import_json<P: AsRef<Path>>(path: P) -> Store {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());

    let mut store = match read_tree(path).and_then(|tree| from_tree(&tree)) {
        Ok(store) => {
            info!("Loaded {} rows from JSON: {}", store.len(), path.display());
            store
        }
        Err(e) => {
            warn!("Error loading from JSON {}: {}", path.display(), e);
            let mut empty = Store::new(&name);
            empty
                .metadata
                .insert(META_SOURCE_TYPE.to_string(), "json".to_string());
            empty
        }
    };

    store.name = name;
    store
        .metadata
        .insert(META_SOURCE_PATH.to_string(), path.display().to_string());
    store
}

fn read_tree(path: &Path) -> Result<Vec<JsonValue>, TreeError> {
    let file = File::open(path).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tree: JsonValue = serde_json::from_reader(BufReader::new(file))?;
    match tree {
        JsonValue::Array(elements) => Ok(elements),
        _ => Err(TreeError::NotAnArray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_tree_uses_record_key_order() {
        let mut store = Store::with_header("t", Header::new(["a", "b"]).unwrap());
        store.push(Record::from_pairs([("b", "2"), ("a", "1")]));
        store.push(Record::from_pairs([("a", "3"), ("extra", "x")]));

        let tree = to_tree(&store);
        let keys: Vec<Vec<&str>> = tree
            .iter()
            .map(|v| v.as_object().unwrap().keys().map(String::as_str).collect())
            .collect();
        assert_eq!(keys, vec![vec!["b", "a"], vec!["a", "extra"]]);
        assert_eq!(tree[0]["b"], json!("2"));
    }

    #[test]
    fn test_from_tree_header_from_first_element() {
        let tree = vec![
            json!({"name": "Alice", "age": 30}),
            json!({"name": "Bob", "city": "LA", "active": true, "note": null}),
        ];
        let store = from_tree(&tree).unwrap();
        assert_eq!(store.header.names(), &["name", "age"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.records[0].get("age"), Some("30"));
        assert_eq!(store.records[1].get("city"), Some("LA"));
        assert_eq!(store.records[1].get("active"), Some("true"));
        assert_eq!(store.records[1].get("note"), Some(""));
    }

    #[test]
    fn test_nested_values_become_json_text() {
        let store = from_tree(&[json!({"tags": ["a", "b"]})]).unwrap();
        assert_eq!(store.records[0].get("tags"), Some(r#"["a","b"]"#));
    }

    #[test]
    fn test_from_tree_rejects_non_objects() {
        let err = from_tree(&[json!({"a": 1}), json!(3)]).unwrap_err();
        assert!(matches!(err, TreeError::NotAnObject { index: 1 }));
    }

    #[test]
    fn test_tree_round_trip() {
        let mut store = Store::new("t");
        store.push(Record::from_pairs([("z", "1"), ("y", "two")]));
        let back = from_tree(&to_tree(&store)).unwrap();
        assert_eq!(back.records, store.records);
    }

    #[test]
    fn test_replace_from_tree_keeps_name() {
        let mut store = Store::new("people");
        store.push(Record::from_pairs([("old", "1")]));
        store
            .replace_from_tree(&[json!({"new": "2"})])
            .unwrap();
        assert_eq!(store.name, "people");
        assert_eq!(store.header.names(), &["new"]);
        assert_eq!(store.records, vec![Record::from_pairs([("new", "2")])]);
    }

    #[test]
    fn test_indent_width() {
        let mut store = Store::new("t");
        store.push(Record::from_pairs([("a", "1")]));
        assert_eq!(
            to_json_string(&store, 4).unwrap(),
            "[\n    {\n        \"a\": \"1\"\n    }\n]"
        );
    }
}
