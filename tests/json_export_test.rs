use serde_json::json;
use std::fs;
use tabkit::data::json_bridge::{export_json, import_json};
use tabkit::data::store::META_SOURCE_PATH;
use tabkit::{from_tree, to_tree, CsvLoader, CsvOptions, Record, Store};
use tempfile::tempdir;

#[test]
fn test_export_and_import_preserve_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("people.json");

    let mut store = CsvLoader::read_from(
        "name,salary\nAlice,75000\nBob,65000\n".as_bytes(),
        "people",
        &CsvOptions::default(),
    );
    store.add_column("bonus", "0");
    store.records[1].insert("note", "late joiner");

    assert_eq!(export_json(&store, &path, 2).unwrap(), 2);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n  {\n    \"name\": \"Alice\""));

    let loaded = import_json(&path);
    assert_eq!(loaded.name, "people");
    assert_eq!(loaded.header.names(), &["name", "salary", "bonus"]);
    assert_eq!(loaded.records, store.records);
    assert_eq!(
        loaded.metadata.get(META_SOURCE_PATH).map(String::as_str),
        Some(path.display().to_string().as_str())
    );
}

#[test]
fn test_import_numbers_as_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("numbers.json");
    fs::write(&path, r#"[{"id": 1, "price": 9.5}, {"id": 2, "price": 10}]"#).unwrap();

    let store = import_json(&path);
    assert_eq!(store.records[0].get("price"), Some("9.5"));
    assert_eq!(store.records[1].get("id"), Some("2"));
}

#[test]
fn test_import_failures_yield_empty_store() {
    let dir = tempdir().unwrap();

    let missing = import_json(dir.path().join("missing.json"));
    assert!(missing.is_empty());

    let not_array = dir.path().join("object.json");
    fs::write(&not_array, r#"{"a": 1}"#).unwrap();
    assert!(import_json(&not_array).is_empty());

    let malformed = dir.path().join("broken.json");
    fs::write(&malformed, "[{").unwrap();
    assert!(import_json(&malformed).is_empty());
}

#[test]
fn test_tree_round_trip_for_mutated_store() {
    let mut store = Store::new("mixed");
    store.push(Record::from_pairs([("a", "1"), ("b", "2")]));
    store.push(Record::from_pairs([("b", "3"), ("c", "4")]));

    let tree = to_tree(&store);
    assert_eq!(tree[1], json!({"b": "3", "c": "4"}));

    let back = from_tree(&tree).unwrap();
    assert_eq!(back.header.names(), &["a", "b"]);
    assert_eq!(back.records, store.records);
}

#[test]
fn test_replace_store_contents_from_tree() {
    let mut store = CsvLoader::read_from("x\n1\n".as_bytes(), "t", &CsvOptions::default());
    store
        .replace_from_tree(&[json!({"y": "a"}), json!({"y": "b"})])
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.header.names(), &["y"]);
}
