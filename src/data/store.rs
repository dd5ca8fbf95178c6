use crate::data::record::{Header, Record};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Metadata keys written by the loaders
pub const META_SOURCE_TYPE: &str = "source_type";
pub const META_SOURCE_PATH: &str = "source_path";
pub const META_ROWS_DROPPED: &str = "rows_dropped";

/// A header plus an ordered sequence of records.
///
/// Records produced by the CSV reader always carry exactly the header's
/// columns. Column mutation and joins may make records diverge from it, after
/// which the header is only advisory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub name: String,
    pub header: Header,
    pub records: Vec<Record>,
    pub metadata: HashMap<String, String>,
}

impl Store {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_header(name: impl Into<String>, header: Header) -> Self {
        Self {
            name: name.into(),
            header,
            ..Self::default()
        }
    }

    /// Derive a new store that shares this one's header, name and metadata
    pub fn derive(&self, records: Vec<Record>) -> Self {
        Self {
            name: self.name.clone(),
            header: self.header.clone(),
            records,
            metadata: self.metadata.clone(),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.header.names().to_vec()
    }

    /// Set `column` to `default` on every record, appending it where missing
    pub fn add_column(&mut self, column: &str, default: &str) {
        for record in &mut self.records {
            record.insert(column, default);
        }
        self.header.push(column);
        debug!(
            "Store '{}': added column '{}' to {} records",
            self.name,
            column,
            self.records.len()
        );
    }

    /// Rewrite `column` through `update` on the records that already have it.
    ///
    /// Records without the column are left alone; the column is not created.
    pub fn update_column<F>(&mut self, column: &str, update: F) -> usize
    where
        F: Fn(&str) -> String,
    {
        let mut updated = 0;
        for record in &mut self.records {
            if let Some(value) = record.get_mut(column) {
                *value = update(value.as_str());
                updated += 1;
            }
        }
        debug!(
            "Store '{}': updated {} values in column '{}'",
            self.name, updated, column
        );
        updated
    }

    /// Remove `column` from every record and from the header
    pub fn delete_column(&mut self, column: &str) -> usize {
        let mut removed = 0;
        for record in &mut self.records {
            if record.remove(column).is_some() {
                removed += 1;
            }
        }
        self.header.remove(column);
        debug!(
            "Store '{}': deleted column '{}' from {} records",
            self.name, column, removed
        );
        removed
    }

    /// Distinct present values of `column`, in order of first appearance
    pub fn unique_values(&self, column: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(|r| r.get(column))
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }

    /// Generate a debug dump string for display
    pub fn debug_dump(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Store: {}\n", self.name));
        output.push_str(&format!(
            "Rows: {} | Columns: {}\n",
            self.len(),
            self.header.len()
        ));
        output.push_str(&format!("Header: {}\n", self.header.names().join(", ")));

        if !self.metadata.is_empty() {
            let mut keys: Vec<_> = self.metadata.keys().collect();
            keys.sort();
            output.push_str("Metadata:\n");
            for key in keys {
                output.push_str(&format!("  {}: {}\n", key, self.metadata[key]));
            }
        }

        for (idx, record) in self.records.iter().take(5).enumerate() {
            output.push_str(&format!("  [{}] {}\n", idx, record));
        }
        if self.len() > 5 {
            output.push_str(&format!("  ... {} more rows\n", self.len() - 5));
        }

        output
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
