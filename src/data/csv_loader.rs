/// Delimited text to Store loader
///
/// The read path never fails: an unreadable source yields an empty Store and
/// rows whose width disagrees with the header are dropped. Both situations
/// are reported through `tracing`.
use crate::data::record::{Header, Record};
use crate::data::store::{Store, META_ROWS_DROPPED, META_SOURCE_PATH, META_SOURCE_TYPE};
use crate::data::text_encoding::TextEncoding;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Dialect settings shared by the reader and the writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub encoding: TextEncoding,
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: TextEncoding::Utf8,
            has_header: true,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

pub struct CsvLoader;

impl CsvLoader {
    /// Load a delimited file into a Store named after the file stem
    pub fn read_path<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Store {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "csv".to_string());

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Source unavailable: cannot open {}: {}", path.display(), e);
                return Self::empty(&name, Some(path));
            }
        };

        let mut store = Self::read_from(file, &name, options);
        store
            .metadata
            .insert(META_SOURCE_PATH.to_string(), path.display().to_string());
        store
    }

    /// Load delimited text from any reader.
    ///
    /// Blank lines are skipped by the tokenizer before width checking, so they
    /// are neither records nor dropped rows: they produce no warning and do not
    /// count towards `rows_dropped`.
    pub fn read_from<R: Read>(mut source: R, name: &str, options: &CsvOptions) -> Store {
        let mut bytes = Vec::new();
        if let Err(e) = source.read_to_end(&mut bytes) {
            warn!("Source unavailable: read of '{}' failed: {}", name, e);
            return Self::empty(name, None);
        }

        let Some(text) = options.encoding.decode(bytes) else {
            warn!(
                "Source unavailable: '{}' is not valid {}",
                name, options.encoding
            );
            return Self::empty(name, None);
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            match result {
                Ok(record) => rows.push(record.iter().map(str::to_string).collect::<Vec<_>>()),
                Err(e) => {
                    warn!("Source unavailable: '{}' could not be tokenized: {}", name, e);
                    return Self::empty(name, None);
                }
            }
        }

        let store = if options.has_header {
            Self::build_with_header(name, rows)
        } else {
            Self::build_synthetic(name, rows)
        };

        info!(
            "Loaded {} rows from '{}' ({} columns)",
            store.len(),
            name,
            store.header.len()
        );
        store
    }

    fn build_with_header(name: &str, rows: Vec<Vec<String>>) -> Store {
        let mut rows = rows.into_iter();
        let Some(header_row) = rows.next() else {
            debug!("'{}' is empty, no header row", name);
            return Self::empty(name, None);
        };

        let header = match Header::new(header_row) {
            Ok(header) => header,
            Err(e) => {
                warn!("Source unavailable: '{}' has an invalid header: {}", name, e);
                return Self::empty(name, None);
            }
        };

        let mut store = Self::empty(name, None);
        let mut dropped = 0usize;
        for (line, row) in rows.enumerate() {
            if row.len() != header.len() {
                // Line numbers are 1-based and count the header row
                warn!(
                    "Skipping row {} of '{}' with mismatched columns: expected {}, found {}: {:?}",
                    line + 2,
                    name,
                    header.len(),
                    row.len(),
                    row
                );
                dropped += 1;
                continue;
            }
            store.push(header.iter().zip(row).collect());
        }

        store.header = header;
        store
            .metadata
            .insert(META_ROWS_DROPPED.to_string(), dropped.to_string());
        store
    }

    fn build_synthetic(name: &str, rows: Vec<Vec<String>>) -> Store {
        let mut store = Self::empty(name, None);
        let mut widest = 0;
        for row in rows {
            widest = widest.max(row.len());
            let record: Record = row
                .into_iter()
                .enumerate()
                .map(|(i, value)| (format!("column_{}", i), value))
                .collect();
            store.push(record);
        }
        store.header = Header::synthetic(widest);
        store
            .metadata
            .insert(META_ROWS_DROPPED.to_string(), "0".to_string());
        store
    }

    fn empty(name: &str, path: Option<&Path>) -> Store {
        let mut store = Store::new(name);
        store
            .metadata
            .insert(META_SOURCE_TYPE.to_string(), "csv".to_string());
        if let Some(path) = path {
            store
                .metadata
                .insert(META_SOURCE_PATH.to_string(), path.display().to_string());
        }
        store
    }
}
