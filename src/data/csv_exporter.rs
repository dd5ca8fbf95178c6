use crate::data::csv_loader::CsvOptions;
use crate::data::error::WriteError;
use crate::data::store::{Store, META_SOURCE_PATH};
use csv::{Terminator, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Writes Stores out as delimited text.
///
/// Unlike the loader, writing is strict: the field list comes from the first
/// record and every other record must have exactly that key set. The output
/// is fully rendered before anything touches the destination, so a failed
/// write leaves no partial file.
pub struct CsvExporter;

impl CsvExporter {
    /// Render the store to encoded bytes. `None` when the store is empty.
    pub fn render(store: &Store, options: &CsvOptions) -> Result<Option<Vec<u8>>, WriteError> {
        let Some(first) = store.records.first() else {
            return Ok(None);
        };

        let fields: Vec<String> = first.keys().map(str::to_string).collect();
        for (index, record) in store.records.iter().enumerate().skip(1) {
            if !record.has_same_keys(first) {
                return Err(WriteError::SchemaMismatch {
                    index,
                    expected: fields,
                    found: record.keys().map(str::to_string).collect(),
                });
            }
        }

        let mut writer = WriterBuilder::new()
            .delimiter(options.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(&fields)?;
        for record in &store.records {
            // Key sets were checked above, so every lookup succeeds
            writer.write_record(fields.iter().map(|f| record.get(f).unwrap_or_default()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| WriteError::Csv(csv::Error::from(e.into_error())))?;
        let text = String::from_utf8_lossy(&bytes);
        let encoded = options
            .encoding
            .encode(&text)
            .map_err(|c| WriteError::Unencodable {
                encoding: options.encoding.to_string(),
                text: c.to_string(),
            })?;

        Ok(Some(encoded))
    }

    /// Write the store to `path`, returning the number of records written
    pub fn write_path<P: AsRef<Path>>(
        store: &Store,
        path: P,
        options: &CsvOptions,
    ) -> Result<usize, WriteError> {
        let path = path.as_ref();
        let Some(bytes) = Self::render(store, options)? else {
            warn!("No data to write to {}", path.display());
            return Ok(0);
        };

        fs::write(path, bytes).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Written {} rows to {}", store.len(), path.display());
        Ok(store.len())
    }

    /// Write the store to any writer
    pub fn write_to<W: Write>(
        store: &Store,
        mut destination: W,
        options: &CsvOptions,
    ) -> Result<usize, WriteError> {
        let Some(bytes) = Self::render(store, options)? else {
            warn!("No data to write for '{}'", store.name);
            return Ok(0);
        };

        destination
            .write_all(&bytes)
            .and_then(|_| destination.flush())
            .map_err(|source| WriteError::Io {
                path: PathBuf::from(&store.name),
                source,
            })?;
        Ok(store.len())
    }

    /// Write the store back to the file it was loaded from
    pub fn write_back(store: &Store, options: &CsvOptions) -> Result<usize, WriteError> {
        let path = store
            .metadata
            .get(META_SOURCE_PATH)
            .ok_or_else(|| WriteError::NoDestination(store.name.clone()))?;
        Self::write_path(store, path, options)
    }
}
