//! JSON record store persistence

use crate::record::{value_text, RecordStore, TaxRecord};
use crate::store::{write_atomic, StoreResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::io;
use std::path::Path;

const JSON_INDENT: &[u8] = b"    ";

/// Contents of the record store file
///
/// `unkeyed` holds entries whose `mst` is present but not a plain digit
/// string (a branch ID such as `0300-001`, for instance). They take no part
/// in merging and are written back unchanged on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredRecords {
    pub records: RecordStore,
    pub unkeyed: Vec<Value>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a> {
    Record(&'a TaxRecord),
    Raw(&'a Value),
}

impl Entry<'_> {
    fn sort_key(&self) -> (i64, String) {
        match self {
            Entry::Record(record) => (record.sort_key(), record.tax_id.to_string()),
            Entry::Raw(value) => {
                let stt = value.get("stt").map(value_text).unwrap_or_default();
                let mst = value.get("mst").map(value_text).unwrap_or_default();
                (TaxRecord::sort_key_of(&stt), mst)
            }
        }
    }
}

fn has_tax_id(entry: &Value) -> bool {
    match entry.get("mst") {
        None | Some(Value::Null) => false,
        Some(mst) => !value_text(mst).trim().is_empty(),
    }
}

/// Loads the record store file
///
/// A missing file is an empty store. So is a file that cannot be read or is
/// not a JSON array; that case is logged as an error. Entries without an
/// `mst` (missing, null or empty) are dropped. When a tax ID appears twice
/// the later entry wins.
pub fn load_stored(path: &Path) -> StoredRecords {
    let mut stored = StoredRecords::default();

    if !path.exists() {
        tracing::info!("No record store at {}, starting empty", path.display());
        return stored;
    }

    let entries: Vec<Value> = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Error loading record store {}: {}", path.display(), e);
            return stored;
        }
    };

    let mut dropped = 0;
    for entry in entries {
        if !has_tax_id(&entry) {
            dropped += 1;
            continue;
        }
        match serde_json::from_value::<TaxRecord>(entry.clone()) {
            Ok(record) => {
                stored.records.insert(record.tax_id.clone(), record);
            }
            Err(e) => {
                tracing::warn!("Keeping stored entry as-is: {}", e);
                stored.unkeyed.push(entry);
            }
        }
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} stored entries without a tax ID", dropped);
    }
    tracing::debug!(
        "Loaded {} records ({} kept as-is) from {}",
        stored.records.len(),
        stored.unkeyed.len(),
        path.display()
    );

    stored
}

/// Loads the record store, keyed by tax ID
///
/// Same as [`load_stored`] without the entries that carry no usable key.
pub fn load_records(path: &Path) -> RecordStore {
    load_stored(path).records
}

/// Saves records and kept-as-is entries as one pretty-printed JSON array
///
/// Entries are ascending by `stt` as an integer; non-numeric `stt` sorts
/// last. Ties are ordered by `mst` so output does not depend on hash order.
/// Non-ASCII text is written as-is. The write is atomic: on failure the
/// previous file is left untouched; the error is logged and returned.
///
/// # Returns
///
/// * `Ok(usize)` - Number of entries written
/// * `Err(StoreError)` - The file could not be written
pub fn save_stored(stored: &StoredRecords, path: &Path) -> StoreResult<usize> {
    write_entries(&stored.records, &stored.unkeyed, path)
}

/// Saves the store as a pretty-printed JSON array, atomically
pub fn save_records(store: &RecordStore, path: &Path) -> StoreResult<usize> {
    write_entries(store, &[], path)
}

fn write_entries(store: &RecordStore, unkeyed: &[Value], path: &Path) -> StoreResult<usize> {
    let mut entries: Vec<(i64, String, Entry<'_>)> = store
        .values()
        .map(Entry::Record)
        .chain(unkeyed.iter().map(Entry::Raw))
        .map(|entry| {
            let (key, tie) = entry.sort_key();
            (key, tie, entry)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    let entries: Vec<Entry<'_>> = entries.into_iter().map(|(_, _, entry)| entry).collect();

    let result = write_atomic(path, |writer| {
        let formatter = PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        entries.serialize(&mut serializer).map_err(io::Error::from)?;
        writer.flush()
    });

    match result {
        Ok(()) => {
            tracing::info!(
                "Record store saved with {} records to {}",
                entries.len(),
                path.display()
            );
            Ok(entries.len())
        }
        Err(e) => {
            tracing::error!("Error saving record store: {}", e);
            Err(e)
        }
    }
}
