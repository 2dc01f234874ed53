// Cumulative result log (load-or-initialize, append, persist)
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::IterationRecord;
use crate::error::{AppError, Result};
use crate::port::{EventSink, ResultStore, VerificationEvent};

/// Key holding the ordered record sequence
pub const ITERATIONS_KEY: &str = "iterations";

/// Appends iteration records to a `ResultStore`
///
/// The document is re-read and fully rewritten on every append. A missing,
/// unparsable or structurally invalid document is replaced by an empty one
/// instead of failing; only read/write I/O errors propagate.
pub struct ResultRecorder {
    store: Arc<dyn ResultStore>,
    events: Arc<dyn EventSink>,
}

impl ResultRecorder {
    pub fn new(store: Arc<dyn ResultStore>, events: Arc<dyn EventSink>) -> Self {
        Self { store, events }
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Append one record at the end of the sequence
    ///
    /// # Returns
    /// Number of entries in the store after the append
    ///
    /// # Errors
    /// - `AppError::Domain` if the record breaks its own invariants
    /// - `AppError::Store` if the document cannot be read or written
    pub async fn append(&self, record: &IterationRecord) -> Result<usize> {
        record.validate()?;

        let mut document = match self.load_document().await? {
            Ok(document) => document,
            Err(reason) => {
                self.events.emit(&VerificationEvent::StoreReinitialized {
                    location: self.store.location(),
                    reason,
                });
                empty_document()
            }
        };
        let total = {
            let iterations = document
                .entry(ITERATIONS_KEY)
                .or_insert_with(|| Value::Array(Vec::new()))
                .as_array_mut()
                .ok_or_else(|| AppError::Internal("iterations is not a sequence".to_string()))?;
            iterations.push(serde_json::to_value(record)?);
            iterations.len()
        };

        self.store.write_raw(&render(&document)?).await?;

        self.events.emit(&VerificationEvent::RecordAppended {
            iteration: record.iteration,
            location: self.store.location(),
            total,
        });
        Ok(total)
    }

    /// Read every stored record back, in stored order
    ///
    /// Entries that do not decode as records are skipped. An unusable
    /// document reads as empty and is left as it is.
    pub async fn load_records(&self) -> Result<Vec<IterationRecord>> {
        let document = match self.load_document().await? {
            Ok(document) => document,
            Err(reason) => {
                self.events.emit(&VerificationEvent::StoreUnparsable {
                    location: self.store.location(),
                    reason,
                });
                return Ok(Vec::new());
            }
        };
        let entries = match document.get(ITERATIONS_KEY) {
            Some(Value::Array(entries)) => entries,
            _ => return Ok(Vec::new()),
        };

        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match serde_json::from_value::<IterationRecord>(entry.clone()) {
                Ok(record) => records.push(record),
                Err(e) => self.events.emit(&VerificationEvent::EntrySkipped {
                    location: self.store.location(),
                    index,
                    error: e.to_string(),
                }),
            }
        }
        Ok(records)
    }

    /// Read and parse the stored document
    ///
    /// The inner `Err` carries the reason an existing document is unusable;
    /// callers decide whether that means reinitializing or reading nothing.
    async fn load_document(&self) -> Result<std::result::Result<Map<String, Value>, String>> {
        let raw = match self.store.read_raw().await? {
            Some(raw) => raw,
            None => return Ok(Ok(empty_document())),
        };

        Ok(match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) if map.get(ITERATIONS_KEY).is_some_and(Value::is_array) => {
                Ok(map)
            }
            Ok(_) => Err("document has no iterations sequence".to_string()),
            Err(e) => Err(e.to_string()),
        })
    }
}

fn empty_document() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(ITERATIONS_KEY.to_string(), Value::Array(Vec::new()));
    map
}

/// Four-space indented JSON for human inspection
fn render(document: &Map<String, Value>) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| AppError::Internal(e.to_string()))
}
