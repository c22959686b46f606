//! Append-only record file backing a durable ledger.
//!
//! One JSON object per line:
//!
//! ```text
//! {"id":1,"food_item":"Apple","category":"fruits-veggies","amount_grams":200,"logged_at":"2024-03-01T09:12:44.120Z"}
//! ```
//!
//! Lines are only ever appended, each with a single write. A write that fails
//! part way is truncated away again, so the file only ever holds whole records.
//! Every record read back goes through the same validation as fresh input.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Error as IoError, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Category, Entry, EntryId, EntryRecord};
use crate::ports::{EntryStore, LedgerError};

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    id: u64,
    food_item: String,
    category: Category,
    amount_grams: u64,
    logged_at: DateTime<Utc>,
}

impl From<&EntryRecord> for StoredRecord {
    fn from(record: &EntryRecord) -> Self {
        Self {
            id: record.id.0,
            food_item: record.entry.food_item().to_owned(),
            category: record.entry.category(),
            amount_grams: record.entry.amount_grams(),
            logged_at: record.entry.logged_at(),
        }
    }
}

/// Record store writing one JSON line per entry.
pub struct JsonLinesStore {
    path: PathBuf,
    file: File,
}

impl JsonLinesStore {
    /// Open (or create) the record file at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] when the directory or file cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!(path = %path.display(), "opened record file");
        Ok(Self { path, file })
    }

    /// Location of the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntryStore for JsonLinesStore {
    fn load(&mut self) -> Result<Vec<EntryRecord>, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records: Vec<EntryRecord> = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let record = parse_line(&line, line_no)?;
            if let Some(previous) = records.last()
                && previous.id >= record.id
            {
                return Err(LedgerError::Corrupt {
                    line: line_no,
                    reason: format!("id {} does not follow {}", record.id, previous.id),
                });
            }
            records.push(record);
        }

        tracing::info!(path = %self.path.display(), count = records.len(), "loaded entries");
        Ok(records)
    }

    fn append(&mut self, record: &EntryRecord) -> Result<(), LedgerError> {
        let mut line = serde_json::to_vec(&StoredRecord::from(record)).map_err(IoError::from)?;
        line.push(b'\n');

        let committed = self.file.metadata()?.len();
        let written = self
            .file
            .write_all(&line)
            .and_then(|()| self.file.sync_data());

        if let Err(err) = written {
            if let Err(rollback) = self.file.set_len(committed) {
                tracing::warn!(
                    path = %self.path.display(),
                    %rollback,
                    "could not truncate a failed write"
                );
            }
            return Err(err.into());
        }
        Ok(())
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<EntryRecord, LedgerError> {
    let corrupt = |reason: String| LedgerError::Corrupt {
        line: line_no,
        reason,
    };
    let stored: StoredRecord =
        serde_json::from_str(line).map_err(|err| corrupt(err.to_string()))?;
    let entry = Entry::restore(
        stored.food_item,
        stored.category,
        stored.amount_grams,
        stored.logged_at,
    )
    .map_err(|err| corrupt(err.to_string()))?;
    Ok(EntryRecord {
        id: EntryId(stored.id),
        entry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonLinesStore::open(dir.path().join("nested/entries.jsonl"))
            .expect("open creates parents");
        assert!(store.load().expect("load").is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn reopened_ledger_sees_the_same_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("entries.jsonl");

        let before: Vec<EntryRecord> = {
            let mut ledger =
                Ledger::open(JsonLinesStore::open(&path).expect("open")).expect("replay");
            ledger.record("Apple", "Fruits & Veggies", 200).expect("valid");
            ledger.record("Milk", "Dairy", 50).expect("valid");
            ledger.records().cloned().collect()
        };

        let mut ledger = Ledger::open(JsonLinesStore::open(&path).expect("open")).expect("replay");
        let after: Vec<EntryRecord> = ledger.records().cloned().collect();
        assert_eq!(before, after);

        let next = ledger.record("Steak", "Meat", 150).expect("valid");
        assert_eq!(next, EntryId(3));
    }

    #[test]
    fn file_holds_one_line_per_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("entries.jsonl");
        let mut ledger = Ledger::open(JsonLinesStore::open(&path).expect("open")).expect("replay");
        ledger.record("Rice", "Grains", 30).expect("valid");
        ledger.record("Soup", "Other", 20).expect("valid");

        let contents = fs::read_to_string(&path).expect("read back");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.first().is_some_and(|line| line.contains("\"category\":\"grains\"")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_leaves_nothing_queued() {
        let Ok(mut store) = JsonLinesStore::open("/dev/full") else {
            return;
        };
        let record = EntryRecord {
            id: EntryId(1),
            entry: Entry::new("Bread", "Grains", 80).expect("valid"),
        };

        for _ in 0..2 {
            match store.append(&record) {
                Err(LedgerError::Io(err)) => assert_eq!(err.kind(), ErrorKind::StorageFull),
                other => panic!("expected a full device, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejected_entry_does_not_reach_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("entries.jsonl");
        let mut ledger = Ledger::open(JsonLinesStore::open(&path).expect("open")).expect("replay");
        ledger.record("Rice", "Grains", 30).expect("valid");

        let healthy = fs::read(&path).expect("read back");
        // the rejected record must not reach the file
        assert!(ledger.record("", "Grains", 30).is_err());
        assert_eq!(fs::read(&path).expect("read back"), healthy);

        ledger.record("Soup", "Other", 20).expect("valid");
        let reloaded = JsonLinesStore::open(&path)
            .expect("open")
            .load()
            .expect("file stays loadable");
        let ids: Vec<u64> = reloaded.iter().map(|record| record.id.0).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn corrupt_line_is_reported_with_its_number() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("entries.jsonl");
        fs::write(
            &path,
            concat!(
                r#"{"id":1,"food_item":"Milk","category":"dairy","amount_grams":50,"logged_at":"2024-03-01T09:00:00Z"}"#,
                "\n",
                r#"{"id":2,"food_item":"","category":"dairy","amount_grams":5,"logged_at":"2024-03-01T10:00:00Z"}"#,
                "\n",
            ),
        )
        .expect("seed file");

        let mut store = JsonLinesStore::open(&path).expect("open");
        match store.load() {
            Err(LedgerError::Corrupt { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected corrupt record, got {other:?}"),
        }
    }

    #[test]
    fn out_of_order_ids_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("entries.jsonl");
        fs::write(
            &path,
            concat!(
                r#"{"id":4,"food_item":"Milk","category":"dairy","amount_grams":50,"logged_at":"2024-03-01T09:00:00Z"}"#,
                "\n\n",
                r#"{"id":2,"food_item":"Ham","category":"meat","amount_grams":5,"logged_at":"2024-03-01T10:00:00Z"}"#,
                "\n",
            ),
        )
        .expect("seed file");

        let mut store = JsonLinesStore::open(&path).expect("open");
        assert!(matches!(
            store.load(),
            Err(LedgerError::Corrupt { line: 3, .. })
        ));
    }
}
