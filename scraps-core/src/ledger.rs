//! Append-only, ordered collection of waste entries.

use chrono::Utc;

use crate::model::{Category, Entry, EntryId, EntryRecord};
use crate::ports::{EntryStore, LedgerError};

/// Ordered log of entries; insertion order is chronological order.
///
/// The ledger only grows. Ids start at 1 and increase by one per append, and
/// `logged_at` never goes backwards even if the wall clock does.
pub struct Ledger {
    records: Vec<EntryRecord>,
    next_id: u64,
    store: Option<Box<dyn EntryStore>>,
}

impl Ledger {
    /// Create an empty ledger that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            store: None,
        }
    }

    /// Create a ledger backed by `store`, replaying everything it already holds.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] when the store cannot be read or holds a corrupt record,
    /// including one whose id leaves nothing to hand out next.
    pub fn open<S: EntryStore + 'static>(mut store: S) -> Result<Self, LedgerError> {
        let records = store.load()?;
        let next_id = match records.iter().enumerate().max_by_key(|(_, record)| record.id) {
            None => 1,
            Some((position, record)) => {
                record
                    .id
                    .0
                    .checked_add(1)
                    .ok_or_else(|| LedgerError::Corrupt {
                        line: position + 1,
                        reason: "id space exhausted".to_owned(),
                    })?
            }
        };
        tracing::debug!(count = records.len(), next_id, "replayed ledger from store");
        Ok(Self {
            records,
            next_id,
            store: Some(Box::new(store)),
        })
    }

    /// Add an entry and return its identifier.
    ///
    /// The entry is stamped with the append time. When a store is attached the
    /// record is persisted first; if that fails the ledger is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] when the backing store rejects the write and
    /// [`LedgerError::IdsExhausted`] once the last id has been used.
    pub fn append(&mut self, entry: Entry) -> Result<EntryId, LedgerError> {
        let following = self
            .next_id
            .checked_add(1)
            .ok_or(LedgerError::IdsExhausted)?;
        let now = Utc::now();
        let logged_at = self
            .records
            .last()
            .map_or(now, |last| now.max(last.entry.logged_at()));

        let record = EntryRecord {
            id: EntryId(self.next_id),
            entry: entry.stamped(logged_at),
        };

        if let Some(store) = self.store.as_mut() {
            store.append(&record)?;
        }

        let id = record.id;
        tracing::debug!(
            %id,
            item = record.entry.food_item(),
            category = %record.entry.category(),
            grams = record.entry.amount_grams(),
            "appended entry"
        );
        self.records.push(record);
        self.next_id = following;
        Ok(id)
    }

    /// Validate raw input and append it in one step.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] for bad input (the ledger is unchanged)
    /// or [`LedgerError::Io`] when persisting fails.
    pub fn record<S: Into<String>>(
        &mut self,
        food_item: S,
        category: &str,
        amount_grams: i64,
    ) -> Result<EntryId, LedgerError> {
        let entry = Entry::new(food_item, category, amount_grams)?;
        self.append(entry)
    }

    /// Iterate over entries in insertion order.
    pub fn all(&self) -> impl DoubleEndedIterator<Item = &Entry> + ExactSizeIterator + '_ {
        self.records.iter().map(|record| &record.entry)
    }

    /// Iterate over entries together with their identifiers.
    pub fn records(
        &self,
    ) -> impl DoubleEndedIterator<Item = &EntryRecord> + ExactSizeIterator + '_ {
        self.records.iter()
    }

    /// Iterate over the entries filed under `category`, in insertion order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Entry> + '_ {
        self.all().filter(move |entry| entry.category() == category)
    }

    /// Look up a single entry.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        // ids are dense only for in-memory ledgers, so search rather than index
        self.records
            .binary_search_by_key(&id, |record| record.id)
            .ok()
            .and_then(|position| self.records.get(position))
            .map(|record| &record.entry)
    }

    /// Number of entries logged so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether appends are written through to a store.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.store.is_some()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::in_memory()
    }
}
