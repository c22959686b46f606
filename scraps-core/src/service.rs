//! High-level service facade combining the ledger, aggregation, and the animation backend.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::aggregate::{daily_totals, grand_total, summarize};
use crate::ledger::Ledger;
use crate::model::{Category, CategoryTotal, DailyTotal, Entry, EntryId, EntryRecord};
use crate::ports::{Animation, AnimationPort, LedgerError};

/// Public entry point for logging waste and reading summaries.
///
/// Appends take the write lock so ids and insertion order stay consistent when
/// several callers share one service; reads copy what they need under the read lock.
pub struct ScrapsService {
    ledger: RwLock<Ledger>,
    animation: Option<Arc<dyn AnimationPort>>,
}

impl ScrapsService {
    /// Create a new service owning `ledger`.
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            animation: None,
        }
    }

    /// Attach the backend used by [`ScrapsService::animation`].
    #[must_use]
    pub fn with_animation(mut self, port: Arc<dyn AnimationPort>) -> Self {
        self.animation = Some(port);
        self
    }

    /// Validate and log a waste entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] for bad input, or [`LedgerError::Io`] if the
    /// record could not be persisted.
    pub fn log_waste(
        &self,
        food_item: &str,
        category: &str,
        amount_grams: i64,
    ) -> Result<EntryId, LedgerError> {
        let entry = Entry::new(food_item, category, amount_grams).inspect_err(|err| {
            tracing::debug!(%err, food_item, category, amount_grams, "rejected entry");
        })?;
        self.ledger.write().append(entry)
    }

    /// Snapshot of all records in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<EntryRecord> {
        self.ledger.read().records().cloned().collect()
    }

    /// Snapshot of the records filed under `category`.
    #[must_use]
    pub fn entries_in(&self, category: Category) -> Vec<EntryRecord> {
        self.ledger
            .read()
            .records()
            .filter(|record| record.entry.category() == category)
            .cloned()
            .collect()
    }

    /// The `count` most recent records, newest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<EntryRecord> {
        self.ledger
            .read()
            .records()
            .rev()
            .take(count)
            .cloned()
            .collect()
    }

    /// Per-category totals in display order.
    #[must_use]
    pub fn summary(&self) -> Vec<CategoryTotal> {
        summarize(self.ledger.read().all())
    }

    /// Per-day totals, oldest first.
    #[must_use]
    pub fn daily_trend(&self) -> Vec<DailyTotal> {
        daily_totals(self.ledger.read().all())
    }

    /// Total grams logged.
    #[must_use]
    pub fn total_grams(&self) -> u64 {
        grand_total(self.ledger.read().all())
    }

    /// Number of logged entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ledger.read().len()
    }

    /// Whether nothing has been logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ledger.read().is_empty()
    }

    /// Fetch the decorative animation. Failures are logged and yield `None`.
    pub async fn animation(&self) -> Option<Animation> {
        let port = self.animation.as_ref()?;
        match port.fetch().await {
            Ok(animation) => {
                tracing::debug!(name = ?animation.meta.name, "animation loaded");
                Some(animation)
            }
            Err(err) => {
                tracing::warn!(%err, "animation unavailable, rendering without it");
                None
            }
        }
    }
}
