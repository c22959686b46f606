//! Pure summaries over ledger entries.
//!
//! Nothing here holds state across calls. [`CategoryTotals`] is an accumulator
//! so a caller that wants an always-current summary can feed it each appended
//! entry instead of re-scanning the ledger.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{Category, CategoryTotal, DailyTotal, Entry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Running per-category sums, indexed by [`Category::index`].
pub struct CategoryTotals {
    grams: [u64; Category::ALL.len()],
}

impl CategoryTotals {
    /// Start with every category at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one entry into the totals.
    pub fn add(&mut self, entry: &Entry) {
        if let Some(slot) = self.grams.get_mut(entry.category().index()) {
            *slot = slot.saturating_add(entry.amount_grams());
        }
    }

    /// Current sum for `category`.
    #[must_use]
    pub fn get(&self, category: Category) -> u64 {
        self.grams.get(category.index()).copied().unwrap_or(0)
    }

    /// One row per category, in [`Category::ALL`] order.
    #[must_use]
    pub fn rows(&self) -> Vec<CategoryTotal> {
        Category::ALL
            .into_iter()
            .map(|category| CategoryTotal {
                category,
                total_grams: self.get(category),
            })
            .collect()
    }
}

impl<'entry> Extend<&'entry Entry> for CategoryTotals {
    fn extend<I: IntoIterator<Item = &'entry Entry>>(&mut self, entries: I) {
        for entry in entries {
            self.add(entry);
        }
    }
}

/// Sum waste per category, one row per category in display order (zeros included).
pub fn summarize<'entry, I>(entries: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'entry Entry>,
{
    let mut totals = CategoryTotals::new();
    totals.extend(entries);
    totals.rows()
}

/// Sum waste per UTC calendar day, oldest first. Days without entries are omitted.
pub fn daily_totals<'entry, I>(entries: I) -> Vec<DailyTotal>
where
    I: IntoIterator<Item = &'entry Entry>,
{
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for entry in entries {
        let total = by_day.entry(entry.logged_at().date_naive()).or_default();
        *total = total.saturating_add(entry.amount_grams());
    }
    by_day
        .into_iter()
        .map(|(date, total_grams)| DailyTotal { date, total_grams })
        .collect()
}

/// Total grams across all entries.
pub fn grand_total<'entry, I>(entries: I) -> u64
where
    I: IntoIterator<Item = &'entry Entry>,
{
    entries
        .into_iter()
        .fold(0, |sum: u64, entry| sum.saturating_add(entry.amount_grams()))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::ledger::Ledger;

    fn totals_of(ledger: &Ledger) -> Vec<(Category, u64)> {
        summarize(ledger.all())
            .into_iter()
            .map(|row| (row.category, row.total_grams))
            .collect()
    }

    #[test]
    fn empty_ledger_has_a_zero_row_per_category() {
        let ledger = Ledger::in_memory();
        assert_eq!(
            totals_of(&ledger),
            Category::ALL.map(|category| (category, 0))
        );
    }

    #[test]
    fn apple_and_milk_scenario() {
        let mut ledger = Ledger::in_memory();
        ledger.record("Apple", "Fruits & Veggies", 200).expect("valid");
        ledger.record("Milk", "Dairy", 50).expect("valid");

        assert_eq!(
            totals_of(&ledger),
            [
                (Category::FruitsVeggies, 200),
                (Category::Dairy, 50),
                (Category::Meat, 0),
                (Category::Grains, 0),
                (Category::Other, 0),
            ]
        );
    }

    #[test]
    fn summary_sum_matches_grand_total() {
        let mut ledger = Ledger::in_memory();
        let inputs = [
            ("Banana", "Fruits & Veggies", 120),
            ("Chicken", "Meat", 150),
            ("Bread", "Grains", 30),
            ("Banana", "Fruits & Veggies", 80),
            ("Soup", "Other", 20),
            ("Butter", "Dairy", 50),
        ];
        for (item, category, grams) in inputs {
            ledger.record(item, category, grams).expect("valid");
        }

        let summed: u64 = summarize(ledger.all())
            .iter()
            .map(|row| row.total_grams)
            .sum();
        assert_eq!(summed, 450);
        assert_eq!(grand_total(ledger.all()), summed);
    }

    #[test]
    fn summarize_is_idempotent() {
        let mut ledger = Ledger::in_memory();
        ledger.record("Pasta", "Grains", 70).expect("valid");
        ledger.record("Ham", "Meat", 40).expect("valid");
        assert_eq!(summarize(ledger.all()), summarize(ledger.all()));
    }

    #[test]
    fn accumulator_matches_full_rescan() {
        let mut ledger = Ledger::in_memory();
        let mut running = CategoryTotals::new();
        for (item, category, grams) in [("Kale", "Fruits & Veggies", 15), ("Brie", "Dairy", 60)] {
            let id = ledger.record(item, category, grams).expect("valid");
            if let Some(entry) = ledger.get(id) {
                running.add(entry);
            }
        }
        assert_eq!(running.rows(), summarize(ledger.all()));
        assert_eq!(running.get(Category::Dairy), 60);
    }

    #[test]
    fn daily_totals_group_by_calendar_day() {
        let day = |date: u32, hour: u32| {
            Utc.with_ymd_and_hms(2024, 3, date, hour, 0, 0)
                .single()
                .expect("valid timestamp")
        };
        let entries = [
            Entry::restore("Apple".to_owned(), Category::FruitsVeggies, 100, day(2, 9)),
            Entry::restore("Milk".to_owned(), Category::Dairy, 40, day(1, 18)),
            Entry::restore("Pear".to_owned(), Category::FruitsVeggies, 60, day(2, 21)),
        ]
        .map(|entry| entry.expect("valid entry"));

        let trend = daily_totals(&entries);
        let expected = [
            (NaiveDate::from_ymd_opt(2024, 3, 1), 40),
            (NaiveDate::from_ymd_opt(2024, 3, 2), 160),
        ];
        assert_eq!(trend.len(), expected.len());
        for (row, (date, grams)) in trend.iter().zip(expected) {
            assert_eq!(Some(row.date), date);
            assert_eq!(row.total_grams, grams);
        }
        let trend_sum: u64 = trend.iter().map(|row| row.total_grams).sum();
        assert_eq!(trend_sum, grand_total(&entries));
    }
}
