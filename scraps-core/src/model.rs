//! Domain data structures for waste categories, entries, and identifiers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Fixed set of food categories an entry can be filed under.
pub enum Category {
    /// Fresh produce.
    FruitsVeggies,
    /// Milk, cheese, yoghurt and friends.
    Dairy,
    /// Meat and fish.
    Meat,
    /// Bread, rice, pasta, cereals.
    Grains,
    /// Anything that fits nowhere else.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::FruitsVeggies,
        Self::Dairy,
        Self::Meat,
        Self::Grains,
        Self::Other,
    ];

    /// Human-friendly label shown in the UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FruitsVeggies => "Fruits & Veggies",
            Self::Dairy => "Dairy",
            Self::Meat => "Meat",
            Self::Grains => "Grains",
            Self::Other => "Other",
        }
    }

    /// Stable machine-readable identifier used in record files.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::FruitsVeggies => "fruits-veggies",
            Self::Dairy => "dairy",
            Self::Meat => "meat",
            Self::Grains => "grains",
            Self::Other => "other",
        }
    }

    /// Position of the category within [`Category::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Accepts the display label or the slug, ignoring case and surrounding whitespace.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| {
                category.label().eq_ignore_ascii_case(needle)
                    || category.slug().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ValidationError::UnknownCategory(raw.to_owned()))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Reasons an entry is refused before it reaches the ledger.
pub enum ValidationError {
    /// The food item label was empty or only whitespace.
    #[error("Food item must not be empty")]
    EmptyFoodItem,
    /// The category label is not one of [`Category::ALL`].
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    /// Amounts are weights and cannot go below zero.
    #[error("Amount must not be negative, got {0}g")]
    NegativeAmount(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier handed out by the ledger, strictly increasing in append order.
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One recorded instance of wasted food.
///
/// Fields are private so a constructed entry always satisfies its invariants:
/// a non-empty item label and a non-negative amount.
pub struct Entry {
    food_item: String,
    category: Category,
    amount_grams: u64,
    logged_at: DateTime<Utc>,
}

impl Entry {
    /// Validate raw user input and build an entry stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the item is empty, the category label is
    /// unknown, or the amount is negative.
    pub fn new<S: Into<String>>(
        food_item: S,
        category: &str,
        amount_grams: i64,
    ) -> Result<Self, ValidationError> {
        let food_item = checked_item(food_item.into())?;
        let category = category.parse::<Category>()?;
        Self::build(food_item, category, amount_grams, Utc::now())
    }

    /// Same as [`Entry::new`] for callers that already hold a [`Category`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the item is empty or the amount is negative.
    pub fn with_category<S: Into<String>>(
        food_item: S,
        category: Category,
        amount_grams: i64,
    ) -> Result<Self, ValidationError> {
        let food_item = checked_item(food_item.into())?;
        Self::build(food_item, category, amount_grams, Utc::now())
    }

    /// Rebuild an entry read back from storage, re-running validation.
    pub(crate) fn restore(
        food_item: String,
        category: Category,
        amount_grams: u64,
        logged_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            food_item: checked_item(food_item)?,
            category,
            amount_grams,
            logged_at,
        })
    }

    fn build(
        food_item: String,
        category: Category,
        amount_grams: i64,
        logged_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if amount_grams < 0 {
            return Err(ValidationError::NegativeAmount(amount_grams));
        }
        Ok(Self {
            food_item,
            category,
            amount_grams: amount_grams.unsigned_abs(),
            logged_at,
        })
    }

    /// Replace the timestamp with the moment the ledger accepted the entry.
    pub(crate) fn stamped(self, logged_at: DateTime<Utc>) -> Self {
        Self { logged_at, ..self }
    }

    /// Label of the wasted item, trimmed.
    #[must_use]
    pub fn food_item(&self) -> &str {
        &self.food_item
    }

    /// Category the item was filed under.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Wasted weight in grams.
    #[must_use]
    pub fn amount_grams(&self) -> u64 {
        self.amount_grams
    }

    /// When the ledger accepted the entry.
    #[must_use]
    pub fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }
}

fn checked_item(food_item: String) -> Result<String, ValidationError> {
    let trimmed = food_item.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyFoodItem);
    }
    if trimmed.len() == food_item.len() {
        Ok(food_item)
    } else {
        Ok(trimmed.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An entry together with the identifier the ledger assigned to it.
pub struct EntryRecord {
    /// Ledger-assigned identifier.
    pub id: EntryId,
    /// The logged entry.
    pub entry: Entry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Summed waste for a single category.
pub struct CategoryTotal {
    /// Category the total belongs to.
    pub category: Category,
    /// Sum of `amount_grams` over the category's entries.
    pub total_grams: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Summed waste for a single calendar day (UTC).
pub struct DailyTotal {
    /// The day.
    pub date: NaiveDate,
    /// Sum of `amount_grams` logged on that day.
    pub total_grams: u64,
}
