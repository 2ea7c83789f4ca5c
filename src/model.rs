//! Record types for the retail dataset.
//!
//! The three source tables are rows of [`Customer`], [`Sale`], and
//! [`InventoryItem`]. Categorical fields arrive dirty: `gender` is free
//! text until standardized, `age_group` may be unset, and `sale_date` is
//! textual until the cleaning pass normalizes it. [`Gender`] and
//! [`AgeGroup`] hold the closed sets those fields are cleaned into.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::table::Keyed;

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Canonical gender values after standardization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Recognized raw spellings, matched case-insensitively.
const GENDER_VARIANTS: &[(&str, Gender)] = &[
    ("m", Gender::Male),
    ("male", Gender::Male),
    ("f", Gender::Female),
    ("female", Gender::Female),
];

impl Gender {
    /// Map a raw free-text value to its canonical form.
    ///
    /// Total over all inputs: unrecognized spellings and null both map to
    /// `Other`. Canonical values map to themselves, so re-applying the
    /// mapping is a no-op.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Gender::Other;
        };
        let lowered = raw.to_ascii_lowercase();
        GENDER_VARIANTS
            .iter()
            .find(|(variant, _)| *variant == lowered)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(Gender::Other)
    }

    /// The canonical string stored in the `gender` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AgeGroup
// ---------------------------------------------------------------------------

/// Derived age bucket used to backfill the `age_group` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Youth,
    Adult,
    Senior,
}

impl AgeGroup {
    /// Bucket a numeric age: under 25 is Youth, 25 through 44 is Adult,
    /// 45 and up is Senior.
    pub fn from_age(age: i64) -> Self {
        if age < 25 {
            AgeGroup::Youth
        } else if age <= 44 {
            AgeGroup::Adult
        } else {
            AgeGroup::Senior
        }
    }

    /// The canonical string stored in the `age_group` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Youth => "Youth",
            AgeGroup::Adult => "Adult",
            AgeGroup::Senior => "Senior",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SaleDate
// ---------------------------------------------------------------------------

/// A `sale_date` column value.
///
/// Ingestion always produces `Text`; the cleaning pass converts to `Date`.
/// Reports that need calendar arithmetic require the `Date` state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleDate {
    /// Raw text exactly as loaded from the source.
    Text(String),
    /// Normalized calendar date.
    Date(NaiveDate),
}

impl SaleDate {
    /// Whether this value has been normalized to a typed date.
    pub fn is_normalized(&self) -> bool {
        matches!(self, SaleDate::Date(_))
    }

    /// The typed date, if normalized.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            SaleDate::Text(_) => None,
            SaleDate::Date(date) => Some(*date),
        }
    }
}

impl fmt::Display for SaleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleDate::Text(raw) => f.write_str(raw),
            SaleDate::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for SaleDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SaleDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Source columns are textual; normalization is an explicit
        // cleaning step, never an ingestion side effect.
        Ok(SaleDate::Text(String::deserialize(deserializer)?))
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A customer row.
///
/// `gender` and `age_group` hold whatever the source provided until the
/// cleaning pass standardizes and backfills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub age_group: Option<String>,
    pub gender: Option<String>,
}

impl Keyed for Customer {
    type Key = i64;

    fn key(&self) -> i64 {
        self.customer_id
    }
}

/// A sales transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub province: String,
    pub sale_date: SaleDate,
    pub quantity: i64,
    pub discount: f64,
    pub total_sale: f64,
    #[serde(rename = "Customer Satisfaction")]
    pub satisfaction: Option<f64>,
}

impl Keyed for Sale {
    type Key = i64;

    fn key(&self) -> i64 {
        self.sale_id
    }
}

/// An inventory item row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: i64,
    pub product_name: String,
    pub expected_profit: f64,
    pub sold_stock: i64,
    pub stock_available: i64,
}
