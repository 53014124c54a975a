use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rows – one struct per source table
// ---------------------------------------------------------------------------

/// A food donor (restaurant, supermarket, ...). Reference data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "Provider_ID")]
    pub provider_id: u64,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub provider_type: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "Contact")]
    pub contact: Option<String>,
}

/// An organisation or person that claims food. Reference data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    #[serde(rename = "Receiver_ID")]
    pub receiver_id: u64,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub receiver_type: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "Contact")]
    pub contact: Option<String>,
}

/// A single food-availability record offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodListing {
    #[serde(rename = "Food_ID")]
    pub food_id: u64,
    #[serde(rename = "Food_Name")]
    pub food_name: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Expiry_Date")]
    /// `None` when the cell is empty.
    pub expiry_date: Option<NaiveDate>,
    #[serde(rename = "Provider_ID")]
    pub provider_id: u64,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Food_Type")]
    pub food_type: Option<String>,
    #[serde(rename = "Meal_Type")]
    pub meal_type: Option<String>,
}

/// A receiver's claim against a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claim {
    #[serde(rename = "Claim_ID")]
    pub claim_id: u64,
    #[serde(rename = "Food_ID")]
    pub food_id: u64,
    #[serde(rename = "Receiver_ID")]
    pub receiver_id: u64,
    /// Open domain: whatever the source file contains.
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Timestamp")]
    /// `None` when the cell is empty.
    pub timestamp: Option<NaiveDateTime>,
}

/// Status value counted by the completion rate.
pub const STATUS_COMPLETED: &str = "Completed";

// ---------------------------------------------------------------------------
// Categorical columns
// ---------------------------------------------------------------------------

/// The categorical listing columns that can be filtered and grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ListingColumn {
    Location,
    MealType,
    FoodType,
}

impl ListingColumn {
    pub const ALL: [ListingColumn; 3] = [
        ListingColumn::Location,
        ListingColumn::MealType,
        ListingColumn::FoodType,
    ];

    /// CSV header of the column.
    pub fn header(self) -> &'static str {
        match self {
            ListingColumn::Location => "Location",
            ListingColumn::MealType => "Meal_Type",
            ListingColumn::FoodType => "Food_Type",
        }
    }

    /// The row's value in this column, `None` when missing.
    pub fn value_of(self, row: &FoodListing) -> Option<&str> {
        match self {
            ListingColumn::Location => row.location.as_deref(),
            ListingColumn::MealType => row.meal_type.as_deref(),
            ListingColumn::FoodType => row.food_type.as_deref(),
        }
    }
}

/// One of the four independent filter axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Dimension {
    City,
    MealType,
    FoodType,
    ClaimStatus,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::City,
        Dimension::MealType,
        Dimension::FoodType,
        Dimension::ClaimStatus,
    ];

    /// The listing column this dimension filters, `None` for claim status.
    pub fn listing_column(self) -> Option<ListingColumn> {
        match self {
            Dimension::City => Some(ListingColumn::Location),
            Dimension::MealType => Some(ListingColumn::MealType),
            Dimension::FoodType => Some(ListingColumn::FoodType),
            Dimension::ClaimStatus => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dimension::City => "City / Location",
            Dimension::MealType => "Meal Type",
            Dimension::FoodType => "Food Type",
            Dimension::ClaimStatus => "Claim Status",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the four loaded tables
// ---------------------------------------------------------------------------

/// The four tables plus the precomputed filter option lists.
///
/// Immutable once built; share it between sessions behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub providers: Vec<Provider>,
    pub receivers: Vec<Receiver>,
    pub food: Vec<FoodListing>,
    pub claims: Vec<Claim>,
    /// For each filter dimension the sorted set of distinct non-missing values.
    pub unique_values: BTreeMap<Dimension, BTreeSet<String>>,
}

impl Dataset {
    /// Build the option index from the loaded tables.
    pub fn new(
        providers: Vec<Provider>,
        receivers: Vec<Receiver>,
        food: Vec<FoodListing>,
        claims: Vec<Claim>,
    ) -> Self {
        let mut unique_values: BTreeMap<Dimension, BTreeSet<String>> = Dimension::ALL
            .iter()
            .map(|d| (*d, BTreeSet::new()))
            .collect();

        for row in &food {
            for dim in [Dimension::City, Dimension::MealType, Dimension::FoodType] {
                let Some(column) = dim.listing_column() else {
                    continue;
                };
                if let Some(v) = column.value_of(row) {
                    unique_values
                        .entry(dim)
                        .or_default()
                        .insert(v.to_string());
                }
            }
        }
        for claim in &claims {
            if let Some(status) = &claim.status {
                unique_values
                    .entry(Dimension::ClaimStatus)
                    .or_default()
                    .insert(status.clone());
            }
        }

        Dataset {
            providers,
            receivers,
            food,
            claims,
            unique_values,
        }
    }

    /// Sorted distinct values offered for a filter dimension.
    pub fn options(&self, dimension: Dimension) -> impl Iterator<Item = &str> {
        self.unique_values
            .get(&dimension)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}
