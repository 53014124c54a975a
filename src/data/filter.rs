use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{Claim, Dataset, Dimension, FoodListing, ListingColumn};

// ---------------------------------------------------------------------------
// Filter selection: which values are selected per dimension
// ---------------------------------------------------------------------------

/// The four independent filter sets.
/// An empty set means "no filter" on that dimension (show all).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub cities: BTreeSet<String>,
    pub meal_types: BTreeSet<String>,
    pub food_types: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
}

impl FilterSelection {
    pub fn get(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::City => &self.cities,
            Dimension::MealType => &self.meal_types,
            Dimension::FoodType => &self.food_types,
            Dimension::ClaimStatus => &self.statuses,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::City => &mut self.cities,
            Dimension::MealType => &mut self.meal_types,
            Dimension::FoodType => &mut self.food_types,
            Dimension::ClaimStatus => &mut self.statuses,
        }
    }

    /// Whether no dimension restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.get(*d).is_empty())
    }

    /// Drop the restriction on every dimension whose selection covers all
    /// of the dataset's options, so "everything ticked" behaves exactly
    /// like "nothing ticked" even for rows with a missing value.
    pub fn normalized(&self, dataset: &Dataset) -> FilterSelection {
        let mut out = self.clone();
        for dim in Dimension::ALL {
            let selected = out.get_mut(dim);
            if selected.is_empty() {
                continue;
            }
            let covers_all = dataset
                .unique_values
                .get(&dim)
                .is_some_and(|all| !all.is_empty() && all.is_subset(selected));
            if covers_all {
                selected.clear();
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// `value` passes `selected` when the set is empty or contains it.
/// A missing value never passes a non-empty set.
fn passes(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(v))
}

/// Return indices of listings that pass the city, meal type and food type
/// filters, in source order.
pub fn listing_indices(
    food: &[FoodListing],
    cities: &BTreeSet<String>,
    meals: &BTreeSet<String>,
    food_types: &BTreeSet<String>,
) -> Vec<usize> {
    let constraints = [
        (ListingColumn::Location, cities),
        (ListingColumn::MealType, meals),
        (ListingColumn::FoodType, food_types),
    ];
    food.iter()
        .enumerate()
        .filter(|(_, row)| {
            constraints
                .iter()
                .all(|(column, selected)| passes(selected, column.value_of(row)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of claims whose status passes the status filter.
pub fn claim_indices(claims: &[Claim], statuses: &BTreeSet<String>) -> Vec<usize> {
    claims
        .iter()
        .enumerate()
        .filter(|(_, c)| passes(statuses, c.status.as_deref()))
        .map(|(i, _)| i)
        .collect()
}

/// Listings passing the filters, borrowed from `food` in source order.
pub fn filter_listings<'a>(
    food: &'a [FoodListing],
    cities: &BTreeSet<String>,
    meals: &BTreeSet<String>,
    food_types: &BTreeSet<String>,
) -> Vec<&'a FoodListing> {
    listing_indices(food, cities, meals, food_types)
        .into_iter()
        .map(|i| &food[i])
        .collect()
}

/// Claims passing the status filter, borrowed from `claims` in source order.
pub fn filter_claims<'a>(claims: &'a [Claim], statuses: &BTreeSet<String>) -> Vec<&'a Claim> {
    claim_indices(claims, statuses)
        .into_iter()
        .map(|i| &claims[i])
        .collect()
}
