use chrono::NaiveDate;
use serde::Serialize;

use crate::data::aggregate::{
    compute_metrics, group_counts, sort_claims_for_display, sort_listings_for_display,
    GroupCount, Metrics,
};
use crate::data::filter::{filter_claims, filter_listings, FilterSelection};
use crate::data::model::{Claim, Dataset, FoodListing, ListingColumn};

// ---------------------------------------------------------------------------
// DashboardView – everything the presentation layer draws
// ---------------------------------------------------------------------------

/// One recomputation pass over the dataset for a given selection.
/// Rows are borrowed from the dataset; nothing is copied or mutated.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub today: NaiveDate,
    /// The selection after normalisation against the dataset's options.
    pub selection: FilterSelection,
    pub metrics: Metrics,
    pub by_city: Vec<GroupCount>,
    pub by_meal_type: Vec<GroupCount>,
    pub by_food_type: Vec<GroupCount>,
    /// Filtered listings, sorted for display.
    pub listings: Vec<&'a FoodListing>,
    /// Filtered claims, newest first.
    pub claims: Vec<&'a Claim>,
}

/// Filter, aggregate and order the dataset for `selection`.
pub fn build_view<'a>(
    dataset: &'a Dataset,
    selection: &FilterSelection,
    today: NaiveDate,
) -> DashboardView<'a> {
    let selection = selection.normalized(dataset);
    let listings = filter_listings(
        &dataset.food,
        &selection.cities,
        &selection.meal_types,
        &selection.food_types,
    );
    let claims = filter_claims(&dataset.claims, &selection.statuses);
    view_from_rows(listings, claims, selection, today)
}

/// Aggregate already-filtered rows. Aggregates run before display sorting.
pub(crate) fn view_from_rows<'a>(
    mut listings: Vec<&'a FoodListing>,
    mut claims: Vec<&'a Claim>,
    selection: FilterSelection,
    today: NaiveDate,
) -> DashboardView<'a> {
    let metrics = compute_metrics(&listings, &claims, today);
    let by_city = group_counts(&listings, ListingColumn::Location);
    let by_meal_type = group_counts(&listings, ListingColumn::MealType);
    let by_food_type = group_counts(&listings, ListingColumn::FoodType);

    sort_listings_for_display(&mut listings);
    sort_claims_for_display(&mut claims);

    DashboardView {
        today,
        selection,
        metrics,
        by_city,
        by_meal_type,
        by_food_type,
        listings,
        claims,
    }
}
