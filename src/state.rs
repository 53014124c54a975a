use std::sync::Arc;

use chrono::NaiveDate;

use crate::dashboard::{view_from_rows, DashboardView};
use crate::data::filter::{claim_indices, listing_indices, FilterSelection};
use crate::data::model::{Claim, Dataset, Dimension, FoodListing};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One user's filter state over a shared, read-only dataset.
///
/// Sessions never touch each other: each owns its selection and cached
/// indices, and only the `Arc<Dataset>` is shared.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,

    /// Per-dimension filter selections, as the user set them.
    filters: FilterSelection,

    /// Indices of listings passing the current filters (cached).
    visible_listings: Vec<usize>,

    /// Indices of claims passing the current filters (cached).
    visible_claims: Vec<usize>,
}

impl Session {
    /// Start a session with nothing selected, i.e. every row visible.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let visible_listings = (0..dataset.food.len()).collect();
        let visible_claims = (0..dataset.claims.len()).collect();
        Self {
            dataset,
            filters: FilterSelection::default(),
            visible_listings,
            visible_claims,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.filters
    }

    /// Replace the whole selection.
    pub fn set_selection(&mut self, filters: FilterSelection) {
        self.filters = filters;
        self.refilter();
    }

    /// Recompute the visible rows after a filter change.
    pub fn refilter(&mut self) {
        let sel = self.filters.normalized(&self.dataset);
        self.visible_listings = listing_indices(
            &self.dataset.food,
            &sel.cities,
            &sel.meal_types,
            &sel.food_types,
        );
        self.visible_claims = claim_indices(&self.dataset.claims, &sel.statuses);
        log::debug!(
            "refilter: {}/{} listings, {}/{} claims visible",
            self.visible_listings.len(),
            self.dataset.food.len(),
            self.visible_claims.len(),
            self.dataset.claims.len()
        );
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dimension: Dimension, value: &str) {
        let selected = self.filters.get_mut(dimension);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every option of a dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        if let Some(all_vals) = self.dataset.unique_values.get(&dimension) {
            *self.filters.get_mut(dimension) = all_vals.clone();
            self.refilter();
        }
    }

    /// Clear a dimension's filter. An empty selection shows everything.
    pub fn select_none(&mut self, dimension: Dimension) {
        self.filters.get_mut(dimension).clear();
        self.refilter();
    }

    /// Listings passing the current filters, in source order.
    pub fn visible_listings(&self) -> Vec<&FoodListing> {
        self.visible_listings
            .iter()
            .map(|&i| &self.dataset.food[i])
            .collect()
    }

    /// Claims passing the current filters, in source order.
    pub fn visible_claims(&self) -> Vec<&Claim> {
        self.visible_claims
            .iter()
            .map(|&i| &self.dataset.claims[i])
            .collect()
    }

    /// Metrics, group counts and sorted tables for the current filters.
    pub fn view(&self, today: NaiveDate) -> DashboardView<'_> {
        view_from_rows(
            self.visible_listings(),
            self.visible_claims(),
            self.filters.normalized(&self.dataset),
            today,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Arc<Dataset> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let listing = |id, city: &str, meal: &str| FoodListing {
            food_id: id,
            food_name: None,
            quantity: 1,
            expiry_date: Some(day),
            provider_id: id,
            location: Some(city.into()),
            food_type: Some("Veg".into()),
            meal_type: Some(meal.into()),
        };
        let claim = |id, status: &str| Claim {
            claim_id: id,
            food_id: id,
            receiver_id: 1,
            status: Some(status.into()),
            timestamp: day.and_hms_opt(10, 0, 0),
        };
        Arc::new(Dataset::new(
            vec![],
            vec![],
            vec![
                listing(1, "CityA", "Lunch"),
                listing(2, "CityA", "Dinner"),
                listing(3, "CityB", "Lunch"),
            ],
            vec![claim(1, "Completed"), claim(2, "Pending")],
        ))
    }

    #[test]
    fn new_session_shows_everything() {
        let s = Session::new(dataset());
        assert_eq!(s.visible_listings().len(), 3);
        assert_eq!(s.visible_claims().len(), 2);
        assert!(s.selection().is_unrestricted());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut s = Session::new(dataset());
        s.toggle_filter_value(Dimension::City, "CityB");
        assert_eq!(s.visible_listings().len(), 1);
        s.toggle_filter_value(Dimension::City, "CityB");
        assert_eq!(s.visible_listings().len(), 3);
    }

    #[test]
    fn select_all_equals_select_none() {
        let mut s = Session::new(dataset());
        s.select_all(Dimension::ClaimStatus);
        assert_eq!(s.selection().statuses.len(), 2);
        assert_eq!(s.visible_claims().len(), 2);
        s.select_none(Dimension::ClaimStatus);
        assert_eq!(s.visible_claims().len(), 2);
    }

    #[test]
    fn sessions_are_independent() {
        let ds = dataset();
        let mut a = Session::new(Arc::clone(&ds));
        let b = Session::new(ds);
        a.toggle_filter_value(Dimension::ClaimStatus, "Pending");
        assert_eq!(a.visible_claims().len(), 1);
        assert_eq!(b.visible_claims().len(), 2);
    }

    #[test]
    fn view_reports_metrics_for_current_filters() {
        let mut s = Session::new(dataset());
        s.toggle_filter_value(Dimension::MealType, "Lunch");
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let view = s.view(day);
        assert_eq!(view.metrics.total_listings, 2);
        assert_eq!(view.metrics.expiring_today, 2);
        assert_eq!(view.metrics.completed_rate, 50.0);
        assert_eq!(view.by_city.len(), 2);
    }
}
