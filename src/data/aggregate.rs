use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{Claim, FoodListing, ListingColumn, STATUS_COMPLETED};

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// The four headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub total_listings: usize,
    pub expiring_today: usize,
    /// Percentage of claims with status `Completed`, unrounded.
    /// `0.0` when there are no claims.
    pub completed_rate: f64,
    pub active_providers: usize,
}

/// Compute the headline metrics over already-filtered rows.
///
/// `today` is the calendar date "expiring today" is measured against.
pub fn compute_metrics(food: &[&FoodListing], claims: &[&Claim], today: NaiveDate) -> Metrics {
    let expiring_today = food
        .iter()
        .filter(|r| r.expiry_date == Some(today))
        .count();

    let completed_rate = if claims.is_empty() {
        0.0
    } else {
        let completed = claims
            .iter()
            .filter(|c| c.status.as_deref() == Some(STATUS_COMPLETED))
            .count();
        completed as f64 / claims.len() as f64 * 100.0
    };

    let active_providers = food
        .iter()
        .map(|r| r.provider_id)
        .collect::<HashSet<_>>()
        .len();

    Metrics {
        total_listings: food.len(),
        expiring_today,
        completed_rate,
        active_providers,
    }
}

// ---------------------------------------------------------------------------
// Group counts (bar chart data)
// ---------------------------------------------------------------------------

/// Distinct-listing count for one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub value: String,
    pub count: usize,
}

/// Count distinct `Food_ID`s per value of `column`, largest first.
///
/// Rows with a missing value are left out. Equal counts are ordered by
/// value.
pub fn group_counts(food: &[&FoodListing], column: ListingColumn) -> Vec<GroupCount> {
    let mut groups: BTreeMap<&str, BTreeSet<u64>> = BTreeMap::new();
    for row in food {
        if let Some(value) = column.value_of(row) {
            groups.entry(value).or_default().insert(row.food_id);
        }
    }

    let mut counts: Vec<GroupCount> = groups
        .into_iter()
        .map(|(value, ids)| GroupCount {
            value: value.to_string(),
            count: ids.len(),
        })
        .collect();
    // BTreeMap iteration is value-ordered, so a stable sort on count keeps
    // ties in value order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ---------------------------------------------------------------------------
// Display ordering
// ---------------------------------------------------------------------------

/// Missing values sort after every present value.
fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order listings by expiry date, then location, then meal type.
pub fn sort_listings_for_display(rows: &mut [&FoodListing]) {
    rows.sort_by(|a, b| {
        cmp_missing_last(a.expiry_date, b.expiry_date)
            .then_with(|| cmp_missing_last(a.location.as_deref(), b.location.as_deref()))
            .then_with(|| cmp_missing_last(a.meal_type.as_deref(), b.meal_type.as_deref()))
    });
}

/// Order claims newest first, claims without a timestamp last.
pub fn sort_claims_for_display(rows: &mut [&Claim]) {
    rows.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(a), Some(b)) => b.cmp(&a),
        (a, b) => cmp_missing_last(a, b),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn listing(id: u64, provider: u64, expiry: NaiveDate, meal: &str, city: &str) -> FoodListing {
        FoodListing {
            food_id: id,
            food_name: None,
            quantity: 1,
            expiry_date: Some(expiry),
            provider_id: provider,
            location: Some(city.into()),
            food_type: Some("Veg".into()),
            meal_type: Some(meal.into()),
        }
    }

    fn claim(id: u64, status: &str, hour: u32) -> Claim {
        Claim {
            claim_id: id,
            food_id: id,
            receiver_id: 1,
            status: Some(status.into()),
            timestamp: date(2024, 1, 1).and_hms_opt(hour, 0, 0),
        }
    }

    #[test]
    fn completed_rate_is_zero_without_claims() {
        let m = compute_metrics(&[], &[], date(2024, 1, 1));
        assert_eq!(m.completed_rate, 0.0);
        assert_eq!(m.total_listings, 0);
        assert_eq!(m.active_providers, 0);
    }

    #[test]
    fn completed_rate_half() {
        let claims = [claim(1, "Completed", 1), claim(2, "Pending", 2)];
        let refs: Vec<&Claim> = claims.iter().collect();
        let m = compute_metrics(&[], &refs, date(2024, 1, 1));
        assert_eq!(m.completed_rate, 50.0);
    }

    #[test]
    fn expiring_today_uses_injected_date() {
        let food = [
            listing(1, 1, date(2024, 1, 1), "Lunch", "A"),
            listing(2, 1, date(2024, 1, 2), "Lunch", "A"),
            listing(3, 2, date(2024, 1, 1), "Dinner", "B"),
        ];
        let refs: Vec<&FoodListing> = food.iter().collect();

        let m = compute_metrics(&refs, &[], date(2024, 1, 1));
        assert_eq!(m.expiring_today, 2);
        assert_eq!(m.total_listings, 3);
        assert_eq!(m.active_providers, 2);

        let m = compute_metrics(&refs, &[], date(2030, 6, 1));
        assert_eq!(m.expiring_today, 0);
    }

    #[test]
    fn group_counts_count_distinct_ids_largest_first() {
        let food = [
            listing(1, 1, date(2024, 1, 1), "Lunch", "A"),
            listing(1, 1, date(2024, 1, 1), "Lunch", "A"),
            listing(2, 1, date(2024, 1, 1), "Dinner", "B"),
            listing(3, 1, date(2024, 1, 1), "Dinner", "B"),
            listing(4, 1, date(2024, 1, 1), "Snacks", "B"),
        ];
        let refs: Vec<&FoodListing> = food.iter().collect();

        let counts = group_counts(&refs, ListingColumn::MealType);
        let pairs: Vec<(&str, usize)> = counts.iter().map(|g| (g.value.as_str(), g.count)).collect();
        assert_eq!(pairs, [("Dinner", 2), ("Lunch", 1), ("Snacks", 1)]);

        let by_city = group_counts(&refs, ListingColumn::Location);
        assert_eq!(by_city[0], GroupCount { value: "B".into(), count: 3 });
    }

    #[test]
    fn display_order_for_listings() {
        let mut no_city = listing(5, 1, date(2024, 1, 1), "Lunch", "A");
        no_city.location = None;
        let food = [
            listing(1, 1, date(2024, 1, 2), "Lunch", "A"),
            listing(2, 1, date(2024, 1, 1), "Lunch", "B"),
            listing(3, 1, date(2024, 1, 1), "Dinner", "B"),
            no_city,
            listing(4, 1, date(2024, 1, 1), "Lunch", "A"),
        ];
        let mut refs: Vec<&FoodListing> = food.iter().collect();
        sort_listings_for_display(&mut refs);
        let ids: Vec<u64> = refs.iter().map(|r| r.food_id).collect();
        assert_eq!(ids, [4, 3, 2, 5, 1]);
    }

    #[test]
    fn missing_expiry_never_expires_today_and_sorts_last() {
        let mut undated = listing(9, 3, date(2024, 1, 1), "Lunch", "A");
        undated.expiry_date = None;
        let food = [
            undated,
            listing(1, 1, date(2024, 1, 2), "Lunch", "B"),
            listing(2, 2, date(2024, 1, 1), "Lunch", "B"),
        ];
        let mut refs: Vec<&FoodListing> = food.iter().collect();

        let m = compute_metrics(&refs, &[], date(2024, 1, 1));
        assert_eq!(m.expiring_today, 1);
        assert_eq!(m.total_listings, 3);

        sort_listings_for_display(&mut refs);
        let ids: Vec<u64> = refs.iter().map(|r| r.food_id).collect();
        assert_eq!(ids, [2, 1, 9]);
    }

    #[test]
    fn claims_without_timestamp_sort_last() {
        let mut undated = claim(4, "Pending", 0);
        undated.timestamp = None;
        let claims = [undated, claim(1, "Pending", 3), claim(2, "Completed", 7)];
        let mut refs: Vec<&Claim> = claims.iter().collect();
        sort_claims_for_display(&mut refs);
        let ids: Vec<u64> = refs.iter().map(|c| c.claim_id).collect();
        assert_eq!(ids, [2, 1, 4]);
    }

    #[test]
    fn display_order_for_claims_is_newest_first() {
        let claims = [claim(1, "Pending", 3), claim(2, "Pending", 9), claim(3, "Completed", 5)];
        let mut refs: Vec<&Claim> = claims.iter().collect();
        sort_claims_for_display(&mut refs);
        let ids: Vec<u64> = refs.iter().map(|c| c.claim_id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }
}
