use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, StringArray, TimestampSecondArray, UInt32Array, UInt64Array};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::NaiveDate;

use crate::data::model::{Claim, FoodListing, Provider, Receiver};

// ---------------------------------------------------------------------------
// Row slices → Arrow record batches
// ---------------------------------------------------------------------------

fn text<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    Arc::new(StringArray::from(values.collect::<Vec<_>>()))
}

fn ids(values: impl Iterator<Item = u64>) -> ArrayRef {
    Arc::new(UInt64Array::from(values.collect::<Vec<_>>()))
}

/// Days since 1970-01-01, Arrow's `Date32` encoding.
fn date32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}

pub fn listings_batch(rows: &[&FoodListing]) -> Result<RecordBatch> {
    RecordBatch::try_from_iter([
        ("Food_ID", ids(rows.iter().map(|r| r.food_id))),
        ("Food_Name", text(rows.iter().map(|r| r.food_name.as_deref()))),
        (
            "Quantity",
            Arc::new(UInt32Array::from(rows.iter().map(|r| r.quantity).collect::<Vec<_>>())) as ArrayRef,
        ),
        (
            "Expiry_Date",
            Arc::new(Date32Array::from(
                rows.iter().map(|r| r.expiry_date.map(date32)).collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
        ("Provider_ID", ids(rows.iter().map(|r| r.provider_id))),
        ("Location", text(rows.iter().map(|r| r.location.as_deref()))),
        ("Food_Type", text(rows.iter().map(|r| r.food_type.as_deref()))),
        ("Meal_Type", text(rows.iter().map(|r| r.meal_type.as_deref()))),
    ])
    .context("building listings table")
}

pub fn claims_batch(rows: &[&Claim]) -> Result<RecordBatch> {
    RecordBatch::try_from_iter([
        ("Claim_ID", ids(rows.iter().map(|c| c.claim_id))),
        ("Food_ID", ids(rows.iter().map(|c| c.food_id))),
        ("Receiver_ID", ids(rows.iter().map(|c| c.receiver_id))),
        ("Status", text(rows.iter().map(|c| c.status.as_deref()))),
        (
            "Timestamp",
            Arc::new(TimestampSecondArray::from(
                rows.iter()
                    .map(|c| c.timestamp.map(|ts| ts.and_utc().timestamp()))
                    .collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
    ])
    .context("building claims table")
}

pub fn providers_batch(rows: &[Provider]) -> Result<RecordBatch> {
    RecordBatch::try_from_iter([
        ("Provider_ID", ids(rows.iter().map(|p| p.provider_id))),
        ("Name", text(rows.iter().map(|p| p.name.as_deref()))),
        ("Type", text(rows.iter().map(|p| p.provider_type.as_deref()))),
        ("Address", text(rows.iter().map(|p| p.address.as_deref()))),
        ("City", text(rows.iter().map(|p| p.city.as_deref()))),
        ("Contact", text(rows.iter().map(|p| p.contact.as_deref()))),
    ])
    .context("building providers table")
}

pub fn receivers_batch(rows: &[Receiver]) -> Result<RecordBatch> {
    RecordBatch::try_from_iter([
        ("Receiver_ID", ids(rows.iter().map(|r| r.receiver_id))),
        ("Name", text(rows.iter().map(|r| r.name.as_deref()))),
        ("Type", text(rows.iter().map(|r| r.receiver_type.as_deref()))),
        ("City", text(rows.iter().map(|r| r.city.as_deref()))),
        ("Contact", text(rows.iter().map(|r| r.contact.as_deref()))),
    ])
    .context("building receivers table")
}

/// Render a batch as a boxed ASCII table.
pub fn pretty(batch: &RecordBatch) -> Result<String> {
    Ok(pretty_format_batches(std::slice::from_ref(batch))
        .context("formatting table")?
        .to_string())
}
