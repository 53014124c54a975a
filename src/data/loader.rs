use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{Claim, Dataset, FoodListing, Provider, Receiver};

pub const PROVIDERS_FILE: &str = "cleaned_providers.csv";
pub const RECEIVERS_FILE: &str = "cleaned_receivers.csv";
pub const FOOD_LISTINGS_FILE: &str = "cleaned_food_listings.csv";
pub const CLAIMS_FILE: &str = "cleaned_claims.csv";

const PROVIDER_COLUMNS: &[&str] = &["Provider_ID", "Name", "Type", "Address", "City", "Contact"];
const RECEIVER_COLUMNS: &[&str] = &["Receiver_ID", "Name", "Type", "City", "Contact"];
const FOOD_COLUMNS: &[&str] = &[
    "Food_ID",
    "Food_Name",
    "Quantity",
    "Expiry_Date",
    "Provider_ID",
    "Location",
    "Food_Type",
    "Meal_Type",
];
const CLAIM_COLUMNS: &[&str] = &["Claim_ID", "Food_ID", "Receiver_ID", "Status", "Timestamp"];

/// Anything that stops the four tables from loading. Always fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: file not found", path.display())]
    Missing { path: PathBuf },

    #[error("{}: cannot read file", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}: malformed CSV", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: row {row}, column {column}: cannot parse '{value}' as a date", path.display())]
    Date {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the four dashboard tables from `dir`.
///
/// Expected files (fixed names):
/// * `cleaned_providers.csv`
/// * `cleaned_receivers.csv`
/// * `cleaned_food_listings.csv` – `Expiry_Date` parsed as a date
/// * `cleaned_claims.csv`        – `Timestamp` parsed as a date-time
///
/// Empty date cells load as `None`; non-empty text that is not a date fails.
pub fn load_dataset(dir: &Path) -> Result<Dataset, LoadError> {
    let providers: Vec<Provider> = read_table(&dir.join(PROVIDERS_FILE), PROVIDER_COLUMNS)?;
    let receivers: Vec<Receiver> = read_table(&dir.join(RECEIVERS_FILE), RECEIVER_COLUMNS)?;
    let food = load_food_listings(&dir.join(FOOD_LISTINGS_FILE))?;
    let claims = load_claims(&dir.join(CLAIMS_FILE))?;

    log::info!(
        "Loaded {} providers, {} receivers, {} listings, {} claims from {}",
        providers.len(),
        receivers.len(),
        food.len(),
        claims.len(),
        dir.display()
    );

    Ok(Dataset::new(providers, receivers, food, claims))
}

// ---------------------------------------------------------------------------
// Per-table loaders
// ---------------------------------------------------------------------------

/// `FoodListing` as it sits in the file, before the date is parsed.
#[derive(Debug, Deserialize)]
struct RawFoodListing {
    #[serde(rename = "Food_ID")]
    food_id: u64,
    #[serde(rename = "Food_Name")]
    food_name: Option<String>,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Expiry_Date")]
    expiry_date: Option<String>,
    #[serde(rename = "Provider_ID")]
    provider_id: u64,
    #[serde(rename = "Location")]
    location: Option<String>,
    #[serde(rename = "Food_Type")]
    food_type: Option<String>,
    #[serde(rename = "Meal_Type")]
    meal_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawClaim {
    #[serde(rename = "Claim_ID")]
    claim_id: u64,
    #[serde(rename = "Food_ID")]
    food_id: u64,
    #[serde(rename = "Receiver_ID")]
    receiver_id: u64,
    #[serde(rename = "Status")]
    status: Option<String>,
    #[serde(rename = "Timestamp")]
    timestamp: Option<String>,
}

fn load_food_listings(path: &Path) -> Result<Vec<FoodListing>, LoadError> {
    let raw: Vec<RawFoodListing> = read_table(path, FOOD_COLUMNS)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            let expiry_date =
                parse_date_cell(path, i + 1, "Expiry_Date", r.expiry_date.as_deref())?
                    .map(|ts| ts.date());
            Ok(FoodListing {
                food_id: r.food_id,
                food_name: r.food_name,
                quantity: r.quantity,
                expiry_date,
                provider_id: r.provider_id,
                location: r.location,
                food_type: r.food_type,
                meal_type: r.meal_type,
            })
        })
        .collect()
}

fn load_claims(path: &Path) -> Result<Vec<Claim>, LoadError> {
    let raw: Vec<RawClaim> = read_table(path, CLAIM_COLUMNS)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            let timestamp = parse_date_cell(path, i + 1, "Timestamp", r.timestamp.as_deref())?;
            Ok(Claim {
                claim_id: r.claim_id,
                food_id: r.food_id,
                receiver_id: r.receiver_id,
                status: r.status,
                timestamp,
            })
        })
        .collect()
}

/// A blank cell is a missing date; anything else must parse.
fn parse_date_cell(
    path: &Path,
    row: usize,
    column: &'static str,
    cell: Option<&str>,
) -> Result<Option<NaiveDateTime>, LoadError> {
    let Some(text) = cell.filter(|t| !t.trim().is_empty()) else {
        return Ok(None);
    };
    parse_datetime(text).map(Some).ok_or_else(|| LoadError::Date {
        path: path.to_path_buf(),
        row,
        column,
        value: text.to_string(),
    })
}

/// Read every record of a headed CSV file into `T`.
///
/// Headers are checked up front so a missing column is reported by name
/// rather than as a deserialisation error on the first row. Only header
/// names are trimmed; cell text is kept as written.
fn read_table<T: DeserializeOwned>(path: &Path, required: &[&'static str]) -> Result<Vec<T>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => LoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes.as_slice());

    let headers = reader.headers().map_err(csv_err)?.clone();
    if let Some(column) = required.iter().copied().find(|c| !headers.iter().any(|h| h == *c)) {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column,
        });
    }

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_err)?;
    log::debug!("{}: {} rows", path.display(), rows.len());
    Ok(rows)
}

/// Write rows as a headed CSV file in the layout [`load_dataset`] reads.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a date or date-time cell. A bare date is read as midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_common_timestamp_layouts() {
        let expected = ymd_hms(2025, 3, 5, 5, 43, 0);
        assert_eq!(parse_datetime("2025-03-05 05:43:00"), Some(expected));
        assert_eq!(parse_datetime("2025-03-05T05:43:00"), Some(expected));
        assert_eq!(parse_datetime("2025-03-05 05:43"), Some(expected));
        assert_eq!(parse_datetime("3/5/2025 5:43"), Some(expected));
    }

    #[test]
    fn bare_date_is_midnight() {
        assert_eq!(
            parse_datetime(" 2025-03-17 "),
            Some(ymd_hms(2025, 3, 17, 0, 0, 0))
        );
        assert_eq!(parse_datetime("03/17/2025"), Some(ymd_hms(2025, 3, 17, 0, 0, 0)));
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("soon"), None);
        assert_eq!(parse_datetime("2025-13-40"), None);
    }

    #[test]
    fn blank_date_cell_is_missing_not_an_error() {
        let path = Path::new(FOOD_LISTINGS_FILE);
        assert_eq!(parse_date_cell(path, 1, "Expiry_Date", None).unwrap(), None);
        assert_eq!(parse_date_cell(path, 1, "Expiry_Date", Some("  ")).unwrap(), None);
        assert_eq!(
            parse_date_cell(path, 1, "Expiry_Date", Some("2025-03-17")).unwrap(),
            Some(ymd_hms(2025, 3, 17, 0, 0, 0))
        );
        match parse_date_cell(path, 4, "Timestamp", Some("later")).unwrap_err() {
            LoadError::Date { row, column, value, .. } => {
                assert_eq!((row, column, value.as_str()), (4, "Timestamp", "later"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_reported_by_path() {
        let err = load_dataset(Path::new("/definitely/not/here")).unwrap_err();
        match err {
            LoadError::Missing { path } => assert!(path.ends_with(PROVIDERS_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
