use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};

use food_dashboard::report::{render_json, render_options, render_text};
use food_dashboard::{load_dataset, Dataset, Dimension, Session};

#[derive(Parser)]
#[command(name = "food-dashboard")]
#[command(about = "Local food wastage dashboard: metrics, charts and tables over the cleaned CSVs")]
#[command(version)]
struct Cli {
    /// Directory holding the four cleaned_*.csv files
    #[arg(long, env = "FOOD_DASHBOARD_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Only listings in this city. Repeatable.
    #[arg(long, value_name = "CITY")]
    city: Vec<String>,

    /// Only listings of this meal type. Repeatable.
    #[arg(long, value_name = "MEAL")]
    meal: Vec<String>,

    /// Only listings of this food type. Repeatable.
    #[arg(long, value_name = "TYPE")]
    food_type: Vec<String>,

    /// Only claims with this status. Repeatable.
    #[arg(long, value_name = "STATUS")]
    status: Vec<String>,

    /// Date used for "Expiring Today" (YYYY-MM-DD); defaults to the local date
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Include the data tables in text output
    #[arg(long)]
    tables: bool,

    /// Print the available filter values and exit
    #[arg(long)]
    options: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = match load_dataset(&cli.data_dir) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            let e = anyhow::Error::new(e);
            log::error!("Failed to load data: {e:#}");
            eprintln!("Could not load data: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, dataset) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, dataset: Arc<Dataset>) -> Result<String> {
    if cli.options {
        return render_options(&dataset);
    }

    let mut session = Session::new(dataset);
    let mut selection = session.selection().clone();
    for (dim, values) in [
        (Dimension::City, &cli.city),
        (Dimension::MealType, &cli.meal),
        (Dimension::FoodType, &cli.food_type),
        (Dimension::ClaimStatus, &cli.status),
    ] {
        for value in values {
            if !session.dataset().options(dim).any(|o| o == value.as_str()) {
                log::warn!("{dim}: '{value}' does not occur in the data");
            }
            selection.get_mut(dim).insert(value.clone());
        }
    }
    session.set_selection(selection);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let view = session.view(today);

    match cli.format {
        Format::Text => render_text(&view, session.dataset(), cli.tables),
        Format::Json => render_json(&view, session.dataset()).context("rendering JSON"),
    }
}
