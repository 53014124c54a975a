//! Presentation: turns a [`DashboardView`] into text or JSON.

pub mod chart;
pub mod table;

use std::fmt::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::dashboard::DashboardView;
use crate::data::model::{Dataset, Dimension, Provider, Receiver};

const CHART_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

/// Headline metrics, the three charts and (optionally) the data tables.
pub fn render_text(view: &DashboardView<'_>, dataset: &Dataset, with_tables: bool) -> Result<String> {
    let mut out = String::new();
    let m = &view.metrics;

    writeln!(out, "Local Food Wastage Management — Dashboard")?;
    writeln!(out, "Clean data → insights → action")?;
    writeln!(out)?;
    writeln!(out, "Filters")?;
    for dim in Dimension::ALL {
        let selected = view.selection.get(dim);
        let shown = if selected.is_empty() {
            "(all)".to_string()
        } else {
            selected.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        writeln!(out, "  {dim}: {shown}")?;
    }
    writeln!(out)?;

    writeln!(out, "Total Food Listings   {}", m.total_listings)?;
    writeln!(out, "Expiring Today        {}  ({})", m.expiring_today, view.today)?;
    writeln!(out, "Claims Completed (%)  {:.1}%", m.completed_rate)?;
    writeln!(out, "Active Providers      {}", m.active_providers)?;
    writeln!(out)?;

    chart::bar_chart(&mut out, "Listings by City", &view.by_city, CHART_WIDTH)?;
    writeln!(out)?;
    chart::bar_chart(&mut out, "Listings by Meal Type", &view.by_meal_type, CHART_WIDTH)?;
    writeln!(out)?;
    chart::bar_chart(&mut out, "Listings by Food Type", &view.by_food_type, CHART_WIDTH)?;

    if with_tables {
        let sections = [
            ("Food Listings (filtered)", table::listings_batch(&view.listings)?),
            ("Claims (filtered)", table::claims_batch(&view.claims)?),
            ("Providers", table::providers_batch(&dataset.providers)?),
            ("Receivers", table::receivers_batch(&dataset.receivers)?),
        ];
        for (title, batch) in &sections {
            writeln!(out)?;
            writeln!(out, "{title}")?;
            out.push_str(&table::pretty(batch)?);
            writeln!(out)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Tip: use --city, --meal, --food-type and --status to segment the data."
    )?;
    Ok(out)
}

/// The sorted option list of every filter dimension.
pub fn render_options(dataset: &Dataset) -> Result<String> {
    let mut out = String::new();
    for dim in Dimension::ALL {
        writeln!(out, "{dim}")?;
        for value in dataset.options(dim) {
            writeln!(out, "  {value}")?;
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    view: &'a DashboardView<'a>,
    providers: &'a [Provider],
    receivers: &'a [Receiver],
}

/// The full view plus the reference tables, pretty-printed JSON.
pub fn render_json(view: &DashboardView<'_>, dataset: &Dataset) -> Result<String> {
    let report = JsonReport {
        view,
        providers: &dataset.providers,
        receivers: &dataset.receivers,
    };
    serde_json::to_string_pretty(&report).context("serialising report")
}
