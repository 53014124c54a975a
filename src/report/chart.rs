use std::fmt::{self, Write};

use crate::data::aggregate::GroupCount;

// ---------------------------------------------------------------------------
// Horizontal text bar chart
// ---------------------------------------------------------------------------

const BAR: char = '█';

/// Write group counts as one labelled bar per value.
///
/// The largest count spans `width` cells; every non-zero count gets at
/// least one cell so small groups stay visible.
pub fn bar_chart<W: Write>(out: &mut W, title: &str, counts: &[GroupCount], width: usize) -> fmt::Result {
    writeln!(out, "{title}")?;

    if counts.is_empty() {
        return writeln!(out, "  (no data)");
    }

    let label_width = counts.iter().map(|g| g.value.chars().count()).max().unwrap_or(0);
    let max = counts.iter().map(|g| g.count).max().unwrap_or(0).max(1);

    for g in counts {
        let cells = if g.count == 0 {
            0
        } else {
            (g.count * width).div_ceil(max).max(1)
        };
        let bar: String = std::iter::repeat(BAR).take(cells).collect();
        writeln!(out, "  {:<label_width$}  {bar} {}", g.value, g.count)?;
    }
    Ok(())
}
