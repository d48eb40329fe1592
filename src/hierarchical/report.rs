// Text report for the hierarchical timer
//
// Depth-first walk over the tree. The default layout is the fixed-width
// table existing tooling parses, so column widths and number formats must
// not drift:
//
//   name{:<30} total{%15.2e} calls{%15d} avg{%15.2e} pct{%15.1f}%
//
// Top-level rows stop after the average column because the implicit root
// has no time of its own to take a percentage of.

use super::accumulator::RegionAccumulator;
use serde::{Deserialize, Serialize};

const NOT_APPLICABLE: &str = "N/A";
const OTHER_ROW: &str = "other";

/// Column layout for [`HierarchicalTimer::report_with`](crate::HierarchicalTimer::report_with)
///
/// # Example
/// ```
/// use hitimer::ReportStyle;
///
/// let style = ReportStyle::default();
/// assert_eq!(style.name_width, 30);
/// assert_eq!(style.column_width, 15);
/// assert_eq!(style.indent_width, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStyle {
    /// Minimum width of the name column (longer names are not truncated)
    pub name_width: usize,
    /// Width of each numeric column
    pub column_width: usize,
    /// Spaces of indentation per nesting level
    pub indent_width: usize,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            name_width: 30,
            column_width: 15,
            indent_width: 4,
        }
    }
}

/// Render every region below `root`
pub(crate) fn render(root: &RegionAccumulator, style: &ReportStyle) -> String {
    let mut out = String::new();
    for (name, region) in root.children() {
        out.push_str(&format!(
            "{:<nw$}{:>cw$}{:>cw$}{:>cw$}\n",
            name,
            format_sci(region.total_time(), 2),
            region.call_count(),
            format_sci(region.average_time(), 2),
            nw = style.name_width,
            cw = style.column_width,
        ));
        render_level(&mut out, region, 1, style);
    }
    out
}

/// Rows for the children of `parent`, followed by its `other` row
fn render_level(out: &mut String, parent: &RegionAccumulator, depth: usize, style: &ReportStyle) {
    if !parent.has_children() {
        return;
    }

    let indent = " ".repeat(style.indent_width * depth);
    let nw = style.name_width;
    let cw = style.column_width;

    for (name, child) in parent.children() {
        out.push_str(&format!(
            "{}{:<nw$}{:>cw$}{:>cw$}{:>cw$}{:>cw$}%\n",
            indent,
            name,
            format_sci(child.total_time(), 2),
            child.call_count(),
            format_sci(child.average_time(), 2),
            format_fixed(parent.percent_of_total(child.total_time()), 1),
        ));
        render_level(out, child, depth + 1, style);
    }

    let other = parent.total_time() - parent.children_time();
    out.push_str(&format!(
        "{}{:<nw$}{:>cw$}{:>cw$}{:>cw$}{:>cw$}%\n",
        indent,
        OTHER_ROW,
        format_sci(other, 2),
        NOT_APPLICABLE,
        NOT_APPLICABLE,
        format_fixed(parent.percent_of_total(other), 1),
    ));
}

/// printf-style `%.Ne`: signed exponent with at least two digits
///
/// Rust's `{:e}` writes `1.5e0`; the report needs `1.50e+00`.
pub fn format_sci(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}

/// printf-style `%.Nf`
pub fn format_fixed(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    format!("{:.*}", precision, value)
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}
