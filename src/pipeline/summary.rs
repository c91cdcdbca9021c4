//! Compact parameter display for pipeline operator chips.

use super::params::ParamValue;

/// Render a parameter value as a short chip label.
///
/// Images show only their filename, ranges print open ends as "None",
/// long lists and long strings are truncated so the chip stays one line.
pub fn format_param_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Image(image) => format!("\u{1F4F7} {}", image.filename),
        ParamValue::Range(from, to) => {
            format!("{} - {}", format_bound(*from), format_bound(*to))
        }
        ParamValue::List(items) => {
            let mut text = items
                .iter()
                .take(3)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if items.len() > 3 {
                text.push_str("...");
            }
            text
        }
        // Sliders hand back whole floats; show 15, not 15.0.
        ParamValue::Float(f) if f.fract() == 0.0 && f.is_finite() => {
            format!("{}", *f as i64)
        }
        ParamValue::Float(f) => f.to_string(),
        ParamValue::Integer(i) => i.to_string(),
        ParamValue::Text(s) => s.chars().take(30).collect(),
    }
}

fn format_bound(bound: Option<i64>) -> String {
    match bound {
        Some(value) => value.to_string(),
        None => "None".to_string(),
    }
}
