pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Column order for the row shapes the lease commands print. serde_json
/// sorts object keys, so without these a schedule would read
/// closing_balance, due_date, interest, ...
const ROW_LAYOUTS: [&[&str]; 5] = [
    &[
        "period",
        "due_date",
        "opening_balance",
        "rent",
        "interest",
        "principal",
        "closing_balance",
        "is_extension",
    ],
    &[
        "period",
        "date",
        "opening_carrying_amount",
        "depreciation",
        "accumulated_depreciation",
        "net_carrying_amount",
    ],
    &[
        "event", "kind", "period", "date", "account", "debit", "credit", "memo",
    ],
    &["label", "payments", "undiscounted", "present_value"],
    &[
        "year",
        "rent_paid",
        "interest_expense",
        "principal_repaid",
        "depreciation",
        "total_expense",
        "closing_liability",
        "closing_rou_carrying_amount",
    ],
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// A list of schedule, journal or tranche rows flattened to text.
#[derive(Debug, PartialEq)]
pub(crate) struct Rows {
    pub headers: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

/// Flatten an array of row objects. Returns `None` for anything that is not
/// a list of objects. Cells for keys a row omits (the period of a
/// recognition entry) are left blank.
pub(crate) fn rows(arr: &[Value]) -> Option<Rows> {
    let objects: Vec<&Map<String, Value>> = arr.iter().filter_map(Value::as_object).collect();
    if objects.is_empty() || objects.len() != arr.len() {
        return None;
    }

    let headers: Vec<String> = match ROW_LAYOUTS
        .iter()
        .find(|layout| objects.iter().all(|o| o.keys().all(|k| layout.contains(&k.as_str()))))
    {
        Some(layout) => layout.iter().map(|c| c.to_string()).collect(),
        None => {
            let mut keys: Vec<String> = Vec::new();
            for key in objects.iter().flat_map(|o| o.keys()) {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            keys
        }
    };

    let cells = objects
        .iter()
        .map(|o| {
            headers
                .iter()
                .map(|h| o.get(h).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();
    Some(Rows { headers, cells })
}

/// Scalar fields of an object, in key order. Nested row lists and
/// sub-objects are left to the caller.
pub(crate) fn scalar_fields(map: &Map<String, Value>) -> Vec<(&str, String)> {
    map.iter()
        .filter(|(_, v)| !matches!(v, Value::Array(_) | Value::Object(_)))
        .map(|(k, v)| (k.as_str(), cell(v)))
        .collect()
}

/// Decimal amounts arrive as strings and print as-is.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
