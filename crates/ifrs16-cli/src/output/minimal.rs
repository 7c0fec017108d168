use serde_json::Value;

use super::cell;

/// Headline figure of each command's output, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "initial_lease_liability",
    "carrying_liability",
    "closing_balance",
    "net_carrying_amount",
    "present_value",
    "contract_id",
];

/// Print the one figure a script would want.
///
/// A result prints its initial liability, a disclosure its carrying
/// liability. Row lists print the last row's headline, e.g. the final
/// closing balance of a schedule.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let target = match value {
        Value::Array(rows) => match rows.last() {
            Some(last) => last,
            None => return "(none)".to_string(),
        },
        other => other,
    };
    match target {
        Value::Object(map) => PRIORITY_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !v.is_null())
            .map(cell)
            .unwrap_or_else(|| serde_json::to_string(target).unwrap_or_default()),
        other => cell(other),
    }
}
