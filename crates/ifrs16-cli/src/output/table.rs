use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, rows, scalar_fields};

/// Print a lease result as tables.
///
/// Headline figures go in one Field/Value table. Each schedule, the journal
/// and the maturity analysis get their own titled table below it, and
/// sub-objects (the measurement, the disclosure) recurse.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => print_object(map),
        Value::Array(arr) => print_rows(arr),
        other => println!("{}", cell(other)),
    }
}

fn print_object(map: &Map<String, Value>) {
    let fields = scalar_fields(map);
    if !fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in fields {
            builder.push_record([heading(key), val]);
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in map {
        match val {
            Value::Array(arr) => {
                println!("\n{}:", heading(key));
                print_rows(arr);
            }
            Value::Object(inner) => {
                println!("\n{}:", heading(key));
                print_object(inner);
            }
            _ => {}
        }
    }
}

fn print_rows(arr: &[Value]) {
    if arr.is_empty() {
        println!("(none)");
        return;
    }
    match rows(arr) {
        Some(r) => {
            let mut builder = Builder::default();
            builder.push_record(r.headers.iter().map(|h| heading(h)));
            for row in r.cells {
                builder.push_record(row);
            }
            println!("{}", Table::from(builder));
        }
        None => {
            for item in arr {
                println!("{}", cell(item));
            }
        }
    }
}

/// `closing_balance` -> `Closing balance`
fn heading(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
