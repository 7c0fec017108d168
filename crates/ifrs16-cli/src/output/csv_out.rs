use serde_json::Value;
use std::io;

use super::{cell, rows, scalar_fields};

/// Write output as CSV to stdout.
///
/// Schedules and journals become one record per row. A result object
/// becomes field,value pairs of its headline figures; its nested schedules
/// need the `schedule` or `journals` command, since a CSV stream holds one
/// table.
pub fn print_csv(value: &Value) {
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());
    let written = write_csv(&mut wtr, value).and_then(|_| wtr.flush().map_err(csv::Error::from));
    if let Err(e) = written {
        log::error!("writing CSV: {e}");
    }
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    match value {
        Value::Object(map) => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in scalar_fields(map) {
                wtr.write_record([key, val.as_str()])?;
            }
        }
        Value::Array(arr) => match rows(arr) {
            Some(r) => {
                wtr.write_record(&r.headers)?;
                for row in &r.cells {
                    wtr.write_record(row)?;
                }
            }
            None => {
                for item in arr {
                    wtr.write_record([cell(item)])?;
                }
            }
        },
        other => wtr.write_record([cell(other)])?,
    }
    Ok(())
}
