// export/csv.rs
use crate::domain::MergedRecord;
use crate::export::columns::{headers, row_values, DisplayColumn};

pub const DEFAULT_DELIMITER: char = ';';

/// Delimited text, header row first, CRLF line endings.
///
/// A field is quoted when it holds the delimiter, a quote or a line break;
/// quotes inside are doubled.
pub fn write_csv(rows: &[&MergedRecord], columns: &[DisplayColumn], delimiter: char) -> String {
    let mut out = String::new();

    push_line(&mut out, headers(columns).into_iter().map(str::to_string), delimiter);

    for row in rows {
        let values = row_values(row, columns).into_iter().map(|v| v.render());
        push_line(&mut out, values, delimiter);
    }

    out
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>, delimiter: char) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.push_str(&quote(&field, delimiter));
    }
    out.push_str("\r\n");
}

fn quote(field: &str, delimiter: char) -> String {
    let needs_quotes = field.contains(delimiter)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');

    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
