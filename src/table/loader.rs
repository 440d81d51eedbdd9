// table/loader.rs
use crate::table::schema::{placeholder_name, ColumnName, HeaderMode, TableSchema};
use crate::table::{Cell, RawTable, SchemaError};
use tracing::debug;

/// A loaded table: exactly the schema's columns, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<&'static str>,
    layout: Vec<ColumnName>,
    rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// 1-based row number in the source sheet.
    pub number: usize,
    cells: Vec<Option<String>>,
}

impl Table {
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Physical column names as found in the input, placeholders included.
    pub fn layout(&self) -> &[ColumnName] {
        &self.layout
    }

    pub fn unknown_columns(&self) -> Vec<String> {
        self.layout
            .iter()
            .filter(|c| !c.is_known())
            .map(|c| c.as_str().to_string())
            .collect()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get<'a>(&self, row: &'a TableRow, column: &str) -> Option<&'a str> {
        let idx = self.columns.iter().position(|c| *c == column)?;
        row.cells.get(idx).and_then(|c| c.as_deref())
    }
}

/// Restrict `raw` to the schema's columns.
///
/// Physical columns beyond what the schema names get `ColN` placeholders and
/// end up in `Table::layout`. Fully-empty rows are dropped. Fails with every
/// missing required column when the input is too narrow or the headers don't
/// match.
pub fn load(raw: &RawTable, schema: &TableSchema) -> Result<Table, SchemaError> {
    let width = raw.width_from(schema.header_offset);
    let header = raw.rows.get(schema.header_offset);

    let layout = match schema.header_mode {
        HeaderMode::Positional => (0..width)
            .map(|i| match schema.columns.get(i) {
                Some(spec) => ColumnName::Known(spec.name),
                None => ColumnName::Unknown(placeholder_name(i)),
            })
            .collect::<Vec<_>>(),
        HeaderMode::Named => named_layout(header.map(Vec::as_slice).unwrap_or(&[]), width, schema),
    };

    let missing: Vec<String> = schema
        .columns
        .iter()
        .filter(|spec| spec.required && !layout.contains(&ColumnName::Known(spec.name)))
        .map(|spec| spec.name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(SchemaError {
            table: schema.table.to_string(),
            missing,
        });
    }

    let positions: Vec<Option<usize>> = schema
        .columns
        .iter()
        .map(|spec| layout.iter().position(|c| *c == ColumnName::Known(spec.name)))
        .collect();

    let rows: Vec<TableRow> = raw
        .rows
        .iter()
        .enumerate()
        .skip(schema.header_offset + 1)
        .filter(|(_, cells)| !cells.iter().all(Cell::is_blank))
        .skip(schema.skip_data_rows)
        .map(|(i, cells)| TableRow {
            number: i + 1,
            cells: positions
                .iter()
                .map(|pos| pos.and_then(|p| cells.get(p)).and_then(Cell::text))
                .collect(),
        })
        .collect();

    debug!(
        table = schema.table,
        rows = rows.len(),
        physical_columns = width,
        "table loaded"
    );

    Ok(Table {
        columns: schema.column_names(),
        layout,
        rows,
    })
}

fn named_layout(header: &[Cell], width: usize, schema: &TableSchema) -> Vec<ColumnName> {
    let mut taken = vec![false; schema.columns.len()];

    (0..width)
        .map(|i| {
            let Some(text) = header.get(i).and_then(Cell::text) else {
                return ColumnName::Unknown(placeholder_name(i));
            };

            // First matching header wins; a repeated header becomes unknown.
            let spec = schema
                .columns
                .iter()
                .enumerate()
                .find(|(j, spec)| !taken[*j] && spec.matches_header(&text));

            match spec {
                Some((j, spec)) => {
                    taken[j] = true;
                    ColumnName::Known(spec.name)
                }
                None => ColumnName::Unknown(text),
            }
        })
        .collect()
}
