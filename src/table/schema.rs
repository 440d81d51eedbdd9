// table/schema.rs

/// One expected logical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Header spellings seen in the wild, matched after `normalize_header`.
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    pub const fn required(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            required: false,
        }
    }

    pub fn matches_header(&self, header: &str) -> bool {
        let header = normalize_header(header);
        normalize_header(self.name) == header
            || self.aliases.iter().any(|a| normalize_header(a) == header)
    }
}

/// How physical columns get their names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// The header row names the columns; cells are matched against aliases.
    Named,
    /// Column `i` takes the name of the `i`-th schema column. The header row is ignored.
    Positional,
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Used in error messages and logs.
    pub table: &'static str,
    pub columns: Vec<ColumnSpec>,
    /// Zero-based index of the header row.
    pub header_offset: usize,
    pub header_mode: HeaderMode,
    /// Non-empty data rows to discard right after the header.
    pub skip_data_rows: usize,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

/// Name of one physical column: either a schema column or something we don't know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnName {
    Known(&'static str),
    Unknown(String),
}

impl ColumnName {
    pub fn as_str(&self) -> &str {
        match self {
            ColumnName::Known(name) => name,
            ColumnName::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ColumnName::Known(_))
    }
}

/// Placeholder for a column with no usable header, 1-based like a sheet.
pub fn placeholder_name(index: usize) -> String {
    format!("Col{}", index + 1)
}

/// "Placa:" / "  placa " / "Localização/Filial Atual*:" compare equal to their bare form.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_end_matches(|c: char| c == '*' || c == ':' || c.is_whitespace())
        .to_lowercase()
}
