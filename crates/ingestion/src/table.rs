use crate::error::IngestError;

/// Field delimiter of every input table.
pub const DELIMITER: u8 = b';';

/// A header row plus data rows, every row padded to the header's width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of a column by its trimmed header. The last duplicate wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().rposition(|h| h.trim() == name)
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record { table: self, cells })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A borrowed data row that can be addressed by header name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Record<'a> {
    /// The raw cell under `name`, `None` when the table has no such column.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let idx = self.table.column_index(name)?;
        self.cells.get(idx).map(String::as_str)
    }

    /// The first candidate column holding a non-blank value, trimmed.
    pub fn first_of(&self, candidates: &[&str]) -> Option<&'a str> {
        candidates
            .iter()
            .filter_map(|name| self.get(name))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }
}

/// Parses a delimited table.
///
/// Invalid UTF-8 is replaced rather than rejected. Quoted fields, `""`
/// escapes and CRLF line endings are supported; short rows are padded with
/// empty cells and trailing blank rows are dropped.
pub fn read_table(bytes: &[u8], delimiter: u8) -> Result<Table, IngestError> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }

    while records
        .last()
        .is_some_and(|row| row.iter().all(|cell| cell.trim().is_empty()))
    {
        records.pop();
    }

    let mut rows = records.into_iter();
    let header = rows.next().unwrap_or_default();
    let width = header.len();
    let rows = rows
        .map(|mut row| {
            if row.len() < width {
                row.resize(width, String::new());
            }
            row
        })
        .collect();

    Ok(Table { header, rows })
}
