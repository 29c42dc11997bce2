//! Record-level CSV decoding.
//!
//! Pipeline:
//!   raw bytes
//!     └─ strip BOM, read records      → header + Vec<Vec<Option<String>>>
//!          └─ header_names()          → unique column names
//!               └─ infer::column_type → one type per column
//!                    └─ infer::to_cell → Table

use chartbook_core::table::{Column, Table};
use csv::{ReaderBuilder, StringRecord};

use crate::{
  error::{Error, Result},
  infer,
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) fn parse_table(input: &[u8]) -> Result<Table> {
  let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
  let mut reader = ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .from_reader(input);
  let mut records = reader.records();

  let header = records.next().ok_or(Error::Empty)??;
  let names = header_names(&header);
  let width = names.len();

  let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
  for record in records {
    let record = record?;
    if record.len() > width {
      return Err(Error::RaggedRecord {
        line:     record.position().map_or(0, |p| p.line()),
        expected: width,
        found:    record.len(),
      });
    }
    let mut row: Vec<Option<String>> = record
      .iter()
      .map(|f| (!infer::is_missing(f)).then(|| f.to_owned()))
      .collect();
    // Short records are padded with nulls.
    row.resize(width, None);
    raw_rows.push(row);
  }

  let types: Vec<_> = (0..width)
    .map(|c| infer::column_type(raw_rows.iter().filter_map(|r| r[c].as_deref())))
    .collect();

  let rows = raw_rows
    .into_iter()
    .map(|row| {
      row
        .into_iter()
        .zip(&types)
        .map(|(field, ty)| infer::to_cell(field, *ty))
        .collect()
    })
    .collect();

  let columns = names
    .into_iter()
    .zip(types)
    .map(|(name, ty)| Column::new(name, ty))
    .collect();

  Ok(Table::new(columns, rows)?)
}

/// Column names from the header record.
///
/// Blank names become `Unnamed: <position>`; repeated names get `.1`, `.2`,
/// ... suffixes so every column is addressable. Names are compared ASCII
/// case-insensitively, as SQL identifiers are.
fn header_names(header: &StringRecord) -> Vec<String> {
  let mut names: Vec<String> = Vec::with_capacity(header.len());
  for (i, raw) in header.iter().enumerate() {
    let base = if raw.is_empty() {
      format!("Unnamed: {i}")
    } else {
      raw.to_owned()
    };
    let mut name = base.clone();
    let mut n = 0;
    while names.iter().any(|taken| taken.eq_ignore_ascii_case(&name)) {
      n += 1;
      name = format!("{base}.{n}");
    }
    names.push(name);
  }
  names
}
