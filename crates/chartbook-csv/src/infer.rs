//! Missing-value detection and per-column type inference.

use chartbook_core::table::{Cell, ColumnType};

/// Field contents (after trimming) read as a null cell.
const MISSING: &[&str] = &[
  "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "NULL", "null", "None",
  "#N/A", "<NA>",
];

pub(crate) fn is_missing(field: &str) -> bool {
  MISSING.contains(&field.trim())
}

/// Narrowest type that holds every non-null field of a column.
///
/// A column with no non-null fields is text.
pub(crate) fn column_type<'a>(
  fields: impl IntoIterator<Item = &'a str>,
) -> ColumnType {
  let mut inferred = None;
  for field in fields {
    let field = field.trim();
    let ty = if field.parse::<i64>().is_ok() {
      ColumnType::Integer
    } else if field.parse::<f64>().is_ok() {
      ColumnType::Real
    } else {
      return ColumnType::Text;
    };
    inferred = match (inferred, ty) {
      (Some(ColumnType::Real), _) | (_, ColumnType::Real) => Some(ColumnType::Real),
      _ => Some(ColumnType::Integer),
    };
  }
  inferred.unwrap_or(ColumnType::Text)
}

/// Convert a raw field into a cell of the column's inferred type.
pub(crate) fn to_cell(field: Option<String>, ty: ColumnType) -> Cell {
  let Some(field) = field else { return Cell::Null };
  match ty {
    ColumnType::Integer => match field.trim().parse() {
      Ok(i) => Cell::Integer(i),
      Err(_) => Cell::Text(field),
    },
    ColumnType::Real => match field.trim().parse() {
      Ok(r) => Cell::Real(r),
      Err(_) => Cell::Text(field),
    },
    ColumnType::Text => Cell::Text(field),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_markers() {
    for m in ["", " ", "NA", "NaN", "null", " None "] {
      assert!(is_missing(m), "{m:?} should be missing");
    }
    assert!(!is_missing("0"));
    assert!(!is_missing("none"));
  }

  #[test]
  fn integers_widen_to_real() {
    assert_eq!(column_type(["1", "2", "-3"]), ColumnType::Integer);
    assert_eq!(column_type(["1", "2.5"]), ColumnType::Real);
    assert_eq!(column_type(["1e3", "4"]), ColumnType::Real);
  }

  #[test]
  fn any_non_numeric_field_makes_text() {
    assert_eq!(column_type(["1", "two", "3"]), ColumnType::Text);
    assert_eq!(column_type(Vec::<&str>::new()), ColumnType::Text);
  }

  #[test]
  fn cells_follow_column_type() {
    assert_eq!(to_cell(Some(" 4 ".into()), ColumnType::Integer), Cell::Integer(4));
    assert_eq!(to_cell(Some("4".into()), ColumnType::Real), Cell::Real(4.0));
    assert_eq!(to_cell(Some("4".into()), ColumnType::Text), Cell::Text("4".into()));
    assert_eq!(to_cell(None, ColumnType::Integer), Cell::Null);
  }
}
