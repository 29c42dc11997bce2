//! Read-only views derived from a [`Table`].
//!
//! Every function here reads the whole table and fails instead of returning
//! an empty result: a table with no rows yields [`Error::EmptyTable`], and a
//! table without the columns a view plots yields [`Error::MissingColumn`] or
//! [`Error::NotNumeric`].
//!
//! The two grouped aggregates (bar and pie) are computed by the store in SQL;
//! their row types, [`CategoryMean`] and [`CategoryCount`], live here so both
//! surfaces share them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  stats,
  table::{CATEGORY_COLUMN, Column, Table, VALUE_COLUMN},
};

/// Number of equal-width bins in the histogram view.
pub const HISTOGRAM_BINS: usize = 10;

// ─── View types ───────────────────────────────────────────────────────────────

/// Shape of the current table, shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
  pub columns:   Vec<Column>,
  pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
  /// `bins + 1` ascending bin edges.
  pub edges:  Vec<f64>,
  pub counts: Vec<u64>,
}

impl Histogram {
  pub fn total(&self) -> u64 { self.counts.iter().sum() }
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
  pub name:  String,
  pub count: usize,
  pub mean:  Option<f64>,
  pub std:   Option<f64>,
  pub min:   Option<f64>,
  pub q25:   Option<f64>,
  pub q50:   Option<f64>,
  pub q75:   Option<f64>,
  pub max:   Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
  pub index:    usize,
  pub value:    f64,
  pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
  pub index: usize,
  pub value: f64,
}

/// Mean `value` of one category. `mean` is `None` when every value in the
/// group is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMean {
  pub category: String,
  pub mean:     Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
  pub category: String,
  pub count:    u64,
}

/// Five-number summary of one category, with 1.5 × IQR whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
  pub category:      String,
  pub count:         usize,
  pub min:           f64,
  pub q1:            f64,
  pub median:        f64,
  pub q3:            f64,
  pub max:           f64,
  pub lower_whisker: f64,
  pub upper_whisker: f64,
  pub outliers:      Vec<f64>,
}

/// Pairwise Pearson correlation of the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
  pub columns: Vec<String>,
  /// Row-major, `columns.len()` square; `None` where undefined.
  pub values:  Vec<Vec<Option<f64>>>,
}

// ─── Views ────────────────────────────────────────────────────────────────────

pub fn overview(table: &Table) -> Overview {
  Overview {
    columns:   table.columns().to_vec(),
    row_count: table.row_count(),
  }
}

/// Non-null `value` cells. Fails when there are none, or when any of them is
/// infinite.
fn plotted_values(table: &Table) -> Result<Vec<f64>> {
  table.require_rows()?;
  let values: Vec<f64> = table
    .numeric_values(VALUE_COLUMN)?
    .into_iter()
    .flatten()
    .collect();
  if values.is_empty() {
    return Err(Error::EmptyTable);
  }
  if values.iter().any(|v| !v.is_finite()) {
    return Err(Error::NonFinite(VALUE_COLUMN.to_owned()));
  }
  Ok(values)
}

/// Bucket `value` into [`HISTOGRAM_BINS`] equal-width bins over its range.
pub fn histogram(table: &Table) -> Result<Histogram> {
  let values = plotted_values(table)?;
  Ok(bin(&values, HISTOGRAM_BINS))
}

fn bin(values: &[f64], bins: usize) -> Histogram {
  let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
  let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
  if lo == hi {
    lo -= 0.5;
    hi += 0.5;
  }
  // Half the range; `hi - lo` itself may overflow.
  let half = hi / 2.0 - lo / 2.0;
  let at = |t: f64| lo + half * t + half * t;

  let mut edges: Vec<f64> = (0..bins).map(|i| at(i as f64 / bins as f64)).collect();
  edges.push(hi);

  let mut counts = vec![0u64; bins];
  for v in values {
    let t = (v / 2.0 - lo / 2.0) / half;
    // The last bin is closed on the right so `max` lands in it.
    let idx = ((t * bins as f64) as usize).min(bins - 1);
    counts[idx] += 1;
  }
  Histogram { edges, counts }
}

/// Count, mean, std, min, quartiles and max of every numeric column.
pub fn summary(table: &Table) -> Result<Summary> {
  table.require_rows()?;
  let mut columns = Vec::new();
  for (idx, column) in table.numeric_columns() {
    let values: Vec<f64> =
      table.rows().iter().filter_map(|r| r[idx].as_f64()).collect();
    let sorted = stats::sorted(&values);
    columns.push(ColumnSummary {
      name:  column.name.clone(),
      count: values.len(),
      mean:  stats::mean(&values),
      std:   stats::sample_std(&values),
      min:   sorted.first().copied(),
      q25:   stats::quantile_sorted(&sorted, 0.25),
      q50:   stats::quantile_sorted(&sorted, 0.5),
      q75:   stats::quantile_sorted(&sorted, 0.75),
      max:   sorted.last().copied(),
    });
  }
  if columns.is_empty() {
    return Err(Error::NoNumericColumns);
  }
  Ok(Summary { columns })
}

/// Row index against `value`, tagged with the row's category label.
pub fn scatter(table: &Table) -> Result<Vec<ScatterPoint>> {
  table.require_rows()?;
  let values = table.numeric_values(VALUE_COLUMN)?;
  let labels = table.labels(CATEGORY_COLUMN)?;
  let points: Vec<ScatterPoint> = values
    .into_iter()
    .zip(labels)
    .enumerate()
    .filter_map(|(index, (value, category))| {
      Some(ScatterPoint { index, value: value?, category })
    })
    .collect();
  if points.is_empty() {
    return Err(Error::EmptyTable);
  }
  Ok(points)
}

/// Row index against `value`, in insertion order.
pub fn line(table: &Table) -> Result<Vec<LinePoint>> {
  table.require_rows()?;
  let points: Vec<LinePoint> = table
    .numeric_values(VALUE_COLUMN)?
    .into_iter()
    .enumerate()
    .filter_map(|(index, value)| Some(LinePoint { index, value: value? }))
    .collect();
  if points.is_empty() {
    return Err(Error::EmptyTable);
  }
  Ok(points)
}

/// Distribution of `value` per category, categories in first-seen order.
pub fn box_plot(table: &Table) -> Result<Vec<BoxStats>> {
  table.require_rows()?;
  let values = table.numeric_values(VALUE_COLUMN)?;
  let labels = table.labels(CATEGORY_COLUMN)?;

  let mut order: Vec<String> = Vec::new();
  let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
  for (value, label) in values.into_iter().zip(labels) {
    let Some(v) = value else { continue };
    groups
      .entry(label.clone())
      .or_insert_with(|| {
        order.push(label);
        Vec::new()
      })
      .push(v);
  }

  let boxes: Vec<BoxStats> = order
    .into_iter()
    .filter_map(|category| {
      let sample = groups.remove(&category)?;
      box_stats(category, &sample)
    })
    .collect();
  if boxes.is_empty() {
    return Err(Error::EmptyTable);
  }
  Ok(boxes)
}

fn box_stats(category: String, sample: &[f64]) -> Option<BoxStats> {
  let sorted = stats::sorted(sample);
  let q1 = stats::quantile_sorted(&sorted, 0.25)?;
  let median = stats::quantile_sorted(&sorted, 0.5)?;
  let q3 = stats::quantile_sorted(&sorted, 0.75)?;
  let iqr = q3 - q1;
  let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

  let in_range = |v: &f64| (low_fence..=high_fence).contains(v);
  let lower_whisker = sorted.iter().copied().find(|v| in_range(v)).unwrap_or(q1);
  let upper_whisker =
    sorted.iter().copied().rev().find(|v| in_range(v)).unwrap_or(q3);
  let outliers = sorted.iter().copied().filter(|v| !in_range(v)).collect();

  Some(BoxStats {
    category,
    count: sorted.len(),
    min: *sorted.first()?,
    q1,
    median,
    q3,
    max: *sorted.last()?,
    lower_whisker,
    upper_whisker,
    outliers,
  })
}

/// Pearson correlation of every pair of numeric columns.
pub fn correlation(table: &Table) -> Result<Correlation> {
  table.require_rows()?;
  let series: Vec<(String, Vec<Option<f64>>)> = table
    .numeric_columns()
    .map(|(idx, column)| {
      let values = table.rows().iter().map(|r| r[idx].as_f64()).collect();
      (column.name.clone(), values)
    })
    .collect();
  if series.is_empty() {
    return Err(Error::NoNumericColumns);
  }

  let values = series
    .iter()
    .enumerate()
    .map(|(i, (_, xs))| {
      series
        .iter()
        .enumerate()
        .map(|(j, (_, ys))| {
          // Exactly 1 on the diagonal.
          stats::pearson(xs, ys).map(|r| if i == j { 1.0 } else { r })
        })
        .collect()
    })
    .collect();
  Ok(Correlation {
    columns: series.into_iter().map(|(name, _)| name).collect(),
    values,
  })
}
