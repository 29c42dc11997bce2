//! SVG chart generation.
//!
//! Uses `quick-xml`'s writer API, so every label and attribute is escaped on
//! the way out. Each public function returns a complete standalone
//! `<svg>` document as bytes.

use std::{collections::HashMap, f64::consts::PI, io::Cursor};

use chartbook_core::view::{
  BoxStats, CategoryCount, CategoryMean, Correlation, Histogram, LinePoint,
  ScatterPoint,
};
use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

type Result<T> = std::io::Result<T>;

// ─── Geometry ─────────────────────────────────────────────────────────────────

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;
const LEFT: f64 = 70.0;
const RIGHT: f64 = 140.0;
const TOP: f64 = 48.0;
const BOTTOM: f64 = 60.0;

const AXIS_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#e5e5e5";
const BAR_COLOR: &str = "#4c72b0";
const EMPTY_CELL: &str = "#eeeeee";

const PALETTE: &[&str] = &[
  "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
  "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

fn colour(i: usize) -> &'static str { PALETTE[i % PALETTE.len()] }

/// Format a coordinate or label number compactly.
fn n(v: f64) -> String {
  if v.fract() == 0.0 && v.abs() < 1e15 {
    format!("{v:.0}")
  } else {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_owned()
  }
}

/// Linear map from a data range onto a pixel range.
#[derive(Clone, Copy)]
struct Scale {
  lo:   f64,
  hi:   f64,
  from: f64,
  to:   f64,
}

impl Scale {
  fn at(&self, v: f64) -> f64 {
    if self.hi == self.lo {
      return (self.from + self.to) / 2.0;
    }
    self.from + (v - self.lo) / (self.hi - self.lo) * (self.to - self.from)
  }
}

fn x_scale(lo: f64, hi: f64) -> Scale {
  Scale { lo, hi, from: LEFT, to: WIDTH - RIGHT }
}

fn y_scale(lo: f64, hi: f64) -> Scale {
  Scale { lo, hi, from: HEIGHT - BOTTOM, to: TOP }
}

/// Widen `[lo, hi]` by 5% on each side; a degenerate range becomes ±1.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
  if lo == hi {
    return (lo - 1.0, hi + 1.0);
  }
  let pad = (hi - lo) * 0.05;
  (lo - pad, hi + pad)
}

/// `count + 1` evenly spaced values from `lo` to `hi`.
fn ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
  (0..=count)
    .map(|i| lo + (hi - lo) * i as f64 / count as f64)
    .collect()
}

fn min_max(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
  values
    .into_iter()
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
      (lo.min(v), hi.max(v))
    })
}

/// Categories in first-seen order with their palette index.
fn category_colours<'a>(
  labels: impl IntoIterator<Item = &'a str>,
) -> (Vec<&'a str>, HashMap<&'a str, usize>) {
  let mut order = Vec::new();
  let mut index = HashMap::new();
  for label in labels {
    index.entry(label).or_insert_with(|| {
      order.push(label);
      order.len() - 1
    });
  }
  (order, index)
}

// ─── Writer ───────────────────────────────────────────────────────────────────

struct Svg {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Svg {
  fn new(title: &str) -> Result<Self> {
    let mut svg = Self { writer: Writer::new(Cursor::new(Vec::new())) };
    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
    root.push_attribute(("width", n(WIDTH).as_str()));
    root.push_attribute(("height", n(HEIGHT).as_str()));
    root.push_attribute(("viewBox", format!("0 0 {} {}", n(WIDTH), n(HEIGHT)).as_str()));
    root.push_attribute(("font-family", "sans-serif"));
    svg.writer.write_event(Event::Start(root))?;
    svg.empty("rect", &[
      ("width", n(WIDTH)),
      ("height", n(HEIGHT)),
      ("fill", "white".into()),
    ])?;
    svg.text(WIDTH / 2.0, TOP / 2.0 + 6.0, "middle", 16.0, title)?;
    Ok(svg)
  }

  fn empty(&mut self, tag: &str, attrs: &[(&str, String)]) -> Result<()> {
    let mut el = BytesStart::new(tag);
    for (k, v) in attrs {
      el.push_attribute((*k, v.as_str()));
    }
    self.writer.write_event(Event::Empty(el))
  }

  fn text(
    &mut self,
    x: f64,
    y: f64,
    anchor: &str,
    size: f64,
    content: &str,
  ) -> Result<()> {
    let mut el = BytesStart::new("text");
    el.push_attribute(("x", n(x).as_str()));
    el.push_attribute(("y", n(y).as_str()));
    el.push_attribute(("text-anchor", anchor));
    el.push_attribute(("font-size", n(size).as_str()));
    self.writer.write_event(Event::Start(el))?;
    self.writer.write_event(Event::Text(BytesText::new(content)))?;
    self.writer.write_event(Event::End(BytesEnd::new("text")))
  }

  fn rotated_text(&mut self, x: f64, y: f64, content: &str) -> Result<()> {
    let mut el = BytesStart::new("text");
    el.push_attribute(("x", n(x).as_str()));
    el.push_attribute(("y", n(y).as_str()));
    el.push_attribute(("text-anchor", "middle"));
    el.push_attribute(("font-size", "12"));
    el.push_attribute((
      "transform",
      format!("rotate(-90 {} {})", n(x), n(y)).as_str(),
    ));
    self.writer.write_event(Event::Start(el))?;
    self.writer.write_event(Event::Text(BytesText::new(content)))?;
    self.writer.write_event(Event::End(BytesEnd::new("text")))
  }

  fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) -> Result<()> {
    self.empty("line", &[
      ("x1", n(x1)),
      ("y1", n(y1)),
      ("x2", n(x2)),
      ("y2", n(y2)),
      ("stroke", stroke.into()),
    ])
  }

  fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) -> Result<()> {
    self.empty("rect", &[
      ("x", n(x)),
      ("y", n(y)),
      ("width", n(w.max(0.0))),
      ("height", n(h.max(0.0))),
      ("fill", fill.into()),
      ("stroke", "white".into()),
    ])
  }

  fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) -> Result<()> {
    self.empty("circle", &[
      ("cx", n(cx)),
      ("cy", n(cy)),
      ("r", n(r)),
      ("fill", fill.into()),
    ])
  }

  /// Y-axis gridlines and labels, x-axis baseline, and axis titles.
  fn axes(&mut self, y: Scale, x_label: &str, y_label: &str) -> Result<()> {
    for t in ticks(y.lo, y.hi, 5) {
      let py = y.at(t);
      self.line(LEFT, py, WIDTH - RIGHT, py, GRID_COLOR)?;
      self.text(LEFT - 6.0, py + 4.0, "end", 11.0, &n(t))?;
    }
    self.line(LEFT, HEIGHT - BOTTOM, WIDTH - RIGHT, HEIGHT - BOTTOM, AXIS_COLOR)?;
    self.line(LEFT, TOP, LEFT, HEIGHT - BOTTOM, AXIS_COLOR)?;
    self.text((LEFT + WIDTH - RIGHT) / 2.0, HEIGHT - 16.0, "middle", 12.0, x_label)?;
    self.rotated_text(18.0, (TOP + HEIGHT - BOTTOM) / 2.0, y_label)
  }

  fn x_tick(&mut self, px: f64, label: &str) -> Result<()> {
    let base = HEIGHT - BOTTOM;
    self.line(px, base, px, base + 4.0, AXIS_COLOR)?;
    self.text(px, base + 18.0, "middle", 11.0, label)
  }

  fn legend(&mut self, entries: &[(String, &str)]) -> Result<()> {
    let x = WIDTH - RIGHT + 14.0;
    for (i, (label, fill)) in entries.iter().enumerate() {
      let y = TOP + 10.0 + 18.0 * i as f64;
      self.rect(x, y - 9.0, 10.0, 10.0, fill)?;
      self.text(x + 16.0, y, "start", 11.0, label)?;
    }
    Ok(())
  }

  fn finish(mut self) -> Result<Vec<u8>> {
    self.writer.write_event(Event::End(BytesEnd::new("svg")))?;
    Ok(self.writer.into_inner().into_inner())
  }
}

// ─── Charts ───────────────────────────────────────────────────────────────────

pub fn histogram(hist: &Histogram) -> Result<Vec<u8>> {
  let mut svg = Svg::new("Histogram of Values")?;
  let (first, last) = min_max(hist.edges.iter().copied());
  let top = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
  let x = x_scale(first, last);
  let y = y_scale(0.0, top);

  svg.axes(y, "Value", "Frequency")?;
  for (i, count) in hist.counts.iter().enumerate() {
    let (x0, x1) = (x.at(hist.edges[i]), x.at(hist.edges[i + 1]));
    let py = y.at(*count as f64);
    svg.rect(x0, py, x1 - x0, y.at(0.0) - py, BAR_COLOR)?;
  }
  for t in ticks(first, last, 5) {
    svg.x_tick(x.at(t), &n(t))?;
  }
  svg.finish()
}

pub fn scatter(points: &[ScatterPoint]) -> Result<Vec<u8>> {
  let mut svg = Svg::new("Scatter Plot of Values")?;
  let (i_lo, i_hi) = min_max(points.iter().map(|p| p.index as f64));
  let (v_lo, v_hi) = min_max(points.iter().map(|p| p.value));
  let (x_lo, x_hi) = padded(i_lo, i_hi);
  let (y_lo, y_hi) = padded(v_lo, v_hi);
  let (x, y) = (x_scale(x_lo, x_hi), y_scale(y_lo, y_hi));

  svg.axes(y, "Index", "Value")?;
  for t in ticks(i_lo, i_hi, 5) {
    svg.x_tick(x.at(t), &n(t))?;
  }

  let (order, index) = category_colours(points.iter().map(|p| p.category.as_str()));
  for p in points {
    let fill = colour(index.get(p.category.as_str()).copied().unwrap_or(0));
    svg.circle(x.at(p.index as f64), y.at(p.value), 4.0, fill)?;
  }
  let entries: Vec<(String, &str)> = order
    .iter()
    .enumerate()
    .map(|(i, label)| ((*label).to_owned(), colour(i)))
    .collect();
  svg.legend(&entries)?;
  svg.finish()
}

pub fn line(points: &[LinePoint]) -> Result<Vec<u8>> {
  let mut svg = Svg::new("Line Chart of Values")?;
  let (i_lo, i_hi) = min_max(points.iter().map(|p| p.index as f64));
  let (v_lo, v_hi) = min_max(points.iter().map(|p| p.value));
  let (y_lo, y_hi) = padded(v_lo, v_hi);
  let (x, y) = (x_scale(i_lo, i_hi), y_scale(y_lo, y_hi));

  svg.axes(y, "index", "value")?;
  for t in ticks(i_lo, i_hi, 5) {
    svg.x_tick(x.at(t), &n(t))?;
  }

  let path: Vec<String> = points
    .iter()
    .map(|p| format!("{},{}", n(x.at(p.index as f64)), n(y.at(p.value))))
    .collect();
  svg.empty("polyline", &[
    ("points", path.join(" ")),
    ("fill", "none".into()),
    ("stroke", colour(0).into()),
    ("stroke-width", "2".into()),
  ])?;
  svg.finish()
}

/// Width of one category band and the pixel centre of band `i`.
fn band(count: usize, i: usize) -> (f64, f64) {
  let width = (WIDTH - RIGHT - LEFT) / count.max(1) as f64;
  (width, LEFT + width * (i as f64 + 0.5))
}

pub fn bar(means: &[CategoryMean]) -> Result<Vec<u8>> {
  let mut svg = Svg::new("Average Value per Category")?;
  let (lo, hi) = min_max(means.iter().filter_map(|m| m.mean));
  let (_, top) = padded(lo.min(0.0), hi.max(0.0));
  let bottom = if lo < 0.0 { padded(lo, hi.max(0.0)).0 } else { 0.0 };
  let y = y_scale(bottom, top);

  svg.axes(y, "category", "avg_value")?;
  for (i, m) in means.iter().enumerate() {
    let (width, centre) = band(means.len(), i);
    if let Some(mean) = m.mean {
      let (y0, y1) = (y.at(0.0), y.at(mean));
      svg.rect(centre - width * 0.35, y0.min(y1), width * 0.7, (y0 - y1).abs(), BAR_COLOR)?;
    }
    svg.x_tick(centre, &m.category)?;
  }
  svg.finish()
}

pub fn box_plot(boxes: &[BoxStats]) -> Result<Vec<u8>> {
  let mut svg = Svg::new("Box Plot of Values by Category")?;
  let (lo, hi) = min_max(boxes.iter().flat_map(|b| [b.min, b.max]));
  let (y_lo, y_hi) = padded(lo, hi);
  let y = y_scale(y_lo, y_hi);

  svg.axes(y, "category", "value")?;
  for (i, b) in boxes.iter().enumerate() {
    let (width, centre) = band(boxes.len(), i);
    let half = (width * 0.3).min(40.0);
    let fill = colour(i);

    svg.line(centre, y.at(b.lower_whisker), centre, y.at(b.q1), AXIS_COLOR)?;
    svg.line(centre, y.at(b.q3), centre, y.at(b.upper_whisker), AXIS_COLOR)?;
    for whisker in [b.lower_whisker, b.upper_whisker] {
      let py = y.at(whisker);
      svg.line(centre - half / 2.0, py, centre + half / 2.0, py, AXIS_COLOR)?;
    }
    let (top, bottom) = (y.at(b.q3), y.at(b.q1));
    svg.rect(centre - half, top, half * 2.0, bottom - top, fill)?;
    let py = y.at(b.median);
    svg.line(centre - half, py, centre + half, py, "white")?;
    for o in &b.outliers {
      svg.circle(centre, y.at(*o), 3.0, fill)?;
    }
    svg.x_tick(centre, &b.category)?;
  }
  svg.finish()
}

pub fn pie(counts: &[CategoryCount]) -> Result<Vec<u8>> {
  let mut svg = Svg::new("Distribution of Categories")?;
  let total: u64 = counts.iter().map(|c| c.count).sum();
  let (cx, cy) = ((LEFT + WIDTH - RIGHT) / 2.0, (TOP + HEIGHT - BOTTOM / 2.0) / 2.0 + 10.0);
  let r = ((WIDTH - RIGHT - LEFT).min(HEIGHT - TOP - BOTTOM / 2.0) / 2.0) - 10.0;

  let mut angle = -PI / 2.0;
  for (i, c) in counts.iter().enumerate() {
    if c.count == 0 {
      continue;
    }
    let fill = colour(i);
    if c.count == total {
      svg.circle(cx, cy, r, fill)?;
      continue;
    }
    let sweep = 2.0 * PI * c.count as f64 / total as f64;
    let end = angle + sweep;
    let large = if sweep > PI { 1 } else { 0 };
    let d = format!(
      "M {} {} L {} {} A {} {} 0 {large} 1 {} {} Z",
      n(cx),
      n(cy),
      n(cx + r * angle.cos()),
      n(cy + r * angle.sin()),
      n(r),
      n(r),
      n(cx + r * end.cos()),
      n(cy + r * end.sin()),
    );
    svg.empty("path", &[("d", d), ("fill", fill.into()), ("stroke", "white".into())])?;
    angle = end;
  }

  let entries: Vec<(String, &str)> = counts
    .iter()
    .enumerate()
    .map(|(i, c)| {
      let pct = 100.0 * c.count as f64 / total.max(1) as f64;
      (format!("{} ({}, {pct:.1}%)", c.category, c.count), colour(i))
    })
    .collect();
  svg.legend(&entries)?;
  svg.finish()
}

/// Diverging blue-white-red colour for a coefficient in `[-1, 1]`.
fn coolwarm(v: f64) -> String {
  const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
  const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
  const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);
  let t = v.clamp(-1.0, 1.0);
  let (from, to, f) = if t < 0.0 { (MID, COLD, -t) } else { (MID, WARM, t) };
  let mix = |a: f64, b: f64| (a + (b - a) * f).round() as u8;
  format!(
    "#{:02x}{:02x}{:02x}",
    mix(from.0, to.0),
    mix(from.1, to.1),
    mix(from.2, to.2)
  )
}

pub fn heatmap(corr: &Correlation) -> Result<Vec<u8>> {
  let mut svg = Svg::new("Heatmap of Correlations")?;
  let size = corr.columns.len().max(1) as f64;
  let cell = ((WIDTH - RIGHT - LEFT).min(HEIGHT - TOP - BOTTOM)) / size;
  let (x0, y0) = (LEFT + 20.0, TOP);

  for (r, row) in corr.values.iter().enumerate() {
    for (c, value) in row.iter().enumerate() {
      let (x, y) = (x0 + cell * c as f64, y0 + cell * r as f64);
      match value {
        Some(v) => {
          svg.rect(x, y, cell, cell, &coolwarm(*v))?;
          svg.text(x + cell / 2.0, y + cell / 2.0 + 4.0, "middle", 11.0, &format!("{v:.2}"))?;
        }
        None => svg.rect(x, y, cell, cell, EMPTY_CELL)?,
      }
    }
  }
  for (i, name) in corr.columns.iter().enumerate() {
    let mid = cell * (i as f64 + 0.5);
    svg.text(x0 + mid, y0 + cell * size + 16.0, "middle", 11.0, name)?;
    svg.text(x0 - 6.0, y0 + mid + 4.0, "end", 11.0, name)?;
  }

  // Colour bar.
  let bar_x = x0 + cell * size + 24.0;
  let steps = 20;
  let step_h = (cell * size) / steps as f64;
  for i in 0..steps {
    let v = 1.0 - 2.0 * (i as f64 + 0.5) / steps as f64;
    svg.empty("rect", &[
      ("x", n(bar_x)),
      ("y", n(y0 + step_h * i as f64)),
      ("width", "14".into()),
      ("height", n(step_h + 0.5)),
      ("fill", coolwarm(v)),
    ])?;
  }
  svg.text(bar_x + 20.0, y0 + 10.0, "start", 11.0, "1")?;
  svg.text(bar_x + 20.0, y0 + cell * size, "start", 11.0, "-1")?;
  svg.finish()
}
