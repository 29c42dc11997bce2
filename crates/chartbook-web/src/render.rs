//! HTML page rendering.
//!
//! Every page shares [`page`]'s layout. Interpolated strings go through
//! [`escape`].

use std::{borrow::Cow, fmt::Write as _};

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chartbook_core::view::{ColumnSummary, Overview, Summary};

/// Navigation bar entries: `(href, label)`.
const NAV: &[(&str, &str)] = &[
  ("/", "Home"),
  ("/upload", "Upload"),
  ("/visualize", "Histogram"),
  ("/summary", "Summary"),
  ("/scatter", "Scatter"),
  ("/bar_chart", "Bar chart"),
  ("/line_chart", "Line chart"),
  ("/box_plot", "Box plot"),
  ("/pie_chart", "Pie chart"),
  ("/heatmap", "Heatmap"),
];

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
nav a{margin-right:1em}\
table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:right}\
th:first-child{text-align:left}";

pub fn escape(raw: &str) -> Cow<'_, str> { quick_xml::escape::escape(raw) }

/// Wrap `body` (already HTML) in the shared layout.
pub fn page(title: &str, body: &str) -> String {
  let title = escape(title);
  let mut nav = String::new();
  for (href, label) in NAV {
    let _ = write!(nav, "<a href=\"{href}\">{label}</a>");
  }
  format!(
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
     <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
     <nav>{nav}</nav>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n"
  )
}

/// Embed an SVG document as a base64 `data:` image.
pub fn image(svg: &[u8], alt: &str) -> String {
  format!(
    "<img src=\"data:image/svg+xml;base64,{}\" alt=\"{}\">",
    B64.encode(svg),
    escape(alt)
  )
}

/// Embed an SVG document inline.
pub fn inline(svg: &[u8]) -> String {
  format!("<figure>{}</figure>", String::from_utf8_lossy(svg))
}

pub fn upload_form() -> String {
  "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
   <input type=\"file\" name=\"file\" accept=\".csv,text/csv\">\n\
   <input type=\"submit\" value=\"Upload\">\n</form>"
    .to_owned()
}

pub fn overview(overview: &Overview) -> String {
  if overview.row_count == 0 {
    return "<p>The table is empty. <a href=\"/upload\">Upload a CSV file</a> \
            to get started.</p>"
      .to_owned();
  }
  let mut html = format!("<p>{} rows in the current table.</p>\n", overview.row_count);
  html.push_str("<table>\n<tr><th>column</th><th>type</th></tr>\n");
  for column in &overview.columns {
    let _ = writeln!(
      html,
      "<tr><td>{}</td><td>{}</td></tr>",
      escape(&column.name),
      column.ty.sql_type()
    );
  }
  html.push_str("</table>");
  html
}

fn stat(v: Option<f64>) -> String {
  v.map_or_else(|| "NaN".to_owned(), |v| format!("{v:.6}"))
}

/// One row per statistic, one column per numeric table column.
pub fn summary_table(summary: &Summary) -> String {
  let mut html = String::from("<table>\n<tr><th></th>");
  for c in &summary.columns {
    let _ = write!(html, "<th>{}</th>", escape(&c.name));
  }
  html.push_str("</tr>\n");

  let rows: [(&str, fn(&ColumnSummary) -> String); 8] = [
    ("count", |c| format!("{:.6}", c.count as f64)),
    ("mean", |c| stat(c.mean)),
    ("std", |c| stat(c.std)),
    ("min", |c| stat(c.min)),
    ("25%", |c| stat(c.q25)),
    ("50%", |c| stat(c.q50)),
    ("75%", |c| stat(c.q75)),
    ("max", |c| stat(c.max)),
  ];
  for (label, cell) in &rows {
    let _ = write!(html, "<tr><th>{label}</th>");
    for c in &summary.columns {
      let _ = write!(html, "<td>{}</td>", cell(c));
    }
    html.push_str("</tr>\n");
  }
  html.push_str("</table>");
  html
}
