use std::fmt::Write;

use anyhow::Result;

use crate::{ext::StrExt, table::AveragedTable};

const COLUMN_WIDTH: usize = 10;
const COLUMN_PADDING: &str = "  ";

fn format_header<'a, I: IntoIterator<Item = &'a str>>(maps: I) -> String {
  let header = std::iter::once("users")
    .chain(maps)
    .map(|col| format!("{col:>COLUMN_WIDTH$}"))
    .collect::<Vec<_>>()
    .join(COLUMN_PADDING);

  format!("{header}\n{}", "=".repeat(header.len()))
}

fn format_row(label: &str, values: &[f64]) -> String {
  std::iter::once(format!("{label:>COLUMN_WIDTH$}"))
    .chain(values.iter().map(|value| format!("{value:>COLUMN_WIDTH$.3}")))
    .collect::<Vec<_>>()
    .join(COLUMN_PADDING)
}

/// Formats one averaged table, followed by the per-map means the bar chart
/// shows.
pub fn format(dataset: &str, subset: &str, table: &AveragedTable) -> Result<String> {
  let mut out = String::new();

  writeln!(out, "{} / {}", dataset.humanize(), subset.humanize())?;
  writeln!(out)?;
  writeln!(out, "{}", format_header(table.maps.iter().map(String::as_str)))?;

  for (users, row) in table.users.iter().zip(&table.values) {
    writeln!(out, "{}", format_row(&users.to_string(), row))?;
  }

  let means = format_row("mean", &table.column_means());
  writeln!(out, "{}", "-".repeat(means.len()))?;
  writeln!(out, "{means}")?;

  Ok(out)
}
