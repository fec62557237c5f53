use std::{
  fs,
  io::Read,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::ext::PathExt;

/// One CSV row written by the benchmark. Columns are matched by header name,
/// so a leading index column is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
  /// Concurrency level the row was measured at.
  pub users: u32,
  /// Operation subset, e.g. `get_(hit)`.
  pub op: String,
  /// Map implementation, e.g. `sc`.
  pub map: String,
  /// Raw elapsed time, summed over the measuring range.
  pub time: f64,
}

/// A named benchmark run, one per CSV file.
#[derive(Debug)]
pub struct Dataset {
  pub name: String,
  pub records: Vec<Record>,
}

impl Dataset {
  pub fn read(path: &Path) -> Result<Self> {
    let name = path.stem_string()?;
    let file = fs::File::open(path).with_context(|| format!("open {path:?}"))?;

    Self::from_reader(name, file)
  }

  pub fn from_reader<R: Read>(name: String, reader: R) -> Result<Self> {
    let records = csv::ReaderBuilder::new()
      .delimiter(b',')
      .trim(csv::Trim::All)
      .from_reader(reader)
      .into_deserialize()
      .collect::<Result<Vec<Record>, _>>()
      .with_context(|| format!("parse {name:?}"))?;

    debug!("read {} records from {name:?}", records.len());

    Ok(Self { name, records })
  }

  /// Records belonging to one operation subset.
  pub fn subset<'a>(&'a self, subset: &'a str) -> impl Iterator<Item = &'a Record> {
    self.records.iter().filter(move |record| record.op == subset)
  }
}

/// CSV files in `data_dir`, sorted by file name.
pub fn datasets(data_dir: &Path) -> Result<Vec<PathBuf>> {
  let mut paths = fs::read_dir(data_dir)
    .context("read dir")?
    .map(|entry| Ok(entry?.path()))
    .collect::<Result<Vec<_>>>()?;

  paths.retain(|path| path.is_file() && path.is_csv());
  paths.sort();

  Ok(paths)
}
