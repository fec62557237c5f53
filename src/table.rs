use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use tracing::debug;

use crate::{
  error::ReportError,
  record::{Dataset, Record},
};

/// Mean rescaled timings for one dataset and subset, with a row per
/// concurrency level and a column per map.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedTable {
  /// Concurrency levels, strictly ascending. The highest level in the data is
  /// never present.
  pub users: Vec<u32>,
  /// Map identifiers, in canonical order.
  pub maps: Vec<String>,
  /// `values[row][column]`, in nanoseconds per op.
  pub values: Vec<Vec<f64>>,
}

#[derive(Default)]
struct Mean {
  sum: f64,
  count: usize,
}

impl AveragedTable {
  /// Averages the records of `subset`, or returns `None` if the dataset has
  /// none.
  pub fn for_subset(dataset: &Dataset, subset: &str, maps: &[String], divisor: f64) -> Result<Option<Self>> {
    let mut records = dataset.subset(subset).peekable();
    if records.peek().is_none() {
      return Ok(None);
    }

    Self::build(records, maps, divisor).map(Some)
  }

  /// Groups `records` by (map, users), averages `time` per group and divides
  /// it by `divisor`. The highest concurrency level is dropped, counting the
  /// levels of every map in the records, not just `maps`.
  pub fn build<'a, I: IntoIterator<Item = &'a Record>>(records: I, maps: &[String], divisor: f64) -> Result<Self> {
    let mut groups: BTreeMap<(u32, usize), Mean> = BTreeMap::new();
    let mut levels = BTreeSet::new();

    for record in records {
      levels.insert(record.users);

      let Some(column) = maps.iter().position(|map| *map == record.map) else {
        debug!("ignoring unknown map {:?}", record.map);
        continue;
      };

      let mean = groups.entry((record.users, column)).or_default();
      mean.sum += record.time;
      mean.count += 1;
    }

    if let Some(map) = (0..maps.len()).find(|&column| !groups.keys().any(|&(_, c)| c == column)) {
      return Err(ReportError::MissingMap(maps[map].clone()).into());
    }

    if levels.len() < 2 {
      return Err(ReportError::TooFewLevels(levels.len()).into());
    }

    let mut users: Vec<u32> = levels.into_iter().collect();
    users.pop();

    let values = users
      .iter()
      .map(|&level| {
        (0..maps.len())
          .map(|column| match groups.get(&(level, column)) {
            Some(mean) => Ok(mean.sum / mean.count as f64 / divisor),
            None => Err(ReportError::MissingValue { map: maps[column].clone(), users: level }),
          })
          .collect::<Result<Vec<_>, _>>()
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self { users, maps: maps.to_vec(), values })
  }

  /// Mean of each map's column over all rows.
  pub fn column_means(&self) -> Vec<f64> {
    (0..self.maps.len())
      .map(|column| self.values.iter().map(|row| row[column]).sum::<f64>() / self.values.len() as f64)
      .collect()
  }

  /// The values of one map, top to bottom.
  pub fn column(&self, column: usize) -> Vec<f64> {
    self.values.iter().map(|row| row[column]).collect()
  }
}
