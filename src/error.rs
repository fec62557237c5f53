use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ReportError {
  #[error("{0:?} does not exist, run the C++ benchmark first")]
  MissingDataDir(PathBuf),
  #[error("no records for map {0:?}")]
  MissingMap(String),
  #[error("map {map:?} has no timing at {users} users")]
  MissingValue { map: String, users: u32 },
  /// The highest level is always dropped, so one level leaves nothing to plot.
  #[error("need at least two concurrency levels, found {0}")]
  TooFewLevels(usize),
}
