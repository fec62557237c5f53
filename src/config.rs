use std::{collections::BTreeSet, path::PathBuf};

use anyhow::Result;
use clap::ValueEnum;

/// Operation subsets written by the C++ benchmark, in plotting order.
pub const DEFAULT_SUBSETS: &[&str] = &["put", "get_(hit)", "get_(miss)", "remove"];
/// Map implementations, in the column order of every averaged table.
pub const DEFAULT_MAPS: &[&str] = &["sc", "lp", "qp", "dh", "stl"];
/// Raw timings are summed over this many operations.
pub const DEFAULT_DIVISOR: f64 = 100.0;
pub const DEFAULT_DPI: u32 = 300;

/// Figure size in inches.
const FIGURE_SIZE: (f64, f64) = (6.4, 4.8);

/// What to do with the graphs directory before writing to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DirPolicy {
  /// Remove the directory if it exists, then create it.
  #[default]
  Wipe,
  /// Create the directory only if it is missing.
  Keep,
}

pub struct Config {
  /// Directory holding the benchmark CSVs.
  pub data_dir: PathBuf,
  /// Directory the PNGs are written to.
  pub graphs_dir: PathBuf,
  pub subsets: Vec<String>,
  pub maps: Vec<String>,
  /// Divides the mean raw time to give nanoseconds per op.
  pub divisor: f64,
  pub dir_policy: DirPolicy,
  pub dpi: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      data_dir: PathBuf::from("data"),
      graphs_dir: PathBuf::from("graphs"),
      subsets: DEFAULT_SUBSETS.iter().map(|s| s.to_string()).collect(),
      maps: DEFAULT_MAPS.iter().map(|s| s.to_string()).collect(),
      divisor: DEFAULT_DIVISOR,
      dir_policy: DirPolicy::default(),
      dpi: DEFAULT_DPI,
    }
  }
}

impl Config {
  /// Image size in pixels at the configured dpi.
  pub fn image_size(&self) -> (u32, u32) {
    let (width, height) = FIGURE_SIZE;
    let dpi = f64::from(self.dpi);

    ((width * dpi).round() as u32, (height * dpi).round() as u32)
  }

  /// Rejects settings that would produce empty images or non-finite timings.
  pub fn validate(&self) -> Result<()> {
    if !(self.divisor.is_finite() && self.divisor > 0.0) {
      anyhow::bail!("divisor must be a positive number, got {}", self.divisor);
    }

    if self.dpi == 0 {
      anyhow::bail!("dpi must be positive");
    }

    if self.maps.is_empty() {
      anyhow::bail!("no maps configured");
    }

    let mut seen = BTreeSet::new();
    if let Some(map) = self.maps.iter().find(|map| !seen.insert(map.as_str())) {
      anyhow::bail!("map {map:?} is listed more than once");
    }

    Ok(())
  }
}

/// Parses a divisor, which must be finite and greater than zero.
pub fn parse_divisor(value: &str) -> Result<f64, String> {
  let divisor: f64 = value.parse().map_err(|err| format!("{err}"))?;

  if divisor.is_finite() && divisor > 0.0 {
    Ok(divisor)
  } else {
    Err(format!("{value} is not a positive number"))
  }
}
