use std::{
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
  config::{Config, DirPolicy},
  error::ReportError,
  ext::StrExt,
  record::{self, Dataset},
  render::{BarChart, LineChart, Renderer, Series},
  table::AveragedTable,
};

const LINE_Y_LABEL: &str = "nanoseconds per op.";
const BAR_Y_LABEL: &str = "nanoseconds";

/// Renders a line and a bar chart for every dataset and subset in the data
/// directory.
pub struct Report<'c, R> {
  config: &'c Config,
  renderer: R,
  /// Images written so far, in order.
  pub saved: Vec<PathBuf>,
}

impl<'c, R: Renderer> Report<'c, R> {
  pub fn new(config: &'c Config, renderer: R) -> Result<Self> {
    config.validate().context("config")?;
    check_data_dir(&config.data_dir)?;

    Ok(Self {
      config,
      renderer,
      saved: Vec::new(),
    })
  }

  /// Writes every graph, printing a progress line per dataset and subset to
  /// stdout.
  pub fn generate(&mut self) -> Result<()> {
    self.generate_to(io::stdout().lock())
  }

  pub fn generate_to<W: Write>(&mut self, mut progress: W) -> Result<()> {
    self.prepare_graphs_dir().context("prepare graphs dir")?;

    let config = self.config;
    for_each_table(config, |dataset, subset, table| {
      self
        .graph(dataset, subset, table)
        .with_context(|| format!("graph {dataset:?} {subset:?}"))?;

      writeln!(progress, "saved {dataset} {subset} graphs").context("write progress")?;

      Ok(())
    })
  }

  fn prepare_graphs_dir(&self) -> Result<()> {
    let dir = &self.config.graphs_dir;

    if self.config.dir_policy == DirPolicy::Wipe && dir.exists() {
      info!("removing {dir:?}");
      fs::remove_dir_all(dir).context("remove_dir_all")?;
    }

    fs::create_dir_all(dir).context("create_dir_all")?;

    Ok(())
  }

  fn graph(&mut self, dataset: &str, subset: &str, table: &AveragedTable) -> Result<()> {
    let title = title(dataset, subset);
    let (line_path, bar_path) = graph_paths(&self.config.graphs_dir, dataset, subset);

    self.renderer.line(&line_path, &line_chart(&title, table)).context("line chart")?;
    self.saved.push(line_path);

    self.renderer.bar(&bar_path, &bar_chart(&title, table)).context("bar chart")?;
    self.saved.push(bar_path);

    Ok(())
  }
}

pub fn check_data_dir(data_dir: &Path) -> Result<()> {
  if !data_dir.exists() {
    return Err(ReportError::MissingDataDir(data_dir.to_path_buf()).into());
  }

  Ok(())
}

/// Reads every dataset in turn and calls `f` with the averaged table of each
/// configured subset. Subsets a dataset has no records for are skipped.
pub fn for_each_table<F>(config: &Config, mut f: F) -> Result<()>
where
  F: FnMut(&str, &str, &AveragedTable) -> Result<()>,
{
  config.validate().context("config")?;
  check_data_dir(&config.data_dir)?;

  let paths = record::datasets(&config.data_dir).with_context(|| format!("list {:?}", config.data_dir))?;
  if paths.is_empty() {
    warn!("no csv files in {:?}", config.data_dir);
  }

  for path in paths {
    let dataset = Dataset::read(&path).with_context(|| format!("read {path:?}"))?;

    for subset in &config.subsets {
      let table = AveragedTable::for_subset(&dataset, subset, &config.maps, config.divisor)
        .with_context(|| format!("dataset {:?}, subset {subset:?}", dataset.name))?;

      let Some(table) = table else {
        warn!("dataset {:?} has no {subset:?} records, skipping", dataset.name);
        continue;
      };

      f(dataset.name.as_str(), subset.as_str(), &table)?;
    }
  }

  Ok(())
}

/// Shared title of both charts, e.g. `Average time of map.get hit for "id mod"`.
pub fn title(dataset: &str, subset: &str) -> String {
  format!("Average time of map.{} for \"{}\"", subset.humanize(), dataset.humanize())
}

/// Paths of the line and bar chart, e.g. `id_mod_get_hit.png` and
/// `id_mod_get_hit_bar.png`.
pub fn graph_paths(graphs_dir: &Path, dataset: &str, subset: &str) -> (PathBuf, PathBuf) {
  let stem = format!("{dataset}_{}", subset.strip_parens());

  (graphs_dir.join(format!("{stem}.png")), graphs_dir.join(format!("{stem}_bar.png")))
}

fn line_chart(title: &str, table: &AveragedTable) -> LineChart {
  LineChart {
    title: title.to_string(),
    x_label: "users".to_string(),
    y_label: LINE_Y_LABEL.to_string(),
    x: table.users.clone(),
    series: table
      .maps
      .iter()
      .enumerate()
      .map(|(column, map)| Series {
        name: map.clone(),
        values: table.column(column),
      })
      .collect(),
  }
}

fn bar_chart(title: &str, table: &AveragedTable) -> BarChart {
  BarChart {
    title: title.to_string(),
    x_label: "map".to_string(),
    y_label: BAR_Y_LABEL.to_string(),
    bars: table.maps.iter().cloned().zip(table.column_means()).collect(),
  }
}
