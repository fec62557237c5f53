mod config;
mod error;
mod ext;
mod format;
mod record;
mod render;
mod report;
mod table;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::{
  config::{Config, DirPolicy, DEFAULT_DIVISOR, DEFAULT_DPI},
  render::PngRenderer,
  report::Report,
};

#[derive(Parser)]
#[command(about = "Charts hash map benchmark timings")]
struct Args {
  #[command(subcommand)]
  command: Command,
  /// Extra log filter directives, e.g. `map_bench_graphs=debug`.
  #[arg(short, long, global = true)]
  log: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct Input {
  /// Directory with the benchmark CSVs.
  #[arg(long, default_value = "data")]
  data_dir: PathBuf,
  /// Operation subsets to aggregate, in order.
  #[arg(long, value_delimiter = ',', default_values_t = config::DEFAULT_SUBSETS.iter().map(|s| s.to_string()))]
  subsets: Vec<String>,
  /// Map identifiers, in column order. Every one must be present in the data.
  #[arg(long, value_delimiter = ',', default_values_t = config::DEFAULT_MAPS.iter().map(|s| s.to_string()))]
  maps: Vec<String>,
  /// Raw timings are divided by this to give nanoseconds per op.
  #[arg(long, default_value_t = DEFAULT_DIVISOR, value_parser = config::parse_divisor)]
  divisor: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Render a line and a bar chart per dataset and subset.
  Graphs {
    #[command(flatten)]
    input: Input,
    /// Directory the PNGs are written to.
    #[arg(long, default_value = "graphs")]
    graphs_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = DirPolicy::Wipe)]
    dir_policy: DirPolicy,
    #[arg(long, default_value_t = DEFAULT_DPI, value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,
  },
  /// Print the averaged tables instead of drawing them.
  Table {
    #[command(flatten)]
    input: Input,
  },
}

impl Input {
  fn into_config(self) -> Config {
    Config {
      data_dir: self.data_dir,
      subsets: self.subsets,
      maps: self.maps,
      divisor: self.divisor,
      ..Config::default()
    }
  }
}

fn init_tracing(directives: &[String]) -> Result<()> {
  let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("map_bench_graphs=warn"));

  for directive in directives {
    filter = filter.add_directive(directive.parse().with_context(|| format!("log directive {directive:?}"))?);
  }

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();

  Ok(())
}

fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(&args.log)?;

  match args.command {
    Command::Graphs { input, graphs_dir, dir_policy, dpi } => {
      let config = Config {
        graphs_dir,
        dir_policy,
        dpi,
        ..input.into_config()
      };

      let renderer = PngRenderer::new(config.image_size(), config.dpi);
      let mut report = Report::new(&config, renderer).context("Report::new")?;
      report.generate().context("generate")?;

      info!("saved {} graphs to {:?}", report.saved.len(), config.graphs_dir);
    }
    Command::Table { input } => {
      let config = input.into_config();

      report::for_each_table(&config, |dataset, subset, table| {
        println!("{}", format::format(dataset, subset, table).context("format")?);
        Ok(())
      })?;
    }
  }

  Ok(())
}
