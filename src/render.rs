use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use tracing::debug;

/// One line per series over a shared x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
  pub title: String,
  pub x_label: String,
  pub y_label: String,
  pub x: Vec<u32>,
  pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
  pub name: String,
  pub values: Vec<f64>,
}

/// One labelled bar per entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
  pub title: String,
  pub x_label: String,
  pub y_label: String,
  pub bars: Vec<(String, f64)>,
}

pub trait Renderer {
  fn line(&mut self, path: &Path, chart: &LineChart) -> Result<()>;
  fn bar(&mut self, path: &Path, chart: &BarChart) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
  fn line(&mut self, path: &Path, chart: &LineChart) -> Result<()> {
    (**self).line(path, chart)
  }

  fn bar(&mut self, path: &Path, chart: &BarChart) -> Result<()> {
    (**self).bar(path, chart)
  }
}

/// matplotlib's default cycle, so the maps keep their usual colors.
const COLORS: [RGBColor; 10] = [
  RGBColor(31, 119, 180),
  RGBColor(255, 127, 14),
  RGBColor(44, 160, 44),
  RGBColor(214, 39, 40),
  RGBColor(148, 103, 189),
  RGBColor(140, 86, 75),
  RGBColor(227, 119, 194),
  RGBColor(127, 127, 127),
  RGBColor(188, 189, 34),
  RGBColor(23, 190, 207),
];

const FONT: &str = "sans-serif";
const TITLE_PT: f64 = 12.0;
const LABEL_PT: f64 = 10.0;
const LINE_PT: f64 = 0.75;
const GRID: RGBColor = RGBColor(176, 176, 176);

fn color(index: usize) -> RGBColor {
  COLORS[index % COLORS.len()]
}

/// Upper bound of the y axis, leaving some headroom above the largest value.
fn y_max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
  let max = values.into_iter().filter(|v| v.is_finite()).fold(0.0, f64::max);

  if max > 0.0 { max * 1.05 } else { 1.0 }
}

/// Draws PNGs with plotters' bitmap backend.
pub struct PngRenderer {
  size: (u32, u32),
  dpi: u32,
}

impl PngRenderer {
  pub fn new(size: (u32, u32), dpi: u32) -> Self {
    Self { size, dpi }
  }

  /// Converts points to pixels at the configured dpi.
  fn px(&self, points: f64) -> u32 {
    (points * f64::from(self.dpi) / 72.0).round().max(1.0) as u32
  }

  fn font(&self, points: f64) -> FontDesc<'static> {
    (FONT, f64::from(self.px(points))).into_font()
  }
}

impl Renderer for PngRenderer {
  fn line(&mut self, path: &Path, chart: &LineChart) -> Result<()> {
    debug!("drawing line chart {path:?}");

    let root = BitMapBackend::new(path, self.size).into_drawing_area();
    root.fill(&WHITE).context("fill")?;

    let x_min = chart.x.first().copied().unwrap_or(0) as f64;
    let x_max = chart.x.last().copied().map_or(1.0, |x| x as f64).max(x_min + 1.0);
    let y_max = y_max(chart.series.iter().flat_map(|s| s.values.iter().copied()));

    let mut ctx = ChartBuilder::on(&root)
      .caption(&chart.title, self.font(TITLE_PT))
      .margin(self.px(8.0))
      .x_label_area_size(self.px(30.0))
      .y_label_area_size(self.px(40.0))
      .build_cartesian_2d(x_min..x_max, 0f64..y_max)
      .context("build chart")?;

    ctx
      .configure_mesh()
      .disable_x_mesh()
      .light_line_style(WHITE)
      .bold_line_style(GRID.stroke_width(self.px(0.5)))
      .x_desc(chart.x_label.as_str())
      .y_desc(chart.y_label.as_str())
      .label_style(self.font(LABEL_PT))
      .x_label_formatter(&|x| format!("{x:.0}"))
      .draw()
      .context("draw mesh")?;

    let stroke = self.px(LINE_PT);
    for (i, series) in chart.series.iter().enumerate() {
      let map_color = color(i);
      ctx
        .draw_series(LineSeries::new(
          chart.x.iter().zip(&series.values).map(|(&x, &y)| (x as f64, y)),
          map_color.stroke_width(stroke),
        ))
        .with_context(|| format!("draw series {:?}", series.name))?
        .label(&series.name)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], map_color.stroke_width(stroke)));
    }

    ctx
      .configure_series_labels()
      .position(SeriesLabelPosition::UpperLeft)
      .label_font(self.font(LABEL_PT))
      .background_style(WHITE.mix(0.8))
      .border_style(GRID)
      .draw()
      .context("draw legend")?;

    root.present().with_context(|| format!("save {path:?}"))?;

    Ok(())
  }

  fn bar(&mut self, path: &Path, chart: &BarChart) -> Result<()> {
    debug!("drawing bar chart {path:?}");

    let root = BitMapBackend::new(path, self.size).into_drawing_area();
    root.fill(&WHITE).context("fill")?;

    let count = chart.bars.len().max(1);
    let y_max = y_max(chart.bars.iter().map(|(_, v)| *v));

    let mut ctx = ChartBuilder::on(&root)
      .caption(&chart.title, self.font(TITLE_PT))
      .margin(self.px(8.0))
      .x_label_area_size(self.px(30.0))
      .y_label_area_size(self.px(40.0))
      .build_cartesian_2d(-0.5f64..count as f64 - 0.5, 0f64..y_max)
      .context("build chart")?;

    // Ticks land on bar centers, which are the integer x coordinates.
    let label = |x: &f64| {
      let index = x.round();
      match chart.bars.get(index as usize) {
        Some((name, _)) if (x - index).abs() < 1e-6 && index >= 0.0 => name.clone(),
        _ => String::new(),
      }
    };

    ctx
      .configure_mesh()
      .disable_x_mesh()
      .light_line_style(WHITE)
      .bold_line_style(GRID.stroke_width(self.px(0.5)))
      .x_labels(count)
      .x_label_formatter(&label)
      .x_desc(chart.x_label.as_str())
      .y_desc(chart.y_label.as_str())
      .label_style(self.font(LABEL_PT))
      .draw()
      .context("draw mesh")?;

    ctx
      .draw_series(chart.bars.iter().enumerate().map(|(i, (_, value))| {
        let x = i as f64;
        Rectangle::new([(x - 0.25, 0.0), (x + 0.25, *value)], color(0).filled())
      }))
      .context("draw bars")?;

    root.present().with_context(|| format!("save {path:?}"))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn y_axis_has_headroom() {
    assert_eq!(y_max([1.0, 2.0]), 2.1);
    assert_eq!(y_max([]), 1.0);
    assert_eq!(y_max([f64::NAN, 0.0]), 1.0);
  }

  #[test]
  fn points_scale_with_dpi() {
    assert_eq!(PngRenderer::new((1920, 1440), 300).px(LINE_PT), 3);
    assert_eq!(PngRenderer::new((640, 480), 72).px(LABEL_PT), 10);
  }

  #[test]
  #[ignore = "needs a system sans-serif font"]
  fn writes_png_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = PngRenderer::new((640, 480), 100);

    let line = LineChart {
      title: "Average time of map.put for \"id mod\"".to_string(),
      x_label: "users".to_string(),
      y_label: "nanoseconds per op.".to_string(),
      x: vec![100, 200],
      series: vec![Series { name: "sc".to_string(), values: vec![1.0, 2.0] }],
    };
    let bar = BarChart {
      title: line.title.clone(),
      x_label: "map".to_string(),
      y_label: "nanoseconds".to_string(),
      bars: vec![("sc".to_string(), 1.5)],
    };

    renderer.line(&dir.path().join("line.png"), &line).unwrap();
    renderer.bar(&dir.path().join("bar.png"), &bar).unwrap();

    assert!(dir.path().join("line.png").metadata().unwrap().len() > 0);
    assert!(dir.path().join("bar.png").metadata().unwrap().len() > 0);
  }
}
